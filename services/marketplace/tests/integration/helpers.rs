use std::collections::BTreeSet;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use roofline_domain::account::AccountRole;
use roofline_domain::geo::GeoPoint;
use roofline_domain::listing::{ListingType, cooldown_days_left};
use roofline_domain::pagination::PageRequest;
use roofline_domain::verification::{
    PaymentStatus, PropertyVerificationStatus, RequestStatus,
};

use roofline_marketplace::domain::agreement_template::AgreementDocument;
use roofline_marketplace::domain::repository::{
    AccountRepository, AgreementRepository, ContactRepository, Geocoder,
    MobileVerificationRepository, PdfRenderer, PropertyRepository, VerificationRepository,
    WishlistRepository,
};
use roofline_marketplace::domain::types::{
    Account, AreaCount, CaptureLocation, Contact, CooldownOutcome, FilterOptions, ListingTerms,
    MobileVerification, OutboxEvent, Property, PropertyChange, PropertySummary, RentAgreement,
    SearchFilter, VerificationRequest, WishlistItem,
};
use roofline_marketplace::error::MarketplaceError;

pub const TEST_JWT_SECRET: &str = "test-jwt-secret";

// ── Fixtures ─────────────────────────────────────────────────────────────────

pub fn test_account(role: AccountRole, phone: &str) -> Account {
    let now = Utc::now();
    Account {
        id: Uuid::new_v4(),
        role,
        name: "Test Account".to_owned(),
        email: format!("{phone}@example.com"),
        phone: phone.to_owned(),
        password_hash: "$argon2id$unused".to_owned(),
        otp: None,
        otp_expires_at: None,
        is_verified: true,
        is_active: true,
        created_at: now,
        updated_at: now,
    }
}

/// A live rent listing last edited 31 days ago.
pub fn test_property(owner_id: Uuid) -> Property {
    let updated = Utc::now() - Duration::days(31);
    Property {
        id: Uuid::new_v4(),
        owner_id,
        property_type: "APARTMENT".to_owned(),
        title: "2BHK near metro".to_owned(),
        description: Some("Sunny, east facing".to_owned()),
        bhk: Some("2".to_owned()),
        furnishing: Some("SEMI_FURNISHED".to_owned()),
        city: "Bengaluru".to_owned(),
        locality: "Indiranagar".to_owned(),
        address: "12th Main, HAL 2nd Stage".to_owned(),
        location: Some(GeoPoint::new(12.9719, 77.6412)),
        contact_number: "9876543210".to_owned(),
        terms: ListingTerms::Rent {
            rent: "25000".to_owned(),
            security_deposit: "100000".to_owned(),
            maintenance: None,
        },
        is_draft: false,
        is_available: true,
        is_verified: false,
        verification_status: PropertyVerificationStatus::NotVerified,
        verification_expiry: None,
        created_at: updated,
        updated_at: updated,
    }
}

pub fn test_request(property_id: Uuid, owner_id: Uuid, status: RequestStatus) -> VerificationRequest {
    let now = Utc::now();
    let paid = status != RequestStatus::PendingPayment;
    VerificationRequest {
        id: Uuid::new_v4(),
        property_id,
        owner_id,
        status,
        payment_status: if paid {
            PaymentStatus::Completed
        } else {
            PaymentStatus::Pending
        },
        amount: 499,
        payment_reference: None,
        location: None,
        captured_address: None,
        photo_keys: Vec::new(),
        assigned_to: None,
        reviewed_by: None,
        review_notes: None,
        valid_from: None,
        valid_until: None,
        created_at: now,
        updated_at: now,
    }
}

/// Whole-rupee part of the headline price, grouping separators dropped.
fn price_of(property: &Property) -> Option<i64> {
    let price = property.terms.price();
    let whole = price.split('.').next().unwrap_or_default();
    let digits: String = whole.chars().filter(char::is_ascii_digit).collect();
    digits.parse().ok()
}

// ── MockAccountRepo ──────────────────────────────────────────────────────────

pub struct MockAccountRepo {
    pub accounts: Arc<Mutex<Vec<Account>>>,
}

impl MockAccountRepo {
    pub fn new(accounts: Vec<Account>) -> Self {
        Self {
            accounts: Arc::new(Mutex::new(accounts)),
        }
    }

    pub fn empty() -> Self {
        Self::new(vec![])
    }
}

impl AccountRepository for MockAccountRepo {
    async fn find_by_phone(
        &self,
        role: AccountRole,
        phone: &str,
    ) -> Result<Option<Account>, MarketplaceError> {
        Ok(self
            .accounts
            .lock()
            .unwrap()
            .iter()
            .find(|a| a.role == role && a.phone == phone)
            .cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Account>, MarketplaceError> {
        Ok(self
            .accounts
            .lock()
            .unwrap()
            .iter()
            .find(|a| a.id == id)
            .cloned())
    }

    async fn exists(
        &self,
        role: AccountRole,
        phone: &str,
        email: &str,
    ) -> Result<bool, MarketplaceError> {
        Ok(self
            .accounts
            .lock()
            .unwrap()
            .iter()
            .any(|a| a.role == role && (a.phone == phone || a.email == email)))
    }

    async fn create_with_outbox(
        &self,
        account: &Account,
        _event: &OutboxEvent,
    ) -> Result<(), MarketplaceError> {
        self.accounts.lock().unwrap().push(account.clone());
        Ok(())
    }

    async fn store_otp_with_outbox(
        &self,
        id: Uuid,
        otp: &str,
        expires_at: DateTime<Utc>,
        _event: &OutboxEvent,
    ) -> Result<(), MarketplaceError> {
        if let Some(a) = self.accounts.lock().unwrap().iter_mut().find(|a| a.id == id) {
            a.otp = Some(otp.to_owned());
            a.otp_expires_at = Some(expires_at);
        }
        Ok(())
    }

    async fn mark_verified(&self, id: Uuid) -> Result<(), MarketplaceError> {
        if let Some(a) = self.accounts.lock().unwrap().iter_mut().find(|a| a.id == id) {
            a.is_verified = true;
            a.otp = None;
        }
        Ok(())
    }

    async fn reset_password(&self, id: Uuid, password_hash: &str) -> Result<(), MarketplaceError> {
        if let Some(a) = self.accounts.lock().unwrap().iter_mut().find(|a| a.id == id) {
            a.password_hash = password_hash.to_owned();
        }
        Ok(())
    }

    async fn update_profile(
        &self,
        id: Uuid,
        name: Option<&str>,
        email: Option<&str>,
    ) -> Result<(), MarketplaceError> {
        if let Some(a) = self.accounts.lock().unwrap().iter_mut().find(|a| a.id == id) {
            if let Some(name) = name {
                a.name = name.to_owned();
            }
            if let Some(email) = email {
                a.email = email.to_owned();
            }
        }
        Ok(())
    }
}

// ── MockMobileRepo ───────────────────────────────────────────────────────────

pub struct MockMobileRepo {
    pub records: Arc<Mutex<Vec<MobileVerification>>>,
    pub events: Arc<Mutex<Vec<OutboxEvent>>>,
}

impl MockMobileRepo {
    pub fn empty() -> Self {
        Self {
            records: Arc::new(Mutex::new(vec![])),
            events: Arc::new(Mutex::new(vec![])),
        }
    }

    /// Repo in which `mobile` already completed WhatsApp verification.
    pub fn verified(mobile: &str) -> Self {
        let repo = Self::empty();
        let now = Utc::now();
        repo.records.lock().unwrap().push(MobileVerification {
            id: Uuid::new_v4(),
            mobile: mobile.to_owned(),
            otp: "0000".to_owned(),
            expires_at: now,
            verified: true,
            created_at: now,
            updated_at: now,
        });
        repo
    }

    pub fn records_handle(&self) -> Arc<Mutex<Vec<MobileVerification>>> {
        Arc::clone(&self.records)
    }

    pub fn events_handle(&self) -> Arc<Mutex<Vec<OutboxEvent>>> {
        Arc::clone(&self.events)
    }
}

impl MobileVerificationRepository for MockMobileRepo {
    async fn upsert_with_outbox(
        &self,
        record: &MobileVerification,
        event: &OutboxEvent,
    ) -> Result<(), MarketplaceError> {
        let mut records = self.records.lock().unwrap();
        records.retain(|r| r.mobile != record.mobile);
        records.push(record.clone());
        self.events.lock().unwrap().push(event.clone());
        Ok(())
    }

    async fn find_by_mobile(
        &self,
        mobile: &str,
    ) -> Result<Option<MobileVerification>, MarketplaceError> {
        Ok(self
            .records
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.mobile == mobile)
            .cloned())
    }

    async fn mark_verified(&self, mobile: &str) -> Result<(), MarketplaceError> {
        for r in self
            .records
            .lock()
            .unwrap()
            .iter_mut()
            .filter(|r| r.mobile == mobile)
        {
            r.verified = true;
        }
        Ok(())
    }
}

// ── MockPropertyRepo ─────────────────────────────────────────────────────────

pub struct MockPropertyRepo {
    pub properties: Arc<Mutex<Vec<Property>>>,
    pub expired: Arc<Mutex<Vec<Uuid>>>,
}

impl MockPropertyRepo {
    pub fn new(properties: Vec<Property>) -> Self {
        Self {
            properties: Arc::new(Mutex::new(properties)),
            expired: Arc::new(Mutex::new(vec![])),
        }
    }

    pub fn empty() -> Self {
        Self::new(vec![])
    }

    pub fn properties_handle(&self) -> Arc<Mutex<Vec<Property>>> {
        Arc::clone(&self.properties)
    }

    /// Ids passed to `expire_verification`.
    pub fn expired_handle(&self) -> Arc<Mutex<Vec<Uuid>>> {
        Arc::clone(&self.expired)
    }

    fn with_property(&self, id: Uuid, f: impl FnOnce(&mut Property)) {
        if let Some(p) = self.properties.lock().unwrap().iter_mut().find(|p| p.id == id) {
            f(p);
        }
    }
}

impl PropertyRepository for MockPropertyRepo {
    async fn create(&self, property: &Property) -> Result<(), MarketplaceError> {
        self.properties.lock().unwrap().push(property.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Property>, MarketplaceError> {
        Ok(self
            .properties
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.id == id)
            .cloned())
    }

    async fn list_by_owner(&self, owner_id: Uuid) -> Result<Vec<Property>, MarketplaceError> {
        Ok(self
            .properties
            .lock()
            .unwrap()
            .iter()
            .filter(|p| p.owner_id == owner_id && !p.state().is_deleted())
            .cloned()
            .collect())
    }

    async fn set_available(&self, id: Uuid, available: bool) -> Result<(), MarketplaceError> {
        self.with_property(id, |p| p.is_available = available);
        Ok(())
    }

    async fn update_with_cooldown(
        &self,
        id: Uuid,
        change: PropertyChange,
        cooldown_days: i64,
        now: DateTime<Utc>,
    ) -> Result<Option<CooldownOutcome>, MarketplaceError> {
        let mut properties = self.properties.lock().unwrap();
        let Some(property) = properties.iter_mut().find(|p| p.id == id) else {
            return Ok(None);
        };
        if change.is_cooldown_gated(property.is_draft) {
            if let Some(days_left) = cooldown_days_left(property.updated_at, now, cooldown_days) {
                return Ok(Some(CooldownOutcome::TooSoon { days_left }));
            }
        }
        change.apply(property, now);
        Ok(Some(CooldownOutcome::Updated(property.clone())))
    }

    async fn publish(&self, id: Uuid) -> Result<(), MarketplaceError> {
        self.with_property(id, |p| {
            p.is_draft = false;
            p.is_available = true;
        });
        Ok(())
    }

    async fn soft_delete(&self, id: Uuid) -> Result<(), MarketplaceError> {
        self.with_property(id, |p| {
            p.is_draft = true;
            p.is_available = false;
        });
        Ok(())
    }

    async fn expire_verification(&self, id: Uuid) -> Result<(), MarketplaceError> {
        self.with_property(id, |p| {
            p.is_verified = false;
            p.verification_status = PropertyVerificationStatus::Expired;
        });
        self.expired.lock().unwrap().push(id);
        Ok(())
    }

    async fn search(
        &self,
        filter: &SearchFilter,
        page: PageRequest,
    ) -> Result<Vec<Property>, MarketplaceError> {
        let same = |want: &Option<String>, have: &str| {
            want.as_deref()
                .is_none_or(|w| w.eq_ignore_ascii_case(have))
        };
        let mut found: Vec<Property> = self
            .properties
            .lock()
            .unwrap()
            .iter()
            .filter(|p| p.state().is_live())
            .filter(|p| filter.listing_type.is_none_or(|t| t == p.terms.listing_type()))
            .filter(|p| same(&filter.city, &p.city) && same(&filter.locality, &p.locality))
            .filter(|p| same(&filter.property_type, &p.property_type))
            .filter(|p| filter.bhk.is_none() || filter.bhk == p.bhk)
            .filter(|p| filter.min_price.is_none_or(|min| price_of(p).is_some_and(|v| v >= min)))
            .filter(|p| filter.max_price.is_none_or(|max| price_of(p).is_some_and(|v| v <= max)))
            .cloned()
            .collect();
        found.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(found
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.limit() as usize)
            .collect())
    }

    async fn list_live_located(
        &self,
        listing_type: Option<ListingType>,
    ) -> Result<Vec<Property>, MarketplaceError> {
        Ok(self
            .properties
            .lock()
            .unwrap()
            .iter()
            .filter(|p| p.state().is_live() && p.location.is_some())
            .filter(|p| listing_type.is_none_or(|t| t == p.terms.listing_type()))
            .cloned()
            .collect())
    }

    async fn filter_options(&self) -> Result<FilterOptions, MarketplaceError> {
        let properties = self.properties.lock().unwrap();
        let live: Vec<&Property> = properties.iter().filter(|p| p.state().is_live()).collect();
        let distinct = |f: &dyn Fn(&Property) -> Option<String>| -> Vec<String> {
            live.iter()
                .filter_map(|&p| f(p))
                .collect::<BTreeSet<_>>()
                .into_iter()
                .collect()
        };
        Ok(FilterOptions {
            cities: distinct(&|p| Some(p.city.clone())),
            localities: distinct(&|p| Some(p.locality.clone())),
            property_types: distinct(&|p| Some(p.property_type.clone())),
            furnishings: distinct(&|p| p.furnishing.clone()),
            bhks: distinct(&|p| p.bhk.clone()),
        })
    }

    async fn available_areas(&self) -> Result<Vec<AreaCount>, MarketplaceError> {
        let mut areas: Vec<AreaCount> = Vec::new();
        for p in self.properties.lock().unwrap().iter().filter(|p| p.state().is_live()) {
            match areas
                .iter_mut()
                .find(|a| a.city == p.city && a.locality == p.locality)
            {
                Some(area) => area.count += 1,
                None => areas.push(AreaCount {
                    city: p.city.clone(),
                    locality: p.locality.clone(),
                    count: 1,
                }),
            }
        }
        Ok(areas)
    }
}

// ── MockVerificationRepo ─────────────────────────────────────────────────────

pub struct MockVerificationRepo {
    pub requests: Arc<Mutex<Vec<VerificationRequest>>>,
    pub captures: Arc<Mutex<Vec<CaptureLocation>>>,
}

impl MockVerificationRepo {
    pub fn new(requests: Vec<VerificationRequest>) -> Self {
        Self {
            requests: Arc::new(Mutex::new(requests)),
            captures: Arc::new(Mutex::new(vec![])),
        }
    }

    pub fn empty() -> Self {
        Self::new(vec![])
    }

    pub fn requests_handle(&self) -> Arc<Mutex<Vec<VerificationRequest>>> {
        Arc::clone(&self.requests)
    }

    pub fn captures_handle(&self) -> Arc<Mutex<Vec<CaptureLocation>>> {
        Arc::clone(&self.captures)
    }
}

impl VerificationRepository for MockVerificationRepo {
    async fn find_in_flight(
        &self,
        property_id: Uuid,
    ) -> Result<Option<VerificationRequest>, MarketplaceError> {
        Ok(self
            .requests
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.property_id == property_id && !r.status.is_terminal())
            .cloned())
    }

    async fn create(&self, request: &VerificationRequest) -> Result<(), MarketplaceError> {
        self.requests.lock().unwrap().push(request.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<VerificationRequest>, MarketplaceError> {
        Ok(self
            .requests
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.id == id)
            .cloned())
    }

    async fn complete_payment(
        &self,
        id: Uuid,
        reference: Option<&str>,
    ) -> Result<(), MarketplaceError> {
        let mut requests = self.requests.lock().unwrap();
        let request = requests
            .iter_mut()
            .find(|r| r.id == id && r.payment_status != PaymentStatus::Completed)
            .ok_or(MarketplaceError::PaymentAlreadyCompleted)?;
        request.payment_status = PaymentStatus::Completed;
        request.status = RequestStatus::PaymentCompleted;
        request.payment_reference = reference.map(str::to_owned);
        Ok(())
    }

    async fn capture_location(&self, capture: &CaptureLocation) -> Result<(), MarketplaceError> {
        if let Some(r) = self
            .requests
            .lock()
            .unwrap()
            .iter_mut()
            .find(|r| r.id == capture.request_id)
        {
            r.status = RequestStatus::UnderReview;
            r.location = Some(capture.location);
            r.captured_address = capture.captured_address.clone();
            r.photo_keys = capture.photo_keys.clone();
        }
        self.captures.lock().unwrap().push(capture.clone());
        Ok(())
    }

    async fn list_by_owner(
        &self,
        owner_id: Uuid,
    ) -> Result<Vec<VerificationRequest>, MarketplaceError> {
        Ok(self
            .requests
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.owner_id == owner_id)
            .cloned()
            .collect())
    }

    async fn latest_for_property(
        &self,
        property_id: Uuid,
    ) -> Result<Option<VerificationRequest>, MarketplaceError> {
        Ok(self
            .requests
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.property_id == property_id)
            .max_by_key(|r| r.created_at)
            .cloned())
    }
}

// ── MockContactRepo ──────────────────────────────────────────────────────────

pub struct MockContactRepo {
    pub contacts: Arc<Mutex<Vec<Contact>>>,
    /// Listings used to resolve summaries and lead ownership.
    pub properties: Vec<Property>,
}

impl MockContactRepo {
    pub fn new(properties: Vec<Property>) -> Self {
        Self {
            contacts: Arc::new(Mutex::new(vec![])),
            properties,
        }
    }

    pub fn contacts_handle(&self) -> Arc<Mutex<Vec<Contact>>> {
        Arc::clone(&self.contacts)
    }

    fn summary_of(&self, property_id: Uuid) -> Option<PropertySummary> {
        self.properties
            .iter()
            .find(|p| p.id == property_id)
            .map(Property::summary)
    }

    fn owner_of(&self, property_id: Uuid) -> Option<Uuid> {
        self.properties
            .iter()
            .find(|p| p.id == property_id)
            .map(|p| p.owner_id)
    }
}

impl ContactRepository for MockContactRepo {
    async fn find_for_user(
        &self,
        user_id: Uuid,
        property_id: Uuid,
    ) -> Result<Option<Contact>, MarketplaceError> {
        Ok(self
            .contacts
            .lock()
            .unwrap()
            .iter()
            .find(|c| c.user_id == user_id && c.property_id == property_id)
            .cloned())
    }

    async fn create(&self, contact: &Contact) -> Result<(), MarketplaceError> {
        self.contacts.lock().unwrap().push(contact.clone());
        Ok(())
    }

    async fn restore_for_user(&self, id: Uuid) -> Result<(), MarketplaceError> {
        if let Some(c) = self.contacts.lock().unwrap().iter_mut().find(|c| c.id == id) {
            c.user_deleted = false;
        }
        Ok(())
    }

    async fn list_for_user(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<(Contact, PropertySummary)>, MarketplaceError> {
        Ok(self
            .contacts
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.user_id == user_id && !c.user_deleted)
            .filter_map(|c| Some((c.clone(), self.summary_of(c.property_id)?)))
            .collect())
    }

    async fn list_for_owner(
        &self,
        owner_id: Uuid,
    ) -> Result<Vec<(Contact, PropertySummary)>, MarketplaceError> {
        Ok(self
            .contacts
            .lock()
            .unwrap()
            .iter()
            .filter(|c| !c.owner_deleted && self.owner_of(c.property_id) == Some(owner_id))
            .filter_map(|c| Some((c.clone(), self.summary_of(c.property_id)?)))
            .collect())
    }

    async fn hide_for_user(&self, id: Uuid, user_id: Uuid) -> Result<bool, MarketplaceError> {
        let mut contacts = self.contacts.lock().unwrap();
        match contacts
            .iter_mut()
            .find(|c| c.id == id && c.user_id == user_id && !c.user_deleted)
        {
            Some(c) => {
                c.user_deleted = true;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn hide_for_owner(&self, id: Uuid, owner_id: Uuid) -> Result<bool, MarketplaceError> {
        let mut contacts = self.contacts.lock().unwrap();
        let owned = |c: &Contact| self.owner_of(c.property_id) == Some(owner_id);
        match contacts
            .iter_mut()
            .find(|c| c.id == id && !c.owner_deleted && owned(c))
        {
            Some(c) => {
                c.owner_deleted = true;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

// ── MockWishlistRepo ─────────────────────────────────────────────────────────

pub struct MockWishlistRepo {
    pub entries: Arc<Mutex<Vec<(Uuid, Uuid, DateTime<Utc>)>>>,
    pub properties: Vec<Property>,
}

impl MockWishlistRepo {
    pub fn new(properties: Vec<Property>) -> Self {
        Self {
            entries: Arc::new(Mutex::new(vec![])),
            properties,
        }
    }

    pub fn entries_handle(&self) -> Arc<Mutex<Vec<(Uuid, Uuid, DateTime<Utc>)>>> {
        Arc::clone(&self.entries)
    }
}

impl WishlistRepository for MockWishlistRepo {
    async fn add(
        &self,
        user_id: Uuid,
        property_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<bool, MarketplaceError> {
        let mut entries = self.entries.lock().unwrap();
        if entries
            .iter()
            .any(|(u, p, _)| *u == user_id && *p == property_id)
        {
            return Ok(false);
        }
        entries.push((user_id, property_id, now));
        Ok(true)
    }

    async fn remove(&self, user_id: Uuid, property_id: Uuid) -> Result<bool, MarketplaceError> {
        let mut entries = self.entries.lock().unwrap();
        let before = entries.len();
        entries.retain(|(u, p, _)| !(*u == user_id && *p == property_id));
        Ok(entries.len() < before)
    }

    async fn list(&self, user_id: Uuid) -> Result<Vec<WishlistItem>, MarketplaceError> {
        Ok(self
            .entries
            .lock()
            .unwrap()
            .iter()
            .filter(|(u, _, _)| *u == user_id)
            .filter_map(|(_, property_id, added_at)| {
                let property = self
                    .properties
                    .iter()
                    .find(|p| p.id == *property_id && !p.state().is_deleted())?;
                Some(WishlistItem {
                    property: property.summary(),
                    added_at: *added_at,
                })
            })
            .collect())
    }
}

// ── MockAgreementRepo ────────────────────────────────────────────────────────

pub struct MockAgreementRepo {
    pub agreements: Arc<Mutex<Vec<RentAgreement>>>,
}

impl MockAgreementRepo {
    pub fn empty() -> Self {
        Self {
            agreements: Arc::new(Mutex::new(vec![])),
        }
    }

    pub fn agreements_handle(&self) -> Arc<Mutex<Vec<RentAgreement>>> {
        Arc::clone(&self.agreements)
    }
}

impl AgreementRepository for MockAgreementRepo {
    async fn create(&self, agreement: &RentAgreement) -> Result<(), MarketplaceError> {
        self.agreements.lock().unwrap().push(agreement.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<RentAgreement>, MarketplaceError> {
        Ok(self
            .agreements
            .lock()
            .unwrap()
            .iter()
            .find(|a| a.id == id)
            .cloned())
    }

    async fn list_for_phone(&self, phone: &str) -> Result<Vec<RentAgreement>, MarketplaceError> {
        Ok(self
            .agreements
            .lock()
            .unwrap()
            .iter()
            .filter(|a| a.is_party(phone))
            .cloned()
            .collect())
    }

    async fn update_payment(
        &self,
        id: Uuid,
        status: PaymentStatus,
        reference: Option<&str>,
    ) -> Result<(), MarketplaceError> {
        if let Some(a) = self.agreements.lock().unwrap().iter_mut().find(|a| a.id == id) {
            a.payment_status = status;
            if let Some(reference) = reference {
                a.payment_reference = Some(reference.to_owned());
            }
        }
        Ok(())
    }

    async fn mark_document_generated(&self, id: Uuid) -> Result<(), MarketplaceError> {
        if let Some(a) = self.agreements.lock().unwrap().iter_mut().find(|a| a.id == id) {
            a.document_generated = true;
        }
        Ok(())
    }
}

// ── Ports ────────────────────────────────────────────────────────────────────

/// Geocoder returning a fixed answer, or failing.
pub struct FakeGeocoder {
    pub address: Option<String>,
    pub fail: bool,
}

impl FakeGeocoder {
    pub fn returning(address: &str) -> Self {
        Self {
            address: Some(address.to_owned()),
            fail: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            address: None,
            fail: true,
        }
    }
}

impl Geocoder for FakeGeocoder {
    async fn reverse(&self, _point: GeoPoint) -> anyhow::Result<Option<String>> {
        if self.fail {
            anyhow::bail!("geocoder unavailable");
        }
        Ok(self.address.clone())
    }
}

/// Renderer that records the titles it was asked to render.
#[derive(Default)]
pub struct FakeRenderer {
    pub rendered: Arc<Mutex<Vec<String>>>,
}

impl FakeRenderer {
    pub fn rendered_handle(&self) -> Arc<Mutex<Vec<String>>> {
        Arc::clone(&self.rendered)
    }
}

impl PdfRenderer for FakeRenderer {
    fn render(&self, document: &AgreementDocument) -> anyhow::Result<Vec<u8>> {
        self.rendered.lock().unwrap().push(document.title.clone());
        Ok(b"%PDF-1.3 fake".to_vec())
    }
}
