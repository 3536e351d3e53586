use chrono::Utc;
use uuid::Uuid;

use roofline_domain::agreement::{MAX_DURATION_MONTHS, parse_date};
use roofline_domain::verification::PaymentStatus;

use crate::domain::agreement_template::{AgreementDocument, build_document};
use crate::domain::repository::{AccountRepository, AgreementRepository, PdfRenderer};
use crate::domain::types::RentAgreement;
use crate::error::MarketplaceError;
use crate::usecase::mobile_otp::is_valid_mobile;

/// Rent-agreement form as submitted.
#[derive(Debug, Clone, Default)]
pub struct AgreementForm {
    pub owner_name: String,
    pub owner_phone: String,
    pub owner_address: String,
    pub tenant_name: String,
    pub tenant_phone: String,
    pub tenant_address: String,
    pub property_address: String,
    pub rent_amount: String,
    pub security_deposit: String,
    pub maintenance: Option<String>,
    pub agreement_duration: String,
    pub rent_start_date: String,
    pub lock_in_period: String,
    pub notice_period: String,
    pub rent_due_day: String,
}

fn is_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

/// Check every form field and report all problems at once.
pub fn validate_form(form: &AgreementForm) -> Result<(), MarketplaceError> {
    let mut problems: Vec<String> = Vec::new();
    let mut require = |field: &str, ok: bool, reason: &str| {
        if !ok {
            problems.push(format!("{field}: {reason}"));
        }
    };

    require("ownerName", !form.owner_name.trim().is_empty(), "is required");
    require("ownerPhone", is_valid_mobile(&form.owner_phone), "must be 10 digits");
    require("ownerAddress", !form.owner_address.trim().is_empty(), "is required");
    require("tenantName", !form.tenant_name.trim().is_empty(), "is required");
    require("tenantPhone", is_valid_mobile(&form.tenant_phone), "must be 10 digits");
    require("tenantAddress", !form.tenant_address.trim().is_empty(), "is required");
    require("propertyAddress", !form.property_address.trim().is_empty(), "is required");
    require("rentAmount", is_digits(&form.rent_amount), "must be a whole number");
    require("securityDeposit", is_digits(&form.security_deposit), "must be a whole number");
    require(
        "maintenance",
        form.maintenance.as_deref().is_none_or(|m| m.is_empty() || is_digits(m)),
        "must be a whole number",
    );
    let duration_ok = form
        .agreement_duration
        .parse::<u32>()
        .is_ok_and(|m| (1..=MAX_DURATION_MONTHS).contains(&m));
    require(
        "agreementDuration",
        duration_ok,
        "must be between 1 and 36 months",
    );
    require("rentStartDate", parse_date(&form.rent_start_date).is_some(), "must be YYYY-MM-DD");
    require("lockInPeriod", is_digits(&form.lock_in_period), "must be a number of days");
    require("noticePeriod", is_digits(&form.notice_period), "must be a number of days");
    let due_ok = form
        .rent_due_day
        .parse::<u32>()
        .is_ok_and(|d| (1..=31).contains(&d));
    require("rentDueDay", due_ok, "must be between 1 and 31");

    if problems.is_empty() {
        Ok(())
    } else {
        Err(MarketplaceError::Validation(problems.join("; ")))
    }
}

async fn caller_phone<A: AccountRepository>(
    accounts: &A,
    account_id: Uuid,
) -> Result<String, MarketplaceError> {
    Ok(accounts
        .find_by_id(account_id)
        .await?
        .ok_or(MarketplaceError::AccountNotFound)?
        .phone)
}

/// Load an agreement the caller is a party to.
async fn load_visible<G: AgreementRepository, A: AccountRepository>(
    agreements: &G,
    accounts: &A,
    account_id: Uuid,
    agreement_id: Uuid,
) -> Result<RentAgreement, MarketplaceError> {
    let agreement = agreements
        .find_by_id(agreement_id)
        .await?
        .ok_or(MarketplaceError::AgreementNotFound)?;
    if agreement.creator_id == account_id {
        return Ok(agreement);
    }
    let phone = caller_phone(accounts, account_id).await?;
    if !agreement.is_party(&phone) {
        return Err(MarketplaceError::Forbidden);
    }
    Ok(agreement)
}

// ── Create ───────────────────────────────────────────────────────────────────

pub struct CreateAgreementUseCase<G: AgreementRepository, A: AccountRepository> {
    pub agreements: G,
    pub accounts: A,
}

impl<G: AgreementRepository, A: AccountRepository> CreateAgreementUseCase<G, A> {
    pub async fn execute(
        &self,
        account_id: Uuid,
        form: AgreementForm,
    ) -> Result<RentAgreement, MarketplaceError> {
        validate_form(&form)?;
        let creator_phone = caller_phone(&self.accounts, account_id).await?;
        let now = Utc::now();
        let agreement = RentAgreement {
            id: Uuid::now_v7(),
            creator_id: account_id,
            creator_phone,
            owner_name: form.owner_name,
            owner_phone: form.owner_phone,
            owner_address: form.owner_address,
            tenant_name: form.tenant_name,
            tenant_phone: form.tenant_phone,
            tenant_address: form.tenant_address,
            property_address: form.property_address,
            rent_amount: form.rent_amount,
            security_deposit: form.security_deposit,
            maintenance: form.maintenance.filter(|m| !m.is_empty()),
            agreement_duration: form.agreement_duration,
            rent_start_date: form.rent_start_date,
            lock_in_period: form.lock_in_period,
            notice_period: form.notice_period,
            rent_due_day: form.rent_due_day,
            payment_status: PaymentStatus::Pending,
            payment_reference: None,
            document_generated: false,
            created_at: now,
            updated_at: now,
        };
        self.agreements.create(&agreement).await?;
        Ok(agreement)
    }
}

// ── List / Get ───────────────────────────────────────────────────────────────

pub struct ListAgreementsUseCase<G: AgreementRepository, A: AccountRepository> {
    pub agreements: G,
    pub accounts: A,
}

impl<G: AgreementRepository, A: AccountRepository> ListAgreementsUseCase<G, A> {
    pub async fn execute(&self, account_id: Uuid) -> Result<Vec<RentAgreement>, MarketplaceError> {
        let phone = caller_phone(&self.accounts, account_id).await?;
        self.agreements.list_for_phone(&phone).await
    }
}

pub struct GetAgreementUseCase<G: AgreementRepository, A: AccountRepository> {
    pub agreements: G,
    pub accounts: A,
}

impl<G: AgreementRepository, A: AccountRepository> GetAgreementUseCase<G, A> {
    pub async fn execute(
        &self,
        account_id: Uuid,
        agreement_id: Uuid,
    ) -> Result<RentAgreement, MarketplaceError> {
        load_visible(&self.agreements, &self.accounts, account_id, agreement_id).await
    }
}

// ── Download ─────────────────────────────────────────────────────────────────

/// A rendered agreement ready to be sent as an attachment.
pub struct RenderedAgreement {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

pub struct DownloadAgreementUseCase<G, A, R>
where
    G: AgreementRepository,
    A: AccountRepository,
    R: PdfRenderer,
{
    pub agreements: G,
    pub accounts: A,
    pub renderer: R,
}

impl<G, A, R> DownloadAgreementUseCase<G, A, R>
where
    G: AgreementRepository,
    A: AccountRepository,
    R: PdfRenderer,
{
    pub async fn execute(
        &self,
        account_id: Uuid,
        agreement_id: Uuid,
    ) -> Result<RenderedAgreement, MarketplaceError> {
        let agreement =
            load_visible(&self.agreements, &self.accounts, account_id, agreement_id).await?;
        let document = build_document(&agreement);
        let bytes = self.renderer.render(&document)?;
        Ok(RenderedAgreement {
            file_name: AgreementDocument::file_name(&agreement),
            bytes,
        })
    }
}

// ── Payment / Document flags ─────────────────────────────────────────────────

pub struct UpdateAgreementPaymentUseCase<G: AgreementRepository, A: AccountRepository> {
    pub agreements: G,
    pub accounts: A,
}

impl<G: AgreementRepository, A: AccountRepository> UpdateAgreementPaymentUseCase<G, A> {
    pub async fn execute(
        &self,
        account_id: Uuid,
        agreement_id: Uuid,
        status: PaymentStatus,
        reference: Option<String>,
    ) -> Result<RentAgreement, MarketplaceError> {
        let mut agreement =
            load_visible(&self.agreements, &self.accounts, account_id, agreement_id).await?;
        if agreement.payment_status == PaymentStatus::Completed {
            return Err(MarketplaceError::PaymentAlreadyCompleted);
        }
        if !agreement.payment_status.can_transition_to(status) {
            return Err(MarketplaceError::InvalidState(
                "invalid payment status transition",
            ));
        }
        self.agreements
            .update_payment(agreement_id, status, reference.as_deref())
            .await?;
        agreement.payment_status = status;
        if reference.is_some() {
            agreement.payment_reference = reference;
        }
        Ok(agreement)
    }
}

pub struct MarkDocumentGeneratedUseCase<G: AgreementRepository, A: AccountRepository> {
    pub agreements: G,
    pub accounts: A,
}

impl<G: AgreementRepository, A: AccountRepository> MarkDocumentGeneratedUseCase<G, A> {
    pub async fn execute(&self, account_id: Uuid, agreement_id: Uuid) -> Result<(), MarketplaceError> {
        load_visible(&self.agreements, &self.accounts, account_id, agreement_id).await?;
        self.agreements.mark_document_generated(agreement_id).await
    }
}
