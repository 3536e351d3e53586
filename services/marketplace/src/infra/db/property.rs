use anyhow::Context as _;
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder, QuerySelect, TransactionTrait,
    sea_query::{Expr, Func, SimpleExpr},
};
use uuid::Uuid;

use roofline_domain::geo::GeoPoint;
use roofline_domain::listing::{ListingType, cooldown_days_left};
use roofline_domain::pagination::PageRequest;
use roofline_domain::verification::{PropertyVerificationStatus, RequestStatus};
use roofline_schema::{properties, property_verifications, verification_requests};

use crate::domain::repository::PropertyRepository;
use crate::domain::types::{
    AreaCount, CooldownOutcome, FilterOptions, ListingTerms, Property, PropertyChange,
    SearchFilter,
};
use crate::error::MarketplaceError;

/// Headline price as a number: whole-rupee digits of `rent` (or `sale_price`),
/// separators and paise dropped. Rows whose digits cannot fit a bigint compare as NULL.
const NUMERIC_PRICE_SQL: &str = "(CASE WHEN length(split_part(regexp_replace(COALESCE(rent, sale_price), '[^0-9.]', '', 'g'), '.', 1)) BETWEEN 1 AND 18 \
     THEN split_part(regexp_replace(COALESCE(rent, sale_price), '[^0-9.]', '', 'g'), '.', 1)::bigint END)";

#[derive(Clone)]
pub struct DbPropertyRepository {
    pub db: DatabaseConnection,
}

fn live() -> sea_orm::Condition {
    sea_orm::Condition::all()
        .add(properties::Column::IsDraft.eq(false))
        .add(properties::Column::IsAvailable.eq(true))
}

fn lower_eq(column: properties::Column, value: &str) -> SimpleExpr {
    Expr::expr(Func::lower(Expr::col(column))).eq(value.to_lowercase())
}

impl PropertyRepository for DbPropertyRepository {
    async fn create(&self, property: &Property) -> Result<(), MarketplaceError> {
        property_active_model(property)
            .insert(&self.db)
            .await
            .context("insert property")?;
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Property>, MarketplaceError> {
        let model = properties::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find property by id")?;
        Ok(model.map(property_from_model).transpose()?)
    }

    async fn list_by_owner(&self, owner_id: Uuid) -> Result<Vec<Property>, MarketplaceError> {
        // Deleted listings carry is_draft = true and is_available = false.
        let models = properties::Entity::find()
            .filter(properties::Column::OwnerId.eq(owner_id))
            .filter(
                sea_orm::Condition::any()
                    .add(properties::Column::IsDraft.eq(false))
                    .add(properties::Column::IsAvailable.eq(true)),
            )
            .order_by_desc(properties::Column::CreatedAt)
            .all(&self.db)
            .await
            .context("list properties by owner")?;
        Ok(models
            .into_iter()
            .map(property_from_model)
            .collect::<anyhow::Result<_>>()?)
    }

    async fn set_available(&self, id: Uuid, available: bool) -> Result<(), MarketplaceError> {
        properties::Entity::update_many()
            .filter(properties::Column::Id.eq(id))
            .col_expr(properties::Column::IsAvailable, Expr::value(available))
            .exec(&self.db)
            .await
            .context("set property availability")?;
        Ok(())
    }

    async fn update_with_cooldown(
        &self,
        id: Uuid,
        change: PropertyChange,
        cooldown_days: i64,
        now: DateTime<Utc>,
    ) -> Result<Option<CooldownOutcome>, MarketplaceError> {
        let outcome = self
            .db
            .transaction::<_, Option<CooldownOutcome>, DbErr>(move |txn| {
                Box::pin(async move {
                    let Some(model) = properties::Entity::find_by_id(id)
                        .lock_exclusive()
                        .one(txn)
                        .await?
                    else {
                        return Ok(None);
                    };
                    if change.is_cooldown_gated(model.is_draft) {
                        if let Some(days_left) =
                            cooldown_days_left(model.updated_at, now, cooldown_days)
                        {
                            return Ok(Some(CooldownOutcome::TooSoon { days_left }));
                        }
                    }
                    let mut property =
                        property_from_model(model).map_err(|e| DbErr::Custom(e.to_string()))?;
                    change.apply(&mut property, now);
                    property_active_model(&property).update(txn).await?;
                    Ok(Some(CooldownOutcome::Updated(property)))
                })
            })
            .await
            .context("update property under cooldown")?;
        Ok(outcome)
    }

    async fn publish(&self, id: Uuid) -> Result<(), MarketplaceError> {
        properties::Entity::update_many()
            .filter(properties::Column::Id.eq(id))
            .col_expr(properties::Column::IsDraft, Expr::value(false))
            .col_expr(properties::Column::IsAvailable, Expr::value(true))
            .exec(&self.db)
            .await
            .context("publish property")?;
        Ok(())
    }

    async fn soft_delete(&self, id: Uuid) -> Result<(), MarketplaceError> {
        properties::Entity::update_many()
            .filter(properties::Column::Id.eq(id))
            .col_expr(properties::Column::IsDraft, Expr::value(true))
            .col_expr(properties::Column::IsAvailable, Expr::value(false))
            .exec(&self.db)
            .await
            .context("soft delete property")?;
        Ok(())
    }

    async fn expire_verification(&self, id: Uuid) -> Result<(), MarketplaceError> {
        self.db
            .transaction::<_, (), DbErr>(|txn| {
                Box::pin(async move { expire_in_txn(txn, id, Utc::now()).await })
            })
            .await
            .context("expire property verification")?;
        Ok(())
    }

    async fn search(
        &self,
        filter: &SearchFilter,
        page: PageRequest,
    ) -> Result<Vec<Property>, MarketplaceError> {
        let mut query = properties::Entity::find().filter(live());
        if let Some(listing_type) = filter.listing_type {
            query = query.filter(properties::Column::ListingType.eq(listing_type.as_str()));
        }
        if let Some(city) = &filter.city {
            query = query.filter(lower_eq(properties::Column::City, city));
        }
        if let Some(locality) = &filter.locality {
            query = query.filter(lower_eq(properties::Column::Locality, locality));
        }
        if let Some(property_type) = &filter.property_type {
            query = query.filter(properties::Column::PropertyType.eq(property_type.as_str()));
        }
        if let Some(bhk) = &filter.bhk {
            query = query.filter(properties::Column::Bhk.eq(bhk.as_str()));
        }
        if let Some(furnishing) = &filter.furnishing {
            query = query.filter(properties::Column::Furnishing.eq(furnishing.as_str()));
        }
        if let Some(min) = filter.min_price {
            query = query.filter(Expr::cust_with_values(
                format!("{NUMERIC_PRICE_SQL} >= $1"),
                [min],
            ));
        }
        if let Some(max) = filter.max_price {
            query = query.filter(Expr::cust_with_values(
                format!("{NUMERIC_PRICE_SQL} <= $1"),
                [max],
            ));
        }
        if filter.verified_only {
            query = query.filter(properties::Column::IsVerified.eq(true));
        }

        let models = query
            .order_by_desc(properties::Column::CreatedAt)
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.db)
            .await
            .context("search properties")?;
        Ok(models
            .into_iter()
            .map(property_from_model)
            .collect::<anyhow::Result<_>>()?)
    }

    async fn list_live_located(
        &self,
        listing_type: Option<ListingType>,
    ) -> Result<Vec<Property>, MarketplaceError> {
        let mut query = properties::Entity::find()
            .filter(live())
            .filter(properties::Column::Latitude.is_not_null())
            .filter(properties::Column::Longitude.is_not_null());
        if let Some(listing_type) = listing_type {
            query = query.filter(properties::Column::ListingType.eq(listing_type.as_str()));
        }
        let models = query
            .all(&self.db)
            .await
            .context("list located properties")?;
        Ok(models
            .into_iter()
            .map(property_from_model)
            .collect::<anyhow::Result<_>>()?)
    }

    async fn filter_options(&self) -> Result<FilterOptions, MarketplaceError> {
        Ok(FilterOptions {
            cities: self.distinct_values(properties::Column::City).await?,
            localities: self.distinct_values(properties::Column::Locality).await?,
            property_types: self.distinct_values(properties::Column::PropertyType).await?,
            furnishings: self.distinct_values(properties::Column::Furnishing).await?,
            bhks: self.distinct_values(properties::Column::Bhk).await?,
        })
    }

    async fn available_areas(&self) -> Result<Vec<AreaCount>, MarketplaceError> {
        let rows: Vec<(String, String, i64)> = properties::Entity::find()
            .select_only()
            .column(properties::Column::City)
            .column(properties::Column::Locality)
            .column_as(Expr::col(properties::Column::Id).count(), "count")
            .filter(live())
            .group_by(properties::Column::City)
            .group_by(properties::Column::Locality)
            .order_by_asc(properties::Column::City)
            .order_by_asc(properties::Column::Locality)
            .into_tuple()
            .all(&self.db)
            .await
            .context("count live properties per area")?;
        Ok(rows
            .into_iter()
            .map(|(city, locality, count)| AreaCount {
                city,
                locality,
                count: count.max(0) as u64,
            })
            .collect())
    }
}

impl DbPropertyRepository {
    async fn distinct_values(
        &self,
        column: properties::Column,
    ) -> Result<Vec<String>, MarketplaceError> {
        let values: Vec<Option<String>> = properties::Entity::find()
            .select_only()
            .column(column)
            .distinct()
            .filter(live())
            .filter(column.is_not_null())
            .order_by_asc(column)
            .into_tuple()
            .all(&self.db)
            .await
            .context("list distinct property values")?;
        Ok(values.into_iter().flatten().collect())
    }
}

/// Flip a lapsed verification inside `txn`: property to `EXPIRED`, the active
/// approval row deactivated and approved requests past their window marked expired.
async fn expire_in_txn(
    txn: &sea_orm::DatabaseTransaction,
    property_id: Uuid,
    now: DateTime<Utc>,
) -> Result<(), DbErr> {
    properties::Entity::update_many()
        .filter(properties::Column::Id.eq(property_id))
        .filter(properties::Column::IsVerified.eq(true))
        .col_expr(properties::Column::IsVerified, Expr::value(false))
        .col_expr(
            properties::Column::VerificationStatus,
            Expr::value(PropertyVerificationStatus::Expired.as_str()),
        )
        .exec(txn)
        .await?;
    property_verifications::Entity::update_many()
        .filter(property_verifications::Column::PropertyId.eq(property_id))
        .filter(property_verifications::Column::IsActive.eq(true))
        .col_expr(property_verifications::Column::IsActive, Expr::value(false))
        .exec(txn)
        .await?;
    verification_requests::Entity::update_many()
        .filter(verification_requests::Column::PropertyId.eq(property_id))
        .filter(verification_requests::Column::Status.eq(RequestStatus::Approved.as_str()))
        .filter(verification_requests::Column::ValidUntil.lt(now))
        .col_expr(
            verification_requests::Column::Status,
            Expr::value(RequestStatus::Expired.as_str()),
        )
        .col_expr(verification_requests::Column::UpdatedAt, Expr::value(now))
        .exec(txn)
        .await?;
    Ok(())
}

fn property_active_model(property: &Property) -> properties::ActiveModel {
    let (rent, security_deposit, maintenance, sale_price) = match &property.terms {
        ListingTerms::Rent {
            rent,
            security_deposit,
            maintenance,
        } => (
            Some(rent.clone()),
            Some(security_deposit.clone()),
            maintenance.clone(),
            None,
        ),
        ListingTerms::Sale { sale_price } => (None, None, None, Some(sale_price.clone())),
    };
    properties::ActiveModel {
        id: Set(property.id),
        owner_id: Set(property.owner_id),
        listing_type: Set(property.terms.listing_type().as_str().to_owned()),
        property_type: Set(property.property_type.clone()),
        title: Set(property.title.clone()),
        description: Set(property.description.clone()),
        bhk: Set(property.bhk.clone()),
        furnishing: Set(property.furnishing.clone()),
        city: Set(property.city.clone()),
        locality: Set(property.locality.clone()),
        address: Set(property.address.clone()),
        latitude: Set(property.location.map(|p| p.lat)),
        longitude: Set(property.location.map(|p| p.lon)),
        contact_number: Set(property.contact_number.clone()),
        rent: Set(rent),
        security_deposit: Set(security_deposit),
        maintenance: Set(maintenance),
        sale_price: Set(sale_price),
        is_draft: Set(property.is_draft),
        is_available: Set(property.is_available),
        is_verified: Set(property.is_verified),
        verification_status: Set(property.verification_status.as_str().to_owned()),
        verification_expiry: Set(property.verification_expiry),
        created_at: Set(property.created_at),
        updated_at: Set(property.updated_at),
    }
}

pub(super) fn property_from_model(model: properties::Model) -> anyhow::Result<Property> {
    let listing_type = ListingType::parse(&model.listing_type)
        .with_context(|| format!("unknown listing type {:?}", model.listing_type))?;
    let terms = match listing_type {
        ListingType::Rent => ListingTerms::Rent {
            rent: model.rent.context("rent listing without rent")?,
            security_deposit: model
                .security_deposit
                .context("rent listing without security deposit")?,
            maintenance: model.maintenance,
        },
        ListingType::Sale => ListingTerms::Sale {
            sale_price: model.sale_price.context("sale listing without sale price")?,
        },
    };
    let verification_status = PropertyVerificationStatus::parse(&model.verification_status)
        .with_context(|| {
            format!(
                "unknown verification status {:?}",
                model.verification_status
            )
        })?;
    let location = match (model.latitude, model.longitude) {
        (Some(lat), Some(lon)) => Some(GeoPoint::new(lat, lon)),
        _ => None,
    };
    Ok(Property {
        id: model.id,
        owner_id: model.owner_id,
        property_type: model.property_type,
        title: model.title,
        description: model.description,
        bhk: model.bhk,
        furnishing: model.furnishing,
        city: model.city,
        locality: model.locality,
        address: model.address,
        location,
        contact_number: model.contact_number,
        terms,
        is_draft: model.is_draft,
        is_available: model.is_available,
        is_verified: model.is_verified,
        verification_status,
        verification_expiry: model.verification_expiry,
        created_at: model.created_at,
        updated_at: model.updated_at,
    })
}
