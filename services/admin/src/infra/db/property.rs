use anyhow::Context as _;
use sea_orm::{
    ColumnTrait, Condition, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, QuerySelect,
    sea_query::{Expr, Func, SimpleExpr},
};
use uuid::Uuid;

use roofline_domain::geo::GeoPoint;
use roofline_domain::listing::{ListingState, ListingType};
use roofline_domain::pagination::PageRequest;
use roofline_domain::verification::PropertyVerificationStatus;
use roofline_schema::properties;

use crate::domain::repository::PropertyAdminRepository;
use crate::domain::types::{PropertyFilter, PropertyRecord};
use crate::error::AdminError;

#[derive(Clone)]
pub struct DbPropertyAdminRepository {
    pub db: DatabaseConnection,
}

fn lower_like(column: properties::Column, pattern: &str) -> SimpleExpr {
    Expr::expr(Func::lower(Expr::col(column))).like(pattern)
}

fn state_condition(state: ListingState) -> Condition {
    let (is_draft, is_available) = state.flags();
    Condition::all()
        .add(properties::Column::IsDraft.eq(is_draft))
        .add(properties::Column::IsAvailable.eq(is_available))
}

impl PropertyAdminRepository for DbPropertyAdminRepository {
    async fn list(
        &self,
        filter: &PropertyFilter,
        page: PageRequest,
    ) -> Result<Vec<PropertyRecord>, AdminError> {
        let mut query = properties::Entity::find();
        if let Some(listing_type) = filter.listing_type {
            query = query.filter(properties::Column::ListingType.eq(listing_type.as_str()));
        }
        if let Some(state) = filter.state {
            query = query.filter(state_condition(state));
        }
        if let Some(status) = filter.verification_status {
            query = query.filter(properties::Column::VerificationStatus.eq(status.as_str()));
        }
        if let Some(owner_id) = filter.owner_id {
            query = query.filter(properties::Column::OwnerId.eq(owner_id));
        }
        if let Some(city) = &filter.city {
            query = query.filter(
                Expr::expr(Func::lower(Expr::col(properties::Column::City)))
                    .eq(city.to_lowercase()),
            );
        }
        if let Some(term) = filter.search.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
            let pattern = format!("%{}%", term.to_lowercase());
            query = query.filter(
                Condition::any()
                    .add(lower_like(properties::Column::Title, &pattern))
                    .add(lower_like(properties::Column::Locality, &pattern))
                    .add(lower_like(properties::Column::Address, &pattern)),
            );
        }
        let models = query
            .order_by_desc(properties::Column::CreatedAt)
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.db)
            .await
            .context("list properties for moderation")?;
        Ok(models
            .into_iter()
            .map(record_from_model)
            .collect::<anyhow::Result<_>>()?)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<PropertyRecord>, AdminError> {
        let model = properties::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find property")?;
        Ok(model.map(record_from_model).transpose()?)
    }

    async fn set_available(&self, id: Uuid, available: bool) -> Result<(), AdminError> {
        properties::Entity::update_many()
            .filter(properties::Column::Id.eq(id))
            .col_expr(properties::Column::IsAvailable, Expr::value(available))
            .exec(&self.db)
            .await
            .context("set property availability")?;
        Ok(())
    }

    async fn soft_delete(&self, id: Uuid) -> Result<(), AdminError> {
        let (is_draft, is_available) = ListingState::Deleted.flags();
        properties::Entity::update_many()
            .filter(properties::Column::Id.eq(id))
            .col_expr(properties::Column::IsDraft, Expr::value(is_draft))
            .col_expr(properties::Column::IsAvailable, Expr::value(is_available))
            .exec(&self.db)
            .await
            .context("soft delete property")?;
        Ok(())
    }
}

fn record_from_model(model: properties::Model) -> anyhow::Result<PropertyRecord> {
    let listing_type = ListingType::parse(&model.listing_type)
        .with_context(|| format!("unknown listing type {:?}", model.listing_type))?;
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
    Ok(PropertyRecord {
        id: model.id,
        owner_id: model.owner_id,
        listing_type,
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
        rent: model.rent,
        security_deposit: model.security_deposit,
        maintenance: model.maintenance,
        sale_price: model.sale_price,
        is_draft: model.is_draft,
        is_available: model.is_available,
        is_verified: model.is_verified,
        verification_status,
        verification_expiry: model.verification_expiry,
        created_at: model.created_at,
        updated_at: model.updated_at,
    })
}
