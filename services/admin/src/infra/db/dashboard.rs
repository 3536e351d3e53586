use anyhow::Context as _;
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QuerySelect,
    sea_query::Expr,
};

use roofline_domain::account::AccountRole;
use roofline_domain::listing::ListingState;
use roofline_domain::verification::{PaymentStatus, RequestStatus};
use roofline_schema::{accounts, properties, rent_agreements, verification_requests};

use crate::domain::repository::DashboardRepository;
use crate::domain::types::{DashboardStats, PropertyCounts, RequestStatusCounts};
use crate::error::AdminError;

#[derive(Clone)]
pub struct DbDashboardRepository {
    pub db: DatabaseConnection,
}

impl DbDashboardRepository {
    async fn count_properties_in(&self, state: ListingState) -> Result<u64, AdminError> {
        let (is_draft, is_available) = state.flags();
        let count = properties::Entity::find()
            .filter(properties::Column::IsDraft.eq(is_draft))
            .filter(properties::Column::IsAvailable.eq(is_available))
            .count(&self.db)
            .await
            .context("count properties by state")?;
        Ok(count)
    }
}

impl DashboardRepository for DbDashboardRepository {
    async fn stats(&self) -> Result<DashboardStats, AdminError> {
        let mut stats = DashboardStats::default();

        let roles: Vec<(String, i64)> = accounts::Entity::find()
            .select_only()
            .column(accounts::Column::Role)
            .column_as(Expr::col(accounts::Column::Id).count(), "count")
            .group_by(accounts::Column::Role)
            .into_tuple()
            .all(&self.db)
            .await
            .context("count accounts by role")?;
        for (role, count) in roles {
            match AccountRole::parse(&role) {
                Some(AccountRole::User) => stats.users = count.max(0) as u64,
                Some(AccountRole::Owner) => stats.owners = count.max(0) as u64,
                None => tracing::warn!(%role, "unknown account role in dashboard count"),
            }
        }

        let verified = properties::Entity::find()
            .filter(properties::Column::IsVerified.eq(true))
            .count(&self.db)
            .await
            .context("count verified properties")?;
        stats.properties = PropertyCounts {
            live: self.count_properties_in(ListingState::Available).await?,
            draft: self.count_properties_in(ListingState::Draft).await?,
            paused: self.count_properties_in(ListingState::Paused).await?,
            verified,
        };

        let requests: Vec<(String, i64)> = verification_requests::Entity::find()
            .select_only()
            .column(verification_requests::Column::Status)
            .column_as(Expr::col(verification_requests::Column::Id).count(), "count")
            .group_by(verification_requests::Column::Status)
            .into_tuple()
            .all(&self.db)
            .await
            .context("count verification requests by status")?;
        let mut verifications = RequestStatusCounts::default();
        for (status, count) in requests {
            let status = RequestStatus::parse(&status)
                .with_context(|| format!("unknown request status {status:?}"))?;
            verifications.add(status, count.max(0) as u64);
        }
        stats.verifications = verifications;

        let payments: Vec<(String, i64)> = rent_agreements::Entity::find()
            .select_only()
            .column(rent_agreements::Column::PaymentStatus)
            .column_as(Expr::col(rent_agreements::Column::Id).count(), "count")
            .group_by(rent_agreements::Column::PaymentStatus)
            .into_tuple()
            .all(&self.db)
            .await
            .context("count agreements by payment status")?;
        for (status, count) in payments {
            let status = PaymentStatus::parse(&status)
                .with_context(|| format!("unknown payment status {status:?}"))?;
            stats.agreements.add(status, count.max(0) as u64);
        }

        Ok(stats)
    }
}
