use roofline_auth_types::identity::AdminIdentity;

use crate::domain::repository::{AdminRepository, DashboardRepository};
use crate::domain::types::DashboardStats;
use crate::error::AdminError;
use crate::usecase::access::load_actor;

/// Headline counts. Open to every active admin.
pub struct DashboardStatsUseCase<A: AdminRepository, D: DashboardRepository> {
    pub admins: A,
    pub dashboard: D,
}

impl<A: AdminRepository, D: DashboardRepository> DashboardStatsUseCase<A, D> {
    pub async fn execute(&self, identity: &AdminIdentity) -> Result<DashboardStats, AdminError> {
        load_actor(&self.admins, identity).await?;
        self.dashboard.stats().await
    }
}
