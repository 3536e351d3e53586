use uuid::Uuid;

use roofline_auth_types::identity::AdminIdentity;
use roofline_domain::account::Permission;
use roofline_domain::pagination::PageRequest;

use crate::domain::repository::{ActivityLogRepository, AdminRepository};
use crate::domain::types::ActivityEntry;
use crate::error::AdminError;
use crate::usecase::access::authorize;

pub struct ListActivityUseCase<A: AdminRepository, L: ActivityLogRepository> {
    pub admins: A,
    pub log: L,
}

impl<A: AdminRepository, L: ActivityLogRepository> ListActivityUseCase<A, L> {
    pub async fn execute(
        &self,
        identity: &AdminIdentity,
        admin_id: Option<Uuid>,
        page: PageRequest,
    ) -> Result<Vec<ActivityEntry>, AdminError> {
        authorize(&self.admins, identity, Permission::ViewActivityLogs).await?;
        self.log.list(admin_id, page).await
    }
}
