use anyhow::Context as _;
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder, TransactionError, TransactionTrait,
    sea_query::{Expr, OnConflict},
};
use uuid::Uuid;

use roofline_core::sea_ext::is_unique_violation;
use roofline_domain::account::{AdminRole, PermissionSet};
use roofline_schema::{admins, employee_permissions};

use crate::domain::repository::AdminRepository;
use crate::domain::types::Admin;
use crate::error::AdminError;

#[derive(Clone)]
pub struct DbAdminRepository {
    pub db: DatabaseConnection,
}

fn permissions_active_model(
    admin_id: Uuid,
    permissions: &PermissionSet,
    now: DateTime<Utc>,
) -> employee_permissions::ActiveModel {
    employee_permissions::ActiveModel {
        admin_id: Set(admin_id),
        can_verify_properties: Set(permissions.can_verify_properties),
        can_manage_users: Set(permissions.can_manage_users),
        can_manage_properties: Set(permissions.can_manage_properties),
        can_manage_agreements: Set(permissions.can_manage_agreements),
        can_view_activity_logs: Set(permissions.can_view_activity_logs),
        updated_at: Set(now),
    }
}

impl AdminRepository for DbAdminRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Admin>, AdminError> {
        let row = admins::Entity::find_by_id(id)
            .find_also_related(employee_permissions::Entity)
            .one(&self.db)
            .await
            .context("find admin by id")?;
        Ok(row
            .map(|(admin, perms)| admin_from_model(admin, perms))
            .transpose()?)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Admin>, AdminError> {
        let row = admins::Entity::find()
            .filter(admins::Column::Email.eq(email))
            .find_also_related(employee_permissions::Entity)
            .one(&self.db)
            .await
            .context("find admin by email")?;
        Ok(row
            .map(|(admin, perms)| admin_from_model(admin, perms))
            .transpose()?)
    }

    async fn create(&self, admin: &Admin) -> Result<(), AdminError> {
        let admin = admin.clone();
        let result = self
            .db
            .transaction::<_, (), DbErr>(move |txn| {
                Box::pin(async move {
                    admins::ActiveModel {
                        id: Set(admin.id),
                        name: Set(admin.name),
                        email: Set(admin.email),
                        password_hash: Set(admin.password_hash),
                        role: Set(admin.role.as_str().to_owned()),
                        is_active: Set(admin.is_active),
                        last_login_at: Set(admin.last_login_at),
                        created_at: Set(admin.created_at),
                        updated_at: Set(admin.updated_at),
                    }
                    .insert(txn)
                    .await?;
                    permissions_active_model(admin.id, &admin.permissions, admin.created_at)
                        .insert(txn)
                        .await?;
                    Ok(())
                })
            })
            .await;

        match result {
            Ok(()) => Ok(()),
            Err(TransactionError::Transaction(e)) if is_unique_violation(&e) => {
                Err(AdminError::AdminAlreadyExists)
            }
            Err(e) => Err(anyhow::Error::new(e).context("create admin").into()),
        }
    }

    async fn list(&self, role: Option<AdminRole>) -> Result<Vec<Admin>, AdminError> {
        let mut query = admins::Entity::find();
        if let Some(role) = role {
            query = query.filter(admins::Column::Role.eq(role.as_str()));
        }
        let rows = query
            .find_also_related(employee_permissions::Entity)
            .order_by_desc(admins::Column::CreatedAt)
            .all(&self.db)
            .await
            .context("list admins")?;
        Ok(rows
            .into_iter()
            .map(|(admin, perms)| admin_from_model(admin, perms))
            .collect::<anyhow::Result<_>>()?)
    }

    async fn update_permissions(
        &self,
        id: Uuid,
        permissions: &PermissionSet,
    ) -> Result<(), AdminError> {
        let permissions = *permissions;
        self.db
            .transaction::<_, (), DbErr>(move |txn| {
                Box::pin(async move {
                    let now = Utc::now();
                    employee_permissions::Entity::insert(permissions_active_model(
                        id,
                        &permissions,
                        now,
                    ))
                    .on_conflict(
                        OnConflict::column(employee_permissions::Column::AdminId)
                            .update_columns([
                                employee_permissions::Column::CanVerifyProperties,
                                employee_permissions::Column::CanManageUsers,
                                employee_permissions::Column::CanManageProperties,
                                employee_permissions::Column::CanManageAgreements,
                                employee_permissions::Column::CanViewActivityLogs,
                                employee_permissions::Column::UpdatedAt,
                            ])
                            .to_owned(),
                    )
                    .exec(txn)
                    .await?;
                    admins::Entity::update_many()
                        .filter(admins::Column::Id.eq(id))
                        .col_expr(admins::Column::UpdatedAt, Expr::value(now))
                        .exec(txn)
                        .await?;
                    Ok(())
                })
            })
            .await
            .context("update admin permissions")?;
        Ok(())
    }

    async fn set_active(&self, id: Uuid, active: bool) -> Result<(), AdminError> {
        admins::Entity::update_many()
            .filter(admins::Column::Id.eq(id))
            .col_expr(admins::Column::IsActive, Expr::value(active))
            .col_expr(admins::Column::UpdatedAt, Expr::value(Utc::now()))
            .exec(&self.db)
            .await
            .context("set admin active flag")?;
        Ok(())
    }

    async fn touch_last_login(&self, id: Uuid, at: DateTime<Utc>) -> Result<(), AdminError> {
        admins::Entity::update_many()
            .filter(admins::Column::Id.eq(id))
            .col_expr(admins::Column::LastLoginAt, Expr::value(at))
            .exec(&self.db)
            .await
            .context("stamp admin last login")?;
        Ok(())
    }
}

/// A missing permission row reads as no permissions.
fn admin_from_model(
    model: admins::Model,
    perms: Option<employee_permissions::Model>,
) -> anyhow::Result<Admin> {
    let role = AdminRole::parse(&model.role)
        .with_context(|| format!("unknown admin role {:?}", model.role))?;
    let permissions = perms
        .map(|p| PermissionSet {
            can_verify_properties: p.can_verify_properties,
            can_manage_users: p.can_manage_users,
            can_manage_properties: p.can_manage_properties,
            can_manage_agreements: p.can_manage_agreements,
            can_view_activity_logs: p.can_view_activity_logs,
        })
        .unwrap_or_default();
    Ok(Admin {
        id: model.id,
        name: model.name,
        email: model.email,
        password_hash: model.password_hash,
        role,
        is_active: model.is_active,
        permissions,
        last_login_at: model.last_login_at,
        created_at: model.created_at,
        updated_at: model.updated_at,
    })
}
