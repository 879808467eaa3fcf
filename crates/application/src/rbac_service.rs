use std::sync::Arc;

use loanflow_core::{AppError, AppResult, Principal};
use loanflow_domain::{
    AuditAction, BoundaryRule, PermissionCatalog, PlanningPolicy, Role, RoleId, can_edit,
};

use crate::rbac_ports::{AuditEvent, AuditRepository, RoleRepository};

use self::role_locks::{RoleLockGuard, RoleLocks};

mod assignments;
mod catalog;
mod role_locks;
mod roles;

#[cfg(test)]
mod tests;

/// Application service for role administration and grant assignment.
///
/// Every mutation evaluates the edit boundary itself, so callers cannot skip
/// it. Grant writes for one role are serialized.
#[derive(Clone)]
pub struct RbacService {
    catalog: Arc<PermissionCatalog>,
    repository: Arc<dyn RoleRepository>,
    audit_repository: Arc<dyn AuditRepository>,
    policy: PlanningPolicy,
    role_locks: RoleLocks,
}

impl RbacService {
    /// Creates a new service from required dependencies.
    #[must_use]
    pub fn new(
        catalog: Arc<PermissionCatalog>,
        repository: Arc<dyn RoleRepository>,
        audit_repository: Arc<dyn AuditRepository>,
        policy: PlanningPolicy,
    ) -> Self {
        Self {
            catalog,
            repository,
            audit_repository,
            policy,
            role_locks: RoleLocks::default(),
        }
    }

    /// Returns the permission catalog in use.
    #[must_use]
    pub fn catalog(&self) -> &PermissionCatalog {
        self.catalog.as_ref()
    }

    async fn load_role(&self, role_id: RoleId) -> AppResult<Role> {
        self.repository
            .find_role(role_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("role '{role_id}' not found")))
    }

    async fn load_readable_role(&self, principal: &Principal, role_id: RoleId) -> AppResult<Role> {
        let role = self.load_role(role_id).await?;
        ensure_readable(principal, &role)?;
        Ok(role)
    }

    /// Locks a role the principal may edit and returns a snapshot read under the lock.
    ///
    /// The role is checked before its lock is taken, so unknown and read-only
    /// roles never occupy the lock map.
    async fn lock_editable_role(
        &self,
        principal: &Principal,
        role_id: RoleId,
    ) -> AppResult<(RoleLockGuard, Role)> {
        let role = self.load_readable_role(principal, role_id).await?;
        can_edit(principal, &role).require_editable()?;

        let guard = self.role_locks.acquire(role_id).await;
        let current = self.load_readable_role(principal, role_id).await?;
        Ok((guard, current))
    }

    async fn append_audit(
        &self,
        principal: &Principal,
        role: &Role,
        action: AuditAction,
        detail: String,
    ) -> AppResult<()> {
        self.audit_repository
            .append_event(AuditEvent {
                tenant_id: role.tenant_id(),
                subject: principal.subject().to_owned(),
                action,
                resource_type: "rbac_role".to_owned(),
                resource_id: role.id().to_string(),
                detail: Some(detail),
            })
            .await
    }
}

/// Tenant operators may read their own tenant's roles and tenant-less roles.
fn ensure_readable(principal: &Principal, role: &Role) -> AppResult<()> {
    match (principal.tenant_id(), role.tenant_id()) {
        (Some(own), Some(owner)) if own != owner => Err(AppError::BoundaryDenied(
            BoundaryRule::CrossTenantRole.reason().to_owned(),
        )),
        _ => Ok(()),
    }
}
