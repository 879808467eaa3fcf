use chrono::{DateTime, Utc};

use loanflow_core::TenantId;
use loanflow_domain::{
    BoundaryDecision, GrantPlan, PermissionKey, Role, RoleId, RoleStatus, Space, SpaceFilter,
};

/// Input payload for creating a role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateRoleInput {
    /// Role name, unique within its space and tenant.
    pub name: String,
    /// Optional description.
    pub description: Option<String>,
    /// Role space.
    pub space: Space,
    /// Owning tenant. Tenant operators default to their own tenant.
    pub tenant_id: Option<TenantId>,
    /// Optional parent role; it must exist.
    pub parent_role_id: Option<RoleId>,
    /// Initial grants. At least one is required.
    pub permissions: Vec<PermissionKey>,
}

/// Input payload for renaming or re-describing a role.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateRoleInput {
    /// New name.
    pub name: Option<String>,
    /// New description. An empty string clears it.
    pub description: Option<String>,
}

impl UpdateRoleInput {
    /// Returns whether no field was supplied.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.description.is_none()
    }
}

/// Filter for role listings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RoleListQuery {
    /// Space restriction.
    pub space: SpaceFilter,
    /// Tenant restriction.
    pub tenant_id: Option<TenantId>,
    /// Includes inactive roles when set.
    pub include_inactive: bool,
}

impl RoleListQuery {
    /// Returns whether a live role passes the filter.
    #[must_use]
    pub fn matches(&self, role: &Role) -> bool {
        self.space.admits(role.space())
            && self
                .tenant_id
                .is_none_or(|tenant_id| role.tenant_id() == Some(tenant_id))
            && (self.include_inactive || role.status() == RoleStatus::Active)
    }
}

/// Role projection for listings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleSummary {
    /// Role identifier.
    pub role_id: RoleId,
    /// Role name.
    pub name: String,
    /// Optional description.
    pub description: Option<String>,
    /// Role space.
    pub space: Space,
    /// Owning tenant.
    pub tenant_id: Option<TenantId>,
    /// Lifecycle status.
    pub status: RoleStatus,
    /// Number of granted keys.
    pub permission_count: usize,
    /// Last modification.
    pub updated_at: DateTime<Utc>,
}

impl From<&Role> for RoleSummary {
    fn from(role: &Role) -> Self {
        Self {
            role_id: role.id(),
            name: role.name().as_str().to_owned(),
            description: role.description().map(str::to_owned),
            space: role.space(),
            tenant_id: role.tenant_id(),
            status: role.status(),
            permission_count: role.grants().len(),
            updated_at: role.updated_at(),
        }
    }
}

/// Role together with the caller's edit boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleDetail {
    /// The role and its grants.
    pub role: Role,
    /// Whether the caller may mutate it.
    pub boundary: BoundaryDecision,
}

/// Outcome of a grant replacement.
///
/// `role` carries the stored grants, which for tenant roles include the
/// essential permissions even when the request omitted them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssignmentResult {
    /// Role after the replacement.
    pub role: Role,
    /// Number of keys granted after the replacement.
    pub count: usize,
    /// Keys newly granted.
    pub added: Vec<PermissionKey>,
    /// Keys no longer granted.
    pub removed: Vec<PermissionKey>,
    /// Essential keys put back although the request left them out.
    pub essential_restored: Vec<PermissionKey>,
    /// Accepted keys from outside the role's own space.
    pub flagged: Vec<PermissionKey>,
}

impl AssignmentResult {
    pub(crate) fn from_plan(role: Role, plan: &GrantPlan) -> Self {
        Self {
            count: role.grants().len(),
            role,
            added: plan.delta().to_add.clone(),
            removed: plan.delta().to_remove.clone(),
            essential_restored: plan.essential_restored().to_vec(),
            flagged: plan.flagged().to_vec(),
        }
    }
}

/// One tenant a multi-tenant creation could not serve.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TenantCreationFailure {
    /// Tenant that failed.
    pub tenant_id: TenantId,
    /// Error message.
    pub message: String,
}

/// Outcome of creating one role per tenant.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MultiTenantCreation {
    /// Roles that were created.
    pub created: Vec<Role>,
    /// Tenants that were skipped.
    pub failed: Vec<TenantCreationFailure>,
}
