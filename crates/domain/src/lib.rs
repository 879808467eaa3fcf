//! Domain entities and invariants for role-based access control.

#![forbid(unsafe_code)]

mod assignment;
mod boundary;
mod catalog;
mod effective;
mod grants;
mod matrix;
mod permission;
mod role;
mod scoping;
mod security;
mod space;

pub use assignment::{GrantPlan, PlanningPolicy, plan_grant_replacement};
pub use boundary::{BoundaryDecision, BoundaryRule, can_edit, evaluate_boundary};
pub use catalog::PermissionCatalog;
pub use effective::EffectivePermissions;
pub use grants::{
    ESSENTIAL_TENANT_PERMISSIONS, GrantDelta, GrantSet, essential_tenant_permissions,
};
pub use matrix::{ActionBucket, PermissionMatrix, PermissionSummary, has_permission};
pub use permission::{PermissionDescriptor, PermissionKey};
pub use role::{NewRole, Role, RoleId, RoleStatus};
pub use scoping::{ScopingOptions, SpaceCompatibility, compatibility, filter_assignable};
pub use security::AuditAction;
pub use space::{Product, Space, SpaceFilter};
