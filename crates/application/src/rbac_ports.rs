mod audit;
mod repositories;
mod roles;

pub use audit::{AuditEvent, AuditRepository};
pub use repositories::RoleRepository;
pub use roles::{
    AssignmentResult, CreateRoleInput, MultiTenantCreation, RoleDetail, RoleListQuery,
    RoleSummary, TenantCreationFailure, UpdateRoleInput,
};
