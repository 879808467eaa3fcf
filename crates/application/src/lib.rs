//! Application services and ports.

#![forbid(unsafe_code)]

mod rbac_ports;
mod rbac_service;

pub use rbac_ports::{
    AssignmentResult, AuditEvent, AuditRepository, CreateRoleInput, MultiTenantCreation,
    RoleDetail, RoleListQuery, RoleRepository, RoleSummary, TenantCreationFailure,
    UpdateRoleInput,
};
pub use rbac_service::RbacService;
