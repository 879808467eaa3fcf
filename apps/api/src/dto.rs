use serde::Serialize;

mod rbac;

pub use rbac::{
    AssignableQuery, AssignmentResponse, BoundaryResponse, BulkAssignRequest, CreateRoleRequest,
    CreateRoleResponse, EffectivePermissionsRequest, EffectivePermissionsResponse,
    MatrixResponse, PermissionListQuery, PermissionResponse, RoleDetailResponse, RoleListParams,
    RoleResponse, RoleSummaryResponse, SetRoleStatusRequest, UpdateRoleRequest,
};

/// Health response payload.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}
