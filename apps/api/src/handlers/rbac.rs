use axum::Json;
use axum::extract::{Extension, Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use loanflow_core::{AppError, AppResult, Principal, TenantId};
use loanflow_domain::{PermissionKey, RoleId};

use crate::dto::{
    AssignableQuery, AssignmentResponse, BoundaryResponse, BulkAssignRequest, CreateRoleRequest,
    CreateRoleResponse, EffectivePermissionsRequest, EffectivePermissionsResponse, MatrixResponse,
    PermissionListQuery, PermissionResponse, RoleDetailResponse, RoleListParams, RoleResponse,
    RoleSummaryResponse, SetRoleStatusRequest, UpdateRoleRequest,
};
use crate::error::ApiResult;
use crate::state::AppState;

mod assignments;
mod permissions;
mod roles;

pub use assignments::{
    assign_permission_handler, bulk_assign_permissions_handler, revoke_permission_handler,
};
pub use permissions::{
    assignable_permissions_handler, effective_permissions_handler, list_permissions_handler,
    permission_matrix_handler,
};
pub use roles::{
    create_role_handler, delete_role_handler, get_role_handler, list_roles_handler,
    role_boundary_handler, set_role_status_handler, toggle_role_status_handler,
    update_role_handler,
};

fn parse_role_id(value: &str) -> AppResult<RoleId> {
    value.parse()
}

fn parse_tenant_id(value: i64) -> AppResult<TenantId> {
    TenantId::new(value)
}

fn parse_permission_keys(values: &[String]) -> AppResult<Vec<PermissionKey>> {
    values
        .iter()
        .map(|value| PermissionKey::parse(value))
        .collect()
}

fn key_strings<'a>(keys: impl IntoIterator<Item = &'a PermissionKey>) -> Vec<String> {
    keys.into_iter().map(ToString::to_string).collect()
}
