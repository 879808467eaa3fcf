use loanflow_domain::{PermissionMatrix, PermissionSummary};
use serde::{Deserialize, Serialize};

mod conversions;

/// Query string of the catalog listing.
#[derive(Debug, Default, Deserialize)]
pub struct PermissionListQuery {
    pub space: Option<String>,
    pub product: Option<String>,
}

/// Query string of the role listing.
#[derive(Debug, Default, Deserialize)]
pub struct RoleListParams {
    pub space: Option<String>,
    pub tenant_id: Option<i64>,
    #[serde(default)]
    pub include_inactive: bool,
}

/// Query string of the assignable-permission listing.
#[derive(Debug, Default, Deserialize)]
pub struct AssignableQuery {
    pub product: Option<String>,
    #[serde(default)]
    pub include_tenant: bool,
}

/// Incoming payload for role creation.
///
/// `tenant_ids` creates one tenant role per listed tenant.
#[derive(Debug, Deserialize)]
pub struct CreateRoleRequest {
    pub name: String,
    pub description: Option<String>,
    pub space: String,
    pub tenant_id: Option<i64>,
    #[serde(default)]
    pub tenant_ids: Vec<i64>,
    pub parent_role_id: Option<String>,
    #[serde(default)]
    pub permissions: Vec<String>,
}

/// Incoming payload for role updates.
#[derive(Debug, Deserialize)]
pub struct UpdateRoleRequest {
    pub name: Option<String>,
    pub description: Option<String>,
}

/// Incoming payload forcing a role status.
#[derive(Debug, Deserialize)]
pub struct SetRoleStatusRequest {
    pub status: String,
}

/// Incoming payload replacing every grant of a role.
#[derive(Debug, Deserialize)]
pub struct BulkAssignRequest {
    pub permissions: Vec<String>,
}

/// Incoming payload for effective permission lookups.
#[derive(Debug, Deserialize)]
pub struct EffectivePermissionsRequest {
    pub role_ids: Vec<String>,
    #[serde(default)]
    pub any_of: Vec<String>,
}

/// API representation of a catalog entry.
#[derive(Debug, Serialize)]
pub struct PermissionResponse {
    pub key: String,
    pub resource: String,
    pub action: String,
    pub space: &'static str,
    pub product: Option<&'static str>,
    pub description: String,
}

/// API representation of a role with its grants.
#[derive(Debug, Serialize)]
pub struct RoleResponse {
    pub role_id: String,
    pub name: String,
    pub description: Option<String>,
    pub space: &'static str,
    pub tenant_id: Option<i64>,
    pub parent_role_id: Option<String>,
    pub status: &'static str,
    pub permissions: Vec<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// API representation of a role in listings.
#[derive(Debug, Serialize)]
pub struct RoleSummaryResponse {
    pub role_id: String,
    pub name: String,
    pub description: Option<String>,
    pub space: &'static str,
    pub tenant_id: Option<i64>,
    pub status: &'static str,
    pub permission_count: usize,
    pub updated_at: String,
}

/// API representation of a boundary evaluation.
#[derive(Debug, Serialize)]
pub struct BoundaryResponse {
    pub editable: bool,
    pub reason: &'static str,
    pub rule: &'static str,
}

/// Role plus the caller's edit boundary.
#[derive(Debug, Serialize)]
pub struct RoleDetailResponse {
    #[serde(flatten)]
    pub role: RoleResponse,
    pub boundary: BoundaryResponse,
}

/// API representation of a grant replacement.
#[derive(Debug, Serialize)]
pub struct AssignmentResponse {
    pub count: usize,
    pub role: RoleResponse,
    pub added: Vec<String>,
    pub removed: Vec<String>,
    pub essential_restored: Vec<String>,
    pub flagged: Vec<String>,
}

/// One tenant skipped by a multi-tenant creation.
#[derive(Debug, Serialize)]
pub struct TenantCreationFailureResponse {
    pub tenant_id: i64,
    pub message: String,
}

/// API representation of a multi-tenant creation.
#[derive(Debug, Serialize)]
pub struct CreateRoleResponse {
    pub created: Vec<RoleResponse>,
    pub failed: Vec<TenantCreationFailureResponse>,
}

/// Resource by action matrix with its summary.
#[derive(Debug, Serialize)]
pub struct MatrixResponse {
    pub role_id: String,
    pub matrix: PermissionMatrix,
    pub summary: PermissionSummary,
}

/// API representation of effective permissions.
#[derive(Debug, Serialize)]
pub struct EffectivePermissionsResponse {
    pub permissions: Vec<String>,
    pub allowed: bool,
}
