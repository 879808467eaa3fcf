use loanflow_application::{
    AssignmentResult, MultiTenantCreation, RoleDetail, RoleSummary, TenantCreationFailure,
};
use loanflow_domain::{BoundaryDecision, PermissionDescriptor, PermissionKey, Role};

use super::{
    AssignmentResponse, BoundaryResponse, CreateRoleResponse, PermissionResponse,
    RoleDetailResponse, RoleResponse, RoleSummaryResponse, TenantCreationFailureResponse,
};

fn key_strings(keys: &[PermissionKey]) -> Vec<String> {
    keys.iter().map(ToString::to_string).collect()
}

impl From<&PermissionDescriptor> for PermissionResponse {
    fn from(value: &PermissionDescriptor) -> Self {
        Self {
            key: value.key().to_string(),
            resource: value.key().resource().to_owned(),
            action: value.key().action().to_owned(),
            space: value.space().as_str(),
            product: value.effective_product().map(|product| product.as_str()),
            description: value.description().to_owned(),
        }
    }
}

impl From<Role> for RoleResponse {
    fn from(value: Role) -> Self {
        Self {
            role_id: value.id().to_string(),
            name: value.name().as_str().to_owned(),
            description: value.description().map(str::to_owned),
            space: value.space().as_str(),
            tenant_id: value.tenant_id().map(|tenant_id| tenant_id.as_i64()),
            parent_role_id: value.parent_role_id().map(|role_id| role_id.to_string()),
            status: value.status().as_str(),
            permissions: key_strings(&value.grants().to_vec()),
            created_at: value.created_at().to_rfc3339(),
            updated_at: value.updated_at().to_rfc3339(),
        }
    }
}

impl From<RoleSummary> for RoleSummaryResponse {
    fn from(value: RoleSummary) -> Self {
        Self {
            role_id: value.role_id.to_string(),
            name: value.name,
            description: value.description,
            space: value.space.as_str(),
            tenant_id: value.tenant_id.map(|tenant_id| tenant_id.as_i64()),
            status: value.status.as_str(),
            permission_count: value.permission_count,
            updated_at: value.updated_at.to_rfc3339(),
        }
    }
}

impl From<BoundaryDecision> for BoundaryResponse {
    fn from(value: BoundaryDecision) -> Self {
        Self {
            editable: value.editable,
            reason: value.reason,
            rule: value.rule.as_str(),
        }
    }
}

impl From<RoleDetail> for RoleDetailResponse {
    fn from(value: RoleDetail) -> Self {
        Self {
            role: RoleResponse::from(value.role),
            boundary: BoundaryResponse::from(value.boundary),
        }
    }
}

impl From<AssignmentResult> for AssignmentResponse {
    fn from(value: AssignmentResult) -> Self {
        Self {
            count: value.count,
            added: key_strings(&value.added),
            removed: key_strings(&value.removed),
            essential_restored: key_strings(&value.essential_restored),
            flagged: key_strings(&value.flagged),
            role: RoleResponse::from(value.role),
        }
    }
}

impl From<TenantCreationFailure> for TenantCreationFailureResponse {
    fn from(value: TenantCreationFailure) -> Self {
        Self {
            tenant_id: value.tenant_id.as_i64(),
            message: value.message,
        }
    }
}

impl From<MultiTenantCreation> for CreateRoleResponse {
    fn from(value: MultiTenantCreation) -> Self {
        Self {
            created: value.created.into_iter().map(RoleResponse::from).collect(),
            failed: value
                .failed
                .into_iter()
                .map(TenantCreationFailureResponse::from)
                .collect(),
        }
    }
}
