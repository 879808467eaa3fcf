use loanflow_application::{CreateRoleInput, RoleListQuery, UpdateRoleInput};
use loanflow_domain::{RoleStatus, Space, SpaceFilter};

use super::*;

pub async fn list_roles_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Query(params): Query<RoleListParams>,
) -> ApiResult<Json<Vec<RoleSummaryResponse>>> {
    let space = params
        .space
        .as_deref()
        .map(str::parse::<SpaceFilter>)
        .transpose()?
        .unwrap_or_default();
    let tenant_id = params.tenant_id.map(parse_tenant_id).transpose()?;

    let roles = state
        .rbac_service
        .list_roles(
            &principal,
            RoleListQuery {
                space,
                tenant_id,
                include_inactive: params.include_inactive,
            },
        )
        .await?
        .into_iter()
        .map(RoleSummaryResponse::from)
        .collect();

    Ok(Json(roles))
}

pub async fn get_role_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(role_id): Path<String>,
) -> ApiResult<Json<RoleDetailResponse>> {
    let detail = state
        .rbac_service
        .get_role(&principal, parse_role_id(&role_id)?)
        .await?;

    Ok(Json(RoleDetailResponse::from(detail)))
}

pub async fn create_role_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Json(payload): Json<CreateRoleRequest>,
) -> ApiResult<Response> {
    let input = CreateRoleInput {
        name: payload.name,
        description: payload.description,
        space: payload.space.parse::<Space>()?,
        tenant_id: payload.tenant_id.map(parse_tenant_id).transpose()?,
        parent_role_id: payload
            .parent_role_id
            .as_deref()
            .map(parse_role_id)
            .transpose()?,
        permissions: parse_permission_keys(&payload.permissions)?,
    };

    if payload.tenant_ids.is_empty() {
        let role = state.rbac_service.create_role(&principal, input).await?;
        return Ok((StatusCode::CREATED, Json(RoleResponse::from(role))).into_response());
    }

    let tenant_ids = payload
        .tenant_ids
        .into_iter()
        .map(parse_tenant_id)
        .collect::<AppResult<Vec<_>>>()?;
    let outcome = state
        .rbac_service
        .create_role_for_tenants(&principal, input, &tenant_ids)
        .await?;

    Ok((StatusCode::CREATED, Json(CreateRoleResponse::from(outcome))).into_response())
}

pub async fn update_role_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(role_id): Path<String>,
    Json(payload): Json<UpdateRoleRequest>,
) -> ApiResult<Json<RoleResponse>> {
    let role = state
        .rbac_service
        .update_role(
            &principal,
            parse_role_id(&role_id)?,
            UpdateRoleInput {
                name: payload.name,
                description: payload.description,
            },
        )
        .await?;

    Ok(Json(RoleResponse::from(role)))
}

pub async fn toggle_role_status_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(role_id): Path<String>,
) -> ApiResult<Json<RoleResponse>> {
    let role = state
        .rbac_service
        .toggle_role_status(&principal, parse_role_id(&role_id)?)
        .await?;

    Ok(Json(RoleResponse::from(role)))
}

pub async fn set_role_status_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(role_id): Path<String>,
    Json(payload): Json<SetRoleStatusRequest>,
) -> ApiResult<Json<RoleResponse>> {
    let role = state
        .rbac_service
        .set_role_status(
            &principal,
            parse_role_id(&role_id)?,
            payload.status.parse::<RoleStatus>()?,
        )
        .await?;

    Ok(Json(RoleResponse::from(role)))
}

pub async fn delete_role_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(role_id): Path<String>,
) -> ApiResult<StatusCode> {
    state
        .rbac_service
        .delete_role(&principal, parse_role_id(&role_id)?)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn role_boundary_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(role_id): Path<String>,
) -> ApiResult<Json<BoundaryResponse>> {
    let decision = state
        .rbac_service
        .role_boundary(&principal, parse_role_id(&role_id)?)
        .await?;

    Ok(Json(BoundaryResponse::from(decision)))
}
