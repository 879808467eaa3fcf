use loanflow_domain::{Product, ScopingOptions, SpaceFilter};

use super::*;

pub async fn list_permissions_handler(
    State(state): State<AppState>,
    Query(query): Query<PermissionListQuery>,
) -> ApiResult<Json<Vec<PermissionResponse>>> {
    let space = query
        .space
        .as_deref()
        .map(str::parse::<SpaceFilter>)
        .transpose()?
        .unwrap_or_default();
    let product = query
        .product
        .as_deref()
        .map(str::parse::<Product>)
        .transpose()?;

    let permissions = state
        .rbac_service
        .list_permissions(space, product)
        .iter()
        .map(PermissionResponse::from)
        .collect();

    Ok(Json(permissions))
}

pub async fn assignable_permissions_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(role_id): Path<String>,
    Query(query): Query<AssignableQuery>,
) -> ApiResult<Json<Vec<PermissionResponse>>> {
    let options = ScopingOptions {
        product: query
            .product
            .as_deref()
            .map(str::parse::<Product>)
            .transpose()?,
        include_tenant_for_system: query.include_tenant,
    };

    let permissions = state
        .rbac_service
        .assignable_permissions(&principal, parse_role_id(&role_id)?, options)
        .await?
        .iter()
        .map(PermissionResponse::from)
        .collect();

    Ok(Json(permissions))
}

pub async fn permission_matrix_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(role_id): Path<String>,
) -> ApiResult<Json<MatrixResponse>> {
    let role_id = parse_role_id(&role_id)?;
    let matrix = state
        .rbac_service
        .permission_matrix(&principal, role_id)
        .await?;
    let summary = matrix.summary();

    Ok(Json(MatrixResponse {
        role_id: role_id.to_string(),
        matrix,
        summary,
    }))
}

pub async fn effective_permissions_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Json(payload): Json<EffectivePermissionsRequest>,
) -> ApiResult<Json<EffectivePermissionsResponse>> {
    if payload.role_ids.is_empty() {
        return Err(AppError::Validation("at least one role id is required".to_owned()).into());
    }

    let role_ids = payload
        .role_ids
        .iter()
        .map(|value| parse_role_id(value))
        .collect::<AppResult<Vec<_>>>()?;
    let required = parse_permission_keys(&payload.any_of)?;

    let effective = state
        .rbac_service
        .effective_permissions(&principal, &role_ids)
        .await?;

    Ok(Json(EffectivePermissionsResponse {
        permissions: key_strings(effective.grants().iter()),
        allowed: effective.allows_any(&required),
    }))
}
