use super::*;

pub async fn bulk_assign_permissions_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(role_id): Path<String>,
    Json(payload): Json<BulkAssignRequest>,
) -> ApiResult<Json<AssignmentResponse>> {
    let keys = parse_permission_keys(&payload.permissions)?;
    let result = state
        .rbac_service
        .bulk_assign_permissions(&principal, parse_role_id(&role_id)?, keys)
        .await?;

    Ok(Json(AssignmentResponse::from(result)))
}

pub async fn assign_permission_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path((role_id, permission_key)): Path<(String, String)>,
) -> ApiResult<Json<AssignmentResponse>> {
    let result = state
        .rbac_service
        .assign_permission(
            &principal,
            parse_role_id(&role_id)?,
            PermissionKey::parse(&permission_key)?,
        )
        .await?;

    Ok(Json(AssignmentResponse::from(result)))
}

pub async fn revoke_permission_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path((role_id, permission_key)): Path<(String, String)>,
) -> ApiResult<Json<AssignmentResponse>> {
    let result = state
        .rbac_service
        .revoke_permission(
            &principal,
            parse_role_id(&role_id)?,
            PermissionKey::parse(&permission_key)?,
        )
        .await?;

    Ok(Json(AssignmentResponse::from(result)))
}
