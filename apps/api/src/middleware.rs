use axum::extract::Request;
use axum::http::HeaderMap;
use axum::middleware::Next;
use axum::response::Response;
use loanflow_core::{AppError, Principal, TenantId};

use crate::error::ApiResult;

/// Stable subject claim set by the identity layer in front of the API.
pub const PRINCIPAL_SUBJECT_HEADER: &str = "x-principal-subject";
/// Tenant affiliation of the principal. Absent for system operators.
pub const PRINCIPAL_TENANT_HEADER: &str = "x-principal-tenant-id";

pub async fn require_principal(mut request: Request, next: Next) -> ApiResult<Response> {
    let principal = principal_from_headers(request.headers())?;

    request.extensions_mut().insert(principal);
    Ok(next.run(request).await)
}

pub fn principal_from_headers(headers: &HeaderMap) -> Result<Principal, AppError> {
    let subject = header_value(headers, PRINCIPAL_SUBJECT_HEADER)?
        .ok_or_else(|| AppError::Unauthorized("principal subject is required".to_owned()))?;

    match header_value(headers, PRINCIPAL_TENANT_HEADER)? {
        Some(value) => {
            let tenant_id = value.parse::<TenantId>().map_err(|_| {
                AppError::Unauthorized(format!("invalid principal tenant id '{value}'"))
            })?;
            Ok(Principal::tenant(subject, tenant_id))
        }
        None => Ok(Principal::system(subject)),
    }
}

fn header_value(headers: &HeaderMap, name: &str) -> Result<Option<String>, AppError> {
    let Some(value) = headers.get(name) else {
        return Ok(None);
    };

    let value = value
        .to_str()
        .map_err(|_| AppError::Unauthorized(format!("header '{name}' is not valid text")))?
        .trim();

    Ok((!value.is_empty()).then(|| value.to_owned()))
}
