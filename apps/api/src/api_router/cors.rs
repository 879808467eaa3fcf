use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderName, HeaderValue, Method};
use loanflow_core::AppError;
use tower_http::cors::CorsLayer;

use crate::middleware::{PRINCIPAL_SUBJECT_HEADER, PRINCIPAL_TENANT_HEADER};

pub(super) fn build_cors_layer(frontend_url: &str) -> Result<CorsLayer, AppError> {
    Ok(CorsLayer::new()
        .allow_origin(
            HeaderValue::from_str(frontend_url)
                .map_err(|error| AppError::Internal(format!("invalid FRONTEND_URL: {error}")))?,
        )
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            CONTENT_TYPE,
            HeaderName::from_static(PRINCIPAL_SUBJECT_HEADER),
            HeaderName::from_static(PRINCIPAL_TENANT_HEADER),
        ]))
}
