//! Loanflow RBAC API composition root.

#![forbid(unsafe_code)]

mod api_config;
mod api_router;
mod dto;
mod error;
mod handlers;
mod middleware;
mod state;

use std::sync::Arc;

use loanflow_application::RbacService;
use loanflow_core::AppError;
use loanflow_domain::PermissionCatalog;
use loanflow_infrastructure::{InMemoryAuditRepository, InMemoryRoleRepository};
use tracing::info;

use crate::api_config::{ApiConfig, init_tracing};
use crate::api_router::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = ApiConfig::load()?;
    let address = config.socket_address()?;

    let catalog = Arc::new(PermissionCatalog::standard()?);
    info!(
        permission_count = catalog.len(),
        allow_system_tenant_override = config.allow_system_tenant_override,
        "permission catalog loaded"
    );

    let rbac_service = RbacService::new(
        catalog,
        Arc::new(InMemoryRoleRepository::new()),
        Arc::new(InMemoryAuditRepository::new()),
        config.planning_policy(),
    );
    let app = build_router(AppState { rbac_service }, &config.frontend_url)?;

    let listener = tokio::net::TcpListener::bind(address)
        .await
        .map_err(|error| AppError::Internal(format!("failed to bind {address}: {error}")))?;

    info!(%address, "loanflow-api listening");

    axum::serve(listener, app)
        .await
        .map_err(|error| AppError::Internal(format!("server error: {error}")))
}
