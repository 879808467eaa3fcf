use axum::Router;
use axum::middleware::from_fn;
use axum::routing::{get, post, put};
use loanflow_core::AppError;
use tower_http::trace::TraceLayer;

use crate::state::AppState;
use crate::{handlers, middleware};

mod cors;

use cors::build_cors_layer;

pub fn build_router(app_state: AppState, frontend_url: &str) -> Result<Router, AppError> {
    let protected_routes = Router::new()
        .route(
            "/api/rbac/roles",
            get(handlers::rbac::list_roles_handler).post(handlers::rbac::create_role_handler),
        )
        .route(
            "/api/rbac/roles/{role_id}",
            get(handlers::rbac::get_role_handler)
                .put(handlers::rbac::update_role_handler)
                .delete(handlers::rbac::delete_role_handler),
        )
        .route(
            "/api/rbac/roles/{role_id}/status",
            post(handlers::rbac::toggle_role_status_handler)
                .put(handlers::rbac::set_role_status_handler),
        )
        .route(
            "/api/rbac/roles/{role_id}/boundary",
            get(handlers::rbac::role_boundary_handler),
        )
        .route(
            "/api/rbac/roles/{role_id}/matrix",
            get(handlers::rbac::permission_matrix_handler),
        )
        .route(
            "/api/rbac/roles/{role_id}/assignable",
            get(handlers::rbac::assignable_permissions_handler),
        )
        .route(
            "/api/rbac/roles/{role_id}/permissions",
            put(handlers::rbac::bulk_assign_permissions_handler),
        )
        .route(
            "/api/rbac/roles/{role_id}/permissions/{permission_key}",
            post(handlers::rbac::assign_permission_handler)
                .delete(handlers::rbac::revoke_permission_handler),
        )
        .route(
            "/api/rbac/effective-permissions",
            post(handlers::rbac::effective_permissions_handler),
        )
        .route_layer(from_fn(middleware::require_principal));

    Ok(Router::new()
        .route("/health", get(handlers::health::health_handler))
        .route(
            "/api/rbac/permissions",
            get(handlers::rbac::list_permissions_handler),
        )
        .merge(protected_routes)
        .layer(TraceLayer::new_for_http())
        .layer(build_cors_layer(frontend_url)?)
        .with_state(app_state))
}
