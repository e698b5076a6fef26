pub mod accounts;
pub mod ai;
pub mod analytics;
pub mod approvals;
pub mod auth;
pub mod brand;
pub mod inbox;
pub mod posts;
pub mod team;
pub mod workspaces;

use std::sync::Arc;

use axum::{
    http::{HeaderValue, Method},
    middleware, Router,
};
use tower_http::cors::{Any, CorsLayer};
use tracing::warn;

use crate::{
    core::state::AppState,
    middlewares::auth::require_auth,
    routes::{
        accounts::account_routes,
        ai::ai_routes,
        analytics::analytics_routes,
        approvals::approval_routes,
        auth::{auth_routes, session_routes},
        brand::brand_routes,
        inbox::inbox_routes,
        posts::post_routes,
        team::{invitation_routes, public_invitation_routes, team_routes},
        workspaces::workspace_routes,
    },
    utils::global_error_handler::global_error_handler,
};

pub fn create_routers(state: Arc<AppState>) -> Router<()> {
    let public_routes = Router::new()
        .nest("/auth", auth_routes())
        .nest("/invitations", public_invitation_routes());

    let protected_routes = Router::new()
        .nest("/auth", session_routes())
        .nest("/workspaces", workspace_routes())
        .nest("/workspaces/:workspace_id/posts", post_routes())
        .nest("/workspaces/:workspace_id/approvals", approval_routes())
        .nest("/workspaces/:workspace_id/team", team_routes())
        .nest("/workspaces/:workspace_id/accounts", account_routes())
        .nest("/workspaces/:workspace_id/inbox", inbox_routes())
        .nest("/workspaces/:workspace_id/analytics", analytics_routes())
        .nest("/workspaces/:workspace_id/ai", ai_routes())
        .nest("/workspaces/:workspace_id/brand-profiles", brand_routes())
        .nest("/invitations", invitation_routes())
        .layer(middleware::from_fn_with_state(state.clone(), require_auth));

    Router::new()
        .nest("/api", public_routes.merge(protected_routes))
        .layer(cors_layer(&state))
        .fallback(global_error_handler)
        .with_state(state)
}

/// Locked to the configured SPA origin; permissive when none is set so local
/// setups work out of the box.
fn cors_layer(state: &AppState) -> CorsLayer {
    let methods = [
        Method::GET,
        Method::POST,
        Method::PUT,
        Method::DELETE,
        Method::OPTIONS,
    ];

    match &state.config.cors_allowed_origin {
        Some(origin) => match origin.parse::<HeaderValue>() {
            Ok(origin) => CorsLayer::new()
                .allow_origin(origin)
                .allow_methods(methods)
                .allow_headers(Any),
            Err(_) => {
                warn!(
                    "Invalid CORS_ALLOWED_ORIGIN '{}', allowing any origin",
                    origin
                );
                CorsLayer::new()
                    .allow_origin(Any)
                    .allow_methods(methods)
                    .allow_headers(Any)
            }
        },
        None => CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(methods)
            .allow_headers(Any),
    }
}
