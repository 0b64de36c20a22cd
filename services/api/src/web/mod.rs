pub mod middleware;
pub mod rest;
pub mod state;

pub use middleware::default_version_header;
pub use rest::{get_portfolio_handler, health_handler, root_handler, ApiDoc};
pub use state::{ApiVersion, AppState, VersionTable};

use axum::{middleware as axum_middleware, routing::get, Router};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Builds the complete application: API routes, permissive CORS and the Swagger UI.
pub fn router(state: Arc<AppState>) -> Router {
    let api_router = Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_handler))
        .route("/api/portfolio/user", get(get_portfolio_handler))
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            default_version_header,
        ))
        .layer(CorsLayer::permissive())
        .with_state(state);

    // Merge the API router with the Swagger UI router for a complete application.
    Router::new()
        .merge(api_router)
        .merge(SwaggerUi::new("/swagger").url("/swagger-json", ApiDoc::openapi()))
}
