//! services/api/src/web/rest.rs
//!
//! Contains the Axum handlers for the REST API endpoints and the master
//! definition for the OpenAPI specification.

use crate::health::{DbStatus, HealthStatus, MemoryUsage};
use crate::web::middleware::VERSION_HEADER;
use crate::web::state::{ApiVersion, AppState};
use portfolio_core::tool_docs::ToolDoc;
use portfolio_core::view::{
    AchievementView, CertificationView, EducationView, ExperienceView, LanguageView,
    PortfolioView, ProjectView, ScanReportView, ScanSummary, SkillView, Socials,
};
use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;
use tracing::{error, instrument};
use utoipa::OpenApi;

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Portfolio Backend API",
        description = "Read-only API serving the portfolio profile, its collections and service health."
    ),
    paths(
        root_handler,
        health_handler,
        get_portfolio_handler,
    ),
    components(
        schemas(
            HealthStatus, DbStatus, MemoryUsage,
            PortfolioView, Socials, SkillView, ExperienceView, ProjectView, EducationView,
            CertificationView, AchievementView, LanguageView, ScanReportView, ScanSummary,
            ToolDoc
        )
    ),
    tags(
        (name = "Portfolio", description = "The portfolio profile in its raw and mapped shapes."),
        (name = "Health", description = "Liveness and dependency status.")
    )
)]
pub struct ApiDoc;

//=========================================================================================
// REST API Handlers
//=========================================================================================

/// Plain-text greeting, useful as a trivial reachability check.
#[utoipa::path(
    get,
    path = "/",
    responses((status = 200, description = "Greeting", body = String, content_type = "text/plain"))
)]
pub async fn root_handler() -> &'static str {
    "Hello World!"
}

/// Report process and database health.
///
/// Always answers 200; a database failure only shows up as `dbStatus: "error"`.
#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    responses((status = 200, description = "Service health", body = HealthStatus))
)]
#[instrument(skip(state))]
pub async fn health_handler(State(state): State<Arc<AppState>>) -> Json<HealthStatus> {
    Json(state.health.get_health_status().await)
}

/// Fetch the portfolio.
///
/// `Version: 1` returns the stored rows unmapped. The default version returns
/// the mapped view including repository links and the tool docs catalog. The
/// body is `null` when no profile exists.
#[utoipa::path(
    get,
    path = "/api/portfolio/user",
    tag = "Portfolio",
    params(
        ("Version" = Option<String>, Header, description = "API version token: `1` (raw) or the default `2` (mapped).")
    ),
    responses(
        (status = 200, description = "The mapped portfolio (default version), or `null` when no profile exists", body = PortfolioView),
        (status = 404, description = "No handler for the requested version"),
        (status = 500, description = "Internal server error")
    )
)]
#[instrument(skip(state, headers))]
pub async fn get_portfolio_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Response {
    // Only an absent header falls back to the default; an unreadable one matches nothing.
    let token = match headers.get(VERSION_HEADER) {
        None => Some(state.versions.default_token()),
        Some(value) => value.to_str().ok(),
    };

    match token.and_then(|t| state.versions.resolve(t)) {
        Some(ApiVersion::Raw) => respond(state.portfolio.get_portfolio_raw().await),
        Some(ApiVersion::Mapped) => respond(state.portfolio.get_portfolio_mapped().await),
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({
                "statusCode": 404,
                "message": format!(
                    "No matching version for GET /api/portfolio/user (Version: {})",
                    token.unwrap_or("<non-ASCII>")
                ),
                "error": "Not Found",
            })),
        )
            .into_response(),
    }
}

/// `Ok(None)` serialises as a JSON `null` body.
fn respond<T: Serialize>(result: portfolio_core::ports::PortResult<Option<T>>) -> Response {
    match result {
        Ok(portfolio) => Json(portfolio).into_response(),
        Err(e) => {
            error!("Failed to load portfolio: {:?}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "statusCode": 500,
                    "message": "Internal server error",
                })),
            )
                .into_response()
        }
    }
}
