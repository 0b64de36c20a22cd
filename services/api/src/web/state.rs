//! services/api/src/web/state.rs
//!
//! Defines the application's shared state and the version dispatch table.

use crate::health::HealthReporter;
use portfolio_core::service::PortfolioService;

//=========================================================================================
// AppState (Shared Across All Requests)
//=========================================================================================

/// The shared application state, created once at startup and passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub portfolio: PortfolioService,
    pub health: HealthReporter,
    pub versions: VersionTable,
}

//=========================================================================================
// Version Dispatch
//=========================================================================================

/// The response shapes served on the portfolio route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiVersion {
    /// Rows as stored, without repo data.
    Raw,
    /// The normalised client view.
    Mapped,
}

/// Maps `Version` header tokens to response shapes.
///
/// `"1"` selects the raw shape and the configured default token selects the
/// mapped one. Any other token resolves to nothing.
#[derive(Debug, Clone)]
pub struct VersionTable {
    default_token: String,
    entries: Vec<(String, ApiVersion)>,
}

impl VersionTable {
    pub fn new(default_token: impl Into<String>) -> Self {
        let default_token = default_token.into();
        Self {
            entries: vec![
                ("1".to_string(), ApiVersion::Raw),
                (default_token.clone(), ApiVersion::Mapped),
            ],
            default_token,
        }
    }

    /// The token injected when a request carries no `Version` header.
    pub fn default_token(&self) -> &str {
        &self.default_token
    }

    /// First matching entry wins.
    pub fn resolve(&self, token: &str) -> Option<ApiVersion> {
        let token = token.trim();
        self.entries
            .iter()
            .find(|(t, _)| t == token)
            .map(|(_, version)| *version)
    }
}
