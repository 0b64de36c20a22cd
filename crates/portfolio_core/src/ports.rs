//! crates/portfolio_core/src/ports.rs
//!
//! Defines the service contracts (traits) the core relies on.
//! The database adapter in the `api` service implements them, and tests swap in
//! in-memory fakes.

use async_trait::async_trait;

use crate::domain::PortfolioAggregate;

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
/// This abstracts away the specific errors from external services (e.g., database, network).
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("Service unavailable: {0}")]
    Unavailable(String),
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

/// Which optional relations to load along with the portfolio collections.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PortfolioInclude {
    pub repo_data: bool,
}

#[async_trait]
pub trait PortfolioRepository: Send + Sync {
    /// Loads the first user row with every owned collection.
    ///
    /// Bottom headlines come back sorted by `order` ascending. Returns `Ok(None)`
    /// when the users table is empty.
    async fn find_first_portfolio(
        &self,
        include: PortfolioInclude,
    ) -> PortResult<Option<PortfolioAggregate>>;
}

#[async_trait]
pub trait LivenessProbe: Send + Sync {
    /// Issues a trivial round-trip query against the database.
    async fn query_liveness(&self) -> PortResult<()>;
}
