//! crates/portfolio_core/src/service.rs
//!
//! The two read operations behind the versioned portfolio route.

use std::sync::Arc;

use crate::domain::PortfolioAggregate;
use crate::mapper::map_portfolio;
use crate::ports::{PortResult, PortfolioInclude, PortfolioRepository};
use crate::view::PortfolioView;

/// Read-only access to the single portfolio, in raw or mapped form.
///
/// Both operations return `Ok(None)` when there is no user row. Repository
/// failures are passed through unchanged.
#[derive(Clone)]
pub struct PortfolioService {
    repo: Arc<dyn PortfolioRepository>,
}

impl PortfolioService {
    pub fn new(repo: Arc<dyn PortfolioRepository>) -> Self {
        Self { repo }
    }

    /// Version 1: the stored rows as-is, without repo data.
    pub async fn get_portfolio_raw(&self) -> PortResult<Option<PortfolioAggregate>> {
        self.repo
            .find_first_portfolio(PortfolioInclude { repo_data: false })
            .await
    }

    /// Version 2: rows plus repo data, passed through the mapper.
    pub async fn get_portfolio_mapped(&self) -> PortResult<Option<PortfolioView>> {
        let aggregate = self
            .repo
            .find_first_portfolio(PortfolioInclude { repo_data: true })
            .await?;
        Ok(aggregate.map(map_portfolio))
    }
}
