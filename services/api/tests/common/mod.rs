//! Shared fixtures for the HTTP integration tests: in-memory port fakes and a
//! helper that serves the real router on an ephemeral local port.

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use portfolio_api::health::HealthReporter;
use portfolio_api::web::{router, AppState, VersionTable};
use portfolio_core::domain::{
    BottomHeadline, Experience, PortfolioAggregate, RepoData, ScanReport, Skill, User,
};
use portfolio_core::ports::{
    LivenessProbe, PortError, PortResult, PortfolioInclude, PortfolioRepository,
};
use portfolio_core::service::PortfolioService;
use serde_json::json;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

pub enum RepoBehaviour {
    Portfolio,
    Empty,
    Broken,
}

pub struct FakeRepo(pub RepoBehaviour);

#[async_trait]
impl PortfolioRepository for FakeRepo {
    async fn find_first_portfolio(
        &self,
        include: PortfolioInclude,
    ) -> PortResult<Option<PortfolioAggregate>> {
        match self.0 {
            RepoBehaviour::Portfolio => {
                let mut aggregate = sample_portfolio();
                if !include.repo_data {
                    aggregate.repo_data = None;
                }
                Ok(Some(aggregate))
            }
            RepoBehaviour::Empty => Ok(None),
            RepoBehaviour::Broken => Err(PortError::Unavailable("connection refused".to_string())),
        }
    }
}

pub struct FakeProbe(pub bool);

#[async_trait]
impl LivenessProbe for FakeProbe {
    async fn query_liveness(&self) -> PortResult<()> {
        if self.0 {
            Ok(())
        } else {
            Err(PortError::Unavailable("connection refused".to_string()))
        }
    }
}

fn date(year: i32, month: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, 1, 0, 0, 0).unwrap()
}

pub fn sample_portfolio() -> PortfolioAggregate {
    let mut aggregate = PortfolioAggregate::empty(User {
        id: 1,
        name: "Jane Doe".to_string(),
        email: "jane@example.com".to_string(),
        headline: Some("Backend engineer".to_string()),
        summary: None,
        copyrights: None,
        location: Some("Lisbon".to_string()),
        phone: None,
        socials: Some(json!("{\"github\":\"janedoe\",\"mastodon\":\"@jane\"}")),
    });
    aggregate.skills.push(Skill {
        id: 1,
        user_id: 1,
        name: "Rust".to_string(),
        category: "Languages".to_string(),
        level: None,
    });
    aggregate.experiences.push(Experience {
        id: 1,
        user_id: 1,
        title: "Engineer".to_string(),
        company: "Acme".to_string(),
        location: None,
        start_date: date(2021, 3),
        end_date: None,
        description: None,
        bullets: None,
        tech_stack: Some(vec!["axum".to_string()]),
        order: Some(1),
    });
    aggregate.scan_reports.push(ScanReport {
        id: 1,
        user_id: 1,
        kind: "sonar".to_string(),
        commit_sha: Some("abc123".to_string()),
        run_at: date(2024, 5),
        artifact_url: None,
        summary: Some(json!({ "bugs": 2, "invalidField": "x", "qualityGate": "passed" })),
    });
    aggregate.bottom_headlines = vec![
        BottomHeadline { id: 1, user_id: 1, text: "First".to_string(), order: 1 },
        BottomHeadline { id: 2, user_id: 1, text: "Second".to_string(), order: 2 },
    ];
    aggregate.repo_data = Some(RepoData {
        backend_repo: Some("https://github.com/janedoe/api".to_string()),
        frontend_repo: Some("https://github.com/janedoe/web".to_string()),
        ..RepoData::default()
    });
    aggregate
}

/// Serves the application router on 127.0.0.1 and returns its base URL.
pub async fn spawn_app(repo: RepoBehaviour, db_up: bool) -> String {
    let repo: Arc<dyn PortfolioRepository> = Arc::new(FakeRepo(repo));
    let state = Arc::new(AppState {
        portfolio: PortfolioService::new(repo),
        health: HealthReporter::new(Arc::new(FakeProbe(db_up)), "9.9.9", Instant::now()),
        versions: VersionTable::new("2"),
    });
    serve(router(state)).await
}

/// Serves any router on an ephemeral port and returns its base URL.
pub async fn serve(app: axum::Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind test listener");
    let addr: SocketAddr = listener.local_addr().expect("listener address");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("test server");
    });
    format!("http://{}", addr)
}
