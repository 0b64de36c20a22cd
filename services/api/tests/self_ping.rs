//! Integration tests for the self-ping scheduler against a real local HTTP server.

mod common;

use axum::{http::StatusCode, routing::get, Router};
use portfolio_api::config::SelfPingSettings;
use portfolio_api::tasks::{PingOutcome, SelfPingScheduler};
use std::time::Duration;

fn settings(url: String) -> SelfPingSettings {
    SelfPingSettings {
        url: Some(url),
        interval: Duration::from_secs(600),
        timeout: Duration::from_secs(5),
    }
}

#[tokio::test]
async fn reports_the_status_of_a_reachable_target() -> Result<(), Box<dyn std::error::Error>> {
    let app = Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/sleeping", get(|| async { StatusCode::SERVICE_UNAVAILABLE }));
    let base = common::serve(app).await;

    let healthy = SelfPingScheduler::new(settings(format!("{}/health", base)))?;
    assert!(matches!(
        healthy.ping_self().await,
        PingOutcome::Responded { status: 200, .. }
    ));

    // Non-2xx answers still count as a response, not a failure.
    let sleeping = SelfPingScheduler::new(settings(format!("{}/sleeping", base)))?;
    assert!(matches!(
        sleeping.ping_self().await,
        PingOutcome::Responded { status: 503, .. }
    ));
    Ok(())
}

#[tokio::test]
async fn slow_target_times_out() -> Result<(), Box<dyn std::error::Error>> {
    let app = Router::new().route(
        "/slow",
        get(|| async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            "late"
        }),
    );
    let base = common::serve(app).await;

    let mut config = settings(format!("{}/slow", base));
    config.timeout = Duration::from_millis(100);
    let scheduler = SelfPingScheduler::new(config)?;

    match scheduler.ping_self().await {
        PingOutcome::Failed { elapsed } => assert!(elapsed < Duration::from_secs(5)),
        other => panic!("expected a timeout, got {:?}", other),
    }
    assert_eq!(scheduler.ping_count(), 1);
    Ok(())
}
