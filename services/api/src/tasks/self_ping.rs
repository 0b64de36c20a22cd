//! services/api/src/tasks/self_ping.rs
//!
//! Periodic outbound GET to the service's own public URL so free-tier hosts do
//! not put it to sleep. Disabled when `SELF_PING_URL` is unset.

use chrono::{SecondsFormat, Utc};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::time::{interval_at, MissedTickBehavior};
use tracing::{error, info, warn};

use super::TaskSet;
use crate::config::SelfPingSettings;

/// Result of one fire of the self-ping timer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PingOutcome {
    /// No target URL is configured.
    Disabled,
    Responded { status: u16, elapsed: Duration },
    Failed { elapsed: Duration },
}

pub struct SelfPingScheduler {
    client: reqwest::Client,
    settings: SelfPingSettings,
    ping_count: AtomicU64,
    tasks: TaskSet,
}

impl SelfPingScheduler {
    /// Builds the HTTP client with the configured request timeout.
    pub fn new(settings: SelfPingSettings) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(settings.timeout)
            .build()?;
        Ok(Self {
            client,
            settings,
            ping_count: AtomicU64::new(0),
            tasks: TaskSet::default(),
        })
    }

    /// Number of pings issued so far.
    pub fn ping_count(&self) -> u64 {
        self.ping_count.load(Ordering::Relaxed)
    }

    /// Spawns the timer. The first ping fires one interval after start.
    pub fn start(self: &Arc<Self>) {
        let Some(url) = self.settings.url.as_deref() else {
            warn!("SELF_PING_URL not set, self-ping is disabled");
            return;
        };
        let Some(token) = self.tasks.begin() else {
            warn!("Self-ping scheduler already started");
            return;
        };
        info!(
            target_url = url,
            interval_secs = self.settings.interval.as_secs(),
            first_ping_at = %self.next_fire_time(),
            "Self-ping scheduler started"
        );

        let this = Arc::clone(self);
        self.tasks.spawn(async move {
            let period = this.settings.interval;
            let mut ticker = interval_at(tokio::time::Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    _ = token.cancelled() => break,
                    _ = ticker.tick() => {
                        this.ping_self().await;
                    }
                }
            }
        });
    }

    pub async fn stop(&self) {
        if self.tasks.is_running() {
            self.tasks.stop().await;
            info!(pings = self.ping_count(), "Self-ping scheduler stopped");
        }
    }

    /// Issues one GET, drains the body, and logs the status and round-trip time.
    /// Never retries; the next fire is the retry.
    pub async fn ping_self(&self) -> PingOutcome {
        let Some(url) = self.settings.url.as_deref() else {
            return PingOutcome::Disabled;
        };

        let ping = self.ping_count.fetch_add(1, Ordering::Relaxed) + 1;
        let started = Instant::now();
        info!(ping, target_url = url, "Pinging self");

        let result = match self.client.get(url).send().await {
            Ok(response) => {
                let status = response.status().as_u16();
                // Drain the body so the connection can be reused.
                response.bytes().await.map(|_| status)
            }
            Err(e) => Err(e),
        };
        let elapsed = started.elapsed();

        match result {
            Ok(status) => {
                info!(
                    ping,
                    status,
                    elapsed_ms = elapsed.as_millis() as u64,
                    next_ping_at = %self.next_fire_time(),
                    "Self-ping succeeded"
                );
                PingOutcome::Responded { status, elapsed }
            }
            Err(e) => {
                error!(
                    ping,
                    error = %e,
                    elapsed_ms = elapsed.as_millis() as u64,
                    next_ping_at = %self.next_fire_time(),
                    "Self-ping failed"
                );
                PingOutcome::Failed { elapsed }
            }
        }
    }

    fn next_fire_time(&self) -> String {
        let next = chrono::Duration::from_std(self.settings.interval)
            .ok()
            .and_then(|period| Utc::now().checked_add_signed(period))
            .unwrap_or_else(Utc::now);
        next.to_rfc3339_opts(SecondsFormat::Millis, true)
    }
}
