//! services/api/src/tasks/keep_alive.rs
//!
//! Periodic `SELECT 1` against the database so the provider never idles the
//! connection, plus a slower health check that retries a bounded number of
//! times before giving up until its next scheduled run.

use portfolio_core::ports::LivenessProbe;
use std::sync::Arc;
use std::time::Instant;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{error, info, warn};

use super::TaskSet;
use crate::config::KeepAliveSettings;

/// How a health check ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecoveryOutcome {
    /// The first probe succeeded.
    Healthy,
    /// A retry succeeded; `attempts` counts the retries made.
    Recovered { attempts: u32 },
    /// Every retry failed.
    StillDown { attempts: u32 },
    /// Shutdown interrupted the retry loop.
    Cancelled,
}

pub struct KeepAliveScheduler {
    probe: Arc<dyn LivenessProbe>,
    settings: KeepAliveSettings,
    tasks: TaskSet,
}

impl KeepAliveScheduler {
    pub fn new(probe: Arc<dyn LivenessProbe>, settings: KeepAliveSettings) -> Self {
        Self {
            probe,
            settings,
            tasks: TaskSet::default(),
        }
    }

    /// Spawns the ping timer and the health-check timer. Both probe immediately.
    pub fn start(self: &Arc<Self>) {
        let Some(token) = self.tasks.begin() else {
            warn!("Keep-alive scheduler already started");
            return;
        };
        info!(
            ping_interval_secs = self.settings.ping_interval.as_secs(),
            health_check_interval_secs = self.settings.health_check_interval.as_secs(),
            retry_attempts = self.settings.retry_attempts,
            retry_wait_secs = self.settings.retry_wait.as_secs(),
            "Keep-alive scheduler started"
        );

        let this = Arc::clone(self);
        let ping_token = token.clone();
        self.tasks.spawn(async move {
            let mut ticker = interval(this.settings.ping_interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    _ = ping_token.cancelled() => break,
                    _ = ticker.tick() => {
                        this.ping_db().await;
                    }
                }
            }
        });

        let this = Arc::clone(self);
        self.tasks.spawn(async move {
            let mut ticker = interval(this.settings.health_check_interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    _ = token.cancelled() => break,
                    _ = ticker.tick() => {
                        if this.daily_check().await == RecoveryOutcome::Cancelled {
                            break;
                        }
                    }
                }
            }
        });
    }

    /// Cancels both timers and any pending retry wait.
    pub async fn stop(&self) {
        if self.tasks.is_running() {
            self.tasks.stop().await;
            info!("Keep-alive scheduler stopped");
        }
    }

    /// One liveness probe. Failures are logged, never retried here.
    pub async fn ping_db(&self) -> bool {
        let started = Instant::now();
        match self.probe.query_liveness().await {
            Ok(()) => {
                info!(
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "Database keep-alive ping succeeded"
                );
                true
            }
            Err(e) => {
                warn!(
                    error = %e,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "Database keep-alive ping failed"
                );
                false
            }
        }
    }

    /// Probes once and falls into [`recover`](Self::recover) on failure.
    pub async fn daily_check(&self) -> RecoveryOutcome {
        match self.probe.query_liveness().await {
            Ok(()) => {
                info!("Daily database health check passed");
                RecoveryOutcome::Healthy
            }
            Err(e) => {
                warn!(error = %e, "Daily database health check failed, starting recovery");
                self.recover().await
            }
        }
    }

    /// Waits `retry_wait` before each of up to `retry_attempts` probes.
    ///
    /// Attempts run strictly one after another and the loop stops at the first success.
    pub async fn recover(&self) -> RecoveryOutcome {
        let max = self.settings.retry_attempts;
        let token = self.tasks.token();

        for attempt in 1..=max {
            tokio::select! {
                _ = token.cancelled() => {
                    info!(attempt, "Database recovery cancelled by shutdown");
                    return RecoveryOutcome::Cancelled;
                }
                _ = tokio::time::sleep(self.settings.retry_wait) => {}
            }

            match self.probe.query_liveness().await {
                Ok(()) => {
                    info!(attempts = attempt, "Database recovered after {} attempts", attempt);
                    return RecoveryOutcome::Recovered { attempts: attempt };
                }
                Err(e) => warn!(error = %e, attempt, max, "Database recovery attempt failed"),
            }
        }

        error!(
            attempts = max,
            "Database still down after {} attempts, waiting for the next health check", max
        );
        RecoveryOutcome::StillDown { attempts: max }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use portfolio_core::ports::{PortError, PortResult};
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;

    /// Answers from a script of results, then succeeds (or fails) forever.
    struct ScriptedProbe {
        script: Mutex<VecDeque<bool>>,
        fallback: bool,
        calls: AtomicUsize,
    }

    impl ScriptedProbe {
        fn new(script: &[bool], fallback: bool) -> Arc<Self> {
            Arc::new(Self {
                script: Mutex::new(script.iter().copied().collect()),
                fallback,
                calls: AtomicUsize::new(0),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl LivenessProbe for ScriptedProbe {
        async fn query_liveness(&self) -> PortResult<()> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let ok = self.script.lock().unwrap().pop_front().unwrap_or(self.fallback);
            if ok {
                Ok(())
            } else {
                Err(PortError::Unavailable("connection reset".to_string()))
            }
        }
    }

    fn settings(retry_attempts: u32) -> KeepAliveSettings {
        KeepAliveSettings {
            ping_interval: Duration::from_secs(300),
            health_check_interval: Duration::from_secs(86_400),
            retry_attempts,
            retry_wait: Duration::from_secs(30),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn healthy_check_probes_once() {
        let probe = ScriptedProbe::new(&[], true);
        let scheduler = KeepAliveScheduler::new(probe.clone(), settings(10));

        assert_eq!(scheduler.daily_check().await, RecoveryOutcome::Healthy);
        assert_eq!(probe.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn recovers_after_n_failures() {
        // Three failures (the initial probe and two retries), then success.
        let probe = ScriptedProbe::new(&[false, false, false], true);
        let scheduler = KeepAliveScheduler::new(probe.clone(), settings(10));
        let started = tokio::time::Instant::now();

        let outcome = scheduler.daily_check().await;

        assert_eq!(outcome, RecoveryOutcome::Recovered { attempts: 3 });
        assert_eq!(probe.calls(), 4);
        assert_eq!(started.elapsed(), Duration::from_secs(90));
    }

    #[tokio::test(start_paused = true)]
    async fn gives_up_after_max_attempts() {
        let probe = ScriptedProbe::new(&[], false);
        let scheduler = KeepAliveScheduler::new(probe.clone(), settings(10));

        let outcome = scheduler.daily_check().await;

        assert_eq!(outcome, RecoveryOutcome::StillDown { attempts: 10 });
        assert_eq!(probe.calls(), 11);
    }

    #[tokio::test(start_paused = true)]
    async fn ping_reports_failure_without_retrying() {
        let probe = ScriptedProbe::new(&[false], true);
        let scheduler = KeepAliveScheduler::new(probe.clone(), settings(10));

        assert!(!scheduler.ping_db().await);
        assert!(scheduler.ping_db().await);
        assert_eq!(probe.calls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn timers_probe_immediately_then_on_period() {
        let probe = ScriptedProbe::new(&[], true);
        let scheduler = Arc::new(KeepAliveScheduler::new(probe.clone(), settings(10)));

        scheduler.start();
        tokio::time::sleep(Duration::from_millis(1)).await;
        // One immediate ping plus one immediate health check.
        assert_eq!(probe.calls(), 2);

        tokio::time::sleep(Duration::from_secs(300)).await;
        assert_eq!(probe.calls(), 3);

        scheduler.stop().await;
        tokio::time::sleep(Duration::from_secs(3_600)).await;
        assert_eq!(probe.calls(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn restart_after_stop_resumes_the_timers() {
        let probe = ScriptedProbe::new(&[], true);
        let scheduler = Arc::new(KeepAliveScheduler::new(probe.clone(), settings(10)));

        scheduler.start();
        tokio::time::sleep(Duration::from_millis(1)).await;
        assert_eq!(probe.calls(), 2);
        scheduler.stop().await;

        scheduler.start();
        tokio::time::sleep(Duration::from_millis(1)).await;
        assert_eq!(probe.calls(), 4);

        tokio::time::sleep(Duration::from_secs(300)).await;
        assert_eq!(probe.calls(), 5);
        scheduler.stop().await;
    }

    #[tokio::test(start_paused = true)]
    async fn stop_cancels_a_pending_retry_wait() {
        let probe = ScriptedProbe::new(&[], false);
        let scheduler = Arc::new(KeepAliveScheduler::new(probe.clone(), settings(10)));

        scheduler.start();
        tokio::time::sleep(Duration::from_millis(1)).await;
        assert_eq!(probe.calls(), 2);

        let started = tokio::time::Instant::now();
        scheduler.stop().await;
        assert!(started.elapsed() < Duration::from_secs(30));

        tokio::time::sleep(Duration::from_secs(600)).await;
        assert_eq!(probe.calls(), 2);

        // A second stop is a no-op.
        scheduler.stop().await;
    }
}
