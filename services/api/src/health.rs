//! services/api/src/health.rs
//!
//! Assembles the `/health` payload. Reporting never fails: a database failure
//! only flips `dbStatus` to `"error"`.

use chrono::{SecondsFormat, Utc};
use portfolio_core::ports::LivenessProbe;
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;
use tracing::warn;
use utoipa::ToSchema;

/// Result of the database liveness probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum DbStatus {
    Ok,
    Error,
}

/// Process memory snapshot in bytes. Zero where the platform exposes no figures.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MemoryUsage {
    pub rss: u64,
    pub virtual_size: u64,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HealthStatus {
    /// Always `"ok"` while the process is serving.
    #[schema(example = "ok")]
    pub status: String,
    /// ISO-8601 time of the check.
    pub timestamp: String,
    pub db_status: DbStatus,
    pub memory_usage: MemoryUsage,
    /// Seconds since the process started.
    pub uptime: f64,
    /// Toolchain floor and target, e.g. `rust >=1.78 (x86_64-linux)`. The key
    /// name is kept for existing clients.
    #[serde(rename = "nodeVersion")]
    pub runtime_version: String,
    pub app_version: String,
}

#[derive(Clone)]
pub struct HealthReporter {
    probe: Arc<dyn LivenessProbe>,
    started: Instant,
    app_version: String,
}

impl HealthReporter {
    /// `started` is the process start, captured first thing in `main`.
    pub fn new(
        probe: Arc<dyn LivenessProbe>,
        app_version: impl Into<String>,
        started: Instant,
    ) -> Self {
        Self {
            probe,
            started,
            app_version: app_version.into(),
        }
    }

    pub async fn get_health_status(&self) -> HealthStatus {
        let db_status = match self.probe.query_liveness().await {
            Ok(()) => DbStatus::Ok,
            Err(e) => {
                warn!(error = %e, "Health check database probe failed");
                DbStatus::Error
            }
        };

        HealthStatus {
            status: "ok".to_string(),
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            db_status,
            memory_usage: memory_usage(),
            uptime: self.started.elapsed().as_secs_f64(),
            runtime_version: runtime_version(),
            app_version: self.app_version.clone(),
        }
    }
}

/// The rustc that built the binary is not recorded; report the declared
/// minimum instead and say so.
fn runtime_version() -> String {
    let target = format!("{}-{}", std::env::consts::ARCH, std::env::consts::OS);
    match option_env!("CARGO_PKG_RUST_VERSION").filter(|v| !v.is_empty()) {
        Some(msrv) => format!("rust >={} ({})", msrv, target),
        None => format!("rust ({})", target),
    }
}

/// Reads `VmRSS` and `VmSize` from `/proc/self/status`. Those are reported in
/// kB, so no page size is involved.
fn memory_usage() -> MemoryUsage {
    std::fs::read_to_string("/proc/self/status")
        .ok()
        .and_then(|status| parse_proc_status(&status))
        .unwrap_or_default()
}

fn parse_proc_status(status: &str) -> Option<MemoryUsage> {
    let kib = |key: &str| {
        status
            .lines()
            .find_map(|line| line.strip_prefix(key))
            .and_then(|rest| rest.trim().trim_end_matches("kB").trim().parse::<u64>().ok())
            .map(|kb| kb * 1024)
    };
    Some(MemoryUsage {
        rss: kib("VmRSS:")?,
        virtual_size: kib("VmSize:")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use portfolio_core::ports::{PortError, PortResult};

    struct FixedProbe(bool);

    #[async_trait]
    impl LivenessProbe for FixedProbe {
        async fn query_liveness(&self) -> PortResult<()> {
            if self.0 {
                Ok(())
            } else {
                Err(PortError::Unavailable("connection refused".to_string()))
            }
        }
    }

    #[tokio::test]
    async fn healthy_database_reports_ok() {
        let reporter = HealthReporter::new(Arc::new(FixedProbe(true)), "1.2.3", Instant::now());
        let status = reporter.get_health_status().await;

        assert_eq!(status.status, "ok");
        assert_eq!(status.db_status, DbStatus::Ok);
        assert_eq!(status.app_version, "1.2.3");
        assert!(status.uptime >= 0.0);
    }

    #[tokio::test]
    async fn probe_failure_only_changes_db_status() {
        let reporter = HealthReporter::new(Arc::new(FixedProbe(false)), "unknown", Instant::now());
        let value = serde_json::to_value(reporter.get_health_status().await).unwrap();

        assert_eq!(value["status"], "ok");
        assert_eq!(value["dbStatus"], "error");
        assert_eq!(value["appVersion"], "unknown");
        assert!(value["timestamp"].as_str().unwrap().ends_with('Z'));
        let runtime = value["nodeVersion"].as_str().unwrap();
        assert!(runtime.starts_with("rust >=1.78 "), "{}", runtime);
        assert!(runtime.contains(std::env::consts::ARCH));
        assert!(value["memoryUsage"]["rss"].is_u64());
        assert!(value["uptime"].is_f64());
    }

    #[tokio::test]
    async fn uptime_counts_from_the_given_start() {
        let started = Instant::now()
            .checked_sub(std::time::Duration::from_secs(5))
            .unwrap();
        let reporter = HealthReporter::new(Arc::new(FixedProbe(true)), "1.2.3", started);

        assert!(reporter.get_health_status().await.uptime >= 5.0);
    }

    #[test]
    fn proc_status_sizes_are_read_in_kilobytes() {
        let status = "Name:\tapi\nVmPeak:\t  9000 kB\nVmSize:\t  8192 kB\nVmRSS:\t    512 kB\nThreads:\t4\n";
        let usage = parse_proc_status(status).unwrap();
        assert_eq!(usage.virtual_size, 8192 * 1024);
        assert_eq!(usage.rss, 512 * 1024);

        assert!(parse_proc_status("Name:\tapi\n").is_none());
        assert!(parse_proc_status("VmSize:\tlots kB\nVmRSS:\t1 kB\n").is_none());
    }
}
