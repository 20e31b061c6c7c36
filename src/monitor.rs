/// Sweep statistics kept for the lifetime of the service worker
use serde::Serialize;

/// Summary is logged every this many checks
pub const LOG_EVERY_CHECKS: u64 = 100;

#[derive(Debug, Default, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Metrics {
    pub check_count: u64,
    pub total_check_time_ms: f64,
    pub avg_check_time_ms: f64,
    pub tabs_processed: u64,
    pub tabs_closed: u64,
    pub storage_bytes: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonitorReport {
    #[serde(flatten)]
    pub metrics: Metrics,
    pub uptime_ms: f64,
    /// Tabs processed per check
    pub efficiency: f64,
}

#[derive(Debug, Clone)]
pub struct PerformanceMonitor {
    metrics: Metrics,
    started_at: f64,
}

impl PerformanceMonitor {
    pub fn new(started_at: f64) -> Self {
        PerformanceMonitor {
            metrics: Metrics::default(),
            started_at,
        }
    }

    /// Record one finished check. Returns true when a summary should be logged.
    pub fn end_check(&mut self, duration_ms: f64, tab_count: usize, closed_count: usize) -> bool {
        let m = &mut self.metrics;
        m.check_count += 1;
        m.total_check_time_ms += duration_ms.max(0.0);
        m.avg_check_time_ms = m.total_check_time_ms / m.check_count as f64;
        m.tabs_processed += tab_count as u64;
        m.tabs_closed += closed_count as u64;

        m.check_count % LOG_EVERY_CHECKS == 0
    }

    pub fn record_storage_bytes(&mut self, bytes: usize) {
        self.metrics.storage_bytes = bytes;
    }

    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    pub fn report(&self, now: f64) -> MonitorReport {
        let efficiency = if self.metrics.check_count == 0 {
            0.0
        } else {
            self.metrics.tabs_processed as f64 / self.metrics.check_count as f64
        };

        MonitorReport {
            metrics: self.metrics.clone(),
            uptime_ms: (now - self.started_at).max(0.0),
            efficiency,
        }
    }

    /// One-line summary for the console
    pub fn summary(&self, now: f64) -> String {
        let report = self.report(now);
        format!(
            "uptime {:.1} min, {} checks, avg {:.2} ms, {} tabs processed, {} closed, storage {:.2} KB, {:.1} tabs/check",
            report.uptime_ms / 60_000.0,
            report.metrics.check_count,
            report.metrics.avg_check_time_ms,
            report.metrics.tabs_processed,
            report.metrics.tabs_closed,
            report.metrics.storage_bytes as f64 / 1024.0,
            report.efficiency,
        )
    }
}
