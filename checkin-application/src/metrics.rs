use std::sync::atomic::{AtomicU64, Ordering};

use checkin_domain::OutcomeKind;

#[derive(Debug, Default)]
pub struct Metrics {
    scans_success: AtomicU64,
    scans_already_scanned: AtomicU64,
    scans_not_found: AtomicU64,
    status_overrides: AtomicU64,
    roster_reloads: AtomicU64,
    sessions_opened: AtomicU64,
    sessions_closed: AtomicU64,
    device_failures: AtomicU64,
    device_releases: AtomicU64,
}

impl Metrics {
    pub fn record_scan(&self, outcome: OutcomeKind) {
        let counter = match outcome {
            OutcomeKind::Success => &self.scans_success,
            OutcomeKind::AlreadyScanned => &self.scans_already_scanned,
            OutcomeKind::NotFound => &self.scans_not_found,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_status_override(&self) {
        self.status_overrides.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_roster_reload(&self) {
        self.roster_reloads.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_session_opened(&self) {
        self.sessions_opened.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_session_closed(&self) {
        self.sessions_closed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_device_failure(&self) {
        self.device_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_device_release(&self) {
        self.device_releases.fetch_add(1, Ordering::Relaxed);
    }

    pub fn device_releases(&self) -> u64 {
        self.device_releases.load(Ordering::Relaxed)
    }

    pub fn render_prometheus(&self) -> String {
        let success = self.scans_success.load(Ordering::Relaxed);
        let already = self.scans_already_scanned.load(Ordering::Relaxed);
        let not_found = self.scans_not_found.load(Ordering::Relaxed);
        let overrides = self.status_overrides.load(Ordering::Relaxed);
        let reloads = self.roster_reloads.load(Ordering::Relaxed);
        let opened = self.sessions_opened.load(Ordering::Relaxed);
        let closed = self.sessions_closed.load(Ordering::Relaxed);
        let failures = self.device_failures.load(Ordering::Relaxed);
        let releases = self.device_releases.load(Ordering::Relaxed);

        format!(
            "# TYPE checkin_scans_total counter\n\
checkin_scans_total{{outcome=\"SUCCESS\"}} {}\n\
checkin_scans_total{{outcome=\"ALREADY_SCANNED\"}} {}\n\
checkin_scans_total{{outcome=\"NOT_FOUND\"}} {}\n\
# TYPE checkin_status_overrides_total counter\n\
checkin_status_overrides_total {}\n\
# TYPE checkin_roster_reloads_total counter\n\
checkin_roster_reloads_total {}\n\
# TYPE checkin_sessions_opened_total counter\n\
checkin_sessions_opened_total {}\n\
# TYPE checkin_sessions_closed_total counter\n\
checkin_sessions_closed_total {}\n\
# TYPE checkin_device_failures_total counter\n\
checkin_device_failures_total {}\n\
# TYPE checkin_device_releases_total counter\n\
checkin_device_releases_total {}\n",
            success, already, not_found, overrides, reloads, opened, closed, failures, releases
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_scan_counters_by_outcome() {
        let metrics = Metrics::default();
        metrics.record_scan(OutcomeKind::Success);
        metrics.record_scan(OutcomeKind::Success);
        metrics.record_scan(OutcomeKind::NotFound);
        let text = metrics.render_prometheus();
        assert!(text.contains("checkin_scans_total{outcome=\"SUCCESS\"} 2\n"));
        assert!(text.contains("checkin_scans_total{outcome=\"NOT_FOUND\"} 1\n"));
        assert!(text.contains("checkin_scans_total{outcome=\"ALREADY_SCANNED\"} 0\n"));
    }

    #[test]
    fn counts_only_explicit_roster_reloads() {
        let metrics = Metrics::default();
        metrics.record_roster_reload();
        let text = metrics.render_prometheus();
        assert!(text.contains("# TYPE checkin_roster_reloads_total counter\n"));
        assert!(text.contains("checkin_roster_reloads_total 1\n"));
        assert!(!text.contains("checkin_roster_loads_total"));
    }
}
