use crate::ObservatoryMetrics;
use newton_guards::ReportSet;
use ssum_core::StatusLevel;

/// Refreshes the per-run status gauges and tells whether the worst status is
/// above `budget`. Counters are left alone, so the check can be repeated.
pub fn exceeds_status_budget(
    metrics: &ObservatoryMetrics,
    reports: &ReportSet,
    budget: StatusLevel,
) -> bool {
    for report in reports.reports() {
        metrics.set_run_status(report);
    }
    reports.status() > budget
}
