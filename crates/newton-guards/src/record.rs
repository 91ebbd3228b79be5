use crate::error::{GuardError, GuardEvent};
use serde::{Deserialize, Serialize};
use ssum_core::{Band, StatusLevel};

/// One observable row: the iterate after step `k` and its structure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IterationRecord {
    pub run: String,
    pub k: usize,
    pub m: f64,
    pub fx: f64,
    pub dx: f64,
    pub a: f64,
    pub s: f64,
    pub band: Band,
    pub projection_holds: bool,
}

/// Outcome of one run: the rows produced and how the run ended.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    pub run: String,
    pub records: Vec<IterationRecord>,
    pub status: StatusLevel,
    pub halted: Option<GuardError>,
    pub events: Vec<GuardEvent>,
}

impl RunReport {
    pub fn completed(&self) -> bool {
        self.halted.is_none()
    }

    pub fn last(&self) -> Option<&IterationRecord> {
        self.records.last()
    }
}

/// Reports from several independent runs, merged under "worst status wins".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReportSet {
    status: StatusLevel,
    reports: Vec<RunReport>,
}

impl ReportSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, report: RunReport) {
        self.status.raise(report.status);
        self.reports.push(report);
    }

    /// Appends `other` after `self`; each run keeps its own record order.
    pub fn merge(mut self, other: ReportSet) -> ReportSet {
        for report in other.reports {
            self.push(report);
        }
        self
    }

    pub fn status(&self) -> StatusLevel {
        self.status
    }

    pub fn reports(&self) -> &[RunReport] {
        &self.reports
    }

    pub fn records(&self) -> impl Iterator<Item = &IterationRecord> {
        self.reports.iter().flat_map(|r| r.records.iter())
    }

    pub fn is_empty(&self) -> bool {
        self.reports.is_empty()
    }
}

impl FromIterator<RunReport> for ReportSet {
    fn from_iter<I: IntoIterator<Item = RunReport>>(iter: I) -> Self {
        let mut set = ReportSet::new();
        for report in iter {
            set.push(report);
        }
        set
    }
}
