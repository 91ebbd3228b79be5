use newton_guards::{ReportSet, RunReport};
use prometheus::{
    Encoder, GaugeVec, IntCounterVec, IntGaugeVec, Opts, Registry, TextEncoder,
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MetricsError {
    #[error("prometheus: {0}")]
    Prometheus(#[from] prometheus::Error),
    #[error("metrics text is not valid UTF-8")]
    Utf8(#[from] std::string::FromUtf8Error),
}

pub struct ObservatoryMetrics {
    pub run_status: IntGaugeVec,
    pub alignment: GaugeVec,
    pub signature: GaugeVec,
    pub iterations_total: IntCounterVec,
    pub guard_events_total: IntCounterVec,
}

impl ObservatoryMetrics {
    pub fn new(registry: &Registry) -> Result<Self, MetricsError> {
        let run_status = IntGaugeVec::new(
            Opts::new("ssum_run_status", "Run status: 0 ok, 1 warn, 2 bad"),
            &["run"],
        )?;

        let alignment = GaugeVec::new(
            Opts::new("ssum_alignment", "Alignment of the last accepted iterate"),
            &["run"],
        )?;

        let signature = GaugeVec::new(
            Opts::new("ssum_signature", "Signature of the last accepted iterate"),
            &["run"],
        )?;

        let iterations_total = IntCounterVec::new(
            Opts::new("ssum_iterations_total", "Accepted iterations per run"),
            &["run"],
        )?;

        let guard_events_total = IntCounterVec::new(
            Opts::new("ssum_guard_events_total", "Guard events per run and kind"),
            &["run", "kind"],
        )?;

        registry.register(Box::new(run_status.clone()))?;
        registry.register(Box::new(alignment.clone()))?;
        registry.register(Box::new(signature.clone()))?;
        registry.register(Box::new(iterations_total.clone()))?;
        registry.register(Box::new(guard_events_total.clone()))?;

        Ok(Self {
            run_status,
            alignment,
            signature,
            iterations_total,
            guard_events_total,
        })
    }

    /// Adds one report to the counters and refreshes its gauges. Counters
    /// accumulate, so each report is observed once.
    pub fn observe_report(&self, report: &RunReport) {
        let run = report.run.as_str();
        self.set_run_status(report);
        self.iterations_total
            .with_label_values(&[run])
            .inc_by(report.records.len() as u64);
        if let Some(last) = report.last() {
            self.alignment.with_label_values(&[run]).set(last.a);
            self.signature.with_label_values(&[run]).set(last.s);
        }
        for event in &report.events {
            self.guard_events_total
                .with_label_values(&[run, event.kind()])
                .inc();
        }
    }

    pub fn observe_set(&self, reports: &ReportSet) {
        for report in reports.reports() {
            self.observe_report(report);
        }
    }

    pub fn set_run_status(&self, report: &RunReport) {
        self.run_status
            .with_label_values(&[report.run.as_str()])
            .set(report.status.code());
    }
}

/// Renders every metric in `registry` in the Prometheus text format.
pub fn encode(registry: &Registry) -> Result<String, MetricsError> {
    let mut buf = Vec::new();
    TextEncoder::new().encode(&registry.gather(), &mut buf)?;
    Ok(String::from_utf8(buf)?)
}
