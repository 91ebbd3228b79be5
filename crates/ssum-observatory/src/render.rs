use chrono::{SecondsFormat, Utc};
use newton_guards::{Case, GuardEvent, IterationRecord, ReportSet, RunReport};
use serde::Serialize;
use ssum_core::StatusLevel;
use std::fmt::Write;

fn signed(x: f64) -> String {
    if x >= 0.0 {
        format!("+{x:.6}")
    } else {
        format!("{x:.6}")
    }
}

fn row(record: &IterationRecord) -> String {
    format!(
        "{:<32} {:>3}  {:>17.10}  {:>14.6e}  {:>14.6e}  {:>9}  {:>9}  {}",
        format!("{} [{}]", record.run, record.band),
        record.k,
        record.m,
        record.fx,
        record.dx,
        signed(record.a),
        signed(record.s),
        record.projection_holds,
    )
}

fn event_line(run: &str, event: &GuardEvent) -> String {
    match event {
        GuardEvent::NearSingularDerivative { k, .. } => {
            format!("warn: near-zero derivative clamped at run={run} k={k}")
        }
        GuardEvent::Halted { error } => format!("bad: {error} (run={run})"),
    }
}

fn report_block(out: &mut String, report: &RunReport) {
    for record in &report.records {
        let _ = writeln!(out, "{}", row(record));
    }
    for event in &report.events {
        let _ = writeln!(out, "  {}", event_line(&report.run, event));
    }
}

/// Plain-text table in the observatory's column layout.
pub fn table(case: &Case, reports: &ReportSet) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "case {}: f(x) = {}", case.name, case.problem.describe());
    let _ = writeln!(
        out,
        "{:<32} {:>3}  {:>17}  {:>14}  {:>14}  {:>9}  {:>9}  {}",
        "run", "k", "m", "f(m)", "dx", "a", "s", "phi_ok"
    );
    for report in reports.reports() {
        report_block(&mut out, report);
    }
    let _ = writeln!(out, "status: {}", reports.status());
    out
}

#[derive(Serialize)]
pub struct JsonOutput<'a> {
    pub generated_at: String,
    pub status: StatusLevel,
    pub runs: &'a [RunReport],
}

pub fn json(reports: &ReportSet) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&JsonOutput {
        generated_at: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
        status: reports.status(),
        runs: reports.reports(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use newton_guards::cases::{multiple_root, newton_root};

    #[test]
    fn table_lists_every_record_and_status() {
        let case = newton_root();
        let reports = case.run();
        let text = table(&case, &reports);
        assert!(text.starts_with("case newton-root"));
        assert!(text.contains("newton-root/stable [positive]"));
        assert!(text.trim_end().ends_with("status: ok"));
        // header + title + 24 records + status
        assert_eq!(text.lines().count(), 27);
    }

    #[test]
    fn warnings_are_listed_under_their_run() {
        let case = multiple_root();
        let text = table(&case, &case.run());
        assert!(text.contains("warn: near-zero derivative clamped at run=multiple-root/double_root k=8"));
        assert!(text.trim_end().ends_with("status: warn"));
    }

    #[test]
    fn json_carries_status_and_runs() {
        let reports = multiple_root().run();
        let value: serde_json::Value = serde_json::from_str(&json(&reports).unwrap()).unwrap();
        assert_eq!(value["status"], "warn");
        assert_eq!(value["runs"][0]["records"].as_array().unwrap().len(), 12);
        assert_eq!(value["runs"][0]["records"][0]["projection_holds"], true);
    }

    #[test]
    fn signed_values_keep_plus_sign() {
        assert_eq!(signed(0.5), "+0.500000");
        assert_eq!(signed(-0.25), "-0.250000");
    }
}
