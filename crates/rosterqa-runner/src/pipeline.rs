use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{error, info};

use rosterqa_core::{
    canonicalize_headers, check_drift, load_snapshot, most_recent, most_recent_by_period,
    normalize_whitespace, PipelineError, RunId, Snapshot,
};
use rosterqa_validate::{default_rules, run_all, Finding, RecordRule};

use crate::config::{Config, Convention};
use crate::marker::MarkerLedger;
use crate::report::{
    ChartSink, CsvChartData, FsReportSink, ReportSink, RunOutcome, RunReport,
    AGENT_INFO_BY_A2O_CHART, AGENT_INFO_BY_START_CHART, STATE_COUNTS_CHART,
};
use crate::summary;

/// One ingestion + validation run over the freshest pair of snapshots in
/// the data directory.
pub struct Pipeline {
    pub cfg: Config,
    rules: Vec<Box<dyn RecordRule>>,
    charts: Box<dyn ChartSink>,
    reports: Box<dyn ReportSink>,
}

impl Pipeline {
    /// Standard wiring: the three roster rules, CSV chart data, filesystem
    /// report sink.
    pub fn new(cfg: Config) -> Self {
        let reports = Box::new(FsReportSink::new(cfg.out_dir()));
        Self {
            cfg,
            rules: default_rules(),
            charts: Box::new(CsvChartData),
            reports,
        }
    }

    pub fn with_sinks(
        cfg: Config,
        rules: Vec<Box<dyn RecordRule>>,
        charts: Box<dyn ChartSink>,
        reports: Box<dyn ReportSink>,
    ) -> Self {
        Self {
            cfg,
            rules,
            charts,
            reports,
        }
    }

    /// Execute the full run. Selection, marker, load and drift failures
    /// short-circuit to the failure report; record-level findings never do,
    /// all rules run to completion. The report sink is invoked exactly once
    /// either way.
    pub fn run(&self) -> Result<RunReport> {
        let run_id = RunId::new();
        info!(run_id = run_id.as_str(), "starting roster validation run");

        let report = match self.execute(&run_id) {
            Ok(report) => report,
            Err(fatal) => {
                error!(run_id = run_id.as_str(), %fatal, "run escalated");
                RunReport {
                    run_id: run_id.clone(),
                    outcome: RunOutcome::Failure {
                        reason: fatal.to_string(),
                    },
                    current_file: None,
                    previous_file: None,
                    row_count: None,
                    findings: vec![],
                    charts: vec![],
                }
            }
        };

        self.reports.consume(&report).context("report sink")?;
        if report.outcome.is_success() {
            info!(run_id = run_id.as_str(), "run completed successfully");
        } else {
            error!(run_id = run_id.as_str(), "run failed");
        }
        Ok(report)
    }

    fn execute(&self, run_id: &RunId) -> Result<RunReport, PipelineError> {
        let data_dir = self.cfg.data_dir();
        let names = list_candidates(&data_dir, &self.cfg.input.extension)?;

        let current = self
            .select(&names)
            .ok_or_else(|| PipelineError::NoCandidate {
                reason: format!(
                    "no selectable .{} snapshot in {}",
                    self.cfg.input.extension,
                    data_dir.display()
                ),
            })?
            .to_string();
        let rest: Vec<String> = names.iter().filter(|n| **n != current).cloned().collect();
        let previous = self
            .select(&rest)
            .ok_or_else(|| PipelineError::NoCandidate {
                reason: "no previous snapshot to compare against".to_string(),
            })?
            .to_string();
        info!(%current, %previous, "selected snapshot pair");

        let ledger = self
            .cfg
            .marker
            .enabled
            .then(|| MarkerLedger::new(self.cfg.marker_path()));
        if let Some(ledger) = &ledger {
            if ledger.contains(&current)? {
                return Err(PipelineError::AlreadyProcessed { filename: current });
            }
        }

        let current_snap = load_snapshot(&data_dir.join(&current))?;
        let previous_snap = load_snapshot(&data_dir.join(&previous))?;
        check_drift(&current_snap, &previous_snap, self.cfg.drift.tolerance)?;

        let snap = normalize_whitespace(&canonicalize_headers(&current_snap));
        let reports = run_all(&self.rules, &snap);

        let all_passed = reports.iter().all(|r| r.passed());
        let findings: Vec<Finding> = reports.iter().flat_map(|r| r.findings.clone()).collect();

        let mut charts = Vec::new();
        let outcome = if all_passed {
            charts = self.render_charts(&snap)?;
            RunOutcome::Success
        } else {
            let flagged: usize = reports.iter().map(|r| r.flagged_count()).sum();
            RunOutcome::Failure {
                reason: format!("{flagged} record(s) failed validation"),
            }
        };

        // Only a fully validated run is marked processed; a failed run
        // stays retryable after the data is fixed.
        if outcome.is_success() {
            if let Some(ledger) = &ledger {
                ledger.record(&current)?;
            }
        }

        Ok(RunReport {
            run_id: run_id.clone(),
            outcome,
            current_file: Some(current),
            previous_file: Some(previous),
            row_count: Some(snap.row_count()),
            findings,
            charts,
        })
    }

    fn select<'a, S: AsRef<str>>(&self, names: &'a [S]) -> Option<&'a str> {
        match self.cfg.input.convention {
            Convention::Dated => most_recent(names),
            Convention::Monthly => most_recent_by_period(names),
        }
    }

    fn render_charts(&self, snap: &Snapshot) -> Result<Vec<PathBuf>, PipelineError> {
        let dir = self.cfg.charts_dir();
        let mut out = Vec::new();

        let counts = summary::state_counts(snap);
        let dest = dir.join(STATE_COUNTS_CHART);
        self.charts
            .render(&counts, &[summary::STATE_COLUMN, "Count"], &dest)
            .map_err(io_other)?;
        out.push(dest);

        let info_columns = [
            "Agent Name",
            summary::CONTRACT_START_COLUMN,
            summary::A2O_DATE_COLUMN,
        ];
        let info = summary::agent_info(snap);

        let by_a2o = summary::sorted_by_date(&info, summary::A2O_DATE_COLUMN);
        let dest = dir.join(AGENT_INFO_BY_A2O_CHART);
        self.charts.render(&by_a2o, &info_columns, &dest).map_err(io_other)?;
        out.push(dest);

        let by_start = summary::sorted_by_date(&info, summary::CONTRACT_START_COLUMN);
        let dest = dir.join(AGENT_INFO_BY_START_CHART);
        self.charts.render(&by_start, &info_columns, &dest).map_err(io_other)?;
        out.push(dest);

        Ok(out)
    }
}

fn io_other(err: anyhow::Error) -> PipelineError {
    PipelineError::Io(std::io::Error::other(err.to_string()))
}

/// Filenames in `dir` carrying the expected extension, sorted so that the
/// tie-break ("first occurrence wins") is deterministic for a given input
/// set regardless of directory iteration order.
fn list_candidates(dir: &Path, extension: &str) -> Result<Vec<String>, PipelineError> {
    let mut names = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let name = entry.file_name();
        let Some(name) = name.to_str() else { continue };
        if Path::new(name)
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case(extension))
        {
            names.push(name.to_string());
        }
    }
    names.sort();
    Ok(names)
}
