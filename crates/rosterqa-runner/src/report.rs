use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use rosterqa_core::{RunId, Snapshot};
use rosterqa_validate::Finding;

/// Chart filenames the downstream mail sink expects to find on disk after
/// a fully validated run.
pub const STATE_COUNTS_CHART: &str = "State_counts.png";
pub const AGENT_INFO_BY_A2O_CHART: &str = "Agent_info_by_A2O.png";
pub const AGENT_INFO_BY_START_CHART: &str = "Agent_info_by_start.png";

/// Terminal state of one pipeline invocation. Produced once, at the first
/// fatal condition or after the last rule completes, and consumed once by
/// the report sink.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum RunOutcome {
    Success,
    Failure { reason: String },
}

impl RunOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, RunOutcome::Success)
    }
}

/// Everything the report sink needs about a finished run.
#[derive(Clone, Debug, Serialize)]
pub struct RunReport {
    pub run_id: RunId,
    pub outcome: RunOutcome,
    pub current_file: Option<String>,
    pub previous_file: Option<String>,
    pub row_count: Option<usize>,
    pub findings: Vec<Finding>,
    pub charts: Vec<PathBuf>,
}

impl RunReport {
    pub fn finding_count(&self) -> usize {
        self.findings.len()
    }
}

/// Renders one summary table into a chart file. Rendering itself is an
/// external concern; the pipeline only promises the table, the columns to
/// plot, and the destination path.
pub trait ChartSink: Send + Sync {
    fn render(&self, table: &Snapshot, columns: &[&str], dest: &Path) -> Result<()>;
}

/// Default chart sink: writes the backing table as CSV next to where the
/// rendered chart belongs (`State_counts.png` -> `State_counts.csv`), so a
/// renderer or a human can pick it up.
pub struct CsvChartData;

impl ChartSink for CsvChartData {
    fn render(&self, table: &Snapshot, columns: &[&str], dest: &Path) -> Result<()> {
        if let Some(parent) = dest.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create charts dir {}", parent.display()))?;
        }
        let data_path = dest.with_extension("csv");
        let mut writer = csv::Writer::from_path(&data_path)
            .with_context(|| format!("write chart data {}", data_path.display()))?;

        writer.write_record(columns)?;
        for row in 0..table.row_count() {
            let record: Vec<&str> = columns
                .iter()
                .map(|col| table.cell(row, col).unwrap_or(""))
                .collect();
            writer.write_record(&record)?;
        }
        writer.flush()?;
        Ok(())
    }
}

/// Consumes the final report. Invoked exactly once per run regardless of
/// where the pipeline stopped; the mail transport behind it is out of
/// scope here.
pub trait ReportSink: Send + Sync {
    fn consume(&self, report: &RunReport) -> Result<()>;
}

/// Writes `report.json` and a human-readable `report.txt` under
/// `<out_dir>/<run_id>/`.
pub struct FsReportSink {
    pub out_dir: PathBuf,
}

impl FsReportSink {
    pub fn new(out_dir: PathBuf) -> Self {
        Self { out_dir }
    }
}

impl ReportSink for FsReportSink {
    fn consume(&self, report: &RunReport) -> Result<()> {
        let dir = self.out_dir.join(report.run_id.as_str());
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("create report dir {}", dir.display()))?;

        let json = serde_json::to_vec_pretty(report)?;
        std::fs::write(dir.join("report.json"), json)?;

        let mut text = String::new();
        match &report.outcome {
            RunOutcome::Success => text.push_str("outcome: success\n"),
            RunOutcome::Failure { reason } => {
                text.push_str(&format!("outcome: failure\nreason: {reason}\n"))
            }
        }
        if let Some(current) = &report.current_file {
            text.push_str(&format!("current: {current}\n"));
        }
        if let Some(previous) = &report.previous_file {
            text.push_str(&format!("previous: {previous}\n"));
        }
        text.push_str(&format!("findings: {}\n", report.finding_count()));
        for finding in &report.findings {
            text.push_str(&format!("  [{}] {}\n", finding.rule_id, finding.message));
        }
        for chart in &report.charts {
            text.push_str(&format!("chart: {}\n", chart.display()));
        }
        std::fs::write(dir.join("report.txt"), text)?;
        Ok(())
    }
}
