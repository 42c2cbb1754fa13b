use rosterqa_core::Snapshot;
use tracing::{info, warn};

use crate::email::EmailRule;
use crate::jurisdiction::JurisdictionRule;
use crate::phone::PhoneRule;
use crate::types::{Finding, RuleReport, Severity};

pub const AGENT_ID_COLUMN: &str = "Agent Id";

/// A record-level validation unit. Rules never raise per record: a
/// malformed value classifies as invalid in the mask. Each rule writes
/// only its own mask and findings, so rules may run in any order.
pub trait RecordRule: Send + Sync {
    fn id(&self) -> &'static str;

    /// Columns the rule reads.
    fn columns(&self) -> &'static [&'static str];

    fn eval(&self, snap: &Snapshot) -> RuleReport;
}

/// The standing roster rule set.
pub fn default_rules() -> Vec<Box<dyn RecordRule>> {
    vec![
        Box::new(PhoneRule),
        Box::new(JurisdictionRule),
        Box::new(EmailRule),
    ]
}

/// Run every rule to completion over the snapshot, logging each finding at
/// warning severity. A dirty mask never stops the remaining rules.
pub fn run_all(rules: &[Box<dyn RecordRule>], snap: &Snapshot) -> Vec<RuleReport> {
    let mut reports = Vec::with_capacity(rules.len());
    for rule in rules {
        let report = rule.eval(snap);
        if report.passed() {
            info!(rule = %report.rule_id, "all records validated");
        } else {
            for finding in &report.findings {
                warn!(rule = %report.rule_id, agent = ?finding.agent_id, "{}", finding.message);
            }
        }
        reports.push(report);
    }
    reports
}

pub(crate) fn agent_id(snap: &Snapshot, row: usize) -> String {
    match snap.cell(row, AGENT_ID_COLUMN) {
        Some(id) if !id.trim().is_empty() => id.trim().to_string(),
        _ => format!("<row {row}>"),
    }
}

/// Report for a rule whose required column is missing outright: every
/// record is flagged and a single column-level finding explains why.
pub(crate) fn missing_column_report(
    rule_id: &'static str,
    column: &str,
    rows: usize,
) -> RuleReport {
    RuleReport {
        rule_id: rule_id.to_string(),
        mask: vec![true; rows],
        findings: vec![Finding {
            rule_id: rule_id.to_string(),
            agent_id: None,
            severity: Severity::Fail,
            message: format!("required column {column:?} is missing"),
        }],
    }
}
