use std::sync::LazyLock;

use regex::Regex;
use rosterqa_core::Snapshot;

use crate::rule::{agent_id, missing_column_report, RecordRule};
use crate::types::{Finding, RuleReport, Severity};

/// Local part of word/dot/hyphen characters, `@`, a domain, then at least
/// one dot-separated alphabetic segment. Anchored both ends so `a@b` and
/// trailing junk both fail.
static EMAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\w.-]+@[\w.-]+(\.[A-Za-z]+)+$").unwrap());

pub const EMAIL_COLUMN: &str = "Agent Email Address";

pub struct EmailRule;

impl RecordRule for EmailRule {
    fn id(&self) -> &'static str {
        "email_format"
    }

    fn columns(&self) -> &'static [&'static str] {
        &[EMAIL_COLUMN]
    }

    fn eval(&self, snap: &Snapshot) -> RuleReport {
        let rows = snap.row_count();
        let Some(cells) = snap.column(EMAIL_COLUMN) else {
            return missing_column_report(self.id(), EMAIL_COLUMN, rows);
        };

        let mask: Vec<bool> = cells.map(invalid_email).collect();
        let findings = mask
            .iter()
            .enumerate()
            .filter(|(_, flagged)| **flagged)
            .map(|(i, _)| Finding {
                rule_id: self.id().to_string(),
                agent_id: Some(agent_id(snap, i)),
                severity: Severity::Warn,
                message: format!("agent {} has an invalid email", agent_id(snap, i)),
            })
            .collect();

        RuleReport {
            rule_id: self.id().to_string(),
            mask,
            findings,
        }
    }
}

pub fn invalid_email(cell: &str) -> bool {
    !EMAIL.is_match(cell.trim())
}
