use std::sync::LazyLock;

use regex::Regex;
use rosterqa_core::Snapshot;

use crate::rule::{agent_id, missing_column_report, RecordRule};
use crate::types::{Finding, RuleReport, Severity};

/// NANP national number: area code and exchange start with 2-9.
static NANP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[2-9]\d{2}[2-9]\d{2}\d{4}$").unwrap());

const PHONE_COLUMNS: [&str; 2] = ["Agency Phone Number", "Agent Phone Number"];

/// US phone-number rule over the agency- and agent-level phone columns. A
/// record is invalid if either column fails; a blank number carries no
/// assertion and is not penalized.
pub struct PhoneRule;

impl RecordRule for PhoneRule {
    fn id(&self) -> &'static str {
        "phone_format"
    }

    fn columns(&self) -> &'static [&'static str] {
        &PHONE_COLUMNS
    }

    fn eval(&self, snap: &Snapshot) -> RuleReport {
        let rows = snap.row_count();
        let mut mask = vec![false; rows];
        for column in self.columns() {
            let Some(cells) = snap.column(column) else {
                return missing_column_report(self.id(), column, rows);
            };
            for (i, cell) in cells.enumerate() {
                if invalid_phone(cell) {
                    mask[i] = true;
                }
            }
        }

        let findings = mask
            .iter()
            .enumerate()
            .filter(|(_, flagged)| **flagged)
            .map(|(i, _)| Finding {
                rule_id: self.id().to_string(),
                agent_id: Some(agent_id(snap, i)),
                severity: Severity::Warn,
                message: format!("agent {} has an invalid phone number", agent_id(snap, i)),
            })
            .collect();

        RuleReport {
            rule_id: self.id().to_string(),
            mask,
            findings,
        }
    }
}

/// Numbers arrive without the US country calling code; +1 is prepended
/// before checking, which leaves exactly the ten national digits to
/// inspect. Two checks must both hold, mirroring is-possible (length) and
/// is-valid (NANP shape). Any separator outside the standard US set makes
/// the number unparseable, hence invalid.
pub fn invalid_phone(raw: &str) -> bool {
    let raw = raw.trim();
    if raw.is_empty() {
        return false;
    }

    let mut digits = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '0'..='9' => digits.push(c),
            ' ' | '.' | '-' | '(' | ')' => {}
            _ => return true,
        }
    }

    let possible = digits.len() == 10;
    let valid = NANP.is_match(&digits);
    !(possible && valid)
}
