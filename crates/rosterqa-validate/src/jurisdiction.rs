use rosterqa_core::Snapshot;

use crate::rule::{agent_id, missing_column_report, RecordRule};
use crate::types::{Finding, RuleReport, Severity};

/// USPS abbreviations for the 50 states plus DC. A read-only process-wide
/// constant, not configuration: the set changes on an act of Congress.
pub const US_JURISDICTIONS: [&str; 51] = [
    "AL", "AK", "AZ", "AR", "CA", "CO", "CT", "DC", "DE", "FL", "GA", "HI", "ID", "IL", "IN",
    "IA", "KS", "KY", "LA", "ME", "MD", "MA", "MI", "MN", "MS", "MO", "MT", "NE", "NV", "NH",
    "NJ", "NM", "NY", "NC", "ND", "OH", "OK", "OR", "PA", "RI", "SC", "SD", "TN", "TX", "UT",
    "VT", "VA", "WA", "WV", "WI", "WY",
];

const SCALAR_COLUMNS: [&str; 2] = ["Agency State", "Agent State"];
pub const LICENSE_LIST_COLUMN: &str = "Agent License State (active)";

const ALL_COLUMNS: [&str; 3] = ["Agency State", "Agent State", LICENSE_LIST_COLUMN];

/// Jurisdiction-code rule: two scalar state columns plus the comma-joined
/// active-license list. Any unknown code in any of the three flags the
/// record.
pub struct JurisdictionRule;

impl RecordRule for JurisdictionRule {
    fn id(&self) -> &'static str {
        "jurisdiction_code"
    }

    fn columns(&self) -> &'static [&'static str] {
        &ALL_COLUMNS
    }

    fn eval(&self, snap: &Snapshot) -> RuleReport {
        let rows = snap.row_count();
        let mut mask = vec![false; rows];

        for column in SCALAR_COLUMNS {
            let Some(cells) = snap.column(column) else {
                return missing_column_report(self.id(), column, rows);
            };
            for (i, cell) in cells.enumerate() {
                if invalid_scalar(cell) {
                    mask[i] = true;
                }
            }
        }

        // The license list may be absent entirely; like a blank list, an
        // absent column carries no assertion to check.
        if let Some(cells) = snap.column(LICENSE_LIST_COLUMN) {
            for (i, cell) in cells.enumerate() {
                if invalid_list(cell) {
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
                message: format!("agent {} has an invalid state code", agent_id(snap, i)),
            })
            .collect();

        RuleReport {
            rule_id: self.id().to_string(),
            mask,
            findings,
        }
    }
}

fn known(code: &str) -> bool {
    US_JURISDICTIONS.contains(&code)
}

/// A blank scalar carries no assertion to check.
pub fn invalid_scalar(cell: &str) -> bool {
    let code = cell.trim();
    !code.is_empty() && !known(code)
}

/// Comma-joined list of codes. A blank or absent list is valid. Empty
/// segments from trailing or doubled delimiters are tolerated rather than
/// flagged; any non-empty unknown code flags the record.
pub fn invalid_list(cell: &str) -> bool {
    cell.split(',')
        .map(str::trim)
        .filter(|seg| !seg.is_empty())
        .any(|seg| !known(seg))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn jurisdiction_set_is_fifty_states_plus_dc() {
        assert_eq!(US_JURISDICTIONS.len(), 51);
        assert!(known("VA"));
        assert!(known("DC"));
        assert!(!known("ZZ"));
        assert!(!known("va"));
    }

    #[test]
    fn scalar_membership() {
        assert!(!invalid_scalar("NY"));
        assert!(invalid_scalar("ZZ"));
        assert!(!invalid_scalar(""));
        assert!(!invalid_scalar("  "));
    }

    #[test]
    fn license_lists() {
        assert!(!invalid_list(""));
        assert!(!invalid_list("VA,NY,DC"));
        assert!(!invalid_list("VA, NY , DC"));
        assert!(invalid_list("VA,ZZ,NY"));
        // Trailing or doubled delimiters are not themselves violations.
        assert!(!invalid_list("VA,NY,"));
        assert!(!invalid_list("VA,,NY"));
        assert!(invalid_list("VA,,QQ"));
    }

    #[test]
    fn absent_license_column_is_valid() {
        let snap = Snapshot::new(
            vec![
                "Agent Id".into(),
                "Agency State".into(),
                "Agent State".into(),
            ],
            vec![
                vec!["A1".into(), "VA".into(), "NY".into()],
                vec!["A2".into(), "ZZ".into(), "NY".into()],
            ],
        );
        let report = JurisdictionRule.eval(&snap);
        // Only the scalar violation counts; no license column, no flags.
        assert_eq!(report.mask, vec![false, true]);
        assert_eq!(report.findings.len(), 1);
        assert_eq!(report.findings[0].agent_id.as_deref(), Some("A2"));
    }

    #[test]
    fn any_of_the_three_columns_flags_the_record() {
        let snap = Snapshot::new(
            vec![
                "Agent Id".into(),
                "Agency State".into(),
                "Agent State".into(),
                "Agent License State (active)".into(),
            ],
            vec![
                vec!["A1".into(), "VA".into(), "VA".into(), "VA,NY".into()],
                vec!["A2".into(), "ZZ".into(), "VA".into(), "".into()],
                vec!["A3".into(), "VA".into(), "VA".into(), "VA,ZZ".into()],
            ],
        );
        let report = JurisdictionRule.eval(&snap);
        assert_eq!(report.mask, vec![false, true, true]);
        let flagged: Vec<_> = report
            .findings
            .iter()
            .filter_map(|f| f.agent_id.as_deref())
            .collect();
        assert_eq!(flagged, vec!["A2", "A3"]);
    }
}
