use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum Severity {
    Warn,
    Fail,
}

/// One diagnostic from a record rule. Record-level findings carry the
/// flagged record's `Agent Id`; column-level findings (a required column
/// missing outright) carry none.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Finding {
    pub rule_id: String,
    pub agent_id: Option<String>,
    pub severity: Severity,
    pub message: String,
}

/// Outcome of one rule over one snapshot: a per-record invalid mask (same
/// length as the snapshot, never mutated after creation) plus one finding
/// per flagged record.
#[derive(Clone, Debug)]
pub struct RuleReport {
    pub rule_id: String,
    pub mask: Vec<bool>,
    pub findings: Vec<Finding>,
}

impl RuleReport {
    /// A rule passes iff no record is flagged.
    pub fn passed(&self) -> bool {
        self.mask.iter().all(|flagged| !flagged)
    }

    pub fn flagged_count(&self) -> usize {
        self.mask.iter().filter(|flagged| **flagged).count()
    }
}
