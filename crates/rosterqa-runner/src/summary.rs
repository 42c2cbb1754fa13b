use std::collections::BTreeMap;

use chrono::NaiveDate;

use rosterqa_core::Snapshot;

pub const STATE_COLUMN: &str = "Agency State";
pub const CONTRACT_START_COLUMN: &str = "Agent Writing Contract Start Date";
pub const A2O_DATE_COLUMN: &str = "Date when an agent became A2O";

const NAME_COLUMNS: [&str; 3] = ["Agent First Name", "Agent Middle Name", "Agent Last Name"];

/// Records per agency state, sorted by ascending count (ties by state).
/// The backing table for the state-occurrence chart. Empty when the state
/// column is absent.
pub fn state_counts(snap: &Snapshot) -> Snapshot {
    let headers = vec![STATE_COLUMN.to_string(), "Count".to_string()];
    let Some(cells) = snap.column(STATE_COLUMN) else {
        return Snapshot::new(headers, vec![]);
    };

    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    for cell in cells {
        *counts.entry(cell.trim().to_string()).or_default() += 1;
    }

    let mut pairs: Vec<(String, usize)> = counts.into_iter().collect();
    pairs.sort_by(|a, b| a.1.cmp(&b.1).then_with(|| a.0.cmp(&b.0)));

    Snapshot::new(
        headers,
        pairs
            .into_iter()
            .map(|(state, count)| vec![state, count.to_string()])
            .collect(),
    )
}

/// Assembled full name plus the contract-start and A2O date columns; the
/// backing table for the agent-info charts. Name parts are title-cased and
/// a blank middle name leaves a single space between first and last.
pub fn agent_info(snap: &Snapshot) -> Snapshot {
    let headers = vec![
        "Agent Name".to_string(),
        CONTRACT_START_COLUMN.to_string(),
        A2O_DATE_COLUMN.to_string(),
    ];
    if NAME_COLUMNS.iter().any(|c| !snap.has_column(c)) {
        return Snapshot::new(headers, vec![]);
    }

    let rows = (0..snap.row_count())
        .map(|i| {
            let part = |col: &str| snap.cell(i, col).unwrap_or("").trim().to_string();
            let name = full_name(
                &part(NAME_COLUMNS[0]),
                &part(NAME_COLUMNS[1]),
                &part(NAME_COLUMNS[2]),
            );
            vec![name, part(CONTRACT_START_COLUMN), part(A2O_DATE_COLUMN)]
        })
        .collect();

    Snapshot::new(headers, rows)
}

/// Rows reordered by the dates in `column`, ascending and stable.
/// Unparseable or blank dates sort last; the cell text itself is never
/// altered.
pub fn sorted_by_date(snap: &Snapshot, column: &str) -> Snapshot {
    let Some(idx) = snap.column_index(column) else {
        return snap.clone();
    };

    let mut rows: Vec<Vec<String>> = snap.rows().map(|r| r.to_vec()).collect();
    rows.sort_by_key(|row| parse_date(&row[idx]).map_or((1, NaiveDate::MAX), |d| (0, d)));
    Snapshot::new(snap.headers().to_vec(), rows)
}

fn parse_date(cell: &str) -> Option<NaiveDate> {
    let cell = cell.trim();
    for fmt in ["%Y-%m-%d", "%m/%d/%Y", "%m/%d/%y"] {
        if let Ok(d) = NaiveDate::parse_from_str(cell, fmt) {
            return Some(d);
        }
    }
    None
}

fn full_name(first: &str, middle: &str, last: &str) -> String {
    let first = title_case(first);
    let middle = title_case(middle);
    let last = title_case(last);
    if middle.is_empty() {
        format!("{first} {last}").trim().to_string()
    } else {
        format!("{first} {middle} {last}").trim().to_string()
    }
}

fn title_case(s: &str) -> String {
    s.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(c) => c.to_uppercase().chain(chars.flat_map(|c| c.to_lowercase())).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}
