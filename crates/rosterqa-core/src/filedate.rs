use chrono::NaiveDate;

use crate::error::PipelineError;

const MONTHS: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Extract the calendar period from a `<prefix>_..._<month>_<year>.<ext>`
/// filename: the last two underscore-separated tokens are a month name and
/// a 4-digit year (numeric prefix of the final token, extension stripped).
/// Month case is normalized before matching so `march` and `March` both
/// parse. Returns the first of that month.
pub fn period_from_filename(name: &str) -> Result<NaiveDate, PipelineError> {
    let format = |reason: &str| PipelineError::Format {
        filename: name.to_string(),
        reason: reason.to_string(),
    };

    let tokens: Vec<&str> = name.split('_').collect();
    if tokens.len() < 2 {
        return Err(format("expected at least <month>_<year> tokens"));
    }

    let month_token = tokens[tokens.len() - 2];
    let year_token = tokens[tokens.len() - 1];

    let month = month_number(month_token)
        .ok_or_else(|| format(&format!("unknown month name {month_token:?}")))?;

    let stem = year_token.split('.').next().unwrap_or(year_token);
    let prefix: String = stem.chars().take(4).collect();
    if prefix.len() != 4 || !prefix.chars().all(|c| c.is_ascii_digit()) {
        return Err(format(&format!("year token {year_token:?} lacks a 4-digit prefix")));
    }
    let year: i32 = prefix
        .parse()
        .map_err(|_| format(&format!("year token {year_token:?} is not numeric")))?;

    NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or_else(|| format(&format!("no such period {year}-{month:02}")))
}

fn month_number(token: &str) -> Option<u32> {
    let mut chars = token.chars();
    let first = chars.next()?;
    let normalized: String = first
        .to_uppercase()
        .chain(chars.flat_map(|c| c.to_lowercase()))
        .collect();
    MONTHS
        .iter()
        .position(|m| *m == normalized)
        .map(|i| i as u32 + 1)
}
