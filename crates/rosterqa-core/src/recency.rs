use tracing::warn;

use crate::filedate::period_from_filename;

/// Trailing date token of a filename: everything after the last `_`, up to
/// but excluding the extension.
fn trailing_token(name: &str) -> &str {
    let tail = name.rsplit('_').next().unwrap_or(name);
    match tail.find('.') {
        Some(dot) => &tail[..dot],
        None => tail,
    }
}

/// Pick the filename with the greatest trailing token (`YYYYMMDD` tokens
/// sort chronologically). Token shape is validated before comparing: an
/// empty set, an empty token, or mixed-width tokens yield `None`. Ties go
/// to the first occurrence.
pub fn most_recent<S: AsRef<str>>(names: &[S]) -> Option<&str> {
    let tokens: Vec<&str> = names.iter().map(|n| trailing_token(n.as_ref())).collect();
    let first = tokens.first()?;
    if first.is_empty() {
        return None;
    }
    let width = first.len();
    if tokens.iter().any(|t| t.len() != width) {
        return None;
    }

    let mut best = 0;
    for (i, token) in tokens.iter().enumerate().skip(1) {
        if *token > tokens[best] {
            best = i;
        }
    }
    Some(names[best].as_ref())
}

/// Monthly-convention counterpart: order candidates by their embedded
/// `<month>_<year>` period. A filename that fails to parse is dropped from
/// consideration (and logged) without sinking the selection; `None` only
/// when nothing parseable remains. Ties go to the first occurrence.
pub fn most_recent_by_period<S: AsRef<str>>(names: &[S]) -> Option<&str> {
    let mut best: Option<(&str, chrono::NaiveDate)> = None;
    for name in names {
        let name = name.as_ref();
        match period_from_filename(name) {
            Ok(period) => {
                if best.map_or(true, |(_, d)| period > d) {
                    best = Some((name, period));
                }
            }
            Err(err) => warn!(filename = name, %err, "skipping undatable filename"),
        }
    }
    best.map(|(name, _)| name)
}
