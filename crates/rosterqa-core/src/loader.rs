use std::path::Path;

use tracing::{error, info};

use crate::error::PipelineError;
use crate::table::Snapshot;

/// Read a CSV roster file into a [`Snapshot`].
///
/// Failure never panics past this boundary; it is classified so the caller
/// can tell a missing file from an unreadable one (an empty table is a
/// third, perfectly loadable thing). The reader is flexible: ragged rows
/// are squared off by `Snapshot::new` rather than rejected.
pub fn load_snapshot(path: &Path) -> Result<Snapshot, PipelineError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .map_err(|e| classify(path, e))?;

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| classify(path, e))?
        .iter()
        .map(str::to_string)
        .collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| classify(path, e))?;
        rows.push(record.iter().map(str::to_string).collect());
    }

    let snapshot = Snapshot::new(headers, rows);
    info!(path = %path.display(), rows = snapshot.row_count(), "loaded snapshot");
    Ok(snapshot)
}

fn classify(path: &Path, err: csv::Error) -> PipelineError {
    let out = match err.kind() {
        csv::ErrorKind::Io(io) if io.kind() == std::io::ErrorKind::NotFound => {
            PipelineError::NotFound {
                path: path.to_path_buf(),
            }
        }
        _ => PipelineError::Malformed {
            path: path.to_path_buf(),
            reason: err.to_string(),
        },
    };
    error!(path = %path.display(), %out, "snapshot load failed");
    out
}
