use std::path::PathBuf;
use thiserror::Error;

/// Fatal pipeline conditions. Record-level findings are never errors; they
/// live in rule reports and only affect the final outcome.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Filename does not follow the active naming convention.
    #[error("filename {filename:?} does not match the naming convention: {reason}")]
    Format { filename: String, reason: String },

    /// Snapshot file is missing. Distinct from Malformed: a file that is
    /// not there and a file that cannot be parsed escalate with different
    /// context.
    #[error("snapshot file not found: {path}")]
    NotFound { path: PathBuf },

    /// Snapshot file exists but is not structurally readable as CSV.
    #[error("snapshot file {path} is unreadable: {reason}")]
    Malformed { path: PathBuf, reason: String },

    /// Row-count delta between consecutive snapshots exceeds tolerance.
    #[error(
        "row count drift {delta} exceeds tolerance {tolerance} \
         (current={current}, previous={previous})"
    )]
    Drift {
        current: usize,
        previous: usize,
        delta: usize,
        tolerance: usize,
    },

    /// The directory listing yielded no selectable snapshot.
    #[error("no snapshot candidate: {reason}")]
    NoCandidate { reason: String },

    /// The marker ledger already lists this file.
    #[error("file {filename:?} was already processed")]
    AlreadyProcessed { filename: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
