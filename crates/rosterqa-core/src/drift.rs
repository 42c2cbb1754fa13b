use tracing::{error, info};

use crate::error::PipelineError;
use crate::table::Snapshot;

/// Default row-count tolerance between consecutive snapshots. A coarse
/// anomaly heuristic against truncated or duplicated loads, not a
/// statistical test.
pub const DEFAULT_DRIFT_TOLERANCE: usize = 500;

/// Compare row counts of two consecutive snapshots against `tolerance`.
/// Operates on the absolute difference, so the check is symmetric in its
/// arguments. The error carries both counts for diagnosis without a rerun.
pub fn check_drift(
    current: &Snapshot,
    previous: &Snapshot,
    tolerance: usize,
) -> Result<(), PipelineError> {
    let cur = current.row_count();
    let prev = previous.row_count();
    let delta = cur.abs_diff(prev);
    if delta > tolerance {
        let err = PipelineError::Drift {
            current: cur,
            previous: prev,
            delta,
            tolerance,
        };
        error!(%err, "snapshot drift check failed");
        return Err(err);
    }
    info!(current = cur, previous = prev, delta, "snapshot drift within tolerance");
    Ok(())
}
