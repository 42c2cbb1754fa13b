use std::fs::OpenOptions;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use tracing::info;

use rosterqa_core::PipelineError;

/// Append-only ledger of already-processed snapshot filenames. The
/// check-then-append runs under a sidecar lock so two racing runs cannot
/// both win the membership check.
pub struct MarkerLedger {
    path: PathBuf,
}

impl MarkerLedger {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn contains(&self, filename: &str) -> Result<bool, PipelineError> {
        match std::fs::read_to_string(&self.path) {
            Ok(s) => Ok(s.lines().any(|line| line == filename)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    /// Record `filename` as processed. Creates the ledger if absent
    /// (atomically, fail-if-exists), refuses a filename already listed,
    /// appends otherwise.
    pub fn record(&self, filename: &str) -> Result<(), PipelineError> {
        let _lock = LockGuard::acquire(&self.path)?;

        match OpenOptions::new().write(true).create_new(true).open(&self.path) {
            Ok(mut f) => {
                writeln!(f, "{filename}")?;
                info!(ledger = %self.path.display(), filename, "created ledger and recorded file");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                if self.contains(filename)? {
                    return Err(PipelineError::AlreadyProcessed {
                        filename: filename.to_string(),
                    });
                }
                let mut f = OpenOptions::new().append(true).open(&self.path)?;
                writeln!(f, "{filename}")?;
                info!(ledger = %self.path.display(), filename, "recorded file as processed");
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }
}

/// Exclusive sidecar lock (`<ledger>.lock`), released on drop. Held for at
/// most one check-then-append; a second concurrent run fails fast instead
/// of waiting.
struct LockGuard {
    path: PathBuf,
}

impl LockGuard {
    fn acquire(ledger: &Path) -> std::io::Result<Self> {
        let path = ledger.with_extension("lock");
        match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(_) => Ok(Self { path }),
            Err(e) if e.kind() == ErrorKind::AlreadyExists => Err(std::io::Error::new(
                ErrorKind::WouldBlock,
                format!("marker ledger is locked by another run: {}", path.display()),
            )),
            Err(e) => Err(e),
        }
    }
}

impl Drop for LockGuard {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.path);
    }
}
