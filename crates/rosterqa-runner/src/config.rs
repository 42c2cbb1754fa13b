use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use rosterqa_core::DEFAULT_DRIFT_TOLERANCE;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    pub input: InputConfig,
    pub drift: DriftConfig,
    pub marker: MarkerConfig,
    pub report: ReportConfig,
}

/// Which naming convention the input directory follows. The recency
/// selector and the filename dater must agree per invocation; the two
/// patterns are never intermixed within one run.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Convention {
    /// `<prefix>_..._<YYYYMMDD>.<ext>`: trailing tokens compare
    /// lexicographically.
    Dated,
    /// `<prefix>_..._<month>_<year>.<ext>`: ordering needs the parsed
    /// period.
    Monthly,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct InputConfig {
    pub data_dir: String,
    pub extension: String,
    pub convention: Convention,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DriftConfig {
    pub tolerance: usize,
}

/// Processed-file ledger. Membership is checked before loading; a file is
/// recorded only after a fully validated run, so failed runs stay
/// retryable.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MarkerConfig {
    pub enabled: bool,
    pub path: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ReportConfig {
    pub out_dir: String,
    pub charts_dir: String,
}

impl Config {
    pub fn default_for(data_dir: &str) -> Self {
        Self {
            input: InputConfig {
                data_dir: data_dir.to_string(),
                extension: "csv".to_string(),
                convention: Convention::Dated,
            },
            drift: DriftConfig {
                tolerance: DEFAULT_DRIFT_TOLERANCE,
            },
            marker: MarkerConfig {
                enabled: false,
                path: "processed.lst".to_string(),
            },
            report: ReportConfig {
                out_dir: "reports".to_string(),
                charts_dir: "charts".to_string(),
            },
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let s = std::fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
        let cfg: Config = toml::from_str(&s).with_context(|| "parse rosterqa.toml")?;
        Ok(cfg)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).ok();
        }
        let s = toml::to_string_pretty(self).with_context(|| "serialize toml")?;
        std::fs::write(path, s).with_context(|| format!("write {}", path.display()))?;
        Ok(())
    }

    pub fn config_path(root: &Path) -> PathBuf {
        root.join("rosterqa.toml")
    }

    pub fn data_dir(&self) -> PathBuf {
        PathBuf::from(&self.input.data_dir)
    }

    pub fn marker_path(&self) -> PathBuf {
        PathBuf::from(&self.marker.path)
    }

    pub fn out_dir(&self) -> PathBuf {
        PathBuf::from(&self.report.out_dir)
    }

    pub fn charts_dir(&self) -> PathBuf {
        PathBuf::from(&self.report.charts_dir)
    }
}
