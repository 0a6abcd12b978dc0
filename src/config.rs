//! Configuration loading from file, environment, and CLI arguments.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::types::{QnaError, QnaResult};

/// Counter change applied when a viewer flips from one vote direction to
/// the other in a single toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlipDelta {
    /// Move the counter by one step in the new direction.
    #[default]
    Single,
    /// Cancel the old vote and apply the new one: two steps.
    Double,
}

impl FlipDelta {
    /// Magnitude of the counter change on a flip.
    pub fn magnitude(&self) -> i64 {
        match self {
            Self::Single => 1,
            Self::Double => 2,
        }
    }
}

/// Hub configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HubConfig {
    /// Path to the .qnah snapshot file.
    #[serde(default = "default_data_path")]
    pub data_path: PathBuf,
    /// Page size used when a listing does not ask for one.
    #[serde(default = "default_page_size")]
    pub default_page_size: usize,
    /// Largest page size a listing may ask for.
    #[serde(default = "default_max_page_size")]
    pub max_page_size: usize,
    /// Attempts for a read-modify-write before giving up on version conflicts.
    #[serde(default = "default_max_write_retries")]
    pub max_write_retries: u32,
    /// Counter change on an up/down flip.
    #[serde(default)]
    pub flip_delta: FlipDelta,
    /// Log level used when RUST_LOG is not set.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_data_path() -> PathBuf {
    PathBuf::from("hub.qnah")
}

fn default_page_size() -> usize {
    10
}

fn default_max_page_size() -> usize {
    50
}

fn default_max_write_retries() -> u32 {
    3
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for HubConfig {
    fn default() -> Self {
        Self {
            data_path: default_data_path(),
            default_page_size: default_page_size(),
            max_page_size: default_max_page_size(),
            max_write_retries: default_max_write_retries(),
            flip_delta: FlipDelta::default(),
            log_level: default_log_level(),
        }
    }
}

impl HubConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> QnaResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content).map_err(|e| {
            QnaError::Validation(format!("failed to parse config {}: {e}", path.display()))
        })?;
        config.validate()?;
        log::info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Resolve configuration using priority order:
    /// 1. Explicit config path (CLI arg)
    /// 2. QNA_HUB_CONFIG environment variable
    /// 3. Built-in defaults
    ///
    /// QNA_HUB_DATA, when set, overrides the data path of whichever was chosen.
    pub fn resolve(explicit: Option<&Path>) -> QnaResult<Self> {
        let mut config = match explicit {
            Some(path) => Self::load(path)?,
            None => match std::env::var("QNA_HUB_CONFIG") {
                Ok(path) => Self::load(Path::new(&path))?,
                Err(_) => Self::default(),
            },
        };

        if let Ok(data_path) = std::env::var("QNA_HUB_DATA") {
            config.data_path = PathBuf::from(data_path);
        }
        Ok(config)
    }

    /// Check the numeric settings are usable.
    pub fn validate(&self) -> QnaResult<()> {
        if self.default_page_size == 0 || self.max_page_size == 0 {
            return Err(QnaError::Validation("page sizes must be positive".into()));
        }
        if self.default_page_size > self.max_page_size {
            return Err(QnaError::Validation(format!(
                "default_page_size {} exceeds max_page_size {}",
                self.default_page_size, self.max_page_size
            )));
        }
        if self.max_write_retries == 0 {
            return Err(QnaError::Validation(
                "max_write_retries must be at least 1".into(),
            ));
        }
        Ok(())
    }
}
