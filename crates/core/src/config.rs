//! Core runtime configuration.
//!
//! The dataset root is resolved once at process startup and then handed to
//! [`crate::DatasetMirror`]. Library code never reads environment variables itself, so every
//! mirror call in a process sees the same root.

use crate::constants::DEFAULT_DATASET_ROOT;
use crate::{MirrorError, MirrorResult};
use std::path::{Path, PathBuf};

/// Core configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct MirrorConfig {
    dataset_root: PathBuf,
}

impl MirrorConfig {
    /// Create a new `MirrorConfig`.
    ///
    /// # Errors
    ///
    /// Returns `MirrorError::InvalidConfig` if `dataset_root` is empty.
    pub fn new(dataset_root: impl Into<PathBuf>) -> MirrorResult<Self> {
        let dataset_root = dataset_root.into();
        if dataset_root.as_os_str().is_empty() {
            return Err(MirrorError::InvalidConfig(
                "dataset_root cannot be empty".into(),
            ));
        }

        Ok(Self { dataset_root })
    }

    pub fn dataset_root(&self) -> &Path {
        &self.dataset_root
    }
}

/// Resolve the dataset root from an optional string value.
///
/// If `value` is `None` or empty/whitespace, returns [`DEFAULT_DATASET_ROOT`].
pub fn dataset_root_from_env_value(value: Option<String>) -> PathBuf {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DATASET_ROOT))
}
