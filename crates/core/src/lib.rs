//! # Mirror Core
//!
//! Core logic for mirroring MRI acquisition output into a structured dataset tree.
//!
//! Given a session record, a scan record and the acquisition save area, the
//! [`DatasetMirror`] service:
//! - derives the session directory `<dataset_root>/sub-<subject>/ses-<YYYYMMDDTHHMMSS>/`,
//! - creates its `mat/`, `csv/`, `dcm/`, `raw/` and `seq/` subdirectories,
//! - copies the scan's data and sequence files into them,
//! - writes `metadata.json` with the session record and stringified scan parameters.
//!
//! **No front-end concerns**: argument parsing, `.env` loading and log subscriber setup
//! belong in `mirror-cli`.
//!
//! ## Example Usage
//!
//! ```no_run
//! use mirror_core::{DatasetMirror, MirrorConfig, ScanInfo, SessionInfo};
//! use std::path::Path;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mirror = DatasetMirror::new(MirrorConfig::new("/data/mri_dataset")?);
//!
//! let session = SessionInfo::new("Jane Doe");
//! let scan = ScanInfo::new("2024.03.15.09.30.00.123456", "RARE.2024.03.15.09.30.00.mat");
//!
//! let report = mirror.try_mirror(&session, &scan, Path::new("experiments/acquisitions"))?;
//! println!("mirrored into {}", report.session_dir.display());
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod constants;
mod error;
pub mod layout;
mod mirror;
pub mod records;

pub use config::MirrorConfig;
pub use error::{MirrorError, MirrorErrorKind, MirrorResult};
pub use layout::{BaseIdentifier, DatasetSessionPath, SessionLabel, SubjectLabel};
pub use mirror::{CopiedFile, DatasetMirror, MirrorReport};
pub use records::{MetadataRecord, ScanInfo, SessionInfo};
