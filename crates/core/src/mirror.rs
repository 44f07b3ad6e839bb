//! Dataset mirroring.
//!
//! [`DatasetMirror`] copies the files produced by one scan from the acquisition save area
//! into the structured dataset tree and writes the session's `metadata.json`.
//!
//! A run is a single linear pass:
//!
//! 1. derive the session directory from the records,
//! 2. create the session directory and its fixed subdirectories,
//! 3. copy the primary data files and the matching sequence files,
//! 4. write the metadata record.
//!
//! Source files that are absent are skipped and reported, never treated as errors. Nothing
//! is rolled back when a later stage fails: directories and files created up to that point
//! stay on disk.

use crate::constants::{PRIMARY_FILE_MAP, SEQ_DIR_NAME, SEQ_EXTENSION};
use crate::layout::{BaseIdentifier, DatasetSessionPath};
use crate::records::{MetadataRecord, ScanInfo, SessionInfo};
use crate::{MirrorConfig, MirrorError, MirrorResult};
use std::fs;
use std::path::{Path, PathBuf};

/// A file copied into the dataset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopiedFile {
    pub source: PathBuf,
    pub destination: PathBuf,
}

/// Outcome of a successful mirror run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MirrorReport {
    /// The populated session directory.
    pub session_dir: PathBuf,

    /// Files copied, in copy order.
    pub copied: Vec<CopiedFile>,

    /// Expected source files that did not exist.
    pub skipped: Vec<PathBuf>,

    /// Location of the written metadata record.
    pub metadata_file: PathBuf,
}

impl MirrorReport {
    fn new(layout: &DatasetSessionPath) -> Self {
        Self {
            session_dir: layout.session_dir().to_path_buf(),
            copied: Vec::new(),
            skipped: Vec::new(),
            metadata_file: layout.metadata_file(),
        }
    }

    /// True when every expected primary file was found.
    pub fn is_complete(&self) -> bool {
        self.skipped.is_empty()
    }
}

/// Mirrors scan output into the dataset rooted at the configured dataset root.
#[derive(Debug, Clone)]
pub struct DatasetMirror {
    config: MirrorConfig,
}

impl DatasetMirror {
    pub fn new(config: MirrorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &MirrorConfig {
        &self.config
    }

    /// Computes the destination session directory without touching the filesystem.
    ///
    /// # Errors
    ///
    /// Returns `MirrorError::MissingField` or `MirrorError::TimestampFormat` when
    /// `name_string` is missing or malformed.
    pub fn session_path(
        &self,
        session_info: &SessionInfo,
        scan_info: &ScanInfo,
    ) -> MirrorResult<DatasetSessionPath> {
        DatasetSessionPath::for_records(self.config.dataset_root(), session_info, scan_info)
    }

    /// Mirrors a scan and returns the session directory, or `None` on failure.
    ///
    /// Failures are logged with their cause. Use [`Self::try_mirror`] to receive the typed
    /// error and the list of copied and skipped files.
    pub fn mirror(
        &self,
        session_info: &SessionInfo,
        scan_info: &ScanInfo,
        primary_save_path: &Path,
    ) -> Option<PathBuf> {
        match self.try_mirror(session_info, scan_info, primary_save_path) {
            Ok(report) => Some(report.session_dir),
            Err(e) => {
                tracing::error!(kind = ?e.kind(), "failed to mirror dataset: {}", e);
                None
            }
        }
    }

    /// Mirrors a scan, returning a report of what was copied.
    ///
    /// # Arguments
    ///
    /// * `session_info` - Session record; only `subject_id` is read.
    /// * `scan_info` - Scan record; `name_string` and `fileName` are required.
    /// * `primary_save_path` - Acquisition save area containing `mat/`, `csv/`, `dcm/`,
    ///   `ismrmrd/` and `seq/`.
    ///
    /// # Errors
    ///
    /// Returns `MirrorError` if:
    /// - `name_string` or `fileName` is missing, or `name_string` is malformed,
    /// - a directory cannot be created or read,
    /// - a file cannot be copied,
    /// - the metadata record cannot be rendered or written.
    pub fn try_mirror(
        &self,
        session_info: &SessionInfo,
        scan_info: &ScanInfo,
        primary_save_path: &Path,
    ) -> MirrorResult<MirrorReport> {
        let layout = self.session_path(session_info, scan_info)?;
        create_session_dirs(&layout)?;

        // The scaffold exists before fileName is checked, so a missing fileName leaves
        // empty session directories behind.
        let base = BaseIdentifier::from_scan(scan_info)?;

        tracing::info!(
            session_dir = %layout.session_dir().display(),
            "Mirroring files for scan: {}",
            base
        );

        let mut report = MirrorReport::new(&layout);
        copy_primary_files(primary_save_path, &layout, &base, &mut report)?;
        copy_sequence_files(primary_save_path, &layout, &base, &mut report)?;
        write_metadata(&layout, session_info, scan_info)?;

        Ok(report)
    }
}

/// Creates the session directory and its fixed subdirectories.
///
/// Directories that already exist are left as they are.
fn create_session_dirs(layout: &DatasetSessionPath) -> MirrorResult<()> {
    for dir in layout.subdirs() {
        fs::create_dir_all(&dir)
            .map_err(|source| MirrorError::DirectoryCreation { path: dir, source })?;
    }
    Ok(())
}

fn copy_primary_files(
    primary_save_path: &Path,
    layout: &DatasetSessionPath,
    base: &BaseIdentifier,
    report: &mut MirrorReport,
) -> MirrorResult<()> {
    for (extension, src_subdir, dest_subdir) in PRIMARY_FILE_MAP {
        let file_name = base.with_extension(extension);
        let source = primary_save_path.join(src_subdir).join(&file_name);
        let destination = layout.subdir(dest_subdir).join(&file_name);
        try_copy(source, destination, report)?;
    }
    Ok(())
}

/// Copies every `<base>*.seq` file from the source `seq/` directory, if there is one.
fn copy_sequence_files(
    primary_save_path: &Path,
    layout: &DatasetSessionPath,
    base: &BaseIdentifier,
    report: &mut MirrorReport,
) -> MirrorResult<()> {
    let source_dir = primary_save_path.join(SEQ_DIR_NAME);
    if !source_dir.exists() {
        tracing::debug!("no sequence directory at {}", source_dir.display());
        return Ok(());
    }

    let read_error = |source: std::io::Error| MirrorError::DirectoryRead {
        path: source_dir.clone(),
        source,
    };

    let mut matches = Vec::new();
    for entry in fs::read_dir(&source_dir).map_err(read_error)? {
        let entry = entry.map_err(read_error)?;
        let Some(name) = entry.file_name().to_str().map(str::to_owned) else {
            continue;
        };
        if base.matches(&name, SEQ_EXTENSION) {
            matches.push((name, entry.path()));
        }
    }
    matches.sort();

    let dest_dir = layout.seq_dir();
    for (name, source) in matches {
        if !source.is_file() {
            tracing::debug!("  - Ignored (not a file): {}", name);
            continue;
        }
        try_copy(source, dest_dir.join(&name), report)?;
    }

    Ok(())
}

/// Copies `source` over `destination` if the source exists, recording the outcome.
fn try_copy(
    source: PathBuf,
    destination: PathBuf,
    report: &mut MirrorReport,
) -> MirrorResult<()> {
    let display_name = source
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    if !source.exists() {
        tracing::info!("  - Skipped (not found): {}", display_name);
        report.skipped.push(source);
        return Ok(());
    }

    fs::copy(&source, &destination).map_err(|e| MirrorError::FileCopy {
        from: source.clone(),
        to: destination.clone(),
        source: e,
    })?;
    tracing::info!("  - Copied: {}", display_name);

    report.copied.push(CopiedFile {
        source,
        destination,
    });
    Ok(())
}

/// Writes `metadata.json`, replacing any previous record.
fn write_metadata(
    layout: &DatasetSessionPath,
    session_info: &SessionInfo,
    scan_info: &ScanInfo,
) -> MirrorResult<()> {
    let bytes = MetadataRecord::new(session_info, scan_info).to_pretty_json()?;
    let path = layout.metadata_file();

    fs::write(&path, bytes).map_err(|source| MirrorError::MetadataWrite {
        path: path.clone(),
        source,
    })?;
    tracing::info!("  - Saved: {}", path.display());

    Ok(())
}
