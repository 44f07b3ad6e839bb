//! On-disk dataset layout.
//!
//! This module derives the labels and paths of a session directory from the session and
//! scan records. It contains **no I/O logic** - only typed path construction.
//!
//! ```text
//! <dataset_root>/
//! └── sub-<subject>/
//!     └── ses-<YYYYMMDDTHHMMSS>/
//!         ├── mat/  csv/  dcm/  raw/  seq/
//!         └── metadata.json
//! ```

use crate::constants::{
    FILE_NAME_KEY, METADATA_FILENAME, NAME_STRING_FORMAT, NAME_STRING_KEY, SEQ_DIR_NAME,
    SESSION_PREFIX, SESSION_SUBDIRS, SESSION_TIMESTAMP_FORMAT, SUBJECT_PREFIX, UNKNOWN_SUBJECT_ID,
};
use crate::records::{ScanInfo, SessionInfo};
use crate::{MirrorError, MirrorResult};
use chrono::NaiveDateTime;
use std::path::{Path, PathBuf};

/// Folder name of a subject, e.g. `sub-Jane_Doe`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubjectLabel(String);

impl SubjectLabel {
    /// Derives the subject label from a session record.
    ///
    /// Only a missing `subject_id` falls back to [`UNKNOWN_SUBJECT_ID`]; an empty or blank
    /// one is used as given. Spaces are replaced with underscores; no other character is
    /// touched.
    pub fn from_session(session_info: &SessionInfo) -> Self {
        let subject_id = session_info
            .subject_id
            .as_deref()
            .unwrap_or(UNKNOWN_SUBJECT_ID);
        Self(format!("{}{}", SUBJECT_PREFIX, subject_id.replace(' ', "_")))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Folder name of a session, e.g. `ses-20240315T093000`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionLabel(String);

impl SessionLabel {
    /// Parses an acquisition timestamp (`YYYY.MM.DD.HH.MM.SS.ffffff`) into a session label.
    ///
    /// Fractional seconds are dropped from the label.
    ///
    /// # Errors
    ///
    /// Returns `MirrorError::TimestampFormat` if the value does not match the format.
    pub fn parse(name_string: &str) -> MirrorResult<Self> {
        let acquired_at =
            NaiveDateTime::parse_from_str(name_string, NAME_STRING_FORMAT).map_err(|source| {
                MirrorError::TimestampFormat {
                    value: name_string.to_string(),
                    source,
                }
            })?;

        Ok(Self(format!(
            "{}{}",
            SESSION_PREFIX,
            acquired_at.format(SESSION_TIMESTAMP_FORMAT)
        )))
    }

    /// Derives the session label from the scan record's `name_string`.
    ///
    /// # Errors
    ///
    /// Returns `MirrorError::MissingField` if `name_string` is absent or empty, and
    /// `MirrorError::TimestampFormat` if it cannot be parsed.
    pub fn from_scan(scan_info: &ScanInfo) -> MirrorResult<Self> {
        let name_string = scan_info
            .name_string
            .as_deref()
            .filter(|s| !s.is_empty())
            .ok_or(MirrorError::MissingField(NAME_STRING_KEY))?;
        Self::parse(name_string)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// The scan's filename stem, shared by every file that belongs to the scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaseIdentifier(String);

impl BaseIdentifier {
    /// Derives the base identifier from the scan record's `fileName`.
    ///
    /// # Errors
    ///
    /// Returns `MirrorError::MissingField` if `fileName` is absent or nothing remains once
    /// the extension is stripped.
    pub fn from_scan(scan_info: &ScanInfo) -> MirrorResult<Self> {
        let stem = strip_extension(scan_info.file_name.as_deref().unwrap_or_default());
        if stem.is_empty() {
            return Err(MirrorError::MissingField(FILE_NAME_KEY));
        }
        Ok(Self(stem.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Filename of the scan's file with the given extension (including the dot).
    pub fn with_extension(&self, extension: &str) -> String {
        format!("{}{}", self.0, extension)
    }

    /// Whether a directory entry name is one of this scan's files with `extension`.
    pub fn matches(&self, entry_name: &str, extension: &str) -> bool {
        entry_name.starts_with(&self.0) && entry_name.ends_with(extension)
    }
}

impl std::fmt::Display for BaseIdentifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Strips the final extension from a filename.
///
/// Only the last `.`-separated suffix of the final path component is removed, and leading
/// dots of that component never start an extension (`.hidden` keeps its name).
pub fn strip_extension(file_name: &str) -> &str {
    let name_start = file_name.rfind(['/', '\\']).map(|i| i + 1).unwrap_or(0);
    let name = &file_name[name_start..];
    let leading_dots = name.len() - name.trim_start_matches('.').len();

    match name[leading_dots..].rfind('.') {
        Some(dot) => &file_name[..name_start + leading_dots + dot],
        None => file_name,
    }
}

/// Destination session directory within a dataset root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetSessionPath {
    session_dir: PathBuf,
}

impl DatasetSessionPath {
    /// Builds `<dataset_root>/<subject>/<session>`.
    pub fn new(dataset_root: &Path, subject: &SubjectLabel, session: &SessionLabel) -> Self {
        Self {
            session_dir: dataset_root.join(subject.as_str()).join(session.as_str()),
        }
    }

    /// Derives the session directory for a pair of records.
    ///
    /// # Errors
    ///
    /// Fails when `name_string` is missing or malformed.
    pub fn for_records(
        dataset_root: &Path,
        session_info: &SessionInfo,
        scan_info: &ScanInfo,
    ) -> MirrorResult<Self> {
        let subject = SubjectLabel::from_session(session_info);
        let session = SessionLabel::from_scan(scan_info)?;
        Ok(Self::new(dataset_root, &subject, &session))
    }

    pub fn session_dir(&self) -> &Path {
        &self.session_dir
    }

    /// Path of one of the fixed session subdirectories.
    pub fn subdir(&self, name: &str) -> PathBuf {
        self.session_dir.join(name)
    }

    /// All fixed subdirectories, in creation order.
    pub fn subdirs(&self) -> impl Iterator<Item = PathBuf> + '_ {
        SESSION_SUBDIRS.iter().map(|name| self.subdir(name))
    }

    pub fn seq_dir(&self) -> PathBuf {
        self.subdir(SEQ_DIR_NAME)
    }

    pub fn metadata_file(&self) -> PathBuf {
        self.session_dir.join(METADATA_FILENAME)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subject_label_replaces_spaces() {
        let label = SubjectLabel::from_session(&SessionInfo::new("Jane Doe"));
        assert_eq!(label.as_str(), "sub-Jane_Doe");

        let label = SubjectLabel::from_session(&SessionInfo::new("a  b c"));
        assert_eq!(label.as_str(), "sub-a__b_c");
    }

    #[test]
    fn test_subject_label_falls_back_when_missing() {
        let label = SubjectLabel::from_session(&SessionInfo::default());
        assert_eq!(label.as_str(), "sub-UnknownSubject");
    }

    #[test]
    fn test_blank_subject_id_is_used_as_given() {
        let label = SubjectLabel::from_session(&SessionInfo::new("  "));
        assert_eq!(label.as_str(), "sub-__");

        let label = SubjectLabel::from_session(&SessionInfo::new(""));
        assert_eq!(label.as_str(), "sub-");
    }

    #[test]
    fn test_session_label_drops_fractional_seconds() {
        let label = SessionLabel::parse("2024.03.15.09.30.00.123456").unwrap();
        assert_eq!(label.as_str(), "ses-20240315T093000");

        let label = SessionLabel::parse("2024.03.15.09.30.00.999999").unwrap();
        assert_eq!(label.as_str(), "ses-20240315T093000");
    }

    #[test]
    fn test_session_label_rejects_other_formats() {
        for bad in [
            "2024-03-15T09:30:00",
            "2024.03.15.09.30.00",
            "2024.13.15.09.30.00.000000",
            "not a timestamp",
        ] {
            let result = SessionLabel::parse(bad);
            assert!(
                matches!(result, Err(MirrorError::TimestampFormat { .. })),
                "expected timestamp error for {bad:?}"
            );
        }
    }

    #[test]
    fn test_session_label_requires_name_string() {
        let scan = ScanInfo {
            file_name: Some("scan.mat".into()),
            ..ScanInfo::default()
        };
        assert!(matches!(
            SessionLabel::from_scan(&scan),
            Err(MirrorError::MissingField("name_string"))
        ));

        let scan = ScanInfo::new("", "scan.mat");
        assert!(matches!(
            SessionLabel::from_scan(&scan),
            Err(MirrorError::MissingField("name_string"))
        ));
    }

    #[test]
    fn test_strip_extension() {
        assert_eq!(strip_extension("scan.mat"), "scan");
        assert_eq!(strip_extension("RARE.2024.03.15.mat"), "RARE.2024.03.15");
        assert_eq!(strip_extension("scan"), "scan");
        assert_eq!(strip_extension(".hidden"), ".hidden");
        assert_eq!(strip_extension("..scan.h5"), "..scan");
        assert_eq!(strip_extension("dir.v2/scan"), "dir.v2/scan");
        assert_eq!(strip_extension(".mat"), ".mat");
        assert_eq!(strip_extension(""), "");
    }

    #[test]
    fn test_base_identifier_requires_file_name() {
        let scan = ScanInfo {
            name_string: Some("2024.03.15.09.30.00.123456".into()),
            ..ScanInfo::default()
        };
        assert!(matches!(
            BaseIdentifier::from_scan(&scan),
            Err(MirrorError::MissingField("fileName"))
        ));

        let scan = ScanInfo::new("2024.03.15.09.30.00.123456", "");
        assert!(matches!(
            BaseIdentifier::from_scan(&scan),
            Err(MirrorError::MissingField("fileName"))
        ));
    }

    #[test]
    fn test_base_identifier_matching() {
        let base =
            BaseIdentifier::from_scan(&ScanInfo::new("2024.03.15.09.30.00.1", "X1.mat")).unwrap();

        assert_eq!(base.as_str(), "X1");
        assert_eq!(base.with_extension(".h5"), "X1.h5");
        assert!(base.matches("X1.seq", ".seq"));
        assert!(base.matches("X1_cal.seq", ".seq"));
        assert!(!base.matches("Y2.seq", ".seq"));
        assert!(!base.matches("X1.seq.bak", ".seq"));
    }

    #[test]
    fn test_dataset_session_path_layout() {
        let session = SessionInfo::new("Jane Doe");
        let scan = ScanInfo::new("2024.03.15.09.30.00.123456", "scan.mat");
        let path =
            DatasetSessionPath::for_records(Path::new("/data/mri"), &session, &scan).unwrap();

        assert_eq!(
            path.session_dir(),
            Path::new("/data/mri/sub-Jane_Doe/ses-20240315T093000")
        );
        assert_eq!(
            path.metadata_file(),
            Path::new("/data/mri/sub-Jane_Doe/ses-20240315T093000/metadata.json")
        );

        let subdirs: Vec<PathBuf> = path.subdirs().collect();
        assert_eq!(subdirs.len(), 5);
        assert!(subdirs.iter().all(|d| d.starts_with(path.session_dir())));
        assert!(path.seq_dir().ends_with("seq"));
    }
}
