//! Constants used throughout the mirror core crate.
//!
//! This module contains the directory names, filenames and timestamp formats that define the
//! on-disk dataset layout, so the layout is described in exactly one place.

/// Default dataset root used when no explicit root is configured.
pub const DEFAULT_DATASET_ROOT: &str = "mri_dataset";

/// Environment variable consulted by front ends for the dataset root.
pub const DATASET_ROOT_ENV_VAR: &str = "MIRROR_DATASET_ROOT";

/// Subject id used when the session record carries none.
pub const UNKNOWN_SUBJECT_ID: &str = "UnknownSubject";

/// Prefix of the per-subject folder.
pub const SUBJECT_PREFIX: &str = "sub-";

/// Prefix of the per-session folder.
pub const SESSION_PREFIX: &str = "ses-";

/// Format of the acquisition timestamp carried in `name_string`.
pub const NAME_STRING_FORMAT: &str = "%Y.%m.%d.%H.%M.%S.%f";

/// Compact, seconds-precision format used for session folder names.
pub const SESSION_TIMESTAMP_FORMAT: &str = "%Y%m%dT%H%M%S";

/// Fixed subdirectories created inside every session directory.
pub const SESSION_SUBDIRS: [&str; 5] = ["mat", "csv", "dcm", "raw", "seq"];

/// Primary data files: `(extension, source subdirectory, destination subdirectory)`.
pub const PRIMARY_FILE_MAP: [(&str, &str, &str); 4] = [
    (".mat", "mat", "mat"),
    (".csv", "csv", "csv"),
    (".dcm", "dcm", "dcm"),
    (".h5", "ismrmrd", "raw"),
];

/// Subdirectory holding sequence files, in both source and destination trees.
pub const SEQ_DIR_NAME: &str = "seq";

/// Extension of sequence files.
pub const SEQ_EXTENSION: &str = ".seq";

/// Filename of the per-session metadata record.
pub const METADATA_FILENAME: &str = "metadata.json";

/// Indentation used when pretty-printing the metadata record.
pub const METADATA_INDENT: &[u8] = b"    ";

/// Scan record key carrying the acquisition timestamp.
pub const NAME_STRING_KEY: &str = "name_string";

/// Scan record key carrying the primary output filename.
pub const FILE_NAME_KEY: &str = "fileName";
