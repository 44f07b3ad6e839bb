use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum MirrorError {
    #[error("'{0}' is missing from scan_info")]
    MissingField(&'static str),
    #[error("name_string {value:?} does not match the acquisition timestamp format: {source}")]
    TimestampFormat {
        value: String,
        #[source]
        source: chrono::ParseError,
    },
    #[error("failed to create directory {path}: {source}", path = path.display())]
    DirectoryCreation {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to read directory {path}: {source}", path = path.display())]
    DirectoryRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(
        "failed to copy {from} to {to}: {source}",
        from = from.display(),
        to = to.display()
    )]
    FileCopy {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write metadata file {path}: {source}", path = path.display())]
    MetadataWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to serialize metadata: {0}")]
    Serialization(#[source] serde_json::Error),
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Coarse classification of a [`MirrorError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MirrorErrorKind {
    MissingField,
    TimestampFormat,
    Filesystem,
    Serialization,
    Config,
}

impl MirrorError {
    pub fn kind(&self) -> MirrorErrorKind {
        match self {
            MirrorError::MissingField(_) => MirrorErrorKind::MissingField,
            MirrorError::TimestampFormat { .. } => MirrorErrorKind::TimestampFormat,
            MirrorError::DirectoryCreation { .. }
            | MirrorError::DirectoryRead { .. }
            | MirrorError::FileCopy { .. }
            | MirrorError::MetadataWrite { .. } => MirrorErrorKind::Filesystem,
            MirrorError::Serialization(_) => MirrorErrorKind::Serialization,
            MirrorError::InvalidConfig(_) => MirrorErrorKind::Config,
        }
    }
}

pub type MirrorResult<T> = std::result::Result<T, MirrorError>;
