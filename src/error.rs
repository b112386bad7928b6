use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum PatchError {
    #[error("{0} could not be found.")]
    MissingFile(PathBuf),
    #[error("Unable to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Unable to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("{path} is not a valid config document: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("Mismatch at 0x{offset:X} (expected {expected}, found {}), skipping: {description}", display_found(.found))]
    OffsetMismatch {
        offset: usize,
        expected: u32,
        found: Option<u32>,
        description: String,
    },
    #[error("No valid patch locations found. The executable may be a different version.")]
    NoValidPatches,
    #[error("Backup file not found: {0}. Cannot restore without backup.")]
    MissingBackup(PathBuf),
}

fn display_found(found: &Option<u32>) -> String {
    match found {
        Some(value) => value.to_string(),
        None => "end of file".to_string(),
    }
}

impl PatchError {
    pub(crate) fn read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        if source.kind() == std::io::ErrorKind::NotFound {
            PatchError::MissingFile(path)
        } else {
            PatchError::Read { path, source }
        }
    }

    pub(crate) fn write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        PatchError::Write {
            path: path.into(),
            source,
        }
    }
}
