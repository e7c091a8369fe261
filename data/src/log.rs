use std::path::{Path, PathBuf};
use std::{fs, io};

const LOG_FILE: &str = "dockyard-current.log";

/// Full path of the current log file, creating its directory if needed.
pub fn path(root: &Path) -> Result<PathBuf, Error> {
    let full_path = root.join(LOG_FILE);

    let parent = full_path
        .parent()
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "Invalid log file path"))?;

    if !parent.exists() {
        fs::create_dir_all(parent)?;
    }

    Ok(full_path)
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    SetLog(#[from] log::SetLoggerError),
    #[error(transparent)]
    ParseLevel(#[from] log::ParseLevelError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_creates_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("nested").join("logs");

        let log_path = path(&root).unwrap();

        assert!(root.is_dir());
        assert_eq!(log_path, root.join(LOG_FILE));
    }
}
