//! JSON persistence of driver results.

use std::{
    fs::{self, File},
    io::{BufReader, BufWriter, Write},
    path::{Path, PathBuf},
};

use serde::{Serialize, de::DeserializeOwned};
use thiserror::Error;

use crate::role::Role;

/// Errors raised while reading or writing result files.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error on `{}`", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON in `{}`", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl StoreError {
    fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    fn json(path: &Path, source: serde_json::Error) -> Self {
        Self::Json {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Writes `value` as pretty JSON to `path`, creating parent directories.
///
/// Only the coordinator writes; other roles return `Ok(false)` without
/// touching the file system.
///
/// # Errors
///
/// Returns a [`StoreError`] if a directory or the file cannot be created,
/// or if serialization fails.
pub fn write_json<T: Serialize + ?Sized>(
    role: Role,
    path: &Path,
    value: &T,
) -> Result<bool, StoreError> {
    if !role.is_coordinator() {
        return Ok(false);
    }

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|e| StoreError::io(parent, e))?;
    }

    let file = File::create(path).map_err(|e| StoreError::io(path, e))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, value).map_err(|e| StoreError::json(path, e))?;
    writer.flush().map_err(|e| StoreError::io(path, e))?;

    log::debug!("wrote {}", path.display());
    Ok(true)
}

/// Reads a JSON value from `path`.
///
/// # Errors
///
/// Returns a [`StoreError`] if the file cannot be opened or does not hold
/// a valid `T`.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, StoreError> {
    let file = File::open(path).map_err(|e| StoreError::io(path, e))?;
    serde_json::from_reader(BufReader::new(file)).map_err(|e| StoreError::json(path, e))
}
