use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use anyhow::Context;
use eisen_matrix::{StorageAdapter, StorageError};
use tempfile::NamedTempFile;
use tracing::{debug, info};

/// One JSON file per storage key under the data directory.
#[derive(Debug)]
pub struct FileStorage {
    pub data_dir: PathBuf,
}

impl FileStorage {
    #[tracing::instrument(skip(data_dir))]
    pub fn open(data_dir: &Path) -> anyhow::Result<Self> {
        let data_dir = data_dir.to_path_buf();
        fs::create_dir_all(&data_dir)
            .with_context(|| format!("failed to create {}", data_dir.display()))?;

        info!(data_dir = %data_dir.display(), "opened file storage");

        Ok(Self { data_dir })
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        self.data_dir.join(format!("{key}.json"))
    }
}

impl StorageAdapter for FileStorage {
    #[tracing::instrument(skip(self))]
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path_for(key);
        match fs::read_to_string(&path) {
            Ok(raw) => {
                debug!(file = %path.display(), bytes = raw.len(), "read blob");
                Ok(Some(raw))
            }
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(StorageError::Read {
                key: key.to_string(),
                reason: format!("{}: {err}", path.display()),
            }),
        }
    }

    #[tracing::instrument(skip(self, value))]
    fn write(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.path_for(key);
        debug!(file = %path.display(), bytes = value.len(), "writing blob atomically");
        write_atomic(&self.data_dir, &path, value).map_err(|err| StorageError::Write {
            key: key.to_string(),
            reason: format!("{err:#}"),
        })
    }

    #[tracing::instrument(skip(self))]
    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        let path = self.path_for(key);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(StorageError::Write {
                key: key.to_string(),
                reason: format!("remove {}: {err}", path.display()),
            }),
        }
    }
}

fn write_atomic(dir: &Path, path: &Path, value: &str) -> anyhow::Result<()> {
    let mut temp = NamedTempFile::new_in(dir)
        .with_context(|| format!("failed to create temp file in {}", dir.display()))?;
    temp.write_all(value.as_bytes())?;
    temp.flush()?;
    temp.persist(path)
        .with_context(|| format!("failed to persist {}", path.display()))?;
    Ok(())
}
