use std::collections::HashMap;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{
  debug,
  warn
};

use crate::error::StorageError;

pub const TASKS_KEY: &str = "matrix-tasks";
pub const CELLS_KEY: &str = "matrix-cells";
pub const UNDO_KEY: &str = "matrix-undo";

/// Named string blobs in a persistent
/// key-value store.
pub trait StorageAdapter {
  fn read(
    &self,
    key: &str
  ) -> Result<Option<String>, StorageError>;

  fn write(
    &mut self,
    key: &str,
    value: &str
  ) -> Result<(), StorageError>;

  fn remove(
    &mut self,
    key: &str
  ) -> Result<(), StorageError>;
}

/// Reads `key` as JSON. Absent keys,
/// unreadable stores and malformed JSON all
/// yield `default`.
#[tracing::instrument(skip(
  storage, default
))]
pub fn load_or<S, T>(
  storage: &S,
  key: &str,
  default: T
) -> T
where
  S: StorageAdapter + ?Sized,
  T: DeserializeOwned
{
  let raw = match storage.read(key) {
    | Ok(Some(raw)) => raw,
    | Ok(None) => {
      debug!(key, "no stored value; using default");
      return default;
    }
    | Err(error) => {
      warn!(
        key,
        %error,
        "failed reading storage; using \
         default"
      );
      return default;
    }
  };

  match serde_json::from_str::<T>(&raw) {
    | Ok(value) => value,
    | Err(error) => {
      warn!(
        key,
        %error,
        "malformed stored value; using \
         default"
      );
      default
    }
  }
}

#[tracing::instrument(skip(
  storage, value
))]
pub fn save<S, T>(
  storage: &mut S,
  key: &str,
  value: &T
) -> Result<(), StorageError>
where
  S: StorageAdapter + ?Sized,
  T: Serialize + ?Sized
{
  let json = encode(key, value)?;
  storage.write(key, &json)?;
  debug!(
    key,
    bytes = json.len(),
    "saved value"
  );
  Ok(())
}

pub fn encode<T>(
  key: &str,
  value: &T
) -> Result<String, StorageError>
where
  T: Serialize + ?Sized
{
  serde_json::to_string(value).map_err(
    |source| StorageError::Encode {
      key: key.to_string(),
      source
    }
  )
}

/// In-process store. `fail_writes` makes
/// every write fail, mimicking a full or
/// disabled browser store.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
  entries:         HashMap<String, String>,
  pub fail_writes: bool
}

impl MemoryStorage {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_entry(
    mut self,
    key: &str,
    value: &str
  ) -> Self {
    self
      .entries
      .insert(key.to_string(), value.to_string());
    self
  }

  pub fn get(
    &self,
    key: &str
  ) -> Option<&str> {
    self.entries.get(key).map(String::as_str)
  }
}

impl StorageAdapter for MemoryStorage {
  fn read(
    &self,
    key: &str
  ) -> Result<Option<String>, StorageError>
  {
    Ok(self.entries.get(key).cloned())
  }

  fn write(
    &mut self,
    key: &str,
    value: &str
  ) -> Result<(), StorageError> {
    if self.fail_writes {
      return Err(StorageError::Write {
        key:    key.to_string(),
        reason: "quota exceeded"
          .to_string()
      });
    }
    self
      .entries
      .insert(key.to_string(), value.to_string());
    Ok(())
  }

  fn remove(
    &mut self,
    key: &str
  ) -> Result<(), StorageError> {
    self.entries.remove(key);
    Ok(())
  }
}
