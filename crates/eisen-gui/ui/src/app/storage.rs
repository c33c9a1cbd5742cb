use eisen_matrix::{
  StorageAdapter,
  StorageError
};

/// `window.localStorage`, or nothing when
/// the browser refuses access (private
/// mode, disabled storage).
#[derive(Debug)]
pub struct LocalStorage {
  inner: Option<web_sys::Storage>
}

impl LocalStorage {
  pub fn open() -> Self {
    let inner = web_sys::window()
      .and_then(|window| {
        window
          .local_storage()
          .ok()
          .flatten()
      });
    if inner.is_none() {
      tracing::warn!(
        "localStorage unavailable; \
         changes will not persist"
      );
    }
    Self { inner }
  }

  fn storage(
    &self
  ) -> Result<&web_sys::Storage, StorageError>
  {
    self.inner.as_ref().ok_or_else(|| {
      StorageError::Unavailable(
        "localStorage is not available"
          .to_string()
      )
    })
  }
}

impl StorageAdapter for LocalStorage {
  fn read(
    &self,
    key: &str
  ) -> Result<Option<String>, StorageError>
  {
    self
      .storage()?
      .get_item(key)
      .map_err(|error| StorageError::Read {
        key:    key.to_string(),
        reason: format!("{error:?}")
      })
  }

  fn write(
    &mut self,
    key: &str,
    value: &str
  ) -> Result<(), StorageError> {
    self
      .storage()?
      .set_item(key, value)
      .map_err(|error| {
        StorageError::Write {
          key:    key.to_string(),
          reason: format!("{error:?}")
        }
      })
  }

  fn remove(
    &mut self,
    key: &str
  ) -> Result<(), StorageError> {
    self
      .storage()?
      .remove_item(key)
      .map_err(|error| {
        StorageError::Write {
          key:    key.to_string(),
          reason: format!("{error:?}")
        }
      })
  }
}
