//! The task board and cell registry bound
//! to a storage adapter.
//!
//! Every successful mutation writes the
//! whole affected blob back. A failed write
//! is not an error for the caller: the
//! matrix records a warning and keeps
//! working in memory for the rest of the
//! session.

use chrono::NaiveDate;
use tracing::{
  info,
  warn
};

use crate::board::{
  DeletedTask,
  TaskBoard
};
use crate::cell::{
  CellId,
  CellRegistry
};
use crate::error::{
  Result,
  StorageError
};
use crate::export::{
  ExportFile,
  export_file_name
};
use crate::storage::{
  self,
  CELLS_KEY,
  StorageAdapter,
  TASKS_KEY
};
use crate::task::TaskId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageWarning {
  pub key:     String,
  pub message: String
}

#[derive(Debug)]
pub struct Matrix<S> {
  board:    TaskBoard,
  cells:    CellRegistry,
  storage:  S,
  degraded: bool,
  warning:  Option<StorageWarning>
}

impl<S: StorageAdapter> Matrix<S> {
  #[tracing::instrument(skip(storage))]
  pub fn load(storage: S) -> Self {
    let cells = storage::load_or(
      &storage,
      CELLS_KEY,
      CellRegistry::default()
    );
    let mut board = storage::load_or(
      &storage,
      TASKS_KEY,
      TaskBoard::seeded()
    );
    board.ensure_cells(cells.ids());

    info!(
      cells = cells.len(),
      tasks = board.len(),
      "loaded matrix"
    );

    Self {
      board,
      cells,
      storage,
      degraded: false,
      warning: None
    }
  }

  pub fn board(&self) -> &TaskBoard {
    &self.board
  }

  pub fn cells(&self) -> &CellRegistry {
    &self.cells
  }

  pub fn storage(&self) -> &S {
    &self.storage
  }

  pub fn storage_mut(&mut self) -> &mut S {
    &mut self.storage
  }

  /// True once a write has failed; no
  /// further writes are attempted.
  pub fn is_degraded(&self) -> bool {
    self.degraded
  }

  pub fn take_warning(
    &mut self
  ) -> Option<StorageWarning> {
    self.warning.take()
  }

  pub fn add_task(
    &mut self,
    cell: &CellId,
    text: &str
  ) -> Result<TaskId> {
    let id = self.board.add_task(cell, text)?;
    self.persist_tasks();
    Ok(id)
  }

  pub fn reorder(
    &mut self,
    cell: &CellId,
    from: usize,
    to: usize
  ) -> Result<()> {
    self.board.reorder(cell, from, to)?;
    self.persist_tasks();
    Ok(())
  }

  pub fn move_task(
    &mut self,
    source: &CellId,
    source_index: usize,
    destination: &CellId,
    destination_index: usize
  ) -> Result<()> {
    self.board.move_task(
      source,
      source_index,
      destination,
      destination_index
    )?;
    self.persist_tasks();
    Ok(())
  }

  pub fn resort_by_completion(&mut self) {
    self.board.resort_by_completion();
    self.persist_tasks();
  }

  pub fn toggle_done(
    &mut self,
    cell: &CellId,
    id: TaskId
  ) -> Result<bool> {
    let done =
      self.board.toggle_done(cell, id)?;
    self.persist_tasks();
    Ok(done)
  }

  pub fn delete_task(
    &mut self,
    cell: &CellId,
    id: TaskId
  ) -> Result<DeletedTask> {
    let deleted =
      self.board.delete_task(cell, id)?;
    self.persist_tasks();
    Ok(deleted)
  }

  pub fn restore_task(
    &mut self,
    deleted: DeletedTask,
    at: Option<usize>
  ) -> Result<usize> {
    let index =
      self.board.restore_task(deleted, at)?;
    self.persist_tasks();
    Ok(index)
  }

  pub fn rename_cell(
    &mut self,
    cell: &CellId,
    title: &str
  ) -> Result<()> {
    self.cells.rename_cell(cell, title)?;
    self.persist_cells();
    Ok(())
  }

  /// Serializes the in-memory task board
  /// with the same encoder persistence
  /// uses.
  pub fn export(
    &self,
    date: NaiveDate
  ) -> std::result::Result<
    ExportFile,
    StorageError
  > {
    Ok(ExportFile {
      name:     export_file_name(date),
      contents: storage::encode(
        TASKS_KEY,
        &self.board
      )?
    })
  }

  fn persist_tasks(&mut self) {
    if self.degraded {
      return;
    }
    let result = storage::save(
      &mut self.storage,
      TASKS_KEY,
      &self.board
    );
    self.record(TASKS_KEY, result);
  }

  fn persist_cells(&mut self) {
    if self.degraded {
      return;
    }
    let result = storage::save(
      &mut self.storage,
      CELLS_KEY,
      &self.cells
    );
    self.record(CELLS_KEY, result);
  }

  fn record(
    &mut self,
    key: &str,
    result: std::result::Result<
      (),
      StorageError
    >
  ) {
    if let Err(error) = result {
      warn!(
        key,
        %error,
        "persisting failed; continuing \
         in memory only"
      );
      self.degraded = true;
      self.warning = Some(StorageWarning {
        key:     key.to_string(),
        message: error.to_string()
      });
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::storage::MemoryStorage;

  fn cell(n: u8) -> CellId {
    CellId::from_shortcut_digit(n)
      .expect("valid cell digit")
  }

  #[test]
  fn add_task_persists_whole_board() {
    let mut matrix =
      Matrix::load(MemoryStorage::new());
    matrix
      .add_task(&cell(1), "Draft report")
      .expect("add");

    let stored = matrix
      .storage()
      .get(TASKS_KEY)
      .expect("tasks persisted");
    let value: serde_json::Value =
      serde_json::from_str(stored)
        .expect("stored json");
    assert_eq!(
      value["cell-1"][0]["text"],
      "Draft report"
    );
    assert_eq!(
      value["cell-1"][0]["done"],
      false
    );
    for other in ["cell-2", "cell-3", "cell-4"]
    {
      assert_eq!(
        value[other],
        serde_json::json!([])
      );
    }
  }

  #[test]
  fn export_matches_persisted_blob() {
    let mut matrix =
      Matrix::load(MemoryStorage::new());
    matrix
      .add_task(&cell(1), "Draft report")
      .expect("add");

    let date =
      NaiveDate::from_ymd_opt(2025, 1, 7)
        .expect("valid date");
    let file =
      matrix.export(date).expect("export");
    assert_eq!(
      file.name,
      "eisen-07-Jan-2025.json"
    );
    assert_eq!(
      Some(file.contents.as_str()),
      matrix.storage().get(TASKS_KEY)
    );
  }

  #[test]
  fn reload_restores_state() {
    let mut matrix =
      Matrix::load(MemoryStorage::new());
    matrix
      .add_task(&cell(2), "Book dentist")
      .expect("add");
    matrix
      .rename_cell(&cell(2), "Soon")
      .expect("rename");

    let storage = matrix.storage().clone();
    let reloaded = Matrix::load(storage);
    assert_eq!(reloaded.board(), matrix.board());
    assert_eq!(
      reloaded
        .cells()
        .get(&cell(2))
        .map(|def| def.title.as_str()),
      Some("Soon")
    );
  }

  #[test]
  fn malformed_blob_falls_back_to_seed() {
    let storage = MemoryStorage::new()
      .with_entry(TASKS_KEY, "[[[")
      .with_entry(CELLS_KEY, "42");
    let matrix = Matrix::load(storage);
    assert_eq!(
      matrix.board(),
      &TaskBoard::seeded()
    );
    assert_eq!(
      matrix.cells(),
      &CellRegistry::default()
    );
  }

  #[test]
  fn registered_cell_missing_from_tasks_starts_empty() {
    let task = crate::task::Task::new("Pay rent");
    let tasks = serde_json::json!({ "cell-1": [&task] });
    let storage = MemoryStorage::new()
      .with_entry(TASKS_KEY, &tasks.to_string());
    let mut matrix = Matrix::load(storage);

    assert_eq!(matrix.board().cells().count(), 4);
    assert_eq!(matrix.board().len(), 1);
    for n in 2..=4 {
      assert!(
        matrix
          .board()
          .tasks(&cell(n))
          .is_some_and(|tasks| tasks.is_empty())
      );
    }
    assert!(
      matrix.board().find(&cell(1), task.id).is_some()
    );
    matrix
      .add_task(&cell(3), "Call plumber")
      .expect("add to filled-in cell");
    assert_eq!(matrix.board().len(), 2);
  }

  #[test]
  fn write_failure_degrades_to_memory() {
    let mut storage = MemoryStorage::new();
    storage.fail_writes = true;
    let mut matrix = Matrix::load(storage);

    matrix
      .add_task(&cell(1), "a")
      .expect("add still succeeds");
    assert!(matrix.is_degraded());
    let warning = matrix
      .take_warning()
      .expect("warning recorded");
    assert_eq!(warning.key, TASKS_KEY);
    assert!(matrix.take_warning().is_none());

    matrix.storage_mut().fail_writes = false;
    matrix
      .add_task(&cell(1), "b")
      .expect("add");
    assert_eq!(matrix.board().len(), 2);
    assert!(
      matrix.storage().get(TASKS_KEY).is_none()
    );
  }

  #[test]
  fn failed_operation_does_not_persist() {
    let mut matrix =
      Matrix::load(MemoryStorage::new());
    assert!(
      matrix
        .add_task(&CellId::new("cell-8"), "x")
        .is_err()
    );
    assert!(
      matrix.storage().get(TASKS_KEY).is_none()
    );
  }
}
