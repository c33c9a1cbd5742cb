//! Ordered task sequences keyed by cell.
//!
//! Sequences are `im::Vector`s, so cloning
//! a board for a UI snapshot shares
//! structure instead of copying tasks.
//! Every index handed in from a drag
//! gesture is checked here: source indices
//! must exist, destination indices are
//! clamped.

use std::collections::BTreeMap;

use im::Vector;
use serde::{
  Deserialize,
  Serialize
};
use tracing::{
  debug,
  info
};

use crate::cell::CellId;
use crate::error::{
  MatrixError,
  Result
};
use crate::task::{
  Task,
  TaskId
};

/// A task removed from the board together
/// with where it lived.
#[derive(
  Debug,
  Clone,
  PartialEq,
  Eq,
  Serialize,
  Deserialize,
)]
pub struct DeletedTask {
  pub task:  Task,
  pub cell:  CellId,
  pub index: usize
}

#[derive(
  Debug,
  Clone,
  Default,
  PartialEq,
  Eq,
  Serialize,
  Deserialize,
)]
#[serde(transparent)]
pub struct TaskBoard {
  columns: BTreeMap<CellId, Vector<Task>>
}

impl TaskBoard {
  /// Four empty cells.
  pub fn seeded() -> Self {
    let mut board = Self::default();
    board.ensure_cells(
      CellId::seeded().iter()
    );
    board
  }

  pub fn ensure_cells<'a, I>(
    &mut self,
    ids: I
  ) where
    I: IntoIterator<Item = &'a CellId>
  {
    for id in ids {
      self
        .columns
        .entry(id.clone())
        .or_default();
    }
  }

  pub fn tasks(
    &self,
    cell: &CellId
  ) -> Option<&Vector<Task>> {
    self.columns.get(cell)
  }

  pub fn cells(
    &self
  ) -> impl Iterator<Item = &CellId> {
    self.columns.keys()
  }

  pub fn find(
    &self,
    cell: &CellId,
    id: TaskId
  ) -> Option<(usize, &Task)> {
    self
      .columns
      .get(cell)?
      .iter()
      .enumerate()
      .find(|(_, task)| task.id == id)
  }

  pub fn len(&self) -> usize {
    self
      .columns
      .values()
      .map(Vector::len)
      .sum()
  }

  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }

  #[tracing::instrument(skip(self, text))]
  pub fn add_task(
    &mut self,
    cell: &CellId,
    text: &str
  ) -> Result<TaskId> {
    if text.trim().is_empty() {
      return Err(MatrixError::BlankText);
    }
    let column = self.column_mut(cell)?;
    let task = Task::new(text);
    let id = task.id;
    column.push_back(task);
    info!(
      cell = %cell,
      task = %id,
      len = column.len(),
      "added task"
    );
    Ok(id)
  }

  #[tracing::instrument(skip(self))]
  pub fn reorder(
    &mut self,
    cell: &CellId,
    from: usize,
    to: usize
  ) -> Result<()> {
    let column = self.column_mut(cell)?;
    check_index(cell, column, from)?;
    let task = column.remove(from);
    let to = to.min(column.len());
    column.insert(to, task);
    debug!(
      cell = %cell,
      from,
      to,
      "reordered task"
    );
    Ok(())
  }

  #[tracing::instrument(skip(self))]
  pub fn move_task(
    &mut self,
    source: &CellId,
    source_index: usize,
    destination: &CellId,
    destination_index: usize
  ) -> Result<()> {
    if source == destination {
      return self.reorder(
        source,
        source_index,
        destination_index
      );
    }
    if !self
      .columns
      .contains_key(destination)
    {
      return Err(
        MatrixError::UnknownCell(
          destination.clone()
        )
      );
    }

    let from = self.column_mut(source)?;
    check_index(
      source,
      from,
      source_index
    )?;
    let task = from.remove(source_index);

    let Some(to) =
      self.columns.get_mut(destination)
    else {
      self
        .column_mut(source)?
        .insert(source_index, task);
      return Err(
        MatrixError::UnknownCell(
          destination.clone()
        )
      );
    };
    let index =
      destination_index.min(to.len());
    to.insert(index, task);
    debug!(
      from = %source,
      to = %destination,
      source_index,
      index,
      "moved task"
    );
    Ok(())
  }

  /// Stable partition of every cell: open
  /// tasks first, then done ones.
  pub fn resort_by_completion(&mut self) {
    for column in self.columns.values_mut() {
      partition_by_completion(column);
    }
  }

  #[tracing::instrument(skip(self))]
  pub fn toggle_done(
    &mut self,
    cell: &CellId,
    id: TaskId
  ) -> Result<bool> {
    let column = self.column_mut(cell)?;
    let task = column
      .iter_mut()
      .find(|task| task.id == id)
      .ok_or_else(|| {
        MatrixError::UnknownTask {
          cell: cell.clone(),
          task: id
        }
      })?;
    task.done = !task.done;
    let done = task.done;
    self.resort_by_completion();
    info!(
      cell = %cell,
      task = %id,
      done,
      "toggled task"
    );
    Ok(done)
  }

  #[tracing::instrument(skip(self))]
  pub fn delete_task(
    &mut self,
    cell: &CellId,
    id: TaskId
  ) -> Result<DeletedTask> {
    let column = self.column_mut(cell)?;
    let index = column
      .iter()
      .position(|task| task.id == id)
      .ok_or_else(|| {
        MatrixError::UnknownTask {
          cell: cell.clone(),
          task: id
        }
      })?;
    let task = column.remove(index);
    info!(
      cell = %cell,
      task = %id,
      index,
      "deleted task"
    );
    Ok(DeletedTask {
      task,
      cell: cell.clone(),
      index
    })
  }

  /// Puts a deleted task back at `at`, or
  /// at its old index when `at` is `None`.
  /// Returns the index actually used.
  #[tracing::instrument(
    skip(self, deleted),
    fields(cell = %deleted.cell, task = %deleted.task.id)
  )]
  pub fn restore_task(
    &mut self,
    deleted: DeletedTask,
    at: Option<usize>
  ) -> Result<usize> {
    let column =
      self.column_mut(&deleted.cell)?;
    let index = at
      .unwrap_or(deleted.index)
      .min(column.len());
    column.insert(index, deleted.task);
    info!(index, "restored task");
    Ok(index)
  }

  fn column_mut(
    &mut self,
    cell: &CellId
  ) -> Result<&mut Vector<Task>> {
    self.columns.get_mut(cell).ok_or_else(
      || {
        MatrixError::UnknownCell(
          cell.clone()
        )
      }
    )
  }
}

fn check_index(
  cell: &CellId,
  column: &Vector<Task>,
  index: usize
) -> Result<()> {
  if index < column.len() {
    Ok(())
  } else {
    Err(MatrixError::IndexOutOfRange {
      cell: cell.clone(),
      index,
      len: column.len()
    })
  }
}

fn partition_by_completion(
  column: &mut Vector<Task>
) {
  if column
    .iter()
    .skip_while(|task| !task.done)
    .all(|task| task.done)
  {
    return;
  }
  let (mut open, done): (
    Vector<Task>,
    Vector<Task>
  ) = column
    .iter()
    .cloned()
    .partition(|task| !task.done);
  open.append(done);
  *column = open;
}
