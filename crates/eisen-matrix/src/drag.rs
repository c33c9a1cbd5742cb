use serde::{
  Deserialize,
  Serialize
};
use tracing::debug;

use crate::cell::CellId;
use crate::error::Result;
use crate::matrix::Matrix;
use crate::storage::StorageAdapter;

#[derive(
  Debug,
  Clone,
  PartialEq,
  Eq,
  Serialize,
  Deserialize,
)]
pub struct DragLocation {
  pub cell:  CellId,
  pub index: usize
}

impl DragLocation {
  pub fn new(
    cell: CellId,
    index: usize
  ) -> Self {
    Self { cell, index }
  }

  /// `cell-N:index`, the text carried in a
  /// browser drag's data transfer.
  pub fn payload(&self) -> String {
    format!("{}:{}", self.cell, self.index)
  }

  pub fn from_payload(
    raw: &str
  ) -> Option<Self> {
    let (cell, index) =
      raw.trim().rsplit_once(':')?;
    Some(Self::new(
      CellId::parse_loose(cell)?,
      index.parse().ok()?
    ))
  }
}

/// End of a drag gesture. `destination` is
/// `None` when the task was released
/// outside every cell.
#[derive(
  Debug,
  Clone,
  PartialEq,
  Eq,
  Serialize,
  Deserialize,
)]
pub struct DragEnd {
  pub source:      DragLocation,
  pub destination: Option<DragLocation>
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragOutcome {
  Cancelled,
  Reordered,
  Moved
}

#[tracing::instrument(skip(matrix))]
pub fn on_drag_end<S: StorageAdapter>(
  matrix: &mut Matrix<S>,
  event: DragEnd
) -> Result<DragOutcome> {
  let Some(destination) = event.destination
  else {
    debug!("dropped outside any cell");
    return Ok(DragOutcome::Cancelled);
  };
  let source = event.source;

  let outcome =
    if source.cell == destination.cell {
      matrix.reorder(
        &source.cell,
        source.index,
        destination.index
      )?;
      DragOutcome::Reordered
    } else {
      matrix.move_task(
        &source.cell,
        source.index,
        &destination.cell,
        destination.index
      )?;
      DragOutcome::Moved
    };

  matrix.resort_by_completion();
  Ok(outcome)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::storage::{
    MemoryStorage,
    TASKS_KEY
  };

  fn cell(n: u8) -> CellId {
    CellId::from_shortcut_digit(n)
      .expect("valid cell digit")
  }

  fn texts(
    matrix: &Matrix<MemoryStorage>,
    n: u8
  ) -> Vec<String> {
    matrix
      .board()
      .tasks(&cell(n))
      .map(|tasks| {
        tasks
          .iter()
          .map(|task| task.text.clone())
          .collect()
      })
      .unwrap_or_default()
  }

  fn seeded() -> Matrix<MemoryStorage> {
    let mut matrix =
      Matrix::load(MemoryStorage::new());
    for text in ["a", "b", "c"] {
      matrix
        .add_task(&cell(1), text)
        .expect("add");
    }
    matrix
      .add_task(&cell(2), "x")
      .expect("add");
    matrix
  }

  fn drag(
    from: (u8, usize),
    to: Option<(u8, usize)>
  ) -> DragEnd {
    DragEnd {
      source:      DragLocation::new(
        cell(from.0),
        from.1
      ),
      destination: to.map(|(n, index)| {
        DragLocation::new(cell(n), index)
      })
    }
  }

  #[test]
  fn payload_survives_data_transfer() {
    let loc = DragLocation::new(cell(3), 4);
    assert_eq!(loc.payload(), "cell-3:4");
    assert_eq!(
      DragLocation::from_payload("cell-3:4"),
      Some(loc)
    );
    assert_eq!(
      DragLocation::from_payload("cell-7:0"),
      None
    );
    assert_eq!(
      DragLocation::from_payload("garbage"),
      None
    );
  }

  #[test]
  fn release_outside_changes_nothing() {
    let mut matrix = seeded();
    let before = matrix.board().clone();
    let stored = matrix
      .storage()
      .get(TASKS_KEY)
      .map(str::to_string);

    let outcome =
      on_drag_end(&mut matrix, drag((1, 0), None))
        .expect("drag");
    assert_eq!(outcome, DragOutcome::Cancelled);
    assert_eq!(matrix.board(), &before);
    assert_eq!(
      matrix.storage().get(TASKS_KEY),
      stored.as_deref()
    );
  }

  #[test]
  fn same_cell_drop_reorders() {
    let mut matrix = seeded();
    let outcome = on_drag_end(
      &mut matrix,
      drag((1, 2), Some((1, 0)))
    )
    .expect("drag");
    assert_eq!(outcome, DragOutcome::Reordered);
    assert_eq!(
      texts(&matrix, 1),
      ["c", "a", "b"]
    );
  }

  #[test]
  fn cross_cell_drop_moves() {
    let mut matrix = seeded();
    let outcome = on_drag_end(
      &mut matrix,
      drag((1, 1), Some((2, 1)))
    )
    .expect("drag");
    assert_eq!(outcome, DragOutcome::Moved);
    assert_eq!(texts(&matrix, 1), ["a", "c"]);
    assert_eq!(texts(&matrix, 2), ["x", "b"]);
  }

  #[test]
  fn drop_above_done_task_is_resorted() {
    let mut matrix = seeded();
    let done = matrix
      .board()
      .tasks(&cell(2))
      .and_then(|tasks| tasks.get(0))
      .map(|task| task.id)
      .expect("task");
    matrix
      .toggle_done(&cell(2), done)
      .expect("toggle");

    on_drag_end(
      &mut matrix,
      drag((1, 0), Some((2, 0)))
    )
    .expect("drag");
    assert_eq!(texts(&matrix, 2), ["a", "x"]);

    on_drag_end(
      &mut matrix,
      drag((2, 0), Some((2, 5)))
    )
    .expect("drag");
    assert_eq!(texts(&matrix, 2), ["a", "x"]);
  }

  #[test]
  fn stale_source_index_is_rejected() {
    let mut matrix = seeded();
    let before = matrix.board().clone();
    assert!(
      on_drag_end(
        &mut matrix,
        drag((2, 3), Some((1, 0)))
      )
      .is_err()
    );
    assert_eq!(matrix.board(), &before);
  }
}
