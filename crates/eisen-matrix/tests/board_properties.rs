use std::collections::HashSet;

use eisen_matrix::{
  CellId,
  DragEnd,
  DragLocation,
  DragOutcome,
  Matrix,
  MemoryStorage,
  Task,
  TaskBoard,
  TaskId,
  on_drag_end
};
use proptest::collection::vec;
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Step {
  Add(u8),
  Toggle(u8, usize),
  Delete(u8, usize),
  Reorder(u8, usize, usize),
  Move(u8, usize, u8, usize),
  Drag(u8, usize, Option<(u8, usize)>),
  Resort
}

fn step() -> impl Strategy<Value = Step> {
  prop_oneof![
    4 => (1..=4u8).prop_map(Step::Add),
    2 => (1..=4u8, 0..6usize)
      .prop_map(|(c, i)| Step::Toggle(c, i)),
    2 => (1..=4u8, 0..6usize)
      .prop_map(|(c, i)| Step::Delete(c, i)),
    2 => (1..=4u8, 0..7usize, 0..9usize)
      .prop_map(|(c, from, to)| {
        Step::Reorder(c, from, to)
      }),
    2 => (1..=4u8, 0..7usize, 1..=4u8, 0..9usize)
      .prop_map(|(s, si, d, di)| {
        Step::Move(s, si, d, di)
      }),
    2 => (
      1..=4u8,
      0..7usize,
      proptest::option::of((1..=4u8, 0..9usize))
    )
      .prop_map(|(s, si, to)| Step::Drag(s, si, to)),
    1 => Just(Step::Resort),
  ]
}

fn cell(n: u8) -> CellId {
  CellId::from_shortcut_digit(n)
    .expect("valid cell digit")
}

fn id_at(
  board: &TaskBoard,
  n: u8,
  index: usize
) -> Option<TaskId> {
  board
    .tasks(&cell(n))
    .and_then(|tasks| tasks.get(index))
    .map(|task| task.id)
}

fn all_ids(board: &TaskBoard) -> Vec<TaskId> {
  board
    .cells()
    .flat_map(|id| {
      board
        .tasks(id)
        .into_iter()
        .flat_map(|tasks| tasks.iter())
        .map(|task| task.id)
    })
    .collect()
}

fn partitioned(board: &TaskBoard) -> bool {
  board.cells().all(|id| {
    board.tasks(id).is_none_or(|tasks| {
      tasks
        .iter()
        .skip_while(|task| !task.done)
        .all(|task| task.done)
    })
  })
}

fn drag(
  matrix: &mut Matrix<MemoryStorage>,
  (n, index): (u8, usize),
  to: Option<(u8, usize)>
) -> bool {
  let event = DragEnd {
    source:      DragLocation::new(cell(n), index),
    destination: to.map(|(n, index)| {
      DragLocation::new(cell(n), index)
    })
  };
  matches!(
    on_drag_end(matrix, event),
    Ok(DragOutcome::Reordered | DragOutcome::Moved)
  )
}

proptest! {
  #[test]
  fn count_and_identity_survive_any_sequence(
    steps in vec(step(), 0..80)
  ) {
    let mut board = TaskBoard::seeded();
    let mut adds = 0usize;
    let mut deletes = 0usize;

    for (n, step) in steps.into_iter().enumerate() {
      match step {
        | Step::Add(c) => {
          board
            .add_task(&cell(c), &format!("task {n}"))
            .expect("add");
          adds += 1;
        }
        | Step::Toggle(c, i) => {
          if let Some(id) = id_at(&board, c, i) {
            board
              .toggle_done(&cell(c), id)
              .expect("toggle");
          }
        }
        | Step::Delete(c, i) => {
          if let Some(id) = id_at(&board, c, i) {
            board
              .delete_task(&cell(c), id)
              .expect("delete");
            deletes += 1;
          }
        }
        | Step::Reorder(c, from, to) => {
          let before = board.clone();
          if board.reorder(&cell(c), from, to).is_err() {
            prop_assert_eq!(&board, &before);
          }
        }
        | Step::Move(s, si, d, di)
        | Step::Drag(s, si, Some((d, di))) => {
          let moved = id_at(&board, s, si);
          let dst_len = board
            .tasks(&cell(d))
            .map_or(0, |tasks| tasks.len());
          let before = board.clone();
          match board.move_task(&cell(s), si, &cell(d), di) {
            | Ok(()) => {
              prop_assert!(moved.is_some());
              // Same-cell moves insert after the
              // source has been removed.
              let limit = if s == d {
                dst_len - 1
              } else {
                dst_len
              };
              prop_assert_eq!(
                id_at(&board, d, di.min(limit)),
                moved
              );
            }
            | Err(_) => {
              prop_assert!(moved.is_none());
              prop_assert_eq!(&board, &before);
            }
          }
        }
        | Step::Drag(_, _, None) => {}
        | Step::Resort => board.resort_by_completion()
      }

      prop_assert_eq!(board.len(), adds - deletes);
      let ids = all_ids(&board);
      let unique: HashSet<_> = ids.iter().collect();
      prop_assert_eq!(unique.len(), ids.len());
    }
  }

  #[test]
  fn drags_and_toggles_leave_every_cell_partitioned(
    steps in vec(step(), 0..80)
  ) {
    let mut matrix = Matrix::load(MemoryStorage::new());

    for (n, step) in steps.into_iter().enumerate() {
      let settled = match step {
        | Step::Add(c) => {
          matrix
            .add_task(&cell(c), &format!("task {n}"))
            .expect("add");
          false
        }
        | Step::Toggle(c, i) => {
          match id_at(matrix.board(), c, i) {
            | Some(id) => {
              matrix
                .toggle_done(&cell(c), id)
                .expect("toggle");
              true
            }
            | None => false
          }
        }
        | Step::Delete(c, i) => {
          if let Some(id) = id_at(matrix.board(), c, i) {
            matrix
              .delete_task(&cell(c), id)
              .expect("delete");
          }
          false
        }
        | Step::Reorder(c, from, to) => {
          drag(&mut matrix, (c, from), Some((c, to)))
        }
        | Step::Move(s, si, d, di) => {
          drag(&mut matrix, (s, si), Some((d, di)))
        }
        | Step::Drag(s, si, to) => {
          drag(&mut matrix, (s, si), to)
        }
        | Step::Resort => {
          matrix.resort_by_completion();
          true
        }
      };

      if settled {
        prop_assert!(partitioned(matrix.board()));
      }
    }
  }

  #[test]
  fn resort_is_a_stable_idempotent_partition(
    flags in vec(vec(any::<bool>(), 0..10), 4)
  ) {
    let mut columns = serde_json::Map::new();
    for (n, cell_flags) in flags.iter().enumerate() {
      let tasks: Vec<Task> = cell_flags
        .iter()
        .enumerate()
        .map(|(i, &done)| Task {
          done,
          ..Task::new(&format!("task {i}"))
        })
        .collect();
      columns.insert(
        format!("cell-{}", n + 1),
        serde_json::to_value(&tasks)
          .expect("encode tasks")
      );
    }
    let mut board: TaskBoard = serde_json::from_value(
      serde_json::Value::Object(columns)
    )
    .expect("decode board");
    let before = board.clone();

    board.resort_by_completion();
    for id in before.cells() {
      let original = before.tasks(id).expect("cell");
      let expected: Vec<TaskId> = original
        .iter()
        .filter(|task| !task.done)
        .chain(original.iter().filter(|task| task.done))
        .map(|task| task.id)
        .collect();
      let actual: Vec<TaskId> = board
        .tasks(id)
        .expect("cell")
        .iter()
        .map(|task| task.id)
        .collect();
      prop_assert_eq!(actual, expected);
    }

    let once = board.clone();
    board.resort_by_completion();
    prop_assert_eq!(board, once);
  }
}
