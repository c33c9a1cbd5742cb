//! State model of the Eisenhower task
//! matrix, shared by the command line and
//! the browser front end.

pub mod board;
pub mod cell;
pub mod drag;
pub mod error;
pub mod export;
pub mod input;
pub mod matrix;
pub mod storage;
pub mod task;
pub mod undo;

pub use board::{
  DeletedTask,
  TaskBoard
};
pub use cell::{
  CellDef,
  CellId,
  CellRegistry
};
pub use drag::{
  DragEnd,
  DragLocation,
  DragOutcome,
  on_drag_end
};
pub use error::{
  MatrixError,
  StorageError
};
pub use export::{
  ExportFile,
  export_file_name
};
pub use input::{
  InputController,
  InputEffect,
  InputState,
  KeyChord,
  SubmitOutcome
};
pub use matrix::{
  Matrix,
  StorageWarning
};
pub use storage::{
  MemoryStorage,
  StorageAdapter
};
pub use task::{
  Task,
  TaskId
};
pub use undo::{
  DEFAULT_UNDO_WINDOW,
  ManualScheduler,
  PendingUndo,
  TimerToken,
  UndoController,
  UndoScheduler
};
