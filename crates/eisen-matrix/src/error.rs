use crate::cell::CellId;
use crate::task::TaskId;

#[derive(Debug, thiserror::Error)]
pub enum MatrixError {
  #[error("unknown cell: {0}")]
  UnknownCell(CellId),
  #[error("task {task} not found in {cell}")]
  UnknownTask {
    cell: CellId,
    task: TaskId
  },
  #[error(
    "index {index} out of range for \
     {cell} (len {len})"
  )]
  IndexOutOfRange {
    cell:  CellId,
    index: usize,
    len:   usize
  },
  #[error("text cannot be blank")]
  BlankText
}

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
  #[error("storage unavailable: {0}")]
  Unavailable(String),
  #[error("read {key}: {reason}")]
  Read {
    key:    String,
    reason: String
  },
  #[error("write {key}: {reason}")]
  Write {
    key:    String,
    reason: String
  },
  #[error("encode {key}: {source}")]
  Encode {
    key:    String,
    #[source]
    source: serde_json::Error
  }
}

pub type Result<T> =
  std::result::Result<T, MatrixError>;
