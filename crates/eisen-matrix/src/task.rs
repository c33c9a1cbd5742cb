use std::fmt;

use serde::{
  Deserialize,
  Serialize
};
use uuid::Uuid;

#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  PartialOrd,
  Ord,
  Serialize,
  Deserialize,
)]
#[serde(transparent)]
pub struct TaskId(Uuid);

impl TaskId {
  pub fn fresh() -> Self {
    Self(Uuid::new_v4())
  }
}

impl fmt::Display for TaskId {
  fn fmt(
    &self,
    f: &mut fmt::Formatter<'_>
  ) -> fmt::Result {
    self.0.fmt(f)
  }
}

/// One entry of a cell. Only these
/// three fields are persisted.
#[derive(
  Debug,
  Clone,
  PartialEq,
  Eq,
  Serialize,
  Deserialize,
)]
pub struct Task {
  pub id:   TaskId,
  pub text: String,
  #[serde(default)]
  pub done: bool
}

impl Task {
  pub fn new(text: &str) -> Self {
    Self {
      id:   TaskId::fresh(),
      text: text.trim().to_string(),
      done: false
    }
  }
}
