//! Floating task input: which cell, if
//! any, new text is aimed at.

use tracing::{
  debug,
  warn
};

use crate::cell::CellId;
use crate::error::Result;
use crate::matrix::Matrix;
use crate::storage::StorageAdapter;
use crate::task::TaskId;

#[derive(
  Debug, Clone, PartialEq, Eq, Default,
)]
pub enum InputState {
  #[default]
  Inactive,
  Active(CellId)
}

/// Side effects the view must carry out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEffect {
  FocusField,
  Closed
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
  Added(TaskId),
  Rejected
}

/// A key press as reported by the browser:
/// `key` is the logical key (`Escape`),
/// `code` the physical one (`Digit2`).
#[derive(
  Debug, Clone, PartialEq, Eq, Default,
)]
pub struct KeyChord {
  pub key:  String,
  pub code: String,
  pub alt:  bool
}

impl KeyChord {
  pub fn new(
    key: &str,
    code: &str,
    alt: bool
  ) -> Self {
    Self {
      key: key.to_string(),
      code: code.to_string(),
      alt
    }
  }
}

#[derive(
  Debug, Clone, PartialEq, Eq, Default,
)]
pub struct InputController {
  state:  InputState,
  buffer: String
}

impl InputController {
  pub fn state(&self) -> &InputState {
    &self.state
  }

  pub fn target(&self) -> Option<&CellId> {
    match &self.state {
      | InputState::Active(cell) => Some(cell),
      | InputState::Inactive => None
    }
  }

  pub fn text(&self) -> &str {
    &self.buffer
  }

  pub fn activate(
    &mut self,
    cell: CellId
  ) -> InputEffect {
    debug!(cell = %cell, "input activated");
    self.state = InputState::Active(cell);
    InputEffect::FocusField
  }

  pub fn cancel(&mut self) -> InputEffect {
    debug!("input cancelled");
    self.buffer.clear();
    self.state = InputState::Inactive;
    InputEffect::Closed
  }

  /// Escape closes the input; Alt+1..4
  /// opens it on the matching cell.
  pub fn handle_key(
    &mut self,
    chord: &KeyChord
  ) -> Option<InputEffect> {
    if chord.key == "Escape" {
      return Some(self.cancel());
    }
    if !chord.alt {
      return None;
    }
    let cell = chord
      .code
      .strip_prefix("Digit")
      .and_then(|digit| digit.parse::<u8>().ok())
      .and_then(CellId::from_shortcut_digit)?;
    Some(self.activate(cell))
  }

  pub fn set_text(&mut self, text: &str) {
    if matches!(
      self.state,
      InputState::Active(_)
    ) {
      self.buffer = text.to_string();
    }
  }

  /// Adds the buffered text to the target
  /// cell. Blank text is rejected and the
  /// input stays open.
  #[tracing::instrument(skip(self, matrix))]
  pub fn submit<S: StorageAdapter>(
    &mut self,
    matrix: &mut Matrix<S>
  ) -> Result<SubmitOutcome> {
    let InputState::Active(cell) =
      &self.state
    else {
      return Ok(SubmitOutcome::Rejected);
    };
    if self.buffer.trim().is_empty() {
      warn!(cell = %cell, "rejected blank task");
      return Ok(SubmitOutcome::Rejected);
    }

    let id = matrix.add_task(cell, &self.buffer)?;
    self.buffer.clear();
    self.state = InputState::Inactive;
    Ok(SubmitOutcome::Added(id))
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
  fn alt_digit_activates_cell_and_requests_focus() {
    let mut input = InputController::default();
    let effect = input.handle_key(
      &KeyChord::new("3", "Digit3", true)
    );
    assert_eq!(
      effect,
      Some(InputEffect::FocusField)
    );
    assert_eq!(input.target(), Some(&cell(3)));
  }

  #[test]
  fn plain_digits_and_other_keys_are_ignored() {
    let mut input = InputController::default();
    assert_eq!(
      input.handle_key(&KeyChord::new(
        "1", "Digit1", false
      )),
      None
    );
    assert_eq!(
      input.handle_key(&KeyChord::new(
        "5", "Digit5", true
      )),
      None
    );
    assert_eq!(
      input.handle_key(&KeyChord::new(
        "a", "KeyA", true
      )),
      None
    );
    assert_eq!(
      input.state(),
      &InputState::Inactive
    );
  }

  #[test]
  fn escape_discards_typed_text() {
    let mut matrix =
      Matrix::load(MemoryStorage::new());
    let mut input = InputController::default();
    input.activate(cell(2));
    input.set_text("half typed");

    let effect = input.handle_key(
      &KeyChord::new("Escape", "Escape", false)
    );
    assert_eq!(effect, Some(InputEffect::Closed));
    assert_eq!(
      input.state(),
      &InputState::Inactive
    );
    assert_eq!(input.text(), "");

    assert_eq!(
      input.submit(&mut matrix).expect("submit"),
      SubmitOutcome::Rejected
    );
    assert!(matrix.board().is_empty());
  }

  #[test]
  fn submit_adds_task_and_closes() {
    let mut matrix =
      Matrix::load(MemoryStorage::new());
    let mut input = InputController::default();
    input.activate(cell(1));
    input.set_text("Draft report");

    let outcome =
      input.submit(&mut matrix).expect("submit");
    let SubmitOutcome::Added(id) = outcome else {
      panic!("expected a task to be added");
    };
    assert!(matrix.board().find(&cell(1), id).is_some());
    assert_eq!(
      input.state(),
      &InputState::Inactive
    );
    assert_eq!(input.text(), "");
  }

  #[test]
  fn blank_submit_is_rejected_and_stays_open() {
    let mut matrix =
      Matrix::load(MemoryStorage::new());
    let mut input = InputController::default();
    input.activate(cell(4));
    input.set_text("   ");

    assert_eq!(
      input.submit(&mut matrix).expect("submit"),
      SubmitOutcome::Rejected
    );
    assert_eq!(input.target(), Some(&cell(4)));
    assert!(matrix.board().is_empty());
  }

  #[test]
  fn text_is_ignored_while_inactive() {
    let mut input = InputController::default();
    input.set_text("ghost");
    assert_eq!(input.text(), "");
  }
}
