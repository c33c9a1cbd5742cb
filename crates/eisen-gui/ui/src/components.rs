mod cell_title;
mod matrix_cell;
mod task_card;
mod task_input;
mod undo_toast;

pub use cell_title::CellTitle;
use eisen_matrix::DragLocation;
pub use matrix_cell::MatrixCell;
pub use task_card::TaskCard;
pub use task_input::TaskInput;
pub use undo_toast::UndoToast;
use web_sys::DragEvent;

/// Source location carried by a drop event,
/// if the browser hands it over.
fn read_drop(
  event: &DragEvent
) -> Option<DragLocation> {
  let raw = event
    .data_transfer()?
    .get_data("text/plain")
    .map_err(|error| {
      tracing::warn!(
        ?error,
        "failed reading drag data"
      )
    })
    .ok()?;
  let location =
    DragLocation::from_payload(&raw);
  if location.is_none() {
    tracing::warn!(
      raw,
      "unrecognized drag payload"
    );
  }
  location
}
