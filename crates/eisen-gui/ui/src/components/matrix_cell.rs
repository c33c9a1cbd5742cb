use eisen_matrix::{
  CellDef,
  CellId,
  DragLocation,
  Task,
  TaskId
};
use web_sys::DragEvent;
use yew::{
  Callback,
  Html,
  Properties,
  classes,
  function_component,
  html,
  use_state
};

use super::{
  CellTitle,
  TaskCard,
  read_drop
};

#[derive(Properties, PartialEq)]
pub struct MatrixCellProps {
  pub cell:          CellDef,
  pub shortcut:      usize,
  pub tasks:         Vec<Task>,
  pub dragging:      Option<DragLocation>,
  pub on_add:        Callback<CellId>,
  pub on_rename:
    Callback<(CellId, String)>,
  pub on_toggle:
    Callback<(CellId, TaskId)>,
  pub on_delete:
    Callback<(CellId, TaskId)>,
  pub on_drag_start:
    Callback<DragLocation>,
  pub on_drag_end:   Callback<()>,
  pub on_drop:
    Callback<(Option<DragLocation>, DragLocation)>
}

#[function_component(MatrixCell)]
pub fn matrix_cell(
  props: &MatrixCellProps
) -> Html {
  let drop_hint = use_state(|| false);
  let cell_id = props.cell.id.clone();

  let ondragover = {
    let drop_hint = drop_hint.clone();
    Callback::from(
      move |event: DragEvent| {
        event.prevent_default();
        if !*drop_hint {
          drop_hint.set(true);
        }
      }
    )
  };

  let ondragleave = {
    let drop_hint = drop_hint.clone();
    Callback::from(move |_| {
      drop_hint.set(false)
    })
  };

  // Dropping on empty space appends.
  let ondrop = {
    let drop_hint = drop_hint.clone();
    let on_drop = props.on_drop.clone();
    let end = DragLocation::new(
      cell_id.clone(),
      props.tasks.len()
    );
    Callback::from(
      move |event: DragEvent| {
        event.prevent_default();
        event.stop_propagation();
        drop_hint.set(false);
        on_drop
          .emit((read_drop(&event), end.clone()));
      }
    )
  };

  let onclick_add = {
    let on_add = props.on_add.clone();
    let cell_id = cell_id.clone();
    Callback::from(move |_| {
      on_add.emit(cell_id.clone())
    })
  };

  let cards = props
    .tasks
    .iter()
    .enumerate()
    .map(|(index, task)| {
      let location = DragLocation::new(
        cell_id.clone(),
        index
      );
      let is_dragging =
        props.dragging.as_ref()
          == Some(&location);
      let on_toggle = {
        let on_toggle =
          props.on_toggle.clone();
        let cell_id = cell_id.clone();
        Callback::from(move |id| {
          on_toggle.emit((cell_id.clone(), id))
        })
      };
      let on_delete = {
        let on_delete =
          props.on_delete.clone();
        let cell_id = cell_id.clone();
        Callback::from(move |id| {
          on_delete.emit((cell_id.clone(), id))
        })
      };
      html! {
          <TaskCard
              key={task.id.to_string()}
              task={task.clone()}
              {location}
              {is_dragging}
              {on_toggle}
              {on_delete}
              on_drag_start={props.on_drag_start.clone()}
              on_drag_end={props.on_drag_end.clone()}
              on_drop={props.on_drop.clone()}
          />
      }
    });

  html! {
      <section
          class={classes!("matrix-cell", props.cell.id.to_string(), drop_hint.then_some("drop-hint"))}
          {ondragover}
          {ondragleave}
          {ondrop}
      >
          <header class="matrix-cell-header">
              <CellTitle
                  cell={cell_id.clone()}
                  title={props.cell.title.clone()}
                  on_rename={props.on_rename.clone()}
              />
              <button
                  class="cell-add"
                  title={format!("Add task (Alt+{})", props.shortcut)}
                  onclick={onclick_add}
              >
                  { "+" }
              </button>
          </header>
          <div class="matrix-cell-body">
              {
                  if props.tasks.is_empty() {
                      html! { <div class="matrix-empty">{ "No tasks" }</div> }
                  } else {
                      html! { <>{ for cards }</> }
                  }
              }
          </div>
      </section>
  }
}
