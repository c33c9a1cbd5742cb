use eisen_matrix::{
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
  html
};

use super::read_drop;

#[derive(Properties, PartialEq)]
pub struct TaskCardProps {
  pub task:          Task,
  pub location:      DragLocation,
  pub is_dragging:   bool,
  pub on_toggle:     Callback<TaskId>,
  pub on_delete:     Callback<TaskId>,
  pub on_drag_start:
    Callback<DragLocation>,
  pub on_drag_end:   Callback<()>,
  pub on_drop:
    Callback<(Option<DragLocation>, DragLocation)>
}

#[function_component(TaskCard)]
pub fn task_card(
  props: &TaskCardProps
) -> Html {
  let task_id = props.task.id;

  let ondragstart = {
    let on_drag_start =
      props.on_drag_start.clone();
    let location = props.location.clone();
    Callback::from(
      move |event: DragEvent| {
        if let Some(data_transfer) =
          event.data_transfer()
        {
          if let Err(error) = data_transfer
            .set_data(
              "text/plain",
              &location.payload()
            )
          {
            tracing::warn!(
              ?error,
              "failed writing drag data"
            );
          }
          data_transfer
            .set_drop_effect("move");
        }
        on_drag_start.emit(location.clone());
      }
    )
  };

  let ondragend = {
    let on_drag_end =
      props.on_drag_end.clone();
    Callback::from(move |_| {
      on_drag_end.emit(());
    })
  };

  let ondragover =
    Callback::from(|event: DragEvent| {
      event.prevent_default();
    });

  // Dropping on a card inserts at its slot.
  let ondrop = {
    let on_drop = props.on_drop.clone();
    let location = props.location.clone();
    Callback::from(
      move |event: DragEvent| {
        event.prevent_default();
        event.stop_propagation();
        on_drop.emit((
          read_drop(&event),
          location.clone()
        ));
      }
    )
  };

  let onchange = {
    let on_toggle = props.on_toggle.clone();
    Callback::from(move |_| {
      on_toggle.emit(task_id)
    })
  };

  let onclick_delete = {
    let on_delete = props.on_delete.clone();
    Callback::from(move |_| {
      on_delete.emit(task_id)
    })
  };

  html! {
      <div
          class={classes!(
              "task-card",
              props.task.done.then_some("done"),
              props.is_dragging.then_some("dragging")
          )}
          draggable="true"
          {ondragstart}
          {ondragend}
          {ondragover}
          {ondrop}
      >
          <input type="checkbox" checked={props.task.done} {onchange} />
          <span class="task-text">{ &props.task.text }</span>
          <button class="task-delete" title="Delete" onclick={onclick_delete}>{ "×" }</button>
      </div>
  }
}
