mod download;
mod scheduler;
mod storage;

use std::cell::RefCell;
use std::fmt::Display;
use std::rc::Rc;

use chrono::{
  Local,
  Utc
};
use eisen_matrix::{
  CellId,
  DEFAULT_UNDO_WINDOW,
  DragEnd,
  DragLocation,
  InputController,
  InputEffect,
  KeyChord,
  Matrix,
  SubmitOutcome,
  Task,
  TaskId,
  TimerToken,
  UndoController,
  on_drag_end
};
use gloo::events::EventListener;
use wasm_bindgen::JsCast;
use web_sys::{
  HtmlInputElement,
  KeyboardEvent
};
use yew::functional::UseForceUpdateHandle;
use yew::{
  Callback,
  Html,
  function_component,
  html,
  use_effect,
  use_effect_with,
  use_force_update,
  use_mut_ref,
  use_node_ref,
  use_state
};

use self::scheduler::BrowserScheduler;
use self::storage::LocalStorage;
use crate::components::{
  MatrixCell,
  TaskInput,
  UndoToast
};

/// Everything the page mutates. Lives in a
/// `RefCell` so document-level listeners
/// and timers can reach it.
struct Board {
  matrix:        Matrix<LocalStorage>,
  input:         InputController,
  undo:          UndoController<BrowserScheduler>,
  dragging:      Option<DragLocation>,
  focus_pending: bool,
  notice:        Option<String>
}

impl Board {
  fn load(
    on_expire: Callback<TimerToken>
  ) -> Self {
    Self {
      matrix:        Matrix::load(
        LocalStorage::open()
      ),
      input:         InputController::default(),
      undo:          UndoController::new(
        BrowserScheduler::new(on_expire),
        DEFAULT_UNDO_WINDOW
      ),
      dragging:      None,
      focus_pending: false,
      notice:        None
    }
  }

  fn apply(&mut self, effect: InputEffect) {
    if effect == InputEffect::FocusField {
      self.focus_pending = true;
    }
  }

  fn handle_key(
    &mut self,
    chord: &KeyChord
  ) -> bool {
    match self.input.handle_key(chord) {
      | Some(effect) => {
        self.apply(effect);
        true
      }
      | None => false
    }
  }

  fn submit(&mut self) {
    match self.input.submit(&mut self.matrix)
    {
      | Ok(SubmitOutcome::Added(id)) => {
        tracing::debug!(task = %id, "task added");
      }
      | Ok(SubmitOutcome::Rejected) => {
        self.focus_pending = true;
      }
      | Err(error) => {
        self.report("add task", error)
      }
    }
    self.collect_warning();
  }

  fn toggle(
    &mut self,
    (cell, id): (CellId, TaskId)
  ) {
    if let Err(error) =
      self.matrix.toggle_done(&cell, id)
    {
      self.report("toggle task", error);
    }
    self.collect_warning();
  }

  fn delete(
    &mut self,
    (cell, id): (CellId, TaskId)
  ) {
    match self.matrix.delete_task(&cell, id) {
      | Ok(deleted) => {
        self.undo.on_delete(deleted, Utc::now());
      }
      | Err(error) => {
        self.report("delete task", error)
      }
    }
    self.collect_warning();
  }

  fn restore(&mut self) {
    let Self { matrix, undo, .. } = &mut *self;
    if let Err(error) = undo.restore(matrix) {
      self.report("undo", error);
    }
    self.collect_warning();
  }

  fn expire(&mut self, token: TimerToken) {
    self.undo.expire(token);
    self.undo.scheduler_mut().forget(token);
  }

  fn rename(
    &mut self,
    (cell, title): (CellId, String)
  ) {
    if let Err(error) =
      self.matrix.rename_cell(&cell, &title)
    {
      self.report("rename cell", error);
    }
    self.collect_warning();
  }

  fn drop_at(
    &mut self,
    (source, destination): (
      Option<DragLocation>,
      DragLocation
    )
  ) {
    let Some(source) =
      source.or_else(|| self.dragging.take())
    else {
      return;
    };
    self.dragging = None;
    let event = DragEnd {
      source,
      destination: Some(destination)
    };
    match on_drag_end(&mut self.matrix, event)
    {
      | Ok(outcome) => {
        tracing::debug!(?outcome, "drag finished")
      }
      | Err(error) => self.report("move task", error)
    }
    self.collect_warning();
  }

  /// `dragend` without a preceding drop.
  fn drag_released(&mut self) {
    let Some(source) = self.dragging.take()
    else {
      return;
    };
    let event = DragEnd {
      source,
      destination: None
    };
    if let Err(error) =
      on_drag_end(&mut self.matrix, event)
    {
      self.report("move task", error);
    }
  }

  fn export(&mut self) {
    let file = match self
      .matrix
      .export(Local::now().date_naive())
    {
      | Ok(file) => file,
      | Err(error) => {
        self.report("export", error);
        return;
      }
    };
    if let Err(error) = download::save_file(&file)
    {
      self.report("export", format!("{error:?}"));
    }
  }

  fn report(
    &mut self,
    action: &str,
    error: impl Display
  ) {
    tracing::warn!(action, %error, "action failed");
    self.notice =
      Some(format!("Could not {action}: {error}"));
  }

  fn collect_warning(&mut self) {
    if let Some(warning) =
      self.matrix.take_warning()
    {
      self.notice = Some(format!(
        "Changes are no longer being saved \
         ({}: {})",
        warning.key, warning.message
      ));
    }
  }
}

fn board_callback<T: 'static>(
  board: &Rc<RefCell<Board>>,
  trigger: &UseForceUpdateHandle,
  action: impl Fn(&mut Board, T) + 'static
) -> Callback<T> {
  let board = board.clone();
  let trigger = trigger.clone();
  Callback::from(move |value: T| {
    action(&mut board.borrow_mut(), value);
    trigger.force_update();
  })
}

#[function_component(App)]
pub fn app() -> Html {
  let trigger = use_force_update();
  let expired =
    use_state(|| None::<TimerToken>);
  let board = {
    let expired = expired.clone();
    use_mut_ref(move || {
      Board::load(Callback::from(
        move |token| expired.set(Some(token))
      ))
    })
  };
  let input_ref = use_node_ref();

  {
    let board = board.clone();
    let trigger = trigger.clone();
    use_effect_with(*expired, move |token| {
      if let Some(token) = *token {
        board.borrow_mut().expire(token);
        trigger.force_update();
      }
      || ()
    });
  }

  {
    let board = board.clone();
    let trigger = trigger.clone();
    use_effect_with((), move |_| {
      let listener = web_sys::window()
        .and_then(|window| window.document())
        .map(|document| {
          EventListener::new(
            &document,
            "keydown",
            move |event| {
              let Some(event) =
                event.dyn_ref::<KeyboardEvent>()
              else {
                return;
              };
              let chord = KeyChord::new(
                &event.key(),
                &event.code(),
                event.alt_key()
              );
              let handled = board
                .borrow_mut()
                .handle_key(&chord);
              if handled {
                if event.alt_key() {
                  event.prevent_default();
                }
                trigger.force_update();
              }
            }
          )
        });
      move || drop(listener)
    });
  }

  {
    let board = board.clone();
    let input_ref = input_ref.clone();
    use_effect(move || {
      let focus = std::mem::take(
        &mut board.borrow_mut().focus_pending
      );
      if focus
        && let Some(input) =
          input_ref.cast::<HtmlInputElement>()
      {
        if let Err(error) = input.focus() {
          tracing::warn!(
            ?error,
            "failed focusing task input"
          );
        }
      }
      || ()
    });
  }

  let on_add = board_callback(
    &board,
    &trigger,
    |board, cell: CellId| {
      let effect = board.input.activate(cell);
      board.apply(effect);
    }
  );
  let on_text = board_callback(
    &board,
    &trigger,
    |board, text: String| {
      board.input.set_text(&text)
    }
  );
  let on_submit = board_callback(
    &board,
    &trigger,
    |board, ()| board.submit()
  );
  let on_cancel = board_callback(
    &board,
    &trigger,
    |board, ()| {
      let effect = board.input.cancel();
      board.apply(effect);
    }
  );
  let on_toggle =
    board_callback(&board, &trigger, Board::toggle);
  let on_delete =
    board_callback(&board, &trigger, Board::delete);
  let on_rename =
    board_callback(&board, &trigger, Board::rename);
  let on_drop =
    board_callback(&board, &trigger, Board::drop_at);
  let on_drag_start = board_callback(
    &board,
    &trigger,
    |board, location: DragLocation| {
      board.dragging = Some(location)
    }
  );
  let on_drag_end = board_callback(
    &board,
    &trigger,
    |board, ()| board.drag_released()
  );
  let on_undo = board_callback(
    &board,
    &trigger,
    |board, ()| board.restore()
  );
  let on_dismiss_undo = board_callback(
    &board,
    &trigger,
    |board, ()| board.undo.dismiss()
  );
  let on_export = board_callback(
    &board,
    &trigger,
    |board, ()| board.export()
  );
  let on_dismiss_notice = board_callback(
    &board,
    &trigger,
    |board, ()| board.notice = None
  );

  let view = board.borrow();
  let title_of = |cell: &CellId| {
    view
      .matrix
      .cells()
      .get(cell)
      .map(|def| def.title.clone())
      .unwrap_or_else(|| cell.to_string())
  };

  let cells = view
    .matrix
    .cells()
    .iter()
    .enumerate()
    .map(|(idx, cell)| {
      let tasks: Vec<Task> = view
        .matrix
        .board()
        .tasks(&cell.id)
        .map(|tasks| tasks.iter().cloned().collect())
        .unwrap_or_default();
      html! {
          <MatrixCell
              key={cell.id.to_string()}
              cell={cell.clone()}
              shortcut={idx + 1}
              {tasks}
              dragging={view.dragging.clone()}
              on_add={on_add.clone()}
              on_rename={on_rename.clone()}
              on_toggle={on_toggle.clone()}
              on_delete={on_delete.clone()}
              on_drag_start={on_drag_start.clone()}
              on_drag_end={on_drag_end.clone()}
              on_drop={on_drop.clone()}
          />
      }
    })
    .collect::<Html>();

  let input = match view.input.target() {
    | Some(cell) => html! {
        <TaskInput
            cell_title={title_of(cell)}
            text={view.input.text().to_string()}
            input_ref={input_ref.clone()}
            {on_text}
            {on_submit}
            {on_cancel}
        />
    },
    | None => html! {}
  };

  let toast = match view.undo.pending() {
    | Some(pending) => html! {
        <UndoToast
            text={pending.deleted.task.text.clone()}
            cell_title={title_of(&pending.deleted.cell)}
            {on_undo}
            on_dismiss={on_dismiss_undo}
        />
    },
    | None => html! {}
  };

  let notice = match &view.notice {
    | Some(message) => html! {
        <div class="notice" role="alert">
            <span>{ message }</span>
            <button onclick={move |_| on_dismiss_notice.emit(())}>{ "×" }</button>
        </div>
    },
    | None => html! {}
  };

  html! {
      <>
          <header class="toolbar">
              <h1>{ "Eisen" }</h1>
              <button onclick={move |_| on_export.emit(())}>{ "Export" }</button>
          </header>
          { notice }
          <main id="matrix">{ cells }</main>
          { input }
          { toast }
      </>
  }
}
