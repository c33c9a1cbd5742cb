use eisen_matrix::CellId;
use web_sys::{
  HtmlInputElement,
  KeyboardEvent
};
use yew::{
  Callback,
  Html,
  Properties,
  TargetCast,
  function_component,
  html,
  use_state
};

#[derive(Properties, PartialEq)]
pub struct CellTitleProps {
  pub cell:      CellId,
  pub title:     String,
  pub on_rename: Callback<(CellId, String)>
}

/// Heading that turns into a text field on
/// double click. Enter commits, Escape or
/// blur reverts.
#[function_component(CellTitle)]
pub fn cell_title(
  props: &CellTitleProps
) -> Html {
  let editing = use_state(|| false);
  let draft = use_state(String::new);

  if !*editing {
    let ondblclick = {
      let editing = editing.clone();
      let draft = draft.clone();
      let title = props.title.clone();
      Callback::from(move |_| {
        draft.set(title.clone());
        editing.set(true);
      })
    };
    return html! {
        <h2 class="cell-title" {ondblclick}>{ &props.title }</h2>
    };
  }

  let oninput = {
    let draft = draft.clone();
    Callback::from(
      move |event: yew::InputEvent| {
        let input: HtmlInputElement =
          event.target_unchecked_into();
        draft.set(input.value());
      }
    )
  };

  let onkeydown = {
    let editing = editing.clone();
    let draft = draft.clone();
    let cell = props.cell.clone();
    let on_rename = props.on_rename.clone();
    Callback::from(
      move |event: KeyboardEvent| {
        match event.key().as_str() {
          | "Enter" => {
            event.prevent_default();
            on_rename.emit((
              cell.clone(),
              (*draft).clone()
            ));
            editing.set(false);
          }
          | "Escape" => editing.set(false),
          | _ => {}
        }
      }
    )
  };

  let onblur = {
    let editing = editing.clone();
    Callback::from(move |_| {
      editing.set(false)
    })
  };

  html! {
      <input
          class="cell-title-edit"
          value={(*draft).clone()}
          {oninput}
          {onkeydown}
          {onblur}
      />
  }
}
