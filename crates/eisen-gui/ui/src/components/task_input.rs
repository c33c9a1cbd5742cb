use web_sys::{
  HtmlInputElement,
  SubmitEvent
};
use yew::{
  Callback,
  Html,
  NodeRef,
  Properties,
  TargetCast,
  function_component,
  html
};

#[derive(Properties, PartialEq)]
pub struct TaskInputProps {
  pub cell_title: String,
  pub text:       String,
  pub input_ref:  NodeRef,
  pub on_text:    Callback<String>,
  pub on_submit:  Callback<()>,
  pub on_cancel:  Callback<()>
}

#[function_component(TaskInput)]
pub fn task_input(
  props: &TaskInputProps
) -> Html {
  let oninput = {
    let on_text = props.on_text.clone();
    Callback::from(
      move |event: yew::InputEvent| {
        let input: HtmlInputElement =
          event.target_unchecked_into();
        on_text.emit(input.value());
      }
    )
  };

  let onsubmit = {
    let on_submit = props.on_submit.clone();
    Callback::from(
      move |event: SubmitEvent| {
        event.prevent_default();
        on_submit.emit(());
      }
    )
  };

  let onclick_cancel = {
    let on_cancel = props.on_cancel.clone();
    Callback::from(move |_| {
      on_cancel.emit(())
    })
  };

  html! {
      <form class="task-input" {onsubmit}>
          <label>{ format!("New task in {}", props.cell_title) }</label>
          <input
              ref={props.input_ref.clone()}
              type="text"
              placeholder="What needs doing?"
              value={props.text.clone()}
              {oninput}
          />
          <button type="submit">{ "Add" }</button>
          <button type="button" onclick={onclick_cancel}>{ "Cancel" }</button>
      </form>
  }
}
