use yew::{
  Callback,
  Html,
  Properties,
  function_component,
  html
};

#[derive(Properties, PartialEq)]
pub struct UndoToastProps {
  pub text:       String,
  pub cell_title: String,
  pub on_undo:    Callback<()>,
  pub on_dismiss: Callback<()>
}

#[function_component(UndoToast)]
pub fn undo_toast(
  props: &UndoToastProps
) -> Html {
  let on_undo = props.on_undo.clone();
  let on_dismiss = props.on_dismiss.clone();

  html! {
      <div class="undo-toast" role="status">
          <span>{ format!("Deleted \"{}\" from {}", props.text, props.cell_title) }</span>
          <button onclick={move |_| on_undo.emit(())}>{ "Undo" }</button>
          <button class="undo-dismiss" onclick={move |_| on_dismiss.emit(())}>{ "×" }</button>
      </div>
  }
}
