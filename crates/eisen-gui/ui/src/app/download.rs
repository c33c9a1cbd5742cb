use eisen_matrix::ExportFile;
use gloo::timers::callback::Timeout;
use wasm_bindgen::{
  JsCast,
  JsValue
};
use web_sys::{
  Blob,
  BlobPropertyBag,
  HtmlAnchorElement,
  Url
};

/// Hands `file` to the browser as a
/// download through a throwaway anchor.
pub fn save_file(
  file: &ExportFile
) -> Result<(), JsValue> {
  let document = web_sys::window()
    .and_then(|window| window.document())
    .ok_or_else(|| {
      JsValue::from_str("no document")
    })?;

  let parts = js_sys::Array::of1(
    &JsValue::from_str(&file.contents)
  );
  let options = BlobPropertyBag::new();
  options.set_type("text/json");
  let blob =
    Blob::new_with_str_sequence_and_options(
      &parts, &options
    )?;
  let url =
    Url::create_object_url_with_blob(&blob)?;

  let link: HtmlAnchorElement = document
    .create_element("a")?
    .dyn_into()
    .map_err(JsValue::from)?;
  link.set_download(&file.name);
  link.set_href(&url);
  link.click();
  link.remove();

  tracing::info!(
    file = %file.name,
    bytes = file.contents.len(),
    "exported board"
  );

  // Revoking in the same tick can cancel
  // the download in some browsers.
  let _ = Timeout::new(0, move || {
    if let Err(error) =
      Url::revoke_object_url(&url)
    {
      tracing::warn!(
        ?error,
        "failed revoking export url"
      );
    }
  })
  .forget();

  Ok(())
}
