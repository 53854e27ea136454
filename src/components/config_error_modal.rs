//! Static dialog shown when required configuration keys are missing.
//! No internal state: the caller supplies the key names, the user either
//! dismisses or jumps to the settings page.

use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::Document;

use crate::components::modal;

const MODAL_ID: &str = "config-error-modal";

pub fn open(document: &Document, missing_keys: &[String]) -> Result<(), JsValue> {
    let (backdrop, content) = modal::ensure_modal(document, MODAL_ID)?;

    let items: String = missing_keys
        .iter()
        .map(|key| format!("<li><code>{key}</code></li>"))
        .collect();
    content.set_inner_html(&format!(
        "<h2>Configuration incomplete</h2>\
         <p>The following configuration keys are missing:</p>\
         <ul class=\"missing-keys\">{items}</ul>\
         <div class=\"modal-actions\">\
           <button id=\"config-error-dismiss\" class=\"btn\">Dismiss</button>\
           <button id=\"config-error-settings\" class=\"btn btn-primary\">Open Settings</button>\
         </div>"
    ));

    if let Some(btn) = document.get_element_by_id("config-error-dismiss") {
        let backdrop_clone = backdrop.clone();
        let on_dismiss = Closure::wrap(Box::new(move |_: web_sys::MouseEvent| {
            modal::hide(&backdrop_clone);
        }) as Box<dyn FnMut(_)>);
        btn.add_event_listener_with_callback("click", on_dismiss.as_ref().unchecked_ref())?;
        on_dismiss.forget();
    }

    if let Some(btn) = document.get_element_by_id("config-error-settings") {
        let on_settings = Closure::wrap(Box::new(move |_: web_sys::MouseEvent| {
            if let Some(window) = web_sys::window() {
                let _ = window.location().set_href("/settings");
            }
        }) as Box<dyn FnMut(_)>);
        btn.add_event_listener_with_callback("click", on_settings.as_ref().unchecked_ref())?;
        on_settings.forget();
    }

    modal::show(&backdrop);
    Ok(())
}
