//! Thin helper layer for repetitive DOM operations so the components don't
//! sprinkle `set_attribute("style", …)` calls everywhere.

use wasm_bindgen::JsCast;
use web_sys::{Element, HtmlInputElement, HtmlSelectElement};

/// Remove the `hidden` class so the element becomes visible.
pub fn show(el: &Element) {
    let _ = el.class_list().remove_1("hidden");
    let _ = el.class_list().add_1("visible");
}

/// Hide the element by toggling CSS classes.
pub fn hide(el: &Element) {
    let _ = el.class_list().remove_1("visible");
    let _ = el.class_list().add_1("hidden");
}

/// Fetch an `<input>` by id and cast it.  `None` when missing or of a
/// different type; inputs inside modals come and go with the modal.
pub fn input_by_id(id: &str) -> Option<HtmlInputElement> {
    web_sys::window()
        .and_then(|w| w.document())
        .and_then(|d| d.get_element_by_id(id))
        .and_then(|e| e.dyn_into::<HtmlInputElement>().ok())
}

/// Trimmed value of an `<input>` by id; empty string when the input is gone.
pub fn input_value(id: &str) -> String {
    input_by_id(id)
        .map(|i| i.value().trim().to_string())
        .unwrap_or_default()
}

/// Fetch a `<select>` by id and cast it.
pub fn select_by_id(id: &str) -> Option<HtmlSelectElement> {
    web_sys::window()
        .and_then(|w| w.document())
        .and_then(|d| d.get_element_by_id(id))
        .and_then(|e| e.dyn_into::<HtmlSelectElement>().ok())
}
