//! Transient notifications for save/delete outcomes.
//!
//! A single `#toast-stack` container sits in the bottom-right corner;
//! `show` appends a message div that removes itself after
//! `TOAST_DURATION_MS`.  The stack renders column-reverse so the newest
//! toast is always nearest the corner.

use wasm_bindgen::{closure::Closure, JsCast};
use web_sys::{Document, Element};

use crate::constants::TOAST_DURATION_MS;

const STACK_ID: &str = "toast-stack";
const STYLE_ID: &str = "toast-styles";

#[derive(Debug, Clone, Copy)]
pub enum ToastKind {
    Success,
    Error,
    Info,
}

impl ToastKind {
    fn class(self) -> &'static str {
        match self {
            ToastKind::Success => "toast-success",
            ToastKind::Error => "toast-error",
            ToastKind::Info => "toast-info",
        }
    }
}

pub fn success(msg: &str) {
    show(msg, ToastKind::Success);
}

pub fn error(msg: &str) {
    show(msg, ToastKind::Error);
}

pub fn show(message: &str, kind: ToastKind) {
    let Some(window) = web_sys::window() else {
        return;
    };
    let Some(document) = window.document() else {
        return;
    };
    ensure_styles(&document);
    let Some(stack) = ensure_stack(&document) else {
        return;
    };
    let Ok(toast) = document.create_element("div") else {
        return;
    };
    toast.set_class_name(&format!("toast {}", kind.class()));
    toast.set_text_content(Some(message));
    let _ = stack.append_child(&toast);

    let cb = Closure::once_into_js(move || toast.remove());
    let _ = window
        .set_timeout_with_callback_and_timeout_and_arguments_0(
            cb.as_ref().unchecked_ref(),
            TOAST_DURATION_MS,
        );
}

fn ensure_stack(document: &Document) -> Option<Element> {
    if let Some(el) = document.get_element_by_id(STACK_ID) {
        return Some(el);
    }
    let stack = document.create_element("div").ok()?;
    stack.set_id(STACK_ID);
    document.body()?.append_child(&stack).ok()?;
    Some(stack)
}

fn ensure_styles(document: &Document) {
    if document.get_element_by_id(STYLE_ID).is_some() {
        return;
    }
    let css = "
#toast-stack{position:fixed;bottom:20px;right:20px;display:flex;flex-direction:column-reverse;gap:6px;z-index:1100;font:14px/1.4 system-ui,sans-serif}
#toast-stack .toast{max-width:340px;padding:8px 14px;border-radius:6px;color:#fff;box-shadow:0 3px 8px rgba(0,0,0,.25);animation:toast-rise .15s ease-out}
#toast-stack .toast-success{background:#2f9e44}
#toast-stack .toast-error{background:#e03131}
#toast-stack .toast-info{background:#1971c2}
.spinner{display:inline-block;width:12px;height:12px;border:2px solid currentColor;border-top-color:transparent;border-radius:50%;animation:spin .8s linear infinite;vertical-align:-1px}
@keyframes spin{to{transform:rotate(360deg)}}
@keyframes toast-rise{from{transform:translateY(6px);opacity:0}to{transform:translateY(0);opacity:1}}
";
    let Ok(style) = document.create_element("style") else {
        return;
    };
    style.set_id(STYLE_ID);
    style.set_text_content(Some(css));
    match document.query_selector("head").ok().flatten() {
        Some(head) => {
            let _ = head.append_child(&style);
        }
        None => {
            if let Some(body) = document.body() {
                let _ = body.append_child(&style);
            }
        }
    }
}
