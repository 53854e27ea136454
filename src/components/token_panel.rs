//! Credential panel: per-agent display/entry/deletion of the three token
//! slots.  Configured slots show only their masked form plus the last-update
//! time; unset slots offer a password-style input.  One Save issues a write
//! per non-empty input and reports a single aggregate result.

use chrono::DateTime;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::Document;

use crate::components::modal;
use crate::dom_utils;
use crate::models::TokenType;
use crate::state::{dispatch_global_message, APP_STATE};

const MODAL_ID: &str = "integration-settings-modal";

fn input_id(token_type: TokenType) -> String {
    format!("token-input-{}", token_type.wire_name())
}

fn delete_id(token_type: TokenType) -> String {
    format!("token-delete-{}", token_type.wire_name())
}

/// Open the panel for an agent.  Fetches all three masked statuses.
pub fn open(document: &Document, agent_id: u32) -> Result<(), JsValue> {
    let (backdrop, _) = modal::ensure_modal(document, MODAL_ID)?;
    modal::show(&backdrop);
    dispatch_global_message(crate::messages::Message::TokenPanelOpened { agent_id });
    render(document)
}

/// Re-render from current state.  Installed as an `UpdateUI` command by the
/// token reducer.
pub fn refresh() {
    let Some(document) = web_sys::window().and_then(|w| w.document()) else {
        return;
    };
    if let Err(e) = render(&document) {
        crate::warn_log!("token panel render failed: {e:?}");
    }
}

fn render(document: &Document) -> Result<(), JsValue> {
    let (backdrop, content) = modal::ensure_modal(document, MODAL_ID)?;

    let (agent_id, sections, saving, any_pending_input) = APP_STATE.with(|state| {
        let state = state.borrow();
        let Some(panel) = &state.token_panel else {
            return (None, String::new(), false, false);
        };
        let mut sections = String::new();
        let mut any_input = false;
        for token_type in TokenType::ALL {
            let slot = panel.slot(token_type);
            sections.push_str(&format!(
                "<div class=\"token-slot\"><h3>{}</h3>",
                token_type.label()
            ));
            if slot.configured {
                let masked = slot.masked.as_deref().unwrap_or("••••••••");
                sections.push_str(&format!("<p class=\"token-masked\">{masked}</p>"));
                if let Some(ts) = &slot.updated_at {
                    sections.push_str(&format!(
                        "<p class=\"token-updated\">Updated {}</p>",
                        format_timestamp(ts)
                    ));
                }
                let spinner = if slot.deleting {
                    " <span class=\"spinner\"></span>"
                } else {
                    ""
                };
                let disabled = if slot.deleting { " disabled" } else { "" };
                sections.push_str(&format!(
                    "<button id=\"{}\" class=\"btn btn-danger\"{disabled}>Delete{spinner}</button>",
                    delete_id(token_type)
                ));
            } else {
                any_input = true;
                sections.push_str(&format!(
                    "<p class=\"token-missing\">Not Configured</p>\
                     <input id=\"{}\" type=\"password\" placeholder=\"Paste {}\" autocomplete=\"off\">",
                    input_id(token_type),
                    token_type.label().to_lowercase()
                ));
            }
            sections.push_str("</div>");
        }
        (Some(panel.agent_id), sections, panel.saving, any_input)
    });

    let Some(agent_id) = agent_id else {
        modal::hide(&backdrop);
        return Ok(());
    };

    let save_button = if any_pending_input {
        let spinner = if saving {
            " <span class=\"spinner\"></span>"
        } else {
            ""
        };
        let disabled = if saving { " disabled" } else { "" };
        format!(
            "<button id=\"token-save\" class=\"btn btn-primary\"{disabled}>Save{spinner}</button>"
        )
    } else {
        String::new()
    };
    content.set_inner_html(&format!(
        "<h2>Integration Settings</h2>{sections}\
         <div class=\"modal-actions\">{save_button}\
           <button id=\"token-panel-close\" class=\"btn\">Close</button>\
         </div>"
    ));

    wire_actions(document, agent_id)?;
    Ok(())
}

fn wire_actions(document: &Document, agent_id: u32) -> Result<(), JsValue> {
    if let Some(btn) = document.get_element_by_id("token-save") {
        let on_save = Closure::wrap(Box::new(move |_: web_sys::MouseEvent| {
            let pending: Vec<(TokenType, String)> = TokenType::ALL
                .into_iter()
                .filter_map(|token_type| {
                    let value = dom_utils::input_value(&input_id(token_type));
                    (!value.is_empty()).then_some((token_type, value))
                })
                .collect();
            dispatch_global_message(crate::messages::Message::SaveTokensClicked {
                agent_id,
                pending,
            });
        }) as Box<dyn FnMut(_)>);
        btn.add_event_listener_with_callback("click", on_save.as_ref().unchecked_ref())?;
        on_save.forget();
    }

    for token_type in TokenType::ALL {
        if let Some(btn) = document.get_element_by_id(&delete_id(token_type)) {
            let on_delete = Closure::wrap(Box::new(move |_: web_sys::MouseEvent| {
                dispatch_global_message(crate::messages::Message::DeleteTokenClicked {
                    agent_id,
                    token_type,
                });
            }) as Box<dyn FnMut(_)>);
            btn.add_event_listener_with_callback("click", on_delete.as_ref().unchecked_ref())?;
            on_delete.forget();
        }
    }

    if let Some(btn) = document.get_element_by_id("token-panel-close") {
        let on_close = Closure::wrap(Box::new(move |_: web_sys::MouseEvent| {
            if let Some(document) = web_sys::window().and_then(|w| w.document()) {
                if let Some(backdrop) = document.get_element_by_id(MODAL_ID) {
                    modal::hide(&backdrop);
                }
            }
        }) as Box<dyn FnMut(_)>);
        btn.add_event_listener_with_callback("click", on_close.as_ref().unchecked_ref())?;
        on_close.forget();
    }

    Ok(())
}

/// RFC 3339 → short local display form; falls back to the raw string.
fn format_timestamp(raw: &str) -> String {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.format("%b %e, %Y %H:%M").to_string())
        .unwrap_or_else(|_| raw.to_string())
}
