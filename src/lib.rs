//! Browser-side UI for the workflow builder: the visual schema editor, the
//! per-agent credential panel, the config-error dialog and the debounced
//! workflow autosave.  Compiled to WASM and driven by the host page through
//! the exported functions at the bottom of this file.

use wasm_bindgen::prelude::*;

pub mod autosave;
pub mod command_executors;
pub mod components;
pub mod constants;
pub mod contract_validation;
pub mod dom_utils;
pub mod macros;
pub mod messages;
pub mod models;
pub mod network;
pub mod reducers;
pub mod schema;
pub mod state;
pub mod toast;
pub mod update;

#[cfg(test)]
mod graph_sync_tests;
#[cfg(test)]
mod schema_prop_test;

use components::schema_editor::EditorContext;
use messages::Message;
use models::SchemaSide;
use schema::SchemaType;
use state::dispatch_global_message;

fn document() -> Result<web_sys::Document, JsValue> {
    web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| JsValue::from_str("no document on window"))
}

/// Entry point: install panic reporting.  Everything else is mounted on
/// demand by the host page.
#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    Ok(())
}

/// Runtime API base configuration, called once by the host before any
/// network-backed component is opened.
#[wasm_bindgen]
pub fn init_api_config_js(base_url: &str) {
    network::init_api_config(base_url);
}

/// Load a workflow into the graph snapshot.
#[wasm_bindgen]
pub fn load_workflow(workflow_id: u32) {
    dispatch_global_message(Message::LoadWorkflow(workflow_id));
}

/// Mount the schema editor for one side of a node's contract.
/// `side` is `"input"` or `"output"`.
#[wasm_bindgen]
pub fn mount_schema_editor(container_id: &str, node_id: &str, side: &str) -> Result<(), JsValue> {
    let side = SchemaSide::parse(side)
        .ok_or_else(|| JsValue::from_str("side must be 'input' or 'output'"))?;
    let mut type_options: Vec<SchemaType> = SchemaType::SCALARS.to_vec();
    type_options.push(SchemaType::Array);
    type_options.push(SchemaType::Object);
    components::schema_editor::mount(
        &document()?,
        EditorContext {
            container_id: container_id.to_string(),
            node_id: node_id.to_string(),
            side,
            type_options,
        },
    )
}

#[wasm_bindgen]
pub fn unmount_schema_editor() {
    components::schema_editor::unmount();
}

/// Open the credential panel for an agent.
#[wasm_bindgen]
pub fn open_integration_settings(agent_id: u32) -> Result<(), JsValue> {
    components::token_panel::open(&document()?, agent_id)
}

/// Show the config-error dialog for a JS array of missing key names.
#[wasm_bindgen]
pub fn show_config_error_modal(keys: JsValue) -> Result<(), JsValue> {
    let keys: Vec<String> = serde_wasm_bindgen::from_value(keys)
        .map_err(|e| JsValue::from_str(&format!("expected an array of strings: {e}")))?;
    components::config_error_modal::open(&document()?, &keys)
}
