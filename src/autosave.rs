//! Debounced workflow autosave.
//!
//! `request_save` is the global trigger.  Each trigger arms a new generation
//! and schedules the quiet-period wait; a later trigger bumps the generation
//! so the stale timer exits without firing.  The deferred closure reads
//! `APP_STATE` *at fire time*, not at trigger time, so a collapsed burst
//! always persists the latest snapshot.

use std::cell::Cell;
use std::rc::Rc;

use gloo_timers::future::TimeoutFuture;
use wasm_bindgen_futures::spawn_local;

use crate::constants::AUTOSAVE_QUIET_MS;
use crate::messages::Message;
use crate::models::{
    Coordinates, LinkPayload, NodePayload, WorkflowDefinitionPayload, WorkflowUpdatePayload,
};
use crate::network::api_client::ApiClient;
use crate::state::{dispatch_global_message, AppState, APP_STATE};
use crate::warn_log;

/// Trailing-edge debounce on a generation counter.  Cancellation is just
/// another generation bump, so teardown discards pending work for free.
pub struct Debouncer {
    quiet_ms: u32,
    generation: Rc<Cell<u64>>,
}

impl Debouncer {
    pub fn new(quiet_ms: u32) -> Debouncer {
        Debouncer {
            quiet_ms,
            generation: Rc::new(Cell::new(0)),
        }
    }

    /// Schedule `f` to run after the quiet period, superseding any pending
    /// trigger.
    pub fn trigger<F: FnOnce() + 'static>(&self, f: F) {
        let armed = self.generation.get() + 1;
        self.generation.set(armed);
        let generation = Rc::clone(&self.generation);
        let quiet_ms = self.quiet_ms;
        spawn_local(async move {
            TimeoutFuture::new(quiet_ms).await;
            if generation.get() == armed {
                f();
            }
        });
    }

    /// Discard any pending trigger.
    pub fn cancel(&self) {
        self.generation.set(self.generation.get() + 1);
    }
}

thread_local! {
    static AUTOSAVE: Debouncer = Debouncer::new(AUTOSAVE_QUIET_MS);
}

/// Arm (or re-arm) the autosave timer.  Safe to call on every change; bursts
/// within the quiet period collapse into a single PUT.
pub fn request_save() {
    AUTOSAVE.with(|debouncer| debouncer.trigger(fire));
}

/// Drop any pending save, e.g. when the editor tears down.
pub fn cancel_pending() {
    AUTOSAVE.with(|debouncer| debouncer.cancel());
}

fn fire() {
    let snapshot = APP_STATE.with(|state| build_update_payload(&state.borrow()));
    let Some((workflow_id, payload)) = snapshot else {
        return;
    };

    let body = match serde_json::to_value(&payload) {
        Ok(v) => v,
        Err(e) => {
            warn_log!("autosave: payload serialization failed: {e}");
            return;
        }
    };
    debug_assert!(
        crate::contract_validation::validate_update_payload(&body),
        "workflow update payload violates the wire contract"
    );

    spawn_local(async move {
        match ApiClient::update_workflow(workflow_id, &body.to_string()).await {
            Ok(_) => dispatch_global_message(Message::WorkflowSaved),
            Err(e) => dispatch_global_message(Message::WorkflowSaveFailed(
                e.as_string().unwrap_or_else(|| format!("{e:?}")),
            )),
        }
    });
}

/// Reshape the current graph snapshot into the persistence payload.
///
/// Persisted node ids prefer the user-assigned title, then the node type,
/// then a literal placeholder; links are resolved from transient ids to the
/// chosen identifiers and dropped when an endpoint is unknown.
pub fn build_update_payload(state: &AppState) -> Option<(u32, WorkflowUpdatePayload)> {
    let workflow_id = state.workflow_id?;

    let mut persisted_ids = std::collections::HashMap::new();
    let mut nodes: Vec<NodePayload> = state
        .workflow_nodes
        .values()
        .map(|node| {
            let id = node.persisted_id();
            persisted_ids.insert(node.node_id.clone(), id.clone());
            NodePayload {
                id,
                node_type: node.node_type.clone(),
                config: node.config.clone(),
                coordinates: Coordinates { x: node.x, y: node.y },
            }
        })
        .collect();
    // HashMap iteration order is arbitrary; keep the wire form stable.
    nodes.sort_by(|a, b| a.id.cmp(&b.id));

    let links = state
        .workflow_edges
        .iter()
        .filter_map(|edge| {
            let source_id = persisted_ids.get(&edge.source_id)?.clone();
            let target_id = persisted_ids.get(&edge.target_id)?.clone();
            Some(LinkPayload {
                source_id,
                target_id,
                source_handle: edge.source_handle.clone(),
                target_handle: edge.target_handle.clone(),
            })
        })
        .collect();

    Some((
        workflow_id,
        WorkflowUpdatePayload {
            name: state.workflow_name.clone(),
            description: state.workflow_description.clone(),
            definition: WorkflowDefinitionPayload {
                nodes,
                links,
                test_inputs: state.test_inputs.clone(),
            },
        },
    ))
}


#[cfg(all(test, target_arch = "wasm32"))]
mod debounce_tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    async fn two_triggers_in_one_quiet_window_collapse_to_the_latest() {
        let fired: Rc<std::cell::RefCell<Vec<u32>>> = Rc::new(std::cell::RefCell::new(Vec::new()));
        let debouncer = Debouncer::new(50);

        let record = |value: u32| {
            let fired = Rc::clone(&fired);
            move || fired.borrow_mut().push(value)
        };
        debouncer.trigger(record(1));
        debouncer.trigger(record(2));

        TimeoutFuture::new(150).await;
        assert_eq!(*fired.borrow(), vec![2]);
    }

    #[wasm_bindgen_test]
    async fn cancel_discards_the_pending_trigger() {
        let fired: Rc<std::cell::RefCell<Vec<u32>>> = Rc::new(std::cell::RefCell::new(Vec::new()));
        let debouncer = Debouncer::new(50);

        {
            let fired = Rc::clone(&fired);
            debouncer.trigger(move || fired.borrow_mut().push(1));
        }
        debouncer.cancel();

        TimeoutFuture::new(150).await;
        assert!(fired.borrow().is_empty());
    }

    #[wasm_bindgen_test]
    async fn spaced_triggers_each_fire() {
        let fired: Rc<std::cell::RefCell<Vec<u32>>> = Rc::new(std::cell::RefCell::new(Vec::new()));
        let debouncer = Debouncer::new(30);

        {
            let fired = Rc::clone(&fired);
            debouncer.trigger(move || fired.borrow_mut().push(1));
        }
        TimeoutFuture::new(100).await;
        {
            let fired = Rc::clone(&fired);
            debouncer.trigger(move || fired.borrow_mut().push(2));
        }
        TimeoutFuture::new(100).await;

        assert_eq!(*fired.borrow(), vec![1, 2]);
    }
}
