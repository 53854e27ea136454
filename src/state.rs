//! Global application state and the dispatch entry point.
//!
//! State lives in a `thread_local!` `RefCell`; every event goes through
//! `dispatch_global_message`, which runs the reducers while the borrow is
//! held and executes the returned commands after it is released.  Commands
//! are the only place DOM and network side effects happen, so reducers stay
//! testable on the host.

use std::cell::RefCell;
use std::collections::HashMap;

use serde_json::Value;

use crate::messages::Message;
use crate::models::{SchemaSide, TokenType, WorkflowEdge, WorkflowNode};

/// One credential slot as currently known to the UI.
#[derive(Debug, Clone, Default)]
pub struct TokenSlot {
    pub configured: bool,
    pub masked: Option<String>,
    pub updated_at: Option<String>,
    /// Delete call in flight; repeat clicks are ignored.
    pub deleting: bool,
}

/// Credential panel state for the agent it is currently open for.
#[derive(Debug, Clone)]
pub struct TokenPanelState {
    pub agent_id: u32,
    pub slots: HashMap<TokenType, TokenSlot>,
    /// Aggregate save in flight.
    pub saving: bool,
}

impl TokenPanelState {
    pub fn new(agent_id: u32) -> TokenPanelState {
        let mut slots = HashMap::new();
        for ty in TokenType::ALL {
            slots.insert(ty, TokenSlot::default());
        }
        TokenPanelState {
            agent_id,
            slots,
            saving: false,
        }
    }

    pub fn slot(&self, ty: TokenType) -> &TokenSlot {
        &self.slots[&ty]
    }

    pub fn slot_mut(&mut self, ty: TokenType) -> &mut TokenSlot {
        self.slots.get_mut(&ty).expect("all slots initialized")
    }
}

pub struct AppState {
    // Current workflow identity
    pub workflow_id: Option<u32>,
    pub workflow_name: String,
    pub workflow_description: String,
    pub test_inputs: Vec<Value>,

    // Graph snapshot (transient node id → node)
    pub workflow_nodes: HashMap<String, WorkflowNode>,
    pub workflow_edges: Vec<WorkflowEdge>,

    /// Unsaved changes exist; cleared when a save lands.
    pub dirty: bool,

    pub token_panel: Option<TokenPanelState>,
}

impl AppState {
    pub fn new() -> AppState {
        AppState {
            workflow_id: None,
            workflow_name: String::new(),
            workflow_description: String::new(),
            test_inputs: Vec::new(),
            workflow_nodes: HashMap::new(),
            workflow_edges: Vec::new(),
            dirty: false,
            token_panel: None,
        }
    }

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Schema document stored for one side of a node, if any.
    pub fn node_schema(&self, node_id: &str, side: SchemaSide) -> Option<&Value> {
        self.workflow_nodes
            .get(node_id)?
            .config
            .get(side.config_key())
    }
}

impl Default for AppState {
    fn default() -> Self {
        AppState::new()
    }
}

thread_local! {
    pub static APP_STATE: RefCell<AppState> = RefCell::new(AppState::new());
}

/// Single entry point for every UI and network-completion event.
///
/// The state borrow is scoped to the reducer run; commands (which may
/// re-dispatch, touch the DOM, or spawn network futures) execute strictly
/// after it is dropped.
pub fn dispatch_global_message(msg: Message) {
    let commands = APP_STATE.with(|state| {
        let mut state = state.borrow_mut();
        crate::update::update(&mut state, msg)
    });
    crate::command_executors::execute_commands(commands);
}
