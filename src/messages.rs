//! The events that can occur in the UI, and the side effects reducers ask
//! the runtime to perform.

use serde_json::Value;

use crate::models::{ApiWorkflow, SchemaSide, TokenStatusResponse, TokenType};

#[derive(Debug, Clone)]
pub enum Message {
    // Workflow lifecycle
    LoadWorkflow(u32),
    WorkflowLoaded(ApiWorkflow),
    WorkflowLoadFailed(String),
    WorkflowSaved,
    WorkflowSaveFailed(String),

    // Schema editor → graph store
    /// Complete replacement schema for one side of a node.  No diffs.
    NodeSchemaReplaced {
        node_id: String,
        side: SchemaSide,
        schema: Value,
    },
    /// A field identifier used as an edge handle changed.
    EdgeHandleRenamed {
        node_id: String,
        side: SchemaSide,
        old_handle: String,
        new_handle: String,
    },
    /// A field vanished; edges bound to its handle must go with it.
    EdgesDroppedForHandle {
        node_id: String,
        side: SchemaSide,
        handle: String,
    },

    // Credential panel
    TokenPanelOpened {
        agent_id: u32,
    },
    TokenStatusLoaded {
        agent_id: u32,
        token_type: TokenType,
        status: Option<TokenStatusResponse>,
    },
    SaveTokensClicked {
        agent_id: u32,
        pending: Vec<(TokenType, String)>,
    },
    TokensSaveCompleted {
        agent_id: u32,
        issued: Vec<TokenType>,
        all_ok: bool,
    },
    DeleteTokenClicked {
        agent_id: u32,
        token_type: TokenType,
    },
    TokenDeleteCompleted {
        agent_id: u32,
        token_type: TokenType,
        result: Result<(), String>,
    },
}

/// Side effects produced by reducers, executed by `command_executors` once
/// the state borrow has been released.
pub enum Command {
    /// Chain another message through the dispatcher.
    SendMessage(Message),

    /// Run a UI update closure after the state change settles.
    UpdateUI(Box<dyn FnOnce() + 'static>),

    /// GET the workflow document and dispatch `WorkflowLoaded`.
    FetchWorkflow(u32),

    /// GET one token slot's masked status.
    FetchTokenStatus {
        agent_id: u32,
        token_type: TokenType,
    },

    /// POST every pending slot concurrently; aggregate into one result.
    SaveTokens {
        agent_id: u32,
        pending: Vec<(TokenType, String)>,
    },

    /// DELETE one token slot.
    DeleteToken {
        agent_id: u32,
        token_type: TokenType,
    },

    /// Arm (or re-arm) the trailing-edge autosave debounce.
    ScheduleAutosave,

    /// No side effect.
    NoOp,
}
