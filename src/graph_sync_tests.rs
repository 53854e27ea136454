//! Reducer-level tests: store notifications rewrite the right edges, schema
//! replacements land under the right config key, and the credential save
//! issues exactly the pending slots.

use serde_json::json;

use crate::messages::{Command, Message};
use crate::models::{
    ApiWorkflow, SchemaSide, TokenStatusResponse, TokenType, WorkflowEdge, WorkflowNode,
};
use crate::state::AppState;
use crate::update::update;

fn state_with_edge() -> AppState {
    let mut state = AppState::new();
    state.workflow_id = Some(1);
    state
        .workflow_nodes
        .insert("n1".into(), WorkflowNode::new("n1", "http_request"));
    state
        .workflow_nodes
        .insert("n2".into(), WorkflowNode::new("n2", "transform"));
    state.workflow_edges.push(WorkflowEdge {
        source_id: "n1".into(),
        target_id: "n2".into(),
        source_handle: Some("result".into()),
        target_handle: Some("payload".into()),
    });
    state
}

fn count_schedule_autosave(commands: &[Command]) -> usize {
    commands
        .iter()
        .filter(|c| matches!(c, Command::ScheduleAutosave))
        .count()
}

#[test]
fn output_handle_rename_rewrites_source_handles_only() {
    let mut state = state_with_edge();
    let commands = update(
        &mut state,
        Message::EdgeHandleRenamed {
            node_id: "n1".into(),
            side: SchemaSide::Output,
            old_handle: "result".into(),
            new_handle: "body".into(),
        },
    );
    let edge = &state.workflow_edges[0];
    assert_eq!(edge.source_handle.as_deref(), Some("body"));
    assert_eq!(edge.target_handle.as_deref(), Some("payload"));
    assert!(state.dirty);
    assert_eq!(count_schedule_autosave(&commands), 1);
}

#[test]
fn input_handle_rename_only_touches_edges_entering_the_node() {
    let mut state = state_with_edge();
    update(
        &mut state,
        Message::EdgeHandleRenamed {
            node_id: "n2".into(),
            side: SchemaSide::Input,
            old_handle: "payload".into(),
            new_handle: "input".into(),
        },
    );
    assert_eq!(state.workflow_edges[0].target_handle.as_deref(), Some("input"));

    // A rename for a handle nothing is bound to changes nothing.
    let commands = update(
        &mut state,
        Message::EdgeHandleRenamed {
            node_id: "n2".into(),
            side: SchemaSide::Input,
            old_handle: "missing".into(),
            new_handle: "x".into(),
        },
    );
    assert_eq!(count_schedule_autosave(&commands), 0);
}

#[test]
fn dropped_handle_removes_bound_edges() {
    let mut state = state_with_edge();
    update(
        &mut state,
        Message::EdgesDroppedForHandle {
            node_id: "n1".into(),
            side: SchemaSide::Output,
            handle: "result".into(),
        },
    );
    assert!(state.workflow_edges.is_empty());
    assert!(state.dirty);
}

#[test]
fn schema_replacement_lands_under_the_side_key_and_schedules_a_save() {
    let mut state = state_with_edge();
    let schema = json!({ "type": "object", "properties": {}, "required": [] });
    let commands = update(
        &mut state,
        Message::NodeSchemaReplaced {
            node_id: "n1".into(),
            side: SchemaSide::Output,
            schema: schema.clone(),
        },
    );
    assert_eq!(
        state.node_schema("n1", SchemaSide::Output),
        Some(&schema)
    );
    assert!(state.node_schema("n1", SchemaSide::Input).is_none());
    assert!(state.dirty);
    assert_eq!(count_schedule_autosave(&commands), 1);
}

#[test]
fn workflow_load_replaces_the_snapshot_and_clears_dirty() {
    let mut state = state_with_edge();
    state.mark_dirty();
    update(
        &mut state,
        Message::WorkflowLoaded(ApiWorkflow {
            id: 9,
            name: "fresh".into(),
            description: Some("desc".into()),
            definition: json!({
                "nodes": [
                    { "id": "a", "node_type": "trigger", "config": {},
                      "coordinates": { "x": 1.0, "y": 2.0 } }
                ],
                "links": [],
                "test_inputs": []
            }),
        }),
    );
    assert_eq!(state.workflow_id, Some(9));
    assert_eq!(state.workflow_name, "fresh");
    assert_eq!(state.workflow_nodes.len(), 1);
    assert!(state.workflow_edges.is_empty());
    assert!(!state.dirty);
}

// ---------------------------------------------------------------------------
// Credential panel
// ---------------------------------------------------------------------------

fn open_panel(state: &mut AppState) {
    update(state, Message::TokenPanelOpened { agent_id: 5 });
}

#[test]
fn opening_the_panel_fetches_all_three_slots() {
    let mut state = AppState::new();
    let commands = update(&mut state, Message::TokenPanelOpened { agent_id: 5 });
    let fetched: Vec<TokenType> = commands
        .iter()
        .filter_map(|c| match c {
            Command::FetchTokenStatus { token_type, .. } => Some(*token_type),
            _ => None,
        })
        .collect();
    assert_eq!(fetched.len(), 3);
    for ty in TokenType::ALL {
        assert!(fetched.contains(&ty));
    }
}

#[test]
fn saving_only_the_bot_token_issues_exactly_one_write() {
    let mut state = AppState::new();
    open_panel(&mut state);

    let commands = update(
        &mut state,
        Message::SaveTokensClicked {
            agent_id: 5,
            pending: vec![(TokenType::Bot, "xoxb-1".into())],
        },
    );
    let saves: Vec<&Vec<(TokenType, String)>> = commands
        .iter()
        .filter_map(|c| match c {
            Command::SaveTokens { pending, .. } => Some(pending),
            _ => None,
        })
        .collect();
    assert_eq!(saves.len(), 1);
    assert_eq!(saves[0].len(), 1);
    assert_eq!(saves[0][0].0, TokenType::Bot);
    assert!(state.token_panel.as_ref().unwrap().saving);
}

#[test]
fn empty_save_issues_no_write() {
    let mut state = AppState::new();
    open_panel(&mut state);
    let commands = update(
        &mut state,
        Message::SaveTokensClicked {
            agent_id: 5,
            pending: vec![],
        },
    );
    assert!(!commands
        .iter()
        .any(|c| matches!(c, Command::SaveTokens { .. })));
    assert!(!state.token_panel.as_ref().unwrap().saving);
}

#[test]
fn successful_save_marks_slots_configured_and_refetches_them() {
    let mut state = AppState::new();
    open_panel(&mut state);
    update(
        &mut state,
        Message::SaveTokensClicked {
            agent_id: 5,
            pending: vec![(TokenType::Bot, "xoxb-1".into())],
        },
    );
    let commands = update(
        &mut state,
        Message::TokensSaveCompleted {
            agent_id: 5,
            issued: vec![TokenType::Bot],
            all_ok: true,
        },
    );
    let panel = state.token_panel.as_ref().unwrap();
    assert!(!panel.saving);
    assert!(panel.slot(TokenType::Bot).configured);
    assert!(!panel.slot(TokenType::User).configured);
    assert!(!panel.slot(TokenType::App).configured);
    assert!(commands.iter().any(|c| matches!(
        c,
        Command::FetchTokenStatus { token_type: TokenType::Bot, .. }
    )));
}

#[test]
fn failed_save_clears_the_saving_flag_but_not_the_slots() {
    let mut state = AppState::new();
    open_panel(&mut state);
    update(
        &mut state,
        Message::TokensSaveCompleted {
            agent_id: 5,
            issued: vec![TokenType::Bot, TokenType::User],
            all_ok: false,
        },
    );
    let panel = state.token_panel.as_ref().unwrap();
    assert!(!panel.saving);
    assert!(!panel.slot(TokenType::Bot).configured);
}

#[test]
fn delete_roundtrip_clears_the_slot_locally() {
    let mut state = AppState::new();
    open_panel(&mut state);
    update(
        &mut state,
        Message::TokenStatusLoaded {
            agent_id: 5,
            token_type: TokenType::App,
            status: Some(TokenStatusResponse {
                masked_token: "xapp-…123".into(),
                updated_at: Some("2026-01-01T00:00:00+00:00".into()),
            }),
        },
    );
    assert!(state.token_panel.as_ref().unwrap().slot(TokenType::App).configured);

    let commands = update(
        &mut state,
        Message::DeleteTokenClicked {
            agent_id: 5,
            token_type: TokenType::App,
        },
    );
    assert!(commands.iter().any(|c| matches!(
        c,
        Command::DeleteToken { token_type: TokenType::App, .. }
    )));
    assert!(state.token_panel.as_ref().unwrap().slot(TokenType::App).deleting);

    // Repeat clicks while in flight are ignored.
    let commands = update(
        &mut state,
        Message::DeleteTokenClicked {
            agent_id: 5,
            token_type: TokenType::App,
        },
    );
    assert!(!commands
        .iter()
        .any(|c| matches!(c, Command::DeleteToken { .. })));

    update(
        &mut state,
        Message::TokenDeleteCompleted {
            agent_id: 5,
            token_type: TokenType::App,
            result: Ok(()),
        },
    );
    let slot = state.token_panel.as_ref().unwrap().slot(TokenType::App);
    assert!(!slot.configured);
    assert!(slot.masked.is_none());
    assert!(slot.updated_at.is_none());
    assert!(!slot.deleting);
}

#[test]
fn messages_for_a_different_agent_are_ignored() {
    let mut state = AppState::new();
    open_panel(&mut state);
    update(
        &mut state,
        Message::TokenStatusLoaded {
            agent_id: 99,
            token_type: TokenType::Bot,
            status: Some(TokenStatusResponse {
                masked_token: "xoxb-…9".into(),
                updated_at: None,
            }),
        },
    );
    assert!(!state.token_panel.as_ref().unwrap().slot(TokenType::Bot).configured);
}
