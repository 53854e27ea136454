//! Workflow/graph reducer: workflow load, schema replacement, and the edge
//! rewrites the schema editor's store notifications require.

use crate::messages::{Command, Message};
use crate::models::SchemaSide;
use crate::state::AppState;

pub fn update(state: &mut AppState, msg: &Message, commands: &mut Vec<Command>) -> bool {
    match msg {
        Message::LoadWorkflow(id) => {
            commands.push(Command::FetchWorkflow(*id));
            true
        }

        Message::WorkflowLoaded(workflow) => {
            state.workflow_id = Some(workflow.id);
            state.workflow_name = workflow.name.clone();
            state.workflow_description = workflow.description.clone().unwrap_or_default();
            state.test_inputs = workflow.test_inputs();
            state.workflow_nodes = workflow.nodes();
            state.workflow_edges = workflow.edges();
            state.dirty = false;
            commands.push(Command::UpdateUI(Box::new(
                crate::components::schema_editor::refresh,
            )));
            true
        }

        Message::WorkflowLoadFailed(detail) => {
            let detail = detail.clone();
            commands.push(Command::UpdateUI(Box::new(move || {
                crate::toast::error(&format!("Failed to load workflow: {detail}"));
            })));
            true
        }

        Message::WorkflowSaved => {
            state.dirty = false;
            true
        }

        Message::WorkflowSaveFailed(detail) => {
            // State stays dirty so the next change retries the save.
            let detail = detail.clone();
            commands.push(Command::UpdateUI(Box::new(move || {
                crate::toast::error(&format!("Failed to save workflow: {detail}"));
            })));
            true
        }

        Message::NodeSchemaReplaced {
            node_id,
            side,
            schema,
        } => {
            if let Some(node) = state.workflow_nodes.get_mut(node_id) {
                node.set_config_key(side.config_key(), schema.clone());
                state.mark_dirty();
                commands.push(Command::ScheduleAutosave);
                commands.push(Command::UpdateUI(Box::new(
                    crate::components::schema_editor::refresh,
                )));
            }
            true
        }

        Message::EdgeHandleRenamed {
            node_id,
            side,
            old_handle,
            new_handle,
        } => {
            let mut touched = false;
            for edge in state.workflow_edges.iter_mut() {
                match side {
                    SchemaSide::Output => {
                        if edge.source_id == *node_id
                            && edge.source_handle.as_deref() == Some(old_handle.as_str())
                        {
                            edge.source_handle = Some(new_handle.clone());
                            touched = true;
                        }
                    }
                    SchemaSide::Input => {
                        if edge.target_id == *node_id
                            && edge.target_handle.as_deref() == Some(old_handle.as_str())
                        {
                            edge.target_handle = Some(new_handle.clone());
                            touched = true;
                        }
                    }
                }
            }
            if touched {
                state.mark_dirty();
                commands.push(Command::ScheduleAutosave);
            }
            true
        }

        Message::EdgesDroppedForHandle {
            node_id,
            side,
            handle,
        } => {
            let before = state.workflow_edges.len();
            state.workflow_edges.retain(|edge| match side {
                SchemaSide::Output => {
                    !(edge.source_id == *node_id
                        && edge.source_handle.as_deref() == Some(handle.as_str()))
                }
                SchemaSide::Input => {
                    !(edge.target_id == *node_id
                        && edge.target_handle.as_deref() == Some(handle.as_str()))
                }
            });
            if state.workflow_edges.len() != before {
                state.mark_dirty();
                commands.push(Command::ScheduleAutosave);
            }
            true
        }

        _ => false,
    }
}
