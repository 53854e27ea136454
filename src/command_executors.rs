//! Executes the side effects reducers ask for.  Runs strictly after the
//! state borrow is released, so executors are free to re-dispatch.

use wasm_bindgen::JsValue;
use wasm_bindgen_futures::{future_to_promise, spawn_local, JsFuture};

use crate::debug_log;
use crate::messages::{Command, Message};
use crate::models::{ApiWorkflow, TokenStatusResponse, TokenType};
use crate::network::api_client::ApiClient;
use crate::state::dispatch_global_message;

pub fn execute_commands(commands: Vec<Command>) {
    for command in commands {
        execute(command);
    }
}

fn execute(command: Command) {
    match command {
        Command::SendMessage(msg) => dispatch_global_message(msg),

        Command::UpdateUI(f) => f(),

        Command::FetchWorkflow(workflow_id) => {
            // A pending save of the outgoing snapshot must not land on top
            // of the workflow being loaded.
            crate::autosave::cancel_pending();
            spawn_local(async move {
                match ApiClient::get_workflow(workflow_id).await {
                    Ok(response) => match serde_json::from_str::<ApiWorkflow>(&response) {
                        Ok(workflow) => {
                            debug_log!("Loaded workflow {} ({})", workflow.id, workflow.name);
                            dispatch_global_message(Message::WorkflowLoaded(workflow));
                        }
                        Err(e) => dispatch_global_message(Message::WorkflowLoadFailed(format!(
                            "unexpected response: {e}"
                        ))),
                    },
                    Err(e) => dispatch_global_message(Message::WorkflowLoadFailed(js_error(e))),
                }
            });
        }

        Command::FetchTokenStatus {
            agent_id,
            token_type,
        } => {
            spawn_local(async move {
                // Any failure (404 included) shows as Not Configured.
                let status = match ApiClient::get_token_status(agent_id, token_type.wire_name())
                    .await
                {
                    Ok(response) => serde_json::from_str::<TokenStatusResponse>(&response).ok(),
                    Err(_) => None,
                };
                dispatch_global_message(Message::TokenStatusLoaded {
                    agent_id,
                    token_type,
                    status,
                });
            });
        }

        Command::SaveTokens { agent_id, pending } => {
            spawn_local(async move {
                let issued: Vec<TokenType> = pending.iter().map(|(ty, _)| *ty).collect();

                // Convert each write to a JS promise first so they all run
                // eagerly, then await them one by one.
                let calls: Vec<js_sys::Promise> = pending
                    .into_iter()
                    .map(|(token_type, token)| {
                        future_to_promise(async move {
                            ApiClient::set_token(agent_id, token_type.wire_name(), &token)
                                .await
                                .map(JsValue::from)
                        })
                    })
                    .collect();

                let mut all_ok = true;
                for call in calls {
                    if JsFuture::from(call).await.is_err() {
                        all_ok = false;
                    }
                }

                dispatch_global_message(Message::TokensSaveCompleted {
                    agent_id,
                    issued,
                    all_ok,
                });
            });
        }

        Command::DeleteToken {
            agent_id,
            token_type,
        } => {
            spawn_local(async move {
                let result = ApiClient::delete_token(agent_id, token_type.wire_name())
                    .await
                    .map(|_| ())
                    .map_err(js_error);
                dispatch_global_message(Message::TokenDeleteCompleted {
                    agent_id,
                    token_type,
                    result,
                });
            });
        }

        Command::ScheduleAutosave => crate::autosave::request_save(),

        Command::NoOp => {}
    }
}

fn js_error(e: JsValue) -> String {
    e.as_string().unwrap_or_else(|| format!("{e:?}"))
}
