//! Credential panel reducer.
//!
//! The aggregate-save rule lives here: one POST per non-empty pending slot,
//! a single success toast only when every issued call lands, and one generic
//! failure toast otherwise (deliberately not naming the failing slot).

use crate::messages::{Command, Message};
use crate::state::{AppState, TokenPanelState};

pub fn update(state: &mut AppState, msg: &Message, commands: &mut Vec<Command>) -> bool {
    match msg {
        Message::TokenPanelOpened { agent_id } => {
            let panel = TokenPanelState::new(*agent_id);
            state.token_panel = Some(panel);
            for token_type in crate::models::TokenType::ALL {
                commands.push(Command::FetchTokenStatus {
                    agent_id: *agent_id,
                    token_type,
                });
            }
            true
        }

        Message::TokenStatusLoaded {
            agent_id,
            token_type,
            status,
        } => {
            if let Some(panel) = panel_for(state, *agent_id) {
                let slot = panel.slot_mut(*token_type);
                match status {
                    Some(s) => {
                        slot.configured = true;
                        slot.masked = Some(s.masked_token.clone());
                        slot.updated_at = s.updated_at.clone();
                    }
                    None => {
                        slot.configured = false;
                        slot.masked = None;
                        slot.updated_at = None;
                    }
                }
                commands.push(refresh_panel());
            }
            true
        }

        Message::SaveTokensClicked { agent_id, pending } => {
            let Some(panel) = panel_for(state, *agent_id) else {
                return true;
            };
            if panel.saving {
                return true;
            }
            if pending.is_empty() {
                commands.push(Command::UpdateUI(Box::new(|| {
                    crate::toast::show("Nothing to save", crate::toast::ToastKind::Info);
                })));
                return true;
            }
            panel.saving = true;
            commands.push(Command::SaveTokens {
                agent_id: *agent_id,
                pending: pending.clone(),
            });
            commands.push(refresh_panel());
            true
        }

        Message::TokensSaveCompleted {
            agent_id,
            issued,
            all_ok,
        } => {
            if let Some(panel) = panel_for(state, *agent_id) {
                panel.saving = false;
                if *all_ok {
                    for token_type in issued {
                        panel.slot_mut(*token_type).configured = true;
                        // Masked form and timestamp come from the refetch.
                        commands.push(Command::FetchTokenStatus {
                            agent_id: *agent_id,
                            token_type: *token_type,
                        });
                    }
                    commands.push(Command::UpdateUI(Box::new(|| {
                        crate::toast::success("Tokens saved");
                    })));
                } else {
                    commands.push(Command::UpdateUI(Box::new(|| {
                        crate::toast::error("Failed to save tokens");
                    })));
                }
                commands.push(refresh_panel());
            }
            true
        }

        Message::DeleteTokenClicked {
            agent_id,
            token_type,
        } => {
            if let Some(panel) = panel_for(state, *agent_id) {
                let slot = panel.slot_mut(*token_type);
                if slot.deleting || !slot.configured {
                    return true;
                }
                slot.deleting = true;
                commands.push(Command::DeleteToken {
                    agent_id: *agent_id,
                    token_type: *token_type,
                });
                commands.push(refresh_panel());
            }
            true
        }

        Message::TokenDeleteCompleted {
            agent_id,
            token_type,
            result,
        } => {
            if let Some(panel) = panel_for(state, *agent_id) {
                let slot = panel.slot_mut(*token_type);
                slot.deleting = false;
                match result {
                    Ok(()) => {
                        slot.configured = false;
                        slot.masked = None;
                        slot.updated_at = None;
                        commands.push(Command::UpdateUI(Box::new(|| {
                            crate::toast::success("Token deleted");
                        })));
                    }
                    Err(detail) => {
                        let detail = detail.clone();
                        commands.push(Command::UpdateUI(Box::new(move || {
                            crate::toast::error(&format!("Failed to delete token: {detail}"));
                        })));
                    }
                }
                commands.push(refresh_panel());
            }
            true
        }

        _ => false,
    }
}

fn panel_for(state: &mut AppState, agent_id: u32) -> Option<&mut TokenPanelState> {
    state
        .token_panel
        .as_mut()
        .filter(|panel| panel.agent_id == agent_id)
}

fn refresh_panel() -> Command {
    Command::UpdateUI(Box::new(crate::components::token_panel::refresh))
}
