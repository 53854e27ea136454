//! Root reducer: delegates every message to its domain reducer.

use crate::messages::{Command, Message};
use crate::state::AppState;

pub fn update(state: &mut AppState, msg: Message) -> Vec<Command> {
    let mut commands = Vec::new();

    if crate::reducers::graph::update(state, &msg, &mut commands) {
        return commands;
    }
    if crate::reducers::tokens::update(state, &msg, &mut commands) {
        return commands;
    }

    commands
}
