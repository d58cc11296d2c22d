//! Scripted player controller for testing
//!
//! Replays a predetermined list of events, useful for deterministic
//! scenario tests.

use crate::core::PlayerId;
use crate::game::controller::{GameStateView, PlayerController};
use crate::game::event::InputEvent;

/// A controller that follows a predetermined sequence of events
pub struct ScriptedController {
    player_id: PlayerId,
    events: Vec<InputEvent>,
    current_step: usize,
}

impl ScriptedController {
    pub fn new(player_id: PlayerId, events: Vec<InputEvent>) -> Self {
        ScriptedController {
            player_id,
            events,
            current_step: 0,
        }
    }

    /// Events not yet handed out
    pub fn remaining(&self) -> usize {
        self.events.len() - self.current_step
    }
}

impl PlayerController for ScriptedController {
    fn player_id(&self) -> PlayerId {
        self.player_id
    }

    fn next_event(&mut self, _view: &GameStateView) -> Option<InputEvent> {
        let event = self.events.get(self.current_step).copied();
        if event.is_some() {
            self.current_step += 1;
        }
        event
    }
}
