//! Game loop implementation
//!
//! Drives a game from event to event: human seats through a
//! `PlayerController`, automated seats through the heuristic policy, whose
//! decisions are applied as synthetic events.

use crate::board::Position;
use crate::core::{Ability, PlayerId, UnitId};
use crate::game::controller::{GameStateView, PlayerController};
use crate::game::event::{CardOutcome, EventOrigin, EventOutcome, InputEvent};
use crate::game::heuristic_controller::{HeuristicController, OpponentAction};
use crate::game::GameState;
use crate::{DuelError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Verbosity level for game output
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub enum VerbosityLevel {
    /// Silent - no output during game
    Silent = 0,
    /// Minimal - turns and the outcome
    Minimal = 1,
    /// Normal - resolved actions and card plays (default)
    #[default]
    Normal = 2,
    /// Verbose - selections and policy reasoning
    Verbose = 3,
}

/// Result of running a game to completion
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameResult {
    /// Winner of the game (None on a turn-limit draw)
    pub winner: Option<PlayerId>,
    /// Total number of turns played, both seats counted
    pub turns_played: u32,
    pub end_reason: GameEndReason,
}

/// Reason the game ended; player ids name the loser
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEndReason {
    /// The player's avatar was destroyed
    AvatarDestroyed(PlayerId),
    /// The player had to draw from an empty deck
    DeckExhausted(PlayerId),
    /// The player's controller stopped supplying events
    Conceded(PlayerId),
    /// Game reached maximum turn limit
    TurnLimit,
}

impl fmt::Display for GameEndReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameEndReason::AvatarDestroyed(p) => write!(f, "player {p}'s avatar was destroyed"),
            GameEndReason::DeckExhausted(p) => write!(f, "player {p} ran out of cards"),
            GameEndReason::Conceded(p) => write!(f, "player {p} conceded"),
            GameEndReason::TurnLimit => write!(f, "turn limit reached"),
        }
    }
}

/// Game loop manager
pub struct GameLoop<'a> {
    /// The game state
    pub game: &'a mut GameState,
    /// Maximum turns before the game is called a draw
    max_turns: u32,
    /// Verbosity level for output (cached from game.logger)
    pub verbosity: VerbosityLevel,
}

impl<'a> GameLoop<'a> {
    pub fn new(game: &'a mut GameState) -> Self {
        let verbosity = game.logger.verbosity();
        GameLoop {
            game,
            max_turns: 200,
            verbosity,
        }
    }

    /// Set maximum turns before forcing a draw
    pub fn with_max_turns(mut self, max_turns: u32) -> Self {
        self.max_turns = max_turns;
        self
    }

    /// Set verbosity on both the loop and the game's logger
    pub fn with_verbosity(mut self, verbosity: VerbosityLevel) -> Self {
        self.verbosity = verbosity;
        self.game.logger.set_verbosity(verbosity);
        self
    }

    /// Feed one human event, then play out any automated turns it hands over to
    pub fn handle_event(&mut self, event: InputEvent) -> Result<EventOutcome> {
        let outcome = self.game.handle_event(event, EventOrigin::Human)?;
        self.run_automated_turns()?;
        Ok(outcome)
    }

    /// Play automated seats until a controlled seat is up or the game ends
    pub fn run_automated_turns(&mut self) -> Result<()> {
        loop {
            if self.check_turn_limit() {
                return Ok(());
            }
            let current = self.game.turn.current_player;
            if !self.game.turn.is_automated(current) {
                return Ok(());
            }
            self.run_policy_turn(current)?;
        }
    }

    /// Ends the game once the turn limit is hit; true when the game is over
    fn check_turn_limit(&mut self) -> bool {
        if !self.game.is_game_over() && self.game.turn.turns_played >= self.max_turns {
            self.game.end_game(GameEndReason::TurnLimit);
        }
        self.game.is_game_over()
    }

    /// One full heuristic turn for `player`, ending with an end-turn event
    pub fn run_policy_turn(&mut self, player: PlayerId) -> Result<()> {
        let policy = HeuristicController::new(player);
        // units summoned this turn cannot act; take the roster first
        let mut roster = self.game.units_of(player);
        let avatar = self.game.get_player(player)?.avatar;
        if !roster.contains(&avatar) && self.game.units.contains(avatar) {
            roster.push(avatar);
        }

        while !self.game.is_game_over() {
            let view = GameStateView::new(self.game, player);
            let Some(action) = policy.plan_spell(&view) else {
                break;
            };
            if matches!(action, OpponentAction::PassSpell { .. }) {
                break;
            }
            if !matches!(self.apply_action(player, action)?, EventOutcome::CardPlayed(CardOutcome::Cast { .. })) {
                break;
            }
        }

        while !self.game.is_game_over() {
            let view = GameStateView::new(self.game, player);
            let Some(action) = policy.plan_summon(&view) else {
                break;
            };
            if !matches!(self.apply_action(player, action)?, EventOutcome::CardPlayed(CardOutcome::Summoned(_))) {
                break;
            }
        }

        for unit in &roster {
            self.unit_turn(&policy, player, *unit)?;
        }
        for unit in &roster {
            let attacks_twice = self
                .game
                .unit(*unit)
                .is_ok_and(|u| u.has(Ability::AttackTwice) && u.attacks_remaining > 0);
            if attacks_twice {
                self.unit_turn(&policy, player, *unit)?;
            }
        }

        if !self.game.is_game_over() {
            self.game.handle_event(InputEvent::EndTurn, EventOrigin::Synthetic)?;
        }
        Ok(())
    }

    fn unit_turn(&mut self, policy: &HeuristicController, player: PlayerId, unit: UnitId) -> Result<()> {
        if self.game.is_game_over() || !self.game.units.contains(unit) {
            return Ok(());
        }
        let view = GameStateView::new(self.game, player);
        if let Some(action) = policy.plan_unit(&view, unit) {
            self.apply_action(player, action)?;
        }
        Ok(())
    }

    /// Apply one policy decision as synthetic clicks
    ///
    /// Returns the outcome of the last event issued.
    pub fn apply_action(&mut self, player: PlayerId, action: OpponentAction) -> Result<EventOutcome> {
        match action {
            OpponentAction::Summon { card, tile } | OpponentAction::CastSpell { card, tile } => {
                let slot = self
                    .game
                    .get_player(player)?
                    .hand
                    .position_of(card)
                    .ok_or(DuelError::EntityNotFound(card.as_u32()))?;
                self.synthetic(InputEvent::SelectCard { hand_position: slot + 1 })?;
                self.synthetic(InputEvent::tile(tile))
            }
            OpponentAction::Move { unit, to } => self.click_with(unit, to),
            OpponentAction::Attack { unit, target } => self.click_with(unit, target),
            OpponentAction::MoveAndAttack { unit, to, target } => {
                let outcome = self.click_with(unit, to)?;
                if self.game.is_game_over() || !self.game.units.contains(unit) {
                    return Ok(outcome);
                }
                self.click_with(unit, target)
            }
            OpponentAction::PassSpell { .. } => Ok(EventOutcome::Deselected),
        }
    }

    /// Select `unit` then click `tile`
    fn click_with(&mut self, unit: UnitId, tile: Position) -> Result<EventOutcome> {
        let from = self.game.position_of(unit)?;
        self.synthetic(InputEvent::tile(from))?;
        self.synthetic(InputEvent::tile(tile))
    }

    fn synthetic(&mut self, event: InputEvent) -> Result<EventOutcome> {
        self.game.handle_event(event, EventOrigin::Synthetic)
    }

    /// Run the game with one controlled seat; other seats are automated
    pub fn run_with_controller(&mut self, controller: &mut dyn PlayerController) -> Result<GameResult> {
        let seat = controller.player_id();
        self.game.turn.set_automated(seat, false);
        if self.game.turn.current_player == seat && !self.game.is_game_over() {
            self.game.turn.ui_accept = true;
        }

        loop {
            self.run_automated_turns()?;
            if self.check_turn_limit() {
                break;
            }
            let event = {
                let view = GameStateView::new(self.game, seat);
                controller.next_event(&view)
            };
            let Some(event) = event else {
                self.game.end_game(GameEndReason::Conceded(seat));
                break;
            };
            let outcome = self.game.handle_event(event, EventOrigin::Human)?;
            log_event!(self.game, Verbose, "turn", "{:?} -> {:?}", event, outcome);
        }

        let result = self.result();
        let view = GameStateView::new(self.game, seat);
        controller.on_game_end(&view, result.winner == Some(seat));
        Ok(result)
    }

    /// Run a game with every seat driven by the policy
    pub fn run_self_play(&mut self) -> Result<GameResult> {
        let seats: Vec<PlayerId> = self.game.players.iter().map(|p| p.id).collect();
        for seat in seats {
            self.game.turn.set_automated(seat, true);
        }
        self.game.turn.ui_accept = false;
        self.run_automated_turns()?;
        Ok(self.result())
    }

    /// Result so far; an unfinished game reads as a turn-limit draw
    pub fn result(&self) -> GameResult {
        let end_reason = self
            .game
            .end_reason()
            .copied()
            .unwrap_or(GameEndReason::TurnLimit);
        let result = GameResult {
            winner: self.game.winner(),
            turns_played: self.game.turn.turns_played,
            end_reason,
        };
        self.game.logger.event(
            VerbosityLevel::Minimal,
            "turn",
            &format!("{} after {} turns", result.end_reason, result.turns_played),
        );
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::event::IgnoreReason;
    use crate::game::ScriptedController;
    use crate::loader::{CardCatalog, GameInitializer};
    use std::sync::Arc;

    fn dealt_game(seed: u64) -> GameState {
        let catalog = Arc::new(CardCatalog::embedded().unwrap());
        GameInitializer::new(catalog)
            .init_game("Human", "Opponent", Some(seed))
            .unwrap()
    }

    #[test]
    fn test_end_reason_display() {
        let game = dealt_game(1);
        let p1 = game.human_id();
        assert_eq!(GameEndReason::TurnLimit.to_string(), "turn limit reached");
        assert!(GameEndReason::DeckExhausted(p1).to_string().contains("ran out of cards"));
    }

    #[test]
    fn test_end_turn_runs_opponent_turn() {
        let mut game = dealt_game(7);
        let (p1, p2) = (game.human_id(), game.opponent_id());
        let mut game_loop = GameLoop::new(&mut game);
        game_loop.handle_event(InputEvent::EndTurn).unwrap();

        assert_eq!(game.turn.current_player, p1);
        assert!(game.turn.ui_accept);
        assert_eq!(game.turn.turns_played, 2);
        assert_eq!(game.get_player(p2).unwrap().turn_number, 2);
        assert_eq!(game.get_player(p1).unwrap().mana, 3);
    }

    #[test]
    fn test_state_level_end_turn_leaves_opponent_pending() {
        let mut game = dealt_game(7);
        let p2 = game.opponent_id();
        game.handle_event(InputEvent::EndTurn, EventOrigin::Human).unwrap();
        assert_eq!(game.turn.current_player, p2);
        assert!(!game.turn.ui_accept);
        assert_eq!(game.turn.turns_played, 1);
    }

    #[test]
    fn test_apply_summon_action() {
        let mut game = dealt_game(3);
        let p1 = game.human_id();
        let card = game.get_player(p1).unwrap().hand.get(0).unwrap();
        // make sure the card is playable whatever it is
        game.set_mana(p1, 9).unwrap();
        let tile = game.card_targets(card, p1).unwrap().into_iter().next();
        let mut game_loop = GameLoop::new(&mut game);
        if let Some(tile) = tile {
            let outcome = game_loop
                .apply_action(p1, OpponentAction::Summon { card, tile })
                .unwrap();
            assert!(matches!(outcome, EventOutcome::CardPlayed(_)));
        }
        assert!(game.board.highlighted(crate::board::HighlightMode::Move).is_empty());
    }

    #[test]
    fn test_self_play_terminates() {
        let mut game = dealt_game(42);
        let result = GameLoop::new(&mut game)
            .with_verbosity(VerbosityLevel::Silent)
            .with_max_turns(60)
            .run_self_play()
            .unwrap();
        assert!(game.is_game_over());
        assert!(result.turns_played <= 60);
        if result.end_reason != GameEndReason::TurnLimit {
            assert!(result.winner.is_some());
        }
    }

    #[test]
    fn test_controller_concedes_when_script_runs_out() {
        let mut game = dealt_game(5);
        let p1 = game.human_id();
        let mut controller = ScriptedController::new(p1, vec![InputEvent::SelectTile { x: 1, y: 2 }]);
        let result = GameLoop::new(&mut game)
            .run_with_controller(&mut controller)
            .unwrap();
        assert_eq!(result.end_reason, GameEndReason::Conceded(p1));
        assert_eq!(result.winner, Some(game.opponent_id()));
        let outcome = game.handle_event(InputEvent::EndTurn, EventOrigin::Synthetic).unwrap();
        assert_eq!(outcome, EventOutcome::Ignored(IgnoreReason::GameOver));
    }
}
