//! Turn controller: event interpretation, selection and turn handover

use crate::board::{HighlightMode, Position};
use crate::core::{CardId, CardKind, PlayerId, SpellTarget, UnitId};
use crate::game::event::{EventOrigin, EventOutcome, IgnoreReason, InputEvent};
use crate::game::render::RenderCommand;
use crate::game::GameState;
use crate::Result;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// What the current player has selected
///
/// A card and a unit are never selected at the same time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Selection {
    #[default]
    None,
    /// `slot` is the 0-based hand index
    Card { card: CardId, slot: usize },
    Unit(UnitId),
}

/// Per-game turn and selection state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnContext {
    pub current_player: PlayerId,

    /// Human input is accepted only while set
    pub ui_accept: bool,

    pub selection: Selection,

    /// Seats driven by the opponent policy rather than by input
    automated: SmallVec<[PlayerId; 2]>,

    /// Completed turns, both seats counted
    pub turns_played: u32,
}

impl TurnContext {
    /// First seat moves first; the second seat is automated
    pub fn new(first: PlayerId, second: PlayerId) -> Self {
        let mut automated = SmallVec::new();
        automated.push(second);
        TurnContext {
            current_player: first,
            ui_accept: false,
            selection: Selection::None,
            automated,
            turns_played: 0,
        }
    }

    pub fn is_automated(&self, player: PlayerId) -> bool {
        self.automated.contains(&player)
    }

    pub fn set_automated(&mut self, player: PlayerId, automated: bool) {
        if automated {
            if !self.automated.contains(&player) {
                self.automated.push(player);
            }
        } else {
            self.automated.retain(|p| *p != player);
        }
    }
}

impl GameState {
    /// Process one inbound event to completion
    ///
    /// Human events are dropped while the UI gate is closed; synthetic ones
    /// always go through. Nothing is processed once the game is over.
    ///
    /// This only applies the rules. An `EndTurn` that hands over to an
    /// automated seat leaves that seat's turn waiting here, since no policy
    /// runs at this level. Transports feed events through
    /// [`GameLoop::handle_event`](crate::game::GameLoop::handle_event), which
    /// plays automated turns out before returning.
    pub fn handle_event(&mut self, event: InputEvent, origin: EventOrigin) -> Result<EventOutcome> {
        if self.is_game_over() {
            return Ok(EventOutcome::Ignored(IgnoreReason::GameOver));
        }
        if origin == EventOrigin::Human && !self.turn.ui_accept {
            return Ok(EventOutcome::Ignored(IgnoreReason::UiLocked));
        }

        match event {
            InputEvent::SelectCard { hand_position } => self.select_card(hand_position),
            InputEvent::SelectTile { x, y } => self.select_tile(Position::new(x, y)),
            InputEvent::EndTurn => {
                self.end_turn()?;
                Ok(EventOutcome::TurnEnded)
            }
            InputEvent::DeselectElsewhere => {
                self.deselect()?;
                Ok(EventOutcome::Deselected)
            }
        }
    }

    /// Select the card at 1-based `hand_position` and highlight where it can go
    fn select_card(&mut self, hand_position: usize) -> Result<EventOutcome> {
        let player = self.turn.current_player;
        let Some(slot) = hand_position.checked_sub(1) else {
            return Ok(EventOutcome::Ignored(IgnoreReason::EmptyHandSlot));
        };
        let Some(card) = self.get_player(player)?.hand.get(slot) else {
            return Ok(EventOutcome::Ignored(IgnoreReason::EmptyHandSlot));
        };

        self.deselect()?;
        self.turn.selection = Selection::Card { card, slot };
        if player == self.human_id() {
            self.render.push(RenderCommand::DrawCard {
                card,
                slot: hand_position,
                highlighted: true,
            });
        }

        let mode = match self.card(card)?.kind {
            CardKind::Spell(effect)
                if matches!(effect.target(), SpellTarget::EnemyUnit | SpellTarget::EnemyNonAvatar) =>
            {
                HighlightMode::Attack
            }
            _ => HighlightMode::Move,
        };
        let targets = self.card_targets(card, player)?;
        self.highlight_tiles(&targets, mode)?;
        log_event!(self, Verbose, "turn", "card {} selected, {} targets", card, targets.len());
        Ok(EventOutcome::CardSelected { card, slot })
    }

    fn select_tile(&mut self, pos: Position) -> Result<EventOutcome> {
        // bounds are checked before any selection changes
        self.board.tile(pos)?;
        let player = self.turn.current_player;

        match self.turn.selection {
            Selection::Card { slot, .. } => {
                let outcome = self.play_card(player, slot, pos)?;
                self.deselect()?;
                Ok(EventOutcome::CardPlayed(outcome))
            }
            Selection::Unit(unit) => {
                let outcome = self.resolve_unit_action(unit, pos)?;
                self.deselect()?;
                Ok(EventOutcome::UnitActed(outcome))
            }
            Selection::None => {
                let Some(occupant) = self.board.occupant(pos).filter(|o| o.owner == player) else {
                    return Ok(EventOutcome::Ignored(IgnoreReason::NothingToSelect));
                };
                let targets = self.unit_targets(occupant.unit)?;
                self.highlight_tiles(&targets.attacks, HighlightMode::Attack)?;
                self.highlight_tiles(&targets.moves, HighlightMode::Move)?;
                self.turn.selection = Selection::Unit(occupant.unit);
                Ok(EventOutcome::UnitSelected(occupant.unit))
            }
        }
    }

    /// Drop any selection and clear every highlight
    pub fn deselect(&mut self) -> Result<()> {
        if let Selection::Card { card, slot } = self.turn.selection {
            let player = self.turn.current_player;
            let still_held = self.get_player(player)?.hand.get(slot) == Some(card);
            if still_held && player == self.human_id() {
                self.render.push(RenderCommand::DrawCard {
                    card,
                    slot: slot + 1,
                    highlighted: false,
                });
            }
        }
        self.turn.selection = Selection::None;
        self.clear_highlights();
        Ok(())
    }

    /// End the current player's turn and start the other seat's
    ///
    /// The ending player loses unspent mana and draws a card; if that draw
    /// ends the game there is no handover.
    pub fn end_turn(&mut self) -> Result<()> {
        self.deselect()?;
        let player = self.turn.current_player;
        self.set_mana(player, 0)?;
        self.draw_card(player)?;
        self.get_player_mut(player)?.turn_number += 1;
        self.turn.turns_played += 1;
        self.turn.ui_accept = false;
        log_event!(self, Minimal, "turn", "{} ends turn {}", self.get_player(player)?.name, self.turn.turns_played);

        if self.is_game_over() {
            return Ok(());
        }
        self.turn.current_player = self.opponent_of(player)?;
        self.start_turn()
    }

    /// Begin the current player's turn: mana, unit refresh and the UI gate
    pub fn start_turn(&mut self) -> Result<()> {
        let player = self.turn.current_player;
        self.logger.set_turn(self.turn.turns_played + 1);
        let mana = self.get_player(player)?.mana_for_turn();
        self.set_mana(player, mana)?;
        for id in self.units_of(player) {
            self.units.get_mut(id)?.refresh_actions();
        }
        self.refresh_hand(player)?;

        if player == self.human_id() {
            self.notify("Your Turn");
        } else {
            self.notify("Opponent's Turn");
        }
        self.turn.ui_accept = !self.turn.is_automated(player);
        log_event!(self, Minimal, "turn", "{}'s turn, {} mana", self.get_player(player)?.name, mana);
        Ok(())
    }
}
