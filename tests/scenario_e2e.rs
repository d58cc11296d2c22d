//! End-to-end scenarios driven through the event interface
//!
//! Each test builds a small board by hand, feeds click-equivalent events
//! and checks the resulting state and render commands.

use grid_duel::board::{HighlightMode, Position};
use grid_duel::core::{CardId, PlayerId, Unit, UnitId};
use grid_duel::game::event::{ActionOutcome, CardOutcome, EventOrigin, EventOutcome, IgnoreReason, Rejection};
use grid_duel::game::{DrawOutcome, GameEndReason, GameLoop, GameState, InputEvent, RenderCommand, UnitAnimation};
use grid_duel::loader::{CardCatalog, GameInitializer};
use similar_asserts::assert_eq;
use std::sync::Arc;

fn new_game() -> GameState {
    let catalog = Arc::new(CardCatalog::embedded().unwrap());
    let mut game = GameState::new_two_player("Human", "Opponent", catalog).unwrap();
    game.start_turn().unwrap();
    game.render.drain();
    game
}

/// Place a ready-to-act unit straight onto the board
fn spawn(game: &mut GameState, owner: PlayerId, name: &str, x: i32, y: i32) -> UnitId {
    let def = game.catalog.get_card(name).unwrap().clone();
    let (attack, health) = match def.kind {
        grid_duel::core::CardKind::Unit { attack, health } => (attack, health),
        grid_duel::core::CardKind::Spell(_) => panic!("{name} is not a unit"),
    };
    let id = game.next_id();
    let mut unit = Unit::new(id, name, owner, attack, health, def.abilities);
    unit.refresh_actions();
    game.add_unit(unit, Position::new(x, y)).unwrap()
}

fn give(game: &mut GameState, player: PlayerId, name: &str) -> CardId {
    let id = game.next_id();
    let card = game.catalog.get_card(name).unwrap().instantiate(id, player);
    game.cards.insert(id, card);
    game.get_player_mut(player).unwrap().hand.add(id).unwrap();
    id
}

/// Add cards to the bottom of a player's deck
fn stock_deck(game: &mut GameState, player: PlayerId, name: &str, count: usize) -> Vec<CardId> {
    (0..count)
        .map(|_| {
            let id = game.next_id();
            let card = game.catalog.get_card(name).unwrap().instantiate(id, player);
            game.cards.insert(id, card);
            game.get_player_mut(player).unwrap().deck.push(id);
            id
        })
        .collect()
}

fn click(game: &mut GameState, x: i32, y: i32) -> EventOutcome {
    game.handle_event(InputEvent::SelectTile { x, y }, EventOrigin::Human)
        .unwrap()
}

fn select_card(game: &mut GameState, hand_position: usize) -> EventOutcome {
    game.handle_event(InputEvent::SelectCard { hand_position }, EventOrigin::Human)
        .unwrap()
}

fn health(game: &GameState, id: UnitId) -> i32 {
    game.unit(id).unwrap().health()
}

#[test]
fn test_move_then_second_move_is_refused() {
    let mut game = new_game();
    let avatar = game.get_player(game.human_id()).unwrap().avatar;

    click(&mut game, 1, 2);
    let outcome = click(&mut game, 3, 2);
    assert_eq!(
        outcome,
        EventOutcome::UnitActed(ActionOutcome::Moved {
            from: Position::new(1, 2),
            to: Position::new(3, 2),
        })
    );
    assert!(game
        .render
        .commands()
        .contains(&RenderCommand::MoveUnitToTile {
            unit: avatar,
            position: Position::new(3, 2),
        }));

    // reselecting offers no moves; the empty tile click is refused
    click(&mut game, 3, 2);
    assert!(game.board.highlighted(HighlightMode::Move).is_empty());
    let outcome = click(&mut game, 4, 2);
    assert_eq!(outcome, EventOutcome::UnitActed(ActionOutcome::Rejected(Rejection::NotAllowed)));
    assert_eq!(game.position_of(avatar).unwrap(), Position::new(3, 2));
}

#[test]
fn test_move_and_attack_kills_without_counter() {
    let mut game = new_game();
    let (human, opponent) = (game.human_id(), game.opponent_id());
    let charger = spawn(&mut game, human, "Comodo Charger", 3, 2);
    let scout = spawn(&mut game, opponent, "Planar Scout", 5, 2);

    click(&mut game, 3, 2);
    assert_eq!(game.board.highlighted(HighlightMode::Attack), vec![Position::new(5, 2)]);
    let outcome = click(&mut game, 5, 2);

    assert_eq!(
        outcome,
        EventOutcome::UnitActed(ActionOutcome::MovedAndAttacked {
            to: Position::new(4, 2),
            target: Position::new(5, 2),
            countered: false,
        })
    );
    assert!(game.board.unit_at(Position::new(5, 2)).is_none());
    assert!(game.render.commands().contains(&RenderCommand::DeleteUnit { unit: scout }));
    assert_eq!(health(&game, charger), 3);
    assert!(game.unit(charger).unwrap().is_exhausted());
}

#[test]
fn test_adjacent_attack_takes_counter() {
    let mut game = new_game();
    let (human, opponent) = (game.human_id(), game.opponent_id());
    let lion = spawn(&mut game, human, "Azurite Lion", 4, 2);
    let charger = spawn(&mut game, opponent, "Comodo Charger", 5, 2);

    click(&mut game, 4, 2);
    let outcome = click(&mut game, 5, 2);
    assert_eq!(
        outcome,
        EventOutcome::UnitActed(ActionOutcome::Attacked {
            target: Position::new(5, 2),
            countered: true,
        })
    );
    assert_eq!(health(&game, charger), 1);
    assert_eq!(health(&game, lion), 2);

    // attack-twice: the second strike finishes the charger
    click(&mut game, 4, 2);
    let outcome = click(&mut game, 5, 2);
    assert_eq!(
        outcome,
        EventOutcome::UnitActed(ActionOutcome::Attacked {
            target: Position::new(5, 2),
            countered: false,
        })
    );
    assert!(game.unit(charger).is_err());
    assert!(game.unit(lion).unwrap().is_exhausted());
}

#[test]
fn test_ranged_attack_across_the_board() {
    let mut game = new_game();
    let (human, opponent) = (game.human_id(), game.opponent_id());
    let spitter = spawn(&mut game, human, "Fire Spitter", 2, 0);
    let golem = spawn(&mut game, opponent, "Hailstone Golem", 6, 4);

    click(&mut game, 2, 0);
    let mut attacks = game.board.highlighted(HighlightMode::Attack);
    attacks.sort_by_key(|p| (p.x, p.y));
    assert_eq!(attacks, vec![Position::new(6, 4), Position::new(7, 2)]);

    let outcome = click(&mut game, 6, 4);
    assert_eq!(
        outcome,
        EventOutcome::UnitActed(ActionOutcome::Attacked {
            target: Position::new(6, 4),
            countered: false,
        })
    );
    assert_eq!(health(&game, golem), 3);
    assert_eq!(health(&game, spitter), 2);
    assert!(game.render.commands().contains(&RenderCommand::PlayProjectileAnimation {
        from: Position::new(2, 0),
        to: Position::new(6, 4),
    }));
    assert_eq!(game.position_of(spitter).unwrap(), Position::new(2, 0));
}

#[test]
fn test_provoke_pins_the_unit() {
    let mut game = new_game();
    let (human, opponent) = (game.human_id(), game.opponent_id());
    spawn(&mut game, human, "Comodo Charger", 4, 2);
    spawn(&mut game, opponent, "Rock Pulveriser", 5, 2);
    spawn(&mut game, opponent, "Planar Scout", 3, 1);

    click(&mut game, 4, 2);
    assert!(game.board.highlighted(HighlightMode::Move).is_empty());
    assert_eq!(game.board.highlighted(HighlightMode::Attack), vec![Position::new(5, 2)]);

    let outcome = click(&mut game, 3, 1);
    assert_eq!(outcome, EventOutcome::UnitActed(ActionOutcome::Rejected(Rejection::NotAllowed)));
}

#[test]
fn test_spell_costs_mana_only_when_cast() {
    let mut game = new_game();
    let (human, opponent) = (game.human_id(), game.opponent_id());
    let target = spawn(&mut game, opponent, "Comodo Charger", 5, 2);
    give(&mut game, human, "Truestrike");

    select_card(&mut game, 1);
    assert_eq!(game.board.highlighted(HighlightMode::Attack).len(), 2);

    // empty tile: not highlighted, nothing spent
    let outcome = click(&mut game, 4, 4);
    assert_eq!(outcome, EventOutcome::CardPlayed(CardOutcome::Rejected(Rejection::InvalidTile)));
    assert!(game.render.notifications().any(|n| n == "Invalid Tile"));
    assert_eq!(game.get_player(human).unwrap().mana, 2);
    assert_eq!(game.get_player(human).unwrap().hand.len(), 1);

    select_card(&mut game, 1);
    let outcome = click(&mut game, 5, 2);
    assert!(matches!(outcome, EventOutcome::CardPlayed(CardOutcome::Cast { .. })));
    assert_eq!(health(&game, target), 1);
    assert_eq!(game.get_player(human).unwrap().mana, 1);
    assert!(game.get_player(human).unwrap().hand.is_empty());
    assert!(game.board.highlighted(HighlightMode::Attack).is_empty());
}

#[test]
fn test_unaffordable_summon_is_refused() {
    let mut game = new_game();
    let human = game.human_id();
    let golem = give(&mut game, human, "Hailstone Golem");

    select_card(&mut game, 1);
    let outcome = click(&mut game, 2, 2);
    assert_eq!(outcome, EventOutcome::CardPlayed(CardOutcome::Rejected(Rejection::NotEnoughMana)));
    assert!(game.render.notifications().any(|n| n == "Not Enough Mana"));
    assert_eq!(game.get_player(human).unwrap().hand.get(0), Some(golem));
    assert!(game.board.unit_at(Position::new(2, 2)).is_none());
}

#[test]
fn test_unaffordable_spell_keeps_mana_and_card() {
    let mut game = new_game();
    let (human, opponent) = (game.human_id(), game.opponent_id());
    let target = spawn(&mut game, opponent, "Comodo Charger", 5, 2);
    let decay = give(&mut game, human, "Entropic Decay");

    select_card(&mut game, 1);
    let outcome = click(&mut game, 5, 2);
    assert_eq!(outcome, EventOutcome::CardPlayed(CardOutcome::Rejected(Rejection::NotEnoughMana)));
    assert!(game.render.notifications().any(|n| n == "Not Enough Mana"));

    let player = game.get_player(human).unwrap();
    assert_eq!(player.mana, 2);
    assert_eq!(player.hand.len(), 1);
    assert_eq!(player.hand.get(0), Some(decay));
    assert_eq!(health(&game, target), 3);
    assert!(game.board.highlighted(HighlightMode::Attack).is_empty());
}

#[test]
fn test_draw_on_death_refills_the_owner() {
    let mut game = new_game();
    let (human, opponent) = (game.human_id(), game.opponent_id());
    let shrike = spawn(&mut game, opponent, "WindShrike", 5, 2);
    spawn(&mut game, human, "Serpenti", 4, 2);
    let replacement = stock_deck(&mut game, opponent, "Comodo Charger", 1)[0];
    let hand_before = game.get_player(opponent).unwrap().hand.len();

    click(&mut game, 4, 2);
    let outcome = click(&mut game, 5, 2);
    assert_eq!(
        outcome,
        EventOutcome::UnitActed(ActionOutcome::Attacked {
            target: Position::new(5, 2),
            countered: false,
        })
    );
    assert!(game.unit(shrike).is_err());
    assert!(game.board.unit_at(Position::new(5, 2)).is_none());

    let owner = game.get_player(opponent).unwrap();
    assert_eq!(owner.hand.len(), hand_before + 1);
    assert!(owner.hand.as_slice().contains(&replacement));
    assert!(owner.deck.is_empty());
    // the opponent's new card stays off screen
    assert!(!game
        .render
        .commands()
        .iter()
        .any(|c| matches!(c, RenderCommand::DrawCard { card, .. } if *card == replacement)));
}

#[test]
fn test_full_hand_burns_the_draw() {
    let mut game = new_game();
    let human = game.human_id();
    for _ in 0..6 {
        give(&mut game, human, "Comodo Charger");
    }
    let burned = stock_deck(&mut game, human, "Truestrike", 1)[0];

    let outcome = game.draw_card(human).unwrap();
    assert_eq!(outcome, DrawOutcome::Burned(burned));
    let player = game.get_player(human).unwrap();
    assert_eq!(player.hand.len(), 6);
    assert!(!player.hand.as_slice().contains(&burned));
    assert!(player.deck.is_empty());
    assert!(game.render.notifications().any(|n| n == "Hand Full"));
    assert!(!game.is_game_over());
}

#[test]
fn test_summoned_unit_waits_a_turn() {
    let mut game = new_game();
    let human = game.human_id();
    give(&mut game, human, "Comodo Charger");

    select_card(&mut game, 1);
    let outcome = click(&mut game, 2, 1);
    let EventOutcome::CardPlayed(CardOutcome::Summoned(unit)) = outcome else {
        panic!("expected a summon, got {outcome:?}");
    };
    assert!(game.render.commands().contains(&RenderCommand::PlayUnitAnimation {
        unit,
        animation: UnitAnimation::Channel,
    }));
    assert!(game.unit(unit).unwrap().is_exhausted());
    assert_eq!(game.get_player(human).unwrap().mana, 1);

    click(&mut game, 2, 1);
    assert!(game.board.highlighted(HighlightMode::Move).is_empty());
    assert!(game.board.highlighted(HighlightMode::Attack).is_empty());
}

#[test]
fn test_highlighting_is_idempotent() {
    let mut game = new_game();
    let tiles = [Position::new(0, 0), Position::new(4, 4)];
    game.highlight_tiles(&tiles, HighlightMode::Move).unwrap();
    assert_eq!(game.render.drain().len(), 2);

    game.highlight_tiles(&tiles, HighlightMode::Move).unwrap();
    assert!(game.render.is_empty());

    game.clear_highlights();
    assert_eq!(game.render.drain().len(), 2);
    game.clear_highlights();
    assert!(game.render.is_empty());
}

#[test]
fn test_deck_exhaustion_ends_the_game() {
    let mut game = new_game();
    let (human, opponent) = (game.human_id(), game.opponent_id());

    let outcome = game.handle_event(InputEvent::EndTurn, EventOrigin::Human).unwrap();
    assert_eq!(outcome, EventOutcome::TurnEnded);
    assert_eq!(game.end_reason(), Some(&GameEndReason::DeckExhausted(human)));
    assert_eq!(game.winner(), Some(opponent));
    assert_eq!(game.turn.current_player, human);

    let outcome = game
        .handle_event(InputEvent::SelectTile { x: 1, y: 2 }, EventOrigin::Synthetic)
        .unwrap();
    assert_eq!(outcome, EventOutcome::Ignored(IgnoreReason::GameOver));
}

#[test]
fn test_killing_the_avatar_wins() {
    let mut game = new_game();
    let (human, opponent) = (game.human_id(), game.opponent_id());
    let avatar = game.get_player(opponent).unwrap().avatar;
    game.set_unit_health(avatar, 1).unwrap();
    spawn(&mut game, human, "Comodo Charger", 6, 2);

    click(&mut game, 6, 2);
    click(&mut game, 7, 2);

    assert_eq!(game.end_reason(), Some(&GameEndReason::AvatarDestroyed(opponent)));
    assert_eq!(game.winner(), Some(human));
    assert_eq!(game.get_player(opponent).unwrap().health, 0);
    assert!(!game.turn.ui_accept);
}

#[test]
fn test_opponent_turn_keeps_its_hand_off_screen() {
    let catalog = Arc::new(CardCatalog::embedded().unwrap());
    let mut game = GameInitializer::new(catalog)
        .init_game("Human", "Opponent", Some(17))
        .unwrap();
    let (human, opponent) = (game.human_id(), game.opponent_id());
    game.render.drain();

    GameLoop::new(&mut game).handle_event(InputEvent::EndTurn).unwrap();

    assert_eq!(game.turn.current_player, human);
    assert!(game.turn.ui_accept);
    assert_eq!(game.get_player(opponent).unwrap().turn_number, 2);
    let notices: Vec<&str> = game.render.notifications().collect();
    assert!(notices.contains(&"Opponent's Turn"));
    assert_eq!(notices.last(), Some(&"Your Turn"));

    for command in game.render.commands() {
        if let RenderCommand::DrawCard { card, .. } = command {
            assert_eq!(game.card(*card).unwrap().owner, human);
        }
    }
}
