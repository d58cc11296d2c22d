//! Self-play tournament runner
//!
//! Plays many policy-vs-policy games in parallel with rayon and reports
//! seat win rates, draws and how games ended.

use crate::core::PlayerId;
use crate::game::{GameEndReason, GameLoop, GameResult, VerbosityLevel};
use crate::loader::{CardCatalog, GameInitializer};
use crate::Result;
use rayon::prelude::*;
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;

/// Aggregated results of a tournament
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TournamentStats {
    pub games: usize,
    pub p1_wins: usize,
    pub p2_wins: usize,
    pub draws: usize,
    /// Games that stopped with an engine error
    pub failed: usize,
    pub total_turns: u64,
    pub avatar_kills: usize,
    pub deck_outs: usize,
    pub turn_limits: usize,
}

impl TournamentStats {
    fn record(&mut self, result: &GameResult, first_seat: PlayerId) {
        self.games += 1;
        self.total_turns += u64::from(result.turns_played);
        match result.winner {
            Some(winner) if winner == first_seat => self.p1_wins += 1,
            Some(_) => self.p2_wins += 1,
            None => self.draws += 1,
        }
        match result.end_reason {
            GameEndReason::AvatarDestroyed(_) => self.avatar_kills += 1,
            GameEndReason::DeckExhausted(_) => self.deck_outs += 1,
            GameEndReason::TurnLimit => self.turn_limits += 1,
            GameEndReason::Conceded(_) => {}
        }
    }

    fn merge(mut self, other: TournamentStats) -> TournamentStats {
        self.games += other.games;
        self.p1_wins += other.p1_wins;
        self.p2_wins += other.p2_wins;
        self.draws += other.draws;
        self.failed += other.failed;
        self.total_turns += other.total_turns;
        self.avatar_kills += other.avatar_kills;
        self.deck_outs += other.deck_outs;
        self.turn_limits += other.turn_limits;
        self
    }

    pub fn average_turns(&self) -> f64 {
        if self.games == 0 {
            0.0
        } else {
            self.total_turns as f64 / self.games as f64
        }
    }

    /// Print the summary table
    pub fn print_summary(&self) {
        let pct = |n: usize| {
            if self.games == 0 {
                0.0
            } else {
                100.0 * n as f64 / self.games as f64
            }
        };
        println!("=== Player Position Statistics ===");
        println!("P1 wins: {} ({:.1}%)", self.p1_wins, pct(self.p1_wins));
        println!("P2 wins: {} ({:.1}%)", self.p2_wins, pct(self.p2_wins));
        println!("Draws: {} ({:.1}%)", self.draws, pct(self.draws));
        println!("\n=== End Reasons ===");
        println!("  Avatar destroyed: {}", self.avatar_kills);
        println!("  Deck exhausted: {}", self.deck_outs);
        println!("  Turn limit: {}", self.turn_limits);
        println!("\nAverage turns per game: {:.1}", self.average_turns());
        if self.failed > 0 {
            println!("Failed games: {}", self.failed);
        }
    }
}

/// Play one seeded self-play game
pub fn play_one(catalog: &Arc<CardCatalog>, seed: u64, max_turns: u32) -> Result<(GameResult, PlayerId)> {
    let mut game = GameInitializer::new(Arc::clone(catalog))
        .with_verbosity(VerbosityLevel::Silent)
        .init_game("Player 1", "Player 2", Some(seed))?;
    game.render.set_enabled(false);
    let first_seat = game.human_id();
    let result = GameLoop::new(&mut game)
        .with_verbosity(VerbosityLevel::Silent)
        .with_max_turns(max_turns)
        .run_self_play()?;
    Ok((result, first_seat))
}

/// Run `games` self-play games, game `i` shuffled with `seed + i`
pub fn run_tourney(catalog: Arc<CardCatalog>, games: usize, seed: u64, max_turns: u32) -> TournamentStats {
    (0..games)
        .into_par_iter()
        .map(|game_idx| {
            let mut stats = TournamentStats::default();
            match play_one(&catalog, seed.wrapping_add(game_idx as u64), max_turns) {
                Ok((result, first_seat)) => stats.record(&result, first_seat),
                Err(e) => {
                    eprintln!("Warning: Game {game_idx} failed: {e}");
                    stats.failed += 1;
                }
            }
            stats
        })
        .reduce(TournamentStats::default, TournamentStats::merge)
}

/// Run a tournament and print timing plus the summary
pub fn run_and_report(catalog: Arc<CardCatalog>, games: usize, seed: u64, max_turns: u32) -> TournamentStats {
    println!("Running {games} games (seed {seed}, turn limit {max_turns})\n");
    let start_time = Instant::now();
    let stats = run_tourney(catalog, games, seed, max_turns);
    let elapsed = start_time.elapsed();

    println!("=== Tournament Complete ===");
    println!("Total games played: {}", stats.games);
    println!("Elapsed time: {:.2}s", elapsed.as_secs_f64());
    if elapsed.as_secs_f64() > 0.0 {
        println!("Games per second: {:.2}\n", stats.games as f64 / elapsed.as_secs_f64());
    }
    stats.print_summary();
    stats
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tourney_counts_every_game() {
        let catalog = Arc::new(CardCatalog::embedded().unwrap());
        let stats = run_tourney(catalog, 6, 11, 60);
        assert_eq!(stats.games + stats.failed, 6);
        assert_eq!(stats.failed, 0);
        assert_eq!(stats.p1_wins + stats.p2_wins + stats.draws, 6);
        assert_eq!(stats.avatar_kills + stats.deck_outs + stats.turn_limits, 6);
        assert!(stats.average_turns() > 0.0);
    }

    #[test]
    fn test_tourney_is_deterministic() {
        let catalog = Arc::new(CardCatalog::embedded().unwrap());
        let first = run_tourney(Arc::clone(&catalog), 4, 3, 60);
        let second = run_tourney(catalog, 4, 3, 60);
        assert_eq!(first, second);
    }

    #[test]
    fn test_record_tallies_seats() {
        let mut stats = TournamentStats::default();
        let p1 = PlayerId::new(1);
        let p2 = PlayerId::new(2);
        stats.record(
            &GameResult {
                winner: Some(p1),
                turns_played: 10,
                end_reason: GameEndReason::AvatarDestroyed(p2),
            },
            p1,
        );
        stats.record(
            &GameResult {
                winner: None,
                turns_played: 30,
                end_reason: GameEndReason::TurnLimit,
            },
            p1,
        );
        assert_eq!(stats.p1_wins, 1);
        assert_eq!(stats.draws, 1);
        assert_eq!(stats.turn_limits, 1);
        assert_eq!(stats.average_turns(), 20.0);
    }
}
