//! Grid Duel - rules engine for a two-player tactics card game
//!
//! A 9x5 board, two avatars, a hand/deck card economy and unit combat with
//! movement, attacks and ability-driven exceptions. The engine consumes
//! click-equivalent events and emits render commands; an opponent heuristic
//! drives the second seat through the same event path.

pub mod board;
pub mod config;
pub mod core;
pub mod error;
pub mod game;
pub mod loader;
pub mod tournament;

pub use error::{DuelError, Result};
