//! Game state, rule resolution and turn structure

/// Log through the game's logger; compiles to nothing without
/// the `verbose-logging` feature so no `format!` happens on hot paths.
macro_rules! log_event {
    ($game:expr, $level:ident, $cat:expr, $($arg:tt)*) => {
        #[cfg(feature = "verbose-logging")]
        {
            $game.logger.event(
                $crate::game::VerbosityLevel::$level,
                $cat,
                &format!($($arg)*),
            );
        }
        #[cfg(not(feature = "verbose-logging"))]
        {
            let _ = &$game;
        }
    };
}

pub mod actions;
pub mod combat;
pub mod controller;
pub mod event;
pub mod game_loop;
pub mod heuristic_controller;
pub mod interactive_controller;
pub mod logger;
pub mod render;
pub mod scripted_controller;
pub mod state;
pub mod targeting;
pub mod turn;

pub use controller::{GameStateView, PlayerController};
pub use event::{ActionOutcome, CardOutcome, EventOrigin, EventOutcome, IgnoreReason, InputEvent, Rejection};
pub use game_loop::{GameEndReason, GameLoop, GameResult, VerbosityLevel};
pub use heuristic_controller::{HeuristicController, OpponentAction};
pub use interactive_controller::InteractiveController;
pub use logger::{GameLogger, LogEntry, OutputFormat, OutputMode};
pub use render::{RenderCommand, RenderLog, UnitAnimation};
pub use scripted_controller::ScriptedController;
pub use state::{DrawOutcome, GameState};
pub use targeting::UnitTargets;
pub use turn::{Selection, TurnContext};
