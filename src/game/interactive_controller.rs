//! Interactive text controller for a human player
//!
//! Reads commands line by line and turns them into input events:
//!
//! - `card N`     select hand slot N (1-based)
//! - `tile X Y`   click a tile
//! - `end`        end the turn
//! - `away`       click outside everything (clears the selection)
//! - `board`      print the board, hand and totals
//! - `quit`       concede

use crate::board::Position;
use crate::core::PlayerId;
use crate::game::controller::{GameStateView, PlayerController};
use crate::game::event::InputEvent;
use std::io::{self, BufRead, Write};

/// One parsed line of input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Event(InputEvent),
    Board,
    Help,
    Quit,
}

/// Parse a command line; the error is the message shown to the player
pub fn parse_command(line: &str) -> std::result::Result<Command, String> {
    let mut words = line.split_whitespace();
    let Some(verb) = words.next() else {
        return Err("empty command".to_string());
    };
    let mut number = |what: &str| -> std::result::Result<i64, String> {
        let word = words.next().ok_or_else(|| format!("missing {what}"))?;
        word.parse::<i64>().map_err(|_| format!("'{word}' is not a number"))
    };

    let command = match verb.to_ascii_lowercase().as_str() {
        "card" | "c" => {
            let slot = number("hand slot")?;
            if slot < 1 {
                return Err("hand slots start at 1".to_string());
            }
            Command::Event(InputEvent::SelectCard {
                hand_position: slot as usize,
            })
        }
        "tile" | "t" => {
            let x = number("x")?;
            let y = number("y")?;
            let (Ok(x), Ok(y)) = (i32::try_from(x), i32::try_from(y)) else {
                return Err("coordinate out of range".to_string());
            };
            Command::Event(InputEvent::SelectTile { x, y })
        }
        "end" | "e" => Command::Event(InputEvent::EndTurn),
        "away" | "a" => Command::Event(InputEvent::DeselectElsewhere),
        "board" | "b" => Command::Board,
        "help" | "?" => Command::Help,
        "quit" | "q" => Command::Quit,
        other => return Err(format!("unknown command '{other}'")),
    };
    Ok(command)
}

/// A controller that prompts a human player for events
pub struct InteractiveController {
    player_id: PlayerId,
    input: Box<dyn BufRead>,
    output: Box<dyn Write>,
}

impl InteractiveController {
    /// Controller reading stdin and writing stdout
    pub fn new(player_id: PlayerId) -> Self {
        InteractiveController::with_io(
            player_id,
            Box::new(io::BufReader::new(io::stdin())),
            Box::new(io::stdout()),
        )
    }

    pub fn with_io(player_id: PlayerId, input: Box<dyn BufRead>, output: Box<dyn Write>) -> Self {
        InteractiveController {
            player_id,
            input,
            output,
        }
    }

    fn say(&mut self, text: &str) {
        // a closed output must not stop the game
        let _ = writeln!(self.output, "{text}");
    }

    fn display_help(&mut self) {
        self.say("commands: card N | tile X Y | end | away | board | quit");
    }
}

impl PlayerController for InteractiveController {
    fn player_id(&self) -> PlayerId {
        self.player_id
    }

    fn next_event(&mut self, view: &GameStateView) -> Option<InputEvent> {
        loop {
            let _ = write!(self.output, "> ");
            let _ = self.output.flush();

            let mut line = String::new();
            match self.input.read_line(&mut line) {
                // end of input concedes
                Ok(0) => return None,
                Ok(_) => {}
                Err(err) => {
                    self.say(&format!("error reading input: {err}"));
                    return None;
                }
            }
            if line.trim().is_empty() {
                continue;
            }

            match parse_command(&line) {
                Ok(Command::Event(InputEvent::SelectTile { x, y }))
                    if !view.board().in_bounds(Position::new(x, y)) =>
                {
                    self.say(&format!("({x}, {y}) is off the board"));
                }
                Ok(Command::Event(event)) => return Some(event),
                Ok(Command::Board) => {
                    let text = view.render_board();
                    self.say(text.trim_end());
                }
                Ok(Command::Help) => self.display_help(),
                Ok(Command::Quit) => return None,
                Err(message) => {
                    self.say(&message);
                    self.display_help();
                }
            }
        }
    }

    fn on_game_end(&mut self, _view: &GameStateView, won: bool) {
        if won {
            self.say("You win!");
        } else {
            self.say("You lose.");
        }
    }
}
