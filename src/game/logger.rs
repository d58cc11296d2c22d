//! Game event logger
//!
//! Every line carries the turn it happened on and a category naming the
//! subsystem that produced it ("turn", "combat", "card", "policy",
//! "catalog"). Lines are assembled in a bump arena; an owned `String` is
//! only made for lines that are printed or captured.

use crate::game::VerbosityLevel;
use bumpalo::collections::String as BumpString;
use bumpalo::Bump;
use serde::{Deserialize, Serialize};
use std::cell::{Cell, Ref, RefCell};
use std::fmt::Write as FmtWrite;
use std::ops::Deref;

/// Line format for printed entries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    /// One JSON object per line
    Json,
}

/// Where entries go
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum OutputMode {
    #[default]
    Stdout,
    /// Kept in memory only, regardless of verbosity
    Memory,
    Both,
}

/// One logged game event
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogEntry {
    /// Turn number the event happened on (1 is the first turn)
    pub turn: u32,
    pub level: VerbosityLevel,
    pub category: String,
    pub message: String,
}

/// Borrow of the captured entries; derefs to `[LogEntry]`
pub struct LogGuard<'a> {
    guard: Ref<'a, Vec<LogEntry>>,
}

impl<'a> LogGuard<'a> {
    /// Entries of one category, in order
    pub fn in_category<'s>(&'s self, category: &'s str) -> impl Iterator<Item = &'s LogEntry> + 's {
        self.guard.iter().filter(move |e| e.category == category)
    }
}

impl<'a> Deref for LogGuard<'a> {
    type Target = [LogEntry];

    fn deref(&self) -> &Self::Target {
        &self.guard
    }
}

const SCRATCH_RESET_BYTES: usize = 64 * 1024;

/// Logger owned by `GameState`
pub struct GameLogger {
    verbosity: VerbosityLevel,
    format: OutputFormat,
    mode: OutputMode,

    /// Printed categories; everything when empty
    categories: Vec<String>,

    turn: Cell<u32>,

    scratch: RefCell<Bump>,
    captured: RefCell<Vec<LogEntry>>,
}

impl GameLogger {
    /// Normal verbosity, printing to stdout
    pub fn new() -> Self {
        Self::with_verbosity(VerbosityLevel::default())
    }

    pub fn with_verbosity(verbosity: VerbosityLevel) -> Self {
        GameLogger {
            verbosity,
            format: OutputFormat::default(),
            mode: OutputMode::default(),
            categories: Vec::new(),
            turn: Cell::new(1),
            scratch: RefCell::new(Bump::new()),
            captured: RefCell::new(Vec::new()),
        }
    }

    pub fn verbosity(&self) -> VerbosityLevel {
        self.verbosity
    }

    pub fn set_verbosity(&mut self, verbosity: VerbosityLevel) {
        self.verbosity = verbosity;
    }

    pub fn set_output_format(&mut self, format: OutputFormat) {
        self.format = format;
    }

    pub fn set_output_mode(&mut self, mode: OutputMode) {
        self.mode = mode;
    }

    /// Keep entries in memory instead of printing them (tests)
    pub fn enable_capture(&mut self) {
        self.mode = OutputMode::Memory;
    }

    pub fn is_capturing(&self) -> bool {
        matches!(self.mode, OutputMode::Memory | OutputMode::Both)
    }

    /// Print only these categories; an empty list prints all of them
    pub fn set_categories(&mut self, categories: Vec<String>) {
        self.categories = categories;
    }

    /// Turn number stamped on subsequent entries
    pub fn set_turn(&self, turn: u32) {
        self.turn.set(turn);
    }

    pub fn logs(&self) -> LogGuard<'_> {
        LogGuard {
            guard: self.captured.borrow(),
        }
    }

    pub fn clear_logs(&mut self) {
        self.captured.borrow_mut().clear();
        self.scratch.borrow_mut().reset();
    }

    fn prints(&self, level: VerbosityLevel, category: &str) -> bool {
        matches!(self.mode, OutputMode::Stdout | OutputMode::Both)
            && level <= self.verbosity
            && (self.categories.is_empty() || self.categories.iter().any(|c| c == category))
    }

    fn print(&self, entry: &LogEntry, line: &str) {
        match self.format {
            OutputFormat::Json => match serde_json::to_string(entry) {
                Ok(json) => println!("{json}"),
                Err(_) => println!("{line}"),
            },
            OutputFormat::Text => println!("{line}"),
        }
    }

    /// Log one event
    ///
    /// Silent-level events are dropped. Captured entries are kept whatever
    /// the verbosity, so tests can inspect Verbose detail.
    pub fn event(&self, level: VerbosityLevel, category: &str, message: &str) {
        if level == VerbosityLevel::Silent {
            return;
        }
        let print = self.prints(level, category);
        let capture = self.is_capturing();
        if !print && !capture {
            return;
        }

        let turn = self.turn.get();
        let mut scratch = self.scratch.borrow_mut();
        if scratch.allocated_bytes() > SCRATCH_RESET_BYTES {
            scratch.reset();
        }
        let mut line = BumpString::new_in(&scratch);
        if level > VerbosityLevel::Minimal {
            line.push_str("  ");
        }
        let _ = write!(line, "T{turn} [{category}] {message}");

        let entry = LogEntry {
            turn,
            level,
            category: category.to_owned(),
            message: message.to_owned(),
        };
        if print {
            self.print(&entry, line.as_str());
        }
        if capture {
            self.captured.borrow_mut().push(entry);
        }
    }
}

impl Default for GameLogger {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for GameLogger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameLogger")
            .field("verbosity", &self.verbosity)
            .field("mode", &self.mode)
            .field("turn", &self.turn.get())
            .field("captured", &self.captured.borrow().len())
            .finish()
    }
}

/// Clones share settings but start with an empty capture
impl Clone for GameLogger {
    fn clone(&self) -> Self {
        GameLogger {
            verbosity: self.verbosity,
            format: self.format,
            mode: self.mode,
            categories: self.categories.clone(),
            turn: Cell::new(self.turn.get()),
            scratch: RefCell::new(Bump::new()),
            captured: RefCell::new(Vec::new()),
        }
    }
}
