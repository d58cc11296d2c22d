//! Grid Duel - Main Binary
//!
//! Text front end for the rules engine: play against the opponent policy,
//! watch a self-play game, run a self-play tournament or list the catalog.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use grid_duel::{
    config::GameConfig,
    core::CardKind,
    game::{GameLogger, GameLoop, InteractiveController, OutputFormat, VerbosityLevel},
    loader::{CardCatalog, GameInitializer},
    tournament,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Verbosity level for game output (custom parser supporting both names and numbers)
#[derive(Debug, Clone, Copy)]
struct VerbosityArg(VerbosityLevel);

impl std::str::FromStr for VerbosityArg {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "silent" | "0" => Ok(VerbosityArg(VerbosityLevel::Silent)),
            "minimal" | "1" => Ok(VerbosityArg(VerbosityLevel::Minimal)),
            "normal" | "2" => Ok(VerbosityArg(VerbosityLevel::Normal)),
            "verbose" | "3" => Ok(VerbosityArg(VerbosityLevel::Verbose)),
            _ => Err(format!(
                "invalid verbosity level '{s}' (expected: silent/0, minimal/1, normal/2, verbose/3)"
            )),
        }
    }
}

impl From<VerbosityArg> for VerbosityLevel {
    fn from(arg: VerbosityArg) -> Self {
        arg.0
    }
}

/// Log line format
#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

#[derive(Parser)]
#[command(name = "duel")]
#[command(about = "Grid Duel - two-player grid tactics card game", long_about = None)]
struct Cli {
    /// Session config file (JSON); flags override its values
    #[arg(long, global = true, value_name = "CONFIG_FILE")]
    config: Option<PathBuf>,

    /// Alternative card catalog (JSON)
    #[arg(long, global = true, value_name = "CATALOG_FILE")]
    catalog: Option<PathBuf>,

    /// Verbosity level for game output (0=silent, 1=minimal, 2=normal, 3=verbose)
    #[arg(long, short = 'v', global = true)]
    verbosity: Option<VerbosityArg>,

    /// Log line format
    #[arg(long, value_enum, global = true, default_value = "text")]
    log_format: LogFormat,

    /// Print only these log categories (turn, combat, card, policy, catalog)
    #[arg(long, global = true, value_delimiter = ',')]
    log_category: Vec<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play against the opponent policy from the terminal
    Play {
        /// Shuffle seed (decks are dealt in catalog order without one)
        #[arg(long)]
        seed: Option<u64>,

        /// Player name
        #[arg(long, default_value = "Player")]
        name: String,

        /// Maximum turns before the game is called a draw
        #[arg(long)]
        max_turns: Option<u32>,
    },

    /// Watch one policy-vs-policy game
    Simulate {
        #[arg(long)]
        seed: Option<u64>,

        #[arg(long)]
        max_turns: Option<u32>,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Run many self-play games in parallel and report win rates
    Tourney {
        /// Number of games to run
        #[arg(long, short = 'g', default_value_t = 100)]
        games: usize,

        /// Base seed; game i uses seed + i
        #[arg(long, default_value_t = 42)]
        seed: u64,

        #[arg(long)]
        max_turns: Option<u32>,
    },

    /// List the cards and deck lists in the catalog
    Catalog,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => GameConfig::load_from_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => GameConfig::default(),
    };
    if let Some(v) = cli.verbosity {
        config.verbosity = v.into();
    }
    if cli.catalog.is_some() {
        config.catalog = cli.catalog.clone();
    }
    let catalog = Arc::new(load_catalog(config.catalog.as_deref())?);
    let log = LogOptions {
        format: match cli.log_format {
            LogFormat::Text => OutputFormat::Text,
            LogFormat::Json => OutputFormat::Json,
        },
        categories: cli.log_category,
    };

    match cli.command {
        Commands::Play { seed, name, max_turns } => {
            override_session(&mut config, seed, max_turns);
            run_play(catalog, &config, &name, &log)
        }
        Commands::Simulate { seed, max_turns, json } => {
            override_session(&mut config, seed, max_turns);
            run_simulate(catalog, &config, &log, json)
        }
        Commands::Tourney { games, seed, max_turns } => {
            if let Some(limit) = max_turns {
                config.max_turns = limit;
            }
            let stats = tournament::run_and_report(catalog, games, seed, config.max_turns);
            if stats.failed > 0 {
                anyhow::bail!("{} games failed", stats.failed);
            }
            Ok(())
        }
        Commands::Catalog => {
            print_catalog(&catalog);
            Ok(())
        }
    }
}

fn override_session(config: &mut GameConfig, seed: Option<u64>, max_turns: Option<u32>) {
    if seed.is_some() {
        config.seed = seed;
    }
    if let Some(limit) = max_turns {
        config.max_turns = limit;
    }
}

fn load_catalog(path: Option<&Path>) -> Result<CardCatalog> {
    match path {
        Some(path) => {
            CardCatalog::load_from_file(path).with_context(|| format!("loading catalog {}", path.display()))
        }
        None => Ok(CardCatalog::embedded()?),
    }
}

struct LogOptions {
    format: OutputFormat,
    categories: Vec<String>,
}

impl LogOptions {
    /// Logger handed to the initializer so the deal and first turn use it
    fn logger(&self, verbosity: VerbosityLevel) -> GameLogger {
        let mut logger = GameLogger::with_verbosity(verbosity);
        logger.set_output_format(self.format);
        logger.set_categories(self.categories.clone());
        logger
    }
}

/// Human against the policy on stdin/stdout
fn run_play(catalog: Arc<CardCatalog>, config: &GameConfig, name: &str, log: &LogOptions) -> Result<()> {
    let verbosity = config.verbosity;
    if verbosity >= VerbosityLevel::Minimal {
        println!("=== Starting Game ===\n");
        println!("Type 'help' for commands, 'board' to see the table.\n");
    }
    let mut game = GameInitializer::new(catalog)
        .with_logger(log.logger(verbosity))
        .init_game(name, "Opponent", config.seed)?;
    game.render.set_enabled(config.record_render);

    let mut controller = InteractiveController::new(game.human_id());
    let result = GameLoop::new(&mut game)
        .with_verbosity(verbosity)
        .with_max_turns(config.max_turns)
        .run_with_controller(&mut controller)?;

    if verbosity >= VerbosityLevel::Minimal {
        println!("\n=== Game Over ===");
        match result.winner {
            Some(winner_id) => println!("Winner: {}", game.get_player(winner_id)?.name),
            None => println!("Game ended in a draw"),
        }
        println!("Turns played: {}", result.turns_played);
        println!("Reason: {}", result.end_reason);
    }
    Ok(())
}

/// One self-play game
fn run_simulate(catalog: Arc<CardCatalog>, config: &GameConfig, log: &LogOptions, json: bool) -> Result<()> {
    let verbosity = if json { VerbosityLevel::Silent } else { config.verbosity };
    let mut game = GameInitializer::new(catalog)
        .with_logger(log.logger(verbosity))
        .init_game("Player 1", "Player 2", config.seed)?;
    game.render.set_enabled(config.record_render);
    let result = GameLoop::new(&mut game)
        .with_verbosity(verbosity)
        .with_max_turns(config.max_turns)
        .run_self_play()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    println!("\n=== Game Over ===");
    match result.winner {
        Some(winner_id) => println!("Winner: {}", game.get_player(winner_id)?.name),
        None => println!("Game ended in a draw"),
    }
    println!("Turns played: {}", result.turns_played);
    println!("Reason: {}", result.end_reason);
    println!("\n=== Final State ===");
    for player in game.players.iter() {
        println!("  {}: {} health, {} cards in deck", player.name, player.health, player.deck.len());
    }
    Ok(())
}

fn print_catalog(catalog: &CardCatalog) {
    let avatar = catalog.avatar();
    println!("Avatar: {}/{}\n", avatar.attack, avatar.health);
    println!("=== Cards ({}) ===", catalog.len());
    for def in catalog.iter() {
        match &def.kind {
            CardKind::Unit { attack, health } => {
                println!("  [{}] {} - unit {attack}/{health} {}", def.mana_cost, def.name, def.abilities)
            }
            CardKind::Spell(effect) => println!("  [{}] {} - spell {:?}", def.mana_cost, def.name, effect),
        }
    }
    let decks = catalog.decks();
    for (seat, deck) in [("Player", &decks.human), ("Opponent", &decks.opponent)] {
        println!("\n=== {seat} deck ===");
        for entry in deck {
            println!("  {}x {}", entry.count, entry.card);
        }
    }
}
