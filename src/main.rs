//! hexgit - command-line driver for the versioned-board tactics engine
//!
//! The real game fronts this engine with a hex renderer and mouse input;
//! this binary drives the same intents from stdin for play-testing.

use anyhow::Context;
use clap::{Parser, Subcommand};
use hexgit::core::CellPos;
use hexgit::game::{GameController, Intent, VerbosityLevel};
use hexgit::EngineError;
use std::io::{self, BufRead, Write};

#[derive(Parser)]
#[command(name = "hexgit")]
#[command(about = "Turn-based tactics with a git-shaped undo history", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive session reading intents from stdin
    Play {
        /// RNG seed for combat rolls and commit labels
        #[arg(long, default_value_t = 0)]
        seed: u64,

        /// Board width
        #[arg(long, default_value_t = 9)]
        width: usize,

        /// Board height
        #[arg(long, default_value_t = 9)]
        height: usize,

        /// Narration verbosity: silent, minimal, normal, verbose
        #[arg(long, default_value = "normal")]
        verbosity: String,
    },

    /// Scripted smoke run exercising branch/merge/revert
    Demo {
        /// RNG seed for combat rolls and commit labels
        #[arg(long, default_value_t = 0)]
        seed: u64,
    },
}

fn parse_verbosity(s: &str) -> Result<VerbosityLevel, String> {
    match s.to_lowercase().as_str() {
        "silent" | "0" => Ok(VerbosityLevel::Silent),
        "minimal" | "1" => Ok(VerbosityLevel::Minimal),
        "normal" | "2" => Ok(VerbosityLevel::Normal),
        "verbose" | "3" => Ok(VerbosityLevel::Verbose),
        _ => Err(format!(
            "invalid verbosity '{s}' (expected: silent/0, minimal/1, normal/2, verbose/3)"
        )),
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Play { seed, width, height, verbosity } => {
            let level = parse_verbosity(&verbosity).map_err(anyhow::Error::msg)?;
            let mut controller =
                GameController::new_game(width, height, seed).context("failed to set up game")?;
            controller.logger_mut().set_verbosity(level);
            run_repl(&mut controller)
        }
        Commands::Demo { seed } => run_demo(seed),
    }
}

fn run_repl(controller: &mut GameController) -> anyhow::Result<()> {
    println!("type 'help' for commands");
    let stdin = io::stdin();
    loop {
        print!("> ");
        io::stdout().flush().ok();
        let mut line = String::new();
        if stdin.lock().read_line(&mut line).context("stdin read failed")? == 0 {
            return Ok(());
        }
        let words: Vec<&str> = line.split_whitespace().collect();
        let result = match words.as_slice() {
            [] => Ok(()),
            ["quit"] | ["exit"] => return Ok(()),
            ["help"] => {
                print_help();
                Ok(())
            }
            ["board"] => {
                print_board(controller);
                Ok(())
            }
            ["tree"] => {
                print_tree(controller);
                Ok(())
            }
            ["dump"] => controller.dump_json().map(|json| println!("{json}")),
            ["commit"] => controller.handle(Intent::Commit),
            ["branch"] => controller.handle(Intent::Branch),
            ["merge"] => controller.handle(Intent::Merge),
            ["revert"] => controller.handle(Intent::Revert),
            ["select", x, y] => {
                parse_pos(x, y).and_then(|pos| controller.handle(Intent::Select(pos)))
            }
            ["move", x1, y1, x2, y2] => parse_pos(x1, y1).and_then(|from| {
                parse_pos(x2, y2).and_then(|to| controller.handle(Intent::Move { from, to }))
            }),
            _ => Err(EngineError::InvalidCommand(line.trim().to_string())),
        };
        if let Err(err) = result {
            println!("error: {err}");
        }
        if let Some(victory) = controller.victory() {
            println!("game over: {victory:?}");
        }
    }
}

fn run_demo(seed: u64) -> anyhow::Result<()> {
    let mut controller = GameController::new_game(9, 9, seed).context("failed to set up game")?;
    let script = [
        Intent::Move { from: CellPos::new(1, 0), to: CellPos::new(1, 3) },
        Intent::Branch,
        Intent::Move { from: CellPos::new(2, 2), to: CellPos::new(4, 4) },
        Intent::Merge,
        Intent::Revert,
    ];
    for intent in script {
        controller.handle(intent)?;
    }
    print_board(&controller);
    print_tree(&controller);
    Ok(())
}

fn parse_pos(x: &str, y: &str) -> hexgit::Result<CellPos> {
    let parse = |s: &str| {
        s.parse::<usize>()
            .map_err(|_| EngineError::InvalidCommand(format!("not a coordinate: {s}")))
    };
    Ok(CellPos::new(parse(x)?, parse(y)?))
}

fn print_help() {
    println!("commands:");
    println!("  commit | branch | merge | revert");
    println!("  select X Y       first click selects, second fires the move");
    println!("  move X1 Y1 X2 Y2 apply a move directly");
    println!("  board | tree | dump | quit");
}

fn print_board(controller: &GameController) {
    let board = controller.board();
    for y in 0..board.height() {
        let mut row = String::new();
        for x in 0..board.width() {
            let tile = board
                .tile(CellPos::new(x, y))
                .expect("iterating within bounds");
            let glyph = match &tile.occupant {
                Some(unit) if unit.faction == hexgit::core::Faction::Player => {
                    unit.name.chars().next().unwrap_or('?')
                }
                Some(unit) => unit.name.chars().next().unwrap_or('?').to_ascii_lowercase(),
                None => '.',
            };
            row.push(glyph);
            row.push(' ');
        }
        println!("{row}");
    }
}

fn print_tree(controller: &GameController) {
    let history = controller.history();
    for (node_id, node) in history.ancestors() {
        if node.is_sentinel() {
            continue;
        }
        let indent = "  ".repeat(node.generation as usize);
        let marker = if node_id == history.current_id() { "*" } else { "o" };
        println!("{indent}{marker} {} (gen {})", node.id, node.generation);
    }
}
