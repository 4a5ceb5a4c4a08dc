//! # Delve Main Entry Point
//!
//! Parses arguments, sets up logging, and plays a run from commands typed on stdin.

use clap::Parser;
use delve::{
    help_text, parse_command, render_ascii, status_line, DelveResult, GenerationConfig,
    MessageLog, PlayerInput, Run, RunConfig, RunStatus,
};
use log::info;
use tokio::io::{AsyncBufReadExt, BufReader};

/// Command line arguments for Delve.
#[derive(Parser, Debug)]
#[command(name = "delve")]
#[command(about = "A turn-based maze crawler for the terminal")]
#[command(version)]
struct Args {
    /// Random seed for level generation
    #[arg(short, long)]
    seed: Option<u64>,

    /// Map height in tiles
    #[arg(long, default_value_t = delve::config::DEFAULT_ROWS)]
    rows: usize,

    /// Map width in tiles
    #[arg(long, default_value_t = delve::config::DEFAULT_COLS)]
    cols: usize,

    /// Player name shown on the leaderboard
    #[arg(short, long, default_value = "Adventurer")]
    name: String,

    /// Levels to clear for a victory
    #[arg(long, default_value_t = delve::config::MAX_LEVELS)]
    max_levels: u32,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "warn")]
    log_level: String,
}

#[tokio::main]
async fn main() -> DelveResult<()> {
    let args = Args::parse();
    initialize_logging(&args.log_level);

    info!("Starting Delve v{}", delve::VERSION);

    let mut generation = GenerationConfig::default().with_size(args.rows, args.cols);
    generation.seed = args.seed;
    let config = RunConfig {
        max_levels: args.max_levels,
        generation,
    };

    let mut run = Run::start(args.name.as_str(), config).await?;
    play(&mut run).await?;

    match run.final_score() {
        Some(score) => {
            let verdict = if run.status() == RunStatus::Victory {
                "Victory!"
            } else {
                "You died."
            };
            println!("{} {} finished with {} gold.", verdict, score.name, score.score);
        }
        None => println!("Run abandoned on level {}.", run.level_number()),
    }
    print!("{}", run.score_sink());

    Ok(())
}

/// Initializes env_logger; `RUST_LOG` overrides the command line level.
fn initialize_logging(log_level: &str) {
    let mut builder = env_logger::Builder::new();
    builder.parse_filters(log_level).format_target(false);
    if let Ok(filters) = std::env::var("RUST_LOG") {
        builder.parse_filters(&filters);
    }
    builder.init();
}

/// Reads commands until the run ends, the player quits or stdin closes.
async fn play(run: &mut Run) -> DelveResult<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut messages = MessageLog::default();

    while run.status() == RunStatus::Playing {
        print!("{}", render_ascii(run.level()));
        println!("{}", status_line(run.level(), run.level_number()));
        for message in messages.recent(5) {
            println!("  {}", message);
        }
        println!("Command (h for help):");

        let Some(line) = lines.next_line().await? else {
            break;
        };

        let input = match parse_command(&line) {
            Some(input) => input,
            None => {
                messages.push(format!("Unknown command '{}'", line.trim()));
                continue;
            }
        };

        match input {
            PlayerInput::Help => print!("{}", help_text()),
            PlayerInput::Quit => break,
            other => {
                if let Some(action) = other.to_action() {
                    let turn = run.submit(action).await?;
                    messages.extend_events(&turn.outcome.events);
                    if turn.advanced {
                        messages.push(format!("You descend to level {}", turn.level_number));
                    }
                }
            }
        }
    }

    Ok(())
}
