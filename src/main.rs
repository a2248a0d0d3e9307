mod config;
mod constants;
mod error;
mod game;
mod policy;
mod training;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand, ValueEnum};
use shakmaty::fen::Fen;
use shakmaty::Color;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use crate::config::TrainingConfig;
use crate::error::{Result, TrainingError};
use crate::game::evaluation::{evaluate, evaluate_setup};
use crate::game::GameState;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Side {
    White,
    Black,
}

impl From<Side> for Color {
    fn from(side: Side) -> Self {
        match side {
            Side::White => Color::White,
            Side::Black => Color::Black,
        }
    }
}

/// Where the training configuration comes from.
#[derive(clap::Args, Debug)]
struct ConfigSource {
    /// Name of a saved profile
    #[arg(long, conflicts_with = "config")]
    profile: Option<String>,

    /// Path to a JSON configuration file
    #[arg(long)]
    config: Option<PathBuf>,
}

impl ConfigSource {
    fn load(&self) -> Result<TrainingConfig> {
        if let Some(name) = &self.profile {
            return Ok(config::load_profile(name)?);
        }
        if let Some(path) = &self.config {
            return Ok(TrainingConfig::load(path)?);
        }
        Ok(TrainingConfig::default())
    }
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the evaluation of a position
    Evaluate {
        #[arg(long)]
        fen: String,

        #[arg(long, value_enum, default_value = "white")]
        color: Side,

        /// Print the scores as JSON
        #[arg(long)]
        json: bool,
    },
    /// Train the policy by self-play against the reference engine
    Train {
        #[command(flatten)]
        source: ConfigSource,

        #[arg(long)]
        epochs: Option<usize>,

        /// Games per epoch
        #[arg(long)]
        games: Option<usize>,
    },
    /// Play rating games with the current policy
    Rate {
        #[command(flatten)]
        source: ConfigSource,

        #[arg(long, default_value_t = 10)]
        games: usize,
    },
    /// Manage saved configuration profiles
    Profile {
        #[command(subcommand)]
        action: ProfileAction,
    },
}

#[derive(Subcommand, Debug)]
enum ProfileAction {
    /// Save a configuration under a profile name
    Save {
        name: String,

        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// List saved profiles
    List,
}

fn run(args: Args) -> Result<()> {
    match args.command {
        Command::Evaluate { fen, color, json } => {
            let scores = match GameState::from_fen(&fen) {
                Ok(game) => evaluate(&game.chess, color.into()),
                Err(TrainingError::InvalidPosition(reason)) => {
                    warn!(%reason, "evaluating the board as a raw setup");
                    let parsed: Fen = fen.parse().map_err(|_| TrainingError::InvalidFen(fen.clone()))?;
                    evaluate_setup(&parsed.into_setup(), color.into())
                }
                Err(e) => return Err(e),
            };
            if json {
                println!("{}", serde_json::to_string_pretty(&scores)?);
            } else {
                for (metric, value) in scores.iter() {
                    println!("{:<24} {value:.4}", metric.name());
                }
                println!("{:<24} {:.4}", "mean", scores.mean());
            }
        }
        Command::Train { source, epochs, games } => {
            let mut config = source.load()?;
            if let Some(epochs) = epochs {
                config.epochs = epochs;
            }
            if let Some(games) = games {
                config.games_per_epoch = games;
            }
            let log = training::run_training(&config)?;
            info!(rating = log.rating, games = log.records.len(), "training finished");
        }
        Command::Rate { source, games } => {
            let config = source.load()?;
            let log = training::rate_policy(&config, games)?;
            println!("rating: {:.1}", log.rating);
        }
        Command::Profile { action: ProfileAction::Save { name, config } } => {
            let config = match config {
                Some(path) => TrainingConfig::load(&path)?,
                None => TrainingConfig::default(),
            };
            config::save_profile(&name, &config)?;
            info!(profile = %name, "profile saved");
        }
        Command::Profile { action: ProfileAction::List } => {
            for name in config::get_profiles()? {
                println!("{name}");
            }
        }
    }
    Ok(())
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
    std::panic::set_hook(Box::new(tracing_panic::panic_hook));

    if let Err(e) = run(Args::parse()) {
        error!(error = %e, "command failed");
        process::exit(1);
    }
}
