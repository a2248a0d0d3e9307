//! Self-play training and rating of a policy against a reference engine.

pub mod archive;
pub mod engine;
pub mod rating;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use shakmaty::{Color, Position};
use tracing::{debug, info, warn};

use self::archive::{next_game_number, GameArchive};
use self::engine::{make_engine, ReferenceEngine};
use self::rating::{GameResult, RatingLog};
use crate::config::TrainingConfig;
use crate::error::Result;
use crate::game::evaluation::{evaluate, Metric, ScoreBreakdown};
use crate::game::GameState;
use crate::policy::{board_to_input, decode_move, move_index, sample_move, LinearPolicy, Policy, Step};

/// Outcome value plus the mean of the chosen metrics.
pub fn shaped_reward(outcome_value: f64, scores: &ScoreBreakdown, metrics: &[Metric]) -> f64 {
    outcome_value + scores.mean_of(metrics)
}

/// A finished game seen from the trained side.
#[derive(Debug, Clone)]
pub struct GameRecord {
    pub trained: Color,
    pub result: GameResult,
    pub steps: Vec<Step>,
    pub archive: GameArchive,
    /// Evaluation of the final position for the trained side.
    pub final_scores: ScoreBreakdown,
}

/// Plays one game. The trained side samples from the policy when `explore` is
/// set and plays its best legal move otherwise.
pub fn play_game<P, R>(
    policy: &P,
    engine: &mut dyn ReferenceEngine,
    trained: Color,
    rng: &mut R,
    config: &TrainingConfig,
    explore: bool,
) -> GameRecord
where
    P: Policy + ?Sized,
    R: Rng + ?Sized,
{
    let mut game = GameState::new();
    let mut steps = Vec::new();
    // Evaluation of the position after each trained move.
    let mut shaping = Vec::new();

    while !game.is_game_over() && game.plies() < config.max_plies {
        let chosen = if game.chess.turn() == trained {
            let input = board_to_input(game.chess.board());
            let scores = policy.predict(&input);
            let legal = game.get_legal_moves();
            let chosen = if explore {
                sample_move(&scores, &legal, rng)
            } else {
                decode_move(&scores, &legal)
            };
            chosen.map(|m| {
                steps.push(Step {
                    input,
                    action: m,
                    legal: legal.iter().map(|&l| move_index(l)).collect(),
                    reward: 0.0,
                });
                (m, true)
            })
        } else {
            engine.choose(&game.chess).map(|m| (m, false))
        };

        match chosen {
            Ok((m, by_policy)) => {
                if !game.make_move(m) {
                    warn!(?m, by_policy, plies = game.plies(), "illegal move, ending game early");
                    break;
                }
                if by_policy {
                    shaping.push(evaluate(&game.chess, trained));
                }
            }
            Err(e) => {
                warn!(error = %e, plies = game.plies(), "ending game early");
                break;
            }
        }
    }

    let outcome_value = game.result_value(trained);
    for (step, scores) in steps.iter_mut().zip(&shaping) {
        step.reward = shaped_reward(outcome_value, scores, &config.reward_metrics);
    }

    let result = GameResult::from(game.outcome());
    info!(?trained, result = %game.result_string(), plies = game.plies(), "game finished");
    debug!(pgn = game.get_pgn(), "game record");

    GameRecord {
        trained,
        result,
        archive: GameArchive {
            inputs: steps.iter().map(|s| s.input.to_vec()).collect(),
            moves: steps.iter().map(|s| move_index(s.action)).collect(),
            result: game.result_string(),
            plies: game.plies(),
        },
        steps,
        final_scores: evaluate(&game.chess, trained),
    }
}

/// Win/draw/loss counts and average shaping metrics over an epoch.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct EpochSummary {
    pub wins: usize,
    pub draws: usize,
    pub losses: usize,
    pub material: f64,
    pub mobility: f64,
    pub coordination: f64,
}

impl EpochSummary {
    pub fn from_records(records: &[GameRecord]) -> Self {
        let mut summary = Self::default();
        if records.is_empty() {
            return summary;
        }
        for record in records {
            match record.result.score_for(record.trained) {
                s if s == 1.0 => summary.wins += 1,
                s if s == 0.0 => summary.losses += 1,
                _ => summary.draws += 1,
            }
            summary.material += record.final_scores.material_balance;
            summary.mobility += record.final_scores.piece_mobility;
            summary.coordination += record.final_scores.piece_coordination;
        }
        let n = records.len() as f64;
        summary.material /= n;
        summary.mobility /= n;
        summary.coordination /= n;
        summary
    }
}

fn game_rng(config: &TrainingConfig, game_index: u64) -> StdRng {
    StdRng::seed_from_u64(config.seed.wrapping_add(game_index))
}

/// Plays one epoch of exploring games in parallel.
fn play_epoch<P: Policy>(policy: &P, config: &TrainingConfig, epoch: usize) -> Result<Vec<GameRecord>> {
    let first = (epoch * config.games_per_epoch) as u64;
    (0..config.games_per_epoch as u64)
        .into_par_iter()
        .map(|i| -> Result<GameRecord> {
            let mut rng = game_rng(config, first + i);
            let trained = if rng.gen_bool(0.5) { Color::White } else { Color::Black };
            let mut engine = make_engine(config, rng.gen())?;
            Ok(play_game(policy, engine.as_mut(), trained, &mut rng, config, true))
        })
        .collect()
}

/// Runs the configured number of epochs, then saves the model and the rating
/// log. Games are archived as they finish each epoch.
pub fn run_training(config: &TrainingConfig) -> Result<RatingLog> {
    let mut policy = LinearPolicy::load_or_new(&config.model_path)?;
    let mut log = RatingLog::load_or_new(&config.data_dir, config.initial_rating)?;
    let mut game_number = next_game_number(&config.data_dir);
    info!(first_game = game_number, rating = log.rating, epochs = config.epochs, "starting training");

    for epoch in 0..config.epochs {
        let records = play_epoch(&policy, config, epoch)?;

        let mut steps = Vec::new();
        for record in &records {
            record.archive.save(&config.data_dir, game_number)?;
            game_number += 1;
            log.record(record.result, record.trained, config.reference_rating, config.k_factor);
            steps.extend(record.steps.iter().cloned());
        }
        policy.update(&steps, config.learning_rate);

        let summary = EpochSummary::from_records(&records);
        info!(
            epoch = epoch + 1,
            material = summary.material,
            mobility = summary.mobility,
            coordination = summary.coordination,
            wins = summary.wins,
            draws = summary.draws,
            losses = summary.losses,
            rating = log.rating,
            "epoch finished"
        );
    }

    if let Some(parent) = config.model_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    policy.save(&config.model_path)?;
    log.save()?;
    Ok(log)
}

/// Plays `games` rating games with the saved policy, alternating its color,
/// and updates the rating log.
pub fn rate_policy(config: &TrainingConfig, games: usize) -> Result<RatingLog> {
    let policy = LinearPolicy::load_or_new(&config.model_path)?;
    let mut log = RatingLog::load_or_new(&config.data_dir, config.initial_rating)?;

    for i in 0..games {
        let mut rng = game_rng(config, u64::MAX - i as u64);
        let trained = if i % 2 == 0 { Color::White } else { Color::Black };
        let mut engine = make_engine(config, rng.gen())?;
        let record = play_game(&policy, engine.as_mut(), trained, &mut rng, config, false);
        log.record(record.result, trained, config.reference_rating, config.k_factor);
    }

    info!(games, rating = log.rating, "rating finished");
    log.save()?;
    Ok(log)
}
