// src/config.rs

use crate::constants::{DEFAULT_K_FACTOR, INITIAL_RATING, REFERENCE_RATING};
use crate::game::evaluation::Metric;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

const PROFILES_DIR: &str = "profiles";

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum EngineKind {
    Random,
    Greedy,
    /// An external engine spoken to over UCI.
    Uci,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TrainingConfig {
    pub games_per_epoch: usize,
    pub epochs: usize,
    pub max_plies: usize,
    pub learning_rate: f64,
    pub reference_rating: f64,
    pub initial_rating: f64,
    pub k_factor: f64,
    pub engine: EngineKind,
    /// Executable started for `EngineKind::Uci`.
    pub engine_path: PathBuf,
    pub engine_movetime_ms: u64,
    pub seed: u64,
    pub data_dir: PathBuf,
    pub model_path: PathBuf,
    /// Metrics averaged into the per-step reward adjustment.
    pub reward_metrics: Vec<Metric>,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            games_per_epoch: 10,
            epochs: 10,
            max_plies: 200,
            learning_rate: 0.01,
            reference_rating: REFERENCE_RATING,
            initial_rating: INITIAL_RATING,
            k_factor: DEFAULT_K_FACTOR,
            engine: EngineKind::Random,
            engine_path: PathBuf::from("stockfish"),
            engine_movetime_ms: 100,
            seed: 0,
            data_dir: PathBuf::from("game_data"),
            model_path: PathBuf::from("chess_model.json"),
            reward_metrics: vec![
                Metric::MaterialBalance,
                Metric::PieceMobility,
                Metric::PieceCoordination,
            ],
        }
    }
}

impl TrainingConfig {
    pub fn load(path: &Path) -> io::Result<Self> {
        let json = fs::read_to_string(path)?;
        serde_json::from_str(&json).map_err(io::Error::from)
    }

    pub fn save(&self, path: &Path) -> io::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::File::create(path)?.write_all(json.as_bytes())
    }
}

pub fn save_profile(name: &str, config: &TrainingConfig) -> io::Result<()> {
    fs::create_dir_all(PROFILES_DIR)?;
    config.save(&profile_path(name))
}

pub fn load_profile(name: &str) -> io::Result<TrainingConfig> {
    TrainingConfig::load(&profile_path(name))
}

pub fn get_profiles() -> io::Result<Vec<String>> {
    let mut profiles = Vec::new();
    for entry in fs::read_dir(PROFILES_DIR)? {
        let entry = entry?;
        let path = entry.path();
        if path.is_file() {
            if let Some(stem) = path.file_stem() {
                if let Some(name) = stem.to_str() {
                    profiles.push(name.to_string());
                }
            }
        }
    }
    profiles.sort();
    Ok(profiles)
}

fn profile_path(name: &str) -> PathBuf {
    Path::new(PROFILES_DIR).join(format!("{}.json", name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_config_round_trips_through_json_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("profile.json");
        let config = TrainingConfig {
            epochs: 3,
            engine: EngineKind::Greedy,
            reward_metrics: vec![Metric::Tempo],
            ..TrainingConfig::default()
        };
        config.save(&path).unwrap();
        assert_eq!(TrainingConfig::load(&path).unwrap(), config);
    }

    #[test]
    fn test_missing_fields_fall_back_to_defaults() {
        let config: TrainingConfig = serde_json::from_str(r#"{"epochs": 2}"#).unwrap();
        assert_eq!(config.epochs, 2);
        assert_eq!(config.games_per_epoch, 10);
        assert_eq!(config.reward_metrics.len(), 3);
        assert_eq!(config.engine_movetime_ms, 100);

        let config: TrainingConfig = serde_json::from_str(r#"{"engine": "uci"}"#).unwrap();
        assert_eq!(config.engine, EngineKind::Uci);
    }
}
