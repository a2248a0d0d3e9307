//! Elo bookkeeping for the trained policy.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shakmaty::{Color, KnownOutcome};
use tracing::warn;

use crate::error::Result;

pub const RATING_LOG_FILE: &str = "rating_log.json";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GameResult {
    WhiteWin,
    BlackWin,
    Draw,
}

impl GameResult {
    /// Score of `color` in this game: 1, 0.5 or 0.
    pub fn score_for(self, color: Color) -> f64 {
        match (self, color) {
            (GameResult::Draw, _) => 0.5,
            (GameResult::WhiteWin, Color::White) | (GameResult::BlackWin, Color::Black) => 1.0,
            _ => 0.0,
        }
    }
}

impl From<KnownOutcome> for GameResult {
    fn from(outcome: KnownOutcome) -> Self {
        match outcome.winner() {
            Some(Color::White) => GameResult::WhiteWin,
            Some(Color::Black) => GameResult::BlackWin,
            None => GameResult::Draw,
        }
    }
}

/// New ratings of white and black after a game where white scored `score`.
pub fn update_elo(white_elo: f64, black_elo: f64, score: f64, k_factor: f64) -> (f64, f64) {
    let expected_score_white = 1.0 / (1.0 + 10.0f64.powf((black_elo - white_elo) / 400.0));
    let expected_score_black = 1.0 - expected_score_white;

    let new_white_elo = white_elo + k_factor * (score - expected_score_white);
    let new_black_elo = black_elo + k_factor * ((1.0 - score) - expected_score_black);

    (new_white_elo, new_black_elo)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatingRecord {
    pub sequence: u64,
    pub outcome: GameResult,
    pub timestamp: DateTime<Utc>,
}

/// The policy's current rating and every game that moved it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatingLog {
    pub rating: f64,
    pub records: Vec<RatingRecord>,
    #[serde(skip)]
    path: PathBuf,
}

impl RatingLog {
    pub fn new(dir: &Path, initial_rating: f64) -> Self {
        Self { rating: initial_rating, records: Vec::new(), path: dir.join(RATING_LOG_FILE) }
    }

    /// Loads the log in `dir`, or starts one at `initial_rating`.
    pub fn load_or_new(dir: &Path, initial_rating: f64) -> Result<Self> {
        let path = dir.join(RATING_LOG_FILE);
        if !path.exists() {
            return Ok(Self::new(dir, initial_rating));
        }
        let json = fs::read_to_string(&path)?;
        let mut log: Self = serde_json::from_str(&json)?;
        log.path = path;
        Ok(log)
    }

    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    /// Records a finished game of the policy playing `color` against an
    /// opponent rated `opponent_rating` and updates the rating.
    pub fn record(&mut self, result: GameResult, color: Color, opponent_rating: f64, k_factor: f64) {
        let score = result.score_for(color);
        let (new_rating, _) = update_elo(self.rating, opponent_rating, score, k_factor);
        if new_rating.is_finite() {
            self.rating = new_rating;
        } else {
            warn!(rating = self.rating, opponent_rating, "skipping non-finite rating update");
        }

        let sequence = self.records.last().map_or(1, |last| last.sequence + 1);
        self.records.push(RatingRecord { sequence, outcome: result, timestamp: Utc::now() });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_update_elo_equal_ratings() {
        let (white, black) = update_elo(1500.0, 1500.0, 1.0, 32.0);
        assert!((white - 1516.0).abs() < 1e-9);
        assert!((black - 1484.0).abs() < 1e-9);
        assert!((white + black - 3000.0).abs() < 1e-9);
    }

    #[test]
    fn test_update_elo_conserves_total() {
        let (white, black) = update_elo(1200.0, 1850.0, 0.5, 32.0);
        assert!((white + black - 3050.0).abs() < 1e-9);
        assert!(white > 1200.0);
    }

    #[test]
    fn test_score_for_color() {
        assert_eq!(GameResult::WhiteWin.score_for(Color::White), 1.0);
        assert_eq!(GameResult::WhiteWin.score_for(Color::Black), 0.0);
        assert_eq!(GameResult::Draw.score_for(Color::Black), 0.5);
    }

    #[test]
    fn test_non_finite_update_is_skipped() {
        let dir = tempdir().unwrap();
        let mut log = RatingLog::new(dir.path(), 1000.0);
        log.record(GameResult::Draw, Color::White, f64::NAN, 32.0);
        assert_eq!(log.rating, 1000.0);
        assert_eq!(log.records.len(), 1);
    }

    #[test]
    fn test_rating_log_persists() {
        let dir = tempdir().unwrap();
        let mut log = RatingLog::load_or_new(dir.path(), 1000.0).unwrap();
        log.record(GameResult::WhiteWin, Color::White, 2500.0, 32.0);
        log.record(GameResult::BlackWin, Color::White, 2500.0, 32.0);
        log.save().unwrap();

        let loaded = RatingLog::load_or_new(dir.path(), 1000.0).unwrap();
        assert_eq!(loaded, log);
        assert_eq!(loaded.records[1].sequence, 2);
        assert!(loaded.rating > 1000.0);

        let json = fs::read_to_string(dir.path().join(RATING_LOG_FILE)).unwrap();
        assert!(json.contains("\"white-win\""));
    }
}
