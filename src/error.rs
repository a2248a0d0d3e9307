//! Errors raised by the self-play and persistence layers.
//!
//! Position evaluation itself never fails; see `game::evaluation`.

/// Errors that can occur while training, rating or persisting games.
#[derive(Debug, thiserror::Error)]
pub enum TrainingError {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid FEN '{0}'")]
    InvalidFen(String),

    #[error("illegal position: {0}")]
    InvalidPosition(String),

    #[error("no legal move available")]
    NoLegalMove,

    #[error("engine error: {0}")]
    Engine(String),

    #[error("policy output has {actual} entries, expected {expected}")]
    PolicyShape { expected: usize, actual: usize },
}

pub type Result<T> = std::result::Result<T, TrainingError>;
