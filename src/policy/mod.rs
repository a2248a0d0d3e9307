//! Board and move encodings, and the policy the self-play loop trains.

use std::fs;
use std::io::Write;
use std::path::Path;

use rand::Rng;
use serde::{Deserialize, Serialize};
use shakmaty::uci::UciMove;
use shakmaty::{Board, CastlingMode, Color, Move};

use crate::constants::{BOARD_INPUT_LEN, MOVE_SPACE};
use crate::error::{Result, TrainingError};
use crate::game::evaluation::piece_value;

pub type BoardInput = [f32; BOARD_INPUT_LEN];

/// Piece value times color sign per square (white positive, empty 0).
pub fn board_to_input(board: &Board) -> BoardInput {
    let mut input = [0.0; BOARD_INPUT_LEN];
    for square in board.occupied() {
        if let Some(piece) = board.piece_at(square) {
            let sign = match piece.color {
                Color::White => 1.0,
                Color::Black => -1.0,
            };
            input[square as usize] = sign * piece_value(piece.role) as f32;
        }
    }
    input
}

/// `from * 64 + to`, with castling encoded as the king's UCI move.
pub fn move_index(m: Move) -> usize {
    match m.to_uci(CastlingMode::Standard) {
        UciMove::Normal { from, to, .. } => from as usize * 64 + to as usize,
        _ => m.from().map_or(0, |from| from as usize * 64) + m.to() as usize,
    }
}

/// One-hot vector over the move space.
pub fn encode_move(m: Move) -> Vec<f32> {
    let mut encoded = vec![0.0; MOVE_SPACE];
    encoded[move_index(m)] = 1.0;
    encoded
}

fn check_shape(scores: &[f32]) -> Result<()> {
    if scores.len() != MOVE_SPACE {
        return Err(TrainingError::PolicyShape { expected: MOVE_SPACE, actual: scores.len() });
    }
    Ok(())
}

/// The legal move with the highest score; the first maximum wins.
pub fn decode_move(scores: &[f32], legal: &[Move]) -> Result<Move> {
    check_shape(scores)?;
    let mut best: Option<(Move, f32)> = None;
    for &m in legal {
        let score = scores[move_index(m)];
        match best {
            Some((_, best_score)) if score <= best_score => {}
            _ => best = Some((m, score)),
        }
    }
    best.map(|(m, _)| m).ok_or(TrainingError::NoLegalMove)
}

/// Samples a legal move in proportion to its score.
pub fn sample_move<R: Rng + ?Sized>(scores: &[f32], legal: &[Move], rng: &mut R) -> Result<Move> {
    check_shape(scores)?;
    let weights: Vec<f32> = legal.iter().map(|&m| scores[move_index(m)].max(0.0)).collect();
    let total: f32 = weights.iter().sum();
    if total <= 0.0 || !total.is_finite() {
        return decode_move(scores, legal);
    }
    let mut pick = rng.gen_range(0.0..total);
    for (&m, &weight) in legal.iter().zip(&weights) {
        if pick < weight {
            return Ok(m);
        }
        pick -= weight;
    }
    decode_move(scores, legal)
}

/// A decision made during self-play and the reward it earned.
#[derive(Debug, Clone)]
pub struct Step {
    pub input: BoardInput,
    pub action: Move,
    /// Move indices of the legal moves at this step.
    pub legal: Vec<usize>,
    pub reward: f64,
}

pub trait Policy: Send + Sync {
    /// Move probabilities over the full move space.
    fn predict(&self, input: &BoardInput) -> Vec<f32>;

    /// Moves the policy towards the actions of `steps`, weighted by reward.
    fn update(&mut self, steps: &[Step], learning_rate: f64);
}

/// Softmax over a linear map of the board input.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LinearPolicy {
    weights: Vec<f32>,
    bias: Vec<f32>,
}

impl Default for LinearPolicy {
    fn default() -> Self {
        Self {
            weights: vec![0.0; MOVE_SPACE * BOARD_INPUT_LEN],
            bias: vec![0.0; MOVE_SPACE],
        }
    }
}

impl LinearPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path)?;
        let policy: Self = serde_json::from_str(&json)?;
        if policy.weights.len() != MOVE_SPACE * BOARD_INPUT_LEN {
            return Err(TrainingError::PolicyShape {
                expected: MOVE_SPACE * BOARD_INPUT_LEN,
                actual: policy.weights.len(),
            });
        }
        check_shape(&policy.bias)?;
        Ok(policy)
    }

    /// Loads the policy at `path`, or starts a fresh one when there is none.
    pub fn load_or_new(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::new())
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string(self)?;
        fs::File::create(path)?.write_all(json.as_bytes())?;
        Ok(())
    }

    fn logit(&self, input: &BoardInput, index: usize) -> f32 {
        let row = &self.weights[index * BOARD_INPUT_LEN..(index + 1) * BOARD_INPUT_LEN];
        self.bias[index] + row.iter().zip(input).map(|(w, x)| w * x).sum::<f32>()
    }

    fn softmax_over(&self, input: &BoardInput, indices: &[usize]) -> Vec<f32> {
        let logits: Vec<f32> = indices.iter().map(|&i| self.logit(input, i)).collect();
        let max = logits.iter().copied().fold(f32::NEG_INFINITY, f32::max);
        let exps: Vec<f32> = logits.iter().map(|l| (l - max).exp()).collect();
        let total: f32 = exps.iter().sum();
        exps.into_iter().map(|e| e / total).collect()
    }
}

impl Policy for LinearPolicy {
    fn predict(&self, input: &BoardInput) -> Vec<f32> {
        let all: Vec<usize> = (0..MOVE_SPACE).collect();
        self.softmax_over(input, &all)
    }

    /// REINFORCE on the softmax restricted to the legal moves of each step.
    fn update(&mut self, steps: &[Step], learning_rate: f64) {
        for step in steps {
            if step.legal.is_empty() {
                continue;
            }
            let probs = self.softmax_over(&step.input, &step.legal);
            let target = encode_move(step.action);
            let scale = (learning_rate * step.reward) as f32;
            for (&index, &p) in step.legal.iter().zip(&probs) {
                let grad = scale * (target[index] - p);
                if grad == 0.0 {
                    continue;
                }
                self.bias[index] += grad;
                let row = &mut self.weights[index * BOARD_INPUT_LEN..(index + 1) * BOARD_INPUT_LEN];
                for (w, x) in row.iter_mut().zip(&step.input) {
                    *w += grad * x;
                }
            }
        }
    }
}
