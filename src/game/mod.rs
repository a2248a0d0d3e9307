// game/mod.rs

pub mod evaluation;

use shakmaty::fen::Fen;
use shakmaty::san::San;
use shakmaty::{CastlingMode, Chess, Color, KnownOutcome, Move, Outcome, Position};

use crate::error::{Result, TrainingError};

/// A game in progress: the position, the moves played and a SAN record.
#[derive(Debug, Clone, Default)]
pub struct GameState {
    pub chess: Chess,
    moves: Vec<Move>,
    pgn: String,
}

impl GameState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_fen(fen: &str) -> Result<Self> {
        let parsed: Fen = fen
            .parse()
            .map_err(|_| TrainingError::InvalidFen(fen.to_string()))?;
        let chess = parsed
            .into_position(CastlingMode::Standard)
            .map_err(|e| TrainingError::InvalidPosition(e.to_string()))?;
        Ok(Self { chess, ..Self::default() })
    }

    /// Plays `m` if it is legal in the current position.
    pub fn make_move(&mut self, m: Move) -> bool {
        if !self.chess.is_legal(m) {
            return false;
        }
        if self.chess.turn() == Color::White {
            self.pgn.push_str(&format!("{}. ", self.chess.fullmoves()));
        }
        let san = San::from_move(&self.chess, m);
        self.pgn.push_str(&san.to_string());
        self.pgn.push(' ');
        self.chess.play_unchecked(m);
        self.moves.push(m);
        true
    }

    pub fn get_legal_moves(&self) -> Vec<Move> {
        self.chess.legal_moves().to_vec()
    }

    pub fn is_game_over(&self) -> bool {
        self.chess.is_game_over()
    }

    /// The final result; an unfinished game is scored a draw.
    pub fn outcome(&self) -> KnownOutcome {
        match self.chess.outcome() {
            Outcome::Known(known) => known,
            Outcome::Unknown => KnownOutcome::Draw,
        }
    }

    /// "1-0", "0-1" or "1/2-1/2".
    pub fn result_string(&self) -> String {
        self.outcome().to_string()
    }

    /// 1 for a win of `color`, -1 for a loss, 0 otherwise.
    pub fn result_value(&self, color: Color) -> f64 {
        match self.outcome().winner() {
            Some(winner) if winner == color => 1.0,
            Some(_) => -1.0,
            None => 0.0,
        }
    }

    pub fn plies(&self) -> usize {
        self.moves.len()
    }

    pub fn get_pgn(&self) -> &str {
        self.pgn.trim_end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shakmaty::{Role, Square};

    #[test]
    fn test_make_move_records_san() {
        let mut game = GameState::new();
        let e4 = Move::Normal {
            role: Role::Pawn,
            from: Square::E2,
            capture: None,
            to: Square::E4,
            promotion: None,
        };
        assert!(game.make_move(e4));
        assert_eq!(game.plies(), 1);
        assert_eq!(game.get_pgn(), "1. e4");
    }

    #[test]
    fn test_illegal_move_is_rejected() {
        let mut game = GameState::new();
        let bad = Move::Normal {
            role: Role::Pawn,
            from: Square::E2,
            capture: None,
            to: Square::E5,
            promotion: None,
        };
        assert!(!game.make_move(bad));
        assert_eq!(game.plies(), 0);
    }

    #[test]
    fn test_result_value_after_mate() {
        let game =
            GameState::from_fen("rnb1kbnr/pppp1ppp/8/4p3/6Pq/5P2/PPPPP2P/RNBQKBNR w KQkq - 1 3")
                .unwrap();
        assert!(game.is_game_over());
        assert_eq!(game.result_string(), "0-1");
        assert_eq!(game.result_value(Color::Black), 1.0);
        assert_eq!(game.result_value(Color::White), -1.0);
    }

    #[test]
    fn test_unfinished_game_scores_a_draw() {
        let game = GameState::new();
        assert_eq!(game.result_string(), "1/2-1/2");
        assert_eq!(game.result_value(Color::White), 0.0);
    }

    #[test]
    fn test_invalid_fen_is_an_error() {
        assert!(matches!(
            GameState::from_fen("not a fen"),
            Err(TrainingError::InvalidFen(_))
        ));
    }
}
