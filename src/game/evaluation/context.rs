// src/game/evaluation/context.rs

//! Per-call evaluation context.
//!
//! Everything the metric families query repeatedly is computed once here:
//! attack sets per square, attacker sets per square and color, and the legal
//! moves of both sides. Nothing in the context is mutated after construction.

use shakmaty::attacks::pawn_attacks;
use shakmaty::{
    Bitboard, Board, ByColor, CastlingMode, Chess, Color, EnPassantMode, FromSetup, Move,
    MoveList, Piece, Position, PositionError, Setup, Square,
};
use tracing::debug;

use super::lines::{forward, relative_rank, square_at};

/// Moves available to one side.
#[derive(Debug, Clone)]
pub struct SideMoves {
    pub moves: MoveList,
    /// Number of moves. Equals `moves.len()` unless the side's hypothetical
    /// position could not be built, in which case it is a pseudo-legal count
    /// and `moves` is empty.
    pub count: usize,
    pub exact: bool,
}

pub struct EvalContext {
    board: Board,
    turn: Color,
    position: Option<Chess>,
    attacks: [Bitboard; 64],
    attackers: ByColor<[Bitboard; 64]>,
    moves: ByColor<SideMoves>,
    in_check: bool,
    checkmate: bool,
}

impl EvalContext {
    pub fn from_position(pos: &Chess) -> Self {
        let setup = pos.to_setup(EnPassantMode::Legal);
        Self::build(setup, Some(pos.clone()))
    }

    pub fn from_setup(setup: &Setup) -> Self {
        let position = side_position(setup, setup.turn);
        Self::build(setup.clone(), position)
    }

    fn build(setup: Setup, position: Option<Chess>) -> Self {
        let board = setup.board.clone();
        let turn = setup.turn;
        let occupied = board.occupied();

        let mut attacks = [Bitboard::EMPTY; 64];
        let mut white_attackers = [Bitboard::EMPTY; 64];
        let mut black_attackers = [Bitboard::EMPTY; 64];
        for square in Square::ALL {
            attacks[square as usize] = board.attacks_from(square);
            white_attackers[square as usize] = board.attacks_to(square, Color::White, occupied);
            black_attackers[square as usize] = board.attacks_to(square, Color::Black, occupied);
        }

        let moves_for = |side: Color| -> SideMoves {
            let hypothetical = if side == turn {
                position.clone()
            } else {
                side_position(&setup, side)
            };
            match hypothetical {
                Some(pos) => {
                    let moves = pos.legal_moves();
                    SideMoves { count: moves.len(), moves, exact: true }
                }
                None => {
                    let count = pseudo_move_count(&board, side);
                    debug!(?side, count, "falling back to pseudo-legal move count");
                    SideMoves { moves: MoveList::new(), count, exact: false }
                }
            }
        };
        let moves = ByColor { white: moves_for(Color::White), black: moves_for(Color::Black) };

        let in_check = board
            .king_of(turn)
            .map(|king| {
                let attackers = match turn {
                    Color::White => black_attackers[king as usize],
                    Color::Black => white_attackers[king as usize],
                };
                !attackers.is_empty()
            })
            .unwrap_or(false);
        let to_move = moves.get(turn);
        let checkmate = in_check && to_move.exact && to_move.count == 0;

        Self {
            board,
            turn,
            position,
            attacks,
            attackers: ByColor { white: white_attackers, black: black_attackers },
            moves,
            in_check,
            checkmate,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn turn(&self) -> Color {
        self.turn
    }

    /// The position with the real side to move, when it is a legal position.
    pub fn position(&self) -> Option<&Chess> {
        self.position.as_ref()
    }

    /// Squares attacked by the piece on `square` (empty if unoccupied).
    pub fn attacks(&self, square: Square) -> Bitboard {
        self.attacks[square as usize]
    }

    /// Pieces of `color` attacking `square`.
    pub fn attackers(&self, square: Square, color: Color) -> Bitboard {
        self.attackers.get(color)[square as usize]
    }

    pub fn is_attacked_by(&self, color: Color, square: Square) -> bool {
        !self.attackers(square, color).is_empty()
    }

    pub fn piece_at(&self, square: Square) -> Option<Piece> {
        self.board.piece_at(square)
    }

    pub fn pieces(&self, color: Color) -> Bitboard {
        self.board.by_color(color)
    }

    pub fn legal_count(&self, color: Color) -> usize {
        self.moves.get(color).count
    }

    pub fn legal_moves(&self, color: Color) -> &[Move] {
        &self.moves.get(color).moves
    }

    /// Legal move count of the side to move.
    pub fn moves_to_play(&self) -> usize {
        self.legal_count(self.turn)
    }

    pub fn is_check(&self) -> bool {
        self.in_check
    }

    pub fn is_checkmate(&self) -> bool {
        self.checkmate
    }

    /// The side that delivered check or mate, if any.
    pub fn checking_side(&self) -> Option<Color> {
        self.in_check.then_some(!self.turn)
    }
}

/// Builds the position for `side` to move from `setup` without touching it.
fn side_position(setup: &Setup, side: Color) -> Option<Chess> {
    let mut setup = setup.clone();
    if setup.turn != side {
        setup.turn = side;
        setup.ep_square = None;
    }
    Chess::from_setup(setup, CastlingMode::Standard)
        .or_else(PositionError::ignore_invalid_castling_rights)
        .or_else(PositionError::ignore_invalid_ep_square)
        .ok()
}

/// Pseudo-legal move count for `side`, used when no legal position exists.
pub fn pseudo_move_count(board: &Board, side: Color) -> usize {
    let own = board.by_color(side);
    let enemy = board.by_color(!side);
    let occupied = board.occupied();
    let mut count = 0;

    for square in own & !board.pawns() {
        count += (board.attacks_from(square) & !own).count();
    }

    for square in own & board.pawns() {
        count += (pawn_attacks(side, square) & enemy).count();
        let file = square.file() as i32;
        let rank = square.rank() as i32;
        if let Some(one) = square_at(file, rank + forward(side)) {
            if !occupied.contains(one) {
                count += 1;
                if relative_rank(square, side) == 1 {
                    if let Some(two) = square_at(file, rank + 2 * forward(side)) {
                        if !occupied.contains(two) {
                            count += 1;
                        }
                    }
                }
            }
        }
    }

    count
}

