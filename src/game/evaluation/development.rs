// src/game/evaluation/development.rs

use shakmaty::{Bitboard, Color, Piece, Rank, Role, Square};

use super::context::EvalContext;
use super::lines::{is_open_file, is_semi_open_file};
use super::piece_value;
use crate::constants::CASTLING_AVAILABLE_BONUS;

const KNIGHT_POSTS: [Square; 8] = [
    Square::D2, Square::D7, Square::E2, Square::E7, Square::C3, Square::C6, Square::F3, Square::F6,
];
const BISHOP_POSTS: [Square; 8] = [
    Square::C1, Square::F1, Square::C8, Square::F8, Square::B2, Square::G2, Square::B7, Square::G7,
];
const ROOK_POSTS: [Square; 4] = [Square::A1, Square::H1, Square::A8, Square::H8];
const QUEEN_POSTS: [Square; 2] = [Square::D1, Square::D8];

fn posted(ctx: &EvalContext, role: Role, color: Color, posts: &[Square]) -> u32 {
    let pieces = ctx.board().by_piece(Piece { role, color });
    posts.iter().filter(|&&square| pieces.contains(square)).count() as u32
}

/// Development advantage of `color`.
pub fn evaluate(ctx: &EvalContext, color: Color) -> f64 {
    let board = ctx.board();
    let mut score = 0.0;

    // Minor pieces count half their value, majors in full.
    for (role, posts, factor) in [
        (Role::Knight, &KNIGHT_POSTS[..], 0.5),
        (Role::Bishop, &BISHOP_POSTS[..], 0.5),
        (Role::Rook, &ROOK_POSTS[..], 1.0),
        (Role::Queen, &QUEEN_POSTS[..], 1.0),
    ] {
        score += posted(ctx, role, color, posts) as f64 * piece_value(role) as f64 * factor;
    }

    let back_ranks = Bitboard::from_rank(Rank::First) | Bitboard::from_rank(Rank::Eighth);
    let rooks = board.by_piece(Piece { role: Role::Rook, color }) & back_ranks;
    let rook_value = piece_value(Role::Rook) as f64;
    for square in rooks {
        if is_open_file(board, square.file()) {
            score += rook_value * 1.5;
        } else if is_semi_open_file(board, color, square.file()) {
            score += rook_value;
        }
    }

    if ctx.turn() == color && ctx.legal_moves(color).iter().any(|m| m.is_castle()) {
        score += CASTLING_AVAILABLE_BONUS;
    }

    let minors: Vec<f64> = (board.by_piece(Piece { role: Role::Knight, color })
        | board.by_piece(Piece { role: Role::Bishop, color }))
    .into_iter()
    .filter_map(|square| board.role_at(square))
    .map(|role| piece_value(role) as f64)
    .collect();
    for (i, v1) in minors.iter().enumerate() {
        for v2 in &minors[i + 1..] {
            score += (v1 + v2) * 0.1;
        }
    }

    score
}
