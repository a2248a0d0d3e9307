// src/game/evaluation/king_safety.rs

use shakmaty::{Bitboard, Color, File, Role, Square};
use shakmaty::attacks::king_attacks;

use super::context::EvalContext;
use super::lines::{forward, is_open_file, neighbours, pieces_of, square_at};
use crate::constants::KING_MOBILITY_CAP;

/// King safety for `color`, or `None` when that side has no king.
pub fn evaluate(ctx: &EvalContext, color: Color) -> Option<f64> {
    let king_square = ctx.board().king_of(color)?;

    let score = evaluate_pawn_cover(ctx, color, king_square)
        + evaluate_attackers(ctx, color, king_square)
        - evaluate_open_files(ctx, king_square)
        + evaluate_pawn_shield(ctx, color, king_square)
        + evaluate_king_mobility(ctx, color, king_square);

    Some(score as f64)
}

fn evaluate_pawn_cover(ctx: &EvalContext, color: Color, king_square: Square) -> i32 {
    let our_pawns = pieces_of(ctx.board(), Role::Pawn, color);
    (our_pawns & neighbours(king_square)).count() as i32
}

/// Squares next to the king that the enemy attacks.
fn evaluate_attackers(ctx: &EvalContext, color: Color, king_square: Square) -> i32 {
    neighbours(king_square)
        .into_iter()
        .filter(|&square| ctx.is_attacked_by(!color, square))
        .count() as i32
}

fn evaluate_open_files(ctx: &EvalContext, king_square: Square) -> i32 {
    let king_file_index = king_square.file() as usize;
    let mut open_files = 0;
    for file_index in (king_file_index.saturating_sub(1))..=(king_file_index + 1).min(7) {
        if is_open_file(ctx.board(), File::new(file_index as u32)) {
            open_files += 1;
        }
    }
    open_files
}

fn evaluate_pawn_shield(ctx: &EvalContext, color: Color, king_square: Square) -> i32 {
    let our_pawns = pieces_of(ctx.board(), Role::Pawn, color);
    let file = king_square.file() as i32;
    let shield_rank = king_square.rank() as i32 + forward(color);

    let mut shield = Bitboard::EMPTY;
    for file_offset in -1..=1 {
        if let Some(square) = square_at(file + file_offset, shield_rank) {
            shield.add(square);
        }
    }
    (our_pawns & shield).count() as i32
}

/// Safe king destinations within two squares, capped at `KING_MOBILITY_CAP`.
///
/// A step counts when it holds no own piece and no enemy piece attacks it once
/// the king has been lifted off the board. The only legal two-square king
/// moves are castles, which are taken from the color's legal moves.
fn evaluate_king_mobility(ctx: &EvalContext, color: Color, king_square: Square) -> i32 {
    let board = ctx.board();
    let lifted = board.occupied().without(king_square);
    let candidates = king_attacks(king_square) & !board.by_color(color);

    let steps = candidates
        .into_iter()
        .filter(|&square| board.attacks_to(square, !color, lifted).is_empty())
        .count();
    let castles = ctx.legal_moves(color).iter().filter(|m| m.is_castle()).count();
    (steps + castles).min(KING_MOBILITY_CAP) as i32
}

#[cfg(test)]
pub(super) fn king_mobility(ctx: &EvalContext, color: Color) -> Option<i32> {
    let king_square = ctx.board().king_of(color)?;
    Some(evaluate_king_mobility(ctx, color, king_square))
}
