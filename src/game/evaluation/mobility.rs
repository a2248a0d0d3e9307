// src/game/evaluation/mobility.rs

use shakmaty::{Bitboard, Board, ByColor, Color, Rank, Role};

use super::context::EvalContext;
use super::lines::is_open_file;
use crate::constants::{
    ACTIVITY_CENTER_CONTROL_WEIGHT, ACTIVITY_CENTRALIZATION_WEIGHT, ACTIVITY_LEGAL_MOVE_WEIGHT,
    CENTER4, MOBILITY_WEIGHTS,
};

/// Ranks three to six, every file.
pub fn center_band() -> Bitboard {
    Bitboard::from_rank(Rank::Third)
        | Bitboard::from_rank(Rank::Fourth)
        | Bitboard::from_rank(Rank::Fifth)
        | Bitboard::from_rank(Rank::Sixth)
}

/// Ranks four to six, every file.
pub fn key_ranks() -> Bitboard {
    Bitboard::from_rank(Rank::Fourth) | Bitboard::from_rank(Rank::Fifth) | Bitboard::from_rank(Rank::Sixth)
}

fn center4() -> Bitboard {
    CENTER4.iter().fold(Bitboard::EMPTY, |bb, &square| bb.with(square))
}

fn legal_move_diff(ctx: &EvalContext) -> f64 {
    ctx.legal_count(Color::White) as f64 - ctx.legal_count(Color::Black) as f64
}

/// Own rooks, bishops and queens standing on an open file.
fn open_lines(board: &Board, color: Color) -> i32 {
    let liners = board.by_color(color) & (board.rooks() | board.bishops() | board.queens());
    liners
        .into_iter()
        .filter(|square| is_open_file(board, square.file()))
        .count() as i32
}

/// Weighted mobility composite, white minus black.
///
/// `king_safety` holds each side's king safety (0 where unavailable) and
/// `tactics_diff` the white-minus-black tactics score.
pub fn evaluate(ctx: &EvalContext, king_safety: &ByColor<f64>, tactics_diff: f64) -> f64 {
    let board = ctx.board();
    let band = center_band();
    let diff = |f: &dyn Fn(Color) -> i32| (f(Color::White) - f(Color::Black)) as f64;

    let centralization = diff(&|color| (board.by_color(color) & band).count() as i32);
    // Occupancy of the band seen square by square.
    let center_control = diff(&|color| {
        band.into_iter()
            .filter(|&square| board.color_at(square) == Some(color))
            .count() as i32
    });
    let piece_count = diff(&|color| board.by_color(color).count() as i32);
    let pawn_count = diff(&|color| (board.by_color(color) & board.by_role(Role::Pawn)).count() as i32);
    let open_lines = diff(&|color| open_lines(board, color));

    let w = &MOBILITY_WEIGHTS;
    w.legal_moves * legal_move_diff(ctx)
        + w.centralization * centralization
        + w.center_control * center_control
        + w.piece_count * piece_count
        + w.pawn_count * pawn_count
        + w.open_lines * open_lines
        + w.king_safety * (king_safety.white - king_safety.black)
        + w.tactics * tactics_diff
}

/// Piece activity: legal moves, centralization and central occupancy.
pub fn activity(ctx: &EvalContext) -> f64 {
    let board = ctx.board();
    let center = center4();
    let centralization = (board.by_color(Color::White) & center).count() as f64
        - (board.by_color(Color::Black) & center).count() as f64;
    let occupancy = |color: Color| {
        CENTER4
            .iter()
            .filter(|&&square| board.color_at(square) == Some(color))
            .count() as f64
    };
    let center_control = occupancy(Color::White) - occupancy(Color::Black);

    legal_move_diff(ctx) * ACTIVITY_LEGAL_MOVE_WEIGHT
        + centralization * ACTIVITY_CENTRALIZATION_WEIGHT
        + center_control * ACTIVITY_CENTER_CONTROL_WEIGHT
}
