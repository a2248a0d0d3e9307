// src/game/evaluation/material.rs

use shakmaty::{Board, Color, Role};

use super::piece_value;

/// White material minus black material, pieces valued 1/3/3/5/9/0.
pub fn evaluate(board: &Board) -> f64 {
    (total(board, Color::White) - total(board, Color::Black)) as f64
}

/// Sum of the canonical values of `color`'s pieces.
pub fn total(board: &Board, color: Color) -> i32 {
    Role::ALL
        .iter()
        .map(|&role| piece_value(role) * (board.by_color(color) & board.by_role(role)).count() as i32)
        .sum()
}

/// Sum of own piece values; the `piece_placement` metric.
pub fn placement(board: &Board, color: Color) -> f64 {
    total(board, color) as f64
}

/// Sum of role numbers (pawn 1 through king 6) for `color`.
pub fn role_number_sum(board: &Board, color: Color) -> i32 {
    board
        .by_color(color)
        .into_iter()
        .filter_map(|square| board.role_at(square))
        .map(|role| role as i32)
        .sum()
}
