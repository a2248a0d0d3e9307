// src/game/evaluation/center.rs

//! Control of the center.

use shakmaty::{Color, Role};

use super::context::EvalContext;
use crate::constants::{
    CENTER4, CENTER_ATTACKER_WEIGHT, CENTER_CONTESTED_BONUS, CENTER_PAWN_BONUS, CENTER_RING,
    CENTER_RING_CONTROL,
};

/// White center control minus black center control.
pub fn evaluate(ctx: &EvalContext) -> f64 {
    control(ctx, Color::White) - control(ctx, Color::Black)
}

pub fn control(ctx: &EvalContext, color: Color) -> f64 {
    let mut score = 0.0;

    for &square in &CENTER4 {
        score += ctx.attackers(square, color).count() as f64 * CENTER_ATTACKER_WEIGHT;
    }

    for &square in &CENTER_RING {
        if ctx.is_attacked_by(color, square) {
            score += CENTER_RING_CONTROL;
        }
    }

    for &square in &CENTER4 {
        if let Some(piece) = ctx.piece_at(square) {
            if piece.color != color {
                continue;
            }
            if piece.role == Role::Pawn {
                score += CENTER_PAWN_BONUS;
            }
            // Pieces holding a contested central post.
            if ctx.is_attacked_by(!color, square) {
                score += CENTER_CONTESTED_BONUS;
            }
        }
    }

    score
}
