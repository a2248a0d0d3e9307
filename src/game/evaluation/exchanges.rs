// src/game/evaluation/exchanges.rs

//! Exchange potential and the material-imbalance term built on it.

use shakmaty::{ByColor, Color, Role, Square};

use super::context::EvalContext;
use super::lines::is_open_file;
use super::{material, piece_value};
use crate::constants::{CENTER4, KING_IMPACT_VALUE};

const KNIGHT_OUTPOSTS: [Square; 4] = [Square::C3, Square::F3, Square::C6, Square::F6];
const LONG_DIAGONAL_POSTS: [Square; 4] = [Square::B2, Square::G2, Square::B7, Square::G7];

fn exchange_bonus(ctx: &EvalContext, role: Role, square: Square) -> f64 {
    match role {
        Role::Pawn if CENTER4.contains(&square) => 0.5,
        Role::Knight if KNIGHT_OUTPOSTS.contains(&square) => 0.5,
        Role::Bishop if LONG_DIAGONAL_POSTS.contains(&square) => 0.5,
        Role::Rook if is_open_file(ctx.board(), square.file()) => 1.0,
        Role::Queen if CENTER4.contains(&square) => 1.0,
        _ => 0.0,
    }
}

/// Sum over every capture-shaped contact of `color`'s pieces: target value
/// minus own value, plus a placement bonus for the attacker.
pub fn piece_exchange(ctx: &EvalContext, color: Color) -> f64 {
    let board = ctx.board();
    let mut score = 0.0;

    for square in ctx.pieces(color) {
        let Some(role) = board.role_at(square) else {
            continue;
        };
        let targets = ctx.attacks(square) & board.occupied();
        for target in targets {
            if let Some(target_role) = board.role_at(target) {
                score += (piece_value(target_role) - piece_value(role)) as f64
                    + exchange_bonus(ctx, role, square);
            }
        }
    }

    score
}

/// Composites folded into every piece of the material-impact term.
#[derive(Debug, Clone, Copy)]
pub struct ImpactInputs {
    pub pawn_structure: f64,
    pub coordination: f64,
    pub king_safety: ByColor<f64>,
}

fn impact_value(role: Role) -> f64 {
    match role {
        Role::King => KING_IMPACT_VALUE as f64,
        role => piece_value(role) as f64,
    }
}

pub fn material_impact(ctx: &EvalContext, color: Color, inputs: &ImpactInputs) -> f64 {
    let board = ctx.board();
    let king_safety = *inputs.king_safety.get(color);

    ctx.pieces(color)
        .into_iter()
        .filter_map(|square| board.role_at(square).map(|role| (square, role)))
        .map(|(square, role)| {
            let attacks = ctx.attacks(square);
            impact_value(role)
                + attacks.count() as f64
                + (attacks & !board.occupied()).count() as f64
                + inputs.pawn_structure
                + inputs.coordination
                + king_safety
        })
        .sum()
}

/// White minus black over totals, imbalance, values, placement, exchanges and
/// material impact.
pub fn material_imbalance(ctx: &EvalContext, inputs: &ImpactInputs) -> f64 {
    let side = |color: Color| {
        let board = ctx.board();
        let own = material::total(board, color) as f64;
        let enemy = material::total(board, !color) as f64;
        own + (own - enemy)
            + own
            + material::placement(board, color)
            + piece_exchange(ctx, color)
            + material_impact(ctx, color, inputs)
    };
    side(Color::White) - side(Color::Black)
}
