//! Initiative and tempo.
//!
//! Each side is scored on development, key-square control, threats,
//! flexibility, king safety, pawn weaknesses, how it uses the initiative and
//! its tempo; the metric is the white total minus the black total.

use shakmaty::{ByColor, Color, Piece, Position, Role, Square};

use super::context::EvalContext;
use super::coordination::key_square_control;
use super::lines::square_at;
use super::pawn_structure::PawnReport;
use super::{development, piece_value};
use crate::constants::{CENTER4, CHECKING_MOVE_BONUS, PER_MOVE_TEMPO, TACTICAL_CAPTURE_BONUS};

/// White initiative minus black initiative.
pub fn evaluate(ctx: &EvalContext, king_safety: &ByColor<f64>, pawns: &ByColor<PawnReport>) -> f64 {
    score(ctx, Color::White, king_safety.white, &pawns.white)
        - score(ctx, Color::Black, king_safety.black, &pawns.black)
}

pub fn score(ctx: &EvalContext, color: Color, king_safety: f64, pawns: &PawnReport) -> f64 {
    development::evaluate(ctx, color)
        + key_square_control(ctx, color)
        + threat_presence(ctx, color)
        + flexibility(ctx, color)
        + king_safety
        + pawns.penalty_score()
        + utilization(ctx, color)
        + tempo_advantage(ctx, color)
}

fn threat_presence(ctx: &EvalContext, color: Color) -> f64 {
    let board = ctx.board();
    let mut score = 0.0;

    for square in Square::ALL {
        score += 0.1 * ctx.attackers(square, color).count() as f64;
    }

    for square in ctx.pieces(!color) {
        if let Some(role) = board.role_at(square) {
            score += piece_value(role) as f64 * 0.2 * ctx.attackers(square, color).count() as f64;
        }
    }

    if ctx.turn() == color {
        if let Some(pos) = ctx.position() {
            for m in ctx.legal_moves(color) {
                // Played on a clone; the evaluated position is left untouched.
                let mut after = pos.clone();
                after.play_unchecked(*m);
                if after.is_check() {
                    score += CHECKING_MOVE_BONUS;
                }
                if matches!(m.capture(), Some(Role::Knight | Role::Rook | Role::Queen)) {
                    score += TACTICAL_CAPTURE_BONUS;
                }
            }
        }
    }

    score
}

fn flexibility(ctx: &EvalContext, color: Color) -> f64 {
    let board = ctx.board();
    let own = ctx.pieces(color);
    let mut score = 0.0;

    for square in own {
        let attacks = ctx.attacks(square);
        score += attacks.count() as f64;
        score += 0.5 * (attacks & own).count() as f64;
    }

    score += CENTER4.iter().filter(|&&square| own.contains(square)).count() as f64;

    for square in own & board.pawns() {
        let file = square.file() as i32;
        let rank = square.rank() as i32;
        for side in [file - 1, file + 1] {
            if let Some(beside) = square_at(side, rank) {
                if board.piece_at(beside).is_none() {
                    score += 0.5;
                }
            }
        }
    }

    score
}

fn utilization(ctx: &EvalContext, color: Color) -> f64 {
    let board = ctx.board();
    let own = ctx.pieces(color);
    let to_play = ctx.moves_to_play() as f64;
    let mut score = 0.0;

    for square in own {
        score += to_play * PER_MOVE_TEMPO;
        if let Some(role) = board.role_at(square) {
            let different = own & !board.by_role(role);
            score += 0.1 * different.count() as f64;
        }
    }

    for square in ctx.pieces(!color) {
        if ctx.is_attacked_by(color, square) {
            score += 0.5;
        }
    }
    if let Some(king) = board.king_of(!color) {
        if ctx.is_attacked_by(color, king) {
            score += 1.0;
        }
    }

    score += 0.5 * CENTER4.iter().filter(|&&square| own.contains(square)).count() as f64;

    // Every move hands the turn over, so only the waiting side regains it.
    if ctx.turn() != color {
        score += to_play * PER_MOVE_TEMPO;
    }

    score
}

/// Home square of a piece that develops first, mirrored for black.
fn tempo_home_square(role: Role, color: Color) -> Option<Square> {
    let white = match role {
        Role::Pawn => Square::E2,
        Role::Knight => Square::G1,
        Role::Bishop => Square::F1,
        Role::Queen => Square::D1,
        Role::Rook => Square::H1,
        Role::King => return None,
    };
    Some(match color {
        Color::White => white,
        Color::Black => white.flip_vertical(),
    })
}

fn tempo_advantage(ctx: &EvalContext, color: Color) -> f64 {
    let board = ctx.board();
    let to_play = ctx.moves_to_play() as f64;
    let mut score = 0.0;

    for square in ctx.pieces(color) {
        score += to_play * PER_MOVE_TEMPO;
        for target in ctx.attacks(square) {
            score += match board.color_at(target) {
                Some(c) if c != color => 0.1,
                _ => 0.05,
            };
        }
    }

    for role in [Role::Pawn, Role::Knight, Role::Bishop, Role::Queen, Role::Rook] {
        if let Some(home) = tempo_home_square(role, color) {
            if board.piece_at(home) == Some(Piece { role, color }) {
                score += 0.5;
            }
        }
    }

    score
}
