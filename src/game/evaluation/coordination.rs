// src/game/evaluation/coordination.rs

//! Piece coordination: ten harmony factors plus per-piece support.

use shakmaty::{Bitboard, ByColor, Color, File, Rank, Role, Square};

use super::context::EvalContext;
use super::lines::{is_open_file, is_pinned, on_enemy_line, relative_rank};
use super::material::role_number_sum;
use super::mobility::{center_band, key_ranks};
use super::pawn_structure::PawnReport;
use super::{piece_value, pst};
use crate::constants::{
    CENTER4, CENTRAL_SUPPORT_WEIGHTS, IDEAL_ROOK_SQUARES, KEY_SQUARE_WEIGHTS, OUTER_CENTER,
    PAWN_BREAK_SQUARES,
};

const CORNERS: [Square; 4] = [Square::A1, Square::A8, Square::H1, Square::H8];

fn value(role: Role) -> f64 {
    piece_value(role) as f64
}

fn in_center4(square: Square) -> bool {
    CENTER4.contains(&square)
}

fn in_outer_center(square: Square) -> bool {
    OUTER_CENTER.contains(&square)
}

/// Weight of a piece when it controls a key square.
fn key_piece_weight(role: Role) -> f64 {
    match role {
        Role::Pawn => 0.1,
        Role::Knight | Role::Bishop => 0.3,
        Role::Rook => 0.5,
        Role::Queen => 0.9,
        Role::King => 0.2,
    }
}

/// White coordination minus black coordination, each normalized by the
/// larger of the two.
pub fn evaluate(ctx: &EvalContext, pawns: &ByColor<PawnReport>) -> f64 {
    let totals = ByColor {
        white: harmony(ctx, Color::White, &pawns.white) + support(ctx, Color::White),
        black: harmony(ctx, Color::Black, &pawns.black) + support(ctx, Color::Black),
    };
    normalized_diff(totals)
}

/// `white - black` after dividing both by `max(white, black)`; the division is
/// skipped when that maximum is zero.
pub fn normalized_diff(totals: ByColor<f64>) -> f64 {
    let max = totals.white.max(totals.black);
    if max != 0.0 {
        totals.white / max - totals.black / max
    } else {
        totals.white - totals.black
    }
}

pub fn harmony(ctx: &EvalContext, color: Color, pawns: &PawnReport) -> f64 {
    color_coordination(ctx, color)
        + key_square_control(ctx, color)
        + central_support(ctx, color)
        + rook_coordination(ctx, color)
        + pawns.penalty_score()
        + threat_coordination(ctx, color)
        + mobility_coordination(ctx, color)
        + piece_value_awareness(ctx, color)
        + positional_features(ctx, color)
        + tactical_utilization(ctx, color)
}

fn color_coordination(ctx: &EvalContext, color: Color) -> f64 {
    let board = ctx.board();
    let own = ctx.pieces(color);
    let key = key_ranks();
    let mut score = 0.0;

    for square in own {
        let Some(role) = board.role_at(square) else {
            continue;
        };
        let v = value(role);
        let attacks = ctx.attacks(square);

        for target in attacks & own {
            if let Some(target_role) = board.role_at(target) {
                score += v * value(target_role);
            }
        }
        for other in own.without(square) {
            score += v / (square.distance(other) as f64 + 1.0);
        }
        if in_center4(square) {
            score += v * 0.5;
        }
        if key.contains(square) {
            score += v * 0.3;
        }
        score += v * attacks.count() as f64 / 8.0;
    }

    let count = own.count();
    if count > 1 {
        score /= count as f64;
    }
    score
}

/// Weighted control of the key squares by `color`'s attackers.
pub fn key_square_control(ctx: &EvalContext, color: Color) -> f64 {
    let board = ctx.board();
    KEY_SQUARE_WEIGHTS
        .iter()
        .map(|&(square, weight)| {
            ctx.attackers(square, color)
                .into_iter()
                .filter_map(|attacker| board.role_at(attacker))
                .map(|role| key_piece_weight(role) * weight)
                .sum::<f64>()
        })
        .sum()
}

fn central_support(ctx: &EvalContext, color: Color) -> f64 {
    let board = ctx.board();
    let mut score = 0.0;

    for &(square, weight) in &CENTRAL_SUPPORT_WEIGHTS {
        let attackers: Vec<(Square, f64)> = ctx
            .attackers(square, color)
            .into_iter()
            .filter_map(|attacker| board.role_at(attacker).map(|role| (attacker, value(role))))
            .collect();

        for &(attacker, v) in &attackers {
            score += v * weight / (1.0 + attacker.distance(square) as f64);
        }
        for (i, &(_, v1)) in attackers.iter().enumerate() {
            for (j, &(_, v2)) in attackers.iter().enumerate() {
                if i != j {
                    score += (v1 + v2) * 0.1;
                }
            }
        }
    }

    score
}

fn rook_coordination(ctx: &EvalContext, color: Color) -> f64 {
    let board = ctx.board();
    let own_rooks = board.by_color(color) & board.rooks();
    let own_pawns = board.by_color(color) & board.pawns();
    let mut score = 0.0;

    score += IDEAL_ROOK_SQUARES.iter().filter(|&&sq| own_rooks.contains(sq)).count() as f64;

    let home_ranks = Bitboard::from_rank(Rank::First)
        | Bitboard::from_rank(Rank::Second)
        | Bitboard::from_rank(Rank::Seventh)
        | Bitboard::from_rank(Rank::Eighth);
    for file in File::ALL {
        if !(own_rooks & home_ranks & Bitboard::from_file(file)).is_empty() {
            score += 0.5;
        }
    }

    score += 0.2 * PAWN_BREAK_SQUARES.iter().filter(|&&sq| own_pawns.contains(sq)).count() as f64;

    score += 0.5
        * ctx
            .legal_moves(color)
            .iter()
            .filter(|m| m.role() == Role::Rook)
            .filter(|m| m.from().map_or(false, |from| IDEAL_ROOK_SQUARES.contains(&from)))
            .count() as f64;

    score -= 0.5
        * IDEAL_ROOK_SQUARES
            .iter()
            .filter(|&&sq| ctx.is_attacked_by(!color, sq))
            .count() as f64;

    score
}

fn threat_coordination(ctx: &EvalContext, color: Color) -> f64 {
    let board = ctx.board();
    let own = board.by_color(color);
    let mut score = 0.0;

    for square in own & !board.pawns() & !board.kings() {
        if in_center4(square) {
            score += 0.5;
        } else if in_outer_center(square) {
            score += 0.3;
        }
    }

    for square in own & board.pawns() {
        let file = square.file() as u32;
        let rank = relative_rank(square, color);
        if (2..=5).contains(&file) && (3..=6).contains(&rank) {
            score += 0.2;
        } else if rank >= 5 {
            score += 0.1;
        }
    }

    score
}

fn mobility_coordination(ctx: &EvalContext, color: Color) -> f64 {
    let board = ctx.board();
    let own = board.by_color(color);
    let mut score = 0.0;

    for square in own & !board.pawns() & !board.kings() {
        score += ctx.attacks(square).count() as f64;
    }
    for square in own {
        if in_center4(square) {
            score += 0.5;
        } else if in_outer_center(square) {
            score += 0.3;
        }
    }

    score
}

fn piece_value_awareness(ctx: &EvalContext, color: Color) -> f64 {
    let board = ctx.board();
    let mut score = 0.0;

    for role in Role::ALL {
        let ours = board.by_color(color) & board.by_role(role);
        let theirs = board.by_color(!color) & board.by_role(role);

        for square in ours {
            for enemy in theirs {
                // Same kind on both sides: the value difference is always zero.
                if in_center4(enemy) {
                    score += 0.5;
                }
                match role {
                    Role::Knight if CORNERS.contains(&enemy) => score -= 0.5,
                    Role::Bishop if is_pinned(board, square, color) => score -= 0.5,
                    Role::Rook => {
                        if is_open_file(board, square.file()) {
                            score += 0.5;
                        }
                        if is_pinned(board, square, color) {
                            score -= 0.5;
                        }
                    }
                    Role::Queen => {
                        if in_center4(square) {
                            score += 1.0;
                        }
                        if ctx.is_attacked_by(!color, square) {
                            score -= 1.0;
                        }
                    }
                    _ => {}
                }
            }
        }
    }

    score
}

fn positional_features(ctx: &EvalContext, color: Color) -> f64 {
    let board = ctx.board();
    let mut score = (role_number_sum(board, color) - role_number_sum(board, !color)) as f64;

    for role in [Role::Pawn, Role::Knight] {
        let pieces = board.by_color(color) & board.by_role(role);
        let count = pieces.count();
        let Some(scale) = pst::scale(role) else {
            continue;
        };
        if count == 0 {
            continue;
        }
        for square in pieces {
            if let Some(entry) = pst::value(role, color, square) {
                score += entry as f64 * scale / count as f64;
            }
        }
    }

    score
}

fn tactical_utilization(ctx: &EvalContext, color: Color) -> f64 {
    let board = ctx.board();
    let own = board.by_color(color);
    let mut score = 0.0;

    for square in own {
        if ctx.is_attacked_by(!color, square) {
            score += 0.2;
        }
        if on_enemy_line(board, square, color) {
            score += 0.3;
        }
        score += 0.4 * (ctx.attacks(square) & !own).count() as f64;
    }

    if ctx.is_checkmate() {
        score += 1.0;
    } else if ctx.is_check() {
        score += 0.5;
    }

    score
}

/// Support of every own piece: defenders against attackers, placement and a
/// mobility bonus.
fn support(ctx: &EvalContext, color: Color) -> f64 {
    let board = ctx.board();
    let band = center_band();
    let key = key_ranks();
    let mut score = 0.0;

    for square in ctx.pieces(color) {
        let Some(role) = board.role_at(square) else {
            continue;
        };
        let defenders = ctx.attackers(square, color).count() as f64;
        let attackers = ctx.attackers(square, !color).count() as f64;
        let mut value = defenders - attackers;

        if band.contains(square) {
            value += 0.5;
        }
        if key.contains(square) {
            value += 0.5;
        }
        if attackers > 0.0 && defenders == 0.0 {
            value -= 0.5;
        }
        value += mobility_bonus(ctx, role, color, square);
        score += value;
    }

    score
}

fn mobility_bonus(ctx: &EvalContext, role: Role, color: Color, square: Square) -> f64 {
    let reach = ctx.attacks(square).count() as f64;
    match role {
        Role::Knight => 0.1 * reach,
        Role::Bishop => 0.05 * reach,
        Role::Rook => 0.03 * reach,
        Role::Queen => 0.07 * reach,
        Role::Pawn if relative_rank(square, color) == 3 => 0.5,
        _ => 0.0,
    }
}
