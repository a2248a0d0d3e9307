// src/game/evaluation/tactics.rs

//! Tactical opportunities and threats, scored per side.

use shakmaty::{ByColor, Color, Piece, Role};

use super::context::EvalContext;
use super::coordination::normalized_diff;
use super::lines::{diagonals_through, is_open_diagonal, is_open_file, pieces_of, relative_rank};
use super::mobility::center_band;
use super::pawn_structure::{offensive_score, PawnReport};
use crate::constants::{
    BALANCE_SHARED_WEIGHT, CHECKMATE_BONUS, CHECK_BONUS, DEFENSE_WEIGHT, OFFENSE_WEIGHT,
};

/// Counts of the attacker/defender patterns found on one side's pieces.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TacticalPatterns {
    pub forks: u32,
    pub king_pressure: u32,
    pub pins: u32,
    pub skewers: u32,
    pub discovered: u32,
}

impl TacticalPatterns {
    pub fn total(&self) -> u32 {
        self.forks + self.king_pressure + self.pins + self.skewers + self.discovered
    }
}

/// Classifies every piece of `color` by enemy attacker count and own defender
/// count.
pub fn patterns(ctx: &EvalContext, color: Color) -> TacticalPatterns {
    let board = ctx.board();
    let mut found = TacticalPatterns::default();

    for square in ctx.pieces(color) {
        let attackers = ctx.attackers(square, !color).count();
        let defenders = ctx.attackers(square, color);

        match (attackers, defenders.count()) {
            (a, 0) if a > 1 => found.forks += 1,
            (a, 1) if a > 1 => {
                if board.role_at(square) == Some(Role::King) {
                    found.king_pressure += 1;
                } else if defenders
                    .first()
                    .and_then(|defender| board.role_at(defender))
                    .map_or(false, |role| role != Role::King)
                {
                    found.pins += 1;
                }
            }
            (1, d) if d > 1 => found.skewers += 1,
            (1, 0) => found.discovered += 1,
            _ => {}
        }
    }

    found
}

/// Terms added identically to both sides' tactics totals.
#[derive(Debug, Clone, Copy, Default)]
pub struct SharedTerms {
    pub legal_moves: f64,
    pub balance: f64,
    pub key_lines: f64,
    pub pawn_structure: f64,
    pub activity_and_coordination: f64,
    pub initiative: f64,
    pub material_imbalance: f64,
}

impl SharedTerms {
    pub fn total(&self) -> f64 {
        self.legal_moves
            + self.balance
            + self.key_lines
            + self.pawn_structure
            + self.activity_and_coordination
            + self.initiative
            + self.material_imbalance
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TacticsScore {
    pub white: f64,
    pub black: f64,
}

impl TacticsScore {
    pub fn diff(&self) -> f64 {
        self.white - self.black
    }
}

/// Hanging pieces, patterns, incoming threats and the check bonus of `color`.
fn side_score(ctx: &EvalContext, color: Color) -> f64 {
    let own = ctx.pieces(color);
    let hanging = own.into_iter().filter(|&sq| ctx.is_attacked_by(!color, sq)).count();
    let threats: usize = own.into_iter().map(|sq| ctx.attackers(sq, !color).count()).sum();

    let mate_bonus = match ctx.checking_side() {
        Some(side) if side == color && ctx.is_checkmate() => CHECKMATE_BONUS,
        Some(side) if side == color => CHECK_BONUS,
        _ => 0.0,
    };

    hanging as f64 + patterns(ctx, color).total() as f64 + threats as f64 + mate_bonus
}

pub fn evaluate(ctx: &EvalContext, shared: &SharedTerms) -> TacticsScore {
    let shared = shared.total();
    TacticsScore {
        white: side_score(ctx, Color::White) + shared,
        black: side_score(ctx, Color::Black) + shared,
    }
}

fn role_score(role: Role) -> f64 {
    match role {
        Role::Queen => 5.0,
        Role::Rook => 3.0,
        Role::Bishop | Role::Knight => 2.0,
        Role::Pawn => 1.0,
        Role::King => 0.0,
    }
}

/// Role scores of `color`'s pieces plus line bonuses for its sliders and
/// centralized knights.
fn line_activity(ctx: &EvalContext, color: Color) -> f64 {
    let board = ctx.board();
    let mut score = 0.0;

    for square in ctx.pieces(color) {
        let Some(role) = board.role_at(square) else {
            continue;
        };
        score += role_score(role);
        let open_file = is_open_file(board, square.file());
        match role {
            Role::Rook => {
                if open_file {
                    score += 0.5;
                }
                if relative_rank(square, color) == 6 {
                    score += 0.5;
                }
            }
            Role::Knight => {
                let file = square.file() as u32;
                let rank = square.rank() as u32;
                if (2..=5).contains(&file) && (2..=5).contains(&rank) {
                    score += 0.5;
                }
            }
            Role::Bishop if is_open_diagonal(board, square) => score += 0.5,
            Role::Queen if open_file || is_open_diagonal(board, square) => score += 0.5,
            _ => {}
        }
    }

    score
}

/// Precomputed composites the balance weighs in.
pub struct BalanceInputs<'a> {
    pub pawns: &'a ByColor<PawnReport>,
    pub pawn_structure: f64,
    pub center: f64,
    pub activity: f64,
    pub king_safety: &'a ByColor<f64>,
}

/// Offense against defense of the side to move.
pub fn defensive_offensive_balance(ctx: &EvalContext, inputs: &BalanceInputs) -> f64 {
    let board = ctx.board();
    let color = ctx.turn();
    let activity = line_activity(ctx, color);

    let offense = activity + offensive_score(board, color, inputs.pawns.get(color));

    let king_attackers = board
        .king_of(color)
        .map_or(0, |king| ctx.attackers(king, !color).count()) as f64;
    let king_threats = board.king_of(!color).map_or(0.0, |king| {
        let reach = ctx.attacks(king);
        let guards: f64 = (reach & ctx.pieces(!color))
            .into_iter()
            .filter_map(|square| board.role_at(square))
            .map(|role| role_score(role) * 2.0)
            .sum();
        reach.count() as f64 + guards
    });
    let defense = king_attackers
        + (activity + inputs.pawn_structure)
        + inputs.pawn_structure
        + *inputs.king_safety.get(color)
        + king_threats;

    OFFENSE_WEIGHT * offense - DEFENSE_WEIGHT * defense
        + BALANCE_SHARED_WEIGHT * inputs.pawn_structure
        + BALANCE_SHARED_WEIGHT * inputs.center
        + BALANCE_SHARED_WEIGHT * inputs.activity
}

/// Pawns and rooks on files, pieces sharing diagonals, and piece count.
pub fn key_lines_control(ctx: &EvalContext) -> f64 {
    let board = ctx.board();
    let control = |color: Color| -> usize {
        let own = ctx.pieces(color);
        let pawns = pieces_of(board, Role::Pawn, color).count();
        let rooks = board.by_piece(Piece { role: Role::Rook, color }).count();
        let diagonals: usize = own
            .into_iter()
            .map(|square| (diagonals_through(square) & own).count())
            .sum();
        pawns + 2 * rooks + diagonals + own.count()
    };
    control(Color::White) as f64 - control(Color::Black) as f64
}

/// Piece presence with a bonus inside the center band, normalized.
pub fn activity_and_coordination(ctx: &EvalContext) -> f64 {
    let band = center_band();
    let total = |color: Color| -> f64 {
        ctx.pieces(color)
            .into_iter()
            .map(|square| 1.0 + if band.contains(square) { 0.5 } else { 0.0 } + 0.5)
            .sum()
    };
    normalized_diff(ByColor { white: total(Color::White), black: total(Color::Black) })
}

