//! Evaluation of a chess position.
//!
//! A position is broken down into twelve named scores. Leaf facts (attack
//! sets, legal moves, pawn reports, king safety) are computed once per call
//! and handed to the composites that need them.

pub mod center;
pub mod context;
pub mod coordination;
pub mod development;
pub mod exchanges;
pub mod initiative;
pub mod king_safety;
pub mod lines;
pub mod material;
pub mod mobility;
pub mod pawn_structure;
pub mod pst;
pub mod tactics;

use serde::{Deserialize, Serialize};
use shakmaty::{ByColor, Chess, Color, Role, Setup};
use tracing::debug;

use self::context::EvalContext;
use self::exchanges::ImpactInputs;
use self::pawn_structure::PawnReport;
use self::tactics::{BalanceInputs, SharedTerms};
use crate::constants::{BISHOP_VALUE, KNIGHT_VALUE, PAWN_VALUE, QUEEN_VALUE, ROOK_VALUE};

pub fn piece_value(role: Role) -> i32 {
    match role {
        Role::Pawn => PAWN_VALUE,
        Role::Knight => KNIGHT_VALUE,
        Role::Bishop => BISHOP_VALUE,
        Role::Rook => ROOK_VALUE,
        Role::Queen => QUEEN_VALUE,
        Role::King => 0,
    }
}

/// Names of the twelve scores of a [`ScoreBreakdown`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    MaterialBalance,
    PieceMobility,
    PieceCoordination,
    PawnStructure,
    KingSafety,
    ControlOfCenter,
    PieceActivity,
    SpaceControl,
    PawnStructureStrength,
    PiecePlacement,
    PieceExchange,
    Tempo,
}

impl Metric {
    pub const ALL: [Metric; 12] = [
        Metric::MaterialBalance,
        Metric::PieceMobility,
        Metric::PieceCoordination,
        Metric::PawnStructure,
        Metric::KingSafety,
        Metric::ControlOfCenter,
        Metric::PieceActivity,
        Metric::SpaceControl,
        Metric::PawnStructureStrength,
        Metric::PiecePlacement,
        Metric::PieceExchange,
        Metric::Tempo,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Metric::MaterialBalance => "material_balance",
            Metric::PieceMobility => "piece_mobility",
            Metric::PieceCoordination => "piece_coordination",
            Metric::PawnStructure => "pawn_structure",
            Metric::KingSafety => "king_safety",
            Metric::ControlOfCenter => "control_of_center",
            Metric::PieceActivity => "piece_activity",
            Metric::SpaceControl => "space_control",
            Metric::PawnStructureStrength => "pawn_structure_strength",
            Metric::PiecePlacement => "piece_placement",
            Metric::PieceExchange => "piece_exchange",
            Metric::Tempo => "tempo",
        }
    }
}

/// Scores of one position seen from one color.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub material_balance: f64,
    pub piece_mobility: f64,
    pub piece_coordination: f64,
    pub pawn_structure: f64,
    pub king_safety: f64,
    pub control_of_center: f64,
    pub piece_activity: f64,
    /// Reserved, always 0.
    pub space_control: f64,
    pub pawn_structure_strength: f64,
    pub piece_placement: f64,
    pub piece_exchange: f64,
    pub tempo: f64,
}

impl ScoreBreakdown {
    pub fn get(&self, metric: Metric) -> f64 {
        match metric {
            Metric::MaterialBalance => self.material_balance,
            Metric::PieceMobility => self.piece_mobility,
            Metric::PieceCoordination => self.piece_coordination,
            Metric::PawnStructure => self.pawn_structure,
            Metric::KingSafety => self.king_safety,
            Metric::ControlOfCenter => self.control_of_center,
            Metric::PieceActivity => self.piece_activity,
            Metric::SpaceControl => self.space_control,
            Metric::PawnStructureStrength => self.pawn_structure_strength,
            Metric::PiecePlacement => self.piece_placement,
            Metric::PieceExchange => self.piece_exchange,
            Metric::Tempo => self.tempo,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (Metric, f64)> + '_ {
        Metric::ALL.into_iter().map(move |metric| (metric, self.get(metric)))
    }

    /// Mean of all twelve scores.
    pub fn mean(&self) -> f64 {
        self.mean_of(&Metric::ALL)
    }

    /// Mean of the chosen scores; 0 for an empty selection.
    pub fn mean_of(&self, metrics: &[Metric]) -> f64 {
        if metrics.is_empty() {
            return 0.0;
        }
        metrics.iter().map(|&metric| self.get(metric)).sum::<f64>() / metrics.len() as f64
    }
}

/// Evaluates a legal position from `color`'s point of view.
pub fn evaluate(pos: &Chess, color: Color) -> ScoreBreakdown {
    evaluate_context(&EvalContext::from_position(pos), color)
}

/// Evaluates a raw setup, which need not be a legal position (a side may be
/// missing its king).
pub fn evaluate_setup(setup: &Setup, color: Color) -> ScoreBreakdown {
    evaluate_context(&EvalContext::from_setup(setup), color)
}

/// White-relative composites and per-color leaf results of one position.
#[derive(Debug, Clone)]
pub(crate) struct Composites {
    pub king_safety: ByColor<Option<f64>>,
    pub pawns: ByColor<PawnReport>,
    pub pawn_structure: f64,
    pub center: f64,
    pub activity: f64,
    pub coordination: f64,
    pub tempo: f64,
    pub mobility: f64,
}

impl Composites {
    pub fn compute(ctx: &EvalContext) -> Self {
        let board = ctx.board();

        let king_safety = ByColor {
            white: king_safety::evaluate(ctx, Color::White),
            black: king_safety::evaluate(ctx, Color::Black),
        };
        let safety = ByColor {
            white: king_safety.white.unwrap_or(0.0),
            black: king_safety.black.unwrap_or(0.0),
        };

        let pawns = ByColor {
            white: PawnReport::compute(board, Color::White),
            black: PawnReport::compute(board, Color::Black),
        };
        let pawn_structure = pawn_structure::evaluate(&pawns);
        let center = center::evaluate(ctx);
        let activity = mobility::activity(ctx);
        let coordination = coordination::evaluate(ctx, &pawns);
        let tempo = initiative::evaluate(ctx, &safety, &pawns);

        let balance = tactics::defensive_offensive_balance(
            ctx,
            &BalanceInputs { pawns: &pawns, pawn_structure, center, activity, king_safety: &safety },
        );
        let material_imbalance = exchanges::material_imbalance(
            ctx,
            &ImpactInputs { pawn_structure, coordination, king_safety: safety },
        );
        let shared = SharedTerms {
            legal_moves: ctx.moves_to_play() as f64,
            balance,
            key_lines: tactics::key_lines_control(ctx),
            pawn_structure,
            activity_and_coordination: tactics::activity_and_coordination(ctx),
            initiative: tempo,
            material_imbalance,
        };
        let tactics = tactics::evaluate(ctx, &shared);
        let mobility = mobility::evaluate(ctx, &safety, tactics.diff());

        Self {
            king_safety,
            pawns,
            pawn_structure,
            center,
            activity,
            coordination,
            tempo,
            mobility,
        }
    }
}

pub fn evaluate_context(ctx: &EvalContext, color: Color) -> ScoreBreakdown {
    let board = ctx.board();
    let composites = Composites::compute(ctx);
    let sign = match color {
        Color::White => 1.0,
        Color::Black => -1.0,
    };

    let king_safety = match *composites.king_safety.get(color) {
        Some(score) => score,
        None => {
            debug!(?color, "king safety unavailable: no king on the board");
            0.0
        }
    };

    ScoreBreakdown {
        material_balance: sign * material::evaluate(board),
        piece_mobility: sign * composites.mobility,
        piece_coordination: sign * composites.coordination,
        pawn_structure: sign * composites.pawn_structure,
        king_safety,
        control_of_center: sign * composites.center,
        piece_activity: sign * composites.activity,
        space_control: 0.0,
        pawn_structure_strength: pawn_structure::strength(composites.pawns.get(color)),
        piece_placement: material::placement(board, color),
        piece_exchange: exchanges::piece_exchange(ctx, color),
        tempo: sign * composites.tempo,
    }
}

#[cfg(test)]
pub mod tests;
