// src/game/evaluation/pawn_structure.rs

use shakmaty::attacks::pawn_attacks;
use shakmaty::{Bitboard, Board, ByColor, Color, File, Role, Square};

use super::lines::{forward, neighbours, pieces_of, relative_rank, square_at};
use crate::constants::{
    PAWN_BREAK_WEIGHT, PAWN_CHAIN_WEIGHT, PAWN_MOBILITY_WEIGHT, PAWN_PENALTY_WEIGHT,
};

/// Per-color pawn facts shared by several composites.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PawnReport {
    pub isolated: i32,
    pub doubled: i32,
    pub backward: i32,
    /// Lengths of all pawn chains summed.
    pub chain_length: i32,
    /// Sum of pawn attack-set sizes.
    pub mobility: i32,
    pub breaks: i32,
    pub passed: i32,
}

impl PawnReport {
    pub fn compute(board: &Board, color: Color) -> Self {
        let our_pawns = pieces_of(board, Role::Pawn, color);
        let their_pawns = pieces_of(board, Role::Pawn, !color);
        let chains = pawn_chains(our_pawns);

        Self {
            isolated: count_isolated_pawns(our_pawns),
            doubled: count_doubled_pawns(our_pawns),
            backward: count_backward_pawns(color, our_pawns),
            chain_length: chains.iter().map(|chain| chain.count() as i32).sum(),
            mobility: our_pawns
                .into_iter()
                .map(|square| pawn_attacks(color, square).count() as i32)
                .sum(),
            breaks: count_pawn_breaks(board, color, our_pawns),
            passed: count_passed_pawns(color, our_pawns, their_pawns),
        }
    }

    /// Isolated, doubled and backward pawns, each a penalty of 1.0.
    pub fn penalty_score(&self) -> f64 {
        -(self.isolated + self.doubled + self.backward) as f64
    }
}

/// The weighted pawn-structure composite, white minus black.
pub fn evaluate(reports: &ByColor<PawnReport>) -> f64 {
    let white = &reports.white;
    let black = &reports.black;
    PAWN_PENALTY_WEIGHT * (white.penalty_score() - black.penalty_score())
        + PAWN_CHAIN_WEIGHT * (white.chain_length - black.chain_length) as f64
        + PAWN_MOBILITY_WEIGHT * (white.mobility - black.mobility) as f64
        + PAWN_BREAK_WEIGHT * (white.breaks - black.breaks) as f64
}

/// `pawn_structure_strength`: the chain-length sum of one color.
pub fn strength(report: &PawnReport) -> f64 {
    report.chain_length as f64
}

/// Pawn score used by the offensive side of the tactics balance.
pub fn offensive_score(board: &Board, color: Color, report: &PawnReport) -> f64 {
    let our_pawns = pieces_of(board, Role::Pawn, color);
    let loose = our_pawns
        .into_iter()
        .filter(|&square| {
            let file = square.file() as i32;
            let rank = square.rank() as i32;
            (1..7).contains(&file)
                && [file - 1, file + 1].iter().all(|&side| {
                    square_at(side, rank).map_or(true, |sq| board.piece_at(sq).is_none())
                })
        })
        .count();
    let near_king = board
        .king_of(color)
        .map_or(0, |king| (our_pawns & neighbours(king)).count());

    -0.5 * report.doubled as f64 - 0.5 * loose as f64
        + 0.5 * report.passed as f64
        + 0.1 * report.mobility as f64
        + 0.2 * near_king as f64
}

fn adjacent_files(file: File) -> Bitboard {
    let index = file as u32;
    let mut files = Bitboard::EMPTY;
    if index > 0 {
        files |= Bitboard::from_file(File::new(index - 1));
    }
    if index < 7 {
        files |= Bitboard::from_file(File::new(index + 1));
    }
    files
}

fn count_doubled_pawns(our_pawns: Bitboard) -> i32 {
    let mut doubled_pawns = 0;
    for file in File::ALL {
        let pawns_on_file = (our_pawns & Bitboard::from_file(file)).count();
        if pawns_on_file > 1 {
            doubled_pawns += pawns_on_file - 1;
        }
    }
    doubled_pawns as i32
}

fn count_isolated_pawns(our_pawns: Bitboard) -> i32 {
    our_pawns
        .into_iter()
        .filter(|square| (our_pawns & adjacent_files(square.file())).is_empty())
        .count() as i32
}

/// Pawns with neighbours on adjacent files, all of them further advanced.
fn count_backward_pawns(color: Color, our_pawns: Bitboard) -> i32 {
    our_pawns
        .into_iter()
        .filter(|&square| {
            let neighbours = our_pawns & adjacent_files(square.file());
            let own_rank = relative_rank(square, color);
            !neighbours.is_empty()
                && neighbours
                    .into_iter()
                    .all(|other| relative_rank(other, color) > own_rank)
        })
        .count() as i32
}

/// Pawns on their start rank whose double step is still available.
fn count_pawn_breaks(board: &Board, color: Color, our_pawns: Bitboard) -> i32 {
    let occupied = board.occupied();
    our_pawns
        .into_iter()
        .filter(|&square| {
            let file = square.file() as i32;
            let rank = square.rank() as i32;
            relative_rank(square, color) == 1
                && [1, 2].iter().all(|&step| {
                    square_at(file, rank + step * forward(color))
                        .map_or(false, |sq| !occupied.contains(sq))
                })
        })
        .count() as i32
}

fn count_passed_pawns(color: Color, our_pawns: Bitboard, their_pawns: Bitboard) -> i32 {
    our_pawns
        .into_iter()
        .filter(|&square| {
            let in_front_files = Bitboard::from_file(square.file()) | adjacent_files(square.file());
            let own_rank = relative_rank(square, color);
            (their_pawns & in_front_files)
                .into_iter()
                .all(|blocker| relative_rank(blocker, color) <= own_rank)
        })
        .count() as i32
}

/// Connected components of `pawns` under 8-directional adjacency.
///
/// Iterative flood fill; `visited` guards against revisiting a square.
pub fn pawn_chains(pawns: Bitboard) -> Vec<Bitboard> {
    let mut chains = Vec::new();
    let mut visited = Bitboard::EMPTY;

    for start in pawns {
        if visited.contains(start) {
            continue;
        }
        let mut chain = Bitboard::EMPTY;
        let mut stack: Vec<Square> = vec![start];
        visited.add(start);

        while let Some(square) = stack.pop() {
            chain.add(square);
            for next in neighbours(square) & pawns & !visited {
                visited.add(next);
                stack.push(next);
            }
        }
        chains.push(chain);
    }

    chains
}
