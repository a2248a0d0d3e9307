//! Piece-square tables for the positional-features term.
//!
//! The values are from the [Chess Programming Wiki](https://www.chessprogramming.org/Simplified_Evaluation_Function).
//! Row 0 is the opponent's back rank as seen from white.

use shakmaty::{Color, Role, Square};

use crate::constants::{KNIGHT_PST_SCALE, PAWN_PST_SCALE};

type Pst = [[i32; 8]; 8];

const fn flip(pst: &Pst) -> Pst {
    let mut flipped = [[0; 8]; 8];
    let mut i = 0;
    while i < 8 {
        let mut j = 0;
        while j < 8 {
            flipped[i][j] = pst[7 - i][j];
            j += 1;
        }
        i += 1;
    }
    flipped
}

#[rustfmt::skip]
const PAWN_PST: Pst = [
    [  0,   0,   0,   0,   0,   0,   0,   0],
    [ 50,  50,  50,  50,  50,  50,  50,  50],
    [ 10,  10,  20,  30,  30,  20,  10,  10],
    [  5,   5,  10,  25,  25,  10,   5,   5],
    [  0,   0,   0,  20,  20,   0,   0,   0],
    [  5,  -5, -10,   0,   0, -10,  -5,   5],
    [  5,  10,  10, -20, -20,  10,  10,   5],
    [  0,   0,   0,   0,   0,   0,   0,   0],
];

#[rustfmt::skip]
const KNIGHT_PST: Pst = [
    [-50, -40, -30, -30, -30, -30, -40, -50],
    [-40, -20,   0,   0,   0,   0, -20, -40],
    [-30,   0,  10,  15,  15,  10,   0, -30],
    [-30,   5,  15,  20,  20,  15,   5, -30],
    [-30,   0,  15,  20,  20,  15,   0, -30],
    [-30,   5,  10,  15,  15,  10,   5, -30],
    [-40, -20,   0,   5,   5,   0, -20, -40],
    [-50, -40, -30, -30, -30, -30, -40, -50],
];

const BLACK_PAWN_PST: Pst = flip(&PAWN_PST);
const BLACK_KNIGHT_PST: Pst = flip(&KNIGHT_PST);

/// Table entry for a `color` piece of `role` on `square`, oriented from
/// that color's side. `None` for roles without a table.
pub fn value(role: Role, color: Color, square: Square) -> Option<i32> {
    let table = match (role, color) {
        (Role::Pawn, Color::White) => &PAWN_PST,
        (Role::Pawn, Color::Black) => &BLACK_PAWN_PST,
        (Role::Knight, Color::White) => &KNIGHT_PST,
        (Role::Knight, Color::Black) => &BLACK_KNIGHT_PST,
        _ => return None,
    };
    let row = 7 - square.rank() as usize;
    Some(table[row][square.file() as usize])
}

/// Scale applied to a table entry of `role`.
pub fn scale(role: Role) -> Option<f64> {
    match role {
        Role::Pawn => Some(PAWN_PST_SCALE),
        Role::Knight => Some(KNIGHT_PST_SCALE),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tables_mirror_between_colors() {
        assert_eq!(value(Role::Pawn, Color::White, Square::D2), Some(-20));
        assert_eq!(value(Role::Pawn, Color::Black, Square::D7), Some(-20));
        assert_eq!(value(Role::Knight, Color::White, Square::A1), Some(-50));
        assert_eq!(value(Role::Knight, Color::Black, Square::E5), value(Role::Knight, Color::White, Square::E4));
        assert_eq!(value(Role::Rook, Color::White, Square::A1), None);
    }
}
