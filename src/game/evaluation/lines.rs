// src/game/evaluation/lines.rs

//! Geometry helpers shared by the metric families: file and diagonal
//! openness, relative ranks and line exposure.

use shakmaty::attacks::{bishop_attacks, rook_attacks};
use shakmaty::{Bitboard, Board, Color, File, Piece, Rank, Role, Square};

/// Returns the square at the given coordinates, or `None` when off the board.
pub fn square_at(file: i32, rank: i32) -> Option<Square> {
    if (0..8).contains(&file) && (0..8).contains(&rank) {
        Some(Square::from_coords(File::new(file as u32), Rank::new(rank as u32)))
    } else {
        None
    }
}

/// Rank index counted from `color`'s own back rank.
pub fn relative_rank(square: Square, color: Color) -> u32 {
    let rank = square.rank() as u32;
    match color {
        Color::White => rank,
        Color::Black => 7 - rank,
    }
}

/// +1 for white, -1 for black.
pub fn forward(color: Color) -> i32 {
    match color {
        Color::White => 1,
        Color::Black => -1,
    }
}

/// A file is open when no pawn of either color stands on it.
pub fn is_open_file(board: &Board, file: File) -> bool {
    (board.pawns() & Bitboard::from_file(file)).is_empty()
}

/// A file is semi-open for `color` when the opponent has no piece on it.
pub fn is_semi_open_file(board: &Board, color: Color, file: File) -> bool {
    (board.by_color(!color) & Bitboard::from_file(file)).is_empty()
}

/// Both diagonals through `square` are empty apart from the square itself.
pub fn is_open_diagonal(board: &Board, square: Square) -> bool {
    (diagonals_through(square) & board.occupied()).without(square).is_empty()
}

/// Every square on the two diagonals through `square`, the square included.
pub fn diagonals_through(square: Square) -> Bitboard {
    bishop_attacks(square, Bitboard::EMPTY).with(square)
}

/// The piece stands on an enemy line: the first piece met along one of its
/// rook rays is an enemy rook or queen, or along a bishop ray an enemy bishop
/// or queen.
pub fn on_enemy_line(board: &Board, square: Square, color: Color) -> bool {
    let occupied = board.occupied();
    let enemy = board.by_color(!color);
    let straight = enemy & (board.rooks() | board.queens());
    let diagonal = enemy & (board.bishops() | board.queens());
    !(rook_attacks(square, occupied) & straight).is_empty()
        || !(bishop_attacks(square, occupied) & diagonal).is_empty()
}

/// The piece on `square` is absolutely pinned to its own king.
pub fn is_pinned(board: &Board, square: Square, color: Color) -> bool {
    let Some(king) = board.king_of(color) else {
        return false;
    };
    if king == square {
        return false;
    }
    let occupied = board.occupied();
    let lifted = occupied.without(square);
    let enemy = board.by_color(!color);
    let straight = enemy & (board.rooks() | board.queens());
    let diagonal = enemy & (board.bishops() | board.queens());

    let revealed_straight = (rook_attacks(king, lifted) & !rook_attacks(king, occupied)) & straight;
    let revealed_diagonal = (bishop_attacks(king, lifted) & !bishop_attacks(king, occupied)) & diagonal;
    rook_attacks(king, occupied).contains(square) && !revealed_straight.is_empty()
        || bishop_attacks(king, occupied).contains(square) && !revealed_diagonal.is_empty()
}

/// Squares adjacent to `square` (king-move neighbourhood).
pub fn neighbours(square: Square) -> Bitboard {
    shakmaty::attacks::king_attacks(square)
}

pub fn pieces_of(board: &Board, role: Role, color: Color) -> Bitboard {
    board.by_piece(Piece { role, color })
}

#[cfg(test)]
mod tests {
    use super::*;
    use shakmaty::{fen::Fen, CastlingMode, Chess, Position};

    fn board(fen: &str) -> Board {
        let fen: Fen = fen.parse().unwrap();
        let pos: Chess = fen.into_position(CastlingMode::Standard).unwrap();
        pos.board().clone()
    }

    #[test]
    fn test_open_and_semi_open_files() {
        let b = board("4k3/8/8/8/8/7p/8/4K2R w K - 0 1");
        assert!(is_open_file(&b, File::E));
        assert!(!is_open_file(&b, File::H));
        assert!(!is_semi_open_file(&b, Color::White, File::H));
        assert!(is_semi_open_file(&b, Color::White, File::A));
    }

    #[test]
    fn test_open_diagonal() {
        let b = board("4k3/8/8/8/3B4/8/8/4K3 w - - 0 1");
        assert!(is_open_diagonal(&b, Square::D4));
        let b = board("4k3/8/8/8/3B4/8/5P2/4K3 w - - 0 1");
        assert!(!is_open_diagonal(&b, Square::D4));
    }

    #[test]
    fn test_pinned_knight() {
        let b = board("4k3/8/8/b7/8/2N5/8/4K3 w - - 0 1");
        assert!(is_pinned(&b, Square::C3, Color::White));
        assert!(on_enemy_line(&b, Square::C3, Color::White));
        let b = board("4k3/8/8/b7/8/8/2N5/4K3 w - - 0 1");
        assert!(!is_pinned(&b, Square::C2, Color::White));
    }

    #[test]
    fn test_relative_rank_and_square_at() {
        assert_eq!(relative_rank(Square::E2, Color::White), 1);
        assert_eq!(relative_rank(Square::E7, Color::Black), 1);
        assert_eq!(square_at(4, 3), Some(Square::E4));
        assert_eq!(square_at(8, 0), None);
    }
}
