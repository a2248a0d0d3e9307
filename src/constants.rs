use shakmaty::Square;

// --- Piece values ---
pub const PAWN_VALUE: i32 = 1;
pub const KNIGHT_VALUE: i32 = 3;
pub const BISHOP_VALUE: i32 = 3;
pub const ROOK_VALUE: i32 = 5;
pub const QUEEN_VALUE: i32 = 9;
// Used only by the material-impact term.
pub const KING_IMPACT_VALUE: i32 = 200;

// Piece-square table scaling (centipawn style values)
pub const PAWN_PST_SCALE: f64 = 100.0;
pub const KNIGHT_PST_SCALE: f64 = 320.0;

// --- Square sets ---
pub const CENTER4: [Square; 4] = [Square::D4, Square::E4, Square::D5, Square::E5];

pub const CENTER_RING: [Square; 10] = [
    Square::D4, Square::E4, Square::D5, Square::E5,
    Square::C3, Square::E3, Square::C4, Square::C5, Square::C6, Square::E6,
];

pub const OUTER_CENTER: [Square; 8] = [
    Square::C4, Square::F4, Square::C5, Square::F5,
    Square::D3, Square::E3, Square::D6, Square::E6,
];

pub const KEY_SQUARE_WEIGHTS: [(Square, f64); 20] = [
    (Square::E4, 1.0), (Square::D4, 1.0), (Square::E5, 1.0), (Square::D5, 1.0),
    (Square::F2, 0.5), (Square::G2, 0.5), (Square::F3, 0.5), (Square::G3, 0.5),
    (Square::F7, 0.5), (Square::G7, 0.5), (Square::F6, 0.5), (Square::G6, 0.5),
    (Square::C4, 0.8), (Square::C5, 0.8), (Square::F4, 0.8), (Square::F5, 0.8),
    (Square::D3, 0.7), (Square::D6, 0.7), (Square::E3, 0.7), (Square::E6, 0.7),
];

pub const CENTRAL_SUPPORT_WEIGHTS: [(Square, f64); 8] = [
    (Square::D4, 1.5), (Square::D5, 1.5), (Square::E4, 1.5), (Square::E5, 1.5),
    (Square::C4, 1.0), (Square::C5, 1.0), (Square::F4, 1.0), (Square::F5, 1.0),
];

pub const IDEAL_ROOK_SQUARES: [Square; 4] = [Square::C1, Square::F1, Square::C8, Square::F8];

// Duplicates are intentional, each entry scores once.
pub const PAWN_BREAK_SQUARES: [Square; 24] = [
    Square::B4, Square::C4, Square::D4, Square::E4, Square::B5, Square::C5, Square::D5, Square::E5,
    Square::B5, Square::C5, Square::D5, Square::E5, Square::B6, Square::C6, Square::D6, Square::E6,
    Square::B3, Square::C3, Square::D3, Square::E3, Square::B6, Square::C6, Square::D6, Square::E6,
];

// --- Center control ---
pub const CENTER_ATTACKER_WEIGHT: f64 = 0.5;
pub const CENTER_RING_CONTROL: f64 = 1.0;
pub const CENTER_PAWN_BONUS: f64 = 0.25;
pub const CENTER_CONTESTED_BONUS: f64 = 0.5;

// --- Composite weights ---
pub const MOBILITY_WEIGHTS: MobilityWeights = MobilityWeights {
    legal_moves: 0.2,
    centralization: 0.1,
    center_control: 0.1,
    piece_count: 0.1,
    pawn_count: 0.1,
    open_lines: 0.1,
    king_safety: 0.15,
    tactics: 0.15,
};

pub struct MobilityWeights {
    pub legal_moves: f64,
    pub centralization: f64,
    pub center_control: f64,
    pub piece_count: f64,
    pub pawn_count: f64,
    pub open_lines: f64,
    pub king_safety: f64,
    pub tactics: f64,
}

pub const PAWN_PENALTY_WEIGHT: f64 = 0.4;
pub const PAWN_CHAIN_WEIGHT: f64 = 0.3;
pub const PAWN_MOBILITY_WEIGHT: f64 = 0.2;
pub const PAWN_BREAK_WEIGHT: f64 = 0.1;

pub const ACTIVITY_LEGAL_MOVE_WEIGHT: f64 = 0.5;
pub const ACTIVITY_CENTRALIZATION_WEIGHT: f64 = 0.3;
pub const ACTIVITY_CENTER_CONTROL_WEIGHT: f64 = 0.2;

// --- King safety ---
pub const KING_MOBILITY_CAP: usize = 5;

// --- Tactics ---
pub const CHECKMATE_BONUS: f64 = 10.0;
pub const CHECK_BONUS: f64 = 0.5;
pub const OFFENSE_WEIGHT: f64 = 0.4;
pub const DEFENSE_WEIGHT: f64 = 0.3;
pub const BALANCE_SHARED_WEIGHT: f64 = 0.1;

// --- Initiative ---
pub const CASTLING_AVAILABLE_BONUS: f64 = 5.0;
pub const CHECKING_MOVE_BONUS: f64 = 2.0;
pub const TACTICAL_CAPTURE_BONUS: f64 = 1.0;
pub const PER_MOVE_TEMPO: f64 = 0.1;

// --- Rating ---
pub const DEFAULT_K_FACTOR: f64 = 32.0;
pub const REFERENCE_RATING: f64 = 2500.0;
pub const INITIAL_RATING: f64 = 1000.0;

// --- Encoding ---
pub const BOARD_INPUT_LEN: usize = 64;
pub const MOVE_SPACE: usize = 64 * 64;
