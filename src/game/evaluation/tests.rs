//! Unit tests for the evaluation terms.

use super::*;
use shakmaty::{fen::Fen, CastlingMode, Chess, Position, Square};

fn position(fen: &str) -> Chess {
    let fen: Fen = fen.parse().unwrap();
    fen.into_position(CastlingMode::Standard).unwrap()
}

fn setup(fen: &str) -> Setup {
    let fen: Fen = fen.parse().unwrap();
    fen.into_setup()
}

fn assert_close(a: f64, b: f64) {
    assert!((a - b).abs() < 1e-6, "{a} != {b}");
}

#[test]
fn test_starting_position_is_balanced() {
    let pos = Chess::default();
    for color in [Color::White, Color::Black] {
        let scores = evaluate(&pos, color);
        assert_eq!(scores.material_balance, 0.0);
        assert_close(scores.control_of_center, 0.0);
        assert_eq!(scores.space_control, 0.0);
    }
}

#[test]
fn test_starting_position_has_no_pawn_weaknesses() {
    let pos = Chess::default();
    for color in [Color::White, Color::Black] {
        let report = PawnReport::compute(pos.board(), color);
        assert_eq!(report.isolated, 0);
        assert_eq!(report.doubled, 0);
        assert_eq!(report.backward, 0);
        assert_eq!(report.penalty_score(), 0.0);
        assert_eq!(report.breaks, 8);
    }
}

#[test]
fn test_mirrored_position_negates_white_relative_scores() {
    let original = position("r1bqkbnr/pppp1ppp/2n5/4p3/4P3/5N2/PPPP1PPP/RNBQKB1R w KQkq - 2 3");
    let mirrored = position("rnbqkb1r/pppp1ppp/5n2/4p3/4P3/2N5/PPPP1PPP/R1BQKBNR b KQkq - 2 3");

    let a = evaluate(&original, Color::White);
    let b = evaluate(&mirrored, Color::White);
    for metric in [
        Metric::MaterialBalance,
        Metric::PieceMobility,
        Metric::PawnStructure,
        Metric::ControlOfCenter,
        Metric::PieceActivity,
        Metric::Tempo,
    ] {
        assert_close(a.get(metric), -b.get(metric));
    }
}

#[test]
fn test_mirrored_position_keeps_color_relative_scores() {
    let original = position("r1bqkbnr/pppp1ppp/2n5/4p3/4P3/5N2/PPPP1PPP/RNBQKB1R w KQkq - 2 3");
    let mirrored = position("rnbqkb1r/pppp1ppp/5n2/4p3/4P3/2N5/PPPP1PPP/R1BQKBNR b KQkq - 2 3");

    let a = evaluate(&original, Color::White);
    let b = evaluate(&mirrored, Color::Black);
    assert_close(a.king_safety, b.king_safety);
    assert_close(a.pawn_structure_strength, b.pawn_structure_strength);
    assert_close(a.piece_placement, b.piece_placement);
    assert_close(a.piece_exchange, b.piece_exchange);
}

#[test]
fn test_removing_a_piece_changes_material_by_its_value() {
    let without_knight = position("r1bqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1");
    assert_eq!(evaluate(&without_knight, Color::White).material_balance, 3.0);
    assert_eq!(evaluate(&without_knight, Color::Black).material_balance, -3.0);

    let without_queen = position("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNB1KBNR w KQkq - 0 1");
    assert_eq!(evaluate(&without_queen, Color::White).material_balance, -9.0);

    let without_pawn = position("rnbqkbnr/pppppppp/8/8/8/8/PPPP1PPP/RNBQKBNR w KQkq - 0 1");
    assert_eq!(evaluate(&without_pawn, Color::White).material_balance, -1.0);
}

#[test]
fn test_evaluation_is_idempotent() {
    let pos = position("r1bqkbnr/pppp1ppp/2n5/4p3/4P3/5N2/PPPP1PPP/RNBQKB1R w KQkq - 2 3");
    let before = pos.clone();
    let first = evaluate(&pos, Color::White);
    let second = evaluate(&pos, Color::White);
    assert_eq!(first, second);
    assert_eq!(pos.board(), before.board());
    assert_eq!(pos.turn(), before.turn());
}

#[test]
fn test_queen_fork_and_discovered_attack() {
    // The knight on b4 is hit by the queen and the c5 pawn; the g4 bishop only
    // by the queen.
    let pos = position("7k/8/8/2p5/1N1q2B1/8/8/7K w - - 0 1");
    let ctx = EvalContext::from_position(&pos);

    let white = tactics::patterns(&ctx, Color::White);
    assert_eq!(white.forks, 1);
    assert_eq!(white.discovered, 1);
    assert_eq!(white.pins, 0);
    assert_eq!(white.skewers, 0);
    assert_eq!(tactics::patterns(&ctx, Color::Black).total(), 0);
}

#[test]
fn test_lone_queen_attack_is_discovered() {
    let pos = position("7k/8/8/8/1N1q4/8/8/7K w - - 0 1");
    let ctx = EvalContext::from_position(&pos);
    let white = tactics::patterns(&ctx, Color::White);
    assert_eq!(white.discovered, 1);
    assert_eq!(white.forks, 0);
}

#[test]
fn test_king_mobility_is_capped() {
    let pos = position("7k/8/8/8/4K3/8/8/8 w - - 0 1");
    let ctx = EvalContext::from_position(&pos);
    assert_eq!(king_safety::king_mobility(&ctx, Color::White), Some(5));
}

#[test]
fn test_king_mobility_counts_legal_castles() {
    // d1 and f1 are free steps; both castles are legal two-square moves.
    let pos = position("4k3/8/8/8/8/8/3PPP2/R3K2R w KQ - 0 1");
    let ctx = EvalContext::from_position(&pos);
    assert_eq!(king_safety::king_mobility(&ctx, Color::White), Some(4));

    let no_rights = position("4k3/8/8/8/8/8/3PPP2/R3K2R w - - 0 1");
    let ctx = EvalContext::from_position(&no_rights);
    assert_eq!(king_safety::king_mobility(&ctx, Color::White), Some(2));
}

#[test]
fn test_defended_piece_hit_twice_is_a_pin() {
    // The d4 knight is hit by both black pawns and guarded by the e3 pawn.
    let pos = position("7k/8/8/2p1p3/3N4/4P3/8/7K w - - 0 1");
    let ctx = EvalContext::from_position(&pos);
    let white = tactics::patterns(&ctx, Color::White);
    assert_eq!(white.pins, 1);
    assert_eq!(white.total(), 1);
    assert_eq!(tactics::patterns(&ctx, Color::Black).total(), 0);
}

#[test]
fn test_single_attacker_on_a_doubly_guarded_piece_is_a_skewer() {
    let pos = position("7k/8/8/4p3/3N4/2P1P3/8/7K w - - 0 1");
    let ctx = EvalContext::from_position(&pos);
    let white = tactics::patterns(&ctx, Color::White);
    assert_eq!(white.skewers, 1);
    assert_eq!(white.total(), 1);
    assert_eq!(tactics::patterns(&ctx, Color::Black).total(), 0);
}

#[test]
fn test_guarded_king_in_double_check_is_king_pressure() {
    // Rook e8 and knight d3 both hit e1; the a1 rook guards it.
    let setup = setup("4r2k/8/8/8/8/3n4/8/R3K3 w - - 0 1");
    let ctx = EvalContext::from_setup(&setup);
    let white = tactics::patterns(&ctx, Color::White);
    assert_eq!(white.king_pressure, 1);
    assert_eq!(white.pins, 0);
    assert_eq!(white.total(), 1);
    assert_eq!(tactics::patterns(&ctx, Color::Black).total(), 0);
}

#[test]
fn test_check_bonus_goes_to_the_checking_side() {
    let pos = position("4k3/8/8/8/8/8/8/4R1K1 b - - 0 1");
    let ctx = EvalContext::from_position(&pos);
    let score = tactics::evaluate(&ctx, &tactics::SharedTerms::default());
    // White: only the check bonus. Black: hanging king, discovered, one threat.
    assert_close(score.white, 0.5);
    assert_close(score.black, 3.0);
}

#[test]
fn test_checkmate_bonus_goes_to_the_mating_side() {
    let pos = position("7k/6Q1/5K2/8/8/8/8/8 b - - 0 1");
    let ctx = EvalContext::from_position(&pos);
    assert!(ctx.is_checkmate());
    let score = tactics::evaluate(&ctx, &tactics::SharedTerms::default());
    // White: queen hit by the king (1), one threat (1), mate (10).
    assert_close(score.white, 12.0);
    assert_close(score.black, 3.0);
}

#[test]
fn test_development_rewards_posted_rooks_and_castling_rights() {
    // Two posted rooks (10), both on open back-rank files (15), castling (5).
    let pos = position("4k3/8/8/8/8/8/8/R3K2R w KQ - 0 1");
    let ctx = EvalContext::from_position(&pos);
    assert_close(development::evaluate(&ctx, Color::White), 30.0);
    assert_close(development::evaluate(&ctx, Color::Black), 0.0);

    // Castling only counts for the side to move.
    let pos = position("4k3/8/8/8/8/8/8/R3K2R b KQ - 0 1");
    let ctx = EvalContext::from_position(&pos);
    assert_close(development::evaluate(&ctx, Color::White), 25.0);
}

#[test]
fn test_development_counts_minor_posts_and_pairs() {
    // Bishop on c1 at half value (1.5) plus the knight/bishop pair (0.6).
    let pos = position("4k3/8/8/8/8/8/8/1NB1K3 w - - 0 1");
    let ctx = EvalContext::from_position(&pos);
    assert_close(development::evaluate(&ctx, Color::White), 2.1);
}

#[test]
fn test_missing_king_reports_zero_king_safety() {
    let setup = setup("4k3/8/8/8/8/8/8/R7 w - - 0 1");
    let ctx = EvalContext::from_setup(&setup);
    assert_eq!(king_safety::evaluate(&ctx, Color::White), None);
    assert!(king_safety::evaluate(&ctx, Color::Black).is_some());

    let scores = evaluate_setup(&setup, Color::White);
    assert_eq!(scores.king_safety, 0.0);
    assert_eq!(scores.material_balance, 5.0);
}

#[test]
fn test_pawn_chains_are_connected_components() {
    let pos = position("4k3/8/8/8/2P5/1P6/P5PP/4K3 w - - 0 1");
    let pawns = pos.board().pawns() & pos.board().white();
    let mut lengths: Vec<usize> = pawn_structure::pawn_chains(pawns)
        .iter()
        .map(|chain| chain.count())
        .collect();
    lengths.sort_unstable();
    assert_eq!(lengths, vec![2, 3]);
    assert_eq!(evaluate(&pos, Color::White).pawn_structure_strength, 5.0);
}

#[test]
fn test_doubled_pawns_count_extra_pawns_per_file() {
    let pos = position("4k3/8/8/8/4P3/4P3/4P3/4K3 w - - 0 1");
    let report = PawnReport::compute(pos.board(), Color::White);
    assert_eq!(report.doubled, 2);
    assert_eq!(report.isolated, 3);
    assert_eq!(report.penalty_score(), -5.0);
}

#[test]
fn test_backward_pawn() {
    // The d3 pawn trails both neighbours.
    let pos = position("4k3/8/8/8/2P1P3/3P4/8/4K3 w - - 0 1");
    let report = PawnReport::compute(pos.board(), Color::White);
    assert_eq!(report.backward, 1);
}

#[test]
fn test_other_side_in_check_falls_back_to_pseudo_legal_count() {
    let pos = position("4k3/8/8/8/8/8/8/4R1K1 b - - 0 1");
    let ctx = EvalContext::from_position(&pos);
    assert!(ctx.is_check());
    assert_eq!(ctx.checking_side(), Some(Color::White));
    assert!(ctx.legal_moves(Color::White).is_empty());
    assert_eq!(ctx.legal_count(Color::White), 17);
    assert_eq!(ctx.legal_count(Color::Black), pos.legal_moves().len());
}

#[test]
fn test_checkmate_is_detected() {
    let pos = position("rnb1kbnr/pppp1ppp/8/4p3/6Pq/5P2/PPPPP2P/RNBQKBNR w KQkq - 1 3");
    let ctx = EvalContext::from_position(&pos);
    assert!(ctx.is_checkmate());
    assert_eq!(ctx.checking_side(), Some(Color::Black));
    assert_eq!(ctx.moves_to_play(), 0);
}

#[test]
fn test_center_control_favours_the_central_pawn() {
    let pos = position("rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq - 0 1");
    assert!(evaluate(&pos, Color::White).control_of_center > 0.0);
    assert!(evaluate(&pos, Color::Black).control_of_center < 0.0);
}

#[test]
fn test_normalized_diff() {
    assert_eq!(coordination::normalized_diff(ByColor { white: 0.0, black: 0.0 }), 0.0);
    assert_close(coordination::normalized_diff(ByColor { white: 2.0, black: 1.0 }), 0.5);
}

#[test]
fn test_breakdown_means_and_names() {
    let scores = ScoreBreakdown { material_balance: 3.0, piece_mobility: 1.0, ..Default::default() };
    assert_eq!(scores.iter().count(), 12);
    assert_close(scores.mean_of(&[Metric::MaterialBalance, Metric::PieceMobility]), 2.0);
    assert_close(scores.mean(), 4.0 / 12.0);
    assert_eq!(scores.mean_of(&[]), 0.0);

    let json = serde_json::to_value(scores).unwrap();
    for metric in Metric::ALL {
        assert!(json.get(metric.name()).is_some(), "missing {}", metric.name());
    }
    let parsed: Metric = serde_json::from_str("\"control_of_center\"").unwrap();
    assert_eq!(parsed, Metric::ControlOfCenter);
}

#[test]
fn test_exchange_rewards_attacking_heavier_pieces() {
    // A pawn on e4 attacking a knight on d5: 3 - 1 + 0.5 for the central pawn.
    let pos = position("4k3/8/8/3n4/4P3/8/8/4K3 w - - 0 1");
    let ctx = EvalContext::from_position(&pos);
    assert_close(exchanges::piece_exchange(&ctx, Color::White), 2.5);
}

#[test]
fn test_evaluation_survives_bare_kings() {
    let pos = position("4k3/8/8/8/8/8/8/4K3 w - - 0 1");
    let scores = evaluate(&pos, Color::White);
    assert!(scores.iter().all(|(_, value)| value.is_finite()));
    assert_eq!(scores.material_balance, 0.0);
    assert_eq!(scores.piece_placement, 0.0);
}

#[test]
fn test_king_squares_are_untouched() {
    let pos = Chess::default();
    let ctx = EvalContext::from_position(&pos);
    assert_eq!(ctx.piece_at(Square::E1).map(|p| p.role), Some(Role::King));
    assert_eq!(ctx.legal_count(Color::White), 20);
    assert_eq!(ctx.legal_count(Color::Black), 20);
}
