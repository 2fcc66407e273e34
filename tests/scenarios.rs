use chess_rules::{ChessError, Color, Game, GameStatus, PieceKind, Square};
use rstest::rstest;

fn sq(s: &str) -> Square {
    Square::from_algebraic(s).expect("valid square")
}

fn game(fen: &str) -> Game {
    Game::from_fen(fen).expect("valid FEN")
}

fn apply(game: &mut Game, text: &str, promotion: Option<PieceKind>) -> bool {
    let mv = game
        .move_from_coordinates(text, promotion)
        .expect("well-formed move");
    game.apply_move(&mv).expect("kings present")
}

#[test]
fn standard_position_has_twenty_moves_in_board_order() {
    let game = Game::standard();
    let moves: Vec<String> = game
        .legal_moves()
        .expect("kings present")
        .iter()
        .map(|mv| mv.to_coordinates())
        .collect();

    assert_eq!(moves.len(), 20);
    for expected in [
        "b1a3", "b1c3", "g1f3", "g1h3", "a2a3", "a2a4", "b2b3", "b2b4", "c2c3", "c2c4", "d2d3",
        "d2d4", "e2e3", "e2e4", "f2f3", "f2f4", "g2g3", "g2g4", "h2h3", "h2h4",
    ] {
        assert!(moves.contains(&expected.to_string()), "missing {}", expected);
    }
}

#[rstest]
#[case(
    "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
    "e2e4",
    None,
    "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq - 0 1"
)]
#[case(
    "rnbqkbnr/ppp1ppp1/7p/3pP3/8/8/PPPP1PPP/RNBQKBNR w KQkq d6 0 3",
    "e5d6",
    None,
    "rnbqkbnr/ppp1ppp1/3P3p/8/8/8/PPPP1PPP/RNBQKBNR b KQkq - 0 3"
)]
#[case(
    "4k3/7P/8/8/8/8/8/4K3 w - - 0 1",
    "h7h8",
    Some(PieceKind::Queen),
    "4k2Q/8/8/8/8/8/8/4K3 b - - 0 1"
)]
#[case(
    "rnbqk2r/pppp1ppp/4pn2/2b5/4PB2/2NP4/PPP1QPPP/R3KBNR w KQkq - 0 1",
    "e1c1",
    None,
    "rnbqk2r/pppp1ppp/4pn2/2b5/4PB2/2NP4/PPP1QPPP/2KR1BNR b kq - 1 1"
)]
#[case(
    "4k3/8/8/8/8/8/8/R3K2R w KQ - 0 1",
    "e1g1",
    None,
    "4k3/8/8/8/8/8/8/R4RK1 b - - 1 1"
)]
fn single_move_scenarios(
    #[case] start: &str,
    #[case] text: &str,
    #[case] promotion: Option<PieceKind>,
    #[case] expected: &str,
) {
    let mut game = game(start);
    assert!(apply(&mut game, text, promotion));
    assert_eq!(game.to_fen(), expected);
}

#[test]
fn en_passant_removes_the_passed_pawn() {
    let mut game = game("rnbqkbnr/ppp1ppp1/7p/3pP3/8/8/PPPP1PPP/RNBQKBNR w KQkq d6 0 3");
    assert!(apply(&mut game, "e5d6", None));
    assert!(game.get_piece(&sq("d5")).is_none());
    assert_eq!(
        game.get_piece(&sq("d6")).map(|piece| (piece.kind, piece.color)),
        Some((PieceKind::Pawn, Color::White))
    );
}

#[test]
fn en_passant_flag_set_only_with_an_adjacent_enemy_pawn() {
    let mut game = Game::standard();
    for text in ["e2e4", "h7h6", "e4e5", "d7d5"] {
        assert!(apply(&mut game, text, None));
    }
    let pawn = game.get_piece(&sq("d5")).expect("pawn on d5");
    assert!(pawn.is_en_passant_vulnerable());
    assert!(game.to_fen().contains(" d6 "));
}

#[test]
fn checkmate_is_reported_for_white() {
    let game = game("3k4/8/8/8/8/8/r7/4K2r w - - 0 1");
    assert!(game.is_checkmate(Color::White).expect("kings present"));
    assert_eq!(game.status(), GameStatus::BlackWins);
}

#[test]
fn checkmate_is_reported_for_black() {
    let game = game("R2k4/7R/8/8/8/8/8/4K3 w - - 0 1");
    assert!(game.is_checkmate(Color::Black).expect("kings present"));
    assert_eq!(game.status(), GameStatus::WhiteWins);
}

#[rstest]
#[case("3k4/8/2Q1K3/8/8/8/8/8 b - - 0 1")]
#[case("3K4/8/2q1k3/8/8/8/8/8 w - - 0 1")]
fn stalemate_positions(#[case] fen: &str) {
    let game = game(fen);
    assert!(game.is_stalemate().expect("kings present"));
    assert_eq!(game.status(), GameStatus::Stalemate);
}

#[rstest]
#[case("3k4/8/8/8/8/8/8/4K3 w - - 0 1")]
#[case("8/3k4/8/8/3K4/8/8/8 w - - 0 1")]
fn bare_kings_are_insufficient_material(#[case] fen: &str) {
    let game = game(fen);
    assert!(game.is_insufficient_material());
    assert!(!game.is_stalemate().expect("kings present"));
    assert_eq!(game.status(), GameStatus::InsufficientMaterial);
}

#[test]
fn short_castle_blocked_by_attacked_crossing_square() {
    let mut attacked = game("4k3/8/8/8/8/8/5r2/R3K2R w KQ - 0 1");
    assert!(!apply(&mut attacked, "e1g1", None));

    let mut open = game("4k3/8/8/8/8/8/8/R3K2R w KQ - 0 1");
    assert!(apply(&mut open, "e1g1", None));
}

#[test]
fn short_castle_refused_once_a_party_has_moved() {
    let mut king_moved = game("4k3/8/8/8/8/8/8/R3K2R w KQ - 0 1");
    for text in ["e1f1", "e8e7", "f1e1", "e7e8"] {
        assert!(apply(&mut king_moved, text, None));
    }
    assert!(!apply(&mut king_moved, "e1g1", None));

    let mut rook_moved = game("4k3/8/8/8/8/8/8/R3K2R w KQ - 0 1");
    for text in ["h1g1", "e8e7", "g1h1", "e7e8"] {
        assert!(apply(&mut rook_moved, text, None));
    }
    assert!(!apply(&mut rook_moved, "e1g1", None));
}

#[test]
fn position_with_traded_pieces() {
    let game = game("5r2/2p2rb1/1pNp4/p2Pp1pk/2P1K3/PP3PP1/5R2/5R2 w - - 1 51");
    assert_eq!(game.pieces(Color::White).len(), 10);
    assert_eq!(game.pieces(Color::Black).len(), 10);
    assert_eq!(game.captured(Color::White).len(), 6);
    assert_eq!(game.captured(Color::Black).len(), 6);
    assert_eq!(game.halfmove_clock(), 1);
    assert_eq!(game.fullmove_number(), 51);
    assert_eq!(game.status(), GameStatus::Active);

    let king = game.get_piece(&sq("e4")).expect("white king on e4");
    assert!(king.has_moved());
    assert_eq!(
        game.to_fen(),
        "5r2/2p2rb1/1pNp4/p2Pp1pk/2P1K3/PP3PP1/5R2/5R2 w - - 1 51"
    );
}

#[test]
fn structural_errors_before_any_mutation() {
    let game = Game::standard();
    assert!(matches!(
        game.move_from_coordinates("e4e2", None),
        Err(ChessError::InvalidMove(_))
    ));
    assert!(matches!(
        game.move_from_coordinates("e1e2", None),
        Err(ChessError::InvalidMove(_))
    ));
    assert!(matches!(
        game.move_from_coordinates("e2e44", None),
        Err(ChessError::InvalidArgument(_))
    ));
    assert!(matches!(
        Game::from_fen("8/8/8/8/8/8/8/8 w - - 0 1"),
        Err(ChessError::InvalidFen(_))
    ));
}
