//! Seeded random games checking the invariants that must hold after every ply.

use chess_rules::{Color, Game, PieceKind, fen};
use rand::SeedableRng;
use rand::prelude::IndexedRandom;
use rand::rngs::StdRng;

const SEEDS: [u64; 4] = [7, 42, 123, 2024];
const MAX_PLIES: usize = 100;

fn assert_position_invariants(game: &Game) {
    let text = game.to_fen();
    let reparsed = fen::parse(&text).expect("formatted FEN parses");
    assert_eq!(reparsed.to_fen(), text, "FEN round-trip");

    for color in Color::ALL {
        assert_eq!(
            game.board().count(PieceKind::King, color),
            1,
            "exactly one {} king in {}",
            color,
            text
        );
    }
}

fn play_random_game(seed: u64) {
    let mut game = Game::standard();
    let mut rng = StdRng::seed_from_u64(seed);

    for _ in 0..MAX_PLIES {
        assert_position_invariants(&game);
        if game.is_over() {
            break;
        }

        let moves = game.legal_moves().expect("kings present");
        assert!(!moves.is_empty(), "active game without legal moves");

        let mover = game.turn();
        for mv in &moves {
            let mut probe = game.clone();
            assert!(
                probe.apply_move(mv).expect("kings present"),
                "generated move {} was refused",
                mv.to_coordinates()
            );
            assert!(
                !probe.is_in_check(mover).expect("kings present"),
                "{} leaves the {} king attacked",
                mv.to_coordinates(),
                mover
            );
        }

        let Some(mv) = moves.choose(&mut rng) else {
            break;
        };
        let pieces_before = game.board().occupied().count();
        let moving_pawn = game
            .get_piece(&mv.from)
            .is_some_and(|piece| piece.kind == PieceKind::Pawn);
        let clock_before = game.halfmove_clock();

        assert!(game.apply_move(mv).expect("kings present"));

        let captured = game.board().occupied().count() < pieces_before;
        if captured || moving_pawn {
            assert_eq!(game.halfmove_clock(), 0);
        } else {
            assert_eq!(game.halfmove_clock(), clock_before + 1);
        }
        assert_eq!(game.turn(), mover.opposite());
    }
}

#[test]
fn random_playouts_keep_invariants() {
    for seed in SEEDS {
        play_random_game(seed);
    }
}

#[test]
fn snapshots_track_every_ply() {
    let mut game = Game::standard();
    let mut rng = StdRng::seed_from_u64(5);

    for ply in 1..=30 {
        if game.is_over() {
            break;
        }
        let moves = game.legal_moves().expect("kings present");
        let Some(mv) = moves.choose(&mut rng) else {
            break;
        };
        assert!(game.apply_move(mv).expect("kings present"));
        assert_eq!(game.move_history().len(), ply);
        assert_eq!(game.snapshots().len(), ply + 1);
        assert_eq!(
            game.snapshots().last(),
            Some(&game.board().placement())
        );
    }
}
