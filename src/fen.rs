//! Forsyth–Edwards Notation.
//!
//! Castling letters and the en-passant target are not stored: on parse they
//! are folded into king/rook and pawn flags, and on format they are recomputed
//! from those flags.

use arrayvec::ArrayVec;

use crate::board::Board;
use crate::color::Color;
use crate::error::{ChessError, Result};
use crate::game::Game;
use crate::movement::CastleSide;
use crate::pieces::{Piece, PieceFlags, PieceKind};
use crate::square::Square;

const FIELD_COUNT: usize = 6;

/// Full army minus the king, used to infer captured pieces from a FEN.
const STANDARD_ARMY: [(PieceKind, usize); 5] = [
    (PieceKind::Pawn, 8),
    (PieceKind::Knight, 2),
    (PieceKind::Bishop, 2),
    (PieceKind::Rook, 2),
    (PieceKind::Queen, 1),
];

const CASTLING_LETTERS: [(char, Color, CastleSide); 4] = [
    ('K', Color::White, CastleSide::Kingside),
    ('Q', Color::White, CastleSide::Queenside),
    ('k', Color::Black, CastleSide::Kingside),
    ('q', Color::Black, CastleSide::Queenside),
];

pub fn parse(text: &str) -> Result<Game> {
    let mut fields: ArrayVec<&str, FIELD_COUNT> = ArrayVec::new();
    for field in text.split_whitespace() {
        fields.try_push(field).map_err(|_| {
            ChessError::InvalidFen(format!("expected {} fields, got more", FIELD_COUNT))
        })?;
    }

    if fields.len() != FIELD_COUNT {
        return Err(ChessError::InvalidFen(format!(
            "expected {} fields, got {}",
            FIELD_COUNT,
            fields.len()
        )));
    }

    let mut board = Board::from_fen(fields[0])?;

    for color in Color::ALL {
        let kings = board.count(PieceKind::King, color);
        if kings != 1 {
            return Err(ChessError::InvalidFen(format!(
                "expected exactly one {} king, found {}",
                color, kings
            )));
        }
    }

    let turn = Color::from_fen(fields[1]).ok_or_else(|| {
        ChessError::InvalidFen(format!("side to move must be 'w' or 'b', got {:?}", fields[1]))
    })?;

    apply_castling(&mut board, fields[2])?;
    apply_en_passant(&mut board, fields[3], turn)?;

    let halfmove_clock = parse_number(fields[4], "half-move clock")?;
    let fullmove_number = parse_number(fields[5], "full-move number")?;
    if fullmove_number == 0 {
        return Err(ChessError::InvalidFen(
            "full-move number must be at least 1".to_string(),
        ));
    }

    let captured = [
        infer_captured(&board, Color::White),
        infer_captured(&board, Color::Black),
    ];

    Game::from_parts(board, turn, halfmove_clock, fullmove_number, captured)
}

pub fn format(game: &Game) -> String {
    let board = game.board();
    format!(
        "{} {} {} {} {} {}",
        board.to_fen(),
        game.turn().to_fen(),
        castling_field(board),
        en_passant_field(board),
        game.halfmove_clock(),
        game.fullmove_number()
    )
}

fn parse_number(field: &str, name: &str) -> Result<u32> {
    if field.is_empty() || !field.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ChessError::InvalidFen(format!(
            "{} must be a non-negative integer, got {:?}",
            name, field
        )));
    }
    field
        .parse()
        .map_err(|_| ChessError::InvalidFen(format!("{} out of range: {}", name, field)))
}

fn king_home(color: Color) -> Option<Square> {
    Square::new(4, color.home_rank())
}

/// Folds the castling field into king and rook flags.
///
/// A king off its home square is marked moved, a missing letter marks that
/// side's castle as used, and rooks away from their corners are marked moved.
fn apply_castling(board: &mut Board, field: &str) -> Result<()> {
    let mut rights = [false; 4];

    if field != "-" {
        let mut last = None;
        for c in field.chars() {
            let position = CASTLING_LETTERS
                .iter()
                .position(|(letter, _, _)| *letter == c)
                .ok_or_else(|| {
                    ChessError::InvalidFen(format!("invalid castling character {:?}", c))
                })?;

            if last.is_some_and(|previous| position <= previous) {
                return Err(ChessError::InvalidFen(format!(
                    "castling rights {:?} are not in KQkq order",
                    field
                )));
            }
            last = Some(position);
            rights[position] = true;
        }
    }

    for color in Color::ALL {
        let Some(king_square) = board.find_king(color) else {
            continue;
        };
        let on_home = king_home(color) == Some(king_square);

        if let Some(king) = board.piece_mut(&king_square) {
            if field == "-" || !on_home {
                king.flags.insert(PieceFlags::HAS_MOVED);
            }
            for (index, (_, letter_color, side)) in CASTLING_LETTERS.iter().enumerate() {
                if *letter_color == color && !rights[index] {
                    king.flags.insert(side.used_flag());
                }
            }
        }
    }

    let corners: Vec<Square> = Color::ALL
        .iter()
        .flat_map(|color| {
            [CastleSide::Kingside, CastleSide::Queenside]
                .into_iter()
                .filter_map(move |side| side.rook_home(*color).map(|square| (square, *color)))
        })
        .filter(|(square, color)| {
            board
                .get_piece(square)
                .is_some_and(|piece| piece.is(PieceKind::Rook, *color))
        })
        .map(|(square, _)| square)
        .collect();

    for square in Square::all() {
        if corners.contains(&square) {
            continue;
        }
        if let Some(piece) = board.piece_mut(&square) {
            if piece.kind == PieceKind::Rook {
                piece.mark_moved();
            }
        }
    }

    Ok(())
}

/// Marks the pawn behind the en-passant target as vulnerable.
fn apply_en_passant(board: &mut Board, field: &str, turn: Color) -> Result<()> {
    if field == "-" {
        return Ok(());
    }

    let target = Square::from_algebraic(field)
        .map_err(|_| ChessError::InvalidFen(format!("invalid en-passant square {:?}", field)))?;

    let mover = match target.rank() {
        2 => Color::White,
        5 => Color::Black,
        _ => {
            return Err(ChessError::InvalidFen(format!(
                "en-passant square {} must be on rank 3 or 6",
                target
            )));
        }
    };

    if mover != turn.opposite() {
        return Err(ChessError::InvalidFen(format!(
            "en-passant square {} does not match side to move {}",
            target, turn
        )));
    }

    let pawn_square = target
        .offset(0, mover.forward())
        .ok_or_else(|| ChessError::InvalidFen(format!("invalid en-passant square {}", target)))?;

    match board.piece_mut(&pawn_square) {
        Some(pawn) if pawn.is(PieceKind::Pawn, mover) => {
            pawn.set_en_passant_vulnerable(true);
            Ok(())
        }
        _ => Err(ChessError::InvalidFen(format!(
            "no {} pawn on {} for en-passant square {}",
            mover, pawn_square, target
        ))),
    }
}

fn infer_captured(board: &Board, color: Color) -> Vec<Piece> {
    let mut captured = Vec::new();
    for (kind, full) in STANDARD_ARMY {
        let missing = full.saturating_sub(board.count(kind, color));
        captured.extend(std::iter::repeat_n(Piece::new(kind, color), missing));
    }
    captured
}

fn castling_field(board: &Board) -> String {
    let mut field = String::new();

    for (letter, color, side) in CASTLING_LETTERS {
        let king_ready = king_home(color)
            .and_then(|square| board.get_piece(&square))
            .is_some_and(|king| {
                king.is(PieceKind::King, color)
                    && !king.has_moved()
                    && !king.flags.contains(side.used_flag())
            });
        let rook_ready = side
            .rook_home(color)
            .and_then(|square| board.get_piece(&square))
            .is_some_and(|rook| rook.is(PieceKind::Rook, color) && !rook.has_moved());

        if king_ready && rook_ready {
            field.push(letter);
        }
    }

    if field.is_empty() {
        field.push('-');
    }
    field
}

fn en_passant_field(board: &Board) -> String {
    board
        .occupied()
        .find(|(_, piece)| piece.is_en_passant_vulnerable())
        .and_then(|(square, pawn)| square.offset(0, -pawn.color.forward()))
        .map(|target| target.to_algebraic())
        .unwrap_or_else(|| "-".to_string())
}
