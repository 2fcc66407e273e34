use crate::color::Color;
use crate::error::{ChessError, Result};
use crate::movement;
use crate::pieces::{Piece, PieceKind};
use crate::square::{BOARD_SIZE, Square};
use std::fmt;

pub const STANDARD_PLACEMENT: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR";

/// The 8x8 grid. A square holds at most one occupant.
///
/// `Board` is `Copy`, so speculative checks work on a scratch copy and never
/// touch the live grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Board {
    squares: [Option<Piece>; 64],
}

/// Placement-only view of a board (kind and colour per square), used for
/// repetition detection. Flags, side to move and clocks are deliberately absent.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Placement([Option<(PieceKind, Color)>; 64]);

impl Board {
    pub fn empty() -> Self {
        Board {
            squares: [None; 64],
        }
    }

    pub fn standard() -> Self {
        let mut board = Board::empty();
        let back_rank = [
            PieceKind::Rook,
            PieceKind::Knight,
            PieceKind::Bishop,
            PieceKind::Queen,
            PieceKind::King,
            PieceKind::Bishop,
            PieceKind::Knight,
            PieceKind::Rook,
        ];

        for color in Color::ALL {
            for (file, kind) in back_rank.iter().enumerate() {
                board.put(file as u8, color.home_rank(), Piece::new(*kind, color));
                board.put(
                    file as u8,
                    color.pawn_start_rank(),
                    Piece::new(PieceKind::Pawn, color),
                );
            }
        }

        board
    }

    fn put(&mut self, file: u8, rank: u8, piece: Piece) {
        if let Some(square) = Square::new(file, rank) {
            self.squares[square.index()] = Some(piece);
        }
    }

    pub fn get_piece(&self, square: &Square) -> Option<Piece> {
        self.squares[square.index()]
    }

    pub fn set_piece(&mut self, square: &Square, piece: Option<Piece>) {
        self.squares[square.index()] = piece;
    }

    pub(crate) fn piece_mut(&mut self, square: &Square) -> Option<&mut Piece> {
        self.squares[square.index()].as_mut()
    }

    pub fn is_empty(&self, square: &Square) -> bool {
        self.squares[square.index()].is_none()
    }

    /// Moves the occupant of `from` onto `to`, returning whatever stood on `to`.
    /// Flags are left untouched.
    pub(crate) fn relocate(&mut self, from: &Square, to: &Square) -> Option<Piece> {
        let mover = self.squares[from.index()].take();
        std::mem::replace(&mut self.squares[to.index()], mover)
    }

    pub fn pieces(&self, color: Color) -> Vec<(Square, Piece)> {
        self.occupied()
            .filter(|(_, piece)| piece.color == color)
            .collect()
    }

    /// Every occupied square, a1 first.
    pub fn occupied(&self) -> impl Iterator<Item = (Square, Piece)> + '_ {
        self.squares
            .iter()
            .enumerate()
            .filter_map(|(index, cell)| cell.map(|piece| (Square::from_index(index), piece)))
    }

    pub fn find_king(&self, color: Color) -> Option<Square> {
        self.occupied()
            .find(|(_, piece)| piece.is(PieceKind::King, color))
            .map(|(square, _)| square)
    }

    pub fn count(&self, kind: PieceKind, color: Color) -> usize {
        self.occupied()
            .filter(|(_, piece)| piece.is(kind, color))
            .count()
    }

    /// Whether any piece of `by` attacks `square`, ignoring whose turn it is
    /// and ignoring the attacker's own king safety.
    pub fn is_square_attacked(&self, square: &Square, by: Color) -> bool {
        self.occupied()
            .filter(|(_, piece)| piece.color == by)
            .any(|(from, _)| movement::attacks_square(self, &from, square))
    }

    pub fn placement(&self) -> Placement {
        let mut cells = [None; 64];
        for (cell, square) in cells.iter_mut().zip(self.squares.iter()) {
            *cell = square.map(|piece| (piece.kind, piece.color));
        }
        Placement(cells)
    }

    /// First FEN field: ranks 8 down to 1, separated by `/`.
    pub fn to_fen(&self) -> String {
        let mut fen = String::new();

        for rank in (0..BOARD_SIZE).rev() {
            let mut empty_count = 0;

            for file in 0..BOARD_SIZE {
                let square = Square::from_index(rank as usize * BOARD_SIZE as usize + file as usize);
                if let Some(piece) = self.get_piece(&square) {
                    if empty_count > 0 {
                        fen.push_str(&empty_count.to_string());
                        empty_count = 0;
                    }
                    fen.push(piece.to_char());
                } else {
                    empty_count += 1;
                }
            }

            if empty_count > 0 {
                fen.push_str(&empty_count.to_string());
            }

            if rank > 0 {
                fen.push('/');
            }
        }

        fen
    }

    pub fn from_fen(placement: &str) -> Result<Self> {
        let mut board = Board::empty();
        let ranks: Vec<&str> = placement.split('/').collect();

        if ranks.len() != BOARD_SIZE as usize {
            return Err(ChessError::InvalidFen(format!(
                "expected {} ranks, got {}",
                BOARD_SIZE,
                ranks.len()
            )));
        }

        for (row_idx, rank_str) in ranks.iter().enumerate() {
            let rank = BOARD_SIZE - 1 - row_idx as u8;
            let mut file: u8 = 0;

            for c in rank_str.chars() {
                if let Some(skip) = c.to_digit(10) {
                    if !(1..=8).contains(&skip) {
                        return Err(ChessError::InvalidFen(format!(
                            "invalid empty-square count {} on rank {}",
                            c,
                            rank + 1
                        )));
                    }
                    file += skip as u8;
                } else if let Some(piece) = Piece::from_char(c) {
                    if file >= BOARD_SIZE {
                        return Err(ChessError::InvalidFen(format!(
                            "rank {} has more than {} squares",
                            rank + 1,
                            BOARD_SIZE
                        )));
                    }
                    board.put(file, rank, piece);
                    file += 1;
                } else {
                    return Err(ChessError::InvalidFen(format!(
                        "invalid placement character {:?}",
                        c
                    )));
                }

                if file > BOARD_SIZE {
                    return Err(ChessError::InvalidFen(format!(
                        "rank {} has more than {} squares",
                        rank + 1,
                        BOARD_SIZE
                    )));
                }
            }

            if file != BOARD_SIZE {
                return Err(ChessError::InvalidFen(format!(
                    "rank {} has {} squares, expected {}",
                    rank + 1,
                    file,
                    BOARD_SIZE
                )));
            }
        }

        Ok(board)
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::standard()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for rank in (0..BOARD_SIZE).rev() {
            write!(f, "{} ", rank + 1)?;
            for file in 0..BOARD_SIZE {
                match Square::new(file, rank).and_then(|square| self.get_piece(&square)) {
                    Some(piece) => write!(f, "{} ", piece.to_char())?,
                    None => write!(f, ". ")?,
                }
            }
            writeln!(f)?;
        }

        write!(f, "  ")?;
        for file in 0..BOARD_SIZE {
            write!(f, "{} ", (b'a' + file) as char)?;
        }
        Ok(())
    }
}
