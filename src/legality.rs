//! King-safety oracle.
//!
//! A candidate move is played on a scratch copy of the grid (source emptied,
//! destination overwritten, an en-passant victim lifted) and the mover's king
//! is tested against every enemy piece's attack geometry. The live board is
//! never mutated, so there is nothing to restore on any exit path.

use crate::board::Board;
use crate::color::Color;
use crate::error::{ChessError, Result};
use crate::movement;
use crate::r#move::Move;

/// Whether playing `mv` leaves `color`'s king unattacked.
///
/// Fails with [`ChessError::InvalidBoard`] if `color` has no king.
pub fn is_legal_move(board: &Board, mv: &Move, color: Color) -> Result<bool> {
    let mut scratch = *board;

    if let Some(mover) = board.get_piece(&mv.from) {
        if let Some(victim) = movement::en_passant_victim(board, &mover, &mv.from, &mv.to) {
            scratch.set_piece(&victim, None);
        }
    }
    scratch.relocate(&mv.from, &mv.to);

    let king = scratch
        .find_king(color)
        .ok_or_else(|| ChessError::InvalidBoard(format!("{} king is missing", color)))?;

    Ok(!scratch.is_square_attacked(&king, color.opposite()))
}

/// Whether `color`'s king currently stands attacked.
pub fn is_in_check(board: &Board, color: Color) -> Result<bool> {
    let king = board
        .find_king(color)
        .ok_or_else(|| ChessError::InvalidBoard(format!("{} king is missing", color)))?;
    Ok(board.is_square_attacked(&king, color.opposite()))
}
