//! Per-kind movement rules.
//!
//! Two predicates per piece kind: [`attacks_square`] is pure geometry over the
//! current occupancy and is what check detection uses; [`can_move`] adds the
//! base checks, the kind's full move geometry (pushes, en passant, castling)
//! and finally the legality oracle.

use crate::board::Board;
use crate::color::Color;
use crate::error::Result;
use crate::legality;
use crate::pieces::{Piece, PieceFlags, PieceKind};
use crate::r#move::Move;
use crate::square::Square;

/// Whether the piece standing on `from` attacks `to`.
///
/// Ignores whose turn it is and whether the attacker's own king would be
/// exposed. Returns `false` for an empty `from` or `from == to`.
pub fn attacks_square(board: &Board, from: &Square, to: &Square) -> bool {
    if from == to {
        return false;
    }

    let Some(piece) = board.get_piece(from) else {
        return false;
    };

    match piece.kind {
        PieceKind::Pawn => pawn_attacks(piece.color, from, to),
        PieceKind::Knight => from.distance_squared(to) == 5,
        PieceKind::Bishop => bishop_attacks(board, from, to),
        PieceKind::Rook => rook_attacks(board, from, to),
        PieceKind::Queen => rook_attacks(board, from, to) || bishop_attacks(board, from, to),
        PieceKind::King => matches!(from.distance_squared(to), 1 | 2),
    }
}

fn pawn_attacks(color: Color, from: &Square, to: &Square) -> bool {
    from.rank_delta(to) == color.forward() && from.file_delta(to).abs() == 1
}

fn bishop_attacks(board: &Board, from: &Square, to: &Square) -> bool {
    let df = from.file_delta(to);
    let dr = from.rank_delta(to);
    df != 0 && df.abs() == dr.abs() && path_is_clear(board, from, to)
}

fn rook_attacks(board: &Board, from: &Square, to: &Square) -> bool {
    (from.file() == to.file()) != (from.rank() == to.rank()) && path_is_clear(board, from, to)
}

fn path_is_clear(board: &Board, from: &Square, to: &Square) -> bool {
    from.between(to).all(|square| board.is_empty(&square))
}

/// Full move predicate for the piece on `mv.from`: base checks, kind geometry,
/// then the king-safety oracle.
pub fn can_move(board: &Board, mv: &Move) -> Result<bool> {
    let Some(piece) = board.get_piece(&mv.from) else {
        return Ok(false);
    };

    if mv.from == mv.to {
        return Ok(false);
    }

    if let Some(target) = board.get_piece(&mv.to) {
        // Kings are never captured; the side to move can only be mated.
        if target.color == piece.color || target.kind == PieceKind::King {
            return Ok(false);
        }
    }

    let geometry_ok = match piece.kind {
        PieceKind::Pawn => pawn_can_move(board, &piece, &mv.from, &mv.to),
        PieceKind::Knight | PieceKind::Bishop | PieceKind::Rook | PieceKind::Queen => {
            attacks_square(board, &mv.from, &mv.to)
        }
        PieceKind::King => {
            if attacks_square(board, &mv.from, &mv.to) {
                true
            } else {
                return castle_allowed(board, &piece, &mv.from, &mv.to);
            }
        }
    };

    if !geometry_ok {
        return Ok(false);
    }

    legality::is_legal_move(board, mv, piece.color)
}

/// Pawn geometry: pushes, double push from the start rank, captures and en passant.
pub(crate) fn pawn_can_move(board: &Board, pawn: &Piece, from: &Square, to: &Square) -> bool {
    let forward = pawn.color.forward();
    let df = from.file_delta(to);
    let dr = from.rank_delta(to);

    match board.get_piece(to) {
        None if df == 0 && dr == forward => true,
        None if df == 0 && dr == 2 * forward => {
            from.rank() == pawn.color.pawn_start_rank()
                && from
                    .offset(0, forward)
                    .is_some_and(|middle| board.is_empty(&middle))
        }
        None if df.abs() == 1 && dr == forward => en_passant_victim(board, pawn, from, to).is_some(),
        Some(target) => target.color != pawn.color && df.abs() == 1 && dr == forward,
        None => false,
    }
}

/// The square of the pawn an en-passant capture from `from` to `to` would
/// remove, if such a capture is geometrically available.
pub(crate) fn en_passant_victim(
    board: &Board,
    pawn: &Piece,
    from: &Square,
    to: &Square,
) -> Option<Square> {
    if pawn.kind != PieceKind::Pawn
        || !board.is_empty(to)
        || from.file_delta(to).abs() != 1
        || from.rank_delta(to) != pawn.color.forward()
    {
        return None;
    }

    let beside = Square::new(to.file(), from.rank())?;
    board
        .get_piece(&beside)
        .filter(|victim| victim.color != pawn.color && victim.is_en_passant_vulnerable())
        .map(|_| beside)
}

/// Which side a king move from `from` to `to` would castle towards, by
/// geometry alone: two files along the home rank.
pub(crate) fn castle_side(king: &Piece, from: &Square, to: &Square) -> Option<CastleSide> {
    let home = king.color.home_rank();
    if king.kind != PieceKind::King
        || from.rank() != home
        || to.rank() != home
        || from.distance_squared(to) != 4
    {
        return None;
    }

    if to.file() > from.file() {
        Some(CastleSide::Kingside)
    } else {
        Some(CastleSide::Queenside)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CastleSide {
    Kingside,
    Queenside,
}

impl CastleSide {
    pub fn used_flag(&self) -> PieceFlags {
        match self {
            CastleSide::Kingside => PieceFlags::KINGSIDE_CASTLE_USED,
            CastleSide::Queenside => PieceFlags::QUEENSIDE_CASTLE_USED,
        }
    }

    /// Rook source and destination for a king landing on `king_to`.
    pub fn rook_squares(&self, king_to: &Square) -> Option<(Square, Square)> {
        match self {
            CastleSide::Kingside => Some((king_to.offset(1, 0)?, king_to.offset(-1, 0)?)),
            CastleSide::Queenside => Some((king_to.offset(-2, 0)?, king_to.offset(1, 0)?)),
        }
    }

    /// Corner the partner rook starts on for `color`.
    pub fn rook_home(&self, color: Color) -> Option<Square> {
        match self {
            CastleSide::Kingside => Square::new(7, color.home_rank()),
            CastleSide::Queenside => Square::new(0, color.home_rank()),
        }
    }
}

/// The partner rook for a castle, if it is present and has never moved.
pub(crate) fn castle_partner(
    board: &Board,
    king: &Piece,
    side: CastleSide,
    king_to: &Square,
) -> Option<Square> {
    let (rook_from, _) = side.rook_squares(king_to)?;
    board
        .get_piece(&rook_from)
        .filter(|rook| rook.is(PieceKind::Rook, king.color) && !rook.has_moved())
        .map(|_| rook_from)
}

fn castle_allowed(board: &Board, king: &Piece, from: &Square, to: &Square) -> Result<bool> {
    let Some(side) = castle_side(king, from, to) else {
        return Ok(false);
    };

    if king.has_moved() || king.flags.contains(side.used_flag()) {
        return Ok(false);
    }

    let Some(rook_from) = castle_partner(board, king, side, to) else {
        return Ok(false);
    };

    if from.between(&rook_from).any(|square| !board.is_empty(&square)) {
        return Ok(false);
    }

    let enemy = king.color.opposite();
    if board.is_square_attacked(from, enemy) {
        return Ok(false);
    }

    let crossed_or_attacked = from
        .between(to)
        .chain(std::iter::once(*to))
        .any(|square| board.is_square_attacked(&square, enemy));

    Ok(!crossed_or_attacked)
}
