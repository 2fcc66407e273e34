use bitflags::bitflags;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::color::Color;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum PieceKind {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl PieceKind {
    pub const PROMOTIONS: [PieceKind; 4] = [
        PieceKind::Queen,
        PieceKind::Rook,
        PieceKind::Bishop,
        PieceKind::Knight,
    ];

    /// Uppercase letter used by FEN and algebraic notation.
    pub fn letter(&self) -> char {
        match self {
            PieceKind::Pawn => 'P',
            PieceKind::Knight => 'N',
            PieceKind::Bishop => 'B',
            PieceKind::Rook => 'R',
            PieceKind::Queen => 'Q',
            PieceKind::King => 'K',
        }
    }

    pub fn from_letter(c: char) -> Option<Self> {
        let kind = match c.to_ascii_uppercase() {
            'P' => PieceKind::Pawn,
            'N' => PieceKind::Knight,
            'B' => PieceKind::Bishop,
            'R' => PieceKind::Rook,
            'Q' => PieceKind::Queen,
            'K' => PieceKind::King,
            _ => return None,
        };
        Some(kind)
    }

    /// Whether a pawn may promote to this kind.
    pub fn is_promotion_target(&self) -> bool {
        match self {
            PieceKind::Knight | PieceKind::Bishop | PieceKind::Rook | PieceKind::Queen => true,
            PieceKind::Pawn | PieceKind::King => false,
        }
    }

    pub fn is_minor(&self) -> bool {
        matches!(self, PieceKind::Knight | PieceKind::Bishop)
    }
}

bitflags! {
    /// Per-piece state. Which flags are meaningful depends on the kind:
    /// pawns use `EN_PASSANT_VULNERABLE`, rooks use `HAS_MOVED`, kings use
    /// `HAS_MOVED` and the two castle-used flags.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    #[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
    pub struct PieceFlags: u8 {
        const EN_PASSANT_VULNERABLE = 0b0000_0001;
        const HAS_MOVED = 0b0000_0010;
        const KINGSIDE_CASTLE_USED = 0b0000_0100;
        const QUEENSIDE_CASTLE_USED = 0b0000_1000;
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Piece {
    pub kind: PieceKind,
    pub color: Color,
    pub flags: PieceFlags,
}

impl Piece {
    pub fn new(kind: PieceKind, color: Color) -> Self {
        Piece {
            kind,
            color,
            flags: PieceFlags::empty(),
        }
    }

    pub fn is(&self, kind: PieceKind, color: Color) -> bool {
        self.kind == kind && self.color == color
    }

    pub fn has_moved(&self) -> bool {
        self.flags.contains(PieceFlags::HAS_MOVED)
    }

    pub fn is_en_passant_vulnerable(&self) -> bool {
        self.kind == PieceKind::Pawn && self.flags.contains(PieceFlags::EN_PASSANT_VULNERABLE)
    }

    /// Records that the piece has left its square. Only kings and rooks track this.
    pub fn mark_moved(&mut self) {
        match self.kind {
            PieceKind::King | PieceKind::Rook => self.flags.insert(PieceFlags::HAS_MOVED),
            PieceKind::Pawn | PieceKind::Knight | PieceKind::Bishop | PieceKind::Queen => {}
        }
    }

    pub fn set_en_passant_vulnerable(&mut self, vulnerable: bool) {
        if self.kind == PieceKind::Pawn {
            self.flags.set(PieceFlags::EN_PASSANT_VULNERABLE, vulnerable);
        }
    }

    pub fn to_char(&self) -> char {
        let c = self.kind.letter();
        match self.color {
            Color::White => c,
            Color::Black => c.to_ascii_lowercase(),
        }
    }

    pub fn from_char(c: char) -> Option<Self> {
        if !c.is_ascii_alphabetic() {
            return None;
        }

        let color = if c.is_ascii_uppercase() {
            Color::White
        } else {
            Color::Black
        };

        PieceKind::from_letter(c).map(|kind| Piece::new(kind, color))
    }
}
