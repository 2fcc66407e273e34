use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::board::Board;
use crate::color::Color;
use crate::error::{ChessError, Result};
use crate::game::Game;
use crate::movement::{self, CastleSide};
use crate::pieces::PieceKind;
use crate::square::Square;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum MoveKind {
    Normal,
    Capture,
    ShortCastles,
    LongCastles,
    EnPassant,
    Promotion,
}

/// Display-only suffix computed by playing the move on a copy of the game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Annotation {
    Check,
    Checkmate,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Move {
    pub from: Square,
    pub to: Square,
    /// Acting side.
    pub color: Color,
    /// Kind of the piece standing on `from` when the move was built.
    pub piece: PieceKind,
    pub kind: MoveKind,
    /// Set for ordinary captures, capturing promotions and en passant.
    pub capture: bool,
    pub promotion: Option<PieceKind>,
    pub annotation: Option<Annotation>,
}

impl Move {
    /// Labels a from/to pair by board context alone, without a full legality check.
    pub fn classify(board: &Board, from: &Square, to: &Square) -> MoveKind {
        let Some(piece) = board.get_piece(from) else {
            return MoveKind::Normal;
        };

        match piece.kind {
            PieceKind::King => {
                if let Some(side) = movement::castle_side(&piece, from, to) {
                    if !piece.has_moved()
                        && movement::castle_partner(board, &piece, side, to).is_some()
                    {
                        return match side {
                            CastleSide::Kingside => MoveKind::ShortCastles,
                            CastleSide::Queenside => MoveKind::LongCastles,
                        };
                    }
                }
            }
            PieceKind::Pawn => {
                if movement::en_passant_victim(board, &piece, from, to).is_some() {
                    return MoveKind::EnPassant;
                }
                if movement::pawn_can_move(board, &piece, from, to)
                    && to.rank() == piece.color.promotion_rank()
                {
                    return MoveKind::Promotion;
                }
            }
            PieceKind::Knight | PieceKind::Bishop | PieceKind::Rook | PieceKind::Queen => {}
        }

        if board.is_empty(to) {
            MoveKind::Normal
        } else {
            MoveKind::Capture
        }
    }

    /// Builds a move for the piece on `from`, labelled by [`Move::classify`].
    pub fn classified(
        board: &Board,
        from: Square,
        to: Square,
        color: Color,
        promotion: Option<PieceKind>,
    ) -> Result<Self> {
        let piece = board
            .get_piece(&from)
            .ok_or_else(|| ChessError::InvalidMove(format!("no piece on {}", from)))?;

        let mut kind = Move::classify(board, &from, &to);
        if promotion.is_some() && piece.kind == PieceKind::Pawn {
            kind = MoveKind::Promotion;
        }

        Ok(Move {
            from,
            to,
            color,
            piece: piece.kind,
            kind,
            capture: kind == MoveKind::EnPassant || !board.is_empty(&to),
            promotion,
            annotation: None,
        })
    }

    /// Parses 4-character coordinate text (`e2e4`) against `game`, with an
    /// optional promotion piece. Structural problems are reported before the
    /// game is touched; tactical legality is left to [`Game::apply_move`].
    pub fn from_coordinates(game: &Game, text: &str, promotion: Option<PieceKind>) -> Result<Self> {
        if text.len() != 4 || !text.is_ascii() {
            return Err(ChessError::InvalidArgument(format!(
                "coordinate move must be 4 characters, got {:?}",
                text
            )));
        }

        let from = Square::from_algebraic(&text[0..2])?;
        let to = Square::from_algebraic(&text[2..4])?;
        let board = game.board();

        let piece = board
            .get_piece(&from)
            .ok_or_else(|| ChessError::InvalidMove(format!("source square {} is empty", from)))?;

        if let Some(target) = board.get_piece(&to) {
            if target.color == piece.color {
                return Err(ChessError::InvalidMove(format!(
                    "{} and {} hold pieces of the same colour",
                    from, to
                )));
            }
        }

        if let Some(promotion) = promotion {
            if piece.kind != PieceKind::Pawn {
                return Err(ChessError::InvalidMove(format!(
                    "promotion requires a pawn on {}",
                    from
                )));
            }
            if to.rank() != piece.color.promotion_rank() {
                return Err(ChessError::InvalidMove(format!(
                    "{} is not on the last rank for {}",
                    to, piece.color
                )));
            }
            if !promotion.is_promotion_target() {
                return Err(ChessError::InvalidMove(format!(
                    "cannot promote to {:?}",
                    promotion
                )));
            }
        }

        let mut mv = Move::classified(board, from, to, game.turn(), promotion)?;
        mv.annotation = Move::speculative_annotation(game, &mv);
        Ok(mv)
    }

    /// Plays `mv` on a copy of `game` and reports whether it gives check or mate.
    fn speculative_annotation(game: &Game, mv: &Move) -> Option<Annotation> {
        let mut after = game.clone();
        match after.apply_move(mv) {
            Ok(true) => after.move_history().last().and_then(|played| played.annotation),
            _ => None,
        }
    }

    /// Whether this move resets the fifty-move clock.
    pub fn is_zeroing(&self) -> bool {
        self.capture || self.piece == PieceKind::Pawn
    }

    /// Coordinate form: `e2e4`, `h7h8q`.
    pub fn to_coordinates(&self) -> String {
        let mut text = format!("{}{}", self.from, self.to);
        if let Some(promotion) = self.promotion {
            text.push(promotion.letter().to_ascii_lowercase());
        }
        text
    }

    /// Standard algebraic notation, including any check/mate annotation.
    pub fn to_algebraic(&self) -> String {
        let mut text = match self.kind {
            MoveKind::ShortCastles => "O-O".to_string(),
            MoveKind::LongCastles => "O-O-O".to_string(),
            _ if self.piece == PieceKind::Pawn => {
                let mut text = String::new();
                if self.capture {
                    text.push((b'a' + self.from.file()) as char);
                    text.push('x');
                }
                text.push_str(&self.to.to_algebraic());
                if self.kind == MoveKind::Promotion {
                    let promotion = self.promotion.unwrap_or(PieceKind::Queen);
                    text.push('=');
                    text.push(promotion.letter());
                }
                text
            }
            _ => {
                let mut text = String::new();
                text.push(self.piece.letter());
                if self.capture {
                    text.push('x');
                }
                text.push_str(&self.to.to_algebraic());
                text
            }
        };

        match self.annotation {
            Some(Annotation::Check) => text.push('+'),
            Some(Annotation::Checkmate) => text.push('#'),
            None => {}
        }

        text
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_algebraic())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fen;
    use rstest::rstest;

    fn sq(s: &str) -> Square {
        Square::from_algebraic(s).expect("valid square")
    }

    fn game(fen_text: &str) -> Game {
        fen::parse(fen_text).expect("valid FEN")
    }

    #[rstest]
    #[case("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1", "e2", "e4", MoveKind::Normal)]
    #[case("rnbqkbnr/ppp1pppp/8/3p4/4P3/8/PPPP1PPP/RNBQKBNR w KQkq - 0 2", "e4", "d5", MoveKind::Capture)]
    #[case("4k3/8/8/8/8/8/8/R3K2R w KQ - 0 1", "e1", "g1", MoveKind::ShortCastles)]
    #[case("4k3/8/8/8/8/8/8/R3K2R w KQ - 0 1", "e1", "c1", MoveKind::LongCastles)]
    #[case("4k3/8/8/8/8/8/8/R3K3 w Q - 0 1", "e1", "g1", MoveKind::Normal)]
    #[case("rnbqkbnr/ppp1ppp1/7p/3pP3/8/8/PPPP1PPP/RNBQKBNR w KQkq d6 0 3", "e5", "d6", MoveKind::EnPassant)]
    #[case("4k3/7P/8/8/8/8/8/4K3 w - - 0 1", "h7", "h8", MoveKind::Promotion)]
    #[case("4k1r1/7P/8/8/8/8/8/4K3 w - - 0 1", "h7", "g8", MoveKind::Promotion)]
    #[case("4k3/8/8/8/8/8/p7/4K3 b - - 0 1", "a2", "a1", MoveKind::Promotion)]
    fn test_classify(
        #[case] fen_text: &str,
        #[case] from: &str,
        #[case] to: &str,
        #[case] expected: MoveKind,
    ) {
        let game = game(fen_text);
        assert_eq!(Move::classify(game.board(), &sq(from), &sq(to)), expected);
    }

    #[test]
    fn test_classify_castle_needs_unmoved_rook() {
        let mut game = game("4k3/8/8/8/8/8/8/R3K2R w KQ - 0 1");
        let mut rook = game.get_piece(&sq("h1")).expect("rook on h1");
        rook.mark_moved();
        game.set_piece(&sq("h1"), Some(rook));
        assert_eq!(
            Move::classify(game.board(), &sq("e1"), &sq("g1")),
            MoveKind::Normal
        );
    }

    #[test]
    fn test_from_coordinates_wrong_length_is_argument_error() {
        let game = Game::standard();
        for text in ["e2e", "e2e4q", "", "e2-e4"] {
            assert!(matches!(
                Move::from_coordinates(&game, text, None),
                Err(ChessError::InvalidArgument(_))
            ));
        }
        assert!(matches!(
            Move::from_coordinates(&game, "z2e4", None),
            Err(ChessError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_from_coordinates_structural_errors() {
        let game = Game::standard();
        assert!(matches!(
            Move::from_coordinates(&game, "e4e5", None),
            Err(ChessError::InvalidMove(_))
        ));
        assert!(matches!(
            Move::from_coordinates(&game, "e1e2", None),
            Err(ChessError::InvalidMove(_))
        ));
    }

    #[test]
    fn test_from_coordinates_promotion_validation() {
        let game = game("4k3/7P/8/8/8/8/R7/4K3 w - - 0 1");

        let ok = Move::from_coordinates(&game, "h7h8", Some(PieceKind::Queen))
            .expect("valid promotion");
        assert_eq!(ok.kind, MoveKind::Promotion);
        assert_eq!(ok.promotion, Some(PieceKind::Queen));

        assert!(matches!(
            Move::from_coordinates(&game, "h7h8", Some(PieceKind::Pawn)),
            Err(ChessError::InvalidMove(_))
        ));
        assert!(matches!(
            Move::from_coordinates(&game, "h7h8", Some(PieceKind::King)),
            Err(ChessError::InvalidMove(_))
        ));
        assert!(matches!(
            Move::from_coordinates(&game, "a2a8", Some(PieceKind::Queen)),
            Err(ChessError::InvalidMove(_))
        ));

        let black = self::game("4k3/8/8/8/8/8/p7/4K3 b - - 0 1");
        assert!(matches!(
            Move::from_coordinates(&black, "a2a3", Some(PieceKind::Queen)),
            Err(ChessError::InvalidMove(_))
        ));
    }

    #[rstest]
    #[case("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1", "e2e4", None, "e4")]
    #[case("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1", "g1f3", None, "Nf3")]
    #[case("rnbqkbnr/ppp1pppp/8/3p4/4P3/8/PPPP1PPP/RNBQKBNR w KQkq - 0 2", "e4d5", None, "exd5")]
    #[case("rnbqkbnr/ppp1pppp/8/3p4/4P3/5N2/PPPP1PPP/RNBQKB1R b KQkq - 1 2", "d8d6", None, "Qd6")]
    #[case("rnbqkbnr/ppp1ppp1/7p/3pP3/8/8/PPPP1PPP/RNBQKBNR w KQkq d6 0 3", "e5d6", None, "exd6")]
    #[case("4k3/8/8/8/8/8/8/R3K2R w KQ - 0 1", "e1g1", None, "O-O")]
    #[case("4k3/8/8/8/8/8/8/R3K2R w KQ - 0 1", "e1c1", None, "O-O-O")]
    #[case("8/7P/8/8/8/8/k7/4K3 w - - 0 1", "h7h8", Some(PieceKind::Knight), "h8=N")]
    #[case("6r1/7P/8/8/8/8/k7/4K3 w - - 0 1", "h7g8", Some(PieceKind::Rook), "hxg8=R")]
    #[case("4k3/8/8/8/8/8/8/R3K3 w Q - 0 1", "a1a8", None, "Ra8+")]
    #[case("3k4/8/3K4/8/8/8/8/7R w - - 0 1", "h1h8", None, "Rh8#")]
    #[case("rnbqkbnr/pppp1ppp/8/4p3/4P3/8/PPPP1PPP/RNBQKBNR w KQkq - 0 2", "f1c4", None, "Bc4")]
    fn test_algebraic_rendering(
        #[case] fen_text: &str,
        #[case] coordinates: &str,
        #[case] promotion: Option<PieceKind>,
        #[case] expected: &str,
    ) {
        let game = game(fen_text);
        let mv = Move::from_coordinates(&game, coordinates, promotion).expect("well-formed move");
        assert_eq!(mv.to_algebraic(), expected);
        assert_eq!(mv.to_string(), expected);
    }

    #[test]
    fn test_coordinates_rendering() {
        let game = game("8/7P/8/8/8/8/k7/4K3 w - - 0 1");
        let mv = Move::from_coordinates(&game, "h7h8", Some(PieceKind::Queen))
            .expect("valid promotion");
        assert_eq!(mv.to_coordinates(), "h7h8q");
    }

    #[test]
    fn test_annotation_does_not_mutate_game() {
        let game = game("3k4/8/3K4/8/8/8/8/7R w - - 0 1");
        let before = game.to_fen();
        let mv = Move::from_coordinates(&game, "h1h8", None).expect("well-formed move");
        assert_eq!(mv.annotation, Some(Annotation::Checkmate));
        assert_eq!(game.to_fen(), before);
        assert!(game.move_history().is_empty());
    }
}
