use std::fmt;
use std::str::FromStr;

use rustc_hash::FxHashMap;
use tracing::{debug, trace};

use crate::board::{Board, Placement};
use crate::color::Color;
use crate::error::{ChessError, Result};
use crate::fen;
use crate::legality;
use crate::movement;
use crate::outcome::{self, GameStatus};
use crate::pieces::{Piece, PieceKind};
use crate::r#move::{Annotation, Move, MoveKind};
use crate::square::Square;

pub const STANDARD_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// A game in progress: the grid plus side to move, clocks, history and status.
#[derive(Clone, Debug)]
pub struct Game {
    board: Board,
    turn: Color,

    halfmove_clock: u32,
    fullmove_number: u32,

    /// Pieces no longer on the board, indexed by [`Color::index`].
    captured: [Vec<Piece>; 2],

    move_history: Vec<Move>,
    snapshots: Vec<Placement>,
    repetitions: FxHashMap<Placement, u32>,

    starting_fen: String,
    status: GameStatus,
}

impl Game {
    pub fn standard() -> Self {
        let board = Board::standard();
        let placement = board.placement();

        let mut repetitions = FxHashMap::default();
        repetitions.insert(placement, 1);

        Game {
            board,
            turn: Color::White,
            halfmove_clock: 0,
            fullmove_number: 1,
            captured: [Vec::new(), Vec::new()],
            move_history: Vec::new(),
            snapshots: vec![placement],
            repetitions,
            starting_fen: STANDARD_FEN.to_string(),
            status: GameStatus::Active,
        }
    }

    pub fn from_fen(fen: &str) -> Result<Self> {
        fen::parse(fen)
    }

    /// Assembles a game from already-validated FEN fields and evaluates its status.
    pub(crate) fn from_parts(
        board: Board,
        turn: Color,
        halfmove_clock: u32,
        fullmove_number: u32,
        captured: [Vec<Piece>; 2],
    ) -> Result<Self> {
        let placement = board.placement();
        let mut repetitions = FxHashMap::default();
        repetitions.insert(placement, 1);

        let mut game = Game {
            board,
            turn,
            halfmove_clock,
            fullmove_number,
            captured,
            move_history: Vec::new(),
            snapshots: vec![placement],
            repetitions,
            starting_fen: String::new(),
            status: GameStatus::Active,
        };
        game.starting_fen = fen::format(&game);
        game.status = outcome::evaluate(&game)?;

        debug!(fen = %game.starting_fen, status = %game.status, "game constructed");
        Ok(game)
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn get_piece(&self, square: &Square) -> Option<Piece> {
        self.board.get_piece(square)
    }

    /// Edits a square directly, bypassing every rule. Status is not re-evaluated.
    pub fn set_piece(&mut self, square: &Square, piece: Option<Piece>) {
        self.board.set_piece(square, piece);
    }

    pub fn turn(&self) -> Color {
        self.turn
    }

    pub fn halfmove_clock(&self) -> u32 {
        self.halfmove_clock
    }

    pub fn fullmove_number(&self) -> u32 {
        self.fullmove_number
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn is_over(&self) -> bool {
        self.status.is_over()
    }

    pub fn pieces(&self, color: Color) -> Vec<(Square, Piece)> {
        self.board.pieces(color)
    }

    /// Pieces of `color` that have left the board.
    pub fn captured(&self, color: Color) -> &[Piece] {
        &self.captured[color.index()]
    }

    pub fn move_history(&self) -> &[Move] {
        &self.move_history
    }

    /// Placement after every ply, starting with the initial position.
    pub fn snapshots(&self) -> &[Placement] {
        &self.snapshots
    }

    /// FEN of the position this game started from.
    pub fn starting_fen(&self) -> &str {
        &self.starting_fen
    }

    pub fn to_fen(&self) -> String {
        fen::format(self)
    }

    pub fn move_from_coordinates(&self, text: &str, promotion: Option<PieceKind>) -> Result<Move> {
        Move::from_coordinates(self, text, promotion)
    }

    /// Plays `mv` if it is legal for the side to move.
    ///
    /// Structural problems (empty source, same-colour capture, a promotion
    /// piece that cannot apply) are errors. Tactical or geometric illegality
    /// returns `Ok(false)` and leaves the game untouched.
    pub fn apply_move(&mut self, mv: &Move) -> Result<bool> {
        let piece = self
            .board
            .get_piece(&mv.from)
            .ok_or_else(|| ChessError::InvalidMove(format!("source square {} is empty", mv.from)))?;

        if let Some(target) = self.board.get_piece(&mv.to) {
            if target.color == piece.color {
                return Err(ChessError::InvalidMove(format!(
                    "{} and {} hold pieces of the same colour",
                    mv.from, mv.to
                )));
            }
        }

        let reaches_last_rank =
            piece.kind == PieceKind::Pawn && mv.to.rank() == piece.color.promotion_rank();
        let promotion = match mv.promotion {
            Some(kind) if !reaches_last_rank => {
                return Err(ChessError::InvalidMove(format!(
                    "{} to {} is not a promotion, cannot promote to {:?}",
                    mv.from, mv.to, kind
                )));
            }
            Some(kind) if !kind.is_promotion_target() => {
                return Err(ChessError::InvalidMove(format!("cannot promote to {:?}", kind)));
            }
            Some(kind) => Some(kind),
            None if reaches_last_rank => Some(PieceKind::Queen),
            None => None,
        };

        if self.status.is_over() {
            trace!(mv = %mv.to_coordinates(), status = %self.status, "game is over");
            return Ok(false);
        }

        if piece.color != self.turn || mv.color != self.turn {
            trace!(mv = %mv.to_coordinates(), turn = %self.turn, "not this side's move");
            return Ok(false);
        }

        if !movement::can_move(&self.board, mv)? {
            trace!(mv = %mv.to_coordinates(), "illegal move rejected");
            return Ok(false);
        }

        let mut record = Move::classified(&self.board, mv.from, mv.to, self.turn, promotion)?;
        let (halfmove_clock, fullmove_number) = self.next_clocks(&record)?;

        let captured = self.execute(&record, piece);

        if let Some(victim) = captured {
            self.captured[victim.color.index()].push(victim);
        }

        self.halfmove_clock = halfmove_clock;
        self.fullmove_number = fullmove_number;
        self.turn = self.turn.opposite();
        self.clear_en_passant(self.turn);

        let placement = self.board.placement();
        self.snapshots.push(placement);
        *self.repetitions.entry(placement).or_insert(0) += 1;

        let previous = self.status;
        self.status = outcome::evaluate(self)?;

        record.annotation = if self.status.winner().is_some() {
            Some(Annotation::Checkmate)
        } else if self.is_in_check(self.turn)? {
            Some(Annotation::Check)
        } else {
            None
        };
        self.move_history.push(record);

        debug!(
            mv = %record.to_coordinates(),
            halfmove_clock = self.halfmove_clock,
            fullmove_number = self.fullmove_number,
            "move applied"
        );
        if self.status != previous {
            debug!(status = %self.status, "game status changed");
        }

        Ok(true)
    }

    /// Clock values after `record`, checked before the board is touched.
    fn next_clocks(&self, record: &Move) -> Result<(u32, u32)> {
        let halfmove_clock = if record.is_zeroing() {
            0
        } else {
            self.halfmove_clock.checked_add(1).ok_or_else(|| {
                ChessError::InvalidBoard("half-move clock overflow".to_string())
            })?
        };

        let fullmove_number = if self.turn == Color::Black {
            self.fullmove_number.checked_add(1).ok_or_else(|| {
                ChessError::InvalidBoard("full-move number overflow".to_string())
            })?
        } else {
            self.fullmove_number
        };

        Ok((halfmove_clock, fullmove_number))
    }

    /// Rearranges the grid for an already-validated move, returning the captured piece.
    fn execute(&mut self, record: &Move, piece: Piece) -> Option<Piece> {
        let mut captured = None;

        match record.kind {
            MoveKind::EnPassant => {
                if let Some(victim) =
                    movement::en_passant_victim(&self.board, &piece, &record.from, &record.to)
                {
                    captured = self.board.get_piece(&victim);
                    self.board.set_piece(&victim, None);
                }
                self.board.relocate(&record.from, &record.to);
            }
            MoveKind::ShortCastles | MoveKind::LongCastles => {
                self.board.relocate(&record.from, &record.to);
                if let Some(side) = movement::castle_side(&piece, &record.from, &record.to) {
                    if let Some((rook_from, rook_to)) = side.rook_squares(&record.to) {
                        self.board.relocate(&rook_from, &rook_to);
                        if let Some(rook) = self.board.piece_mut(&rook_to) {
                            rook.mark_moved();
                        }
                    }
                    if let Some(king) = self.board.piece_mut(&record.to) {
                        king.flags.insert(side.used_flag());
                    }
                }
            }
            MoveKind::Normal | MoveKind::Capture | MoveKind::Promotion => {
                captured = self.board.relocate(&record.from, &record.to);
            }
        }

        if let Some(kind) = record.promotion {
            let mut promoted = Piece::new(kind, piece.color);
            promoted.mark_moved();
            self.board.set_piece(&record.to, Some(promoted));
        } else if let Some(mover) = self.board.piece_mut(&record.to) {
            mover.mark_moved();
        }

        if piece.kind == PieceKind::Pawn && record.from.rank_delta(&record.to).abs() == 2 {
            let exposed = [-1, 1].into_iter().any(|df| {
                record
                    .to
                    .offset(df, 0)
                    .and_then(|beside| self.board.get_piece(&beside))
                    .is_some_and(|other| other.is(PieceKind::Pawn, piece.color.opposite()))
            });
            if let Some(pawn) = self.board.piece_mut(&record.to) {
                pawn.set_en_passant_vulnerable(exposed);
            }
        }

        captured
    }

    /// Drops the en-passant mark from `color`'s pawns once the opponent has replied.
    fn clear_en_passant(&mut self, color: Color) {
        for square in Square::all() {
            if let Some(piece) = self.board.piece_mut(&square) {
                if piece.color == color {
                    piece.set_en_passant_vulnerable(false);
                }
            }
        }
    }

    /// Every legal move for the side to move. Promotions appear once per
    /// promotion piece.
    pub fn legal_moves(&self) -> Result<Vec<Move>> {
        self.legal_moves_for(self.turn)
    }

    /// Legal moves for the piece on `square`, if it belongs to the side to move.
    pub fn legal_moves_from(&self, square: &Square) -> Result<Vec<Move>> {
        match self.board.get_piece(square) {
            Some(piece) if piece.color == self.turn => self.moves_from(*square, piece.color),
            _ => Ok(Vec::new()),
        }
    }

    fn legal_moves_for(&self, color: Color) -> Result<Vec<Move>> {
        let mut moves = Vec::new();
        for (from, _) in self.board.pieces(color) {
            moves.extend(self.moves_from(from, color)?);
        }
        Ok(moves)
    }

    fn moves_from(&self, from: Square, color: Color) -> Result<Vec<Move>> {
        let mut moves = Vec::new();

        for to in Square::all() {
            let candidate = Move::classified(&self.board, from, to, color, None)?;
            if !movement::can_move(&self.board, &candidate)? {
                continue;
            }

            if candidate.kind == MoveKind::Promotion {
                moves.extend(PieceKind::PROMOTIONS.iter().map(|&kind| Move {
                    promotion: Some(kind),
                    ..candidate
                }));
            } else {
                moves.push(candidate);
            }
        }

        Ok(moves)
    }

    fn has_any_legal_move(&self, color: Color) -> Result<bool> {
        for (from, _) in self.board.pieces(color) {
            for to in Square::all() {
                let candidate = Move::classified(&self.board, from, to, color, None)?;
                if movement::can_move(&self.board, &candidate)? {
                    return Ok(true);
                }
            }
        }
        Ok(false)
    }

    pub fn is_in_check(&self, color: Color) -> Result<bool> {
        legality::is_in_check(&self.board, color)
    }

    /// `color`'s king is attacked and no piece of `color` has a legal move.
    pub fn is_checkmate(&self, color: Color) -> Result<bool> {
        Ok(self.is_in_check(color)? && !self.has_any_legal_move(color)?)
    }

    /// The side to move is not in check and has no legal move.
    pub fn is_stalemate(&self) -> Result<bool> {
        Ok(!self.is_in_check(self.turn)? && !self.has_any_legal_move(self.turn)?)
    }

    pub fn is_fifty_move_draw(&self) -> bool {
        self.halfmove_clock >= 100
    }

    /// Some placement (ignoring side to move, rights and clocks) has occurred
    /// three or more times.
    pub fn is_threefold_repetition(&self) -> bool {
        self.repetitions.values().any(|&count| count >= 3)
    }

    /// Bare kings, or a lone bishop or knight against a bare king.
    ///
    /// One minor piece on each side (K+B vs K+N) is still sufficient.
    pub fn is_insufficient_material(&self) -> bool {
        let mut others = self
            .board
            .occupied()
            .filter(|(_, piece)| piece.kind != PieceKind::King);

        match (others.next(), others.next()) {
            (None, _) => true,
            (Some((_, piece)), None) => piece.kind.is_minor(),
            _ => false,
        }
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::standard()
    }
}

impl FromStr for Game {
    type Err = ChessError;

    fn from_str(s: &str) -> Result<Self> {
        fen::parse(s)
    }
}

impl fmt::Display for Game {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Game(turn: {}, status: {}, move: {})\n{}",
            self.turn, self.status, self.fullmove_number, self.board
        )
    }
}
