//! Chess rules engine: board state, move legality, terminal states and FEN.
//!
//! ```
//! use chess_rules::{Game, GameStatus};
//!
//! let mut game = Game::standard();
//! let mv = game.move_from_coordinates("e2e4", None)?;
//! assert!(game.apply_move(&mv)?);
//! assert_eq!(
//!     game.to_fen(),
//!     "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq - 0 1"
//! );
//! assert_eq!(game.status(), GameStatus::Active);
//! # Ok::<(), chess_rules::ChessError>(())
//! ```

pub mod board;
pub mod color;
pub mod error;
pub mod fen;
pub mod game;
pub mod legality;
pub mod r#move;
pub mod movement;
pub mod outcome;
pub mod pgn;
pub mod pieces;
pub mod player;
pub mod square;

#[cfg(feature = "serde")]
pub mod serde_support;

pub use board::Board;
pub use color::Color;
pub use error::{ChessError, Result};
pub use game::Game;
pub use r#move::{Annotation, Move, MoveKind};
pub use outcome::GameStatus;
pub use pgn::{Pgn, PgnHeaders, write_pgn};
pub use pieces::{Piece, PieceFlags, PieceKind};
pub use player::Player;
pub use square::Square;
