/// Errors raised by the rules engine.
///
/// Ordinary tactical or geometric illegality is not an error: `Game::apply_move`
/// returns `Ok(false)` for those.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ChessError {
    /// Malformed or semantically invalid FEN. Raised at construction; no game is produced.
    #[error("invalid FEN: {0}")]
    InvalidFen(String),

    /// A structurally impossible move request, rejected before any mutation.
    #[error("invalid move: {0}")]
    InvalidMove(String),

    /// A previously valid board lost an invariant (e.g. a king is missing).
    #[error("invalid board state: {0}")]
    InvalidBoard(String),

    /// Malformed argument text, such as a coordinate move of the wrong length.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

pub type Result<T> = std::result::Result<T, ChessError>;
