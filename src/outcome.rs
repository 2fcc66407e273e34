use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::error::Result;
use crate::game::Game;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum GameStatus {
    #[default]
    Active,
    WhiteWins,
    BlackWins,
    Stalemate,
    FiftyMoveRule,
    ThreefoldRepetition,
    InsufficientMaterial,
}

impl GameStatus {
    pub fn winner(&self) -> Option<Color> {
        match self {
            GameStatus::WhiteWins => Some(Color::White),
            GameStatus::BlackWins => Some(Color::Black),
            _ => None,
        }
    }

    pub fn is_over(&self) -> bool {
        *self != GameStatus::Active
    }

    pub fn is_draw(&self) -> bool {
        matches!(
            self,
            GameStatus::Stalemate
                | GameStatus::FiftyMoveRule
                | GameStatus::ThreefoldRepetition
                | GameStatus::InsufficientMaterial
        )
    }

    /// PGN result token.
    pub fn result_token(&self) -> &'static str {
        match self {
            GameStatus::Active => "*",
            GameStatus::WhiteWins => "1-0",
            GameStatus::BlackWins => "0-1",
            _ => "1/2-1/2",
        }
    }
}

impl fmt::Display for GameStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            GameStatus::Active => "active",
            GameStatus::WhiteWins => "white_wins",
            GameStatus::BlackWins => "black_wins",
            GameStatus::Stalemate => "stalemate",
            GameStatus::FiftyMoveRule => "fifty_move_rule",
            GameStatus::ThreefoldRepetition => "threefold_repetition",
            GameStatus::InsufficientMaterial => "insufficient_material",
        };
        write!(f, "{}", s)
    }
}

/// Terminal status of `game`, first matching condition wins:
/// checkmate of white, checkmate of black, stalemate, fifty-move rule,
/// threefold repetition, insufficient material.
pub fn evaluate(game: &Game) -> Result<GameStatus> {
    if game.is_checkmate(Color::White)? {
        return Ok(GameStatus::BlackWins);
    }
    if game.is_checkmate(Color::Black)? {
        return Ok(GameStatus::WhiteWins);
    }
    if game.is_stalemate()? {
        return Ok(GameStatus::Stalemate);
    }
    if game.is_fifty_move_draw() {
        return Ok(GameStatus::FiftyMoveRule);
    }
    if game.is_threefold_repetition() {
        return Ok(GameStatus::ThreefoldRepetition);
    }
    if game.is_insufficient_material() {
        return Ok(GameStatus::InsufficientMaterial);
    }
    Ok(GameStatus::Active)
}
