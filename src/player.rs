use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::color::Color;

pub const DEFAULT_PLAYER_NAME: &str = "Anonymous";

/// Who sits on one side of the board. The rules core never inspects this.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Player {
    pub color: Color,
    pub name: String,
    pub is_human: bool,
}

impl Player {
    pub fn new(color: Color) -> Self {
        Player {
            color,
            name: DEFAULT_PLAYER_NAME.to_string(),
            is_human: true,
        }
    }

    pub fn named(color: Color, name: impl Into<String>) -> Self {
        Player {
            name: name.into(),
            ..Player::new(color)
        }
    }

    pub fn computer(color: Color, name: impl Into<String>) -> Self {
        Player {
            is_human: false,
            ..Player::named(color, name)
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}
