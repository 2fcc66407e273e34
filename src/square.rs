use std::fmt;

use crate::error::ChessError;

pub const BOARD_SIZE: u8 = 8;

/// A board coordinate. Both components are always in `0..8`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Square {
    file: u8,
    rank: u8,
}

impl Square {
    /// Returns `None` when either component is off the board.
    pub fn new(file: u8, rank: u8) -> Option<Self> {
        if file < BOARD_SIZE && rank < BOARD_SIZE {
            Some(Square { file, rank })
        } else {
            None
        }
    }

    pub(crate) fn from_index(index: usize) -> Self {
        Square {
            file: (index % BOARD_SIZE as usize) as u8,
            rank: (index / BOARD_SIZE as usize) as u8,
        }
    }

    pub fn all() -> impl Iterator<Item = Square> {
        (0..64).map(Square::from_index)
    }

    pub fn file(&self) -> u8 {
        self.file
    }

    pub fn rank(&self) -> u8 {
        self.rank
    }

    pub fn index(&self) -> usize {
        self.rank as usize * BOARD_SIZE as usize + self.file as usize
    }

    /// The square `(df, dr)` away, if it is still on the board.
    pub fn offset(&self, df: i8, dr: i8) -> Option<Square> {
        let file = self.file as i8 + df;
        let rank = self.rank as i8 + dr;
        if (0..BOARD_SIZE as i8).contains(&file) && (0..BOARD_SIZE as i8).contains(&rank) {
            Some(Square {
                file: file as u8,
                rank: rank as u8,
            })
        } else {
            None
        }
    }

    pub fn file_delta(&self, to: &Square) -> i8 {
        to.file as i8 - self.file as i8
    }

    pub fn rank_delta(&self, to: &Square) -> i8 {
        to.rank as i8 - self.rank as i8
    }

    /// Squared euclidean distance; 1 or 2 means adjacent, 5 a knight hop.
    pub fn distance_squared(&self, to: &Square) -> u8 {
        let df = self.file_delta(to);
        let dr = self.rank_delta(to);
        (df * df + dr * dr) as u8
    }

    /// Squares strictly between `self` and `to` along a rank, file or diagonal.
    /// Empty when the two squares are not aligned or are adjacent.
    pub fn between(&self, to: &Square) -> impl Iterator<Item = Square> + use<> {
        let df = self.file_delta(to);
        let dr = self.rank_delta(to);
        let aligned = (df == 0) != (dr == 0) || (df != 0 && df.abs() == dr.abs());
        let steps = if aligned { df.abs().max(dr.abs()) } else { 0 };
        let (sf, sr) = (df.signum(), dr.signum());
        let origin = *self;
        (1..steps).filter_map(move |i| origin.offset(sf * i, sr * i))
    }

    pub fn to_algebraic(&self) -> String {
        format!("{}{}", (b'a' + self.file) as char, self.rank + 1)
    }

    pub fn from_algebraic(s: &str) -> Result<Self, ChessError> {
        let bytes = s.as_bytes();
        if bytes.len() != 2 {
            return Err(ChessError::InvalidArgument(format!(
                "square must be two characters, got {:?}",
                s
            )));
        }

        let file = match bytes[0] {
            b'a'..=b'h' => bytes[0] - b'a',
            _ => {
                return Err(ChessError::InvalidArgument(format!(
                    "invalid file in square {:?}",
                    s
                )));
            }
        };
        let rank = match bytes[1] {
            b'1'..=b'8' => bytes[1] - b'1',
            _ => {
                return Err(ChessError::InvalidArgument(format!(
                    "invalid rank in square {:?}",
                    s
                )));
            }
        };

        Ok(Square { file, rank })
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.to_algebraic())
    }
}
