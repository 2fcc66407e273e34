//! Portable Game Notation export.

use std::fmt;

use chrono::{Local, NaiveDate};

use crate::color::Color;
use crate::game::{Game, STANDARD_FEN};
use crate::player::Player;

/// Tag values that are not derived from the game itself.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PgnHeaders {
    pub event: String,
    pub site: String,
    pub date: NaiveDate,
    pub round: String,
}

impl Default for PgnHeaders {
    fn default() -> Self {
        PgnHeaders {
            event: "?".to_string(),
            site: "?".to_string(),
            date: Local::now().date_naive(),
            round: "-".to_string(),
        }
    }
}

fn escape(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

/// A finished or ongoing game together with the tag values needed to print it.
pub struct Pgn<'a> {
    pub game: &'a Game,
    pub white: &'a Player,
    pub black: &'a Player,
    pub headers: &'a PgnHeaders,
}

impl fmt::Display for Pgn<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let result = self.game.status().result_token();

        let tags = [
            ("Event", escape(&self.headers.event)),
            ("Site", escape(&self.headers.site)),
            ("Date", self.headers.date.format("%Y.%m.%d").to_string()),
            ("Round", escape(&self.headers.round)),
            ("White", escape(&self.white.name)),
            ("Black", escape(&self.black.name)),
            ("Result", result.to_string()),
        ];
        for (name, value) in tags {
            writeln!(f, "[{} \"{}\"]", name, value)?;
        }

        if self.game.starting_fen() != STANDARD_FEN {
            writeln!(f, "[SetUp \"1\"]")?;
            writeln!(f, "[FEN \"{}\"]", self.game.starting_fen())?;
        }
        writeln!(f)?;

        let mut number = self.game.fullmove_number() - moves_started(self.game);
        for (index, mv) in self.game.move_history().iter().enumerate() {
            match mv.color {
                Color::White => write!(f, "{}. {} ", number, mv)?,
                Color::Black => {
                    if index == 0 {
                        write!(f, "{}... {} ", number, mv)?;
                    } else {
                        write!(f, "{} ", mv)?;
                    }
                    number += 1;
                }
            }
        }

        f.write_str(result)
    }
}

/// Renders `game` as PGN: the seven-tag roster, a SetUp/FEN pair for
/// non-standard starts, numbered movetext and the result token.
pub fn write_pgn(game: &Game, white: &Player, black: &Player, headers: &PgnHeaders) -> String {
    Pgn {
        game,
        white,
        black,
        headers,
    }
    .to_string()
}

/// How many times the full-move number has advanced since the game started.
fn moves_started(game: &Game) -> u32 {
    game.move_history()
        .iter()
        .filter(|mv| mv.color == Color::Black)
        .count() as u32
}
