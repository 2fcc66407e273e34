use crate::game::Game;
use crate::square::Square;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Serialize Game as FEN string
impl Serialize for Game {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_fen())
    }
}

/// Deserialize Game from FEN string. History before the position is not restored.
impl<'de> Deserialize<'de> for Game {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let fen = String::deserialize(deserializer)?;
        Game::from_fen(&fen).map_err(serde::de::Error::custom)
    }
}

/// Serialize Square as algebraic text (`e4`)
impl Serialize for Square {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_algebraic())
    }
}

impl<'de> Deserialize<'de> for Square {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let text = String::deserialize(deserializer)?;
        Square::from_algebraic(&text).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outcome::GameStatus;
    use crate::r#move::{Move, MoveKind};

    #[test]
    fn test_game_serde() {
        let game = Game::standard();
        let json = serde_json::to_string(&game).expect("serialize game");
        assert_eq!(
            json,
            "\"rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1\""
        );

        let game2: Game = serde_json::from_str(&json).expect("deserialize game");
        assert_eq!(game.to_fen(), game2.to_fen());
    }

    #[test]
    fn test_game_roundtrip_after_moves() {
        let mut game = Game::standard();
        for text in ["e2e4", "e7e5", "g1f3", "b8c6"] {
            let mv = game.move_from_coordinates(text, None).expect("well-formed move");
            assert!(game.apply_move(&mv).expect("kings present"));
        }

        let json = serde_json::to_string(&game).expect("serialize game");
        let game2: Game = serde_json::from_str(&json).expect("deserialize game");
        assert_eq!(game.to_fen(), game2.to_fen());
    }

    #[test]
    fn test_invalid_fen_is_a_deserialize_error() {
        let result: Result<Game, _> = serde_json::from_str("\"not a fen\"");
        assert!(result.is_err());
    }

    #[test]
    fn test_square_serde() {
        let square = Square::from_algebraic("e4").expect("valid square");
        let json = serde_json::to_string(&square).expect("serialize square");
        assert_eq!(json, "\"e4\"");

        let back: Square = serde_json::from_str(&json).expect("deserialize square");
        assert_eq!(back, square);
        assert!(serde_json::from_str::<Square>("\"i9\"").is_err());
    }

    #[test]
    fn test_move_serde() {
        let game = Game::standard();
        let mv = game.move_from_coordinates("g1f3", None).expect("well-formed move");

        let json = serde_json::to_string(&mv).expect("serialize move");
        assert!(json.contains("\"from\":\"g1\""));
        assert!(json.contains("\"to\":\"f3\""));

        let back: Move = serde_json::from_str(&json).expect("deserialize move");
        assert_eq!(back, mv);
        assert_eq!(back.kind, MoveKind::Normal);
    }

    #[test]
    fn test_status_serde() {
        let json = serde_json::to_string(&GameStatus::ThreefoldRepetition).expect("serialize");
        let back: GameStatus = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, GameStatus::ThreefoldRepetition);
    }
}
