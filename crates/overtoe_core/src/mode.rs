//! Play modes.

use crate::Difficulty;
use serde::{Deserialize, Serialize};

/// Rule set chosen once when a game is created.
///
/// `Display` gives the label shown to players and stored with history;
/// `AsRef<str>`/`FromStr` give a stable storage key (`ai_medium`, ...).
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
    strum::EnumIter,
    strum::EnumString,
    strum::AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum GameMode {
    /// Standard rules: occupied cells are final.
    #[display("Classic")]
    Classic,
    /// Any cell may be reclaimed except the opponent's last move.
    #[display("Overwrite")]
    Overwrite,
    /// Classic rules against a random opponent.
    #[display("AI (Easy)")]
    AiEasy,
    /// Classic rules against a mostly optimal opponent.
    #[display("AI (Medium)")]
    AiMedium,
    /// Classic rules against a perfect opponent.
    #[display("AI (Hard)")]
    AiHard,
}

impl GameMode {
    /// AI mode for the given difficulty.
    pub fn ai(difficulty: Difficulty) -> Self {
        match difficulty {
            Difficulty::Easy => GameMode::AiEasy,
            Difficulty::Medium => GameMode::AiMedium,
            Difficulty::Hard => GameMode::AiHard,
        }
    }

    /// Opponent difficulty for AI modes.
    pub fn difficulty(self) -> Option<Difficulty> {
        match self {
            GameMode::Classic | GameMode::Overwrite => None,
            GameMode::AiEasy => Some(Difficulty::Easy),
            GameMode::AiMedium => Some(Difficulty::Medium),
            GameMode::AiHard => Some(Difficulty::Hard),
        }
    }

    /// True if the mode seats an AI opponent.
    pub fn is_ai(self) -> bool {
        self.difficulty().is_some()
    }

    /// True if occupied cells may be reclaimed.
    pub fn allows_overwrite(self) -> bool {
        self == GameMode::Overwrite
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;
    use strum::IntoEnumIterator;

    #[test]
    fn test_storage_key_round_trip() {
        for mode in GameMode::iter() {
            assert_eq!(GameMode::from_str(mode.as_ref()).ok(), Some(mode));
        }
        assert_eq!(GameMode::AiMedium.as_ref(), "ai_medium");
    }

    #[test]
    fn test_serde_uses_storage_key() {
        let json = serde_json::to_string(&GameMode::AiHard).unwrap();
        assert_eq!(json, "\"ai_hard\"");
        let mode: GameMode = serde_json::from_str("\"overwrite\"").unwrap();
        assert_eq!(mode, GameMode::Overwrite);
    }

    #[test]
    fn test_labels() {
        assert_eq!(GameMode::Classic.to_string(), "Classic");
        assert_eq!(GameMode::AiHard.to_string(), "AI (Hard)");
    }

    #[test]
    fn test_only_overwrite_reclaims() {
        assert!(GameMode::Overwrite.allows_overwrite());
        assert!(!GameMode::AiHard.allows_overwrite());
        assert!(!GameMode::Classic.is_ai());
        assert_eq!(GameMode::ai(Difficulty::Easy), GameMode::AiEasy);
    }
}
