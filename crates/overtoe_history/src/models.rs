//! Database models and domain types.

use std::str::FromStr;

use chrono::NaiveDateTime;
use derive_getters::Getters;
use derive_new::new;
use diesel::prelude::*;
use overtoe_core::{GameMode, Outcome, Player};
use serde::Serialize;
use tracing::instrument;

use crate::{DbError, MoveCodeError, Replay, schema};

/// User account database model.
#[derive(Debug, Clone, Queryable, Identifiable, Selectable, Getters)]
#[diesel(table_name = schema::users)]
pub struct User {
    id: i32,
    username: String,
    #[getter(skip)]
    password_hash: String,
    created_at: NaiveDateTime,
}

impl User {
    /// True if `hash` matches the stored password digest.
    pub(crate) fn password_matches(&self, hash: &str) -> bool {
        self.password_hash == hash
    }
}

/// Insertable user model for creating new accounts.
#[derive(Debug, Clone, Insertable, new)]
#[diesel(table_name = schema::users)]
pub struct NewUser {
    username: String,
    password_hash: String,
}

/// Stored game database model.
#[derive(Debug, Clone, Queryable, Identifiable, Selectable, Getters, Serialize)]
#[diesel(table_name = schema::games)]
pub struct GameRecord {
    id: i32,
    x_player_id: Option<i32>,
    o_player_id: Option<i32>,
    outcome: String,
    moves: String,
    game_mode: String,
    move_count: i32,
    played_at: NaiveDateTime,
}

impl GameRecord {
    /// Parses the stored outcome key.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the key is unknown.
    #[instrument(skip(self), fields(outcome = %self.outcome))]
    pub fn parse_outcome(&self) -> Result<StoredOutcome, DbError> {
        StoredOutcome::from_db_string(&self.outcome)
    }

    /// Parses the stored mode key.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the key is unknown.
    #[instrument(skip(self), fields(game_mode = %self.game_mode))]
    pub fn parse_mode(&self) -> Result<GameMode, DbError> {
        GameMode::from_str(&self.game_mode)
            .map_err(|_| DbError::new(format!("Invalid game mode: '{}'", self.game_mode)))
    }

    /// Rebuilds the game step by step.
    ///
    /// # Errors
    ///
    /// Returns [`MoveCodeError`] if the stored moves are malformed.
    pub fn replay(&self) -> Result<Replay, MoveCodeError> {
        Replay::parse(&self.moves)
    }

    /// Side played by `user_id` in this game, X first.
    pub fn seat_of(&self, user_id: i32) -> Option<Player> {
        if self.x_player_id == Some(user_id) {
            Some(Player::X)
        } else if self.o_player_id == Some(user_id) {
            Some(Player::O)
        } else {
            None
        }
    }
}

/// Insertable game model for recording finished games.
#[derive(Debug, Clone, Insertable, new, Getters)]
#[diesel(table_name = schema::games)]
pub struct NewGameRecord {
    x_player_id: Option<i32>,
    o_player_id: Option<i32>,
    outcome: String,
    moves: String,
    game_mode: String,
    move_count: i32,
}

/// Game outcome as stored, by side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum StoredOutcome {
    /// X completed a line.
    XWon,
    /// O completed a line.
    OWon,
    /// Board filled without a line.
    Draw,
    /// Overwrite game hit its move cap.
    MoveLimit,
}

impl StoredOutcome {
    /// Converts outcome to the string stored in the database.
    pub fn to_db_string(&self) -> &'static str {
        match self {
            Self::XWon => "x_won",
            Self::OWon => "o_won",
            Self::Draw => "draw",
            Self::MoveLimit => "move_limit",
        }
    }

    /// Parses outcome from the string stored in the database.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the string is not a valid outcome value.
    #[instrument(skip(s), fields(s = %s))]
    pub fn from_db_string(s: &str) -> Result<Self, DbError> {
        match s {
            "x_won" => Ok(Self::XWon),
            "o_won" => Ok(Self::OWon),
            "draw" => Ok(Self::Draw),
            "move_limit" => Ok(Self::MoveLimit),
            _ => Err(DbError::new(format!("Invalid outcome: '{}'", s))),
        }
    }

    /// Winning side, if any.
    pub fn winner(&self) -> Option<Player> {
        match self {
            Self::XWon => Some(Player::X),
            Self::OWon => Some(Player::O),
            Self::Draw | Self::MoveLimit => None,
        }
    }
}

impl From<Outcome> for StoredOutcome {
    fn from(outcome: Outcome) -> Self {
        match outcome {
            Outcome::Winner(Player::X) => Self::XWon,
            Outcome::Winner(Player::O) => Self::OWon,
            Outcome::Draw => Self::Draw,
            Outcome::MoveLimit => Self::MoveLimit,
        }
    }
}

/// A stored game with both participants' display names resolved.
#[derive(Debug, Clone, Getters, Serialize)]
pub struct GameSummary {
    record: GameRecord,
    x_name: String,
    o_name: String,
}

impl GameSummary {
    /// Creates a summary.
    pub fn new(record: GameRecord, x_name: String, o_name: String) -> Self {
        Self {
            record,
            x_name,
            o_name,
        }
    }
}

/// Aggregated results for a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Getters, Serialize)]
pub struct UserStats {
    total_games: i32,
    wins: i32,
    losses: i32,
    draws: i32,
    move_limits: i32,
}

impl UserStats {
    /// Creates new aggregated statistics.
    pub fn new(total_games: i32, wins: i32, losses: i32, draws: i32, move_limits: i32) -> Self {
        Self {
            total_games,
            wins,
            losses,
            draws,
            move_limits,
        }
    }

    /// Calculates win rate as a percentage (0.0-100.0).
    pub fn win_rate(&self) -> f64 {
        if self.total_games == 0 {
            0.0
        } else {
            (self.wins as f64 / self.total_games as f64) * 100.0
        }
    }
}
