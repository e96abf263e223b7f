//! Database repository for accounts and game history.

use std::collections::HashMap;

use diesel::prelude::*;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use overtoe_core::GameMode;
use tracing::{debug, info, instrument, warn};

use crate::password::{MIN_PASSWORD_LEN, hash_password};
use crate::{
    AccountError, DbError, GameRecord, GameSummary, NewGameRecord, NewUser, StoredOutcome, User,
    UserStats, schema,
};

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Most games returned by [`GameRepository::game_history`].
pub const HISTORY_LIMIT: i64 = 50;

/// Database repository for user and game operations.
#[derive(Debug, Clone)]
pub struct GameRepository {
    db_path: String,
}

impl GameRepository {
    /// Creates a new repository for the database at the given path.
    ///
    /// The file is created on first connection.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the path is empty.
    #[instrument(skip(db_path), fields(db_path = %db_path))]
    pub fn new(db_path: String) -> Result<Self, DbError> {
        if db_path.trim().is_empty() {
            return Err(DbError::new("Database path cannot be empty"));
        }
        info!(path = %db_path, "Creating GameRepository");
        Ok(Self { db_path })
    }

    /// Opens the database and applies pending migrations.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the database cannot be opened or migrated.
    #[instrument(skip(db_path), fields(db_path = %db_path))]
    pub fn open(db_path: String) -> Result<Self, DbError> {
        let repo = Self::new(db_path)?;
        repo.run_migrations()?;
        Ok(repo)
    }

    /// Applies any migrations not yet run.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a migration fails.
    #[instrument(skip(self))]
    pub fn run_migrations(&self) -> Result<(), DbError> {
        let mut conn = self.connection()?;
        let applied = conn
            .run_pending_migrations(MIGRATIONS)
            .map_err(|e| DbError::new(format!("Migration failed: {}", e)))?;
        info!(count = applied.len(), "Migrations applied");
        Ok(())
    }

    /// Establishes a database connection with foreign keys enforced.
    #[instrument(skip(self))]
    fn connection(&self) -> Result<SqliteConnection, DbError> {
        debug!(path = %self.db_path, "Establishing connection");
        let mut conn = SqliteConnection::establish(&self.db_path)
            .map_err(|e| DbError::new(format!("Failed to connect to '{}': {}", self.db_path, e)))?;
        diesel::sql_query("PRAGMA foreign_keys = ON").execute(&mut conn)?;
        Ok(conn)
    }

    // ─────────────────────────────────────────────────────────────
    //  Accounts
    // ─────────────────────────────────────────────────────────────

    /// Creates a new account.
    ///
    /// # Errors
    ///
    /// Returns [`AccountError`] if either field is empty, the password is
    /// shorter than four characters, or the username is taken.
    #[instrument(skip(self, password))]
    pub fn register(&self, username: &str, password: &str) -> Result<User, AccountError> {
        let username = username.trim();
        if username.is_empty() || password.is_empty() {
            return Err(AccountError::EmptyCredentials);
        }
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(AccountError::PasswordTooShort {
                min: MIN_PASSWORD_LEN,
            });
        }
        if self.user_by_name(username)?.is_some() {
            warn!(username, "Username already exists");
            return Err(AccountError::UsernameTaken {
                username: username.to_string(),
            });
        }

        let mut conn = self.connection()?;
        let new_user = NewUser::new(username.to_string(), hash_password(password));
        let user = diesel::insert_into(schema::users::table)
            .values(&new_user)
            .returning(User::as_returning())
            .get_result(&mut conn)?;

        info!(user_id = user.id(), username = %user.username(), "User registered");
        Ok(user)
    }

    /// Checks a username/password pair.
    ///
    /// # Errors
    ///
    /// Returns [`AccountError::InvalidCredentials`] for an unknown user or a
    /// wrong password.
    #[instrument(skip(self, password))]
    pub fn authenticate(&self, username: &str, password: &str) -> Result<User, AccountError> {
        if username.trim().is_empty() || password.is_empty() {
            return Err(AccountError::InvalidCredentials);
        }
        match self.user_by_name(username.trim())? {
            Some(user) if user.password_matches(&hash_password(password)) => {
                debug!(user_id = user.id(), "Authenticated");
                Ok(user)
            }
            _ => {
                warn!(username, "Authentication failed");
                Err(AccountError::InvalidCredentials)
            }
        }
    }

    /// Gets a user by name. Returns `None` if not found.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self))]
    pub fn user_by_name(&self, username: &str) -> Result<Option<User>, DbError> {
        let mut conn = self.connection()?;
        let user = schema::users::table
            .filter(schema::users::username.eq(username))
            .select(User::as_select())
            .first(&mut conn)
            .optional()?;
        debug!(found = user.is_some(), "User lookup");
        Ok(user)
    }

    /// Gets a username by id. Returns `None` if not found.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self))]
    pub fn username_by_id(&self, user_id: i32) -> Result<Option<String>, DbError> {
        let mut conn = self.connection()?;
        let name = schema::users::table
            .find(user_id)
            .select(schema::users::username)
            .first::<String>(&mut conn)
            .optional()?;
        Ok(name)
    }

    /// Deletes an account and, by cascade, every game it took part in.
    ///
    /// Returns `false` if no such user existed.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self))]
    pub fn delete_user(&self, username: &str) -> Result<bool, DbError> {
        let mut conn = self.connection()?;
        let deleted = diesel::delete(
            schema::users::table.filter(schema::users::username.eq(username)),
        )
        .execute(&mut conn)?;
        info!(username, deleted, "User delete");
        Ok(deleted > 0)
    }

    // ─────────────────────────────────────────────────────────────
    //  Games
    // ─────────────────────────────────────────────────────────────

    /// Records a finished game.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(
        skip(self, game),
        fields(game_mode = %game.game_mode(), outcome = %game.outcome())
    )]
    pub fn save_game(&self, game: NewGameRecord) -> Result<GameRecord, DbError> {
        let mut conn = self.connection()?;
        let record = diesel::insert_into(schema::games::table)
            .values(&game)
            .returning(GameRecord::as_returning())
            .get_result(&mut conn)?;
        info!(game_id = record.id(), moves = record.move_count(), "Game saved");
        Ok(record)
    }

    /// Gets one game by id.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self))]
    pub fn game(&self, game_id: i32) -> Result<Option<GameRecord>, DbError> {
        let mut conn = self.connection()?;
        let record = schema::games::table
            .find(game_id)
            .select(GameRecord::as_select())
            .first(&mut conn)
            .optional()?;
        Ok(record)
    }

    /// Most recent games involving `user_id`, newest first, with display
    /// names for both seats.
    ///
    /// Empty seats show as `AI` in AI modes and `Guest` otherwise. With
    /// `mode` set, only games of that mode are listed.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs or a stored mode is
    /// unknown.
    #[instrument(skip(self))]
    pub fn game_history(
        &self,
        user_id: i32,
        mode: Option<GameMode>,
    ) -> Result<Vec<GameSummary>, DbError> {
        use schema::games::dsl;

        let mut conn = self.connection()?;
        let mut query = dsl::games
            .filter(dsl::x_player_id.eq(user_id).or(dsl::o_player_id.eq(user_id)))
            .into_boxed();
        if let Some(mode) = mode {
            query = query.filter(dsl::game_mode.eq(mode.as_ref().to_string()));
        }
        let records = query
            .order((dsl::played_at.desc(), dsl::id.desc()))
            .limit(HISTORY_LIMIT)
            .select(GameRecord::as_select())
            .load(&mut conn)?;

        let ids: Vec<i32> = records
            .iter()
            .flat_map(|r| [*r.x_player_id(), *r.o_player_id()])
            .flatten()
            .collect();
        let names: HashMap<i32, String> = schema::users::table
            .filter(schema::users::id.eq_any(ids))
            .select((schema::users::id, schema::users::username))
            .load::<(i32, String)>(&mut conn)?
            .into_iter()
            .collect();

        let summaries = records
            .into_iter()
            .map(|record| {
                let absent = if record.parse_mode()?.is_ai() { "AI" } else { "Guest" };
                let name_of = |seat: Option<i32>| {
                    seat.and_then(|id| names.get(&id).cloned())
                        .unwrap_or_else(|| absent.to_string())
                };
                let x_name = name_of(*record.x_player_id());
                let o_name = name_of(*record.o_player_id());
                Ok(GameSummary::new(record, x_name, o_name))
            })
            .collect::<Result<Vec<_>, DbError>>()?;

        info!(user_id, count = summaries.len(), "History loaded");
        Ok(summaries)
    }

    /// Deletes one game. Returns `false` if it did not exist.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self))]
    pub fn delete_game(&self, game_id: i32) -> Result<bool, DbError> {
        let mut conn = self.connection()?;
        let deleted = diesel::delete(schema::games::table.find(game_id)).execute(&mut conn)?;
        Ok(deleted > 0)
    }

    /// Deletes every game involving `user_id`, returning how many went.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self))]
    pub fn delete_games_for_user(&self, user_id: i32) -> Result<usize, DbError> {
        use schema::games::dsl;

        let mut conn = self.connection()?;
        let deleted = diesel::delete(
            dsl::games.filter(dsl::x_player_id.eq(user_id).or(dsl::o_player_id.eq(user_id))),
        )
        .execute(&mut conn)?;
        info!(user_id, deleted, "Games deleted");
        Ok(deleted)
    }

    /// Win/loss/draw counts across every game involving `user_id`.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self))]
    pub fn user_stats(&self, user_id: i32) -> Result<UserStats, DbError> {
        use schema::games::dsl;

        let mut conn = self.connection()?;
        let records = dsl::games
            .filter(dsl::x_player_id.eq(user_id).or(dsl::o_player_id.eq(user_id)))
            .select(GameRecord::as_select())
            .load(&mut conn)?;

        let (mut wins, mut losses, mut draws, mut move_limits) = (0, 0, 0, 0);
        for record in &records {
            match record.parse_outcome() {
                Ok(StoredOutcome::Draw) => draws += 1,
                Ok(StoredOutcome::MoveLimit) => move_limits += 1,
                Ok(outcome) => {
                    let winner = outcome.winner();
                    let won = winner.is_some_and(|side| {
                        let seat_id = match side {
                            overtoe_core::Player::X => *record.x_player_id(),
                            overtoe_core::Player::O => *record.o_player_id(),
                        };
                        seat_id == Some(user_id)
                    });
                    if won {
                        wins += 1;
                    } else {
                        losses += 1;
                    }
                }
                Err(e) => warn!(
                    game_id = record.id(),
                    error = %e,
                    "Skipping game with unknown outcome"
                ),
            }
        }

        let stats = UserStats::new(records.len() as i32, wins, losses, draws, move_limits);
        info!(
            user_id,
            total = *stats.total_games(),
            wins,
            losses,
            draws,
            win_rate = %format!("{:.1}%", stats.win_rate()),
            "Stats computed"
        );
        Ok(stats)
    }
}
