//! History error types.

use derive_more::{Display, Error};
use tracing::instrument;

/// Database error with location tracking.
#[derive(Debug, Clone, Display, Error)]
#[display("Database error: {} at {}:{}", message, file, line)]
pub struct DbError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl DbError {
    /// Creates a new database error with caller location tracking.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }
}

impl From<diesel::result::Error> for DbError {
    #[track_caller]
    fn from(err: diesel::result::Error) -> Self {
        Self::new(format!("Diesel error: {}", err))
    }
}

impl From<diesel::ConnectionError> for DbError {
    #[track_caller]
    fn from(err: diesel::ConnectionError) -> Self {
        Self::new(format!("Connection error: {}", err))
    }
}

/// Account operation failure.
#[derive(Debug, Clone, Display, Error)]
pub enum AccountError {
    /// Username or password was blank.
    #[display("Username and password cannot be empty")]
    EmptyCredentials,
    /// Password below the minimum length.
    #[display("Password must be at least {} characters long", min)]
    PasswordTooShort {
        /// Minimum accepted length.
        min: usize,
    },
    /// Another account already uses this name.
    #[display("Username '{}' already exists", username)]
    UsernameTaken {
        /// Requested username.
        username: String,
    },
    /// Unknown username or wrong password.
    #[display("Invalid username or password")]
    InvalidCredentials,
    /// Underlying storage failure.
    #[display("{}", _0)]
    Db(#[error(not(source))] DbError),
}

impl From<DbError> for AccountError {
    fn from(err: DbError) -> Self {
        Self::Db(err)
    }
}

impl From<diesel::result::Error> for AccountError {
    #[track_caller]
    fn from(err: diesel::result::Error) -> Self {
        Self::Db(DbError::from(err))
    }
}

/// A stored move code that does not parse.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
#[display("Invalid move code '{}'", code)]
pub struct MoveCodeError {
    /// The offending code.
    pub code: String,
}

impl MoveCodeError {
    /// Creates an error for `code`.
    pub fn new(code: impl Into<String>) -> Self {
        Self { code: code.into() }
    }
}
