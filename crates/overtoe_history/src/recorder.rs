//! Persists finished games through the controller's recorder seam.

use overtoe_core::{GameMode, Move, MoveRecorder, Outcome, Player};
use tracing::{debug, error, info, instrument};

use crate::{DbError, GameRecord, GameRepository, NewGameRecord, StoredOutcome, encode_moves};

/// Who occupies one side of a recorded game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Participant {
    /// A registered account.
    User(i32),
    /// The engine.
    Ai,
    /// An unregistered local player.
    #[default]
    Guest,
}

impl Participant {
    /// Account id, if registered.
    pub fn id(&self) -> Option<i32> {
        match self {
            Participant::User(id) => Some(*id),
            Participant::Ai | Participant::Guest => None,
        }
    }
}

/// Collects moves from a live game and saves it when it ends.
///
/// Games with no registered participant are not stored. Storage failures
/// never reach the game; they are logged and kept in [`Self::last_error`].
#[derive(Debug)]
pub struct HistoryRecorder {
    repository: GameRepository,
    x: Participant,
    o: Participant,
    mode: Option<GameMode>,
    moves: Vec<Move>,
    last_saved: Option<GameRecord>,
    last_error: Option<DbError>,
}

impl HistoryRecorder {
    /// Creates a recorder for a game between `x` and `o`.
    pub fn new(repository: GameRepository, x: Participant, o: Participant) -> Self {
        Self {
            repository,
            x,
            o,
            mode: None,
            moves: Vec::new(),
            last_saved: None,
            last_error: None,
        }
    }

    /// Participant on `side`.
    pub fn participant(&self, side: Player) -> Participant {
        match side {
            Player::X => self.x,
            Player::O => self.o,
        }
    }

    /// Moves collected for the current game.
    pub fn moves(&self) -> &[Move] {
        &self.moves
    }

    /// Most recently stored game.
    pub fn last_saved(&self) -> Option<&GameRecord> {
        self.last_saved.as_ref()
    }

    /// Most recent storage failure.
    pub fn last_error(&self) -> Option<&DbError> {
        self.last_error.as_ref()
    }

    fn has_registered_user(&self) -> bool {
        self.x.id().is_some() || self.o.id().is_some()
    }

    #[instrument(skip(self), fields(moves = self.moves.len()))]
    fn save(&mut self, outcome: Outcome) -> Result<Option<GameRecord>, DbError> {
        if !self.has_registered_user() {
            debug!("No registered participant, game not stored");
            return Ok(None);
        }
        let mode = self
            .mode
            .ok_or_else(|| DbError::new("Game finished before it was started"))?;

        let record = NewGameRecord::new(
            self.x.id(),
            self.o.id(),
            StoredOutcome::from(outcome).to_db_string().to_string(),
            encode_moves(&self.moves),
            mode.as_ref().to_string(),
            self.moves.len() as i32,
        );
        let saved = self.repository.save_game(record)?;
        info!(game_id = saved.id(), %outcome, "Game recorded");
        Ok(Some(saved))
    }
}

impl MoveRecorder for HistoryRecorder {
    fn game_started(&mut self, mode: GameMode) {
        self.mode = Some(mode);
        self.moves.clear();
    }

    fn move_accepted(&mut self, action: &Move) {
        self.moves.push(*action);
    }

    fn game_finished(&mut self, outcome: Outcome) {
        match self.save(outcome) {
            Ok(saved) => {
                if saved.is_some() {
                    self.last_saved = saved;
                }
                self.last_error = None;
            }
            Err(e) => {
                error!(error = %e, "Failed to record game");
                self.last_error = Some(e);
            }
        }
    }
}
