//! Seam for history collaborators.

use crate::{GameMode, Move, Outcome};

/// Receives game events from the turn controller as they happen.
///
/// Implementations own their storage format. The controller never looks at
/// what a recorder does with an event and never fails because of it.
pub trait MoveRecorder {
    /// A new game started in `mode`.
    fn game_started(&mut self, mode: GameMode) {
        let _ = mode;
    }

    /// A move was accepted and applied.
    fn move_accepted(&mut self, action: &Move);

    /// The game reached a terminal state.
    fn game_finished(&mut self, outcome: Outcome);
}

/// Recorder that drops every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopRecorder;

impl MoveRecorder for NoopRecorder {
    fn move_accepted(&mut self, _action: &Move) {}

    fn game_finished(&mut self, _outcome: Outcome) {}
}

/// Keeps every event in memory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryRecorder {
    /// Mode of the most recent game.
    pub mode: Option<GameMode>,
    /// Accepted moves of the current game.
    pub moves: Vec<Move>,
    /// Outcome, once the game ends.
    pub outcome: Option<Outcome>,
}

impl MoveRecorder for MemoryRecorder {
    fn game_started(&mut self, mode: GameMode) {
        self.mode = Some(mode);
        self.moves.clear();
        self.outcome = None;
    }

    fn move_accepted(&mut self, action: &Move) {
        self.moves.push(*action);
    }

    fn game_finished(&mut self, outcome: Outcome) {
        self.outcome = Some(outcome);
    }
}

impl<R: MoveRecorder + ?Sized> MoveRecorder for &mut R {
    fn game_started(&mut self, mode: GameMode) {
        (**self).game_started(mode);
    }

    fn move_accepted(&mut self, action: &Move) {
        (**self).move_accepted(action);
    }

    fn game_finished(&mut self, outcome: Outcome) {
        (**self).game_finished(outcome);
    }
}
