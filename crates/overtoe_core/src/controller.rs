//! Turn controller: drives one game from first move to terminal state.
//!
//! Every candidate move, whether typed by a person or chosen by an
//! [`AiEngine`], goes through [`TurnController::submit`]: validate, apply,
//! evaluate, then either finish or hand the move to the other side.

use crate::rules;
use crate::{
    AiEngine, GameMode, GameState, GameStatus, LastMoves, Move, MoveError, MoveRecorder,
    NoopRecorder, Outcome, Phase, Player, Progress, validate,
};
use tracing::{debug, info, instrument};

/// Who supplies moves for one side.
#[derive(Debug, Clone, Default)]
pub enum Seat {
    /// Moves come from an external input source.
    #[default]
    Human,
    /// Moves come from the engine.
    Ai(AiEngine),
}

impl Seat {
    /// True if the engine plays this side.
    pub fn is_ai(&self) -> bool {
        matches!(self, Seat::Ai(_))
    }
}

/// Owns one game session and enforces turn order.
#[derive(Debug)]
pub struct TurnController<R = NoopRecorder> {
    mode: GameMode,
    state: GameState,
    last_moves: LastMoves,
    phase: Phase,
    seat_x: Seat,
    seat_o: Seat,
    recorder: R,
}

impl TurnController<NoopRecorder> {
    /// Creates a game in `mode` with both sides human.
    #[instrument]
    pub fn new(mode: GameMode) -> Self {
        info!(%mode, "New game");
        Self {
            mode,
            state: GameState::new(),
            last_moves: LastMoves::new(),
            phase: Phase::AwaitingMove,
            seat_x: Seat::Human,
            seat_o: Seat::Human,
            recorder: NoopRecorder,
        }
    }

    /// Creates a game in `mode`, seating an engine on `ai_side` when the
    /// mode has a difficulty.
    #[instrument]
    pub fn for_mode(mode: GameMode, ai_side: Player) -> Self {
        let game = Self::new(mode);
        match mode.difficulty() {
            Some(difficulty) => game.with_ai(ai_side, AiEngine::new(difficulty)),
            None => game,
        }
    }
}

impl<R: MoveRecorder> TurnController<R> {
    /// Attaches a history collaborator and announces the current game to it.
    pub fn with_recorder<S: MoveRecorder>(self, mut recorder: S) -> TurnController<S> {
        recorder.game_started(self.mode);
        TurnController {
            mode: self.mode,
            state: self.state,
            last_moves: self.last_moves,
            phase: self.phase,
            seat_x: self.seat_x,
            seat_o: self.seat_o,
            recorder,
        }
    }

    /// Seats `engine` on `side`.
    pub fn with_ai(mut self, side: Player, engine: AiEngine) -> Self {
        debug!(%side, difficulty = %engine.difficulty(), "Seating AI");
        *self.seat_mut(side) = Seat::Ai(engine);
        self
    }

    /// Returns the game mode.
    pub fn mode(&self) -> GameMode {
        self.mode
    }

    /// Returns the current game state.
    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Returns the controller phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Returns the last square played by each side.
    pub fn last_moves(&self) -> &LastMoves {
        &self.last_moves
    }

    /// Outcome once the game is over.
    pub fn outcome(&self) -> Option<Outcome> {
        match self.phase {
            Phase::Terminal(outcome) => Some(outcome),
            Phase::AwaitingMove | Phase::Evaluating => None,
        }
    }

    /// Returns the seat for `side`.
    pub fn seat(&self, side: Player) -> &Seat {
        match side {
            Player::X => &self.seat_x,
            Player::O => &self.seat_o,
        }
    }

    fn seat_mut(&mut self, side: Player) -> &mut Seat {
        match side {
            Player::X => &mut self.seat_x,
            Player::O => &mut self.seat_o,
        }
    }

    /// True if the game is waiting on an engine-controlled side.
    pub fn is_ai_turn(&self) -> bool {
        self.phase == Phase::AwaitingMove && self.seat(self.state.current_player()).is_ai()
    }

    /// Returns the recorder.
    pub fn recorder(&self) -> &R {
        &self.recorder
    }

    /// Returns the recorder mutably.
    pub fn recorder_mut(&mut self) -> &mut R {
        &mut self.recorder
    }

    /// Consumes the controller, returning the recorder.
    pub fn into_recorder(self) -> R {
        self.recorder
    }

    /// Submits a move for the side to move.
    ///
    /// # Errors
    ///
    /// Returns the rejection reason. A rejected move changes nothing; the
    /// same side is still to move.
    #[instrument(skip(self), fields(mode = %self.mode))]
    pub fn submit(&mut self, row: usize, col: usize) -> Result<Progress, MoveError> {
        if self.outcome().is_some() {
            return Err(MoveError::GameOver);
        }

        let mover = self.state.current_player();
        let position = validate(
            self.state.board(),
            mover,
            row,
            col,
            self.mode,
            &self.last_moves,
        )?;

        if let Some(previous) = self.state.board().get(position).player() {
            info!(%mover, %position, %previous, "Overwriting square");
        }

        let action = Move::new(mover, position);
        self.state.apply_move(action);
        self.last_moves.record(mover, position);
        self.recorder.move_accepted(&action);
        self.phase = Phase::Evaluating;
        debug!(%action, move_count = self.state.move_count(), "Move applied");
        debug_assert!(self.state.is_consistent(self.mode), "Board consistency violated");

        let verdict = rules::evaluate(
            self.state.board(),
            mover,
            self.mode,
            self.state.move_count(),
        );

        match verdict {
            Some(outcome) => {
                self.state.set_status(match outcome {
                    Outcome::Winner(player) => GameStatus::Won(player),
                    Outcome::Draw => GameStatus::Drawn,
                    Outcome::MoveLimit => GameStatus::MoveLimit,
                });
                self.phase = Phase::Terminal(outcome);
                self.recorder.game_finished(outcome);
                info!(%outcome, moves = self.state.move_count(), "Game over");
                Ok(Progress::Finished(outcome))
            }
            None => {
                self.state.switch_player();
                self.phase = Phase::AwaitingMove;
                Ok(Progress::Continue {
                    next: self.state.current_player(),
                })
            }
        }
    }

    /// Lets the engine on the active seat move.
    ///
    /// If the active seat is human, nothing happens and the current side is
    /// reported as still to move.
    ///
    /// # Errors
    ///
    /// [`MoveError::NoMoveAvailable`] if the engine finds no empty square
    /// (state unchanged), [`MoveError::GameOver`] after the game ended.
    #[instrument(skip(self))]
    pub fn play_ai_turn(&mut self) -> Result<Progress, MoveError> {
        if self.outcome().is_some() {
            return Err(MoveError::GameOver);
        }

        let mover = self.state.current_player();
        let board = *self.state.board();
        let choice = match self.seat_mut(mover) {
            Seat::Ai(engine) => engine.choose_move(&board, mover, mover.opponent()),
            Seat::Human => return Ok(Progress::Continue { next: mover }),
        };

        let position = choice.ok_or(MoveError::NoMoveAvailable)?;
        self.submit(position.row(), position.col())
    }

    /// Plays engine turns until a human is to move or the game ends.
    ///
    /// Returns the progress after the last engine move, or `None` if no
    /// engine was on move.
    ///
    /// # Errors
    ///
    /// Propagates the first error from [`Self::play_ai_turn`].
    #[instrument(skip(self))]
    pub fn run_ai_turns(&mut self) -> Result<Option<Progress>, MoveError> {
        let mut last = None;
        while self.is_ai_turn() {
            last = Some(self.play_ai_turn()?);
        }
        Ok(last)
    }

    /// Starts a fresh game with the same mode, seats and recorder.
    #[instrument(skip(self))]
    pub fn reset(&mut self) {
        self.state.reset();
        self.last_moves.clear();
        self.phase = Phase::AwaitingMove;
        self.recorder.game_started(self.mode);
        info!(mode = %self.mode, "Game reset");
    }
}
