//! Computer opponent.
//!
//! Three policies share one entry point, [`AiEngine::choose_move`]:
//!
//! - **Easy** picks uniformly among empty squares.
//! - **Medium** plays the Hard move with a configurable chance (7 in 10 by
//!   default) and the Easy move otherwise.
//! - **Hard** runs a full minimax search with alpha-beta pruning.
//!
//! Randomness comes from a seedable [`StdRng`], so tests can pin it.

mod search;

pub use search::{ScoredMove, SearchResult, Searcher, WIN_SCORE};

use crate::{Board, Player, Position};
use derive_getters::Getters;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// Move-selection policy.
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
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Difficulty {
    /// Random empty square.
    Easy,
    /// Mostly optimal.
    Medium,
    /// Always optimal.
    Hard,
}

/// Tuning knobs for the AI policies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct AiConfig {
    /// Out of 10 Medium turns, how many use the Hard policy.
    medium_optimal_in_ten: u8,
}

impl AiConfig {
    /// Creates a config, capping the Medium ratio at 10 in 10.
    pub fn new(medium_optimal_in_ten: u8) -> Self {
        Self {
            medium_optimal_in_ten: medium_optimal_in_ten.min(10),
        }
    }
}

impl Default for AiConfig {
    fn default() -> Self {
        Self::new(7)
    }
}

/// AI player for one difficulty.
#[derive(Debug, Clone)]
pub struct AiEngine {
    difficulty: Difficulty,
    config: AiConfig,
    rng: StdRng,
}

impl AiEngine {
    /// Creates an engine seeded from system entropy.
    #[instrument]
    pub fn new(difficulty: Difficulty) -> Self {
        Self {
            difficulty,
            config: AiConfig::default(),
            rng: StdRng::from_entropy(),
        }
    }

    /// Creates an engine with a fixed seed for reproducible play.
    #[instrument]
    pub fn seeded(difficulty: Difficulty, seed: u64) -> Self {
        Self {
            difficulty,
            config: AiConfig::default(),
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Replaces the tuning config.
    pub fn with_config(mut self, config: AiConfig) -> Self {
        self.config = config;
        self
    }

    /// Returns the difficulty.
    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    /// Returns the tuning config.
    pub fn config(&self) -> &AiConfig {
        &self.config
    }

    /// Picks a square for `ai` to play against `opponent`.
    ///
    /// Returns `None` when the board has no empty square; callers treat that
    /// as "nothing to do".
    #[instrument(skip(self, board), fields(difficulty = %self.difficulty))]
    pub fn choose_move(&mut self, board: &Board, ai: Player, opponent: Player) -> Option<Position> {
        let choice = match self.difficulty {
            Difficulty::Easy => self.random_move(board),
            Difficulty::Medium => {
                let roll = self.rng.gen_range(1..=10u8);
                let optimal = roll <= self.config.medium_optimal_in_ten;
                debug!(roll, optimal, "Medium policy roll");
                if optimal {
                    Self::best_move(board, ai, opponent).map(|m| m.position)
                } else {
                    self.random_move(board)
                }
            }
            Difficulty::Hard => Self::best_move(board, ai, opponent).map(|m| m.position),
        };
        debug!(?choice, "AI chose move");
        choice
    }

    /// Uniformly random empty square.
    #[instrument(skip(self, board))]
    pub fn random_move(&mut self, board: &Board) -> Option<Position> {
        Position::empty_cells(board).choose(&mut self.rng).copied()
    }

    /// Optimal move by exhaustive search. Deterministic for a given board.
    #[instrument(skip(board))]
    pub fn best_move(board: &Board, ai: Player, opponent: Player) -> Option<ScoredMove> {
        Searcher::new(ai, opponent).search(board).best
    }
}
