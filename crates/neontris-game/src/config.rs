use neontris_advisor::{HeuristicWeights, WeightsError};
use neontris_difficulty::{DifficultyConfig, DifficultyConfigError};
use neontris_engine::{PieceSeed, Randomizer};
use serde::{Deserialize, Serialize};

/// Rules and initial toggles of a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GameConfig {
    pub randomizer: Randomizer,
    /// Fixed piece sequence; restarts replay it. A fresh random seed is used per game
    /// when unset.
    pub seed: Option<PieceSeed>,
    /// Let the difficulty controller pick the gravity interval instead of the level curve.
    pub dynamic_difficulty: bool,
    /// Show the advisor's recommendation from the start.
    pub advisor: bool,
    pub ghost: bool,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            randomizer: Randomizer::default(),
            seed: None,
            dynamic_difficulty: true,
            advisor: false,
            ghost: true,
        }
    }
}

/// Everything needed to build a [`GameSession`](crate::GameSession).
#[derive(Debug, Clone, Default)]
pub struct SessionConfig {
    pub game: GameConfig,
    pub weights: HeuristicWeights,
    pub difficulty: DifficultyConfig,
}

/// A session configuration rejected at construction.
#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error, derive_more::From)]
pub enum SessionConfigError {
    #[display("invalid advisor weights: {_0}")]
    Weights(WeightsError),
    #[display("invalid difficulty settings: {_0}")]
    Difficulty(DifficultyConfigError),
}
