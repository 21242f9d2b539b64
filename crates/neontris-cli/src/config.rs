use std::path::{Path, PathBuf};

use anyhow::{Context, ensure};
use neontris_advisor::HeuristicWeights;
use neontris_difficulty::DifficultyConfig;
use neontris_engine::{PieceSeed, Randomizer};
use neontris_game::{GameConfig, SessionConfig};
use serde::{Deserialize, Serialize};

use crate::{theme::ThemeName, util};

/// Contents of the TOML configuration file. Every section and field is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CliConfig {
    pub advisor: AdvisorSection,
    pub difficulty: DifficultyConfig,
    pub game: GameSection,
    pub ui: UiSection,
    pub audio: AudioSection,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AdvisorSection {
    /// Show the recommendation from the start.
    pub enabled: bool,
    pub weights: HeuristicWeights,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GameSection {
    pub randomizer: Randomizer,
    pub seed: Option<PieceSeed>,
    pub dynamic_difficulty: bool,
    pub ghost: bool,
}

impl Default for GameSection {
    fn default() -> Self {
        let game = GameConfig::default();
        Self {
            randomizer: game.randomizer,
            seed: game.seed,
            dynamic_difficulty: game.dynamic_difficulty,
            ghost: game.ghost,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct UiSection {
    pub theme: ThemeName,
    /// Game updates per second.
    pub tick_rate: f64,
    /// Upcoming pieces shown in the preview.
    pub preview: usize,
}

impl Default for UiSection {
    fn default() -> Self {
        Self {
            theme: ThemeName::default(),
            tick_rate: 60.0,
            preview: 3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AudioSection {
    pub enabled: bool,
    /// Directory holding `move.wav`, `rotate.wav`, `drop.wav`, `clear.wav` and `game_over.wav`.
    pub sounds_dir: PathBuf,
    pub volume: f32,
}

impl Default for AudioSection {
    fn default() -> Self {
        Self {
            enabled: true,
            sounds_dir: PathBuf::from("assets/sounds"),
            volume: 0.5,
        }
    }
}

impl CliConfig {
    /// Loads and validates the configuration. Without a path the defaults are used.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let config: Self = match path {
            Some(path) => util::read_toml_file("config", path)?,
            None => Self::default(),
        };
        config.validate().with_context(|| match path {
            Some(path) => format!("Invalid config file: {}", path.display()),
            None => "Invalid default config".to_owned(),
        })?;
        Ok(config)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        self.advisor.weights.validate()?;
        self.difficulty.validate()?;
        ensure!(
            self.ui.tick_rate.is_finite() && self.ui.tick_rate > 0.0,
            "ui.tick_rate must be positive, got {}",
            self.ui.tick_rate
        );
        ensure!(
            (0.0..=1.0).contains(&self.audio.volume),
            "audio.volume must be between 0 and 1, got {}",
            self.audio.volume
        );
        Ok(())
    }

    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            game: GameConfig {
                randomizer: self.game.randomizer,
                seed: self.game.seed,
                dynamic_difficulty: self.game.dynamic_difficulty,
                advisor: self.advisor.enabled,
                ghost: self.game.ghost,
            },
            weights: self.advisor.weights,
            difficulty: self.difficulty.clone(),
        }
    }
}
