use std::path::Path;

use crate::ai::DEFAULT_MAX_DEPTH;
use crate::error::ConfigError;

/// Difficulty levels offered to the player.
pub const DIFFICULTY_RANGE: std::ops::RangeInclusive<u32> = 1..=9;

/// Added to the difficulty to get the automation level handed to the
/// strategy, so difficulty 1 is already a 4-ply search.
pub const LEVEL_OFFSET: u32 = 3;

/// Hard ceiling on search depth; deeper searches stall the interface.
pub const MAX_SEARCH_DEPTH: u32 = 12;

/// Seconds each side gets to make a move in the terminal front end.
pub const DEFAULT_TURN_SECONDS: u64 = 59;

/// Which move-selection strategy drives an automated opponent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum StrategyKind {
    Negamax,
    Random,
}

/// The `[opponent]` section.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct OpponentConfig {
    /// Play against the computer rather than a second person.
    pub automated: bool,
    /// Passed to the strategy as its automation level.
    pub difficulty: u32,
    pub strategy: StrategyKind,
}

impl OpponentConfig {
    /// Level passed to the strategy for the configured difficulty.
    pub fn automation_level(&self) -> u32 {
        self.difficulty + LEVEL_OFFSET
    }
}

impl Default for OpponentConfig {
    fn default() -> Self {
        OpponentConfig {
            automated: true,
            difficulty: 5,
            strategy: StrategyKind::Negamax,
        }
    }
}

/// The `[search]` section.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Upper bound on negamax depth, whatever the difficulty.
    pub max_depth: u32,
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// The `[ui]` section.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// Time allowed per move; running out ends the program. 0 disables the clock.
    pub turn_seconds: u64,
}

impl Default for UiConfig {
    fn default() -> Self {
        UiConfig {
            turn_seconds: DEFAULT_TURN_SECONDS,
        }
    }
}

impl UiConfig {
    pub fn turn_limit(&self) -> Option<std::time::Duration> {
        (self.turn_seconds > 0).then(|| std::time::Duration::from_secs(self.turn_seconds))
    }
}

/// Top-level application configuration, loadable from TOML.
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub opponent: OpponentConfig,
    pub search: SearchConfig,
    pub ui: UiConfig,
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        let config: AppConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if the file
    /// does not exist.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            log::warn!("config file '{}' not found, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !DIFFICULTY_RANGE.contains(&self.opponent.difficulty) {
            return Err(ConfigError::Validation(format!(
                "opponent.difficulty must be in {}..={}",
                DIFFICULTY_RANGE.start(),
                DIFFICULTY_RANGE.end()
            )));
        }
        if self.ui.turn_seconds > 3599 {
            return Err(ConfigError::Validation(
                "ui.turn_seconds must be at most 3599".to_string(),
            ));
        }
        if self.search.max_depth == 0 || self.search.max_depth > MAX_SEARCH_DEPTH {
            return Err(ConfigError::Validation(format!(
                "search.max_depth must be in 1..={MAX_SEARCH_DEPTH}"
            )));
        }
        Ok(())
    }

    /// Generate a TOML string with all default values (useful for creating
    /// example config files).
    pub fn default_toml() -> String {
        toml::to_string_pretty(&AppConfig::default()).expect("default config serializes")
    }
}
