//! Game configuration and difficulty presets
//!
//! Loaded from an optional JSON file; any field left out keeps its default.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;
use crate::sim::{EnemyTag, Field};

/// Configuration loading failures
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to serialize config for {path}: {source}")]
    Serialize {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Difficulty preset levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Normal,
    Hard,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Normal => "normal",
            Difficulty::Hard => "hard",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "easy" => Some(Difficulty::Easy),
            "normal" | "medium" => Some(Difficulty::Normal),
            "hard" => Some(Difficulty::Hard),
            _ => None,
        }
    }

    /// Score needed per level
    pub fn level_up_score(&self) -> u64 {
        match self {
            Difficulty::Easy => 400,
            Difficulty::Normal => LEVEL_UP_SCORE,
            Difficulty::Hard => 200,
        }
    }

    /// Extra reach given to enemies when testing hits
    pub fn collision_buffer(&self) -> f32 {
        match self {
            Difficulty::Easy => 0.0,
            Difficulty::Normal => 0.0,
            Difficulty::Hard => 2.0,
        }
    }
}

/// A group of identical enemies in the opening roster
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnemyGroup {
    /// Variant name; unknown names spawn basic enemies
    pub kind: String,
    pub count: usize,
}

impl EnemyGroup {
    pub fn new(tag: EnemyTag, count: usize) -> Self {
        Self {
            kind: tag.as_str().to_string(),
            count,
        }
    }

    pub fn tag(&self) -> EnemyTag {
        EnemyTag::parse(&self.kind)
    }
}

/// Round balance and field layout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub field_width: f32,
    pub field_height: f32,
    /// Simulation ticks per second
    pub fps: u32,

    pub player_size: f32,
    /// Units moved per tick while a direction is held
    pub player_speed: f32,

    /// Preset this config was derived from
    pub difficulty: Difficulty,
    /// Score needed per level
    pub level_up_score: u64,
    /// Upper bound on live enemies (level-ups stop spawning past it)
    pub max_enemies: usize,
    /// Inflation applied to each enemy when testing hits
    pub collision_buffer: f32,

    /// Opening roster, spawned in order
    pub initial_enemies: Vec<EnemyGroup>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            field_width: FIELD_WIDTH,
            field_height: FIELD_HEIGHT,
            fps: TARGET_FPS,

            player_size: PLAYER_SIZE,
            player_speed: PLAYER_SPEED,

            difficulty: Difficulty::Normal,
            level_up_score: LEVEL_UP_SCORE,
            max_enemies: MAX_ENEMIES,
            collision_buffer: 0.0,

            initial_enemies: vec![
                EnemyGroup::new(EnemyTag::Basic, 2),
                EnemyGroup::new(EnemyTag::ZigZag, 1),
                EnemyGroup::new(EnemyTag::Homing, 1),
                EnemyGroup::new(EnemyTag::Diagonal, 1),
            ],
        }
    }
}

impl GameConfig {
    /// Create a config from a difficulty preset (applies preset defaults)
    pub fn from_difficulty(difficulty: Difficulty) -> Self {
        let mut config = Self::default();
        config.apply_difficulty(difficulty);
        config
    }

    /// Apply a difficulty preset (updates preset-dependent balance)
    pub fn apply_difficulty(&mut self, difficulty: Difficulty) {
        self.difficulty = difficulty;
        self.level_up_score = difficulty.level_up_score();
        self.collision_buffer = difficulty.collision_buffer();
    }

    pub fn field(&self) -> Field {
        Field::new(self.field_width, self.field_height)
    }

    /// Total enemies in the opening roster
    pub fn initial_enemy_count(&self) -> usize {
        self.initial_enemies.iter().map(|g| g.count).sum()
    }

    /// Load and validate a JSON config file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_json::from_str(&json).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Write the config as pretty JSON
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self).map_err(|source| ConfigError::Serialize {
            path: path.to_path_buf(),
            source,
        })?;
        fs::write(path, json).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Reject layouts the simulation cannot run
    pub fn validate(&self) -> Result<(), ConfigError> {
        let smallest = self.player_size.max(ENEMY_SIZE);
        if !(self.field_width >= smallest && self.field_height >= smallest) {
            return Err(ConfigError::Invalid(format!(
                "field {}x{} must fit a {} unit square",
                self.field_width, self.field_height, smallest
            )));
        }
        if !(self.player_size > 0.0) {
            return Err(ConfigError::Invalid("player_size must be positive".into()));
        }
        if !(self.player_speed >= 0.0) {
            return Err(ConfigError::Invalid("player_speed must not be negative".into()));
        }
        if self.fps == 0 {
            return Err(ConfigError::Invalid("fps must be positive".into()));
        }
        if self.level_up_score == 0 {
            return Err(ConfigError::Invalid("level_up_score must be positive".into()));
        }
        if !(self.collision_buffer >= 0.0 && self.collision_buffer.is_finite()) {
            return Err(ConfigError::Invalid(
                "collision_buffer must be a non-negative number".into(),
            ));
        }
        Ok(())
    }
}
