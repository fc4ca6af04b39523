//! Session history, high scores and settings
//!
//! The game and the stats viewer only talk to storage through
//! [`SessionStore`]; [`SqliteStore`] is the on-disk implementation.

mod sqlite;

pub use sqlite::SqliteStore;

use thiserror::Error;

/// Default database file name
pub const DEFAULT_DB_FILE: &str = "game_stats.db";
/// Name recorded when neither the caller nor the settings provide one
pub const DEFAULT_PLAYER_NAME: &str = "Player";

/// Settings keys
pub const SETTING_PLAYER_NAME: &str = "player_name";
pub const SETTING_DIFFICULTY: &str = "difficulty";

/// Storage failures
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),
    #[error("bad value in database: {0}")]
    Corrupt(String),
}

/// One finished round, as written at game over
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionRecord {
    pub score: u64,
    pub level: u32,
    /// Whole seconds
    pub time_survived: u64,
    pub enemies_dodged: u32,
    /// Falls back to the `player_name` setting when absent
    pub player_name: Option<String>,
}

/// A leaderboard row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreRow {
    pub player_name: String,
    pub score: u64,
    pub level: u32,
    pub time_survived: u64,
    /// `YYYY-MM-DD HH:MM:SS`, local time
    pub date: String,
}

/// Aggregates over every round a player has recorded
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerStats {
    pub games_played: u64,
    pub best_score: u64,
    pub average_score: f64,
    pub highest_level: u32,
    /// Whole seconds
    pub total_time_played: u64,
}

/// A row of recent history
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryRow {
    pub date: String,
    pub player_name: String,
    pub score: u64,
    pub level: u32,
}

/// Storage collaborator used by the round controller and the stats viewer
pub trait SessionStore {
    /// Append one finished round
    fn record_session(&mut self, session: &SessionRecord) -> Result<(), PersistenceError>;

    /// Best rounds, highest score first
    fn top_scores(&self, limit: usize) -> Result<Vec<ScoreRow>, PersistenceError>;

    /// Aggregates for `name`, or `None` if they never finished a round
    fn player_stats(&self, name: &str) -> Result<Option<PlayerStats>, PersistenceError>;

    fn get_setting(&self, name: &str) -> Result<Option<String>, PersistenceError>;

    fn set_setting(&mut self, name: &str, value: &str) -> Result<(), PersistenceError>;

    /// Rounds from the last `days` calendar days, newest first
    fn history(&self, days: u32) -> Result<Vec<HistoryRow>, PersistenceError>;

    /// Highest recorded score, 0 when nothing is stored
    fn best_score(&self) -> Result<u64, PersistenceError> {
        Ok(self.top_scores(1)?.first().map(|row| row.score).unwrap_or(0))
    }

    /// Stored player name, or the default
    fn player_name(&self) -> Result<String, PersistenceError> {
        Ok(self
            .get_setting(SETTING_PLAYER_NAME)?
            .unwrap_or_else(|| DEFAULT_PLAYER_NAME.to_string()))
    }
}
