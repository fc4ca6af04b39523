use std::path::Path;

use chrono::{Local, NaiveDateTime, TimeDelta};
use rusqlite::{Connection, OptionalExtension, params};

use super::*;

const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const DAY_FORMAT: &str = "%Y-%m-%d";

const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS game_sessions (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        player_name TEXT DEFAULT 'Player',
        score INTEGER NOT NULL,
        level INTEGER NOT NULL,
        time_played INTEGER NOT NULL,
        enemies_dodged INTEGER NOT NULL,
        session_date TEXT NOT NULL
    );
    CREATE TABLE IF NOT EXISTS game_settings (
        id INTEGER PRIMARY KEY,
        setting_name TEXT UNIQUE NOT NULL,
        setting_value TEXT NOT NULL
    );
    INSERT OR IGNORE INTO game_settings (id, setting_name, setting_value)
        VALUES (1, 'player_name', 'Player');
    INSERT OR IGNORE INTO game_settings (id, setting_name, setting_value)
        VALUES (2, 'difficulty', 'normal');
";

/// SQLite-backed session store.
///
/// One connection is held for the lifetime of the store and closed on drop.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open (creating if needed) the database at `path`
    pub fn open(path: &Path) -> Result<Self, PersistenceError> {
        let store = Self {
            conn: Connection::open(path)?,
        };
        store.init_schema()?;
        log::info!("Opened session database {}", path.display());
        Ok(store)
    }

    /// Throwaway database that lives only as long as the store
    pub fn open_in_memory() -> Result<Self, PersistenceError> {
        let store = Self {
            conn: Connection::open_in_memory()?,
        };
        store.init_schema()?;
        Ok(store)
    }

    fn init_schema(&self) -> Result<(), PersistenceError> {
        self.conn.execute_batch(SCHEMA)?;
        Ok(())
    }

    /// Insert a session stamped with `at`
    pub(crate) fn record_session_at(
        &mut self,
        session: &SessionRecord,
        at: NaiveDateTime,
    ) -> Result<(), PersistenceError> {
        let player_name = match &session.player_name {
            Some(name) => name.clone(),
            None => self.player_name()?,
        };
        self.conn.execute(
            "INSERT INTO game_sessions
                (player_name, score, level, time_played, enemies_dodged, session_date)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                player_name,
                to_i64(session.score)?,
                session.level as i64,
                to_i64(session.time_survived)?,
                session.enemies_dodged as i64,
                at.format(DATE_FORMAT).to_string(),
            ],
        )?;
        log::info!(
            "Recorded session for {}: score {} level {}",
            player_name,
            session.score,
            session.level
        );
        Ok(())
    }

    /// History relative to an explicit `now`
    pub(crate) fn history_at(
        &self,
        now: NaiveDateTime,
        days: u32,
    ) -> Result<Vec<HistoryRow>, PersistenceError> {
        let start = TimeDelta::try_days(i64::from(days))
            .and_then(|delta| now.checked_sub_signed(delta))
            .map(|start| start.format(DAY_FORMAT).to_string())
            .unwrap_or_default();

        let mut stmt = self.conn.prepare(
            "SELECT session_date, player_name, score, level
             FROM game_sessions
             WHERE session_date >= ?1
             ORDER BY session_date DESC, id DESC",
        )?;
        let rows = stmt.query_map(params![start], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, Option<String>>(1)?,
                row.get::<_, i64>(2)?,
                row.get::<_, i64>(3)?,
            ))
        })?;

        let mut history = Vec::new();
        for row in rows {
            let (date, player_name, score, level) = row?;
            history.push(HistoryRow {
                date,
                player_name: player_name.unwrap_or_else(|| DEFAULT_PLAYER_NAME.to_string()),
                score: to_u64(score, "score")?,
                level: to_u32(level, "level")?,
            });
        }
        Ok(history)
    }
}

impl SessionStore for SqliteStore {
    fn record_session(&mut self, session: &SessionRecord) -> Result<(), PersistenceError> {
        self.record_session_at(session, Local::now().naive_local())
    }

    fn top_scores(&self, limit: usize) -> Result<Vec<ScoreRow>, PersistenceError> {
        let mut stmt = self.conn.prepare(
            "SELECT player_name, score, level, time_played, session_date
             FROM game_sessions
             ORDER BY score DESC, id ASC
             LIMIT ?1",
        )?;
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let rows = stmt.query_map(params![limit], |row| {
            Ok((
                row.get::<_, Option<String>>(0)?,
                row.get::<_, i64>(1)?,
                row.get::<_, i64>(2)?,
                row.get::<_, i64>(3)?,
                row.get::<_, String>(4)?,
            ))
        })?;

        let mut scores = Vec::new();
        for row in rows {
            let (player_name, score, level, time_played, date) = row?;
            scores.push(ScoreRow {
                player_name: player_name.unwrap_or_else(|| DEFAULT_PLAYER_NAME.to_string()),
                score: to_u64(score, "score")?,
                level: to_u32(level, "level")?,
                time_survived: to_u64(time_played, "time_played")?,
                date,
            });
        }
        Ok(scores)
    }

    fn player_stats(&self, name: &str) -> Result<Option<PlayerStats>, PersistenceError> {
        let (games, best, average, highest, total) = self.conn.query_row(
            "SELECT COUNT(*), MAX(score), AVG(score), MAX(level), SUM(time_played)
             FROM game_sessions
             WHERE player_name = ?1",
            params![name],
            |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, Option<i64>>(1)?,
                    row.get::<_, Option<f64>>(2)?,
                    row.get::<_, Option<i64>>(3)?,
                    row.get::<_, Option<i64>>(4)?,
                ))
            },
        )?;

        if games == 0 {
            return Ok(None);
        }
        Ok(Some(PlayerStats {
            games_played: to_u64(games, "games_played")?,
            best_score: to_u64(best.unwrap_or(0), "best_score")?,
            average_score: average.unwrap_or(0.0),
            highest_level: to_u32(highest.unwrap_or(0), "highest_level")?,
            total_time_played: to_u64(total.unwrap_or(0), "total_time_played")?,
        }))
    }

    fn get_setting(&self, name: &str) -> Result<Option<String>, PersistenceError> {
        let value = self
            .conn
            .query_row(
                "SELECT setting_value FROM game_settings WHERE setting_name = ?1",
                params![name],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    fn set_setting(&mut self, name: &str, value: &str) -> Result<(), PersistenceError> {
        self.conn.execute(
            "INSERT INTO game_settings (setting_name, setting_value) VALUES (?1, ?2)
             ON CONFLICT(setting_name) DO UPDATE SET setting_value = excluded.setting_value",
            params![name, value],
        )?;
        log::debug!("Setting {} = {}", name, value);
        Ok(())
    }

    fn history(&self, days: u32) -> Result<Vec<HistoryRow>, PersistenceError> {
        self.history_at(Local::now().naive_local(), days)
    }
}

fn to_i64(value: u64) -> Result<i64, PersistenceError> {
    i64::try_from(value).map_err(|_| PersistenceError::Corrupt(format!("{value} does not fit in a column")))
}

fn to_u64(value: i64, column: &str) -> Result<u64, PersistenceError> {
    u64::try_from(value).map_err(|_| PersistenceError::Corrupt(format!("negative {column}: {value}")))
}

fn to_u32(value: i64, column: &str) -> Result<u32, PersistenceError> {
    u32::try_from(value).map_err(|_| PersistenceError::Corrupt(format!("{column} out of range: {value}")))
}
