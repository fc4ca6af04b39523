//! Text reports over stored sessions, plus the interactive menu driving them

use std::io::{self, BufRead, Write};

use thiserror::Error;

use crate::persistence::{DEFAULT_PLAYER_NAME, PersistenceError, SessionStore};

/// Days of history shown when the user just presses Enter
pub const DEFAULT_HISTORY_DAYS: u32 = 7;
const TOP_SCORES: usize = 10;

#[derive(Debug, Error)]
pub enum StatsError {
    #[error("terminal I/O failed: {0}")]
    Io(#[from] io::Error),
    #[error(transparent)]
    Storage(#[from] PersistenceError),
}

pub struct StatsViewer<S: SessionStore> {
    store: S,
}

impl<S: SessionStore> StatsViewer<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn show_top_scores<W: Write>(&self, out: &mut W) -> Result<(), StatsError> {
        writeln!(out, "=== TOP SCORES ===")?;
        let rows = self.store.top_scores(TOP_SCORES)?;
        if rows.is_empty() {
            writeln!(out, "No scores recorded yet!")?;
            return Ok(());
        }
        for (i, row) in rows.iter().enumerate() {
            writeln!(
                out,
                "{}. {}: {} points (Level {}, {}s) - {}",
                i + 1,
                row.player_name,
                row.score,
                row.level,
                row.time_survived,
                row.date
            )?;
        }
        Ok(())
    }

    pub fn show_player_stats<W: Write>(&self, name: &str, out: &mut W) -> Result<(), StatsError> {
        writeln!(out, "\n=== STATS FOR {} ===", name.to_uppercase())?;
        match self.store.player_stats(name)? {
            Some(stats) if stats.games_played > 0 => {
                writeln!(out, "Games played: {}", stats.games_played)?;
                writeln!(out, "Best score: {}", stats.best_score)?;
                writeln!(out, "Average score: {:.1}", stats.average_score)?;
                writeln!(out, "Highest level: {}", stats.highest_level)?;
                writeln!(out, "Total time played: {} seconds", stats.total_time_played)?;
            }
            _ => writeln!(out, "No games found for this player!")?,
        }
        Ok(())
    }

    pub fn show_recent<W: Write>(&self, days: u32, out: &mut W) -> Result<(), StatsError> {
        writeln!(out, "\n=== GAMES FROM THE LAST {} DAYS ===", days)?;
        let rows = self.store.history(days)?;
        if rows.is_empty() {
            writeln!(out, "No games found in this period!")?;
            return Ok(());
        }
        for row in rows {
            writeln!(
                out,
                "{}: {} - {} points (Level {})",
                row.date, row.player_name, row.score, row.level
            )?;
        }
        Ok(())
    }

    /// Interactive menu loop; returns on "exit" or end of input
    pub fn run<R: BufRead, W: Write>(&self, input: &mut R, out: &mut W) -> Result<(), StatsError> {
        loop {
            writeln!(out, "\n{}", "=".repeat(50))?;
            writeln!(out, "SQUARE DODGER - STATS")?;
            writeln!(out, "{}", "=".repeat(50))?;
            writeln!(out, "1. Top scores")?;
            writeln!(out, "2. Player stats")?;
            writeln!(out, "3. Recent games")?;
            writeln!(out, "4. Exit")?;

            let Some(choice) = prompt(input, out, "\nChoose an option: ")? else {
                return Ok(());
            };
            match choice.as_str() {
                "1" => self.show_top_scores(out)?,
                "2" => {
                    let Some(name) = prompt(
                        input,
                        out,
                        &format!("Player name (Enter for '{}'): ", DEFAULT_PLAYER_NAME),
                    )?
                    else {
                        return Ok(());
                    };
                    let name = if name.is_empty() {
                        DEFAULT_PLAYER_NAME
                    } else {
                        name.as_str()
                    };
                    self.show_player_stats(name, out)?;
                }
                "3" => {
                    let Some(days) = read_days(input, out)? else {
                        return Ok(());
                    };
                    self.show_recent(days, out)?;
                }
                "4" => {
                    writeln!(out, "Bye!")?;
                    return Ok(());
                }
                other => {
                    log::debug!("Unknown menu option {:?}", other);
                    writeln!(out, "Invalid option!")?;
                }
            }
        }
    }

    pub fn into_store(self) -> S {
        self.store
    }
}

/// Ask until the answer is empty (default) or a whole number of days
fn read_days<R: BufRead, W: Write>(input: &mut R, out: &mut W) -> Result<Option<u32>, StatsError> {
    loop {
        let prompt_text = format!("Number of days (default {}): ", DEFAULT_HISTORY_DAYS);
        let Some(answer) = prompt(input, out, &prompt_text)? else {
            return Ok(None);
        };
        if answer.is_empty() {
            return Ok(Some(DEFAULT_HISTORY_DAYS));
        }
        match answer.parse::<u32>() {
            Ok(days) => return Ok(Some(days)),
            Err(_) => writeln!(out, "Invalid number!")?,
        }
    }
}

/// Print `text` and read one trimmed line; `None` at end of input
fn prompt<R: BufRead, W: Write>(
    input: &mut R,
    out: &mut W,
    text: &str,
) -> Result<Option<String>, StatsError> {
    write!(out, "{}", text)?;
    out.flush()?;
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}
