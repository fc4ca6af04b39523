//! Square Dodger stats viewer
//!
//! Usage:
//!   dodger-stats [--db game_stats.db]

use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use square_dodger::persistence::{DEFAULT_DB_FILE, SqliteStore};
use square_dodger::stats::StatsViewer;

#[derive(Parser)]
#[command(name = "dodger-stats")]
#[command(about = "Browse Square Dodger high scores and history")]
struct Args {
    /// SQLite database written by the game
    #[arg(long, default_value = DEFAULT_DB_FILE)]
    db: PathBuf,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let store = SqliteStore::open(&args.db)
        .with_context(|| format!("opening database {}", args.db.display()))?;
    log::info!("Viewing stats from {}", args.db.display());

    let viewer = StatsViewer::new(store);
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    viewer
        .run(&mut stdin.lock(), &mut stdout)
        .context("stats viewer failed")?;
    Ok(())
}
