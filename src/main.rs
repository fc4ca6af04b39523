//! Square Dodger entry point
//!
//! Sets up logging, storage and the terminal, then alternates between the
//! title menu and rounds until the player quits.

use std::fs::File;
use std::io::{BufWriter, Stdout, Write, stdout};
use std::path::PathBuf;
use std::thread;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use clap::Parser;

use square_dodger::consts::MAX_SUBSTEPS;
use square_dodger::persistence::{
    DEFAULT_DB_FILE, SETTING_DIFFICULTY, SETTING_PLAYER_NAME, SessionStore, SqliteStore,
};
use square_dodger::platform::{Action, InputState, TerminalEvent, TerminalSession};
use square_dodger::renderer::{TerminalRenderer, draw_menu, draw_round};
use square_dodger::sim::{GameEvent, RoundState};
use square_dodger::{Difficulty, Game, GameConfig};

/// Largest frame time fed to the accumulator
const MAX_FRAME_TIME: Duration = Duration::from_millis(100);
const MENU_FRAME: Duration = Duration::from_millis(33);

#[derive(Parser)]
#[command(name = "square-dodger")]
#[command(about = "Dodge squares coming in from every edge of the screen")]
struct Args {
    /// JSON game config (defaults are used when omitted)
    #[arg(long)]
    config: Option<PathBuf>,

    /// SQLite database for sessions and settings
    #[arg(long, default_value = DEFAULT_DB_FILE)]
    db: PathBuf,

    /// RNG seed (defaults to the clock)
    #[arg(long)]
    seed: Option<u64>,

    /// Player name, stored as the default for later runs
    #[arg(long)]
    name: Option<String>,

    /// Difficulty preset, stored as the default for later runs
    #[arg(long, value_parser = parse_difficulty)]
    difficulty: Option<Difficulty>,

    /// Where log output goes while the terminal is in use
    #[arg(long, default_value = "square-dodger.log")]
    log_file: PathBuf,
}

fn parse_difficulty(s: &str) -> Result<Difficulty, String> {
    Difficulty::from_str(s).ok_or_else(|| format!("unknown difficulty '{}' (easy, normal, hard)", s))
}

type Out = BufWriter<Stdout>;

/// What ended a round
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RoundExit {
    Menu,
    Quit,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let log_file = File::create(&args.log_file)
        .with_context(|| format!("creating log file {}", args.log_file.display()))?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(log_file)))
        .init();

    log::info!("Square Dodger starting...");

    let mut store = SqliteStore::open(&args.db)
        .with_context(|| format!("opening database {}", args.db.display()))?;

    let name = match &args.name {
        Some(name) => {
            store
                .set_setting(SETTING_PLAYER_NAME, name)
                .context("saving player name")?;
            name.clone()
        }
        None => store.player_name().context("reading player name")?,
    };

    let difficulty = match args.difficulty {
        Some(difficulty) => {
            store
                .set_setting(SETTING_DIFFICULTY, difficulty.as_str())
                .context("saving difficulty")?;
            Some(difficulty)
        }
        None => store
            .get_setting(SETTING_DIFFICULTY)
            .context("reading difficulty")?
            .and_then(|s| Difficulty::from_str(&s)),
    };

    let mut config = match &args.config {
        Some(path) => GameConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => GameConfig::default(),
    };
    // A config file keeps its own balance unless a preset was asked for
    if args.config.is_none() || args.difficulty.is_some() {
        config.apply_difficulty(difficulty.unwrap_or_default());
    }

    let seed = args.seed.unwrap_or_else(clock_seed);
    log::info!(
        "Player {}, difficulty {}, seed {}",
        name,
        config.difficulty.as_str(),
        seed
    );

    let mut session = TerminalSession::start(BufWriter::new(stdout()))
        .context("setting up the terminal")?;
    let result = run(&mut session, store, &config, seed, &name);
    drop(session);

    match &result {
        Ok(()) => log::info!("Square Dodger exiting"),
        Err(e) => log::error!("Square Dodger failed: {:#}", e),
    }
    result
}

fn clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0)
}

/// Menu, round, menu, ... until the player quits
fn run(
    session: &mut TerminalSession<Out>,
    mut store: SqliteStore,
    config: &GameConfig,
    seed: u64,
    name: &str,
) -> Result<()> {
    let mut renderer = TerminalRenderer::new();
    let mut input = InputState::for_terminal(session.keyboard_enhanced());
    let mut rounds_started: u64 = 0;

    loop {
        let best = store.best_score().unwrap_or_else(|e| {
            log::warn!("Could not load highscore: {}", e);
            0
        });
        if !run_menu(session, &mut renderer, &mut input, best)? {
            return Ok(());
        }

        let round_seed = seed.wrapping_add(rounds_started);
        rounds_started += 1;
        log::info!("New game (seed {})", round_seed);

        let mut game = Game::new(config.clone(), round_seed, store).with_player_name(name);
        input.clear();
        renderer.invalidate();
        let exit = run_round(session, &mut renderer, &mut input, &mut game);
        store = game.into_store();
        match exit? {
            RoundExit::Menu => input.clear(),
            RoundExit::Quit => return Ok(()),
        }
    }
}

/// Returns `true` to start a round, `false` to exit
fn run_menu(
    session: &mut TerminalSession<Out>,
    renderer: &mut TerminalRenderer,
    input: &mut InputState,
    best: u64,
) -> Result<bool> {
    renderer.invalidate();
    loop {
        pump_events(session, renderer, input);
        if input.take(Action::Confirm) || input.take(Action::Restart) {
            return Ok(true);
        }
        if input.take(Action::Back) || input.take(Action::Quit) {
            return Ok(false);
        }
        // Menu has no use for held keys
        input.next_tick();

        let (cols, rows) = session.size()?;
        renderer.present(session.out(), draw_menu(cols, rows, best))?;
        thread::sleep(MENU_FRAME);
    }
}

/// Fixed-step loop for one game; Esc at game over goes back to the menu
fn run_round<S: SessionStore, W: Write>(
    session: &mut TerminalSession<W>,
    renderer: &mut TerminalRenderer,
    input: &mut InputState,
    game: &mut Game<S>,
) -> Result<RoundExit> {
    let fps = game.state.config.fps.max(1);
    let tick_dt = Duration::from_secs_f64(1.0 / fps as f64);
    let mut accumulator = Duration::ZERO;
    let mut last = Instant::now();

    loop {
        let frame_start = Instant::now();
        pump_events(session, renderer, input);

        if input.take(Action::Quit) {
            return Ok(RoundExit::Quit);
        }
        if input.take(Action::Back) {
            return Ok(if game.phase() == RoundState::GameOver {
                RoundExit::Menu
            } else {
                RoundExit::Quit
            });
        }

        accumulator += frame_start.duration_since(last).min(MAX_FRAME_TIME);
        last = frame_start;

        let mut substeps = 0;
        while accumulator >= tick_dt && substeps < MAX_SUBSTEPS {
            let tick_input = input.next_tick();
            for event in game.update(&tick_input) {
                match event {
                    GameEvent::Paused => log::debug!("Paused"),
                    GameEvent::Resumed => log::debug!("Resumed"),
                    _ => {}
                }
            }
            accumulator -= tick_dt;
            substeps += 1;
        }

        let (cols, rows) = session.size()?;
        renderer.present(session.out(), draw_round(&game.state, cols, rows))?;

        let elapsed = frame_start.elapsed();
        if elapsed < tick_dt {
            thread::sleep(tick_dt - elapsed);
        }
    }
}

fn pump_events<W: Write>(
    session: &mut TerminalSession<W>,
    renderer: &mut TerminalRenderer,
    input: &mut InputState,
) {
    while let Some(event) = session.poll() {
        match event {
            TerminalEvent::Key(key) => input.handle_key(&key),
            TerminalEvent::Resize(cols, rows) => {
                log::debug!("Terminal resized to {}x{}", cols, rows);
                renderer.invalidate();
            }
        }
    }
}
