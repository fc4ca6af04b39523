//! Round controller bound to a session store
//!
//! Owns the simulation state and reacts to its events: a finished round is
//! written to storage, a restart picks up the stored best score again. Storage
//! failures are logged and never interrupt the round.

use crate::persistence::{SessionRecord, SessionStore};
use crate::settings::GameConfig;
use crate::sim::{GameEvent, GameState, GameStats, RoundState, TickInput, tick};

/// One player's game: simulation plus storage
pub struct Game<S: SessionStore> {
    pub state: GameState,
    store: S,
    /// Name recorded with each session; `None` uses the stored setting
    player_name: Option<String>,
    /// Sessions written successfully
    sessions_recorded: u32,
}

impl<S: SessionStore> Game<S> {
    /// Start a round, seeding the highscore from storage
    pub fn new(config: GameConfig, seed: u64, store: S) -> Self {
        let highscore = load_highscore(&store);
        Self {
            state: GameState::new(config, seed, highscore),
            store,
            player_name: None,
            sessions_recorded: 0,
        }
    }

    pub fn with_player_name(mut self, name: impl Into<String>) -> Self {
        self.player_name = Some(name.into());
        self
    }

    /// Advance one tick and handle whatever it raised
    pub fn update(&mut self, input: &TickInput) -> Vec<GameEvent> {
        tick(&mut self.state, input);
        let events = self.state.drain_events();
        for event in &events {
            match event {
                GameEvent::GameOver { stats, .. } => self.persist(stats),
                GameEvent::Restarted => self.reload_highscore(),
                _ => {}
            }
        }
        events
    }

    pub fn phase(&self) -> RoundState {
        self.state.phase
    }

    pub fn stats(&self) -> &GameStats {
        &self.state.stats
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn sessions_recorded(&self) -> u32 {
        self.sessions_recorded
    }

    /// Give back the store (closing the round)
    pub fn into_store(self) -> S {
        self.store
    }

    fn persist(&mut self, stats: &GameStats) {
        let record = SessionRecord {
            score: stats.score,
            level: stats.level,
            time_survived: stats.time_survived,
            enemies_dodged: stats.enemies_dodged,
            player_name: self.player_name.clone(),
        };
        match self.store.record_session(&record) {
            Ok(()) => self.sessions_recorded += 1,
            Err(e) => log::warn!("Failed to record session (score {}): {}", stats.score, e),
        }
    }

    /// Take the stored best if it beats what the round already knows
    fn reload_highscore(&mut self) {
        let stored = load_highscore(&self.store);
        let stats = &mut self.state.stats;
        stats.highscore = stats.highscore.max(stored);
    }
}

fn load_highscore<S: SessionStore>(store: &S) -> u64 {
    store.best_score().unwrap_or_else(|e| {
        log::warn!("Could not load highscore: {}", e);
        0
    })
}
