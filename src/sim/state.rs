//! Round state and core simulation types
//!
//! Everything the round controller mutates lives in `GameState`.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::enemy::{Enemy, EnemyTag};
use super::factory;
use super::particles::ParticleSystem;
use super::rect::{Field, Rect};
use crate::settings::GameConfig;

/// Current phase of a round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundState {
    /// Active gameplay
    Running,
    /// Simulation frozen until the pause toggle is pressed again
    Paused,
    /// Player was hit; waiting for restart
    GameOver,
}

/// Things that happened during a tick, for collaborators outside the simulation
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    LevelUp { level: u32 },
    EnemySpawned { tag: EnemyTag },
    Paused,
    Resumed,
    /// The round ended; raised exactly once per round
    GameOver { stats: GameStats, new_highscore: bool },
    Restarted,
}

/// The player's square
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub rect: Rect,
    /// Units per tick
    pub speed: f32,
    pub field: Field,
}

impl Player {
    /// Player of `size` centered in the field
    pub fn new(field: Field, size: f32, speed: f32) -> Self {
        Self {
            rect: Rect::centered_at(field.center(), size, size),
            speed,
            field,
        }
    }

    /// Move by the held directions, then clamp inside the field
    pub fn apply_input(&mut self, left: bool, right: bool, up: bool, down: bool) {
        let mut delta = Vec2::ZERO;
        if left {
            delta.x -= self.speed;
        }
        if right {
            delta.x += self.speed;
        }
        if up {
            delta.y -= self.speed;
        }
        if down {
            delta.y += self.speed;
        }
        self.rect = self.field.clamp(self.rect.translated(delta));
    }

    /// Put the player back in the middle of the field
    pub fn recenter(&mut self) {
        self.rect = Rect::centered_at(self.field.center(), self.rect.w, self.rect.h);
    }
}

/// Per-round counters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameStats {
    /// +1 for every running tick
    pub score: u64,
    /// Starts at 1
    pub level: u32,
    /// Best score known at round start, raised on game over if beaten
    pub highscore: u64,
    /// Whole seconds survived
    pub time_survived: u64,
    /// Enemies that crossed the field without hitting the player
    pub enemies_dodged: u32,
}

impl GameStats {
    pub fn new(highscore: u64) -> Self {
        Self {
            score: 0,
            level: 1,
            highscore,
            time_survived: 0,
            enemies_dodged: 0,
        }
    }
}

/// Complete round state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    pub config: GameConfig,
    pub field: Field,
    pub phase: RoundState,
    pub player: Player,
    /// Live enemies in spawn order (collision checks scan in this order)
    pub enemies: Vec<Enemy>,
    pub stats: GameStats,
    /// Running ticks this round
    pub time_ticks: u64,
    /// Visual particles (not gameplay-affecting)
    pub particles: ParticleSystem,
    /// Pending events, drained by the owner after each tick
    pub events: Vec<GameEvent>,
}

impl GameState {
    /// Start a round with the configured roster and a previously stored best score
    pub fn new(config: GameConfig, seed: u64, highscore: u64) -> Self {
        let field = config.field();
        let player = Player::new(field, config.player_size, config.player_speed);

        let mut state = Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            field,
            phase: RoundState::Running,
            player,
            enemies: Vec::new(),
            stats: GameStats::new(highscore),
            time_ticks: 0,
            particles: ParticleSystem::new(),
            events: Vec::new(),
            config,
        };
        state.spawn_initial_enemies();
        state
    }

    fn spawn_initial_enemies(&mut self) {
        let roster: Vec<EnemyTag> = self
            .config
            .initial_enemies
            .iter()
            .flat_map(|group| std::iter::repeat_n(group.tag(), group.count))
            .collect();
        for tag in roster {
            self.spawn_enemy(tag);
        }
    }

    /// Add one enemy of `tag` on a random edge
    pub fn spawn_enemy(&mut self, tag: EnemyTag) {
        let target = (tag == EnemyTag::Homing).then_some(self.player.rect);
        let enemy = factory::create(tag, self.field, target, &mut self.rng);
        log::debug!("Spawned {} enemy from {}", tag.as_str(), enemy.edge.as_str());
        self.enemies.push(enemy);
    }

    /// Take every event raised since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Seconds survived for a tick count at the configured rate
    pub fn seconds_for(&self, ticks: u64) -> u64 {
        ticks / self.config.fps.max(1) as u64
    }

    pub fn is_over(&self) -> bool {
        self.phase == RoundState::GameOver
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_round_layout() {
        let state = GameState::new(GameConfig::default(), 42, 1234);
        assert_eq!(state.phase, RoundState::Running);
        assert_eq!(state.player.rect, Rect::new(230.0, 230.0, 40.0, 40.0));
        assert_eq!(state.stats, GameStats::new(1234));

        let tags: Vec<_> = state.enemies.iter().map(Enemy::tag).collect();
        assert_eq!(
            tags,
            vec![
                EnemyTag::Basic,
                EnemyTag::Basic,
                EnemyTag::ZigZag,
                EnemyTag::Homing,
                EnemyTag::Diagonal
            ]
        );
    }

    #[test]
    fn test_same_seed_same_roster() {
        let a = GameState::new(GameConfig::default(), 7, 0);
        let b = GameState::new(GameConfig::default(), 7, 0);
        assert_eq!(a.enemies, b.enemies);
    }

    #[test]
    fn test_player_clamped_to_field() {
        let mut player = Player::new(Field::new(500.0, 500.0), 40.0, 5.0);
        for _ in 0..100 {
            player.apply_input(true, false, true, false);
        }
        assert_eq!(player.rect, Rect::new(0.0, 0.0, 40.0, 40.0));
        for _ in 0..200 {
            player.apply_input(false, true, false, true);
        }
        assert_eq!(player.rect, Rect::new(460.0, 460.0, 40.0, 40.0));
        player.recenter();
        assert_eq!(player.rect, Rect::new(230.0, 230.0, 40.0, 40.0));
    }

    #[test]
    fn test_opposite_keys_cancel() {
        let mut player = Player::new(Field::new(500.0, 500.0), 40.0, 5.0);
        player.apply_input(true, true, false, false);
        assert_eq!(player.rect.x, 230.0);
    }
}
