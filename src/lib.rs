//! Square Dodger - a terminal arcade dodging game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (enemy kinematics, collisions, round state)
//! - `game`: Round controller wired to a session store
//! - `renderer`: Terminal rendering (crossterm)
//! - `platform`: Terminal session and keyboard input
//! - `persistence`: Session history, high scores and settings (SQLite)
//! - `settings`: Data-driven game balance
//! - `stats`: Stats viewer shared by the `dodger-stats` binary

pub mod game;
pub mod persistence;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod stats;

pub use game::Game;
pub use settings::{Difficulty, GameConfig};

/// Game configuration constants
pub mod consts {
    /// Target simulation rate (ticks per second)
    pub const TARGET_FPS: u32 = 60;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 4;

    /// Play field dimensions
    pub const FIELD_WIDTH: f32 = 500.0;
    pub const FIELD_HEIGHT: f32 = 500.0;

    /// Player defaults
    pub const PLAYER_SIZE: f32 = 40.0;
    pub const PLAYER_SPEED: f32 = 5.0;

    /// Enemy defaults
    pub const ENEMY_SIZE: f32 = 30.0;
    /// Inclusive integer speed range rolled on every spawn/reset
    pub const ENEMY_MIN_SPEED: i32 = 3;
    pub const ENEMY_MAX_SPEED: i32 = 6;

    /// Zig-zag oscillation
    pub const ZIGZAG_AMPLITUDE: f32 = 3.0;
    pub const ZIGZAG_MIN_ANGULAR_SPEED: f32 = 0.05;
    pub const ZIGZAG_MAX_ANGULAR_SPEED: f32 = 0.1;

    /// Homing steering
    pub const HOMING_MIN_STRENGTH: f32 = 0.03;
    pub const HOMING_MAX_STRENGTH: f32 = 0.07;
    pub const HOMING_STRENGTH_CAP: f32 = 0.1;
    /// Floor on the enemy-to-player distance (avoids dividing by zero)
    pub const HOMING_MIN_DISTANCE: f32 = 1.0;

    /// Diagonal lateral drift per tick
    pub const DIAGONAL_BIAS: f32 = 2.0;

    /// Per level-up increments
    pub const LEVEL_SPEED_BONUS: f32 = 0.2;
    pub const LEVEL_ZIGZAG_BONUS: f32 = 0.005;
    pub const LEVEL_HOMING_BONUS: f32 = 0.002;

    /// Round balance
    pub const LEVEL_UP_SCORE: u64 = 300;
    pub const MAX_ENEMIES: usize = 15;
    /// Enemy count kept on restart (literal, independent of the initial roster)
    pub const RESTART_ENEMY_CAP: usize = 6;

    /// Explosion particles spawned on game over
    pub const EXPLOSION_PARTICLES: usize = 20;
}
