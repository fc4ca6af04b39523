//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (enemies in spawn order)
//! - No rendering, storage or platform dependencies

pub mod collision;
pub mod enemy;
pub mod factory;
pub mod particles;
pub mod rect;
pub mod state;
pub mod tick;

pub use collision::{CollisionHit, find_first_collision, overlaps};
pub use enemy::{Behavior, Enemy, EnemyTag, Motion, SpawnEdge, base_direction, is_off_screen, spawn_at};
pub use factory::{choose_variant, create, variant_weights};
pub use particles::{Particle, ParticleSystem};
pub use rect::{Field, Rect};
pub use state::{GameEvent, GameState, GameStats, Player, RoundState};
pub use tick::{TickInput, restart, tick};
