//! Cosmetic particle bursts
//!
//! Particles never affect gameplay; they only live long enough to be drawn.

use glam::Vec2;
use rand::Rng;

/// A single spark
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub color: [u8; 3],
    /// Edge length in field units
    pub size: f32,
    /// Remaining ticks
    pub life: u32,
}

impl Particle {
    /// Advance one tick; returns false once the particle has expired
    pub fn update(&mut self) -> bool {
        self.pos += self.vel;
        self.life = self.life.saturating_sub(1);
        self.size = (self.size - 0.1).max(0.0);
        self.life > 0
    }

    /// Fade factor in `[0, 1]`
    pub fn alpha(&self) -> f32 {
        (self.life as f32 * 6.0 / 255.0).min(1.0)
    }
}

/// Owns every live particle
#[derive(Debug, Clone, Default)]
pub struct ParticleSystem {
    pub particles: Vec<Particle>,
}

impl ParticleSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Emit `count` particles from `origin` in random directions
    pub fn add_explosion<R: Rng + ?Sized>(&mut self, origin: Vec2, color: [u8; 3], count: usize, rng: &mut R) {
        self.particles.reserve(count);
        for _ in 0..count {
            self.particles.push(Particle {
                pos: origin,
                vel: Vec2::new(rng.random_range(-2.0..=2.0), rng.random_range(-2.0..=2.0)),
                color,
                size: rng.random_range(2..=5) as f32,
                life: rng.random_range(20..=40),
            });
        }
    }

    pub fn update(&mut self) {
        self.particles.retain_mut(Particle::update);
    }

    pub fn clear(&mut self) {
        self.particles.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }
}
