//! Fixed timestep round controller
//!
//! One call to `tick` is one simulation step. The order inside a running tick
//! matters: player, enemies, collision scan, particles, then scoring and
//! difficulty.

use super::collision::find_first_collision;
use super::enemy::Motion;
use super::factory::choose_variant;
use super::state::{GameEvent, GameState, GameStats, RoundState};
use crate::consts::{EXPLOSION_PARTICLES, RESTART_ENEMY_CAP};

/// Explosion color on game over
const EXPLOSION_COLOR: [u8; 3] = [255, 50, 50];

/// Input commands for a single tick
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickInput {
    /// Held movement directions
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
    /// Pause toggle (edge-triggered)
    pub pause: bool,
    /// Restart after game over (edge-triggered)
    pub restart: bool,
}

/// Advance the round by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput) {
    // Handle pause toggle
    if input.pause {
        match state.phase {
            RoundState::Running => {
                state.phase = RoundState::Paused;
                state.events.push(GameEvent::Paused);
                return;
            }
            RoundState::Paused => {
                state.phase = RoundState::Running;
                state.events.push(GameEvent::Resumed);
            }
            RoundState::GameOver => {}
        }
    }

    match state.phase {
        RoundState::Paused => return,
        RoundState::GameOver => {
            if input.restart {
                restart(state);
            } else {
                // Let the explosion finish playing out
                state.particles.update();
            }
            return;
        }
        RoundState::Running => {}
    }

    // Update player position
    state
        .player
        .apply_input(input.left, input.right, input.up, input.down);

    // Move enemies against a snapshot of the player taken this tick
    let player_rect = state.player.rect;
    let mut dodged = 0;
    for enemy in &mut state.enemies {
        enemy.set_target(player_rect);
        if enemy.tick(state.field, &mut state.rng) == Motion::Respawned {
            dodged += 1;
        }
    }
    state.stats.enemies_dodged += dodged;

    // Collision scan runs only after every enemy has moved
    let hit = find_first_collision(
        &player_rect,
        state.enemies.iter().map(|e| &e.rect),
        state.config.collision_buffer,
    );
    if let Some(hit) = hit {
        log::debug!("Player hit by enemy #{} at {:?}", hit.index, hit.rect);
        game_over(state);
        return;
    }

    state.particles.update();

    // Scoring and difficulty
    state.time_ticks += 1;
    state.stats.score += 1;
    state.stats.time_survived = state.seconds_for(state.time_ticks);
    increase_difficulty(state);
}

/// Level is derived from score; each new level adds one enemy and speeds up the rest
fn increase_difficulty(state: &mut GameState) {
    let new_level = (state.stats.score / state.config.level_up_score) as u32 + 1;
    if new_level <= state.stats.level {
        return;
    }

    state.stats.level = new_level;
    log::info!("Level up: {} (score {})", new_level, state.stats.score);
    state.events.push(GameEvent::LevelUp { level: new_level });

    if state.enemies.len() < state.config.max_enemies {
        let tag = choose_variant(new_level, &mut state.rng);
        state.spawn_enemy(tag);
        state.events.push(GameEvent::EnemySpawned { tag });
    }

    for enemy in &mut state.enemies {
        enemy.apply_level_up();
    }
}

fn game_over(state: &mut GameState) {
    state.phase = RoundState::GameOver;

    let new_highscore = state.stats.score > state.stats.highscore;
    if new_highscore {
        state.stats.highscore = state.stats.score;
    }

    log::info!(
        "Game over: score {} level {} ({}s, {} dodged)",
        state.stats.score,
        state.stats.level,
        state.stats.time_survived,
        state.stats.enemies_dodged
    );
    state.events.push(GameEvent::GameOver {
        stats: state.stats.clone(),
        new_highscore,
    });

    let origin = state.player.rect.center();
    state
        .particles
        .add_explosion(origin, EXPLOSION_COLOR, EXPLOSION_PARTICLES, &mut state.rng);
}

/// Start a new round from game over, keeping the enemy roster in place.
///
/// The best score carries over; everything else in the stats starts fresh.
/// Does nothing unless the round is over.
pub fn restart(state: &mut GameState) {
    if state.phase != RoundState::GameOver {
        return;
    }

    state.stats = GameStats::new(state.stats.highscore);
    state.time_ticks = 0;
    state.phase = RoundState::Running;
    state.player.recenter();

    for enemy in &mut state.enemies {
        enemy.reset(state.field, &mut state.rng);
    }
    state.enemies.truncate(RESTART_ENEMY_CAP);
    state.particles.clear();

    log::info!("Round restarted with {} enemies", state.enemies.len());
    state.events.push(GameEvent::Restarted);
}
