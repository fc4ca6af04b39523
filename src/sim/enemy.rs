//! Enemy kinematics
//!
//! Every enemy enters from one edge of the field and travels toward the
//! opposite edge. The spawn edge fixes the primary travel direction; each
//! behavior adds its own offset on top of that. Once an enemy has left the
//! field past the opposite edge it respawns on a random edge in the same tick.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::rect::{Field, Rect};
use crate::consts::*;

/// Edge of the field an enemy enters from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpawnEdge {
    Top,
    Bottom,
    Left,
    Right,
}

impl SpawnEdge {
    pub const ALL: [SpawnEdge; 4] = [
        SpawnEdge::Top,
        SpawnEdge::Bottom,
        SpawnEdge::Left,
        SpawnEdge::Right,
    ];

    /// Unit travel direction (screen coordinates, +y is down)
    pub fn direction(&self) -> Vec2 {
        match self {
            SpawnEdge::Top => Vec2::Y,
            SpawnEdge::Bottom => Vec2::NEG_Y,
            SpawnEdge::Left => Vec2::X,
            SpawnEdge::Right => Vec2::NEG_X,
        }
    }

    /// Unit axis perpendicular to the travel direction
    pub fn lateral(&self) -> Vec2 {
        if self.is_vertical() { Vec2::X } else { Vec2::Y }
    }

    /// True for enemies travelling along the y axis
    pub fn is_vertical(&self) -> bool {
        matches!(self, SpawnEdge::Top | SpawnEdge::Bottom)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SpawnEdge::Top => "top",
            SpawnEdge::Bottom => "bottom",
            SpawnEdge::Left => "left",
            SpawnEdge::Right => "right",
        }
    }
}

/// Base displacement direction for an edge
#[inline]
pub fn base_direction(edge: SpawnEdge) -> Vec2 {
    edge.direction()
}

/// Pick a random edge and place a `w` x `h` box just outside it.
///
/// The coordinate along the edge is a whole number in `[0, extent - size]`.
pub fn spawn_at<R: Rng + ?Sized>(field: Field, w: f32, h: f32, rng: &mut R) -> (Rect, SpawnEdge) {
    let edge = SpawnEdge::ALL[rng.random_range(0..SpawnEdge::ALL.len())];
    let max_x = (field.width - w).max(0.0) as i32;
    let max_y = (field.height - h).max(0.0) as i32;

    let rect = match edge {
        SpawnEdge::Top => Rect::new(rng.random_range(0..=max_x) as f32, -h, w, h),
        SpawnEdge::Bottom => Rect::new(rng.random_range(0..=max_x) as f32, field.height, w, h),
        SpawnEdge::Left => Rect::new(-w, rng.random_range(0..=max_y) as f32, w, h),
        SpawnEdge::Right => Rect::new(field.width, rng.random_range(0..=max_y) as f32, w, h),
    };
    (rect, edge)
}

/// True once the box has crossed past the edge opposite `edge`.
///
/// Top/left compare the leading coordinate against the far bound; bottom/right
/// wait until the whole box is past zero.
pub fn is_off_screen(rect: &Rect, edge: SpawnEdge, field: Field) -> bool {
    match edge {
        SpawnEdge::Top => rect.y > field.height,
        SpawnEdge::Bottom => rect.y < -rect.h,
        SpawnEdge::Left => rect.x > field.width,
        SpawnEdge::Right => rect.x < -rect.w,
    }
}

/// Roll a fresh travel speed
fn roll_speed<R: Rng + ?Sized>(rng: &mut R) -> f32 {
    rng.random_range(ENEMY_MIN_SPEED..=ENEMY_MAX_SPEED) as f32
}

/// Enemy variant names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnemyTag {
    #[default]
    Basic,
    ZigZag,
    Homing,
    Diagonal,
}

impl EnemyTag {
    pub const ALL: [EnemyTag; 4] = [
        EnemyTag::Basic,
        EnemyTag::ZigZag,
        EnemyTag::Homing,
        EnemyTag::Diagonal,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EnemyTag::Basic => "basic",
            EnemyTag::ZigZag => "zigzag",
            EnemyTag::Homing => "homing",
            EnemyTag::Diagonal => "diagonal",
        }
    }

    /// Parse a tag name; anything unrecognised is a basic enemy
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "zigzag" | "zig-zag" => EnemyTag::ZigZag,
            "homing" => EnemyTag::Homing,
            "diagonal" => EnemyTag::Diagonal,
            _ => EnemyTag::Basic,
        }
    }

    /// Display color (RGB)
    pub fn color(&self) -> [u8; 3] {
        match self {
            EnemyTag::Basic => [255, 50, 50],
            EnemyTag::ZigZag => [255, 150, 50],
            EnemyTag::Homing => [255, 50, 150],
            EnemyTag::Diagonal => [50, 255, 100],
        }
    }
}

/// Variant-specific movement state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Behavior {
    /// Straight line along the spawn direction
    Basic,
    /// Sinusoidal wobble across the travel axis
    ZigZag { phase: f32, angular_speed: f32 },
    /// Steers toward the last player snapshot
    Homing { strength: f32, target: Option<Rect> },
    /// Constant sideways drift
    Diagonal { bias: f32 },
}

impl Behavior {
    /// Fresh randomized state for a variant
    pub fn roll<R: Rng + ?Sized>(tag: EnemyTag, rng: &mut R) -> Self {
        match tag {
            EnemyTag::Basic => Behavior::Basic,
            EnemyTag::ZigZag => Behavior::ZigZag {
                phase: 0.0,
                angular_speed: rng.random_range(ZIGZAG_MIN_ANGULAR_SPEED..=ZIGZAG_MAX_ANGULAR_SPEED),
            },
            EnemyTag::Homing => Behavior::Homing {
                strength: rng.random_range(HOMING_MIN_STRENGTH..=HOMING_MAX_STRENGTH),
                target: None,
            },
            EnemyTag::Diagonal => Behavior::Diagonal {
                bias: if rng.random_bool(0.5) { 1.0 } else { -1.0 },
            },
        }
    }

    pub fn tag(&self) -> EnemyTag {
        match self {
            Behavior::Basic => EnemyTag::Basic,
            Behavior::ZigZag { .. } => EnemyTag::ZigZag,
            Behavior::Homing { .. } => EnemyTag::Homing,
            Behavior::Diagonal { .. } => EnemyTag::Diagonal,
        }
    }
}

/// What happened to an enemy during one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Motion {
    /// Still on (or entering) the field
    Moved,
    /// Left the field and was placed on a fresh edge
    Respawned,
}

/// An enemy square
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Enemy {
    pub rect: Rect,
    /// Scalar speed in units per tick
    pub speed: f32,
    pub edge: SpawnEdge,
    pub behavior: Behavior,
}

impl Enemy {
    /// Spawn a new enemy of the given variant on a random edge
    pub fn spawn<R: Rng + ?Sized>(tag: EnemyTag, field: Field, rng: &mut R) -> Self {
        let (rect, edge) = spawn_at(field, ENEMY_SIZE, ENEMY_SIZE, rng);
        let speed = roll_speed(rng);
        let behavior = Behavior::roll(tag, rng);
        Self {
            rect,
            speed,
            edge,
            behavior,
        }
    }

    pub fn tag(&self) -> EnemyTag {
        self.behavior.tag()
    }

    /// Refresh the player snapshot used by homing enemies; no-op for others
    pub fn set_target(&mut self, player: Rect) {
        if let Behavior::Homing { target, .. } = &mut self.behavior {
            *target = Some(player);
        }
    }

    /// Displacement for this tick. Advances the zig-zag phase.
    pub fn displacement(&mut self) -> Vec2 {
        let dir = self.edge.direction();
        let base = dir * self.speed;

        match &mut self.behavior {
            Behavior::Basic => base,
            Behavior::ZigZag {
                phase,
                angular_speed,
            } => {
                *phase += *angular_speed;
                base + self.edge.lateral() * phase.sin() * ZIGZAG_AMPLITUDE
            }
            Behavior::Homing { strength, target } => match target {
                Some(player) => {
                    let to_player = player.center() - self.rect.center();
                    let distance = to_player.length().max(HOMING_MIN_DISTANCE);
                    base + (to_player / distance) * self.speed * *strength
                }
                None => base,
            },
            Behavior::Diagonal { bias } => base + self.edge.lateral() * *bias * DIAGONAL_BIAS,
        }
    }

    /// Advance one tick; respawn in the same step if the enemy left the field
    pub fn tick<R: Rng + ?Sized>(&mut self, field: Field, rng: &mut R) -> Motion {
        let delta = self.displacement();
        self.rect = self.rect.translated(delta);

        if is_off_screen(&self.rect, self.edge, field) {
            self.reset(field, rng);
            Motion::Respawned
        } else {
            Motion::Moved
        }
    }

    /// Move to a fresh edge with a new speed and re-rolled variant state.
    ///
    /// A homing enemy keeps its player snapshot; the round controller
    /// refreshes it before the next move anyway.
    pub fn reset<R: Rng + ?Sized>(&mut self, field: Field, rng: &mut R) {
        let (rect, edge) = spawn_at(field, self.rect.w, self.rect.h, rng);
        self.rect = rect;
        self.edge = edge;
        self.speed = roll_speed(rng);

        let target = match &self.behavior {
            Behavior::Homing { target, .. } => *target,
            _ => None,
        };
        self.behavior = Behavior::roll(self.tag(), rng);
        if let Some(player) = target {
            self.set_target(player);
        }
    }

    /// Difficulty increment applied once per level-up
    pub fn apply_level_up(&mut self) {
        self.speed += LEVEL_SPEED_BONUS;
        match &mut self.behavior {
            Behavior::ZigZag { angular_speed, .. } => *angular_speed += LEVEL_ZIGZAG_BONUS,
            Behavior::Homing { strength, .. } => {
                *strength = (*strength + LEVEL_HOMING_BONUS).min(HOMING_STRENGTH_CAP);
            }
            Behavior::Basic | Behavior::Diagonal { .. } => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn field() -> Field {
        Field::new(500.0, 500.0)
    }

    fn enemy(edge: SpawnEdge, rect: Rect, speed: f32, behavior: Behavior) -> Enemy {
        Enemy {
            rect,
            speed,
            edge,
            behavior,
        }
    }

    #[test]
    fn test_base_direction() {
        assert_eq!(base_direction(SpawnEdge::Top), Vec2::new(0.0, 1.0));
        assert_eq!(base_direction(SpawnEdge::Bottom), Vec2::new(0.0, -1.0));
        assert_eq!(base_direction(SpawnEdge::Left), Vec2::new(1.0, 0.0));
        assert_eq!(base_direction(SpawnEdge::Right), Vec2::new(-1.0, 0.0));
    }

    #[test]
    fn test_spawn_positions_just_outside_field() {
        let mut rng = Pcg32::seed_from_u64(7);
        for _ in 0..200 {
            let (rect, edge) = spawn_at(field(), 30.0, 30.0, &mut rng);
            match edge {
                SpawnEdge::Top => {
                    assert_eq!(rect.y, -30.0);
                    assert!((0.0..=470.0).contains(&rect.x));
                }
                SpawnEdge::Bottom => {
                    assert_eq!(rect.y, 500.0);
                    assert!((0.0..=470.0).contains(&rect.x));
                }
                SpawnEdge::Left => {
                    assert_eq!(rect.x, -30.0);
                    assert!((0.0..=470.0).contains(&rect.y));
                }
                SpawnEdge::Right => {
                    assert_eq!(rect.x, 500.0);
                    assert!((0.0..=470.0).contains(&rect.y));
                }
            }
            assert_eq!(rect.x.fract(), 0.0);
            assert_eq!(rect.y.fract(), 0.0);
            assert!(!is_off_screen(&rect, edge, field()));
        }
    }

    #[test]
    fn test_spawn_covers_every_edge() {
        let mut rng = Pcg32::seed_from_u64(99);
        let mut seen = std::collections::HashSet::new();
        for _ in 0..200 {
            seen.insert(spawn_at(field(), 30.0, 30.0, &mut rng).1);
        }
        assert_eq!(seen.len(), 4);
    }

    #[test]
    fn test_off_screen_thresholds() {
        let f = field();
        let r = |x, y| Rect::new(x, y, 30.0, 30.0);

        assert!(!is_off_screen(&r(100.0, 500.0), SpawnEdge::Top, f));
        assert!(is_off_screen(&r(100.0, 500.5), SpawnEdge::Top, f));

        assert!(!is_off_screen(&r(100.0, -30.0), SpawnEdge::Bottom, f));
        assert!(is_off_screen(&r(100.0, -30.5), SpawnEdge::Bottom, f));

        assert!(!is_off_screen(&r(500.0, 100.0), SpawnEdge::Left, f));
        assert!(is_off_screen(&r(500.5, 100.0), SpawnEdge::Left, f));

        assert!(!is_off_screen(&r(-30.0, 100.0), SpawnEdge::Right, f));
        assert!(is_off_screen(&r(-30.5, 100.0), SpawnEdge::Right, f));
    }

    #[test]
    fn test_basic_moves_along_edge_direction() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut e = enemy(SpawnEdge::Right, Rect::new(500.0, 100.0, 30.0, 30.0), 4.0, Behavior::Basic);
        assert_eq!(e.tick(field(), &mut rng), Motion::Moved);
        assert_eq!(e.rect, Rect::new(496.0, 100.0, 30.0, 30.0));
    }

    #[test]
    fn test_zigzag_oscillates_across_travel_axis() {
        let mut e = enemy(
            SpawnEdge::Top,
            Rect::new(100.0, 0.0, 30.0, 30.0),
            3.0,
            Behavior::ZigZag {
                phase: 0.0,
                angular_speed: 0.1,
            },
        );
        let d = e.displacement();
        assert!((d.y - 3.0).abs() < 1e-6);
        assert!((d.x - 0.1_f32.sin() * 3.0).abs() < 1e-6);

        let d2 = e.displacement();
        assert!((d2.x - 0.2_f32.sin() * 3.0).abs() < 1e-6);

        let mut side = enemy(
            SpawnEdge::Left,
            Rect::new(0.0, 100.0, 30.0, 30.0),
            3.0,
            Behavior::ZigZag {
                phase: 0.0,
                angular_speed: 0.1,
            },
        );
        let d = side.displacement();
        assert!((d.x - 3.0).abs() < 1e-6);
        assert!((d.y - 0.1_f32.sin() * 3.0).abs() < 1e-6);
    }

    #[test]
    fn test_diagonal_bias() {
        let mut e = enemy(
            SpawnEdge::Bottom,
            Rect::new(100.0, 400.0, 30.0, 30.0),
            5.0,
            Behavior::Diagonal { bias: -1.0 },
        );
        assert_eq!(e.displacement(), Vec2::new(-2.0, -5.0));

        let mut e = enemy(
            SpawnEdge::Right,
            Rect::new(400.0, 100.0, 30.0, 30.0),
            5.0,
            Behavior::Diagonal { bias: 1.0 },
        );
        assert_eq!(e.displacement(), Vec2::new(-5.0, 2.0));
    }

    #[test]
    fn test_homing_steers_toward_player() {
        let mut e = enemy(
            SpawnEdge::Top,
            Rect::new(0.0, 0.0, 30.0, 30.0),
            4.0,
            Behavior::Homing {
                strength: 0.05,
                target: None,
            },
        );
        // No snapshot yet: plain base movement
        assert_eq!(e.displacement(), Vec2::new(0.0, 4.0));

        // Player center is directly to the right of the enemy center
        e.set_target(Rect::new(95.0, 0.0, 40.0, 40.0).translated(Vec2::new(0.0, -5.0)));
        let d = e.displacement();
        assert!((d.x - 4.0 * 0.05).abs() < 1e-5);
        assert!((d.y - 4.0).abs() < 1e-5);
    }

    #[test]
    fn test_homing_zero_distance_is_finite() {
        let rect = Rect::new(200.0, 200.0, 30.0, 30.0);
        let mut e = enemy(
            SpawnEdge::Left,
            rect,
            6.0,
            Behavior::Homing {
                strength: 0.07,
                target: Some(rect),
            },
        );
        let d = e.displacement();
        assert!(d.is_finite());
        assert_eq!(d, Vec2::new(6.0, 0.0));
    }

    #[test]
    fn test_set_target_ignored_by_non_homing() {
        let mut e = enemy(SpawnEdge::Top, Rect::new(0.0, 0.0, 30.0, 30.0), 3.0, Behavior::Basic);
        e.set_target(Rect::new(10.0, 10.0, 40.0, 40.0));
        assert_eq!(e.behavior, Behavior::Basic);
    }

    #[test]
    fn test_exit_triggers_respawn_in_same_tick() {
        let mut rng = Pcg32::seed_from_u64(3);
        let mut e = enemy(
            SpawnEdge::Top,
            Rect::new(100.0, 498.0, 30.0, 30.0),
            5.0,
            Behavior::ZigZag {
                phase: 1.0,
                angular_speed: 0.1,
            },
        );
        assert_eq!(e.tick(field(), &mut rng), Motion::Respawned);
        assert!(!is_off_screen(&e.rect, e.edge, field()));
        assert!((3.0..=6.0).contains(&e.speed));
        match e.behavior {
            Behavior::ZigZag {
                phase,
                angular_speed,
            } => {
                assert_eq!(phase, 0.0);
                assert!((0.05..=0.1).contains(&angular_speed));
            }
            ref other => panic!("variant changed on reset: {other:?}"),
        }
    }

    #[test]
    fn test_reset_rerolls_homing_strength_and_keeps_target() {
        let mut rng = Pcg32::seed_from_u64(11);
        let player = Rect::new(230.0, 230.0, 40.0, 40.0);
        let mut e = enemy(
            SpawnEdge::Left,
            Rect::new(100.0, 100.0, 30.0, 30.0),
            6.2,
            Behavior::Homing {
                strength: 0.1,
                target: Some(player),
            },
        );
        e.reset(field(), &mut rng);
        match e.behavior {
            Behavior::Homing { strength, target } => {
                assert!((0.03..=0.07).contains(&strength));
                assert_eq!(target, Some(player));
            }
            ref other => panic!("variant changed on reset: {other:?}"),
        }
        assert_eq!(e.speed.fract(), 0.0);
    }

    #[test]
    fn test_level_up_scaling() {
        let mut zig = enemy(
            SpawnEdge::Top,
            Rect::new(0.0, 0.0, 30.0, 30.0),
            3.0,
            Behavior::ZigZag {
                phase: 0.0,
                angular_speed: 0.05,
            },
        );
        zig.apply_level_up();
        assert!((zig.speed - 3.2).abs() < 1e-6);
        match zig.behavior {
            Behavior::ZigZag { angular_speed, .. } => assert!((angular_speed - 0.055).abs() < 1e-6),
            _ => unreachable!(),
        }

        let mut homing = enemy(
            SpawnEdge::Top,
            Rect::new(0.0, 0.0, 30.0, 30.0),
            3.0,
            Behavior::Homing {
                strength: 0.099,
                target: None,
            },
        );
        homing.apply_level_up();
        homing.apply_level_up();
        match homing.behavior {
            Behavior::Homing { strength, .. } => assert_eq!(strength, HOMING_STRENGTH_CAP),
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_tag_parse_falls_back_to_basic() {
        assert_eq!(EnemyTag::parse("zigzag"), EnemyTag::ZigZag);
        assert_eq!(EnemyTag::parse(" Homing "), EnemyTag::Homing);
        assert_eq!(EnemyTag::parse("diagonal"), EnemyTag::Diagonal);
        assert_eq!(EnemyTag::parse("basic"), EnemyTag::Basic);
        assert_eq!(EnemyTag::parse("teleporter"), EnemyTag::Basic);
        assert_eq!(EnemyTag::parse(""), EnemyTag::Basic);
    }
}
