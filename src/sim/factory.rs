//! Enemy construction and level-weighted variant selection

use rand::Rng;
use rand::distr::Distribution;
use rand::distr::weighted::WeightedIndex;

use super::enemy::{Enemy, EnemyTag};
use super::rect::{Field, Rect};

/// Build an enemy of the given variant on a random edge.
///
/// Homing enemies start with `player` as their target snapshot.
pub fn create<R: Rng + ?Sized>(tag: EnemyTag, field: Field, player: Option<Rect>, rng: &mut R) -> Enemy {
    let mut enemy = Enemy::spawn(tag, field, rng);
    if let Some(player) = player {
        enemy.set_target(player);
    }
    enemy
}

/// Relative selection weight of each variant at `level`.
///
/// Basic enemies fade toward a floor of 0.5 while the others grow to their caps.
pub fn variant_weights(level: u32) -> [(EnemyTag, f32); 4] {
    let level = level as f32;
    [
        (EnemyTag::Basic, (1.0 - level * 0.1).max(0.5)),
        (EnemyTag::ZigZag, (0.1 + level * 0.05).min(0.3)),
        (EnemyTag::Homing, (0.05 + level * 0.03).min(0.2)),
        (EnemyTag::Diagonal, (0.08 + level * 0.04).min(0.25)),
    ]
}

/// Weighted random variant for an enemy spawned at `level`
pub fn choose_variant<R: Rng + ?Sized>(level: u32, rng: &mut R) -> EnemyTag {
    let weights = variant_weights(level);
    match WeightedIndex::new(weights.iter().map(|(_, w)| *w)) {
        Ok(dist) => weights[dist.sample(rng)].0,
        Err(e) => {
            log::warn!("Invalid variant weights at level {}: {}", level, e);
            EnemyTag::Basic
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::enemy::Behavior;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    /// Share of the total weight that belongs to `tag` at `level`
    fn variant_probability(tag: EnemyTag, level: u32) -> f32 {
        let weights = variant_weights(level);
        let total: f32 = weights.iter().map(|(_, w)| w).sum();
        weights
            .iter()
            .find(|(t, _)| *t == tag)
            .map(|(_, w)| w / total)
            .unwrap_or(0.0)
    }

    #[test]
    fn test_create_each_variant() {
        let mut rng = Pcg32::seed_from_u64(5);
        let field = Field::new(500.0, 500.0);
        for tag in EnemyTag::ALL {
            let enemy = create(tag, field, None, &mut rng);
            assert_eq!(enemy.tag(), tag);
        }
    }

    #[test]
    fn test_create_homing_gets_player_snapshot() {
        let mut rng = Pcg32::seed_from_u64(5);
        let player = Rect::new(230.0, 230.0, 40.0, 40.0);
        let enemy = create(EnemyTag::Homing, Field::new(500.0, 500.0), Some(player), &mut rng);
        match enemy.behavior {
            Behavior::Homing { target, .. } => assert_eq!(target, Some(player)),
            other => panic!("expected homing, got {other:?}"),
        }
    }

    #[test]
    fn test_weights_at_level_one() {
        let w = variant_weights(1);
        assert!((w[0].1 - 0.9).abs() < 1e-6);
        assert!((w[1].1 - 0.15).abs() < 1e-6);
        assert!((w[2].1 - 0.08).abs() < 1e-6);
        assert!((w[3].1 - 0.12).abs() < 1e-6);
    }

    #[test]
    fn test_weights_clamp_at_high_levels() {
        let w = variant_weights(50);
        assert_eq!(w[0].1, 0.5);
        assert_eq!(w[1].1, 0.3);
        assert_eq!(w[2].1, 0.2);
        assert_eq!(w[3].1, 0.25);
    }

    #[test]
    fn test_basic_less_likely_as_level_rises() {
        let p1 = variant_probability(EnemyTag::Basic, 1);
        let p10 = variant_probability(EnemyTag::Basic, 10);
        assert!(p1 > p10);
        for tag in [EnemyTag::ZigZag, EnemyTag::Homing, EnemyTag::Diagonal] {
            assert!(variant_probability(tag, 10) > variant_probability(tag, 1));
        }
    }

    #[test]
    fn test_choose_variant_sampling_tracks_weights() {
        let mut rng = Pcg32::seed_from_u64(2024);
        let samples = 20_000;
        let basic_at = |level: u32, rng: &mut Pcg32| {
            (0..samples)
                .filter(|_| choose_variant(level, rng) == EnemyTag::Basic)
                .count()
        };
        let low = basic_at(1, &mut rng);
        let high = basic_at(10, &mut rng);
        assert!(low > high, "basic at level 1 ({low}) should beat level 10 ({high})");

        let expected = variant_probability(EnemyTag::Basic, 1) * samples as f32;
        assert!((low as f32 - expected).abs() < samples as f32 * 0.03);
    }
}
