//! Mountain ring layout
//!
//! Slots sit evenly on a circle in the YZ plane. Each slot holds a left and
//! a right panel offset along X; a biased coin decides which of the two are
//! shown so that no slot is ever empty.

use crate::config::{MountainConfig, VisibilityRule};
use glam::Vec3;
use rand::Rng;
use std::f32::consts::{FRAC_PI_2, PI};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    /// Sign of the panel's X offset
    pub fn sign(self) -> f32 {
        match self {
            Side::Left => -1.0,
            Side::Right => 1.0,
        }
    }
}

/// One decorative panel
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MountainPanel {
    pub side: Side,
    pub position: Vec3,
    /// XYZ euler angles, radians
    pub rotation: Vec3,
    pub visible: bool,
}

/// A left/right pair at one angle of the ring
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MountainSlot {
    pub index: u32,
    pub angle: f32,
    pub both_visible: bool,
    pub left: MountainPanel,
    pub right: MountainPanel,
}

impl MountainSlot {
    pub fn panels(&self) -> [&MountainPanel; 2] {
        [&self.left, &self.right]
    }

    pub fn panel(&self, side: Side) -> &MountainPanel {
        match side {
            Side::Left => &self.left,
            Side::Right => &self.right,
        }
    }

    pub fn visible_count(&self) -> usize {
        self.panels().iter().filter(|p| p.visible).count()
    }
}

fn coin(rng: &mut impl Rng, probability: f64) -> bool {
    rng.random::<f64>() < probability
}

fn place_panel(
    config: &MountainConfig,
    angle: f32,
    side: Side,
    rng: &mut impl Rng,
) -> MountainPanel {
    let position = Vec3::new(
        side.sign() * config.lateral_offset,
        angle.cos() * config.radius,
        angle.sin() * config.radius,
    );
    let twist = rng.random::<f32>() * PI / 2.0;

    MountainPanel {
        side,
        position,
        rotation: Vec3::new(angle - FRAC_PI_2, 0.0, twist),
        visible: true,
    }
}

/// Lay out `config.pair_count` slots around the ring
///
/// Per slot the draws happen in this order: the `both_visible` roll, the
/// left panel's twist, the left coin, the right panel's twist, the right
/// coin. Coins whose outcome is already decided are not drawn.
pub fn scatter_mountains(config: &MountainConfig, rng: &mut impl Rng) -> Vec<MountainSlot> {
    let increment = config.angle_increment();

    let slots: Vec<MountainSlot> = (0..config.pair_count)
        .map(|index| {
            let angle = increment * index as f32;
            let both_visible = coin(rng, config.both_visible_probability);

            let mut left = place_panel(config, angle, Side::Left, rng);
            left.visible = both_visible || coin(rng, config.side_probability);

            let mut right = place_panel(config, angle, Side::Right, rng);
            right.visible = match config.visibility_rule {
                VisibilityRule::Biased => {
                    !left.visible || both_visible || coin(rng, config.side_probability)
                }
                VisibilityRule::Exclusive => both_visible || !left.visible,
            };

            MountainSlot {
                index,
                angle,
                both_visible,
                left,
                right,
            }
        })
        .collect();

    debug!(
        slots = slots.len(),
        visible = slots.iter().map(MountainSlot::visible_count).sum::<usize>(),
        rule = ?config.visibility_rule,
        "Scattered mountains"
    );
    slots
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_slot_count_and_sides() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let slots = scatter_mountains(&MountainConfig::default(), &mut rng);
        assert_eq!(slots.len(), 8);
        for slot in &slots {
            assert_eq!(slot.left.side, Side::Left);
            assert_eq!(slot.right.side, Side::Right);
            assert_eq!(slot.left.position.x, -0.4);
            assert_eq!(slot.right.position.x, 0.4);
        }
    }

    #[test]
    fn test_orientation() {
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        for slot in scatter_mountains(&MountainConfig::default(), &mut rng) {
            for panel in slot.panels() {
                assert!((panel.rotation.x - (slot.angle - FRAC_PI_2)).abs() < 1e-6);
                assert_eq!(panel.rotation.y, 0.0);
                assert!((0.0..=FRAC_PI_2).contains(&panel.rotation.z));
            }
        }
    }

    #[test]
    fn test_certain_both_visible() {
        let config = MountainConfig {
            both_visible_probability: 1.0,
            ..Default::default()
        };
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        for slot in scatter_mountains(&config, &mut rng) {
            assert!(slot.both_visible);
            assert_eq!(slot.visible_count(), 2);
        }
    }

    #[test]
    fn test_left_hidden_forces_right() {
        // Never both, never left: every slot shows exactly its right panel
        let config = MountainConfig {
            both_visible_probability: 0.0,
            side_probability: 0.0,
            ..Default::default()
        };
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        for slot in scatter_mountains(&config, &mut rng) {
            assert!(!slot.left.visible);
            assert!(slot.right.visible);
        }
    }

    #[test]
    fn test_exclusive_rule_shows_one_unless_both() {
        let config = MountainConfig {
            visibility_rule: VisibilityRule::Exclusive,
            pair_count: 256,
            ..Default::default()
        };
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        for slot in scatter_mountains(&config, &mut rng) {
            let expected = if slot.both_visible { 2 } else { 1 };
            assert_eq!(slot.visible_count(), expected);
        }
    }

    #[test]
    fn test_same_seed_same_layout() {
        let config = MountainConfig::default();
        let a = scatter_mountains(&config, &mut ChaCha8Rng::seed_from_u64(42));
        let b = scatter_mountains(&config, &mut ChaCha8Rng::seed_from_u64(42));
        assert_eq!(a, b);
    }
}
