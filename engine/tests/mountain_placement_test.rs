//! Statistical and geometric properties of the mountain ring layout

use planet_engine::config::{MountainConfig, VisibilityRule};
use planet_engine::scene::{scatter_mountains, MountainSlot, Side};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::f32::consts::{FRAC_PI_2, PI};

fn large_layout(rule: VisibilityRule, seed: u64) -> Vec<MountainSlot> {
    let config = MountainConfig {
        pair_count: 30_000,
        visibility_rule: rule,
        ..Default::default()
    };
    scatter_mountains(&config, &mut ChaCha8Rng::seed_from_u64(seed))
}

fn fraction(slots: &[MountainSlot], predicate: impl Fn(&MountainSlot) -> bool) -> f64 {
    slots.iter().filter(|slot| predicate(slot)).count() as f64 / slots.len() as f64
}

#[test]
fn test_no_slot_is_ever_empty() {
    for seed in 0..20 {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let slots = scatter_mountains(&MountainConfig::default(), &mut rng);
        for slot in &slots {
            assert!(
                slot.left.visible || slot.right.visible,
                "slot {} is empty with seed {seed}",
                slot.index
            );
        }
    }
}

#[test]
fn test_biased_rule_frequencies() {
    let slots = large_layout(VisibilityRule::Biased, 11);

    // both_visible roll: 1/3
    let both_rolled = fraction(&slots, |s| s.both_visible);
    assert!((both_rolled - 1.0 / 3.0).abs() < 0.02, "both_visible rate {both_rolled}");
    assert!(slots
        .iter()
        .filter(|s| s.both_visible)
        .all(|s| s.visible_count() == 2));

    // 1/3 + 2/3 * 1/2 * 1/2
    let both_shown = fraction(&slots, |s| s.visible_count() == 2);
    assert!((both_shown - 0.5).abs() < 0.02, "two-panel rate {both_shown}");

    // left lost its coin: 2/3 * 1/2
    let right_only = fraction(&slots, |s| !s.left.visible && s.right.visible);
    assert!((right_only - 1.0 / 3.0).abs() < 0.02, "right-only rate {right_only}");

    // left won, right lost: 2/3 * 1/2 * 1/2
    let left_only = fraction(&slots, |s| s.left.visible && !s.right.visible);
    assert!((left_only - 1.0 / 6.0).abs() < 0.02, "left-only rate {left_only}");
}

#[test]
fn test_exclusive_rule_frequencies() {
    let slots = large_layout(VisibilityRule::Exclusive, 12);

    let both_shown = fraction(&slots, |s| s.visible_count() == 2);
    assert!((both_shown - 1.0 / 3.0).abs() < 0.02, "two-panel rate {both_shown}");

    let left_only = fraction(&slots, |s| s.left.visible && !s.right.visible);
    assert!((left_only - 1.0 / 3.0).abs() < 0.02, "left-only rate {left_only}");
}

#[test]
fn test_slots_are_evenly_spaced() {
    let config = MountainConfig::default();
    let slots = scatter_mountains(&config, &mut ChaCha8Rng::seed_from_u64(3));

    for (i, slot) in slots.iter().enumerate() {
        assert_eq!(slot.index as usize, i);
        assert!((slot.angle - i as f32 * PI / 4.0).abs() < 1e-5);
    }
}

#[test]
fn test_panel_positions_lie_on_the_ring() {
    let config = MountainConfig::default();
    let slots = scatter_mountains(&config, &mut ChaCha8Rng::seed_from_u64(4));

    for slot in &slots {
        for side in [Side::Left, Side::Right] {
            let panel = slot.panel(side);
            assert!((panel.position.x - side.sign() * 0.4).abs() < 1e-6);
            assert!((panel.position.y - slot.angle.cos() * 2.0).abs() < 1e-5);
            assert!((panel.position.z - slot.angle.sin() * 2.0).abs() < 1e-5);

            let radius = (panel.position.y.powi(2) + panel.position.z.powi(2)).sqrt();
            assert!((radius - 2.0).abs() < 1e-5);
        }
    }
}

#[test]
fn test_panels_face_outward_with_random_twist() {
    let slots = large_layout(VisibilityRule::Biased, 5);

    let mut twists = Vec::new();
    for slot in &slots {
        for panel in slot.panels() {
            assert!((panel.rotation.x - (slot.angle - FRAC_PI_2)).abs() < 1e-4);
            assert!((0.0..=FRAC_PI_2).contains(&panel.rotation.z));
            twists.push(panel.rotation.z);
        }
    }

    // Uniform on [0, pi/2)
    let mean = twists.iter().sum::<f32>() / twists.len() as f32;
    assert!((mean - PI / 4.0).abs() < 0.02, "mean twist {mean}");
}

#[test]
fn test_custom_ring() {
    let config = MountainConfig {
        pair_count: 3,
        radius: 5.0,
        lateral_offset: 1.0,
        ..Default::default()
    };
    let slots = scatter_mountains(&config, &mut ChaCha8Rng::seed_from_u64(6));

    assert_eq!(slots.len(), 3);
    assert!((slots[1].angle - 2.0 * PI / 3.0).abs() < 1e-5);
    assert!((slots[0].right.position.y - 5.0).abs() < 1e-5);
    assert_eq!(slots[0].left.position.x, -1.0);
}
