//! Deterministic Annotation Placement
//!
//! Every annotation's position derives from a pseudo-random generator
//! seeded with a stable hash of the annotation id. The same id always
//! yields the same (zone, x, y, rotation), independent of processing
//! order, run time, or corpus size.
//!
//! The seed hash is std's `DefaultHasher` (SipHash-1-3 with fixed zero
//! keys). Snapshots depend on its layout; it must never change.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::model::annotation::{Position, Zone};
use crate::model::character::Character;
use crate::model::eras;

/// Stable 64-bit seed for an annotation id.
pub fn stable_seed(id: &str) -> u64 {
    let mut hasher = DefaultHasher::new();
    id.hash(&mut hasher);
    hasher.finish()
}

/// Zones a character prefers, in preference order. Unmapped characters
/// take a uniform draw over everything their era allows.
fn zone_preferences(character: Character) -> &'static [Zone] {
    match character {
        Character::Mb => &[Zone::RightMargin, Zone::TopMargin],
        Character::Jr => &[Zone::LeftMargin, Zone::BottomMargin],
        Character::Ew => &[Zone::RightMargin, Zone::Content],
        Character::Sw => &[Zone::LeftMargin, Zone::Content],
        Character::Sharma => &[Zone::TopMargin, Zone::BottomMargin],
        Character::Chambers => &[Zone::BottomMargin, Zone::RightMargin],
        Character::Unknown => &Zone::ALL,
    }
}

/// Rotation range in radians. Near-zero for precise hands, wide for
/// hurried or messy ones.
fn rotation_range(character: Character) -> (f64, f64) {
    match character {
        Character::Mb => (-0.05, 0.05),
        Character::Jr => (-0.15, 0.15),
        Character::Ew => (-0.02, 0.02),
        Character::Sw => (-0.1, 0.1),
        _ => (-0.1, 0.1),
    }
}

/// Generate the deterministic position for an annotation.
///
/// `index` is the annotation's rank among co-located annotations on its
/// page; `index % 3` staggers overlapping marks along the zone's
/// cross-axis so they fan out instead of stacking.
pub fn generate(id: &str, character: Character, year: Option<i32>, index: usize) -> Position {
    let mut rng = StdRng::seed_from_u64(stable_seed(id));

    let modern = year.is_some_and(|y| y >= eras::MODERN_YEAR);
    let allowed: &[Zone] = if modern { &Zone::ALL } else { &Zone::MARGINS };

    let preferred: Vec<Zone> = zone_preferences(character)
        .iter()
        .copied()
        .filter(|z| allowed.contains(z))
        .collect();
    let candidates: &[Zone] = if preferred.is_empty() { allowed } else { &preferred };

    // Draw order is part of the determinism contract: zone, then the free
    // coordinate, then rotation.
    let zone = *candidates.choose(&mut rng).unwrap_or(&Zone::LeftMargin);
    let stagger = (index % 3) as f64 * 0.02;

    let (x, y) = match zone {
        Zone::LeftMargin => (0.01 + stagger, rng.gen_range(0.1..0.8)),
        Zone::RightMargin => (0.85 + stagger, rng.gen_range(0.1..0.8)),
        Zone::TopMargin => (rng.gen_range(0.15..0.75), 0.01 + stagger),
        Zone::BottomMargin => (rng.gen_range(0.15..0.75), 0.85 + stagger),
        Zone::Content => (rng.gen_range(0.2..0.7), rng.gen_range(0.15..0.75)),
    };

    let (lo, hi) = rotation_range(character);
    let rotation = rng.gen_range(lo..hi);

    Position { zone, x, y, rotation }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_id_yields_identical_position() {
        for id in ["ann_001", "emb_3_MB", "a-very-long-annotation-identifier"] {
            let a = generate(id, Character::Mb, Some(1967), 0);
            let b = generate(id, Character::Mb, Some(1967), 0);
            assert_eq!(a.zone, b.zone);
            assert!(a.x == b.x && a.y == b.y && a.rotation == b.rotation);
        }
    }

    #[test]
    fn test_seed_is_independent_of_call_order() {
        let first = generate("ann_042", Character::Jr, Some(1986), 1);
        // Interleave unrelated generations; ann_042 must not care.
        for i in 0..50 {
            generate(&format!("noise_{i}"), Character::Sw, Some(2024), i);
        }
        let second = generate("ann_042", Character::Jr, Some(1986), 1);
        assert_eq!(first.zone, second.zone);
        assert!(first.x == second.x && first.y == second.y);
    }

    #[test]
    fn test_historical_years_never_reach_content_zone() {
        // EW prefers the content zone, but pre-modern years gate it out.
        for i in 0..200 {
            let pos = generate(&format!("ew_{i}"), Character::Ew, Some(1996), i);
            assert!(pos.zone.is_margin());
        }
        // Missing year is treated as historical.
        let pos = generate("undated", Character::Sw, None, 0);
        assert!(pos.zone.is_margin());
    }

    #[test]
    fn test_modern_years_may_use_content_zone() {
        let mut saw_content = false;
        for i in 0..200 {
            let pos = generate(&format!("sw_{i}"), Character::Sw, Some(2024), 0);
            if pos.zone == Zone::Content {
                saw_content = true;
            }
        }
        assert!(saw_content, "content zone never chosen across 200 modern draws");
    }

    #[test]
    fn test_coordinates_stay_in_unit_square() {
        for i in 0..300 {
            for character in Character::ALL {
                let pos = generate(&format!("{}_{i}", character.as_str()), character, Some(2024), i);
                assert!((0.0..=1.0).contains(&pos.x), "x out of range: {}", pos.x);
                assert!((0.0..=1.0).contains(&pos.y), "y out of range: {}", pos.y);
            }
        }
    }

    #[test]
    fn test_zone_respects_character_preference() {
        // MB's preferences are margins, so every draw lands in one of them.
        for i in 0..100 {
            let pos = generate(&format!("mb_{i}"), Character::Mb, Some(1967), 0);
            assert!(matches!(pos.zone, Zone::RightMargin | Zone::TopMargin));
        }
    }

    #[test]
    fn test_stagger_offsets_colocated_annotations() {
        // Same character and year, ids chosen so both land left-margin;
        // the index shifts x by 0.02 per step (mod 3).
        let a = generate("jr_stagger", Character::Jr, Some(1986), 0);
        let b = generate("jr_stagger", Character::Jr, Some(1986), 1);
        if a.zone == Zone::LeftMargin && b.zone == Zone::LeftMargin {
            assert!((b.x - a.x - 0.02).abs() < 1e-12);
        }
    }

    #[test]
    fn test_precise_hands_rotate_less() {
        for i in 0..100 {
            let ew = generate(&format!("r_{i}"), Character::Ew, Some(1996), 0);
            assert!(ew.rotation.abs() <= 0.02);
            let jr = generate(&format!("r_{i}"), Character::Jr, Some(1986), 0);
            assert!(jr.rotation.abs() <= 0.15);
        }
    }

    #[test]
    fn test_stable_seed_differs_across_ids() {
        assert_ne!(stable_seed("ann_001"), stable_seed("ann_002"));
        assert_eq!(stable_seed("ann_001"), stable_seed("ann_001"));
    }
}
