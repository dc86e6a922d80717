//! Revelation Lattice
//!
//! The static five-tier disclosure table. Visibility is cumulative: each
//! tier sees everything the one below it sees plus one new content
//! category, and the top tier hides nothing. The engine publishes unlock
//! conditions for a reader layer to interpret; it does not enforce
//! progression.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::model::annotation::RevealLevel;

/// Content categories the lattice gates. Annotations map onto these by
/// reveal level: tier k unlocks category k.
pub const CATEGORIES: [&str; 5] = [
    "academic_text",
    "family_annotations",
    "research_annotations",
    "modern_annotations",
    "redacted_content",
];

/// One tier of the disclosure lattice.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RevelationTier {
    pub level: u8,
    pub name: String,
    pub description: String,
    /// Categories visible at this tier; a superset of every lower tier's
    pub visible: Vec<String>,
    /// Categories still withheld; empty at the top tier
    pub hidden: Vec<String>,
}

/// The full ordered lattice plus its published unlock conditions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RevelationIndex {
    pub tiers: Vec<RevelationTier>,
    /// Content category -> human-readable gating rule, for a consuming
    /// reader/session layer
    pub unlock_conditions: IndexMap<String, String>,
}

impl RevelationIndex {
    /// Build the standard five-tier lattice.
    pub fn standard() -> Self {
        let descriptions = [
            "The original academic study, annotations withheld",
            "Margaret Blackthorn's family knowledge revealed",
            "The Reed and Winston research findings appear",
            "The current investigation and disappearances surface",
            "Full revelation, nothing withheld",
        ];

        let tiers = RevealLevel::ALL
            .iter()
            .enumerate()
            .map(|(i, level)| {
                let cut = i + 1;
                RevelationTier {
                    level: level.ordinal(),
                    name: level.name().to_string(),
                    description: descriptions[i].to_string(),
                    visible: CATEGORIES[..cut].iter().map(|c| c.to_string()).collect(),
                    hidden: CATEGORIES[cut..].iter().map(|c| c.to_string()).collect(),
                }
            })
            .collect();

        let mut unlock_conditions = IndexMap::new();
        unlock_conditions.insert(
            "family_annotations".to_string(),
            "Interact with three of Margaret's margin notes".to_string(),
        );
        unlock_conditions.insert(
            "research_annotations".to_string(),
            "Read James Reed's research methodology".to_string(),
        );
        unlock_conditions.insert(
            "modern_annotations".to_string(),
            "Discover the missing persons connection".to_string(),
        );
        unlock_conditions.insert(
            "redacted_content".to_string(),
            "Unlock every character timeline".to_string(),
        );

        let index = Self { tiers, unlock_conditions };
        debug_assert!(index.is_monotonic());
        index
    }

    /// Categories visible at a tier.
    pub fn visible_at(&self, level: RevealLevel) -> &[String] {
        &self.tiers[(level.ordinal() - 1) as usize].visible
    }

    /// Check the lattice invariant: visible(k) is a subset of visible(k+1)
    /// for every adjacent pair, and the top tier hides nothing.
    pub fn is_monotonic(&self) -> bool {
        let cumulative = self.tiers.windows(2).all(|pair| {
            pair[0].visible.iter().all(|c| pair[1].visible.contains(c))
        });
        let top_open = self.tiers.last().is_some_and(|t| t.hidden.is_empty());
        cumulative && top_open
    }
}

impl Default for RevelationIndex {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_lattice_has_five_tiers() {
        let index = RevelationIndex::standard();
        assert_eq!(index.tiers.len(), 5);
        for (i, tier) in index.tiers.iter().enumerate() {
            assert_eq!(tier.level as usize, i + 1);
        }
    }

    #[test]
    fn test_lattice_is_monotonic() {
        let index = RevelationIndex::standard();
        assert!(index.is_monotonic());
        for pair in index.tiers.windows(2) {
            for category in &pair[0].visible {
                assert!(pair[1].visible.contains(category));
            }
        }
    }

    #[test]
    fn test_top_tier_hides_nothing() {
        let index = RevelationIndex::standard();
        assert!(index.tiers[4].hidden.is_empty());
        assert_eq!(index.tiers[4].visible.len(), CATEGORIES.len());
    }

    #[test]
    fn test_base_tier_shows_only_academic_text() {
        let index = RevelationIndex::standard();
        assert_eq!(index.visible_at(RevealLevel::Academic), ["academic_text"]);
        assert_eq!(index.tiers[0].hidden.len(), CATEGORIES.len() - 1);
    }

    #[test]
    fn test_unlock_conditions_cover_every_gated_category() {
        let index = RevelationIndex::standard();
        // Everything except the always-visible base category is gated.
        for category in &CATEGORIES[1..] {
            assert!(
                index.unlock_conditions.contains_key(*category),
                "no unlock condition for {category}"
            );
        }
    }

    #[test]
    fn test_monotonicity_check_catches_violations() {
        let mut index = RevelationIndex::standard();
        index.tiers[2].visible.retain(|c| c != "academic_text");
        assert!(!index.is_monotonic());
    }
}
