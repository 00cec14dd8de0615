//! Visibility resolution and the derived searchable-move index.
//!
//! Everything here is a pure function of the current configuration; callers
//! recompute instead of patching whenever the configuration changes.

use std::collections::BTreeSet;

use crate::config::VisibilityConfig;
use crate::creature::Creature;
use crate::visibility::{VisibilityField, VisibilityProfile};

impl VisibilityConfig {
    /// Effective profile for `name`: its override, or a copy of the defaults.
    pub fn resolve(&self, name: &str) -> VisibilityProfile {
        self.override_for(name)
            .cloned()
            .unwrap_or_else(|| self.defaults.clone())
    }
}

/// Ordered union of the creature's tiers up to `min(level, resolved movesMaxLevel)`.
pub fn moves_up_to_level(config: &VisibilityConfig, creature: &Creature, level: u8) -> Vec<String> {
    let profile = config.resolve(&creature.name);
    creature
        .moves
        .up_to_level(level.min(profile.moves_max_level()))
}

/// Moves a registered creature exposes under its profile, in tier order.
///
/// Empty when the creature's moves are hidden.
pub fn exposed_moves(profile: &VisibilityProfile, creature: &Creature) -> Vec<String> {
    if !profile.get(VisibilityField::Moves) {
        return Vec::new();
    }
    let mut moves = creature.moves.up_to_level(profile.moves_max_level());
    for extra in profile.extra_visible_moves() {
        if !moves.iter().any(|m| m.eq_ignore_ascii_case(extra)) {
            moves.push(extra.clone());
        }
    }
    moves
}

/// The set of move names reachable through free-text move search.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SearchableMoves {
    via_creatures: BTreeSet<String>,
    extras: Vec<String>,
}

impl SearchableMoves {
    /// Case-insensitive membership.
    pub fn contains(&self, name: &str) -> bool {
        self.via_creature(name) || self.extras.iter().any(|m| m.eq_ignore_ascii_case(name))
    }

    /// True if some registered creature exposes the move.
    pub fn via_creature(&self, name: &str) -> bool {
        self.via_creatures.contains(name)
            || self.via_creatures.iter().any(|m| m.eq_ignore_ascii_case(name))
    }

    /// Distinct names: creature-derived ones plus extras not already among them.
    pub fn len(&self) -> usize {
        self.via_creatures.len()
            + self
                .extras
                .iter()
                .filter(|extra| !self.via_creature(extra))
                .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.via_creatures.iter().map(String::as_str).chain(
            self.extras
                .iter()
                .filter(|extra| !self.via_creature(extra))
                .map(String::as_str),
        )
    }
}

/// Recomputes the searchable-move index from scratch.
pub fn searchable_moves(config: &VisibilityConfig, creatures: &[Creature]) -> SearchableMoves {
    let via_creatures = creatures
        .iter()
        .filter(|creature| config.is_registered(&creature.name))
        .flat_map(|creature| exposed_moves(&config.resolve(&creature.name), creature))
        .collect();

    SearchableMoves {
        via_creatures,
        extras: config.extra_searchable_moves().to_vec(),
    }
}
