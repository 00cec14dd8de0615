//! Read-only listings for the admin panel.

use serde::Serialize;

use dex_core::{Creature, Move, SearchableMoves, Tier, VisibilityConfig};

/// Every creature, registered or not, whose name, id or primary type contains
/// `filter` (case-insensitive). An empty filter lists everything.
pub fn admin_list<'a>(creatures: &'a [Creature], filter: &str) -> Vec<&'a Creature> {
    let filter = filter.trim().to_lowercase();
    creatures
        .iter()
        .filter(|creature| {
            creature.name.to_lowercase().contains(&filter)
                || creature.id.to_string().contains(&filter)
                || creature.primary_type.to_lowercase().contains(&filter)
        })
        .collect()
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct RegistrationStats {
    pub registered: usize,
    pub unregistered: usize,
}

/// Counts over the loaded catalog. Ledger names with no matching record are
/// not counted.
pub fn registration_stats(config: &VisibilityConfig, creatures: &[Creature]) -> RegistrationStats {
    let registered = creatures
        .iter()
        .filter(|creature| config.is_registered(&creature.name))
        .count();
    RegistrationStats {
        registered,
        unregistered: creatures.len() - registered,
    }
}

/// One row of the per-creature move editor.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveEditEntry {
    pub name: String,
    pub tier: Tier,
    pub level: u8,
    /// Exposed by the level cap alone.
    pub within_level: bool,
    /// On the creature's manual whitelist.
    pub manually_added: bool,
}

pub fn move_edit_list(config: &VisibilityConfig, creature: &Creature) -> Vec<MoveEditEntry> {
    let profile = config.resolve(&creature.name);
    creature
        .moves
        .entries()
        .map(|(tier, name)| MoveEditEntry {
            name: name.to_string(),
            tier,
            level: tier.level(),
            within_level: tier.level() <= profile.moves_max_level(),
            manually_added: profile.is_extra_visible(name),
        })
        .collect()
}

/// One row of the searchable-move editor.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchableMoveEntry {
    pub name: String,
    pub move_type: String,
    /// Some registered creature already exposes the move.
    pub via_creature: bool,
    /// On the global whitelist.
    pub extra: bool,
}

impl SearchableMoveEntry {
    pub fn is_searchable(&self) -> bool {
        self.via_creature || self.extra
    }
}

/// Catalog moves whose name or type contains `filter`, with how each one is
/// reachable by move search.
pub fn searchable_admin_list(
    config: &VisibilityConfig,
    catalog: &[Move],
    index: &SearchableMoves,
    filter: &str,
) -> Vec<SearchableMoveEntry> {
    let filter = filter.trim().to_lowercase();
    catalog
        .iter()
        .filter(|m| m.matches_term(&filter))
        .map(|m| SearchableMoveEntry {
            name: m.name.clone(),
            move_type: m.move_type.clone(),
            via_creature: index.via_creature(&m.name),
            extra: config.is_extra_searchable(&m.name),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{creature, move_record};
    use dex_core::{VisibilityField, searchable_moves};

    #[test]
    fn test_admin_list_filters_on_name_id_and_type() {
        let creatures = vec![
            creature(4, "Emberfox", "Fire", [None; 6]),
            creature(14, "Tidepup", "Water", [None; 6]),
        ];
        assert_eq!(admin_list(&creatures, "").len(), 2);
        assert_eq!(admin_list(&creatures, "4").len(), 2);
        assert_eq!(admin_list(&creatures, "WAT")[0].name, "Tidepup");
        assert_eq!(admin_list(&creatures, "ember")[0].id, 4);
    }

    #[test]
    fn test_registration_stats_over_catalog() {
        let creatures = vec![
            creature(1, "A", "Fire", [None; 6]),
            creature(2, "B", "Fire", [None; 6]),
            creature(3, "C", "Fire", [None; 6]),
        ];
        let mut config = VisibilityConfig::default();
        config.register_all(["A", "Ghost"]);
        assert_eq!(
            registration_stats(&config, &creatures),
            RegistrationStats {
                registered: 1,
                unregistered: 2
            }
        );
    }

    #[test]
    fn test_move_edit_list_flags() {
        let ember = creature(
            4,
            "Emberfox",
            "Fire",
            [Some("Scratch"), None, Some("Flame Burst, Smog"), None, None, None],
        );
        let mut config = VisibilityConfig::default();
        config.register("Emberfox");
        config.override_mut("Emberfox").set_extra_visible("smog", true);

        let entries = move_edit_list(&config, &ember);
        assert_eq!(entries.len(), 3);
        assert!(entries[0].within_level && !entries[0].manually_added);
        assert_eq!(entries[1].level, 6);
        assert!(!entries[1].within_level && !entries[1].manually_added);
        assert!(entries[2].manually_added);
    }

    #[test]
    fn test_searchable_admin_list_sources() {
        let creatures = vec![creature(
            4,
            "Emberfox",
            "Fire",
            [Some("Ember"), None, None, None, None, None],
        )];
        let catalog = vec![
            move_record("Ember", "Fire"),
            move_record("Fire Fang", "Fire"),
            move_record("Bubble", "Water"),
        ];
        let mut config = VisibilityConfig::default();
        config.register("Emberfox");
        config
            .override_mut("Emberfox")
            .set(VisibilityField::Moves, true);
        config.set_extra_searchable("Fire Fang", true);
        let index = searchable_moves(&config, &creatures);

        let entries = searchable_admin_list(&config, &catalog, &index, "fire");
        assert_eq!(entries.len(), 2);
        assert!(entries[0].via_creature && !entries[0].extra);
        assert!(!entries[1].via_creature && entries[1].extra);
        assert!(entries.iter().all(SearchableMoveEntry::is_searchable));
        assert_eq!(searchable_admin_list(&config, &catalog, &index, "").len(), 3);
    }
}
