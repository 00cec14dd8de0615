//! Registration ledger and per-creature override mutations.

use crate::config::VisibilityConfig;
use crate::visibility::{VisibilityProfile, contains_ignore_case, set_listed};

impl VisibilityConfig {
    pub fn is_registered(&self, name: &str) -> bool {
        contains_ignore_case(&self.registered, name)
    }

    /// Publishes `name` and snapshots the current defaults as its override.
    ///
    /// Returns false if it was already registered; nothing changes in that case.
    pub fn register(&mut self, name: &str) -> bool {
        let name = name.trim();
        if name.is_empty() || self.is_registered(name) {
            return false;
        }
        self.registered.push(name.to_string());
        self.visibility
            .insert(name.to_lowercase(), self.defaults.clone());
        true
    }

    /// Removes `name` from the ledger and drops its override.
    pub fn unregister(&mut self, name: &str) -> bool {
        let lowered = name.trim().to_lowercase();
        let before = self.registered.len();
        self.registered.retain(|n| n.to_lowercase() != lowered);
        if self.registered.len() == before {
            return false;
        }
        self.visibility.remove(&lowered);
        true
    }

    /// Registers every name, returning how many were newly registered.
    pub fn register_all<'a>(&mut self, names: impl IntoIterator<Item = &'a str>) -> usize {
        names.into_iter().filter(|name| self.register(name)).count()
    }

    /// Unregisters every name, returning how many were actually removed.
    pub fn unregister_all<'a>(&mut self, names: impl IntoIterator<Item = &'a str>) -> usize {
        names.into_iter().filter(|name| self.unregister(name)).count()
    }

    /// The override for `name`, created from the current defaults if absent.
    pub fn override_mut(&mut self, name: &str) -> &mut VisibilityProfile {
        let defaults = &self.defaults;
        self.visibility
            .entry(name.to_lowercase())
            .or_insert_with(|| defaults.clone())
    }

    /// Replaces the override for `name` wholesale.
    pub fn set_override(&mut self, name: &str, profile: VisibilityProfile) {
        self.visibility.insert(name.to_lowercase(), profile);
    }

    /// Lists or unlists a move on the global whitelist. Returns true if the list changed.
    pub fn set_extra_searchable(&mut self, name: &str, listed: bool) -> bool {
        set_listed(&mut self.extra_searchable_moves, name, listed)
    }

    pub fn is_extra_searchable(&self, name: &str) -> bool {
        contains_ignore_case(&self.extra_searchable_moves, name)
    }
}

#[cfg(test)]
mod tests {
    use crate::config::VisibilityConfig;
    use crate::visibility::VisibilityField;

    #[test]
    fn register_is_case_insensitive_and_idempotent() {
        let mut config = VisibilityConfig::default();
        assert!(config.register("Emberfox"));
        assert!(!config.register("EMBERFOX"));
        assert!(config.is_registered("emberfox"));
        assert_eq!(config.registered(), ["Emberfox"]);
    }

    #[test]
    fn register_snapshots_defaults() {
        let mut config = VisibilityConfig::default();
        config.register("Emberfox");
        config.defaults_mut().set(VisibilityField::StatAc, true);
        config.register("Pyrovix");

        assert!(!config.override_for("Emberfox").unwrap().get(VisibilityField::StatAc));
        assert!(config.override_for("Pyrovix").unwrap().get(VisibilityField::StatAc));
    }

    #[test]
    fn reregistering_resets_customization() {
        let mut config = VisibilityConfig::default();
        config.register("Emberfox");
        config
            .override_mut("Emberfox")
            .set(VisibilityField::Moves, true);

        assert!(config.unregister("emberfox"));
        assert!(config.override_for("Emberfox").is_none());
        assert!(config.register("Emberfox"));
        assert_eq!(config.override_for("Emberfox"), Some(config.defaults()));
    }

    #[test]
    fn bulk_operations_count_changes() {
        let mut config = VisibilityConfig::default();
        config.register("A");
        assert_eq!(config.register_all(["A", "B", "C"]), 2);
        assert_eq!(config.unregister_all(["b", "Z"]), 1);
        assert_eq!(config.registered(), ["A", "C"]);
    }

    #[test]
    fn repeated_extra_searchable_add_keeps_the_move() {
        let mut config = VisibilityConfig::default();
        assert!(config.set_extra_searchable("Hyper Beam", true));
        assert!(!config.set_extra_searchable("HYPER BEAM", true));
        assert!(config.is_extra_searchable("hyper beam"));
        assert_eq!(config.extra_searchable_moves(), ["Hyper Beam"]);

        assert!(config.set_extra_searchable("hyper beam", false));
        assert!(!config.set_extra_searchable("Hyper Beam", false));
        assert!(config.extra_searchable_moves().is_empty());
    }
}
