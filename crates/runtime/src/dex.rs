//! The loaded compendium session.
//!
//! [`Dex`] owns the catalog, the visibility config and everything derived from
//! them. Every config change goes through [`Dex::apply`], which persists the
//! config and recomputes facets and the searchable-move index in one step.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use dex_content::SheetDump;
use dex_core::{
    Creature, Move, SearchableMoves, VisibilityConfig, VisibilityProfile, moves_up_to_level,
    searchable_moves,
};
use tracing::{info, warn};

use crate::admin::{
    self, AdminGate, MoveEditEntry, Mutation, Outcome, RegistrationStats, SearchableMoveEntry,
    apply_mutation,
};
use crate::api::{Dataset, Result, RuntimeError};
use crate::config::RuntimeConfig;
use crate::fetch::Fetcher;
use crate::repository::{
    CacheKey, CacheStore, Clock, FileStorage, InMemoryStorage, StorageBackend, SystemClock,
};
use crate::search::{self, Facets, MoveSearch, SearchQuery, SearchResults};
use crate::source::{DataSource, HttpDataSource, HttpImageProbe, ImageProbe, StaticDataSource};
use crate::view::CardView;

pub struct Dex {
    settings: RuntimeConfig,
    fetcher: Fetcher,
    cache: CacheStore,
    gate: AdminGate,
    creatures: Vec<Creature>,
    moves: Vec<Move>,
    config: VisibilityConfig,
    facets: Facets,
    searchable: SearchableMoves,
}

impl Dex {
    pub fn builder() -> DexBuilder {
        DexBuilder::new()
    }

    pub fn creatures(&self) -> &[Creature] {
        &self.creatures
    }

    pub fn moves(&self) -> &[Move] {
        &self.moves
    }

    pub fn config(&self) -> &VisibilityConfig {
        &self.config
    }

    pub fn settings(&self) -> &RuntimeConfig {
        &self.settings
    }

    pub fn facets(&self) -> &Facets {
        &self.facets
    }

    pub fn searchable_moves(&self) -> &SearchableMoves {
        &self.searchable
    }

    pub fn splash_count(&self) -> u32 {
        self.config.splash_count()
    }

    /// Catalog record for `name`, registered or not.
    pub fn creature(&self, name: &str) -> Option<&Creature> {
        self.creatures.iter().find(|c| c.is_named(name.trim()))
    }

    fn known(&self, name: &str) -> Result<&Creature> {
        self.creature(name)
            .ok_or_else(|| RuntimeError::UnknownCreature(name.to_string()))
    }

    // ------------------------------------------------------------------
    // Reader operations
    // ------------------------------------------------------------------

    pub fn resolve(&self, name: &str) -> VisibilityProfile {
        self.config.resolve(name)
    }

    pub fn search(&self, query: &SearchQuery) -> SearchResults<'_> {
        search::search_creatures(&self.config, &self.creatures, query)
    }

    pub fn move_search(&self, term: &str, level: u8) -> MoveSearch<'_> {
        search::search_moves(
            &self.config,
            &self.creatures,
            &self.moves,
            &self.searchable,
            term,
            level,
        )
    }

    /// The gated card of a registered creature.
    pub fn card(&self, name: &str, level: Option<u8>) -> Result<CardView> {
        let creature = self.known(name)?;
        if !self.config.is_registered(&creature.name) {
            return Err(RuntimeError::NotRegistered(creature.name.clone()));
        }
        let profile = self.config.resolve(&creature.name);
        Ok(CardView::build(&profile, creature, &self.moves, level))
    }

    /// Every tier move up to `min(level, movesMaxLevel)`, ignoring the moves flag.
    pub fn moves_up_to_level(&self, name: &str, level: u8) -> Result<Vec<String>> {
        let creature = self.known(name)?;
        Ok(moves_up_to_level(&self.config, creature, level))
    }

    pub fn last_cache_time(&self) -> Option<DateTime<Utc>> {
        self.cache.last_cache_time()
    }

    // ------------------------------------------------------------------
    // Admin session
    // ------------------------------------------------------------------

    pub fn login(&mut self, secret: &str) -> Result<()> {
        self.gate.login(secret)
    }

    pub fn logout(&mut self) {
        self.gate.logout();
    }

    pub fn is_admin(&mut self) -> bool {
        self.gate.is_active()
    }

    // ------------------------------------------------------------------
    // Mutations
    // ------------------------------------------------------------------

    /// Applies an admin edit, then persists the config and recomputes facets
    /// and the searchable-move index.
    pub fn apply(&mut self, mutation: Mutation) -> Result<Outcome> {
        self.gate.require()?;

        let summary = mutation.to_string();
        let outcome = apply_mutation(&mut self.config, &self.creatures, mutation)?;
        self.persist_config();
        self.refresh_derived();

        info!("Applied admin edit: {} ({:?})", summary, outcome);
        Ok(outcome)
    }

    /// Validates `text` as a config document and replaces the whole config.
    /// A rejected document leaves everything untouched.
    pub fn import_config(&mut self, text: &str) -> Result<Outcome> {
        self.gate.require()?;
        let imported = dex_content::import(text)?;
        self.apply(Mutation::Replace(Box::new(imported)))
    }

    pub fn export_config(&self) -> Result<String> {
        self.config.to_pretty_json().map_err(RuntimeError::Export)
    }

    /// Drops every cached entry, the admin session included.
    pub fn clear_cache(&mut self) {
        self.cache.clear_all();
        self.gate.restore();
        info!("Cache cleared");
    }

    /// Re-fetches the config when `force` is set or the cached copy is older
    /// than the config window. The fetched config replaces local edits.
    pub async fn refresh_config(&mut self, force: bool) -> bool {
        if !force && self.cache.is_fresh(CacheKey::Config, self.settings.config_ttl) {
            return false;
        }
        self.config = self.fetcher.fetch_config().await;
        self.refresh_derived();
        true
    }

    fn persist_config(&self) {
        self.cache.set(CacheKey::Config, &self.config);
        self.cache.touch(CacheKey::Config);
    }

    fn refresh_derived(&mut self) {
        self.facets = Facets::collect(&self.config, &self.creatures);
        self.searchable = searchable_moves(&self.config, &self.creatures);
    }

    // ------------------------------------------------------------------
    // Admin listings
    // ------------------------------------------------------------------

    pub fn admin_list(&self, filter: &str) -> Vec<&Creature> {
        admin::admin_list(&self.creatures, filter)
    }

    pub fn registration_stats(&self) -> RegistrationStats {
        admin::registration_stats(&self.config, &self.creatures)
    }

    pub fn move_edit_list(&self, name: &str) -> Result<Vec<MoveEditEntry>> {
        let creature = self.known(name)?;
        Ok(admin::move_edit_list(&self.config, creature))
    }

    pub fn searchable_admin_list(&self, filter: &str) -> Vec<SearchableMoveEntry> {
        admin::searchable_admin_list(&self.config, &self.moves, &self.searchable, filter)
    }

    /// Creature-derived searchable moves plus extras not already among them.
    pub fn searchable_count(&self) -> usize {
        self.searchable.len()
    }
}

/// Builder for [`Dex`]. Anything not set falls back to what the settings
/// describe.
pub struct DexBuilder {
    settings: RuntimeConfig,
    source: Option<Arc<dyn DataSource>>,
    probe: Option<Arc<dyn ImageProbe>>,
    storage: Option<Arc<dyn StorageBackend>>,
    clock: Option<Arc<dyn Clock>>,
}

impl DexBuilder {
    fn new() -> Self {
        Self {
            settings: RuntimeConfig::default(),
            source: None,
            probe: None,
            storage: None,
            clock: None,
        }
    }

    pub fn settings(mut self, settings: RuntimeConfig) -> Self {
        self.settings = settings;
        self
    }

    pub fn source(mut self, source: Arc<dyn DataSource>) -> Self {
        self.source = Some(source);
        self
    }

    pub fn image_probe(mut self, probe: Arc<dyn ImageProbe>) -> Self {
        self.probe = Some(probe);
        self
    }

    pub fn storage(mut self, storage: Arc<dyn StorageBackend>) -> Self {
        self.storage = Some(storage);
        self
    }

    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Loads config, moves and creatures, in that order, then restores any
    /// admin session. Fails without building anything if creatures or moves
    /// cannot be loaded.
    pub async fn load(self) -> Result<Dex> {
        let settings = self.settings;
        let source = match self.source {
            Some(source) => source,
            None => default_source(&settings)?,
        };
        let probe = self
            .probe
            .unwrap_or_else(|| Arc::new(HttpImageProbe::new()));
        let storage = self
            .storage
            .unwrap_or_else(|| default_storage(&settings));
        let clock = self.clock.unwrap_or_else(|| Arc::new(SystemClock));

        let cache = CacheStore::new(storage, clock);
        let fetcher = Fetcher::new(
            source,
            probe,
            cache.clone(),
            settings.image_base_url.clone(),
            settings.data_ttl,
        );

        let config = fetcher.fetch_config().await;
        let moves = fetcher.fetch_moves().await?;
        let creatures = fetcher.fetch_creatures().await?;

        let mut gate = AdminGate::new(
            settings.admin_secret.clone(),
            settings.session_ttl,
            cache.clone(),
        );
        if gate.restore() {
            info!("Restored admin session");
        }

        let facets = Facets::collect(&config, &creatures);
        let searchable = searchable_moves(&config, &creatures);
        info!(
            "Loaded {} creatures, {} moves, {} registered",
            creatures.len(),
            moves.len(),
            config.registered().len()
        );

        Ok(Dex {
            settings,
            fetcher,
            cache,
            gate,
            creatures,
            moves,
            config,
            facets,
            searchable,
        })
    }
}

fn default_source(settings: &RuntimeConfig) -> Result<Arc<dyn DataSource>> {
    match &settings.dump_dir {
        Some(dir) => {
            info!("Serving sheet data from dump at {}", dir.display());
            let source = StaticDataSource::from_dump(&SheetDump::new(dir)).map_err(|source| {
                RuntimeError::Load {
                    dataset: Dataset::Creatures,
                    source,
                }
            })?;
            Ok(Arc::new(source))
        }
        None => Ok(Arc::new(HttpDataSource::new(
            settings.creatures_url.clone(),
            settings.moves_url.clone(),
            settings.config_url.clone(),
        ))),
    }
}

fn default_storage(settings: &RuntimeConfig) -> Arc<dyn StorageBackend> {
    let Some(dir) = &settings.cache_dir else {
        return Arc::new(InMemoryStorage::new());
    };
    match FileStorage::new(dir) {
        Ok(storage) => Arc::new(storage),
        Err(err) => {
            warn!(
                "Cache directory {} unusable, caching in memory: {}",
                dir.display(),
                err
            );
            Arc::new(InMemoryStorage::new())
        }
    }
}
