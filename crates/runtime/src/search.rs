//! Creature and move search over registered entries.
//!
//! Nothing here caches: facets and results are recomputed from the current
//! config and catalog on every call.

use std::collections::{BTreeMap, BTreeSet};

use dex_core::{
    Creature, Facet, MAX_MOVES_LEVEL, Move, SearchableMoves, VisibilityConfig, VisibilityField,
};

/// Creature results per page.
pub const PAGE_SIZE: usize = 5;

/// Move results returned by a free-text move search.
pub const MOVE_RESULT_LIMIT: usize = 50;

/// Distinct facet values over registered creatures, sorted.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Facets {
    values: BTreeMap<Facet, BTreeSet<String>>,
}

impl Facets {
    pub fn collect(config: &VisibilityConfig, creatures: &[Creature]) -> Self {
        let mut values: BTreeMap<Facet, BTreeSet<String>> =
            Facet::all().map(|facet| (facet, BTreeSet::new())).collect();

        for creature in creatures
            .iter()
            .filter(|creature| config.is_registered(&creature.name))
        {
            for facet in Facet::all() {
                let set = values.entry(facet).or_default();
                set.extend(creature.facet_values(facet).into_iter().map(str::to_string));
            }
        }

        Self { values }
    }

    pub fn values(&self, facet: Facet) -> impl Iterator<Item = &str> {
        self.values
            .get(&facet)
            .into_iter()
            .flat_map(|set| set.iter().map(String::as_str))
    }
}

/// Exact-match facet filters. Empty values mean "any".
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FacetFilters {
    filters: BTreeMap<Facet, String>,
}

impl FacetFilters {
    pub fn set(&mut self, facet: Facet, value: impl Into<String>) {
        let value = value.into();
        if value.is_empty() {
            self.filters.remove(&facet);
        } else {
            self.filters.insert(facet, value);
        }
    }

    pub fn with(mut self, facet: Facet, value: impl Into<String>) -> Self {
        self.set(facet, value);
        self
    }

    pub fn matches(&self, creature: &Creature) -> bool {
        self.filters
            .iter()
            .all(|(facet, wanted)| creature.matches_facet(*facet, wanted))
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SearchQuery {
    pub term: String,
    pub filters: FacetFilters,
}

impl SearchQuery {
    pub fn new(term: impl Into<String>) -> Self {
        Self {
            term: term.into(),
            filters: FacetFilters::default(),
        }
    }

    pub fn filter(mut self, facet: Facet, value: impl Into<String>) -> Self {
        self.filters.set(facet, value);
        self
    }
}

/// Matching creatures in catalog order.
#[derive(Clone, Debug)]
pub struct SearchResults<'a> {
    matches: Vec<&'a Creature>,
}

impl<'a> SearchResults<'a> {
    pub fn len(&self) -> usize {
        self.matches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    pub fn page_count(&self) -> usize {
        self.matches.len().div_ceil(PAGE_SIZE)
    }

    /// One-based page. Pages past the end are empty; callers reset to page 1
    /// on every new search.
    pub fn page(&self, page: usize) -> &[&'a Creature] {
        let start = page.saturating_sub(1).saturating_mul(PAGE_SIZE);
        if page == 0 || start >= self.matches.len() {
            return &[];
        }
        let end = (start + PAGE_SIZE).min(self.matches.len());
        &self.matches[start..end]
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a Creature> + '_ {
        self.matches.iter().copied()
    }
}

pub fn search_creatures<'a>(
    config: &VisibilityConfig,
    creatures: &'a [Creature],
    query: &SearchQuery,
) -> SearchResults<'a> {
    let term = query.term.trim().to_lowercase();
    let matches = creatures
        .iter()
        .filter(|creature| config.is_registered(&creature.name))
        .filter(|creature| query.filters.matches(creature))
        .filter(|creature| term.is_empty() || matches_term(config, creature, &term))
        .collect();
    SearchResults { matches }
}

fn is_numeric(term: &str) -> bool {
    term.parse::<f64>().is_ok_and(f64::is_finite)
}

/// A numeric term matches the id exactly; anything else matches the name, or
/// a type the creature's profile shows.
fn matches_term(config: &VisibilityConfig, creature: &Creature, lowered: &str) -> bool {
    if is_numeric(lowered) {
        return creature.id.to_string() == lowered;
    }
    if creature.name.to_lowercase().contains(lowered) {
        return true;
    }

    let profile = config.resolve(&creature.name);
    let primary = profile.get(VisibilityField::PrimaryType)
        && creature.primary_type.to_lowercase().contains(lowered);
    let secondary = profile.get(VisibilityField::SecondaryType)
        && creature
            .secondary_type
            .as_deref()
            .is_some_and(|t| t.to_lowercase().contains(lowered));
    primary || secondary
}

/// Outcome of a move search.
#[derive(Clone, Debug)]
pub enum MoveSearch<'a> {
    /// Blank input.
    Empty,
    /// The term names a creature that is not registered.
    NotRegistered(&'a Creature),
    /// The term names a registered creature whose moves are hidden.
    MovesUndiscovered(&'a Creature),
    /// The term names a registered creature; its moves up to `level`.
    Creature {
        creature: &'a Creature,
        level: u8,
        moves: Vec<&'a Move>,
    },
    /// Searchable moves whose name or type contains the term. `moves` holds
    /// at most [`MOVE_RESULT_LIMIT`] of `total`.
    Moves { total: usize, moves: Vec<&'a Move> },
}

/// Requested level from user input. Missing, zero or unparsable means 20.
pub fn parse_level(raw: Option<&str>) -> u8 {
    raw.and_then(|raw| raw.trim().parse::<u32>().ok())
        .filter(|level| *level > 0)
        .map(|level| u8::try_from(level).unwrap_or(u8::MAX))
        .unwrap_or(MAX_MOVES_LEVEL)
}

pub fn search_moves<'a>(
    config: &VisibilityConfig,
    creatures: &'a [Creature],
    catalog: &'a [Move],
    searchable: &SearchableMoves,
    term: &str,
    level: u8,
) -> MoveSearch<'a> {
    let term = term.trim().to_lowercase();
    if term.is_empty() {
        return MoveSearch::Empty;
    }

    if let Some(creature) = creatures.iter().find(|c| c.name.to_lowercase() == term) {
        return creature_moves(config, creature, catalog, level);
    }

    let matching: Vec<&Move> = catalog
        .iter()
        .filter(|m| searchable.contains(&m.name) && m.matches_term(&term))
        .collect();
    MoveSearch::Moves {
        total: matching.len(),
        moves: matching.into_iter().take(MOVE_RESULT_LIMIT).collect(),
    }
}

fn creature_moves<'a>(
    config: &VisibilityConfig,
    creature: &'a Creature,
    catalog: &'a [Move],
    level: u8,
) -> MoveSearch<'a> {
    if !config.is_registered(&creature.name) {
        return MoveSearch::NotRegistered(creature);
    }
    let profile = config.resolve(&creature.name);
    if !profile.get(VisibilityField::Moves) {
        return MoveSearch::MovesUndiscovered(creature);
    }

    let level = level.min(profile.moves_max_level());
    let mut available = creature.moves.up_to_level(level);
    for extra in profile.extra_visible_moves() {
        if !available.iter().any(|m| m.eq_ignore_ascii_case(extra)) {
            available.push(extra.clone());
        }
    }

    let moves = catalog
        .iter()
        .filter(|m| available.iter().any(|name| name.eq_ignore_ascii_case(&m.name)))
        .collect();
    MoveSearch::Creature {
        creature,
        level,
        moves,
    }
}
