//! The visibility configuration object and its external document form.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::visibility::{ProfileOverride, VisibilityProfile, dedupe_names};

pub const DEFAULT_SPLASH_COUNT: u32 = 9;
pub const MIN_SPLASH_COUNT: u32 = 1;
pub const MAX_SPLASH_COUNT: u32 = 99;

/// A configuration document as found remotely, in the cache or in an import.
///
/// Every key is optional; [`VisibilityConfig::from_document`] fills the gaps.
/// Keys are read independently: a value of the wrong shape is dropped without
/// taking the rest of the document down with it.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigDocument {
    #[serde(default, deserialize_with = "lenient_names")]
    pub registered: Option<Vec<String>>,
    #[serde(default, deserialize_with = "lenient_overrides")]
    pub visibility: Option<BTreeMap<String, ProfileOverride>>,
    #[serde(default, deserialize_with = "lenient_override")]
    pub defaults: Option<ProfileOverride>,
    #[serde(default, deserialize_with = "lenient_names")]
    pub extra_searchable_moves: Option<Vec<String>>,
    #[serde(default, deserialize_with = "lenient_count")]
    pub splash_count: Option<u32>,
}

/// A list of names. Non-string items are skipped.
fn lenient_names<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Vec<String>>, D::Error> {
    let value = Value::deserialize(d)?;
    Ok(value.as_array().map(|items| {
        items
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect()
    }))
}

fn lenient_override<'de, D: Deserializer<'de>>(d: D) -> Result<Option<ProfileOverride>, D::Error> {
    Ok(match Value::deserialize(d)? {
        Value::Object(map) => Some(ProfileOverride::from(map)),
        _ => None,
    })
}

/// Per-creature overrides. Entries that are not objects are skipped.
fn lenient_overrides<'de, D: Deserializer<'de>>(
    d: D,
) -> Result<Option<BTreeMap<String, ProfileOverride>>, D::Error> {
    let map = match Value::deserialize(d)? {
        Value::Object(map) => map,
        _ => return Ok(None),
    };
    Ok(Some(
        map.into_iter()
            .filter_map(|(name, value)| match value {
                Value::Object(partial) => Some((name, ProfileOverride::from(partial))),
                _ => None,
            })
            .collect(),
    ))
}

/// A positive count, as a number or numeric string. Anything else is dropped.
fn lenient_count<'de, D: Deserializer<'de>>(d: D) -> Result<Option<u32>, D::Error> {
    let count = match Value::deserialize(d)? {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse::<u64>().ok(),
        _ => None,
    };
    Ok(count.and_then(|count| u32::try_from(count).ok()))
}

/// Registration ledger, per-creature overrides, shared defaults and the global
/// move whitelist. Always complete once constructed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "ConfigDocument")]
pub struct VisibilityConfig {
    pub(crate) registered: Vec<String>,
    pub(crate) visibility: BTreeMap<String, VisibilityProfile>,
    pub(crate) defaults: VisibilityProfile,
    pub(crate) extra_searchable_moves: Vec<String>,
    pub(crate) splash_count: u32,
}

impl Default for VisibilityConfig {
    fn default() -> Self {
        Self {
            registered: Vec::new(),
            visibility: BTreeMap::new(),
            defaults: VisibilityProfile::default(),
            extra_searchable_moves: Vec::new(),
            splash_count: DEFAULT_SPLASH_COUNT,
        }
    }
}

impl From<ConfigDocument> for VisibilityConfig {
    fn from(document: ConfigDocument) -> Self {
        Self::from_document(document)
    }
}

impl VisibilityConfig {
    /// Completes a partial document. This is the only place defaults are filled in.
    ///
    /// Override keys are lowercased and every partial profile is completed
    /// against the built-in profile.
    pub fn from_document(document: ConfigDocument) -> Self {
        let builtin = VisibilityProfile::default();

        let visibility = document
            .visibility
            .unwrap_or_default()
            .into_iter()
            .map(|(name, partial)| (name.trim().to_lowercase(), partial.fill(&builtin)))
            .filter(|(name, _)| !name.is_empty())
            .collect();

        Self {
            registered: dedupe_names(document.registered.unwrap_or_default()),
            visibility,
            defaults: document
                .defaults
                .map(|partial| partial.fill(&builtin))
                .unwrap_or(builtin),
            extra_searchable_moves: dedupe_names(
                document.extra_searchable_moves.unwrap_or_default(),
            ),
            splash_count: document
                .splash_count
                .filter(|count| *count > 0)
                .unwrap_or(DEFAULT_SPLASH_COUNT),
        }
    }

    pub fn registered(&self) -> &[String] {
        &self.registered
    }

    pub fn overrides(&self) -> &BTreeMap<String, VisibilityProfile> {
        &self.visibility
    }

    pub fn override_for(&self, name: &str) -> Option<&VisibilityProfile> {
        self.visibility.get(&name.to_lowercase())
    }

    pub fn defaults(&self) -> &VisibilityProfile {
        &self.defaults
    }

    pub fn defaults_mut(&mut self) -> &mut VisibilityProfile {
        &mut self.defaults
    }

    pub fn extra_searchable_moves(&self) -> &[String] {
        &self.extra_searchable_moves
    }

    pub fn splash_count(&self) -> u32 {
        self.splash_count
    }

    /// Stores the splash count clamped to `1..=99` and returns the stored value.
    pub fn set_splash_count(&mut self, count: u32) -> u32 {
        self.splash_count = count.clamp(MIN_SPLASH_COUNT, MAX_SPLASH_COUNT);
        self.splash_count
    }

    /// Pretty-printed JSON export of the whole configuration.
    pub fn to_pretty_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
