//! Per-field visibility profiles.
//!
//! A [`VisibilityProfile`] is always complete: every flag has a value. Partial
//! documents arrive as a [`ProfileOverride`] and are filled against the
//! built-in defaults exactly once, when they are ingested.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use strum::{EnumCount, IntoEnumIterator};

/// Highest level a profile can meaningfully expose; every tier is unlocked at this level.
pub const MAX_MOVES_LEVEL: u8 = 20;

/// Level used when a profile does not state one.
pub const DEFAULT_MOVES_LEVEL: u8 = 1;

/// Every boolean flag a profile carries.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    strum::EnumIter,
    strum::EnumCount,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[strum(serialize_all = "camelCase", ascii_case_insensitive)]
pub enum VisibilityField {
    PrimaryType,
    SecondaryType,
    Description,
    CharSize,
    CharRarity,
    CharBehavior,
    CharHabitat,
    CharActivity,
    #[strum(serialize = "statAC")]
    StatAc,
    #[strum(serialize = "statHD")]
    StatHd,
    #[strum(serialize = "statVD")]
    StatVd,
    StatSpeed,
    #[strum(serialize = "statSTR")]
    StatStr,
    #[strum(serialize = "statDEX")]
    StatDex,
    #[strum(serialize = "statCON")]
    StatCon,
    #[strum(serialize = "statINT")]
    StatInt,
    #[strum(serialize = "statWIS")]
    StatWis,
    #[strum(serialize = "statCHA")]
    StatCha,
    StatSaves,
    StatSkills,
    PrimaryAbility,
    SecondaryAbility,
    HiddenAbility,
    SenseDarkvision,
    SenseBlindsight,
    SenseTremorsense,
    SenseTrillsense,
    SenseMindsense,
    EvoFrom,
    EvoTo,
    Moves,
}

/// Display grouping of visibility fields.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display)]
pub enum FieldGroup {
    Types,
    Description,
    Characteristics,
    #[strum(to_string = "Combat Stats")]
    CombatStats,
    #[strum(to_string = "Ability Scores")]
    AbilityScores,
    Abilities,
    Senses,
    Evolution,
    Moves,
}

impl VisibilityField {
    #[inline]
    pub const fn as_index(self) -> usize {
        self as usize
    }

    pub const fn group(self) -> FieldGroup {
        use VisibilityField::*;
        match self {
            PrimaryType | SecondaryType => FieldGroup::Types,
            Description => FieldGroup::Description,
            CharSize | CharRarity | CharBehavior | CharHabitat | CharActivity => {
                FieldGroup::Characteristics
            }
            StatAc | StatHd | StatVd | StatSpeed => FieldGroup::CombatStats,
            StatStr | StatDex | StatCon | StatInt | StatWis | StatCha | StatSaves | StatSkills => {
                FieldGroup::AbilityScores
            }
            PrimaryAbility | SecondaryAbility | HiddenAbility => FieldGroup::Abilities,
            SenseDarkvision | SenseBlindsight | SenseTremorsense | SenseTrillsense
            | SenseMindsense => FieldGroup::Senses,
            EvoFrom | EvoTo => FieldGroup::Evolution,
            Moves => FieldGroup::Moves,
        }
    }

    /// Built-in default: types, description and characteristics are shown.
    pub const fn default_value(self) -> bool {
        matches!(
            self.group(),
            FieldGroup::Types | FieldGroup::Description | FieldGroup::Characteristics
        )
    }

    pub fn all() -> impl Iterator<Item = VisibilityField> {
        VisibilityField::iter()
    }
}

/// Complete visibility state for one creature, or the shared default.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "ProfileOverride", into = "ProfileOverride")]
pub struct VisibilityProfile {
    flags: [bool; VisibilityField::COUNT],
    moves_max_level: u8,
    extra_visible_moves: Vec<String>,
}

impl Default for VisibilityProfile {
    fn default() -> Self {
        let mut flags = [false; VisibilityField::COUNT];
        for field in VisibilityField::all() {
            flags[field.as_index()] = field.default_value();
        }
        Self {
            flags,
            moves_max_level: DEFAULT_MOVES_LEVEL,
            extra_visible_moves: Vec::new(),
        }
    }
}

impl VisibilityProfile {
    /// Every flag set to `visible`; moves capped at the top level when shown, the
    /// first level when hidden. Manual move picks are cleared either way.
    pub fn uniform(visible: bool) -> Self {
        Self {
            flags: [visible; VisibilityField::COUNT],
            moves_max_level: if visible { MAX_MOVES_LEVEL } else { DEFAULT_MOVES_LEVEL },
            extra_visible_moves: Vec::new(),
        }
    }

    #[inline]
    pub fn get(&self, field: VisibilityField) -> bool {
        self.flags[field.as_index()]
    }

    pub fn set(&mut self, field: VisibilityField, value: bool) {
        self.flags[field.as_index()] = value;
    }

    pub fn moves_max_level(&self) -> u8 {
        self.moves_max_level
    }

    pub fn set_moves_max_level(&mut self, level: u8) {
        self.moves_max_level = level;
    }

    pub fn extra_visible_moves(&self) -> &[String] {
        &self.extra_visible_moves
    }

    pub fn set_extra_visible_moves(&mut self, moves: Vec<String>) {
        self.extra_visible_moves = dedupe_names(moves);
    }

    pub fn is_extra_visible(&self, name: &str) -> bool {
        contains_ignore_case(&self.extra_visible_moves, name)
    }

    /// Lists or unlists `name` on the manual whitelist. Returns true if the
    /// list changed; asking for the state it is already in changes nothing.
    pub fn set_extra_visible(&mut self, name: &str, listed: bool) -> bool {
        set_listed(&mut self.extra_visible_moves, name, listed)
    }

    /// The core move gating rule: moves must be enabled, and the move must sit
    /// at or below the level cap or be manually whitelisted.
    pub fn move_visible(&self, tier_level: u8, name: &str) -> bool {
        self.get(VisibilityField::Moves)
            && (tier_level <= self.moves_max_level || self.is_extra_visible(name))
    }

    pub fn apply(&mut self, edit: &ProfileEdit) {
        match edit {
            ProfileEdit::Flag(field, value) => self.set(*field, *value),
            ProfileEdit::MovesMaxLevel(level) => self.set_moves_max_level(*level),
            ProfileEdit::ExtraVisibleMoves(moves) => self.set_extra_visible_moves(moves.clone()),
        }
    }

    pub fn flags(&self) -> impl Iterator<Item = (VisibilityField, bool)> + '_ {
        VisibilityField::all().map(|field| (field, self.get(field)))
    }
}

/// A partial profile as found in external documents.
///
/// Unknown keys and values of the wrong shape are ignored.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Map<String, Value>", into = "Map<String, Value>")]
pub struct ProfileOverride {
    pub flags: BTreeMap<VisibilityField, bool>,
    pub moves_max_level: Option<u8>,
    pub extra_visible_moves: Option<Vec<String>>,
}

const MOVES_MAX_LEVEL_KEY: &str = "movesMaxLevel";
const EXTRA_VISIBLE_MOVES_KEY: &str = "extraVisibleMoves";

impl ProfileOverride {
    /// Completes this override against `base`. Set keys win.
    pub fn fill(self, base: &VisibilityProfile) -> VisibilityProfile {
        let mut profile = base.clone();
        for (field, value) in self.flags {
            profile.set(field, value);
        }
        if let Some(level) = self.moves_max_level.filter(|level| *level > 0) {
            profile.moves_max_level = level;
        }
        if let Some(moves) = self.extra_visible_moves {
            profile.set_extra_visible_moves(moves);
        }
        profile
    }

    pub fn is_empty(&self) -> bool {
        self.flags.is_empty() && self.moves_max_level.is_none() && self.extra_visible_moves.is_none()
    }
}

impl From<Map<String, Value>> for ProfileOverride {
    fn from(map: Map<String, Value>) -> Self {
        let mut partial = ProfileOverride::default();
        for (key, value) in map {
            if key.eq_ignore_ascii_case(MOVES_MAX_LEVEL_KEY) {
                partial.moves_max_level = level_from_value(&value);
            } else if key.eq_ignore_ascii_case(EXTRA_VISIBLE_MOVES_KEY) {
                partial.extra_visible_moves = names_from_value(&value);
            } else if let (Ok(field), Some(flag)) = (VisibilityField::from_str(&key), value.as_bool())
            {
                partial.flags.insert(field, flag);
            }
        }
        partial
    }
}

impl From<ProfileOverride> for Map<String, Value> {
    fn from(partial: ProfileOverride) -> Self {
        let mut map = Map::new();
        for (field, value) in partial.flags {
            map.insert(field.to_string(), Value::Bool(value));
        }
        if let Some(level) = partial.moves_max_level {
            map.insert(MOVES_MAX_LEVEL_KEY.to_string(), Value::from(level));
        }
        if let Some(moves) = partial.extra_visible_moves {
            map.insert(EXTRA_VISIBLE_MOVES_KEY.to_string(), Value::from(moves));
        }
        map
    }
}

impl From<ProfileOverride> for VisibilityProfile {
    fn from(partial: ProfileOverride) -> Self {
        partial.fill(&VisibilityProfile::default())
    }
}

impl From<VisibilityProfile> for ProfileOverride {
    fn from(profile: VisibilityProfile) -> Self {
        Self {
            flags: profile.flags().collect(),
            moves_max_level: Some(profile.moves_max_level),
            extra_visible_moves: Some(profile.extra_visible_moves),
        }
    }
}

fn level_from_value(value: &Value) -> Option<u8> {
    let level = match value {
        Value::Number(n) => n.as_u64().or_else(|| n.as_f64().map(|f| f.max(0.0) as u64)),
        Value::String(s) => s.trim().parse::<u64>().ok(),
        _ => None,
    }?;
    Some(level.min(u64::from(u8::MAX)) as u8)
}

fn names_from_value(value: &Value) -> Option<Vec<String>> {
    let items = value.as_array()?;
    Some(
        items
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect(),
    )
}

/// One typed edit to a profile.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ProfileEdit {
    Flag(VisibilityField, bool),
    MovesMaxLevel(u8),
    ExtraVisibleMoves(Vec<String>),
}

/// Errors from parsing a textual profile edit.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum FieldError {
    #[error("unknown visibility field: {0}")]
    UnknownField(String),

    #[error("invalid value for {field}: {value}")]
    InvalidValue { field: String, value: String },
}

impl ProfileEdit {
    /// Parses a `key`/`value` pair such as `statAC`/`true` or `movesMaxLevel`/`6`.
    ///
    /// `extraVisibleMoves` takes a comma-separated list.
    pub fn parse(key: &str, value: &str) -> Result<Self, FieldError> {
        let invalid = || FieldError::InvalidValue {
            field: key.to_string(),
            value: value.to_string(),
        };

        if key.eq_ignore_ascii_case(MOVES_MAX_LEVEL_KEY) {
            return value
                .trim()
                .parse::<u8>()
                .map(ProfileEdit::MovesMaxLevel)
                .map_err(|_| invalid());
        }
        if key.eq_ignore_ascii_case(EXTRA_VISIBLE_MOVES_KEY) {
            let moves = value
                .split(',')
                .map(str::trim)
                .filter(|m| !m.is_empty())
                .map(str::to_string)
                .collect();
            return Ok(ProfileEdit::ExtraVisibleMoves(moves));
        }

        let field = VisibilityField::from_str(key.trim())
            .map_err(|_| FieldError::UnknownField(key.to_string()))?;
        let flag = parse_flag(value).ok_or_else(invalid)?;
        Ok(ProfileEdit::Flag(field, flag))
    }
}

impl fmt::Display for ProfileEdit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProfileEdit::Flag(field, value) => write!(f, "{field}={value}"),
            ProfileEdit::MovesMaxLevel(level) => write!(f, "{MOVES_MAX_LEVEL_KEY}={level}"),
            ProfileEdit::ExtraVisibleMoves(moves) => {
                write!(f, "{EXTRA_VISIBLE_MOVES_KEY}=[{}]", moves.join(", "))
            }
        }
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "on" | "yes" | "1" | "show" => Some(true),
        "false" | "off" | "no" | "0" | "hide" => Some(false),
        _ => None,
    }
}

pub(crate) fn contains_ignore_case(names: &[String], name: &str) -> bool {
    let name = name.to_lowercase();
    names.iter().any(|n| n.to_lowercase() == name)
}

/// Brings the trimmed `name` to the requested case-insensitive membership.
/// Returns true if `names` changed. Blank names are ignored.
pub(crate) fn set_listed(names: &mut Vec<String>, name: &str, listed: bool) -> bool {
    let name = name.trim();
    if name.is_empty() || contains_ignore_case(names, name) == listed {
        return false;
    }
    if listed {
        names.push(name.to_string());
    } else {
        let lowered = name.to_lowercase();
        names.retain(|n| n.to_lowercase() != lowered);
    }
    true
}

/// Trims names, drops blanks and keeps the first spelling of each case-insensitive duplicate.
pub(crate) fn dedupe_names(names: impl IntoIterator<Item = String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for name in names {
        let name = name.trim();
        if !name.is_empty() && !contains_ignore_case(&out, name) {
            out.push(name.to_string());
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn field_names_round_trip_through_strings() {
        assert_eq!(VisibilityField::COUNT, 31);
        for field in VisibilityField::all() {
            assert_eq!(VisibilityField::from_str(field.as_ref()), Ok(field));
        }
        assert_eq!(VisibilityField::StatAc.to_string(), "statAC");
        assert_eq!(VisibilityField::SenseMindsense.to_string(), "senseMindsense");
        assert_eq!(VisibilityField::from_str("STATac"), Ok(VisibilityField::StatAc));
    }

    #[test]
    fn built_in_defaults() {
        let profile = VisibilityProfile::default();
        assert!(profile.get(VisibilityField::PrimaryType));
        assert!(profile.get(VisibilityField::CharActivity));
        assert!(!profile.get(VisibilityField::StatAc));
        assert!(!profile.get(VisibilityField::Moves));
        assert_eq!(profile.moves_max_level(), 1);
        assert!(profile.extra_visible_moves().is_empty());
    }

    #[test]
    fn partial_override_fills_missing_keys_from_base() {
        let partial: ProfileOverride =
            serde_json::from_value(json!({ "moves": true, "statAC": true, "bogus": 1 })).unwrap();
        let profile = partial.fill(&VisibilityProfile::default());

        let mut expected = VisibilityProfile::default();
        expected.set(VisibilityField::Moves, true);
        expected.set(VisibilityField::StatAc, true);
        assert_eq!(profile, expected);
    }

    #[test]
    fn zero_level_falls_back_to_base() {
        let profile: VisibilityProfile =
            serde_json::from_value(json!({ "movesMaxLevel": 0 })).unwrap();
        assert_eq!(profile.moves_max_level(), 1);
    }

    #[test]
    fn profile_serializes_every_key() {
        let value = serde_json::to_value(VisibilityProfile::default()).unwrap();
        let object = value.as_object().unwrap();
        assert_eq!(object.len(), VisibilityField::COUNT + 2);
        assert_eq!(object["primaryType"], json!(true));
        assert_eq!(object["movesMaxLevel"], json!(1));

        let back: VisibilityProfile = serde_json::from_value(value).unwrap();
        assert_eq!(back, VisibilityProfile::default());
    }

    #[test]
    fn move_gating_rule() {
        let mut profile = VisibilityProfile::default();
        assert!(!profile.move_visible(1, "Scratch"));

        profile.set(VisibilityField::Moves, true);
        assert!(profile.move_visible(1, "Scratch"));
        assert!(!profile.move_visible(6, "Flame Burst"));

        profile.set_extra_visible("Flame Burst", true);
        assert!(profile.move_visible(6, "flame burst"));
    }

    #[test]
    fn extra_visible_edits_are_idempotent() {
        let mut profile = VisibilityProfile::default();
        assert!(profile.set_extra_visible(" Ember ", true));
        assert!(!profile.set_extra_visible("EMBER", true));
        assert_eq!(profile.extra_visible_moves(), ["Ember"]);

        assert!(profile.set_extra_visible("ember", false));
        assert!(!profile.set_extra_visible("ember", false));
        assert!(profile.extra_visible_moves().is_empty());

        assert!(!profile.set_extra_visible("   ", true));
        assert!(profile.extra_visible_moves().is_empty());
    }

    #[test]
    fn parse_edits() {
        assert_eq!(
            ProfileEdit::parse("statHD", "on"),
            Ok(ProfileEdit::Flag(VisibilityField::StatHd, true))
        );
        assert_eq!(
            ProfileEdit::parse("movesMaxLevel", "6"),
            Ok(ProfileEdit::MovesMaxLevel(6))
        );
        assert_eq!(
            ProfileEdit::parse("extraVisibleMoves", "Ember, , Growl"),
            Ok(ProfileEdit::ExtraVisibleMoves(vec!["Ember".into(), "Growl".into()]))
        );
        assert!(matches!(
            ProfileEdit::parse("statLuck", "true"),
            Err(FieldError::UnknownField(_))
        ));
        assert!(matches!(
            ProfileEdit::parse("moves", "maybe"),
            Err(FieldError::InvalidValue { .. })
        ));
    }
}
