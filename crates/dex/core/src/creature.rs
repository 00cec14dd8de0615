//! Creature records as decoded from the compendium sheet.

use serde::{Deserialize, Serialize};
use strum::{EnumCount, IntoEnumIterator};

use crate::evolution::{Evolution, parse_evolution};
use crate::moves::MoveTiers;
use crate::visibility::VisibilityField;

/// A named ability with its rules text.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ability {
    pub name: String,
    pub description: String,
}

impl Ability {
    pub const MISSING_DESCRIPTION: &'static str = "No description available";

    pub fn new(name: impl Into<String>, description: Option<String>) -> Self {
        Self {
            name: name.into(),
            description: description.unwrap_or_else(|| Self::MISSING_DESCRIPTION.to_string()),
        }
    }
}

/// Combat statistics, kept verbatim as written on the sheet.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CombatStats {
    pub ac: Option<String>,
    pub hit_dice: Option<String>,
    pub hp: Option<String>,
    pub vitality_dice: Option<String>,
    pub vp: Option<String>,
    pub speed: Option<String>,
}

/// The six ability scores.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbilityScores {
    pub strength: Option<String>,
    pub dexterity: Option<String>,
    pub constitution: Option<String>,
    pub intelligence: Option<String>,
    pub wisdom: Option<String>,
    pub charisma: Option<String>,
}

/// Movement speeds per locomotion mode.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Movement {
    pub walking: Option<String>,
    pub climbing: Option<String>,
    pub flying: Option<String>,
    pub hovering: Option<String>,
    pub swimming: Option<String>,
    pub burrowing: Option<String>,
}

/// The nine sense columns of the sheet, in column order.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    strum::EnumIter,
    strum::EnumCount,
    strum::Display,
    strum::AsRefStr,
)]
#[serde(rename_all = "lowercase")]
pub enum Sense {
    Sight,
    Hearing,
    Smell,
    Tremorsense,
    Echolocation,
    Telepathy,
    Blindsight,
    Darkvision,
    Truesight,
}

impl Sense {
    #[inline]
    pub const fn as_index(self) -> usize {
        self as usize
    }

    /// The visibility flag that gates this sense.
    ///
    /// Senses without a flag are never exposed.
    pub const fn gate(self) -> Option<VisibilityField> {
        match self {
            Self::Darkvision => Some(VisibilityField::SenseDarkvision),
            Self::Blindsight => Some(VisibilityField::SenseBlindsight),
            Self::Tremorsense => Some(VisibilityField::SenseTremorsense),
            Self::Echolocation => Some(VisibilityField::SenseTrillsense),
            Self::Telepathy => Some(VisibilityField::SenseMindsense),
            Self::Sight | Self::Hearing | Self::Smell | Self::Truesight => None,
        }
    }

    pub fn all() -> impl Iterator<Item = Sense> {
        Sense::iter()
    }
}

/// Sense ranges keyed by [`Sense`]. Values are the raw sheet text.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Senses {
    values: [Option<String>; Sense::COUNT],
}

impl Senses {
    pub fn from_values(values: [Option<String>; Sense::COUNT]) -> Self {
        Self { values }
    }

    pub fn get(&self, sense: Sense) -> Option<&str> {
        self.values[sense.as_index()].as_deref()
    }

    /// Returns the value if the creature actually has the sense.
    ///
    /// Blank, `0`, `-` and `no` all mean the sense is absent.
    pub fn present(&self, sense: Sense) -> Option<&str> {
        self.get(sense).filter(|value| sense_value_present(value))
    }

    /// Every present sense in column order.
    pub fn iter_present(&self) -> impl Iterator<Item = (Sense, &str)> {
        Sense::all().filter_map(|sense| self.present(sense).map(|value| (sense, value)))
    }
}

fn sense_value_present(value: &str) -> bool {
    let value = value.trim();
    !(value.is_empty() || value == "0" || value == "-" || value.eq_ignore_ascii_case("no"))
}

/// The six categorical dimensions used for filter dropdowns.
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
    strum::Display,
    strum::EnumString,
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Facet {
    Type,
    Size,
    Behavior,
    Activity,
    Rarity,
    Habitat,
}

impl Facet {
    pub fn all() -> impl Iterator<Item = Facet> {
        Facet::iter()
    }
}

/// A creature record. Immutable after load.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Creature {
    pub id: u32,
    pub name: String,
    /// Resolved image URL, when one of the candidate images exists.
    pub image: Option<String>,
    pub classification: Option<String>,
    pub flavor_text: Option<String>,
    pub primary_type: String,
    pub secondary_type: Option<String>,
    pub size: Option<String>,
    pub rarity: Option<String>,
    pub habitat: Option<String>,
    pub behavior: Option<String>,
    pub activity: Option<String>,
    pub evolution_req: Option<String>,
    pub primary_ability: Ability,
    pub secondary_ability: Option<Ability>,
    pub hidden_ability: Option<Ability>,
    pub catch_difficulty: Option<String>,
    pub level: Option<String>,
    pub combat: CombatStats,
    pub scores: AbilityScores,
    pub saving_throws: Option<String>,
    pub skills: Option<String>,
    pub moves: MoveTiers,
    pub move_pool: Vec<String>,
    pub movement: Movement,
    pub senses: Senses,
}

impl Creature {
    /// Lowercased name, the key of per-creature visibility overrides.
    pub fn key(&self) -> String {
        self.name.to_lowercase()
    }

    pub fn is_named(&self, name: &str) -> bool {
        self.name.to_lowercase() == name.to_lowercase()
    }

    /// File stem shared by every candidate image: zero-padded id plus name slug.
    pub fn image_stem(&self) -> String {
        format!("{:03}-{}", self.id, slugify(&self.name))
    }

    /// Values this creature contributes to a facet. Types contribute both slots.
    pub fn facet_values(&self, facet: Facet) -> Vec<&str> {
        let value = match facet {
            Facet::Type => {
                return std::iter::once(self.primary_type.as_str())
                    .chain(self.secondary_type.as_deref())
                    .filter(|v| !v.is_empty())
                    .collect();
            }
            Facet::Size => self.size.as_deref(),
            Facet::Behavior => self.behavior.as_deref(),
            Facet::Activity => self.activity.as_deref(),
            Facet::Rarity => self.rarity.as_deref(),
            Facet::Habitat => self.habitat.as_deref(),
        };
        value.filter(|v| !v.is_empty()).into_iter().collect()
    }

    /// Exact equality against a facet filter. The type filter matches either slot.
    pub fn matches_facet(&self, facet: Facet, wanted: &str) -> bool {
        match facet {
            Facet::Type => {
                self.primary_type == wanted || self.secondary_type.as_deref() == Some(wanted)
            }
            _ => self.facet_values(facet).first().copied() == Some(wanted),
        }
    }

    /// Parsed evolution relations from the free-text clause.
    pub fn evolution(&self) -> Evolution {
        parse_evolution(self.evolution_req.as_deref().unwrap_or(""))
    }
}

/// Lowercases `name`, collapses every non-alphanumeric run to one hyphen and
/// strips leading and trailing hyphens.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_hyphen = false;
    for ch in name.chars().flat_map(char::to_lowercase) {
        if ch.is_ascii_lowercase() || ch.is_ascii_digit() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(ch);
        } else {
            pending_hyphen = true;
        }
    }
    slug
}
