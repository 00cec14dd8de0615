//! Move records and the level-tiered move lists carried by every creature.
//!
//! A creature learns moves at six fixed character-level thresholds. Each
//! threshold is a [`Tier`] with its own cap on how many moves it may list.

use serde::{Deserialize, Serialize};
use strum::{EnumCount, IntoEnumIterator};

/// One of the six character-level thresholds at which a move list advances.
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
)]
pub enum Tier {
    #[strum(to_string = "Starting Moves")]
    Starting,
    #[strum(to_string = "Level 2")]
    Level2,
    #[strum(to_string = "Level 6")]
    Level6,
    #[strum(to_string = "Level 10")]
    Level10,
    #[strum(to_string = "Level 14")]
    Level14,
    #[strum(to_string = "Level 18")]
    Level18,
}

impl Tier {
    /// Character level at which this tier unlocks.
    pub const fn level(self) -> u8 {
        match self {
            Self::Starting => 1,
            Self::Level2 => 2,
            Self::Level6 => 6,
            Self::Level10 => 10,
            Self::Level14 => 14,
            Self::Level18 => 18,
        }
    }

    /// Maximum number of moves this tier may list.
    pub const fn cap(self) -> usize {
        match self {
            Self::Level14 | Self::Level18 => 3,
            _ => 4,
        }
    }

    #[inline]
    pub const fn as_index(self) -> usize {
        self as usize
    }

    /// Returns true if a character at `level` has reached this tier.
    #[inline]
    pub const fn unlocked_at(self, level: u8) -> bool {
        self.level() <= level
    }

    pub fn all() -> impl Iterator<Item = Tier> {
        Tier::iter()
    }
}

/// Ordered, capped move-name lists for all six tiers of one creature.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveTiers {
    tiers: [Vec<String>; Tier::COUNT],
}

impl MoveTiers {
    /// Builds tiers from the raw comma-separated cell of each tier.
    ///
    /// Every list is trimmed, deduplicated in order, and truncated to its cap.
    pub fn from_cells(cells: [Option<&str>; Tier::COUNT]) -> Self {
        let mut tiers = Self::default();
        for tier in Tier::all() {
            if let Some(raw) = cells[tier.as_index()] {
                tiers.tiers[tier.as_index()] = sanitize_move_list(raw, tier.cap());
            }
        }
        tiers
    }

    /// Builds tiers from already-split lists, applying the same sanitizing rules.
    pub fn from_lists<I, S>(lists: [I; Tier::COUNT]) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut tiers = Self::default();
        for (tier, list) in Tier::all().zip(lists) {
            let names: Vec<S> = list.into_iter().collect();
            tiers.tiers[tier.as_index()] =
                sanitize_moves(names.iter().map(AsRef::as_ref), tier.cap());
        }
        tiers
    }

    pub fn tier(&self, tier: Tier) -> &[String] {
        &self.tiers[tier.as_index()]
    }

    /// Iterates every tier in ascending level order.
    pub fn iter(&self) -> impl Iterator<Item = (Tier, &[String])> {
        Tier::all().map(move |tier| (tier, self.tier(tier)))
    }

    /// Every move together with the tier that lists it, in tier order.
    pub fn entries(&self) -> impl Iterator<Item = (Tier, &str)> {
        self.iter()
            .flat_map(|(tier, moves)| moves.iter().map(move |name| (tier, name.as_str())))
    }

    /// Ordered union of every tier unlocked at `level`.
    pub fn up_to_level(&self, level: u8) -> Vec<String> {
        let mut seen = Vec::new();
        for (tier, moves) in self.iter() {
            if !tier.unlocked_at(level) {
                continue;
            }
            for name in moves {
                if !seen.contains(name) {
                    seen.push(name.clone());
                }
            }
        }
        seen
    }

    /// The first tier listing `name` (case-insensitive).
    pub fn tier_of(&self, name: &str) -> Option<Tier> {
        self.entries()
            .find(|(_, listed)| listed.eq_ignore_ascii_case(name))
            .map(|(tier, _)| tier)
    }

    pub fn is_empty(&self) -> bool {
        self.tiers.iter().all(Vec::is_empty)
    }
}

/// Splits a comma-separated move cell into a trimmed, de-duplicated list of at most `cap` names.
pub fn sanitize_move_list(raw: &str, cap: usize) -> Vec<String> {
    sanitize_moves(raw.split(','), cap)
}

fn sanitize_moves<'a>(names: impl Iterator<Item = &'a str>, cap: usize) -> Vec<String> {
    let mut moves: Vec<String> = Vec::new();
    for name in names.map(str::trim).filter(|m| !m.is_empty()) {
        if moves.len() == cap {
            break;
        }
        if !moves.iter().any(|existing| existing == name) {
            moves.push(name.to_string());
        }
    }
    moves
}

/// A move record. Immutable after load.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Move {
    pub name: String,
    #[serde(rename = "type")]
    pub move_type: String,
    /// Damage expression as written on the sheet (e.g. `2d6`), when the move has one.
    pub power: Option<String>,
    /// Action time.
    pub time: String,
    /// Vitality point cost.
    pub vp: String,
    pub duration: String,
    pub range: String,
    pub description: String,
    /// "At higher levels" text, when present.
    pub higher: Option<String>,
}

impl Move {
    /// Case-insensitive substring match against the move name or type.
    pub fn matches_term(&self, lowered_term: &str) -> bool {
        self.name.to_lowercase().contains(lowered_term)
            || self.move_type.to_lowercase().contains(lowered_term)
    }
}
