//! Gated card projection.
//!
//! [`CardView`] is everything a presentation layer may show for one creature:
//! each field is present only if the creature's profile exposes it and the
//! record has a value for it.

use serde::Serialize;

use dex_core::{
    Ability, Creature, EvolutionEdge, EvolutionOrigin, Move, Sense, Tier, VisibilityField,
    VisibilityProfile,
};

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Labeled {
    pub label: &'static str,
    pub value: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Description {
    pub classification: Option<String>,
    pub flavor_text: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AbilitySlot {
    Primary,
    Secondary,
    Hidden,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct AbilityView {
    pub slot: AbilitySlot,
    #[serde(flatten)]
    pub ability: Ability,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SenseView {
    pub sense: Sense,
    pub value: String,
}

/// Visible moves of one tier.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct MoveGroup {
    pub tier: Tier,
    pub title: String,
    pub moves: Vec<Move>,
    /// Moves listed in the tier but withheld by the level cap.
    pub hidden: usize,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct MovesView {
    /// Effective level: the requested level capped by the profile.
    pub level: u8,
    pub groups: Vec<MoveGroup>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CardView {
    pub id: u32,
    pub name: String,
    pub image: Option<String>,
    pub primary_type: Option<String>,
    pub secondary_type: Option<String>,
    pub description: Option<Description>,
    pub characteristics: Vec<Labeled>,
    pub combat: Vec<Labeled>,
    pub scores: Vec<Labeled>,
    pub saving_throws: Option<String>,
    pub skills: Option<String>,
    pub abilities: Vec<AbilityView>,
    pub senses: Vec<SenseView>,
    pub evolves_from: Option<EvolutionOrigin>,
    pub evolves_to: Vec<EvolutionEdge>,
    pub moves: Option<MovesView>,
}

fn gated(
    profile: &VisibilityProfile,
    field: VisibilityField,
    value: Option<&String>,
) -> Option<String> {
    value.filter(|_| profile.get(field)).cloned()
}

fn labeled<const N: usize>(
    profile: &VisibilityProfile,
    entries: [(VisibilityField, &'static str, &Option<String>); N],
) -> Vec<Labeled> {
    entries
        .into_iter()
        .filter(|(field, _, _)| profile.get(*field))
        .filter_map(|(_, label, value)| value.clone().map(|value| Labeled { label, value }))
        .collect()
}

impl CardView {
    /// Projects `creature` through `profile`. Move groups are capped at
    /// `level` when given, and always at the profile's level cap.
    pub fn build(
        profile: &VisibilityProfile,
        creature: &Creature,
        catalog: &[Move],
        level: Option<u8>,
    ) -> Self {
        use VisibilityField as F;

        let description = profile
            .get(F::Description)
            .then(|| Description {
                classification: creature.classification.clone(),
                flavor_text: creature.flavor_text.clone(),
            })
            .filter(|d| d.classification.is_some() || d.flavor_text.is_some());

        let characteristics = labeled(
            profile,
            [
                (F::CharSize, "Size", &creature.size),
                (F::CharRarity, "Rarity", &creature.rarity),
                (F::CharBehavior, "Behavior", &creature.behavior),
                (F::CharHabitat, "Habitat", &creature.habitat),
                (F::CharActivity, "Activity", &creature.activity),
            ],
        );

        let combat_stats = &creature.combat;
        let combat = labeled(
            profile,
            [
                (F::StatAc, "AC", &combat_stats.ac),
                (F::StatHd, "Hit Dice", &combat_stats.hit_dice),
                (F::StatVd, "Vitality", &combat_stats.vitality_dice),
                (F::StatSpeed, "Speed", &combat_stats.speed),
            ],
        );

        let s = &creature.scores;
        let scores = labeled(
            profile,
            [
                (F::StatStr, "STR", &s.strength),
                (F::StatDex, "DEX", &s.dexterity),
                (F::StatCon, "CON", &s.constitution),
                (F::StatInt, "INT", &s.intelligence),
                (F::StatWis, "WIS", &s.wisdom),
                (F::StatCha, "CHA", &s.charisma),
            ],
        );

        let abilities = [
            (F::PrimaryAbility, AbilitySlot::Primary, Some(&creature.primary_ability)),
            (F::SecondaryAbility, AbilitySlot::Secondary, creature.secondary_ability.as_ref()),
            (F::HiddenAbility, AbilitySlot::Hidden, creature.hidden_ability.as_ref()),
        ]
        .into_iter()
        .filter(|(field, _, _)| profile.get(*field))
        .filter_map(|(_, slot, ability)| {
            ability.map(|ability| AbilityView {
                slot,
                ability: ability.clone(),
            })
        })
        .collect();

        let senses = creature
            .senses
            .iter_present()
            .filter(|(sense, _)| sense.gate().is_some_and(|field| profile.get(field)))
            .map(|(sense, value)| SenseView {
                sense,
                value: value.to_string(),
            })
            .collect();

        let evolution = creature.evolution();
        let evolves_from = evolution.evolves_from.filter(|_| profile.get(F::EvoFrom));
        let evolves_to = if profile.get(F::EvoTo) {
            evolution.evolves_to
        } else {
            Vec::new()
        };

        Self {
            id: creature.id,
            name: creature.name.clone(),
            image: creature.image.clone(),
            primary_type: profile
                .get(F::PrimaryType)
                .then(|| creature.primary_type.clone()),
            secondary_type: gated(profile, F::SecondaryType, creature.secondary_type.as_ref()),
            description,
            characteristics,
            combat,
            scores,
            saving_throws: gated(profile, F::StatSaves, creature.saving_throws.as_ref()),
            skills: gated(profile, F::StatSkills, creature.skills.as_ref()),
            abilities,
            senses,
            evolves_from,
            evolves_to,
            moves: moves_view(profile, creature, catalog, level),
        }
    }
}

fn moves_view(
    profile: &VisibilityProfile,
    creature: &Creature,
    catalog: &[Move],
    level: Option<u8>,
) -> Option<MovesView> {
    if !profile.get(VisibilityField::Moves) {
        return None;
    }
    let cap = profile.moves_max_level();
    let level = level.map_or(cap, |level| level.min(cap));

    let groups: Vec<MoveGroup> = creature
        .moves
        .iter()
        .filter_map(|(tier, names)| {
            let visible: Vec<&String> = names
                .iter()
                .filter(|name| tier.unlocked_at(level) || profile.is_extra_visible(name))
                .collect();
            if visible.is_empty() {
                return None;
            }
            let moves = visible
                .iter()
                .filter_map(|name| catalog.iter().find(|m| m.name.eq_ignore_ascii_case(name)))
                .cloned()
                .collect();
            Some(MoveGroup {
                tier,
                title: tier.to_string(),
                moves,
                hidden: names.len() - visible.len(),
            })
        })
        .collect();

    (!groups.is_empty()).then_some(MovesView { level, groups })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{creature, move_record};
    use dex_core::Senses;

    fn emberfox() -> Creature {
        let mut ember = creature(
            4,
            "Emberfox",
            "Fire",
            [
                Some("Scratch, Ember"),
                Some("Growl"),
                Some("Flame Burst, Smokescreen"),
                None,
                None,
                None,
            ],
        );
        ember.size = Some("Small".into());
        ember.classification = Some("Fox Pokémon".into());
        ember.combat.ac = Some("13".into());
        ember.evolution_req = Some("Evolves: Pyrovix @ Level 16".into());
        let mut senses: [Option<String>; 9] = Default::default();
        senses[Sense::Darkvision.as_index()] = Some("60 ft".into());
        senses[Sense::Telepathy.as_index()] = Some("30 ft".into());
        senses[Sense::Sight.as_index()] = Some("120 ft".into());
        senses[Sense::Blindsight.as_index()] = Some("no".into());
        ember.senses = Senses::from_values(senses);
        ember
    }

    fn catalog() -> Vec<Move> {
        ["Scratch", "Ember", "Growl", "Flame Burst"]
            .into_iter()
            .map(|name| move_record(name, "Fire"))
            .collect()
    }

    #[test]
    fn test_default_profile_shows_identity_groups_only() {
        let card = CardView::build(&VisibilityProfile::default(), &emberfox(), &catalog(), None);
        assert_eq!(card.primary_type.as_deref(), Some("Fire"));
        assert_eq!(card.characteristics.len(), 1);
        assert_eq!(card.characteristics[0].label, "Size");
        assert!(card.description.is_some());
        assert!(card.combat.is_empty());
        assert!(card.abilities.is_empty());
        assert!(card.senses.is_empty());
        assert!(card.evolves_to.is_empty());
        assert!(card.moves.is_none());
    }

    #[test]
    fn test_senses_follow_their_gates() {
        let mut profile = VisibilityProfile::default();
        profile.set(VisibilityField::SenseDarkvision, true);
        profile.set(VisibilityField::SenseMindsense, true);
        profile.set(VisibilityField::SenseBlindsight, true);

        let card = CardView::build(&profile, &emberfox(), &catalog(), None);
        let senses: Vec<Sense> = card.senses.iter().map(|s| s.sense).collect();
        assert_eq!(senses, vec![Sense::Telepathy, Sense::Darkvision]);
    }

    #[test]
    fn test_move_groups_count_hidden_moves() {
        let mut profile = VisibilityProfile::default();
        profile.set(VisibilityField::Moves, true);
        profile.set_moves_max_level(2);
        profile.set_extra_visible("flame burst", true);

        let card = CardView::build(&profile, &emberfox(), &catalog(), Some(20));
        let moves = card.moves.unwrap();
        assert_eq!(moves.level, 2);
        assert_eq!(moves.groups.len(), 3);

        let third = &moves.groups[2];
        assert_eq!(third.title, "Level 6");
        assert_eq!(third.hidden, 1);
        assert_eq!(third.moves.len(), 1);
        assert_eq!(third.moves[0].name, "Flame Burst");
    }

    #[test]
    fn test_requested_level_narrows_groups() {
        let mut profile = VisibilityProfile::default();
        profile.set(VisibilityField::Moves, true);
        profile.set_moves_max_level(20);

        let card = CardView::build(&profile, &emberfox(), &catalog(), Some(1));
        let moves = card.moves.unwrap();
        assert_eq!(moves.level, 1);
        assert_eq!(moves.groups.len(), 1);
        assert_eq!(moves.groups[0].moves.len(), 2);
    }

    #[test]
    fn test_evolution_directions_are_gated_separately() {
        let mut profile = VisibilityProfile::default();
        profile.set(VisibilityField::EvoTo, true);
        let card = CardView::build(&profile, &emberfox(), &catalog(), None);
        assert_eq!(card.evolves_to.len(), 1);
        assert_eq!(card.evolves_to[0].target, "Pyrovix");
        assert!(card.evolves_from.is_none());
    }
}
