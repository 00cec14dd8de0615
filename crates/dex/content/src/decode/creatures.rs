//! Creature row decoding.

use dex_core::{
    Ability, AbilityScores, CombatStats, Creature, MoveTiers, Movement, Sense, Senses, Tier,
};
use serde_json::Value;
use strum::EnumCount;

use super::{Decoded, RowError, cell};

/// Fixed column indices of a creature row.
pub mod column {
    use std::ops::Range;

    pub const ID: usize = 1;
    pub const NAME: usize = 2;
    pub const CLASSIFICATION: usize = 5;
    pub const FLAVOR_TEXT: usize = 6;
    pub const PRIMARY_TYPE: usize = 7;
    pub const SECONDARY_TYPE: usize = 8;
    pub const SIZE: usize = 9;
    pub const RARITY: usize = 10;
    pub const HABITAT: usize = 11;
    pub const BEHAVIOR: usize = 12;
    pub const ACTIVITY: usize = 13;
    pub const EVOLUTION: usize = 14;
    pub const PRIMARY_ABILITY: usize = 15;
    pub const SECONDARY_ABILITY: usize = 16;
    pub const HIDDEN_ABILITY: usize = 17;
    pub const CATCH_DIFFICULTY: usize = 18;
    pub const LEVEL: usize = 19;
    pub const AC: usize = 20;
    pub const HIT_DICE: usize = 21;
    pub const HP: usize = 22;
    pub const VITALITY_DICE: usize = 23;
    pub const VP: usize = 24;
    pub const SPEED: usize = 25;
    /// STR, DEX, CON, INT, WIS, CHA.
    pub const SCORES: Range<usize> = 27..33;
    pub const SAVING_THROWS: usize = 33;
    pub const SKILLS: usize = 34;
    /// One column per move tier, lowest level first.
    pub const MOVE_TIERS: Range<usize> = 35..41;
    pub const MOVE_POOL: Range<usize> = 41..62;
    pub const PRIMARY_ABILITY_TEXT: usize = 62;
    pub const SECONDARY_ABILITY_TEXT: usize = 63;
    pub const HIDDEN_ABILITY_TEXT: usize = 64;
    /// Walking, climbing, flying, hovering, swimming, burrowing.
    pub const MOVEMENT: Range<usize> = 65..71;
    /// One column per [`dex_core::Sense`], in declaration order.
    pub const SENSES: Range<usize> = 71..80;
}

/// Decoder for the creature sheet.
pub struct CreatureRows;

impl CreatureRows {
    /// Decodes every row. Rows without a name are skipped silently; malformed
    /// rows are reported in [`Decoded::rejected`].
    pub fn decode(rows: &[Value]) -> Decoded<Creature> {
        let mut decoded = Decoded::default();
        for (index, row) in rows.iter().enumerate() {
            match Self::decode_row(index, row) {
                Ok(Some(creature)) => decoded.records.push(creature),
                Ok(None) => {}
                Err(err) => decoded.rejected.push(err),
            }
        }
        decoded
    }

    /// Decodes one row. `Ok(None)` means the row has no name and is not a record.
    pub fn decode_row(index: usize, row: &Value) -> Result<Option<Creature>, RowError> {
        let row = row.as_array().ok_or(RowError::NotAnArray { index })?;
        let Some(name) = cell(row, column::NAME) else {
            return Ok(None);
        };

        let raw_id = cell(row, column::ID).unwrap_or_default();
        let id = raw_id
            .parse::<u32>()
            .ok()
            .filter(|id| *id > 0)
            .ok_or_else(|| RowError::InvalidId {
                index,
                name: name.clone(),
                value: raw_id.clone(),
            })?;

        let primary_type =
            cell(row, column::PRIMARY_TYPE).ok_or_else(|| RowError::MissingPrimaryType {
                index,
                name: name.clone(),
            })?;
        let primary_ability = cell(row, column::PRIMARY_ABILITY)
            .map(|ability| Ability::new(ability, cell(row, column::PRIMARY_ABILITY_TEXT)))
            .ok_or_else(|| RowError::MissingPrimaryAbility {
                index,
                name: name.clone(),
            })?;

        Ok(Some(Creature {
            id,
            image: None,
            classification: cell(row, column::CLASSIFICATION),
            flavor_text: cell(row, column::FLAVOR_TEXT),
            primary_type,
            secondary_type: cell(row, column::SECONDARY_TYPE),
            size: cell(row, column::SIZE),
            rarity: cell(row, column::RARITY),
            habitat: cell(row, column::HABITAT),
            behavior: cell(row, column::BEHAVIOR),
            activity: cell(row, column::ACTIVITY),
            evolution_req: cell(row, column::EVOLUTION),
            primary_ability,
            secondary_ability: cell(row, column::SECONDARY_ABILITY)
                .map(|ability| Ability::new(ability, cell(row, column::SECONDARY_ABILITY_TEXT))),
            hidden_ability: cell(row, column::HIDDEN_ABILITY)
                .map(|ability| Ability::new(ability, cell(row, column::HIDDEN_ABILITY_TEXT))),
            catch_difficulty: cell(row, column::CATCH_DIFFICULTY),
            level: cell(row, column::LEVEL),
            combat: CombatStats {
                ac: cell(row, column::AC),
                hit_dice: cell(row, column::HIT_DICE),
                hp: cell(row, column::HP),
                vitality_dice: cell(row, column::VITALITY_DICE),
                vp: cell(row, column::VP),
                speed: cell(row, column::SPEED),
            },
            scores: decode_scores(row),
            saving_throws: cell(row, column::SAVING_THROWS),
            skills: cell(row, column::SKILLS),
            moves: decode_tiers(row),
            move_pool: column::MOVE_POOL.filter_map(|i| cell(row, i)).collect(),
            movement: decode_movement(row),
            senses: decode_senses(row),
            name,
        }))
    }
}

fn decode_scores(row: &[Value]) -> AbilityScores {
    let [strength, dexterity, constitution, intelligence, wisdom, charisma] =
        range_cells::<6>(row, column::SCORES.start);
    AbilityScores {
        strength,
        dexterity,
        constitution,
        intelligence,
        wisdom,
        charisma,
    }
}

fn decode_movement(row: &[Value]) -> Movement {
    let [walking, climbing, flying, hovering, swimming, burrowing] =
        range_cells::<6>(row, column::MOVEMENT.start);
    Movement {
        walking,
        climbing,
        flying,
        hovering,
        swimming,
        burrowing,
    }
}

fn decode_tiers(row: &[Value]) -> MoveTiers {
    let cells = range_cells::<{ Tier::COUNT }>(row, column::MOVE_TIERS.start);
    MoveTiers::from_cells(std::array::from_fn(|i| cells[i].as_deref()))
}

fn decode_senses(row: &[Value]) -> Senses {
    Senses::from_values(range_cells::<{ Sense::COUNT }>(row, column::SENSES.start))
}

fn range_cells<const N: usize>(row: &[Value], start: usize) -> [Option<String>; N] {
    std::array::from_fn(|offset| cell(row, start + offset))
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use dex_core::{Sense, Tier};
    use serde_json::json;

    /// A sheet row with every column blank except the ones given.
    pub(crate) fn sheet_row(cells: &[(usize, Value)]) -> Value {
        let mut row = vec![json!(""); 80];
        for (index, value) in cells {
            row[*index] = value.clone();
        }
        Value::Array(row)
    }

    fn emberfox_row() -> Value {
        sheet_row(&[
            (column::ID, json!(4)),
            (column::NAME, json!("Emberfox")),
            (column::PRIMARY_TYPE, json!("Fire")),
            (column::PRIMARY_ABILITY, json!("Blaze")),
            (column::SECONDARY_ABILITY, json!("Quick Feet")),
            (column::SECONDARY_ABILITY_TEXT, json!("Runs fast.")),
            (column::AC, json!(13)),
            (column::SCORES.start, json!(8)),
            (column::SCORES.start + 5, json!(14)),
            (column::MOVE_TIERS.start, json!("Scratch, Ember")),
            (column::MOVE_TIERS.start + 2, json!("Flame Burst")),
            (column::MOVE_POOL.start, json!("Tackle")),
            (column::MOVE_POOL.start + 3, json!("Growl")),
            (column::MOVEMENT.start, json!("30 ft")),
            (column::SENSES.start + Sense::Darkvision.as_index(), json!("60 ft")),
            (column::EVOLUTION, json!("Evolves: Pyrovix @ Level 16")),
        ])
    }

    #[test]
    fn test_decode_full_row() {
        let creature = CreatureRows::decode_row(0, &emberfox_row()).unwrap().unwrap();

        assert_eq!(creature.id, 4);
        assert_eq!(creature.name, "Emberfox");
        assert_eq!(creature.primary_type, "Fire");
        assert_eq!(creature.secondary_type, None);
        assert_eq!(creature.primary_ability.description, Ability::MISSING_DESCRIPTION);
        let secondary = creature.secondary_ability.as_ref().unwrap();
        assert_eq!(secondary.description, "Runs fast.");
        assert!(creature.hidden_ability.is_none());
        assert_eq!(creature.combat.ac.as_deref(), Some("13"));
        assert_eq!(creature.scores.strength.as_deref(), Some("8"));
        assert_eq!(creature.scores.charisma.as_deref(), Some("14"));
        assert_eq!(creature.moves.tier(Tier::Starting), ["Scratch", "Ember"]);
        assert_eq!(creature.moves.tier(Tier::Level6), ["Flame Burst"]);
        assert_eq!(creature.move_pool, vec!["Tackle", "Growl"]);
        assert_eq!(creature.movement.walking.as_deref(), Some("30 ft"));
        assert_eq!(creature.senses.present(Sense::Darkvision), Some("60 ft"));
        assert_eq!(creature.evolution().evolves_to[0].target, "Pyrovix");
    }

    #[test]
    fn test_nameless_rows_are_skipped() {
        let rows = vec![
            sheet_row(&[(column::ID, json!(1))]),
            emberfox_row(),
            json!("garbage"),
        ];
        let decoded = CreatureRows::decode(&rows);
        assert_eq!(decoded.records.len(), 1);
        assert_eq!(decoded.rejected, vec![RowError::NotAnArray { index: 2 }]);
    }

    #[test]
    fn test_invalid_id_is_rejected() {
        let row = sheet_row(&[
            (column::ID, json!("abc")),
            (column::NAME, json!("Oddity")),
            (column::PRIMARY_TYPE, json!("Normal")),
            (column::PRIMARY_ABILITY, json!("Odd")),
        ]);
        assert!(matches!(
            CreatureRows::decode_row(3, &row),
            Err(RowError::InvalidId { index: 3, .. })
        ));
    }

    #[test]
    fn test_short_rows_decode_missing_columns_as_absent() {
        let row = json!(["", 9, "Tiny", "", "", "", "", "Bug", "", "", "", "", "", "", "", "Swarm"]);
        let creature = CreatureRows::decode_row(0, &row).unwrap().unwrap();
        assert_eq!(creature.id, 9);
        assert!(creature.moves.is_empty());
        assert!(creature.senses.iter_present().next().is_none());
    }
}
