//! Record builders shared by unit tests.

use dex_core::{Ability, Creature, Move, MoveTiers, Senses};

pub(crate) fn creature(
    id: u32,
    name: &str,
    primary_type: &str,
    tiers: [Option<&str>; 6],
) -> Creature {
    Creature {
        id,
        name: name.to_string(),
        image: None,
        classification: None,
        flavor_text: None,
        primary_type: primary_type.to_string(),
        secondary_type: None,
        size: None,
        rarity: None,
        habitat: None,
        behavior: None,
        activity: None,
        evolution_req: None,
        primary_ability: Ability::new("Run Away", None),
        secondary_ability: None,
        hidden_ability: None,
        catch_difficulty: None,
        level: None,
        combat: Default::default(),
        scores: Default::default(),
        saving_throws: None,
        skills: None,
        moves: MoveTiers::from_cells(tiers),
        move_pool: Vec::new(),
        movement: Default::default(),
        senses: Senses::default(),
    }
}

pub(crate) fn move_record(name: &str, move_type: &str) -> Move {
    Move {
        name: name.to_string(),
        move_type: move_type.to_string(),
        power: None,
        time: "1 action".to_string(),
        vp: "1".to_string(),
        duration: "Instant".to_string(),
        range: "Melee".to_string(),
        description: format!("{name} description."),
        higher: None,
    }
}
