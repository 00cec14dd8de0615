pub mod config;
pub mod creature;
pub mod evolution;
mod ledger;
pub mod moves;
pub mod resolve;
pub mod visibility;

pub use config::{ConfigDocument, DEFAULT_SPLASH_COUNT, VisibilityConfig};
pub use creature::{
    Ability, AbilityScores, CombatStats, Creature, Facet, Movement, Sense, Senses, slugify,
};
pub use evolution::{Evolution, EvolutionEdge, EvolutionOrigin, parse_evolution};
pub use moves::{Move, MoveTiers, Tier, sanitize_move_list};
pub use resolve::{SearchableMoves, exposed_moves, moves_up_to_level, searchable_moves};
pub use visibility::{
    DEFAULT_MOVES_LEVEL, FieldError, FieldGroup, MAX_MOVES_LEVEL, ProfileEdit, ProfileOverride,
    VisibilityField, VisibilityProfile,
};
