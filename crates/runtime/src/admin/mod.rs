//! Password-gated administration.
//!
//! - [`gate`] holds the shared-secret session and its expiry.
//! - [`mutation`] is the closed set of config edits, applied in one place.
//! - [`tools`] derives the read-only admin listings.

pub mod gate;
pub mod mutation;
pub mod tools;

pub use gate::{AdminGate, AdminSession};
pub use mutation::{Mutation, Outcome, apply_mutation};
pub use tools::{
    MoveEditEntry, RegistrationStats, SearchableMoveEntry, admin_list, move_edit_list,
    registration_stats, searchable_admin_list,
};
