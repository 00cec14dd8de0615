//! Public runtime API surface.
//!
//! Gathers the error types exposed to consumers so the rest of the crate can
//! stay focused on loading, resolution and mutation.

pub mod errors;

pub use errors::{Dataset, Result, RuntimeError};
