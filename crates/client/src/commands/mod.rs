//! Subcommands, split by who may run them.

mod admin;
mod browse;

pub use admin::{
    ClearCache, ExtraMove, ExtraSearchable, Import, Login, Refresh, Register, SetDefault, SetField,
    SetVisibility, Splash, Unregister,
};
pub use browse::{Card, Export, List, MoveList, Moves, Search, Searchable, Stats};
