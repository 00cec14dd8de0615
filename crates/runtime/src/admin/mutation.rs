//! The closed set of admin edits to the visibility config.
//!
//! [`apply_mutation`] only touches the in-memory config. Persisting the result
//! and recomputing derived state is the caller's job, done once per call in
//! [`crate::Dex::apply`].

use std::fmt;

use dex_core::{
    Creature, DEFAULT_MOVES_LEVEL, ProfileEdit, VisibilityConfig, VisibilityField,
    VisibilityProfile,
};

use crate::api::{Result, RuntimeError};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Mutation {
    /// Set one field of a creature's override, creating it from the defaults.
    SetField { creature: String, edit: ProfileEdit },
    /// Show or hide every field of a creature at once.
    SetAllVisibility { creature: String, visible: bool },
    /// Edit the shared defaults. Existing overrides are left alone.
    SetDefault(ProfileEdit),
    /// List or unlist a move on a creature's manual whitelist.
    SetExtraVisibleMove {
        creature: String,
        name: String,
        listed: bool,
    },
    /// List or unlist a move on the global search whitelist.
    SetExtraSearchableMove { name: String, listed: bool },
    Register(Vec<String>),
    Unregister(Vec<String>),
    SetSplashCount(u32),
    /// Swap in a whole config, e.g. a validated import.
    Replace(Box<VisibilityConfig>),
}

/// What a mutation did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    Updated,
    /// A whitelist edit ran; whether the name is listed afterwards.
    Listed(bool),
    /// Entries actually registered or unregistered.
    Changed(usize),
    /// The splash count as stored, after clamping.
    SplashCount(u32),
}

impl fmt::Display for Mutation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mutation::SetField { creature, edit } => write!(f, "set {edit} on {creature}"),
            Mutation::SetAllVisibility { creature, visible } => {
                let verb = if *visible { "show" } else { "hide" };
                write!(f, "{verb} all fields of {creature}")
            }
            Mutation::SetDefault(edit) => write!(f, "set default {edit}"),
            Mutation::SetExtraVisibleMove {
                creature,
                name,
                listed,
            } => {
                let verb = if *listed { "list" } else { "unlist" };
                write!(f, "{verb} visible move {name} on {creature}")
            }
            Mutation::SetExtraSearchableMove { name, listed } => {
                let verb = if *listed { "list" } else { "unlist" };
                write!(f, "{verb} searchable move {name}")
            }
            Mutation::Register(names) => write!(f, "register {}", names.join(", ")),
            Mutation::Unregister(names) => write!(f, "unregister {}", names.join(", ")),
            Mutation::SetSplashCount(count) => write!(f, "set splash count {count}"),
            Mutation::Replace(_) => write!(f, "replace config"),
        }
    }
}

/// Level 0 means "unset" everywhere else; store the default instead.
fn normalized(edit: ProfileEdit) -> ProfileEdit {
    match edit {
        ProfileEdit::MovesMaxLevel(0) => ProfileEdit::MovesMaxLevel(DEFAULT_MOVES_LEVEL),
        edit => edit,
    }
}

fn find<'a>(creatures: &'a [Creature], name: &str) -> Result<&'a Creature> {
    creatures
        .iter()
        .find(|creature| creature.is_named(name.trim()))
        .ok_or_else(|| RuntimeError::UnknownCreature(name.to_string()))
}

/// The all-shown or all-hidden profile for `creature`. Flags for data the
/// creature lacks are always off.
pub fn uniform_profile(creature: &Creature, visible: bool) -> VisibilityProfile {
    let mut profile = VisibilityProfile::uniform(visible);
    if creature.secondary_type.is_none() {
        profile.set(VisibilityField::SecondaryType, false);
    }
    if creature.secondary_ability.is_none() {
        profile.set(VisibilityField::SecondaryAbility, false);
    }
    if creature.hidden_ability.is_none() {
        profile.set(VisibilityField::HiddenAbility, false);
    }
    profile
}

/// Applies one mutation. Names resolve to their catalog spelling; unknown
/// creatures fail before anything changes.
pub fn apply_mutation(
    config: &mut VisibilityConfig,
    creatures: &[Creature],
    mutation: Mutation,
) -> Result<Outcome> {
    let outcome = match mutation {
        Mutation::SetField { creature, edit } => {
            let creature = find(creatures, &creature)?;
            config.override_mut(&creature.name).apply(&normalized(edit));
            Outcome::Updated
        }
        Mutation::SetAllVisibility { creature, visible } => {
            let creature = find(creatures, &creature)?;
            config.set_override(&creature.name, uniform_profile(creature, visible));
            Outcome::Updated
        }
        Mutation::SetDefault(edit) => {
            config.defaults_mut().apply(&normalized(edit));
            Outcome::Updated
        }
        Mutation::SetExtraVisibleMove {
            creature,
            name,
            listed,
        } => {
            let creature = find(creatures, &creature)?;
            let profile = config.override_mut(&creature.name);
            profile.set_extra_visible(&name, listed);
            Outcome::Listed(profile.is_extra_visible(name.trim()))
        }
        Mutation::SetExtraSearchableMove { name, listed } => {
            config.set_extra_searchable(&name, listed);
            Outcome::Listed(config.is_extra_searchable(name.trim()))
        }
        Mutation::Register(names) => {
            let resolved = names
                .iter()
                .map(|name| find(creatures, name).map(|c| c.name.as_str()))
                .collect::<Result<Vec<_>>>()?;
            Outcome::Changed(config.register_all(resolved))
        }
        Mutation::Unregister(names) => {
            Outcome::Changed(config.unregister_all(names.iter().map(String::as_str)))
        }
        Mutation::SetSplashCount(count) => Outcome::SplashCount(config.set_splash_count(count)),
        Mutation::Replace(replacement) => {
            *config = *replacement;
            Outcome::Updated
        }
    };
    Ok(outcome)
}
