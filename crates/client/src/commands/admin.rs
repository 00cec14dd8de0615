//! Admin commands. Every edit goes through [`Dex::apply`], which persists the
//! config to the cache before returning.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser};

use dex_core::ProfileEdit;
use dex_runtime::{Dex, Mutation, Outcome, RuntimeError};

/// Opens a session first when `--secret` is passed, so one-off edits do not
/// need a separate `dex login`.
#[derive(Args)]
pub struct Auth {
    /// Admin secret
    #[arg(long, value_name = "SECRET")]
    secret: Option<String>,
}

impl Auth {
    fn apply(&self, dex: &mut Dex, mutation: Mutation) -> Result<Outcome> {
        if let Some(secret) = &self.secret {
            dex.login(secret)?;
        }
        match dex.apply(mutation) {
            Err(RuntimeError::NotAuthenticated) => {
                anyhow::bail!("Admin session required: run `dex login` or pass --secret")
            }
            result => Ok(result?),
        }
    }
}

fn report(outcome: Outcome) {
    match outcome {
        Outcome::Updated => println!("Updated"),
        Outcome::Listed(true) => println!("Listed"),
        Outcome::Listed(false) => println!("Not listed"),
        Outcome::Changed(count) => println!("{count} changed"),
        Outcome::SplashCount(count) => println!("Splash count is now {count}"),
    }
}

/// Open an admin session
#[derive(Parser)]
pub struct Login {
    #[arg(value_name = "SECRET")]
    secret: String,
}

impl Login {
    pub fn execute(self, dex: &mut Dex) -> Result<()> {
        dex.login(&self.secret)?;
        println!("Logged in");
        Ok(())
    }
}

/// Publish creatures
#[derive(Parser)]
pub struct Register {
    #[arg(value_name = "CREATURE", required_unless_present = "all")]
    names: Vec<String>,

    /// Register every creature in the catalog
    #[arg(long)]
    all: bool,

    #[command(flatten)]
    auth: Auth,
}

impl Register {
    pub fn execute(self, dex: &mut Dex) -> Result<()> {
        let names: Vec<String> = if self.all {
            dex.creatures().iter().map(|c| c.name.clone()).collect()
        } else {
            self.names
        };
        report(self.auth.apply(dex, Mutation::Register(names))?);
        Ok(())
    }
}

/// Withdraw creatures
#[derive(Parser)]
pub struct Unregister {
    #[arg(value_name = "CREATURE", required_unless_present = "all")]
    names: Vec<String>,

    /// Withdraw every registered creature
    #[arg(long)]
    all: bool,

    #[command(flatten)]
    auth: Auth,
}

impl Unregister {
    pub fn execute(self, dex: &mut Dex) -> Result<()> {
        let names: Vec<String> = if self.all {
            dex.config().registered().to_vec()
        } else {
            self.names
        };
        report(self.auth.apply(dex, Mutation::Unregister(names))?);
        Ok(())
    }
}

/// Set one visibility field of a creature
#[derive(Parser)]
pub struct SetField {
    #[arg(value_name = "CREATURE")]
    creature: String,

    /// Field key such as `statAC`, `movesMaxLevel` or `extraVisibleMoves`
    #[arg(value_name = "FIELD")]
    field: String,

    /// `true`/`false`, a level, or a comma-separated move list
    #[arg(value_name = "VALUE")]
    value: String,

    #[command(flatten)]
    auth: Auth,
}

impl SetField {
    pub fn execute(self, dex: &mut Dex) -> Result<()> {
        let edit = ProfileEdit::parse(&self.field, &self.value)?;
        let mutation = Mutation::SetField {
            creature: self.creature,
            edit,
        };
        report(self.auth.apply(dex, mutation)?);
        Ok(())
    }
}

/// Set one field of the shared defaults
#[derive(Parser)]
pub struct SetDefault {
    #[arg(value_name = "FIELD")]
    field: String,

    #[arg(value_name = "VALUE")]
    value: String,

    #[command(flatten)]
    auth: Auth,
}

impl SetDefault {
    pub fn execute(self, dex: &mut Dex) -> Result<()> {
        let edit = ProfileEdit::parse(&self.field, &self.value)?;
        report(self.auth.apply(dex, Mutation::SetDefault(edit))?);
        Ok(())
    }
}

/// Show or hide every field of a creature
#[derive(Parser)]
pub struct SetVisibility {
    #[arg(value_name = "CREATURE")]
    creature: String,

    #[command(flatten)]
    auth: Auth,
}

impl SetVisibility {
    pub fn execute(self, dex: &mut Dex, visible: bool) -> Result<()> {
        let mutation = Mutation::SetAllVisibility {
            creature: self.creature,
            visible,
        };
        report(self.auth.apply(dex, mutation)?);
        Ok(())
    }
}

/// Add a move to a creature's visible whitelist, or remove it
#[derive(Parser)]
pub struct ExtraMove {
    #[arg(value_name = "CREATURE")]
    creature: String,

    #[arg(value_name = "MOVE")]
    name: String,

    /// Remove the move instead of adding it
    #[arg(long)]
    remove: bool,

    #[command(flatten)]
    auth: Auth,
}

impl ExtraMove {
    pub fn execute(self, dex: &mut Dex) -> Result<()> {
        let mutation = Mutation::SetExtraVisibleMove {
            creature: self.creature,
            name: self.name,
            listed: !self.remove,
        };
        report(self.auth.apply(dex, mutation)?);
        Ok(())
    }
}

/// Add a move to the global search whitelist, or remove it
#[derive(Parser)]
pub struct ExtraSearchable {
    #[arg(value_name = "MOVE")]
    name: String,

    /// Remove the move instead of adding it
    #[arg(long)]
    remove: bool,

    #[command(flatten)]
    auth: Auth,
}

impl ExtraSearchable {
    pub fn execute(self, dex: &mut Dex) -> Result<()> {
        let mutation = Mutation::SetExtraSearchableMove {
            name: self.name,
            listed: !self.remove,
        };
        report(self.auth.apply(dex, mutation)?);
        Ok(())
    }
}

/// Set how many creatures the landing page features
#[derive(Parser)]
pub struct Splash {
    /// Clamped to 1..=99
    #[arg(value_name = "COUNT")]
    count: u32,

    #[command(flatten)]
    auth: Auth,
}

impl Splash {
    pub fn execute(self, dex: &mut Dex) -> Result<()> {
        report(self.auth.apply(dex, Mutation::SetSplashCount(self.count))?);
        Ok(())
    }
}

/// Replace the visibility config with a JSON file
#[derive(Parser)]
pub struct Import {
    #[arg(value_name = "FILE")]
    file: PathBuf,

    #[command(flatten)]
    auth: Auth,
}

impl Import {
    pub fn execute(self, dex: &mut Dex) -> Result<()> {
        let text = std::fs::read_to_string(&self.file)
            .with_context(|| format!("Failed to read {}", self.file.display()))?;
        if let Some(secret) = &self.auth.secret {
            dex.login(secret)?;
        }
        let outcome = dex
            .import_config(&text)
            .with_context(|| format!("Import of {} rejected", self.file.display()))?;
        report(outcome);
        Ok(())
    }
}

/// Re-fetch the remote visibility config
#[derive(Parser)]
pub struct Refresh {
    /// Fetch even if the cached config is still fresh
    #[arg(short, long)]
    force: bool,
}

impl Refresh {
    pub async fn execute(self, dex: &mut Dex) -> Result<()> {
        if dex.refresh_config(self.force).await {
            let stats = dex.registration_stats();
            println!("Config refreshed: {} registered", stats.registered);
        } else {
            println!("Cached config is still fresh, use --force to refetch");
        }
        Ok(())
    }
}

/// Drop every cached entry, the admin session included
#[derive(Parser)]
pub struct ClearCache {}

impl ClearCache {
    pub fn execute(self, dex: &mut Dex) -> Result<()> {
        dex.clear_cache();
        println!("Cache cleared");
        Ok(())
    }
}
