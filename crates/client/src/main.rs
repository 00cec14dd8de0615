//! Command-line front end for the creature compendium.
//!
//! Configuration comes from the environment (and `.env`), see
//! [`dex_runtime::RuntimeConfig::from_env`]. The cache lives on disk, so an
//! admin session opened with `dex login` carries over to later invocations
//! until it expires.
//!
//! ```bash
//! dex search fire -f habitat=forest
//! dex card Emberfox --level 6
//! dex login <secret> && dex set-field Emberfox moves true
//! ```

mod commands;
mod logging;

use anyhow::{Context, Result};
use clap::Parser;
use commands::{
    Card, ClearCache, Export, ExtraMove, ExtraSearchable, Import, List, Login, MoveList, Moves,
    Refresh, Register, Search, Searchable, SetDefault, SetField, SetVisibility, Splash, Stats,
    Unregister,
};
use dex_runtime::{Dex, RuntimeConfig};

/// Browse and curate the creature compendium
#[derive(Parser)]
#[command(name = "dex")]
#[command(about = "Creature compendium reader and admin tools", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Parser)]
enum Command {
    /// Search registered creatures by name, id or type
    Search(Search),

    /// Look up a creature's moves or search searchable moves
    Moves(Moves),

    /// Show the visible card of a registered creature
    Card(Card),

    /// Registration counts and cache status
    Stats(Stats),

    /// Print the visibility config as JSON
    Export(Export),

    /// Open an admin session
    Login(Login),

    /// Close the admin session
    Logout,

    /// List creatures with their registration state
    List(List),

    /// Show a creature's tier moves as the move editor sees them
    MoveList(MoveList),

    /// List catalog moves and whether move search can reach them
    Searchable(Searchable),

    /// Publish creatures
    Register(Register),

    /// Withdraw creatures
    Unregister(Unregister),

    /// Set one visibility field of a creature
    SetField(SetField),

    /// Set one field of the shared defaults
    SetDefault(SetDefault),

    /// Reveal every field of a creature
    ShowAll(SetVisibility),

    /// Hide every field of a creature
    HideAll(SetVisibility),

    /// Add (or with --remove, drop) a move on a creature's visible whitelist
    ExtraMove(ExtraMove),

    /// Add (or with --remove, drop) a move on the global search whitelist
    ExtraSearchable(ExtraSearchable),

    /// Set how many creatures the landing page features
    Splash(Splash),

    /// Replace the visibility config with a JSON file
    Import(Import),

    /// Re-fetch the remote visibility config
    Refresh(Refresh),

    /// Drop every cached entry
    ClearCache(ClearCache),
}

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    logging::setup_logging()?;

    let settings = RuntimeConfig::from_env();
    match &settings.cache_dir {
        Some(dir) => tracing::debug!("Cache directory: {}", dir.display()),
        None => tracing::debug!("No cache directory, caching in memory"),
    }

    let mut dex = Dex::builder()
        .settings(settings)
        .load()
        .await
        .context("Failed to load the compendium")?;

    match cli.command {
        Command::Search(cmd) => cmd.execute(&dex),
        Command::Moves(cmd) => cmd.execute(&dex),
        Command::Card(cmd) => cmd.execute(&dex),
        Command::Stats(cmd) => cmd.execute(&dex),
        Command::Export(cmd) => cmd.execute(&dex),
        Command::Login(cmd) => cmd.execute(&mut dex),
        Command::Logout => {
            dex.logout();
            println!("Logged out");
            Ok(())
        }
        Command::List(cmd) => cmd.execute(&dex),
        Command::MoveList(cmd) => cmd.execute(&dex),
        Command::Searchable(cmd) => cmd.execute(&dex),
        Command::Register(cmd) => cmd.execute(&mut dex),
        Command::Unregister(cmd) => cmd.execute(&mut dex),
        Command::SetField(cmd) => cmd.execute(&mut dex),
        Command::SetDefault(cmd) => cmd.execute(&mut dex),
        Command::ShowAll(cmd) => cmd.execute(&mut dex, true),
        Command::HideAll(cmd) => cmd.execute(&mut dex, false),
        Command::ExtraMove(cmd) => cmd.execute(&mut dex),
        Command::ExtraSearchable(cmd) => cmd.execute(&mut dex),
        Command::Splash(cmd) => cmd.execute(&mut dex),
        Command::Import(cmd) => cmd.execute(&mut dex),
        Command::Refresh(cmd) => cmd.execute(&mut dex).await,
        Command::ClearCache(cmd) => cmd.execute(&mut dex),
    }
}
