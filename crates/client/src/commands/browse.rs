//! Reader commands. None of these need an admin session.

use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, Result};
use clap::Parser;
use serde_json::json;

use dex_core::{EvolutionOrigin, Facet, Move, VisibilityField};
use dex_runtime::view::{CardView, Labeled};
use dex_runtime::{Dex, MoveSearch, SearchQuery, parse_level};

/// Search registered creatures
#[derive(Parser)]
pub struct Search {
    /// Name or type fragment, or an exact id
    #[arg(value_name = "TERM", default_value = "")]
    term: String,

    /// Facet filter such as `habitat=forest`, repeatable
    #[arg(short, long = "filter", value_name = "FACET=VALUE", value_parser = parse_filter)]
    filters: Vec<(Facet, String)>,

    /// Result page, starting at 1
    #[arg(short, long, default_value_t = 1)]
    page: usize,

    /// Print the page as JSON
    #[arg(long)]
    json: bool,
}

fn parse_filter(raw: &str) -> std::result::Result<(Facet, String), String> {
    let (facet, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected FACET=VALUE, got `{raw}`"))?;
    let facet = Facet::from_str(facet.trim()).map_err(|_| {
        let known: Vec<String> = Facet::all().map(|f| f.to_string()).collect();
        format!("unknown facet `{facet}`, expected one of {}", known.join(", "))
    })?;
    Ok((facet, value.trim().to_string()))
}

impl Search {
    pub fn execute(self, dex: &Dex) -> Result<()> {
        let query = self
            .filters
            .into_iter()
            .fold(SearchQuery::new(self.term), |query, (facet, value)| {
                query.filter(facet, value)
            });
        let results = dex.search(&query);
        let page = results.page(self.page);

        if self.json {
            let entries: Vec<_> = page
                .iter()
                .map(|creature| json!({ "id": creature.id, "name": creature.name }))
                .collect();
            let body = json!({
                "total": results.len(),
                "page": self.page,
                "pageCount": results.page_count(),
                "results": entries,
            });
            println!("{}", serde_json::to_string_pretty(&body)?);
            return Ok(());
        }

        if results.is_empty() {
            println!("No creatures found");
            return Ok(());
        }
        for creature in page {
            let profile = dex.resolve(&creature.name);
            let mut types = Vec::new();
            if profile.get(VisibilityField::PrimaryType) {
                types.push(creature.primary_type.as_str());
            }
            if profile.get(VisibilityField::SecondaryType) {
                types.extend(creature.secondary_type.as_deref());
            }
            println!("#{:<4} {:<20} {}", creature.id, creature.name, types.join(" / "));
        }
        println!(
            "Page {} of {} ({} results)",
            self.page,
            results.page_count(),
            results.len()
        );
        Ok(())
    }
}

/// Look up a registered creature's moves, or search searchable moves
#[derive(Parser)]
pub struct Moves {
    /// A creature name, or a move name or type fragment
    #[arg(value_name = "TERM")]
    term: String,

    /// Level for creature lookups (defaults to 20)
    #[arg(short, long, value_name = "LEVEL")]
    level: Option<String>,
}

impl Moves {
    pub fn execute(self, dex: &Dex) -> Result<()> {
        let level = parse_level(self.level.as_deref());
        match dex.move_search(&self.term, level) {
            MoveSearch::Empty => println!("Enter a creature or move name"),
            MoveSearch::NotRegistered(creature) => {
                println!("{} has not been registered yet", creature.name)
            }
            MoveSearch::MovesUndiscovered(creature) => {
                println!("{}'s moves have not been discovered yet", creature.name)
            }
            MoveSearch::Creature {
                creature,
                level,
                moves,
            } => {
                println!("{} at level {}:", creature.name, level);
                print_moves(&moves);
            }
            MoveSearch::Moves { total, moves } => {
                if moves.is_empty() {
                    println!("No moves found");
                } else {
                    print_moves(&moves);
                    if total > moves.len() {
                        println!("Showing {} of {} moves", moves.len(), total);
                    }
                }
            }
        }
        Ok(())
    }
}

fn print_moves(moves: &[&Move]) {
    for m in moves {
        println!("  {}", move_line(m));
    }
}

fn move_line(m: &Move) -> String {
    let mut line = format!("{} [{}]", m.name, m.move_type);
    if let Some(power) = &m.power {
        line.push_str(&format!(" {power}"));
    }
    for (label, value) in [("time", &m.time), ("vp", &m.vp), ("range", &m.range)] {
        if !value.is_empty() {
            line.push_str(&format!(" | {label}: {value}"));
        }
    }
    line
}

/// Show the card of a registered creature
#[derive(Parser)]
pub struct Card {
    #[arg(value_name = "CREATURE")]
    name: String,

    /// Cap the listed moves at this level
    #[arg(short, long)]
    level: Option<u8>,

    /// Print the card as JSON
    #[arg(long)]
    json: bool,
}

impl Card {
    pub fn execute(self, dex: &Dex) -> Result<()> {
        let card = dex.card(&self.name, self.level)?;
        if self.json {
            println!("{}", serde_json::to_string_pretty(&card)?);
        } else {
            print_card(&card);
        }
        Ok(())
    }
}

fn print_labeled(title: &str, entries: &[Labeled]) {
    if entries.is_empty() {
        return;
    }
    let line: Vec<String> = entries
        .iter()
        .map(|entry| format!("{}: {}", entry.label, entry.value))
        .collect();
    println!("{title}: {}", line.join(", "));
}

fn print_card(card: &CardView) {
    println!("#{} {}", card.id, card.name);
    let types: Vec<&str> = [&card.primary_type, &card.secondary_type]
        .into_iter()
        .filter_map(|t| t.as_deref())
        .collect();
    if !types.is_empty() {
        println!("Type: {}", types.join(" / "));
    }
    if let Some(image) = &card.image {
        println!("Image: {image}");
    }
    if let Some(description) = &card.description {
        if let Some(classification) = &description.classification {
            println!("{classification}");
        }
        if let Some(flavor) = &description.flavor_text {
            println!("{flavor}");
        }
    }

    print_labeled("Characteristics", &card.characteristics);
    print_labeled("Combat", &card.combat);
    print_labeled("Scores", &card.scores);
    if let Some(saves) = &card.saving_throws {
        println!("Saving throws: {saves}");
    }
    if let Some(skills) = &card.skills {
        println!("Skills: {skills}");
    }

    for view in &card.abilities {
        println!(
            "Ability ({:?}): {} - {}",
            view.slot, view.ability.name, view.ability.description
        );
    }
    if !card.senses.is_empty() {
        let senses: Vec<String> = card
            .senses
            .iter()
            .map(|s| format!("{} {}", s.sense, s.value))
            .collect();
        println!("Senses: {}", senses.join(", "));
    }

    match &card.evolves_from {
        Some(EvolutionOrigin::Standard {
            source,
            requirement,
        }) => match requirement {
            Some(requirement) => println!("Evolves from {source} ({requirement})"),
            None => println!("Evolves from {source}"),
        },
        Some(EvolutionOrigin::Fusion { a, b, requirement }) => {
            println!("Fusion of {a} and {b} ({requirement})")
        }
        None => {}
    }
    for edge in &card.evolves_to {
        println!("Evolves into {} ({})", edge.target, edge.requirement);
    }

    if let Some(moves) = &card.moves {
        println!("Moves up to level {}:", moves.level);
        for group in &moves.groups {
            println!(" {}", group.title);
            for m in &group.moves {
                println!("  {}", move_line(m));
            }
            if group.hidden > 0 {
                println!("  ({} more not yet discovered)", group.hidden);
            }
        }
    }
}

/// Registration counts and cache status
#[derive(Parser)]
pub struct Stats {}

impl Stats {
    pub fn execute(self, dex: &Dex) -> Result<()> {
        let stats = dex.registration_stats();
        println!("Creatures:       {}", dex.creatures().len());
        println!("Registered:      {}", stats.registered);
        println!("Unregistered:    {}", stats.unregistered);
        println!("Moves:           {}", dex.moves().len());
        println!("Searchable:      {}", dex.searchable_count());
        println!("Splash count:    {}", dex.splash_count());
        match dex.last_cache_time() {
            Some(at) => println!("Last cached:     {}", at.format("%Y-%m-%d %H:%M:%S UTC")),
            None => println!("Last cached:     never"),
        }
        Ok(())
    }
}

/// Print or save the visibility config
#[derive(Parser)]
pub struct Export {
    /// Write to this file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,
}

impl Export {
    pub fn execute(self, dex: &Dex) -> Result<()> {
        let json = dex.export_config()?;
        match self.output {
            Some(path) => {
                std::fs::write(&path, json)
                    .with_context(|| format!("Failed to write {}", path.display()))?;
                println!("Config exported to {}", path.display());
            }
            None => println!("{json}"),
        }
        Ok(())
    }
}

/// List creatures with their registration state
#[derive(Parser)]
pub struct List {
    /// Name or id fragment
    #[arg(value_name = "FILTER", default_value = "")]
    filter: String,
}

impl List {
    pub fn execute(self, dex: &Dex) -> Result<()> {
        for creature in dex.admin_list(&self.filter) {
            let mark = if dex.config().is_registered(&creature.name) {
                "x"
            } else {
                " "
            };
            println!("[{mark}] #{:<4} {}", creature.id, creature.name);
        }
        Ok(())
    }
}

/// Show a creature's tier moves as the move editor sees them
#[derive(Parser)]
pub struct MoveList {
    #[arg(value_name = "CREATURE")]
    name: String,
}

impl MoveList {
    pub fn execute(self, dex: &Dex) -> Result<()> {
        for entry in dex.move_edit_list(&self.name)? {
            let state = match (entry.within_level, entry.manually_added) {
                (true, _) => "visible",
                (false, true) => "added",
                (false, false) => "locked",
            };
            println!("{:<8} L{:<3} {:<24} {}", state, entry.level, entry.name, entry.tier);
        }
        Ok(())
    }
}

/// List catalog moves and how move search reaches them
#[derive(Parser)]
pub struct Searchable {
    /// Move name or type fragment
    #[arg(value_name = "FILTER", default_value = "")]
    filter: String,
}

impl Searchable {
    pub fn execute(self, dex: &Dex) -> Result<()> {
        let entries = dex.searchable_admin_list(&self.filter);
        for entry in &entries {
            let reach = match (entry.via_creature, entry.extra) {
                (true, true) => "creature+extra",
                (true, false) => "creature",
                (false, true) => "extra",
                (false, false) => "-",
            };
            println!("{:<15} {:<24} {}", reach, entry.name, entry.move_type);
        }
        let searchable = entries.iter().filter(|e| e.is_searchable()).count();
        println!("{} of {} listed moves are searchable", searchable, entries.len());
        Ok(())
    }
}
