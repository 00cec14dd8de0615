//! Parser for the free-text evolution clause.
//!
//! Grammar, one sub-clause per `;`, keywords case-insensitive:
//!
//! ```text
//! Evolves: <target> @ <requirement>
//! From: <a> + <b> @ <requirement>
//! From: <source> [@ <requirement>]
//! ```
//!
//! Sub-clauses matching none of the forms are ignored. When several `From:`
//! clauses appear, the last one is kept.

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// One forward evolution edge.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvolutionEdge {
    pub target: String,
    pub requirement: String,
}

/// Where a creature evolves from.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum EvolutionOrigin {
    Standard {
        source: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        requirement: Option<String>,
    },
    Fusion {
        a: String,
        b: String,
        requirement: String,
    },
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Evolution {
    pub evolves_to: Vec<EvolutionEdge>,
    pub evolves_from: Option<EvolutionOrigin>,
}

impl Evolution {
    pub fn is_empty(&self) -> bool {
        self.evolves_to.is_empty() && self.evolves_from.is_none()
    }
}

fn evolves_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)^Evolves:\s*(.+?)\s*@\s*(.+)$").expect("evolves regex must compile")
    })
}

fn fusion_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)^From:\s*(.+?)\s*\+\s*(.+?)\s*@\s*(.+)$")
            .expect("fusion regex must compile")
    })
}

fn from_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)^From:\s*(.+?)(?:\s*@\s*(.+))?$").expect("from regex must compile")
    })
}

pub fn parse_evolution(clause: &str) -> Evolution {
    let mut evolution = Evolution::default();
    let clause = clause.trim();
    if clause.is_empty() || clause == "-" {
        return evolution;
    }

    for part in clause.split(';').map(str::trim).filter(|p| !p.is_empty()) {
        if let Some(caps) = evolves_re().captures(part) {
            evolution.evolves_to.push(EvolutionEdge {
                target: caps[1].trim().to_string(),
                requirement: caps[2].trim().to_string(),
            });
        } else if let Some(caps) = fusion_re().captures(part) {
            evolution.evolves_from = Some(EvolutionOrigin::Fusion {
                a: caps[1].trim().to_string(),
                b: caps[2].trim().to_string(),
                requirement: caps[3].trim().to_string(),
            });
        } else if let Some(caps) = from_re().captures(part) {
            evolution.evolves_from = Some(EvolutionOrigin::Standard {
                source: caps[1].trim().to_string(),
                requirement: caps.get(2).map(|m| m.as_str().trim().to_string()),
            });
        }
    }
    evolution
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn standard_origin_and_forward_edge() {
        let evo = parse_evolution("From: Emberfox @ Level 16; Evolves: Pyrovix @ Level 16");
        assert_eq!(
            evo.evolves_from,
            Some(EvolutionOrigin::Standard {
                source: "Emberfox".into(),
                requirement: Some("Level 16".into()),
            })
        );
        assert_eq!(
            evo.evolves_to,
            vec![EvolutionEdge {
                target: "Pyrovix".into(),
                requirement: "Level 16".into(),
            }]
        );

        let value = serde_json::to_value(&evo).unwrap();
        assert_eq!(value["evolvesFrom"]["type"], json!("standard"));
        assert_eq!(value["evolvesFrom"]["source"], json!("Emberfox"));
    }

    #[test]
    fn bare_from_has_no_requirement() {
        let evo = parse_evolution("from: Sparkit");
        assert_eq!(
            evo.evolves_from,
            Some(EvolutionOrigin::Standard {
                source: "Sparkit".into(),
                requirement: None,
            })
        );

        let value = serde_json::to_value(&evo).unwrap();
        assert_eq!(
            value["evolvesFrom"],
            json!({ "type": "standard", "source": "Sparkit" })
        );
    }

    #[test]
    fn fusion_origin() {
        let evo = parse_evolution("From: Aquapup + Leafkit @ Moon Stone");
        assert_eq!(
            evo.evolves_from,
            Some(EvolutionOrigin::Fusion {
                a: "Aquapup".into(),
                b: "Leafkit".into(),
                requirement: "Moon Stone".into(),
            })
        );
    }

    #[test]
    fn multiple_targets_and_last_from_wins() {
        let evo = parse_evolution(
            "Evolves: A @ Level 10; junk; Evolves: B @ Fire Stone; From: X; From: Y @ Trade",
        );
        assert_eq!(evo.evolves_to.len(), 2);
        assert_eq!(evo.evolves_to[1].target, "B");
        assert!(matches!(
            evo.evolves_from,
            Some(EvolutionOrigin::Standard { ref source, .. }) if source == "Y"
        ));
    }

    #[test]
    fn placeholder_yields_empty() {
        assert!(parse_evolution("-").is_empty());
        assert!(parse_evolution("   ").is_empty());
        assert!(parse_evolution("Evolves: nowhere").is_empty());
    }
}
