//! Shared domain models.

mod mustering;

use serde::{Deserialize, Serialize};

pub use mustering::{MusteringRule, RuleKind, RuleLimit};

/// A single selectable unit type from a faction's unit pool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Unit {
    /// Identifier, unique within the owning faction.
    pub id: String,
    /// Human-readable unit name.
    pub name: String,
    /// Keyword tags printed on the datasheet.
    #[serde(default)]
    pub keywords: Vec<String>,
    /// Point cost of a single selection.
    pub points: u32,
}

impl Unit {
    /// Case-insensitive substring match against id, name, and keywords.
    ///
    /// `needle` is expected to be lowercased already.
    pub(crate) fn matches(&self, needle: &str) -> bool {
        self.id.to_lowercase().contains(needle)
            || self.name.to_lowercase().contains(needle)
            || self
                .keywords
                .iter()
                .any(|keyword| keyword.to_lowercase().contains(needle))
    }
}

/// Named rule text attached to a detachment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetachmentRule {
    /// Rule title.
    pub name: String,
    /// Full rules text.
    pub description: String,
}

/// Optional upgrade that can be given to a character.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Enhancement {
    /// Enhancement title.
    pub name: String,
    /// Full rules text.
    pub description: String,
}

/// Detachment stratagem. The command point cost is carried as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stratagem {
    /// Stratagem title.
    pub name: String,
    /// Full rules text.
    pub description: String,
    /// Command point cost.
    pub cost: u32,
}

/// A detachment and the rule set that governs how its roster is mustered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detachment {
    /// Identifier, unique within the owning faction.
    pub id: String,
    /// Human-readable detachment name.
    pub name: String,
    /// The detachment's army rule.
    pub detachment_rule: DetachmentRule,
    /// Enhancements available to this detachment.
    #[serde(default)]
    pub enhancements: Vec<Enhancement>,
    /// Stratagems available to this detachment.
    #[serde(default)]
    pub stratagems: Vec<Stratagem>,
    /// Mustering rules in declared (display) order.
    #[serde(default)]
    pub mustering_rules: Vec<MusteringRule>,
}

impl Detachment {
    /// Rules that carry an allowed-unit set and therefore form a category,
    /// paired with their cap.
    pub fn displayable_rules(&self) -> impl Iterator<Item = (&MusteringRule, RuleLimit)> {
        self.mustering_rules
            .iter()
            .filter_map(|rule| Some((rule, rule.category_limit()?)))
    }
}

/// A playable faction with its unit pool and detachments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Faction {
    /// Short identifier (e.g. `space_marines`).
    pub id: String,
    /// Human-readable faction name.
    pub name: String,
    /// Unit pool in display order.
    #[serde(default)]
    pub units: Vec<Unit>,
    /// Detachments in display order.
    #[serde(default)]
    pub detachments: Vec<Detachment>,
}

impl Faction {
    /// Find a unit by its identifier.
    pub fn unit(&self, id: &str) -> Option<&Unit> {
        self.units.iter().find(|unit| unit.id == id)
    }

    /// Resolve a detachment by identifier. Empty or unknown ids yield `None`.
    pub fn detachment(&self, id: &str) -> Option<&Detachment> {
        if id.is_empty() {
            return None;
        }
        self.detachments.iter().find(|detachment| detachment.id == id)
    }

    /// Filter units using a case-insensitive substring search.
    pub fn units_matching(&self, query: &str) -> Vec<&Unit> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return self.units.iter().collect();
        }
        self.units
            .iter()
            .filter(|unit| unit.matches(&needle))
            .collect()
    }
}
