//! Static catalog of factions, detachments, and units.

/// File-backed, cached catalog access.
pub mod loader;

use std::{collections::HashSet, fs, path::Path};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    error::{CatalogError, IntegrityIssue},
    models::{Detachment, Faction},
};

pub use loader::CatalogLoader;

/// Catalog as parsed from disk, before integrity checks.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogDocument {
    /// Factions in display order.
    #[serde(default)]
    pub factions: Vec<Faction>,
}

impl CatalogDocument {
    /// Parse a document from JSON text. `origin` names the source in errors.
    pub fn from_json_str(json: &str, origin: impl Into<String>) -> Result<Self, CatalogError> {
        serde_json::from_str(json).map_err(|source| CatalogError::Parse {
            origin: origin.into(),
            source,
        })
    }

    /// Read and parse a document from a file.
    pub fn read(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| CatalogError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&contents, path.display().to_string())
    }

    /// Check cross references and identifier uniqueness.
    ///
    /// Returns every issue found; an empty list means the document is sound.
    pub fn validate(&self) -> Vec<IntegrityIssue> {
        let mut issues = Vec::new();
        let mut faction_ids = HashSet::new();

        for faction in &self.factions {
            if !faction_ids.insert(faction.id.as_str()) {
                issues.push(IntegrityIssue::DuplicateFaction {
                    faction: faction.id.clone(),
                });
            }

            let mut unit_ids = HashSet::new();
            for unit in &faction.units {
                if !unit_ids.insert(unit.id.as_str()) {
                    issues.push(IntegrityIssue::DuplicateUnit {
                        faction: faction.id.clone(),
                        unit: unit.id.clone(),
                    });
                }
            }

            let mut detachment_ids = HashSet::new();
            for detachment in &faction.detachments {
                if !detachment_ids.insert(detachment.id.as_str()) {
                    issues.push(IntegrityIssue::DuplicateDetachment {
                        faction: faction.id.clone(),
                        detachment: detachment.id.clone(),
                    });
                }

                for rule in &detachment.mustering_rules {
                    for unit in rule.allowed_units.iter().flatten() {
                        if !unit_ids.contains(unit.as_str()) {
                            issues.push(IntegrityIssue::UnknownAllowedUnit {
                                faction: faction.id.clone(),
                                detachment: detachment.id.clone(),
                                category: rule.category_name.clone(),
                                unit: unit.clone(),
                            });
                        }
                    }
                }
            }
        }

        issues
    }
}

/// Validated, immutable catalog.
///
/// Construction fails fast on integrity issues, so every allowed unit of every
/// mustering rule is guaranteed to resolve within its faction.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Catalog {
    factions: Vec<Faction>,
}

impl TryFrom<CatalogDocument> for Catalog {
    type Error = CatalogError;

    fn try_from(document: CatalogDocument) -> Result<Self, Self::Error> {
        let issues = document.validate();
        if !issues.is_empty() {
            return Err(CatalogError::Integrity(issues));
        }
        debug!(factions = document.factions.len(), "catalog validated");
        Ok(Self {
            factions: document.factions,
        })
    }
}

impl Catalog {
    /// Parse and validate a catalog from JSON text.
    pub fn from_json_str(json: &str) -> Result<Self, CatalogError> {
        CatalogDocument::from_json_str(json, "<inline>")?.try_into()
    }

    /// Read, parse, and validate a catalog file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        CatalogDocument::read(path)?.try_into()
    }

    /// All factions in display order.
    pub fn factions(&self) -> &[Faction] {
        &self.factions
    }

    /// Resolve a faction by identifier. Empty or unknown ids yield `None`.
    pub fn faction(&self, id: &str) -> Option<&Faction> {
        if id.is_empty() {
            return None;
        }
        self.factions.iter().find(|faction| faction.id == id)
    }

    /// Resolve a detachment of the given faction.
    pub fn detachment<'a>(&self, faction: &'a Faction, id: &str) -> Option<&'a Detachment> {
        faction.detachment(id)
    }

    /// Filter factions using a case-insensitive substring search on id and name.
    pub fn factions_matching(&self, query: &str) -> Vec<&Faction> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return self.factions.iter().collect();
        }
        self.factions
            .iter()
            .filter(|faction| {
                faction.id.to_lowercase().contains(&needle)
                    || faction.name.to_lowercase().contains(&needle)
            })
            .collect()
    }
}
