//! Error types for catalog loading and roster commands.

use std::{fmt, path::PathBuf};

use thiserror::Error;

/// Failures while reading or validating a catalog document.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The catalog file could not be read.
    #[error("failed to read catalog {}: {source}", .path.display())]
    Read {
        /// Path of the catalog file.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// The document is not a well-formed catalog.
    #[error("failed to parse catalog {origin}: {source}")]
    Parse {
        /// File path or other description of where the document came from.
        origin: String,
        /// Underlying JSON failure.
        #[source]
        source: serde_json::Error,
    },

    /// The document parsed but references data that does not exist.
    #[error("catalog failed integrity checks: {}", join_issues(.0))]
    Integrity(Vec<IntegrityIssue>),
}

/// A single data-integrity problem found in a catalog document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntegrityIssue {
    /// Two factions share an identifier.
    DuplicateFaction {
        /// Repeated faction id.
        faction: String,
    },
    /// Two units of one faction share an identifier.
    DuplicateUnit {
        /// Owning faction id.
        faction: String,
        /// Repeated unit id.
        unit: String,
    },
    /// Two detachments of one faction share an identifier.
    DuplicateDetachment {
        /// Owning faction id.
        faction: String,
        /// Repeated detachment id.
        detachment: String,
    },
    /// A mustering rule allows a unit the faction does not define.
    UnknownAllowedUnit {
        /// Owning faction id.
        faction: String,
        /// Owning detachment id.
        detachment: String,
        /// Category name of the offending rule.
        category: String,
        /// Unit id that failed to resolve.
        unit: String,
    },
}

impl fmt::Display for IntegrityIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateFaction { faction } => {
                write!(f, "faction '{faction}' is defined more than once")
            }
            Self::DuplicateUnit { faction, unit } => {
                write!(f, "faction '{faction}' defines unit '{unit}' more than once")
            }
            Self::DuplicateDetachment {
                faction,
                detachment,
            } => write!(
                f,
                "faction '{faction}' defines detachment '{detachment}' more than once"
            ),
            Self::UnknownAllowedUnit {
                faction,
                detachment,
                category,
                unit,
            } => write!(
                f,
                "detachment '{faction}/{detachment}' category '{category}' allows unknown unit '{unit}'"
            ),
        }
    }
}

fn join_issues(issues: &[IntegrityIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Reasons a roster command was declined. The roster is left untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RosterError {
    /// Adding the unit would push the roster past the points ceiling.
    #[error("cannot add {unit}: {current} + {cost} pts exceeds the {limit} pts limit")]
    CapacityExceeded {
        /// Unit id that was rejected.
        unit: String,
        /// Roster total before the add.
        current: u32,
        /// Cost of the rejected unit.
        cost: u32,
        /// Points ceiling.
        limit: u32,
    },

    /// Units can only be added once a detachment is active.
    #[error("no detachment selected")]
    NoDetachmentSelected,

    /// The active faction has no unit with this id.
    #[error("unknown unit '{0}' for the selected faction")]
    UnknownUnit(String),

    /// Strict mustering: a category governing the unit is already full.
    #[error("cannot add {unit}: '{category}' limit reached")]
    MusteringLimitReached {
        /// Unit id that was rejected.
        unit: String,
        /// Category whose cap blocks the unit.
        category: String,
    },

    /// Strict mustering: no category of the detachment admits the unit.
    #[error("{0} cannot be mustered in the selected detachment")]
    NotMusterable(String),
}
