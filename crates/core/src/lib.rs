#![warn(clippy::all, missing_docs)]

//! Core domain logic for the Boarding Actions muster tool.
//!
//! This crate hosts the catalog models, catalog loading and integrity
//! checks, the roster engine that enforces the points ceiling and the
//! mustering rules, and configuration used by frontends.

pub mod catalog;
pub mod config;
pub mod error;
pub mod models;
pub mod roster;

pub use catalog::{Catalog, CatalogDocument, CatalogLoader};
pub use config::AppConfig;
pub use error::{CatalogError, IntegrityIssue, RosterError};
pub use models::{
    Detachment, DetachmentRule, Enhancement, Faction, MusteringRule, RuleKind, RuleLimit,
    Stratagem, Unit,
};
pub use roster::{
    BlockReason, CategoryView, EntryId, MusterPolicy, RosterEngine, RosterEntry, RosterSnapshot,
    SelectionState, SharedRoster, UnitAvailability, POINTS_LIMIT,
};
