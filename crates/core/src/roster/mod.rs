#![allow(missing_docs)]

//! Roster engine, entries, and the derived categorized view.

mod engine;
mod entry;
mod shared;
pub mod view;

pub use engine::{MusterPolicy, RosterEngine, RosterSnapshot, SelectionState, POINTS_LIMIT};
pub use entry::{EntryId, RosterEntry};
pub use shared::SharedRoster;
pub use view::{BlockReason, CategoryView, UnitAvailability};
