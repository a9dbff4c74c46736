use std::fmt;

use serde::{Deserialize, Serialize};

use crate::models::Unit;

/// Roster-scoped identifier of a single selection.
///
/// Distinct from the unit id because the same unit may be selected several
/// times.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(u64);

impl EntryId {
    /// Raw numeric value.
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl From<u64> for EntryId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A unit placed in the roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RosterEntry {
    /// Identifier unique within the roster's lifetime.
    pub entry_id: EntryId,
    /// Copy of the selected unit.
    #[serde(flatten)]
    pub unit: Unit,
}

impl RosterEntry {
    pub(crate) fn new(entry_id: EntryId, unit: Unit) -> Self {
        Self { entry_id, unit }
    }

    /// Identifier of the underlying unit.
    pub fn unit_id(&self) -> &str {
        &self.unit.id
    }

    /// Point cost of this entry.
    pub fn points(&self) -> u32 {
        self.unit.points
    }
}

/// Monotonic source of entry ids.
#[derive(Debug, Clone, Default)]
pub(crate) struct EntryIdGenerator {
    next: u64,
}

impl EntryIdGenerator {
    pub(crate) fn next_id(&mut self) -> EntryId {
        self.next += 1;
        EntryId(self.next)
    }
}
