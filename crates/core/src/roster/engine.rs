use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::{
    catalog::Catalog,
    error::RosterError,
    models::{Detachment, Faction, Unit},
};

use super::{
    entry::{EntryId, EntryIdGenerator, RosterEntry},
    view::{categorize, CategoryView},
};

/// Points ceiling for a Boarding Actions roster.
pub const POINTS_LIMIT: u32 = 500;

/// How strictly `add_unit` applies the mustering rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MusterPolicy {
    /// Only the points ceiling is checked; callers filter through the
    /// categorized view before adding.
    #[default]
    Lenient,
    /// Additionally reject units that are disabled in any category or that no
    /// category admits.
    Strict,
}

/// Where the engine is in the faction → detachment selection lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionState {
    /// No faction resolves.
    NoFaction,
    /// A faction resolves but no detachment of it does.
    FactionSelected,
    /// Both resolve; the roster may be populated.
    DetachmentSelected,
}

/// Everything a frontend needs to present the current roster.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RosterSnapshot {
    pub state: SelectionState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub faction_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detachment_id: Option<String>,
    pub total_points: u32,
    pub points_limit: u32,
    pub entries: Vec<RosterEntry>,
    pub categorized_view: Vec<CategoryView>,
}

/// Owns the roster and the active selection, and derives availability from
/// the catalog on every query.
#[derive(Debug, Clone)]
pub struct RosterEngine {
    catalog: Arc<Catalog>,
    policy: MusterPolicy,
    faction_id: Option<String>,
    detachment_id: Option<String>,
    entries: Vec<RosterEntry>,
    ids: EntryIdGenerator,
}

impl RosterEngine {
    /// Create an engine with nothing selected.
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self {
            catalog,
            policy: MusterPolicy::default(),
            faction_id: None,
            detachment_id: None,
            entries: Vec::new(),
            ids: EntryIdGenerator::default(),
        }
    }

    /// Use the given mustering policy for subsequent adds.
    pub fn with_policy(mut self, policy: MusterPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> MusterPolicy {
        self.policy
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Select a faction, clearing the detachment and the roster.
    ///
    /// An empty or unknown id leaves nothing selected.
    pub fn select_faction(&mut self, faction_id: &str) {
        self.faction_id = non_empty(faction_id);
        self.detachment_id = None;
        self.entries.clear();
        info!(faction = faction_id, state = ?self.selection_state(), "faction selected");
    }

    /// Select a detachment of the current faction, clearing the roster.
    ///
    /// An id that does not belong to the current faction resolves to no
    /// detachment.
    pub fn select_detachment(&mut self, detachment_id: &str) {
        self.detachment_id = non_empty(detachment_id);
        self.entries.clear();
        info!(detachment = detachment_id, state = ?self.selection_state(), "detachment selected");
    }

    /// The active faction, if the selection resolves.
    pub fn faction(&self) -> Option<&Faction> {
        self.faction_id
            .as_deref()
            .and_then(|id| self.catalog.faction(id))
    }

    /// The active detachment, if the selection resolves within the faction.
    pub fn detachment(&self) -> Option<&Detachment> {
        let faction = self.faction()?;
        self.detachment_id
            .as_deref()
            .and_then(|id| self.catalog.detachment(faction, id))
    }

    pub fn selection_state(&self) -> SelectionState {
        match (self.faction(), self.detachment()) {
            (None, _) => SelectionState::NoFaction,
            (Some(_), None) => SelectionState::FactionSelected,
            (Some(_), Some(_)) => SelectionState::DetachmentSelected,
        }
    }

    /// Roster entries in insertion order.
    pub fn entries(&self) -> &[RosterEntry] {
        &self.entries
    }

    pub fn total_points(&self) -> u32 {
        self.entries.iter().map(RosterEntry::points).sum()
    }

    pub fn remaining_points(&self) -> u32 {
        POINTS_LIMIT.saturating_sub(self.total_points())
    }

    /// `"{total} / {limit}"` headline for the points tracker.
    pub fn points_label(&self) -> String {
        format!("{} / {}", self.total_points(), POINTS_LIMIT)
    }

    /// Recompute per-category availability for the active detachment.
    ///
    /// Empty unless a detachment is selected.
    pub fn categorized_view(&self) -> Vec<CategoryView> {
        let (Some(faction), Some(detachment)) = (self.faction(), self.detachment()) else {
            return Vec::new();
        };
        let view = categorize(faction, detachment, &self.entries);
        debug!(
            detachment = %detachment.id,
            categories = view.len(),
            entries = self.entries.len(),
            "categorized view computed"
        );
        view
    }

    /// Append a copy of `unit` to the roster.
    ///
    /// Declined without touching the roster when no detachment is active or
    /// when the add would exceed [`POINTS_LIMIT`]. Under
    /// [`MusterPolicy::Strict`] the mustering rules are enforced as well.
    pub fn add_unit(&mut self, unit: &Unit) -> Result<EntryId, RosterError> {
        if let Err(err) = self.check_add(unit) {
            warn!(unit = %unit.id, "add rejected: {err}");
            return Err(err);
        }

        let entry_id = self.ids.next_id();
        self.entries.push(RosterEntry::new(entry_id, unit.clone()));
        info!(
            unit = %unit.id,
            entry = %entry_id,
            total = self.total_points(),
            "unit added"
        );
        Ok(entry_id)
    }

    /// Resolve `unit_id` within the active faction and add it.
    pub fn add_unit_by_id(&mut self, unit_id: &str) -> Result<EntryId, RosterError> {
        let unit = self
            .faction()
            .and_then(|faction| faction.unit(unit_id))
            .cloned()
            .ok_or_else(|| RosterError::UnknownUnit(unit_id.to_string()))?;
        self.add_unit(&unit)
    }

    /// Remove the entry with the given id. Unknown ids are a no-op.
    pub fn remove_unit(&mut self, entry_id: EntryId) -> Option<RosterEntry> {
        let index = self
            .entries
            .iter()
            .position(|entry| entry.entry_id == entry_id)?;
        let removed = self.entries.remove(index);
        info!(
            unit = %removed.unit.id,
            entry = %entry_id,
            total = self.total_points(),
            "unit removed"
        );
        Some(removed)
    }

    /// Bundle selection, totals, entries, and the categorized view.
    pub fn snapshot(&self) -> RosterSnapshot {
        RosterSnapshot {
            state: self.selection_state(),
            faction_id: self.faction().map(|faction| faction.id.clone()),
            detachment_id: self.detachment().map(|detachment| detachment.id.clone()),
            total_points: self.total_points(),
            points_limit: POINTS_LIMIT,
            entries: self.entries.clone(),
            categorized_view: self.categorized_view(),
        }
    }

    fn check_add(&self, unit: &Unit) -> Result<(), RosterError> {
        if self.detachment().is_none() {
            return Err(RosterError::NoDetachmentSelected);
        }

        let current = self.total_points();
        if current.saturating_add(unit.points) > POINTS_LIMIT {
            return Err(RosterError::CapacityExceeded {
                unit: unit.id.clone(),
                current,
                cost: unit.points,
                limit: POINTS_LIMIT,
            });
        }

        if self.policy == MusterPolicy::Strict {
            self.check_mustering(unit)?;
        }
        Ok(())
    }

    fn check_mustering(&self, unit: &Unit) -> Result<(), RosterError> {
        let view = self.categorized_view();
        let mut offered = false;
        for category in &view {
            let Some(offer) = category.unit(&unit.id) else {
                continue;
            };
            offered = true;
            if offer.is_disabled {
                return Err(RosterError::MusteringLimitReached {
                    unit: unit.id.clone(),
                    category: category.category_name.clone(),
                });
            }
        }

        if offered {
            Ok(())
        } else {
            Err(RosterError::NotMusterable(unit.id.clone()))
        }
    }
}

fn non_empty(id: &str) -> Option<String> {
    (!id.is_empty()).then(|| id.to_string())
}
