use std::sync::Arc;

use parking_lot::RwLock;

use crate::{error::RosterError, models::Unit};

use super::{
    engine::{RosterEngine, RosterSnapshot},
    entry::{EntryId, RosterEntry},
    view::CategoryView,
};

/// Roster engine shared between threads.
///
/// Commands take the write lock so mutations of one roster are applied one at
/// a time; queries take the read lock and always see a complete roster.
#[derive(Clone)]
pub struct SharedRoster {
    inner: Arc<RwLock<RosterEngine>>,
}

impl SharedRoster {
    pub fn new(engine: RosterEngine) -> Self {
        Self {
            inner: Arc::new(RwLock::new(engine)),
        }
    }

    pub fn select_faction(&self, faction_id: &str) {
        self.inner.write().select_faction(faction_id);
    }

    pub fn select_detachment(&self, detachment_id: &str) {
        self.inner.write().select_detachment(detachment_id);
    }

    pub fn add_unit(&self, unit: &Unit) -> Result<EntryId, RosterError> {
        self.inner.write().add_unit(unit)
    }

    pub fn add_unit_by_id(&self, unit_id: &str) -> Result<EntryId, RosterError> {
        self.inner.write().add_unit_by_id(unit_id)
    }

    pub fn remove_unit(&self, entry_id: EntryId) -> Option<RosterEntry> {
        self.inner.write().remove_unit(entry_id)
    }

    pub fn total_points(&self) -> u32 {
        self.inner.read().total_points()
    }

    pub fn categorized_view(&self) -> Vec<CategoryView> {
        self.inner.read().categorized_view()
    }

    pub fn snapshot(&self) -> RosterSnapshot {
        self.inner.read().snapshot()
    }

    /// Run a read-only closure against a consistent view of the engine.
    pub fn with_engine<R>(&self, f: impl FnOnce(&RosterEngine) -> R) -> R {
        f(&self.inner.read())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{catalog::fixtures, roster::POINTS_LIMIT};
    use std::thread;

    #[test]
    fn concurrent_adds_never_exceed_the_ceiling() {
        let engine = RosterEngine::new(Arc::new(fixtures::catalog()));
        let shared = SharedRoster::new(engine);
        shared.select_faction("orks");
        shared.select_detachment("waaagh");

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let shared = shared.clone();
                thread::spawn(move || {
                    let accepted = shared.add_unit_by_id("boyz").is_ok();
                    let snapshot = shared.snapshot();
                    assert!(snapshot.total_points <= POINTS_LIMIT);
                    accepted
                })
            })
            .collect();

        let accepted = handles
            .into_iter()
            .map(|handle| handle.join().expect("worker panicked"))
            .filter(|accepted| *accepted)
            .count();

        // 85 pts each: five fit under 500.
        assert_eq!(accepted, 5);
        assert_eq!(shared.total_points(), 425);
        assert_eq!(shared.with_engine(|engine| engine.entries().len()), 5);
    }

    #[test]
    fn removal_through_shared_handle() {
        let shared = SharedRoster::new(RosterEngine::new(Arc::new(fixtures::catalog())));
        shared.select_faction("sm");
        shared.select_detachment("strike");
        let id = shared.add_unit_by_id("capt").expect("add");
        assert_eq!(shared.categorized_view()[0].category_total_count, 1);
        assert!(shared.remove_unit(id).is_some());
        assert_eq!(shared.total_points(), 0);
    }
}
