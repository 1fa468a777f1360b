use std::collections::HashSet;
use std::sync::Mutex;

/// Ephemeral set of unread correlated-order-ids, derived purely from live
/// channel events. The badge count is the set's cardinality, so duplicate
/// deliveries can never double-count.
#[derive(Debug, Default)]
pub struct UnreadTracker {
    ids: Mutex<HashSet<String>>,
}

impl UnreadTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a live event. Returns true if the id was not already tracked.
    pub fn on_event(&self, id: &str) -> bool {
        self.ids.lock().unwrap().insert(id.to_string())
    }

    /// The principal viewed one specific order. Idempotent.
    pub fn acknowledge(&self, id: &str) -> bool {
        self.ids.lock().unwrap().remove(id)
    }

    /// The principal visited the canonical listing page; everything is seen.
    pub fn reset_all(&self) {
        self.ids.lock().unwrap().clear();
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.lock().unwrap().contains(id)
    }

    pub fn count(&self) -> usize {
        self.ids.lock().unwrap().len()
    }

    pub fn ids(&self) -> Vec<String> {
        self.ids.lock().unwrap().iter().cloned().collect()
    }
}
