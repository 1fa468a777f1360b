use std::sync::{Arc, Mutex};

use futures::future::join_all;

use crate::api::RinsrClient;
use crate::notify::groups::{group_notifications, NotificationGroup};
use crate::notify::model::Notification;

/// What actually happened to a mark-as-read batch. The batch is not atomic;
/// callers surface "marked N of M read" from these fields.
#[derive(Debug, Clone)]
pub struct BatchOutcome {
    pub requested: usize,
    pub succeeded: Vec<String>,
    pub failed: Vec<String>,
}

impl BatchOutcome {
    pub fn summary(&self) -> String {
        format!("marked {} of {} read", self.succeeded.len(), self.requested)
    }
}

/// Durable-notification view: fetches the backend list, keeps the
/// actionable unread slice, and reconciles read-state mutations.
///
/// Refreshes are push-driven, on mount and on each live dispatch/decline
/// event, never on a timer. A stale list that has not caught up to a live
/// event is acceptable and self-heals on the next fetch.
pub struct NotificationFeed {
    client: Arc<RinsrClient>,
    items: Mutex<Vec<Notification>>,
}

impl NotificationFeed {
    pub fn new(client: Arc<RinsrClient>) -> Self {
        Self { client, items: Mutex::new(Vec::new()) }
    }

    /// Re-fetch the list. A failed fetch displays as an empty list rather
    /// than an error. Returns the unread count after the refresh.
    pub async fn refresh(&self) -> usize {
        let fetched = match self.client.fetch_notifications().await {
            Ok(list) => list,
            Err(e) => {
                tracing::warn!("notification fetch failed, showing empty list: {e}");
                Vec::new()
            }
        };

        let actionable: Vec<Notification> =
            fetched.into_iter().filter(Notification::is_actionable_unread).collect();

        let count = actionable.len();
        *self.items.lock().unwrap() = actionable;
        count
    }

    pub fn unread_count(&self) -> usize {
        self.items.lock().unwrap().len()
    }

    pub fn snapshot(&self) -> Vec<Notification> {
        self.items.lock().unwrap().clone()
    }

    /// Current grouped view, most recent activity first.
    pub fn groups(&self) -> Vec<NotificationGroup> {
        group_notifications(&self.items.lock().unwrap())
    }

    /// Mark every id in a group as read, all mutations in flight at once.
    ///
    /// Waits for the whole batch to settle, then removes exactly the ids
    /// the backend confirmed. A failed member is logged and left unread;
    /// it does not roll back its peers.
    pub async fn mark_group_read(&self, ids: &[String]) -> BatchOutcome {
        let requests = ids.iter().map(|id| {
            let client = self.client.clone();
            let id = id.clone();
            async move {
                let result = client.mark_notification_read(&id).await;
                (id, result)
            }
        });

        let mut succeeded = Vec::new();
        let mut failed = Vec::new();
        for (id, result) in join_all(requests).await {
            match result {
                Ok(()) => succeeded.push(id),
                Err(e) => {
                    tracing::warn!(id = %id, "mark-read failed, leaving unread: {e}");
                    failed.push(id);
                }
            }
        }

        if !succeeded.is_empty() {
            self.items.lock().unwrap().retain(|n| !succeeded.contains(&n.id));
        }

        BatchOutcome { requested: ids.len(), succeeded, failed }
    }
}
