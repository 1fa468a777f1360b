use chrono::{DateTime, Utc};

use crate::notify::model::Notification;

/// Group identity: a shared correlated-order-id, or a single ungrouped
/// notification keyed by its own id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GroupKey {
    Order(String),
    Single(String),
}

/// A derived display group. Never stored or mutated; recomputed from the
/// notification list on every change.
#[derive(Debug, Clone)]
pub struct NotificationGroup {
    pub key: GroupKey,
    pub items: Vec<Notification>,
    /// Creation time of the most recent member, used for ordering.
    pub latest: DateTime<Utc>,
}

impl NotificationGroup {
    pub fn member_ids(&self) -> Vec<String> {
        self.items.iter().map(|n| n.id.clone()).collect()
    }

    pub fn order_id(&self) -> Option<&str> {
        match &self.key {
            GroupKey::Order(id) => Some(id),
            GroupKey::Single(_) => None,
        }
    }
}

/// Partition notifications by correlated-order-id and sort groups by their
/// most recent member, descending. Items without an order id each form
/// their own group.
pub fn group_notifications(items: &[Notification]) -> Vec<NotificationGroup> {
    let mut groups: Vec<NotificationGroup> = Vec::new();

    for item in items {
        let key = match &item.order_id {
            Some(order_id) => GroupKey::Order(order_id.clone()),
            None => GroupKey::Single(item.id.clone()),
        };
        match groups.iter_mut().find(|g| g.key == key) {
            Some(group) => {
                if item.created_at > group.latest {
                    group.latest = item.created_at;
                }
                group.items.push(item.clone());
            }
            None => groups.push(NotificationGroup {
                key,
                items: vec![item.clone()],
                latest: item.created_at,
            }),
        }
    }

    groups.sort_by(|a, b| b.latest.cmp(&a.latest));
    groups
}
