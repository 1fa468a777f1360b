use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Backend notification type. The backend emits more kinds than these; only
/// dispatch and decline are actionable for the badge and grouping, so
/// everything else collapses to `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotificationKind {
    VendorOrderDispatched,
    VendorOrderDeclined,
    #[serde(other)]
    Other,
}

impl NotificationKind {
    pub fn is_actionable(&self) -> bool {
        matches!(self, NotificationKind::VendorOrderDispatched | NotificationKind::VendorOrderDeclined)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationStatus {
    Read,
    Unread,
}

/// A durable notification as the backend stores it. Status moves
/// unread -> read exactly once per id; marking an already-read item read
/// again is a no-op on the backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub body: String,
    /// Correlated order, when the notification refers to one. Notifications
    /// sharing an order id form one display group.
    #[serde(default)]
    pub order_id: Option<String>,
    pub status: NotificationStatus,
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    pub created_at: DateTime<Utc>,
}

impl Notification {
    pub fn is_actionable_unread(&self) -> bool {
        self.status == NotificationStatus::Unread && self.kind.is_actionable()
    }
}
