pub mod groups;
pub mod model;
pub mod reconciler;

pub use groups::{group_notifications, GroupKey, NotificationGroup};
pub use model::{Notification, NotificationKind, NotificationStatus};
pub use reconciler::{BatchOutcome, NotificationFeed};
