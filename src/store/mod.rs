//! Client-side caches of backend data.

pub mod catalog;
pub mod status;
pub mod violations;

pub use catalog::VideoCatalog;
pub use status::{ApiStatus, Notification, NotificationLevel, Notifications};
pub use violations::{ViolationStats, ViolationStore};
