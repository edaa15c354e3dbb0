pub mod notifier;
pub mod rabbitmq;
pub mod redis_emitter;

pub use notifier::{Notification, NotificationKind, NotificationPriority, Notifier};
