pub mod notification_dispatcher;
pub mod notification_message;
pub mod notification_models;
pub mod senders;

pub use notification_dispatcher::NotificationDispatcher;
pub use notification_models::{NotificationChannel, NotificationType, SlotAlert};
pub use senders::Notifier;
