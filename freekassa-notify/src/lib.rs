//! # Freekassa Notify
//!
//! Verification of inbound Freekassa payment notifications, plus an HTTP
//! adapter that serves the notification URL.
//!
//! ## Layout
//!
//! - `notification` - payload parsing, MD5 signature and source IP checks
//! - `handler` - port for acting on verified notifications
//! - `inbound/` - HTTP adapter (Axum server)

pub mod handler;
pub mod inbound;
pub mod notification;

pub use handler::{LoggingHandler, NotificationHandler};
pub use notification::{
    NOTIFICATION_IPS, Notification, SUCCESS_MARKER, is_notification_ip, notification_signature,
};
