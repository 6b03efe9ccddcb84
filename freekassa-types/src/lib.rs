//! # Freekassa Types
//!
//! Domain types and port traits for the Freekassa API client and the
//! notification verifier. This crate has no IO of its own - only data
//! structures, wire rules and trait definitions.
//!
//! ## Layout
//!
//! - `domain/` - order statuses, routes, ordered signed fields, compat switches
//! - `ports/` - the HTTP transport trait the client is generic over
//! - `dto/` - request parameter objects for the client operations
//! - `error/` - client and notification error types

pub mod domain;
pub mod dto;
pub mod error;
pub mod ports;

// Re-export commonly used types
pub use domain::{
    API_URL, Compat, NonceMode, OrderStatus, Route, SignedFields, TIME_FORMAT, format_time,
    order_label,
};
pub use dto::*;
pub use error::{ClientError, NotificationError};
pub use ports::{HttpTransport, TransportResponse};
