//! HTTP Inbound Adapter
//!
//! Axum-based server that receives provider callbacks and drives the
//! notification verifier.

mod handlers;
mod server;

pub use server::NotificationServer;
