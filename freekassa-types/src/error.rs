//! Error types for the Freekassa client and notification verifier.

use std::net::IpAddr;

/// Message used when an error response carries no `msg` or `message`.
pub const NO_MESSAGE: &str = "No message";

/// Errors returned by API client operations.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The API rejected the request (HTTP 400).
    #[error("API error: {0}")]
    Api(String),

    /// The API rejected the credentials or signature (HTTP 401).
    #[error("Authentication error: {0}")]
    Auth(String),

    /// The transport failed before a response arrived.
    #[error(transparent)]
    Transport(#[from] anyhow::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ClientError {
    /// Returns the message reported by the API, if this is an API-level error.
    pub fn api_message(&self) -> Option<&str> {
        match self {
            Self::Api(msg) | Self::Auth(msg) => Some(msg),
            _ => None,
        }
    }
}

/// An inbound notification failed validation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NotificationError {
    #[error("IP address {0} is not a Freekassa notification server")]
    IpNotAllowed(IpAddr),

    #[error("Invalid signature")]
    InvalidSignature,
}
