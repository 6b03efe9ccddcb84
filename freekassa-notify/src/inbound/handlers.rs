//! HTTP request handlers.

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use axum::{
    Form, Json,
    extract::{ConnectInfo, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};

use freekassa_types::NotificationError;

use crate::{Notification, NotificationHandler, SUCCESS_MARKER};

/// Header a reverse proxy uses to pass the client address.
const REAL_IP_HEADER: &str = "x-real-ip";

/// Application state shared across handlers.
pub struct AppState<H: NotificationHandler> {
    pub secret2: String,
    pub check_ip: bool,
    pub trust_proxy: bool,
    pub handler: H,
}

/// Error responses of the notification endpoint.
pub enum EndpointError {
    Rejected(NotificationError),
    Internal(String),
}

impl From<NotificationError> for EndpointError {
    fn from(err: NotificationError) -> Self {
        EndpointError::Rejected(err)
    }
}

impl IntoResponse for EndpointError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            EndpointError::Rejected(e) => (StatusCode::BAD_REQUEST, e.to_string()),
            EndpointError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        let body = serde_json::json!({
            "error": message,
            "code": status.as_u16()
        });

        (status, Json(body)).into_response()
    }
}

/// Health check endpoint.
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "healthy" }))
}

/// Resolves the address the notification came from.
fn source_ip(headers: &HeaderMap, peer: SocketAddr, trust_proxy: bool) -> IpAddr {
    if trust_proxy {
        let forwarded = headers
            .get(REAL_IP_HEADER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse().ok());
        if let Some(ip) = forwarded {
            return ip;
        }
    }
    peer.ip()
}

/// Provider callback: verifies the notification and answers `YES`.
#[tracing::instrument(skip_all)]
pub async fn notification<H: NotificationHandler>(
    State(state): State<Arc<AppState<H>>>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    Form(payload): Form<HashMap<String, String>>,
) -> Result<&'static str, EndpointError> {
    let source = source_ip(&headers, peer, state.trust_proxy);
    let notification = Notification::new(
        payload,
        state.secret2.as_str(),
        state.check_ip.then_some(source),
    );

    if let Err(e) = notification.check() {
        tracing::warn!(%source, error = %e, "Rejected notification");
        return Err(e.into());
    }

    state
        .handler
        .on_payment(&notification)
        .await
        .map_err(|e| {
            tracing::error!("Notification handler failed: {}", e);
            EndpointError::Internal("Failed to process notification".into())
        })?;

    Ok(SUCCESS_MARKER)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn peer() -> SocketAddr {
        SocketAddr::from(([10, 0, 0, 5], 40000))
    }

    #[test]
    fn test_source_ip_uses_peer_by_default() {
        let mut headers = HeaderMap::new();
        headers.insert(REAL_IP_HEADER, "168.119.157.136".parse().unwrap());
        assert_eq!(source_ip(&headers, peer(), false), peer().ip());
    }

    #[test]
    fn test_source_ip_trusts_proxy_header() {
        let mut headers = HeaderMap::new();
        headers.insert(REAL_IP_HEADER, "168.119.157.136".parse().unwrap());
        assert_eq!(
            source_ip(&headers, peer(), true),
            "168.119.157.136".parse::<IpAddr>().unwrap()
        );
    }

    #[test]
    fn test_source_ip_falls_back_on_bad_header() {
        let mut headers = HeaderMap::new();
        headers.insert(REAL_IP_HEADER, "not-an-ip".parse().unwrap());
        assert_eq!(source_ip(&headers, peer(), true), peer().ip());
    }
}
