//! HTTP transport port.
//!
//! The client only needs "POST this JSON body, give me the status and the
//! body text". The reqwest adapter lives in `freekassa-client`; tests plug in
//! a recording fake.

use crate::domain::SignedFields;

/// Raw response from the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    pub body: String,
}

impl TransportResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// Port trait for the outbound HTTP call.
#[async_trait::async_trait]
pub trait HttpTransport: Send + Sync {
    /// POSTs `body` as JSON to `url`.
    ///
    /// Errors are transport failures only (DNS, connect, timeout). Any HTTP
    /// status, including errors, is an `Ok` response.
    async fn post_json(
        &self,
        url: &str,
        body: &SignedFields,
    ) -> Result<TransportResponse, anyhow::Error>;
}
