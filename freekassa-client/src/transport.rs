//! reqwest adapter for the HTTP transport port.

use freekassa_types::{HttpTransport, SignedFields, TransportResponse};
use reqwest::Client;

/// Default transport backed by a `reqwest::Client`.
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    http: Client,
}

impl ReqwestTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Uses a preconfigured client (timeouts, proxies, TLS).
    pub fn with_client(http: Client) -> Self {
        Self { http }
    }
}

#[async_trait::async_trait]
impl HttpTransport for ReqwestTransport {
    async fn post_json(
        &self,
        url: &str,
        body: &SignedFields,
    ) -> Result<TransportResponse, anyhow::Error> {
        let resp = self.http.post(url).json(body).send().await?;
        let status = resp.status().as_u16();
        let body = resp.text().await?;
        Ok(TransportResponse { status, body })
    }
}
