//! # Freekassa Client SDK
//!
//! A typed Rust client for the Freekassa merchant API.
//!
//! Every request is a POST with a JSON body that starts with `shopId` and
//! `nonce`, carries the route-specific fields, and ends with a `signature`
//! over all preceding values (see [`security::sign_fields`]).

pub mod security;
pub mod transport;


use std::sync::atomic::{AtomicI64, Ordering};

use freekassa_types::error::NO_MESSAGE;
use freekassa_types::{
    API_URL, ClientError, Compat, CreateOrder, CreateWithdrawal, HttpTransport, NonceMode,
    OrdersQuery, Route, SignedFields, TransportResponse,
};
use serde_json::Value;

pub use transport::ReqwestTransport;

/// Freekassa API client.
pub struct FreekassaClient<T: HttpTransport = ReqwestTransport> {
    base_url: String,
    api_key: String,
    shop_id: i64,
    nonce: AtomicI64,
    nonce_mode: NonceMode,
    compat: Compat,
    transport: T,
}

impl FreekassaClient<ReqwestTransport> {
    /// Creates a new client for the production API.
    ///
    /// The nonce starts at the current Unix timestamp.
    pub fn new(api_key: impl Into<String>, shop_id: i64) -> Self {
        Self {
            base_url: API_URL.to_string(),
            api_key: api_key.into(),
            shop_id,
            nonce: AtomicI64::new(chrono::Utc::now().timestamp()),
            nonce_mode: NonceMode::default(),
            compat: Compat::default(),
            transport: ReqwestTransport::new(),
        }
    }
}

impl<T: HttpTransport> FreekassaClient<T> {
    /// Swaps the HTTP transport.
    pub fn with_transport<U: HttpTransport>(self, transport: U) -> FreekassaClient<U> {
        FreekassaClient {
            base_url: self.base_url,
            api_key: self.api_key,
            shop_id: self.shop_id,
            nonce: self.nonce,
            nonce_mode: self.nonce_mode,
            compat: self.compat,
            transport,
        }
    }

    /// Points the client at another API base URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = format!("{}/", base_url.into().trim_end_matches('/'));
        self
    }

    pub fn with_nonce_mode(mut self, mode: NonceMode) -> Self {
        self.nonce_mode = mode;
        self
    }

    pub fn with_compat(mut self, compat: Compat) -> Self {
        self.compat = compat;
        self
    }

    pub fn shop_id(&self) -> i64 {
        self.shop_id
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn next_nonce(&self) -> i64 {
        match self.nonce_mode {
            NonceMode::Fixed => self.nonce.load(Ordering::Relaxed),
            NonceMode::PerRequest => self.nonce.fetch_add(1, Ordering::Relaxed),
        }
    }

    /// Builds `{shopId, nonce, ...additional, signature}`.
    pub fn signed_payload(&self, nonce: i64, additional: SignedFields) -> SignedFields {
        let mut payload = SignedFields::new();
        payload.insert("shopId", self.shop_id);
        payload.insert("nonce", nonce);
        payload.extend(additional);
        let signature = security::sign_fields(&payload, &self.api_key);
        payload.insert("signature", signature);
        payload
    }

    /// Signs and sends a request to `route`.
    ///
    /// Returns the parsed response body for any status other than 400 and 401.
    #[tracing::instrument(skip(self, additional))]
    pub async fn request(
        &self,
        route: Route,
        additional: SignedFields,
        url_params: &[(&str, String)],
    ) -> Result<Value, ClientError> {
        let url = route.url(&self.base_url, url_params);
        let payload = self.signed_payload(self.next_nonce(), additional);

        let resp = self.transport.post_json(&url, &payload).await?;
        tracing::debug!(status = resp.status, "Freekassa responded");
        handle_response(resp)
    }

    /// Gets the shop balance.
    pub async fn get_balance(&self) -> Result<Value, ClientError> {
        self.request(Route::Balance, SignedFields::new(), &[]).await
    }

    /// Lists orders matching the query.
    pub async fn get_orders(&self, query: &OrdersQuery) -> Result<Value, ClientError> {
        self.request(Route::Orders, query.to_fields(&self.compat), &[])
            .await
    }

    /// Creates a payment order.
    pub async fn create_order(&self, order: &CreateOrder) -> Result<Value, ClientError> {
        self.request(Route::CreateOrder, order.to_fields(&self.compat), &[])
            .await
    }

    /// Lists withdrawals matching the query.
    pub async fn get_withdrawals(&self, query: &OrdersQuery) -> Result<Value, ClientError> {
        self.request(Route::Withdrawals, query.to_fields(&self.compat), &[])
            .await
    }

    /// Creates a withdrawal.
    pub async fn create_withdrawal(
        &self,
        withdrawal: &CreateWithdrawal,
    ) -> Result<Value, ClientError> {
        self.request(Route::CreateWithdrawal, withdrawal.to_fields(), &[])
            .await
    }

    /// Lists payment systems available for orders.
    pub async fn get_payment_systems(&self) -> Result<Value, ClientError> {
        self.request(Route::Currencies, SignedFields::new(), &[])
            .await
    }

    /// Checks whether a payment system is available.
    pub async fn check_payment_system(&self, payment_system_id: i64) -> Result<Value, ClientError> {
        self.request(
            Route::CurrencyStatus,
            SignedFields::new(),
            &[("id", payment_system_id.to_string())],
        )
        .await
    }

    /// Lists payment systems available for withdrawals.
    pub async fn get_payment_systems_for_withdrawal(&self) -> Result<Value, ClientError> {
        self.request(Route::WithdrawalCurrencies, SignedFields::new(), &[])
            .await
    }

    /// Lists the merchant's shops.
    pub async fn get_shops(&self) -> Result<Value, ClientError> {
        self.request(Route::Shops, SignedFields::new(), &[]).await
    }
}

fn handle_response(resp: TransportResponse) -> Result<Value, ClientError> {
    match resp.status {
        400 => Err(ClientError::Api(error_message(&resp.body))),
        401 => Err(ClientError::Auth(error_message(&resp.body))),
        _ => Ok(serde_json::from_str(&resp.body)?),
    }
}

/// Reads `message`, falling back to `msg`, from an error body.
fn error_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v.get("message").or_else(|| v.get("msg")).cloned())
        .map(|m| match m {
            Value::String(s) => s,
            other => other.to_string(),
        })
        .unwrap_or_else(|| NO_MESSAGE.to_string())
}
