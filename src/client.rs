//! HTTP client for the acquiring API
//!
//! The client holds the terminal credentials for its lifetime, signs every
//! outbound request with a per-request token, and decodes responses into
//! typed values sharing a common envelope. Inbound notifications are verified
//! against the same token scheme before being handed to business logic.

use std::time::Duration;
use subtle::ConstantTimeEq;

use crate::error::{AcquiringError, Result};
use crate::notification::{Notification, NOTIFICATION_SUCCESS_RESPONSE};
use crate::token;
use crate::types::*;

/// Default production API endpoint
pub const DEFAULT_BASE_URL: &str = "https://securepay.tinkoff.ru/v2";

/// Client for the acquiring API
///
/// Credentials are immutable for the lifetime of the client. A single
/// instance can be cloned and shared across tasks: every call is independent
/// and no state persists between calls.
#[derive(Clone)]
pub struct AcquiringClient {
    terminal_key: String,
    password: String,
    base_url: String,
    client: reqwest::Client,
}

impl std::fmt::Debug for AcquiringClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AcquiringClient")
            .field("terminal_key", &self.terminal_key)
            .field("password", &"<redacted>")
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl AcquiringClient {
    /// Create a client for the production endpoint
    pub fn new(terminal_key: impl Into<String>, password: impl Into<String>) -> Self {
        Self::with_base_url(terminal_key, password, DEFAULT_BASE_URL)
    }

    /// Create a client against a custom API endpoint (e.g. a test
    /// environment)
    pub fn with_base_url(
        terminal_key: impl Into<String>,
        password: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            terminal_key: terminal_key.into(),
            password: password.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        }
    }

    /// Override the underlying HTTP client (custom timeouts, proxies, TLS).
    /// Caller-side deadlines and cancellation ride on the supplied client.
    pub fn with_http_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }

    /// Base URL requests are dispatched against
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Attach the terminal key and the computed token to `request`
    fn sign<R: SignableRequest>(&self, request: &mut R) {
        request.set_terminal_key(&self.terminal_key);

        let mut values = request.values_for_token();
        values.insert("TerminalKey".to_string(), self.terminal_key.clone());
        values.insert("Password".to_string(), self.password.clone());
        request.set_token(token::generate_token(&values));
    }

    /// Sign `request` and POST it to `{base_url}{path}`, decoding the JSON
    /// response into the expected typed value.
    ///
    /// Transport failures and unparseable non-2xx replies surface as
    /// transport errors; a decoded envelope with `Success=false` surfaces as
    /// an [`ApiError`](crate::ApiError) carrying the upstream code and
    /// message, whatever the HTTP status. No retries: each call is
    /// independent and at-most-once from the client's perspective.
    pub async fn execute<Req, Res>(&self, path: &str, mut request: Req) -> Result<Res>
    where
        Req: SignableRequest,
        Res: ApiResponse,
    {
        self.sign(&mut request);

        let url = url::Url::parse(&format!("{}{}", self.base_url, path))
            .map_err(|e| AcquiringError::config(format!("invalid API URL: {e}")))?;

        tracing::debug!(%url, "dispatching acquiring API request");
        let response = self.client.post(url).json(&request).send().await?;

        let status = response.status();
        let body = response.bytes().await?;

        let decoded: Res = serde_json::from_slice(&body).map_err(|e| {
            if status.is_success() {
                AcquiringError::Json(e)
            } else {
                AcquiringError::unexpected_status(
                    status.as_u16(),
                    String::from_utf8_lossy(&body).into_owned(),
                )
            }
        })?;

        match decoded.envelope().api_error() {
            Some(err) => Err(err.into()),
            None => Ok(decoded),
        }
    }

    /// Create a new payment session
    pub async fn init(&self, request: InitRequest) -> Result<InitResponse> {
        self.execute("/Init", request).await
    }

    /// Query the current state of a payment
    pub async fn get_state(&self, request: GetStateRequest) -> Result<GetStateResponse> {
        self.execute("/GetState", request).await
    }

    /// Cancel or refund a payment, fully or partially
    pub async fn cancel(&self, request: CancelRequest) -> Result<CancelResponse> {
        self.execute("/Cancel", request).await
    }

    /// Capture a previously authorized two-stage payment
    pub async fn confirm(&self, request: ConfirmRequest) -> Result<ConfirmResponse> {
        self.execute("/Confirm", request).await
    }

    /// Ask the API to redeliver unprocessed notifications
    pub async fn resend(&self) -> Result<ResendResponse> {
        self.execute("/Resend", ResendRequest::default()).await
    }

    /// Decode and verify an inbound notification body.
    ///
    /// The token is recomputed from the notification's own fields plus the
    /// shared password and compared in constant time with the received one.
    /// On mismatch the notification is rejected and never handed out.
    pub fn parse_notification(&self, body: &[u8]) -> Result<Notification> {
        let notification: Notification = serde_json::from_slice(body)?;

        let mut values = notification.values_for_token();
        values.insert("Password".to_string(), self.password.clone());
        let expected = token::generate_token(&values);

        if !bool::from(expected.as_bytes().ct_eq(notification.token.as_bytes())) {
            return Err(AcquiringError::signature_verification(format!(
                "token mismatch for order {:?}",
                notification.order_id
            )));
        }

        Ok(notification)
    }

    /// Body to return to the API once a notification has been processed
    pub fn notification_success_response(&self) -> &'static str {
        NOTIFICATION_SUCCESS_RESPONSE
    }
}
