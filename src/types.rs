//! Request and response types for the acquiring API
//!
//! Wire field names are PascalCase; optional fields are omitted entirely when
//! unset rather than serialized as null or zero. Each request kind fixes the
//! subset of its fields that participates in token computation.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::ApiError;
use crate::token;

/// Field values participating in token computation, keyed by wire field name
pub type TokenValues = HashMap<String, String>;

/// Fields common to every signed request
///
/// Filled in by the client right before dispatch; callers never set these
/// themselves.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BaseRequest {
    /// Terminal identifier issued at integration time
    #[serde(rename = "TerminalKey")]
    pub terminal_key: String,
    /// Request token computed over the signing fields
    #[serde(rename = "Token")]
    pub token: String,
}

/// Outbound request that the client can sign and dispatch
///
/// Each request kind exposes the fixed subset of its fields that participates
/// in signing; the subset is part of that kind's contract, not configurable.
pub trait SignableRequest: Serialize {
    /// Mutable access to the common signed fields
    fn base_mut(&mut self) -> &mut BaseRequest;

    /// Field values included in the token computation, keyed by wire name
    fn values_for_token(&self) -> TokenValues;

    /// Attach the terminal identifier. Invoked by the client before signing.
    fn set_terminal_key(&mut self, terminal_key: &str) {
        self.base_mut().terminal_key = terminal_key.to_string();
    }

    /// Attach the computed token. Invoked by the client after signing.
    fn set_token(&mut self, token: String) {
        self.base_mut().token = token;
    }
}

/// Common success/error shape shared by every API response
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResponseEnvelope {
    /// Terminal identifier echoed by the API
    #[serde(rename = "TerminalKey", default)]
    pub terminal_key: String,
    /// Whether the operation succeeded
    #[serde(rename = "Success", default)]
    pub success: bool,
    /// Upstream error code; "0" signals success
    #[serde(rename = "ErrorCode", default)]
    pub error_code: String,
    /// Human-readable error message
    #[serde(rename = "Message", default)]
    pub message: String,
    /// Extended diagnostic details
    #[serde(rename = "Details", default)]
    pub details: String,
}

impl ResponseEnvelope {
    /// Return the upstream failure, or `None` when the envelope signals
    /// success.
    ///
    /// A response with `Success=true` but a non-zero error code is a warning
    /// from the API, not a hard failure: it is logged and the decoded
    /// envelope stays available for the caller to inspect.
    pub fn api_error(&self) -> Option<ApiError> {
        if self.success {
            if !self.error_code.is_empty() && self.error_code != "0" {
                tracing::warn!(
                    code = %self.error_code,
                    message = %self.message,
                    "successful response carries a non-zero error code"
                );
            }
            return None;
        }

        Some(ApiError {
            code: self.error_code.clone(),
            message: self.message.clone(),
            details: self.details.clone(),
        })
    }
}

/// Typed response carrying the common envelope
pub trait ApiResponse: DeserializeOwned {
    /// Common envelope shared by every response
    fn envelope(&self) -> &ResponseEnvelope;
}

/// Creates a new payment session ("/Init")
#[derive(Debug, Clone, Default, Serialize)]
pub struct InitRequest {
    #[serde(flatten)]
    pub base: BaseRequest,
    /// Payment amount in minor currency units
    #[serde(rename = "Amount")]
    pub amount: u64,
    /// Order identifier in the merchant's system; also the replay guard,
    /// since the token itself carries no nonce
    #[serde(rename = "OrderId")]
    pub order_id: String,
    /// Customer IP address
    #[serde(rename = "IP", skip_serializing_if = "String::is_empty")]
    pub client_ip: String,
    /// Short description shown on the payment form
    #[serde(rename = "Description", skip_serializing_if = "String::is_empty")]
    pub description: String,
    /// Customer identifier for card binding
    #[serde(rename = "CustomerKey", skip_serializing_if = "String::is_empty")]
    pub customer_key: String,
    /// Moment the payment form link expires
    #[serde(rename = "RedirectDueDate", skip_serializing_if = "Option::is_none")]
    pub redirect_due_date: Option<DateTime<Utc>>,
    /// "O" for single-stage, "T" for two-stage payment
    #[serde(rename = "PayType", skip_serializing_if = "String::is_empty")]
    pub pay_type: String,
    /// Override for the notification callback URL
    #[serde(rename = "NotificationURL", skip_serializing_if = "String::is_empty")]
    pub notification_url: String,
    /// Override for the success redirect URL
    #[serde(rename = "SuccessURL", skip_serializing_if = "String::is_empty")]
    pub success_url: String,
    /// Override for the failure redirect URL
    #[serde(rename = "FailURL", skip_serializing_if = "String::is_empty")]
    pub fail_url: String,
    /// Additional key/value data passed through to notifications
    #[serde(rename = "DATA", skip_serializing_if = "HashMap::is_empty")]
    pub data: HashMap<String, String>,
}

impl InitRequest {
    /// Create a session request for `amount` minor units under `order_id`
    pub fn new(amount: u64, order_id: impl Into<String>) -> Self {
        Self {
            amount,
            order_id: order_id.into(),
            ..Self::default()
        }
    }
}

impl SignableRequest for InitRequest {
    fn base_mut(&mut self) -> &mut BaseRequest {
        &mut self.base
    }

    // Root-level scalars only; RedirectDueDate and DATA stay out of the
    // token material.
    fn values_for_token(&self) -> TokenValues {
        TokenValues::from([
            ("Amount".to_string(), self.amount.to_string()),
            ("OrderId".to_string(), self.order_id.clone()),
            ("IP".to_string(), self.client_ip.clone()),
            ("Description".to_string(), self.description.clone()),
            ("CustomerKey".to_string(), self.customer_key.clone()),
            ("PayType".to_string(), self.pay_type.clone()),
            ("NotificationURL".to_string(), self.notification_url.clone()),
            ("SuccessURL".to_string(), self.success_url.clone()),
            ("FailURL".to_string(), self.fail_url.clone()),
        ])
    }
}

/// Response to [`InitRequest`]
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InitResponse {
    #[serde(flatten)]
    pub envelope: ResponseEnvelope,
    /// Amount in minor currency units
    #[serde(rename = "Amount", default)]
    pub amount: u64,
    /// Order identifier in the merchant's system
    #[serde(rename = "OrderId", default)]
    pub order_id: String,
    /// Payment status
    #[serde(rename = "Status", default)]
    pub status: String,
    /// Payment identifier in the bank's system; transmitted as a string
    /// despite being documented as numeric
    #[serde(rename = "PaymentId", default)]
    pub payment_id: String,
    /// URL of the hosted payment form
    #[serde(rename = "PaymentURL", default)]
    pub payment_url: String,
}

impl ApiResponse for InitResponse {
    fn envelope(&self) -> &ResponseEnvelope {
        &self.envelope
    }
}

/// Queries the current state of a payment ("/GetState")
#[derive(Debug, Clone, Default, Serialize)]
pub struct GetStateRequest {
    #[serde(flatten)]
    pub base: BaseRequest,
    /// Payment identifier in the bank's system
    #[serde(rename = "PaymentId")]
    pub payment_id: String,
    /// Customer IP address
    #[serde(rename = "IP", skip_serializing_if = "String::is_empty")]
    pub client_ip: String,
}

impl GetStateRequest {
    /// Create a state query for `payment_id`
    pub fn new(payment_id: impl Into<String>) -> Self {
        Self {
            payment_id: payment_id.into(),
            ..Self::default()
        }
    }
}

impl SignableRequest for GetStateRequest {
    fn base_mut(&mut self) -> &mut BaseRequest {
        &mut self.base
    }

    fn values_for_token(&self) -> TokenValues {
        TokenValues::from([
            ("IP".to_string(), self.client_ip.clone()),
            ("PaymentId".to_string(), self.payment_id.clone()),
        ])
    }
}

/// Response to [`GetStateRequest`]
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GetStateResponse {
    #[serde(flatten)]
    pub envelope: ResponseEnvelope,
    /// Order identifier in the merchant's system
    #[serde(rename = "OrderId", default)]
    pub order_id: String,
    /// Payment status
    #[serde(rename = "Status", default)]
    pub status: String,
    /// Payment identifier in the bank's system
    #[serde(rename = "PaymentId", default)]
    pub payment_id: String,
}

impl ApiResponse for GetStateResponse {
    fn envelope(&self) -> &ResponseEnvelope {
        &self.envelope
    }
}

/// Cancels or refunds a payment, fully or partially ("/Cancel")
#[derive(Debug, Clone, Default, Serialize)]
pub struct CancelRequest {
    #[serde(flatten)]
    pub base: BaseRequest,
    /// Payment identifier in the bank's system
    #[serde(rename = "PaymentId")]
    pub payment_id: String,
    /// Customer IP address
    #[serde(rename = "IP", skip_serializing_if = "String::is_empty")]
    pub client_ip: String,
    /// Refund amount in minor currency units; zero refunds the full amount
    #[serde(rename = "Amount", skip_serializing_if = "is_zero")]
    pub amount: u64,
}

impl CancelRequest {
    /// Create a full-amount cancellation for `payment_id`
    pub fn new(payment_id: impl Into<String>) -> Self {
        Self {
            payment_id: payment_id.into(),
            ..Self::default()
        }
    }

    /// Limit the cancellation to `amount` minor units
    pub fn with_amount(mut self, amount: u64) -> Self {
        self.amount = amount;
        self
    }
}

impl SignableRequest for CancelRequest {
    fn base_mut(&mut self) -> &mut BaseRequest {
        &mut self.base
    }

    fn values_for_token(&self) -> TokenValues {
        let mut values = TokenValues::from([
            ("PaymentId".to_string(), self.payment_id.clone()),
            ("IP".to_string(), self.client_ip.clone()),
        ]);
        token::insert_if_nonzero(&mut values, "Amount", self.amount);
        values
    }
}

/// Response to [`CancelRequest`]
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CancelResponse {
    #[serde(flatten)]
    pub envelope: ResponseEnvelope,
    /// Amount in minor currency units before the cancellation
    #[serde(rename = "OriginalAmount", default)]
    pub original_amount: u64,
    /// Amount in minor currency units after the cancellation
    #[serde(rename = "NewAmount", default)]
    pub new_amount: u64,
    /// Order identifier in the merchant's system
    #[serde(rename = "OrderId", default)]
    pub order_id: String,
    /// Transaction status
    #[serde(rename = "Status", default)]
    pub status: String,
    /// Payment identifier in the bank's system
    #[serde(rename = "PaymentId", default)]
    pub payment_id: String,
}

impl ApiResponse for CancelResponse {
    fn envelope(&self) -> &ResponseEnvelope {
        &self.envelope
    }
}

/// Captures a previously authorized two-stage payment ("/Confirm")
#[derive(Debug, Clone, Default, Serialize)]
pub struct ConfirmRequest {
    #[serde(flatten)]
    pub base: BaseRequest,
    /// Payment identifier in the bank's system
    #[serde(rename = "PaymentId")]
    pub payment_id: String,
    /// Customer IP address
    #[serde(rename = "IP", skip_serializing_if = "String::is_empty")]
    pub client_ip: String,
    /// Capture amount in minor currency units; zero captures the authorized
    /// amount in full
    #[serde(rename = "Amount", skip_serializing_if = "is_zero")]
    pub amount: u64,
}

impl ConfirmRequest {
    /// Create a full-amount capture for `payment_id`
    pub fn new(payment_id: impl Into<String>) -> Self {
        Self {
            payment_id: payment_id.into(),
            ..Self::default()
        }
    }

    /// Limit the capture to `amount` minor units
    pub fn with_amount(mut self, amount: u64) -> Self {
        self.amount = amount;
        self
    }
}

impl SignableRequest for ConfirmRequest {
    fn base_mut(&mut self) -> &mut BaseRequest {
        &mut self.base
    }

    fn values_for_token(&self) -> TokenValues {
        let mut values = TokenValues::from([
            ("PaymentId".to_string(), self.payment_id.clone()),
            ("IP".to_string(), self.client_ip.clone()),
        ]);
        token::insert_if_nonzero(&mut values, "Amount", self.amount);
        values
    }
}

/// Response to [`ConfirmRequest`]
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfirmResponse {
    #[serde(flatten)]
    pub envelope: ResponseEnvelope,
    /// Order identifier in the merchant's system
    #[serde(rename = "OrderId", default)]
    pub order_id: String,
    /// Transaction status
    #[serde(rename = "Status", default)]
    pub status: String,
    /// Payment identifier in the bank's system
    #[serde(rename = "PaymentId", default)]
    pub payment_id: String,
}

impl ApiResponse for ConfirmResponse {
    fn envelope(&self) -> &ResponseEnvelope {
        &self.envelope
    }
}

/// Asks the API to redeliver unprocessed notifications ("/Resend")
#[derive(Debug, Clone, Default, Serialize)]
pub struct ResendRequest {
    #[serde(flatten)]
    pub base: BaseRequest,
}

impl SignableRequest for ResendRequest {
    fn base_mut(&mut self) -> &mut BaseRequest {
        &mut self.base
    }

    // Credentials only; the token is computed over TerminalKey and Password
    // alone.
    fn values_for_token(&self) -> TokenValues {
        TokenValues::new()
    }
}

/// Response to [`ResendRequest`]
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResendResponse {
    #[serde(flatten)]
    pub envelope: ResponseEnvelope,
}

impl ApiResponse for ResendResponse {
    fn envelope(&self) -> &ResponseEnvelope {
        &self.envelope
    }
}

fn is_zero(value: &u64) -> bool {
    *value == 0
}
