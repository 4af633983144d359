//! Inbound payment notifications
//!
//! The API reports payment state changes through server-initiated HTTP
//! callbacks. A notification carries a token signed with the same shared
//! password as outbound requests and must be verified before the payload is
//! trusted. The transport layer acknowledges a processed notification with
//! the literal body `"OK"`; any other reply makes the remote side consider
//! delivery failed and redeliver.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::token;
use crate::types::TokenValues;

/// Body the transport layer must return to acknowledge a notification
pub const NOTIFICATION_SUCCESS_RESPONSE: &str = "OK";

/// Asynchronous payment state notification
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Notification {
    /// Terminal identifier the notification is addressed to
    #[serde(rename = "TerminalKey", default)]
    pub terminal_key: String,
    /// Order identifier in the merchant's system
    #[serde(rename = "OrderId", default)]
    pub order_id: String,
    /// Whether the reported operation succeeded
    #[serde(rename = "Success", default)]
    pub success: bool,
    /// Payment status after the state change
    #[serde(rename = "Status", default)]
    pub status: String,
    /// Payment identifier in the bank's system
    #[serde(rename = "PaymentId", default)]
    pub payment_id: u64,
    /// Upstream error code; "0" signals success
    #[serde(rename = "ErrorCode", default)]
    pub error_code: String,
    /// Payment amount in minor currency units
    #[serde(rename = "Amount", default)]
    pub amount: u64,
    /// Recurring-payment identifier, when a card was bound
    #[serde(rename = "RebillId", default)]
    pub rebill_id: u64,
    /// Bound card identifier
    #[serde(rename = "CardId", default)]
    pub card_id: u64,
    /// Masked card number
    #[serde(rename = "Pan", default)]
    pub pan: String,
    /// Card expiry in MMYY form
    #[serde(rename = "ExpDate", default)]
    pub exp_date: String,
    /// Passthrough data supplied at session creation
    #[serde(rename = "DATA", default, skip_serializing_if = "Option::is_none")]
    pub data: Option<HashMap<String, String>>,
    /// Token attached by the sender
    #[serde(rename = "Token", default)]
    pub token: String,
}

impl Notification {
    /// Field values participating in the notification token.
    ///
    /// Everything the sender signed except the token itself: scalar business
    /// fields plus the terminal key from the payload. The shared password is
    /// never transmitted and must be injected by the verifier.
    pub(crate) fn values_for_token(&self) -> TokenValues {
        let mut values = TokenValues::from([
            ("TerminalKey".to_string(), self.terminal_key.clone()),
            ("OrderId".to_string(), self.order_id.clone()),
            (
                "Success".to_string(),
                if self.success { "true" } else { "false" }.to_string(),
            ),
            ("Status".to_string(), self.status.clone()),
            ("PaymentId".to_string(), self.payment_id.to_string()),
            ("ErrorCode".to_string(), self.error_code.clone()),
            ("Amount".to_string(), self.amount.to_string()),
            ("Pan".to_string(), self.pan.clone()),
            ("ExpDate".to_string(), self.exp_date.clone()),
        ]);
        token::insert_if_nonzero(&mut values, "RebillId", self.rebill_id);
        token::insert_if_nonzero(&mut values, "CardId", self.card_id);
        values
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_values_cover_business_fields() {
        let notification = Notification {
            terminal_key: "TestTerm".to_string(),
            order_id: "order-1".to_string(),
            success: true,
            status: "CONFIRMED".to_string(),
            payment_id: 13660,
            error_code: "0".to_string(),
            amount: 10000,
            pan: "430000******0777".to_string(),
            exp_date: "1122".to_string(),
            ..Notification::default()
        };

        let values = notification.values_for_token();
        assert_eq!(values.get("Success"), Some(&"true".to_string()));
        assert_eq!(values.get("PaymentId"), Some(&"13660".to_string()));
        assert_eq!(values.get("Amount"), Some(&"10000".to_string()));
        assert!(!values.contains_key("Token"));
        // Unset optional numerics stay out entirely
        assert!(!values.contains_key("RebillId"));
        assert!(!values.contains_key("CardId"));
    }

    #[test]
    fn test_token_values_include_set_optionals() {
        let notification = Notification {
            rebill_id: 171,
            card_id: 5555,
            ..Notification::default()
        };

        let values = notification.values_for_token();
        assert_eq!(values.get("RebillId"), Some(&"171".to_string()));
        assert_eq!(values.get("CardId"), Some(&"5555".to_string()));
        assert_eq!(values.get("Success"), Some(&"false".to_string()));
    }
}
