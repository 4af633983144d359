//! # acquiring - token-signed payment API client
//!
//! A client for an internet-acquiring HTTP API that authenticates every
//! request with a deterministic SHA-256 token. The library builds typed
//! requests, signs them with the terminal credentials, dispatches them over
//! HTTPS, and decodes typed responses sharing a common success/error
//! envelope. Asynchronous payment notifications sent by the API are parsed
//! and token-verified before they reach business logic.
//!
//! ```no_run
//! use acquiring::{AcquiringClient, InitRequest};
//!
//! # async fn demo() -> acquiring::Result<()> {
//! let client = AcquiringClient::new("TerminalKey", "password");
//! let response = client.init(InitRequest::new(10000, "order-1")).await?;
//! println!("pay at {}", response.payment_url);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod error;
pub mod notification;
pub mod token;
pub mod types;

// Re-exports for convenience
pub use client::{AcquiringClient, DEFAULT_BASE_URL};
pub use error::{AcquiringError, ApiError, Result};
pub use notification::{Notification, NOTIFICATION_SUCCESS_RESPONSE};
pub use types::*;

/// Current version of the acquiring library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
