//! Client SDK for the Engagespot notification API.
//!
//! This crate provides:
//! - A fluent builder for notifications, validated before anything is sent
//! - HMAC-SHA256 user signatures for Engagespot HMAC authentication
//! - A client for the `notifications` and `sdk/connect` endpoints over an injectable transport
//!
//! # Example
//! ```ignore
//! use engagespot::Engagespot;
//!
//! let client = Engagespot::new("api-key", "api-secret");
//!
//! client
//!     .create_notification("Hi")
//!     .set_message("hello")
//!     .add_recipient("a@x.com")
//!     .send()
//!     .await?;
//!
//! let signature = client.gen_hmac("a@x.com");
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod notification;
pub mod signing;
pub mod telemetry;
pub mod types;

// Re-export commonly used types
pub use client::{ClientOptions, Engagespot};
pub use error::{Error, Result};
pub use http::{HttpClient, HttpRequest, HttpResponse, MockHttpClient, ReqwestHttpClient};
pub use notification::Notification;
pub use types::{Credentials, NotificationContent, NotificationOverride, NotificationPayload};
