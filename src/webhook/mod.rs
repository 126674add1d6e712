//! n8n webhook integration.
//!
//! Each submitted work log is POSTed as one JSON object to the configured
//! webhook, which appends it to the Google Sheet. The sheet is opaque to us:
//! nothing is read back and nothing is kept locally.

pub mod client;

pub use client::{WebhookClient, WebhookError, WebhookTransport};
