//! Outbound message delivery.
//!
//! One channel: an HTTP webhook receiving rendered announcements as
//! JSON. Retry with exponential backoff on transient failures.

pub mod webhook;

pub use webhook::{WebhookConfig, WebhookNotifier};
