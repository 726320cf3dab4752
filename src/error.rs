//! Unified error handling for the rota crate
//!
//! The scheduling core has its own typed error ([`RosterError`]); this
//! module wraps it together with the collaborator-layer failures
//! (storage, delivery, serialization, configuration) into a single
//! `Error` enum usable across module boundaries. Binary-side command
//! code stays on `anyhow` for user-facing context chains.

use std::io;
use thiserror::Error;

// Re-export the core error for convenience
pub use crate::roster::error::{RosterError, RosterResult};

/// Unified error type for the rota crate
#[derive(Error, Debug)]
pub enum Error {
    /// Scheduling-core failures (no candidate, broken invariant, bad window)
    #[error("Scheduling error: {0}")]
    Roster(#[from] RosterError),

    /// Database errors
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Roster storage errors (duplicate handle, malformed stored data)
    #[error("Storage error: {0}")]
    Storage(anyhow::Error),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Outbound webhook delivery errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Configuration errors
    #[error("Config error: {0}")]
    Config(String),

    /// Webhook delivery gave up after exhausting retries
    #[error("Delivery error: {0}")]
    Delivery(String),
}

impl Error {
    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a delivery error
    pub fn delivery(message: impl Into<String>) -> Self {
        Self::Delivery(message.into())
    }

    /// True when the failure is a staffing shortfall a user can fix by
    /// adjusting statuses, rather than an internal fault.
    pub fn is_staffing_shortfall(&self) -> bool {
        matches!(self, Self::Roster(e) if e.is_staffing_shortfall())
    }
}

// anyhow::Error carries no std::error::Error impl, so the conversion is
// written out instead of derived.
impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Self::Storage(err)
    }
}

/// Result type alias using the unified error
pub type Result<T> = std::result::Result<T, Error>;
