//! Typed failures produced by a scheduling run.
//!
//! Every error here is returned to the immediate caller as a value; the
//! core never logs, retries, or partially commits.

use chrono::NaiveDate;
use thiserror::Error;

use crate::models::DutyCategory;

/// Result type for scheduling-core operations
pub type RosterResult<T> = Result<T, RosterError>;

/// Errors a scheduling run can end with
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RosterError {
    /// No employee passed eligibility and selection for a required slot.
    /// The whole run aborts; nothing partial is returned.
    #[error("no eligible candidate for {} duty on {} ({})", .category.display_name(), .date, .date.format("%A"))]
    NoEligibleCandidate {
        category: DutyCategory,
        date: NaiveDate,
    },

    /// A cross-slot invariant broke despite eligibility filtering. Should
    /// be unreachable; the builder fails fast instead of emitting an
    /// invalid week.
    #[error("assignment invariant violated: {detail}")]
    InvariantViolation { detail: String },

    /// Fairness window computed with start after end
    #[error("invalid fairness window: start {start} is after end {end}")]
    InvalidWindow { start: NaiveDate, end: NaiveDate },
}

impl RosterError {
    /// Create a NoEligibleCandidate error
    pub fn no_eligible(category: DutyCategory, date: NaiveDate) -> Self {
        Self::NoEligibleCandidate { category, date }
    }

    /// Create an InvariantViolation error
    pub fn invariant(detail: impl Into<String>) -> Self {
        Self::InvariantViolation {
            detail: detail.into(),
        }
    }

    /// Create an InvalidWindow error
    pub fn invalid_window(start: NaiveDate, end: NaiveDate) -> Self {
        Self::InvalidWindow { start, end }
    }

    /// True when the failure is a staffing shortfall rather than a bug,
    /// i.e. the kind a caller surfaces to users instead of reporting as
    /// an internal fault.
    pub fn is_staffing_shortfall(&self) -> bool {
        matches!(self, Self::NoEligibleCandidate { .. })
    }
}
