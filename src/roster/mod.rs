//! Rotation-fairness scheduling core.
//!
//! Everything in this module is pure computation: one scheduling run
//! takes a roster snapshot, a duty ledger derived for one fairness
//! window, and a target Monday, and returns either a complete week
//! assignment with the records to persist or a typed failure. No I/O, no
//! logging, no clocks.
//!
//! # Architecture
//!
//! ```text
//!                 ┌────────────────────┐
//!                 │ FairnessWindowPolicy│  window + reset decision
//!                 └─────────┬──────────┘
//!                           │ bounds the ledger
//!                           ▼
//!  roster ──► eligibility ──► rank ──► select ──► WeekAssignmentBuilder
//!  snapshot   (admission)   (fairness  (two-phase   (slot order, cross-slot
//!                            ordering)  cooldown)    invariants, outcome)
//! ```
//!
//! The builder re-runs the filter → rank → select pipeline for every
//! slot, so each pick sees the consequences of the previous ones through
//! its working ledger copy while the caller's data stays untouched.

pub mod builder;
pub mod eligibility;
pub mod error;
pub mod rank;
pub mod select;
pub mod week;
pub mod window;

pub use builder::{ScheduleOutcome, WeekAssignmentBuilder};
pub use error::{RosterError, RosterResult};
pub use select::{Cooldowns, Selection};
pub use window::{FairnessWindowPolicy, DEFAULT_RESET_INTERVAL_DAYS};
