//! rota - Weekly duty roster with fairness-based rotation
//!
//! Assigns two release roles (Express, Instances) and five daily Support
//! slots per week from a pool of employees, balancing workload counts
//! and cooldown periods over a periodically reset fairness window.
//!
//! # Architecture
//!
//! The library is organized into several modules:
//!
//! - [`roster`] - The pure scheduling core (eligibility, ranking,
//!   two-phase selection, week orchestration, window policy)
//! - [`models`] - Core data structures and types
//! - [`storage`] - Roster and duty-history persistence (SQLite, in-memory)
//! - [`service`] - The schedule service tying storage and core together
//! - [`report`] - Chat/terminal rendering of results
//! - [`notify`] - Webhook delivery of rendered announcements
//! - [`bot`] - The `/schedule` chat-bot HTTP server
//! - [`config`] - Configuration management and settings
//!
//! # Example
//!
//! ```no_run
//! use rota::config::SchedulingConfig;
//! use rota::service::ScheduleService;
//! use rota::storage::create_memory_repository;
//!
//! fn main() -> rota::Result<()> {
//!     let repo = create_memory_repository();
//!     repo.add_employee("Alice Example", "alice")?;
//!     let service = ScheduleService::new(repo, &SchedulingConfig::default());
//!     let today = chrono::Local::now().date_naive();
//!     let overview = service.team_overview(today)?;
//!     println!("{}", rota::report::render_team(&overview));
//!     Ok(())
//! }
//! ```

pub mod bot;
pub mod config;
pub mod error;
pub mod models;
pub mod notify;
pub mod report;
pub mod roster;
pub mod service;
pub mod storage;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::config::Config;
    pub use crate::error::{Error, Result, RosterError};
    pub use crate::models::{
        DutyCategory, DutyLedger, DutyRecord, DutySummary, Employee, EmployeeStatus,
        FairnessWindow, WeekAssignment,
    };
    pub use crate::roster::{Cooldowns, FairnessWindowPolicy, WeekAssignmentBuilder};
    pub use crate::service::ScheduleService;
    pub use crate::storage::{RosterRepository, SharedRosterRepository};
}

// Direct re-exports for convenience
pub use error::{Error, Result};
pub use models::{DutyCategory, Employee, EmployeeStatus, WeekAssignment};
