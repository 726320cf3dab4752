//! Persistence for the roster, the duty history, and the fairness epoch
//! marker.
//!
//! Summaries are always derived from the append-only history at query
//! time; no duty count is stored as a mutable field anywhere.

pub mod repository;

pub use repository::{
    create_memory_repository, create_sqlite_repository, MemoryRosterRepository, RosterRepository,
    SharedRosterRepository, SqliteRosterRepository,
};
