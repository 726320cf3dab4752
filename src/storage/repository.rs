//! Repository pattern for the roster and duty history.
//!
//! Trait-based storage abstraction keeping the scheduling service
//! independent of the backing store:
//! - SQLite for production use
//! - An in-memory implementation for tests and ephemeral runs
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │              ScheduleService                │
//! └─────────────────────────────────────────────┘
//!                       │
//!                       ▼
//! ┌─────────────────────────────────────────────┐
//! │         RosterRepository (trait)            │
//! │ roster CRUD · windowed summaries · history  │
//! │ appends · fairness reset marker             │
//! └─────────────────────────────────────────────┘
//!            │                     │
//!            ▼                     ▼
//! ┌─────────────────┐   ┌─────────────────────┐
//! │     SQLite      │   │      In-memory      │
//! └─────────────────┘   └─────────────────────┘
//! ```
//!
//! Duty summaries are always derived from the append-only history at
//! query time; no count is ever stored as a mutable field.

use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex, RwLock};

use anyhow::{bail, Context, Result};
use chrono::{NaiveDate, Utc};
use rusqlite::{params, Connection, OptionalExtension};

use crate::models::{
    DutyCategory, DutyLedger, DutyRecord, DutySummary, Employee, EmployeeId, EmployeeStatus,
    FairnessWindow,
};

/// State key holding the fairness epoch marker
const LAST_RESET_KEY: &str = "last_reset_date";

// ============================================================================
// Repository Trait
// ============================================================================

/// Storage contract for the roster, the duty history, and the fairness
/// reset marker.
///
/// Implementations are interchangeable as long as they keep history
/// append-only and derive summaries strictly within the requested window.
pub trait RosterRepository: Send + Sync {
    /// Load every employee, ascending id order (terminated ones included;
    /// eligibility is the scheduling core's concern)
    fn load_roster(&self) -> Result<Vec<Employee>>;

    /// Find one employee by handle
    fn find_by_handle(&self, handle: &str) -> Result<Option<Employee>>;

    /// Add an employee with status `available`; handles are unique
    fn add_employee(&self, name: &str, handle: &str) -> Result<Employee>;

    /// Update one employee's status; false when the handle is unknown
    fn update_status(&self, handle: &str, status: EmployeeStatus) -> Result<bool>;

    /// Derive per-(employee, category) duty summaries strictly within the
    /// window
    fn duty_summaries(&self, window: FairnessWindow) -> Result<DutyLedger>;

    /// Append duty records to the history, all or nothing
    fn append_records(&self, records: &[DutyRecord]) -> Result<()>;

    /// Remove history records dated within [start, end]; returns how many
    /// were removed. Used to replace an already-saved week before
    /// re-appending its regenerated records.
    fn delete_records_between(&self, start: NaiveDate, end: NaiveDate) -> Result<usize>;

    /// Read the fairness epoch marker
    fn last_reset_date(&self) -> Result<Option<NaiveDate>>;

    /// Persist the fairness epoch marker
    fn set_last_reset_date(&self, date: NaiveDate) -> Result<()>;
}

// ============================================================================
// SQLite Implementation
// ============================================================================

/// SQLite implementation of RosterRepository
///
/// Uses `Mutex` to ensure thread-safety for the SQLite connection. Dates
/// are stored as ISO `YYYY-MM-DD` text, which keeps `MAX(duty_date)`
/// chronological.
pub struct SqliteRosterRepository {
    conn: Mutex<Connection>,
}

impl SqliteRosterRepository {
    /// Open (or create) a roster database at `path`
    pub fn new(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path).context("Failed to open SQLite database")?;

        // WAL mode for concurrent readers alongside the writer.
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA synchronous=NORMAL;")?;

        let repo = Self {
            conn: Mutex::new(conn),
        };
        repo.create_schema()?;

        tracing::info!(path = %path.display(), "SQLite roster repository initialized");
        Ok(repo)
    }

    /// Create in-memory repository (for testing)
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().context("Failed to create in-memory SQLite")?;
        let repo = Self {
            conn: Mutex::new(conn),
        };
        repo.create_schema()?;
        Ok(repo)
    }

    fn create_schema(&self) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute_batch(
            r#"
                CREATE TABLE IF NOT EXISTS employees (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    name TEXT NOT NULL,
                    handle TEXT NOT NULL UNIQUE,
                    status TEXT NOT NULL DEFAULT 'available'
                );

                CREATE TABLE IF NOT EXISTS duty_history (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    employee_id INTEGER NOT NULL REFERENCES employees(id),
                    category TEXT NOT NULL,
                    duty_date TEXT NOT NULL
                );

                CREATE INDEX IF NOT EXISTS idx_duty_history_date
                    ON duty_history(duty_date);

                CREATE INDEX IF NOT EXISTS idx_duty_history_employee
                    ON duty_history(employee_id, category);

                CREATE TABLE IF NOT EXISTS roster_state (
                    key TEXT PRIMARY KEY,
                    value TEXT NOT NULL,
                    updated_at TEXT NOT NULL
                );
                "#,
        )
        .context("Failed to create SQLite schema")?;

        Ok(())
    }

    fn save_state(&self, key: &str, value: &str) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        let now = Utc::now().to_rfc3339();

        conn.execute(
            r#"
                INSERT INTO roster_state (key, value, updated_at)
                VALUES (?1, ?2, ?3)
                ON CONFLICT(key) DO UPDATE SET
                    value = excluded.value,
                    updated_at = excluded.updated_at
                "#,
            params![key, value, now],
        )
        .context("Failed to save roster state")?;

        Ok(())
    }

    fn load_state(&self, key: &str) -> Result<Option<String>> {
        let conn = self.conn.lock().unwrap();
        let value = conn
            .query_row(
                "SELECT value FROM roster_state WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()
            .context("Failed to load roster state")?;

        Ok(value)
    }
}

fn employee_from_row(id: EmployeeId, name: String, handle: String, status: String) -> Result<Employee> {
    let status = EmployeeStatus::parse(&status)
        .with_context(|| format!("unknown employee status '{status}' for @{handle}"))?;
    Ok(Employee::new(id, name, handle, status))
}

impl RosterRepository for SqliteRosterRepository {
    fn load_roster(&self) -> Result<Vec<Employee>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn
            .prepare("SELECT id, name, handle, status FROM employees ORDER BY id")
            .context("Failed to prepare roster query")?;

        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
            ))
        })?;

        let mut roster = Vec::new();
        for row in rows {
            let (id, name, handle, status) = row?;
            roster.push(employee_from_row(id, name, handle, status)?);
        }
        Ok(roster)
    }

    fn find_by_handle(&self, handle: &str) -> Result<Option<Employee>> {
        let conn = self.conn.lock().unwrap();
        let row = conn
            .query_row(
                "SELECT id, name, handle, status FROM employees WHERE handle = ?1",
                params![handle],
                |row| {
                    Ok((
                        row.get::<_, i64>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, String>(2)?,
                        row.get::<_, String>(3)?,
                    ))
                },
            )
            .optional()
            .context("Failed to look up employee")?;

        match row {
            Some((id, name, handle, status)) => {
                Ok(Some(employee_from_row(id, name, handle, status)?))
            }
            None => Ok(None),
        }
    }

    fn add_employee(&self, name: &str, handle: &str) -> Result<Employee> {
        if self.find_by_handle(handle)?.is_some() {
            bail!("employee with handle @{handle} already exists");
        }

        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO employees (name, handle, status) VALUES (?1, ?2, ?3)",
            params![name, handle, EmployeeStatus::Available.as_str()],
        )
        .context("Failed to insert employee")?;

        let id = conn.last_insert_rowid();
        Ok(Employee::new(id, name, handle, EmployeeStatus::Available))
    }

    fn update_status(&self, handle: &str, status: EmployeeStatus) -> Result<bool> {
        let conn = self.conn.lock().unwrap();
        let changed = conn
            .execute(
                "UPDATE employees SET status = ?1 WHERE handle = ?2",
                params![status.as_str(), handle],
            )
            .context("Failed to update employee status")?;
        Ok(changed > 0)
    }

    fn duty_summaries(&self, window: FairnessWindow) -> Result<DutyLedger> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn
            .prepare(
                r#"
                SELECT employee_id, category, COUNT(*), MAX(duty_date)
                FROM duty_history
                WHERE duty_date >= ?1 AND duty_date <= ?2
                GROUP BY employee_id, category
                "#,
            )
            .context("Failed to prepare summary query")?;

        let rows = stmt.query_map(
            params![window.start.to_string(), window.end.to_string()],
            |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, i64>(2)?,
                    row.get::<_, String>(3)?,
                ))
            },
        )?;

        let mut ledger = DutyLedger::new(window);
        for row in rows {
            let (employee_id, category, count, last_duty) = row?;
            let category = DutyCategory::parse(&category)
                .with_context(|| format!("unknown duty category '{category}' in history"))?;
            let last_duty: NaiveDate = last_duty
                .parse()
                .with_context(|| format!("malformed duty date '{last_duty}' in history"))?;
            ledger.set_summary(
                employee_id,
                category,
                DutySummary::new(count as u32, Some(last_duty)),
            );
        }
        Ok(ledger)
    }

    fn append_records(&self, records: &[DutyRecord]) -> Result<()> {
        let mut conn = self.conn.lock().unwrap();
        let tx = conn.transaction().context("Failed to begin transaction")?;
        {
            let mut stmt = tx
                .prepare(
                    "INSERT INTO duty_history (employee_id, category, duty_date) VALUES (?1, ?2, ?3)",
                )
                .context("Failed to prepare history insert")?;
            for record in records {
                stmt.execute(params![
                    record.employee_id,
                    record.category.as_str(),
                    record.date.to_string()
                ])
                .context("Failed to append duty record")?;
            }
        }
        tx.commit().context("Failed to commit duty records")?;
        Ok(())
    }

    fn delete_records_between(&self, start: NaiveDate, end: NaiveDate) -> Result<usize> {
        let conn = self.conn.lock().unwrap();
        let removed = conn
            .execute(
                "DELETE FROM duty_history WHERE duty_date >= ?1 AND duty_date <= ?2",
                params![start.to_string(), end.to_string()],
            )
            .context("Failed to delete duty records")?;
        Ok(removed)
    }

    fn last_reset_date(&self) -> Result<Option<NaiveDate>> {
        match self.load_state(LAST_RESET_KEY)? {
            Some(value) => {
                let date = value
                    .parse()
                    .with_context(|| format!("malformed last reset date '{value}'"))?;
                Ok(Some(date))
            }
            None => Ok(None),
        }
    }

    fn set_last_reset_date(&self, date: NaiveDate) -> Result<()> {
        self.save_state(LAST_RESET_KEY, &date.to_string())
    }
}

// ============================================================================
// In-memory Implementation
// ============================================================================

#[derive(Default)]
struct MemoryState {
    employees: Vec<Employee>,
    history: Vec<DutyRecord>,
    state: HashMap<String, String>,
    next_id: EmployeeId,
}

/// In-memory implementation of RosterRepository
///
/// Same observable semantics as the SQLite store; useful for tests and
/// throwaway runs without a database file.
pub struct MemoryRosterRepository {
    inner: RwLock<MemoryState>,
}

impl MemoryRosterRepository {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(MemoryState {
                next_id: 1,
                ..MemoryState::default()
            }),
        }
    }

    /// Number of history records currently held
    pub fn history_len(&self) -> usize {
        self.inner.read().unwrap().history.len()
    }
}

impl Default for MemoryRosterRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl RosterRepository for MemoryRosterRepository {
    fn load_roster(&self) -> Result<Vec<Employee>> {
        let state = self.inner.read().unwrap();
        // Insertion order is id order.
        Ok(state.employees.clone())
    }

    fn find_by_handle(&self, handle: &str) -> Result<Option<Employee>> {
        let state = self.inner.read().unwrap();
        Ok(state
            .employees
            .iter()
            .find(|employee| employee.handle == handle)
            .cloned())
    }

    fn add_employee(&self, name: &str, handle: &str) -> Result<Employee> {
        let mut state = self.inner.write().unwrap();
        if state.employees.iter().any(|e| e.handle == handle) {
            bail!("employee with handle @{handle} already exists");
        }
        let id = state.next_id;
        state.next_id += 1;
        let employee = Employee::new(id, name, handle, EmployeeStatus::Available);
        state.employees.push(employee.clone());
        Ok(employee)
    }

    fn update_status(&self, handle: &str, status: EmployeeStatus) -> Result<bool> {
        let mut state = self.inner.write().unwrap();
        match state
            .employees
            .iter_mut()
            .find(|employee| employee.handle == handle)
        {
            Some(employee) => {
                employee.status = status;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn duty_summaries(&self, window: FairnessWindow) -> Result<DutyLedger> {
        let state = self.inner.read().unwrap();
        Ok(DutyLedger::from_records(window, &state.history))
    }

    fn append_records(&self, records: &[DutyRecord]) -> Result<()> {
        let mut state = self.inner.write().unwrap();
        state.history.extend_from_slice(records);
        Ok(())
    }

    fn delete_records_between(&self, start: NaiveDate, end: NaiveDate) -> Result<usize> {
        let mut state = self.inner.write().unwrap();
        let before = state.history.len();
        state
            .history
            .retain(|record| record.date < start || record.date > end);
        Ok(before - state.history.len())
    }

    fn last_reset_date(&self) -> Result<Option<NaiveDate>> {
        let state = self.inner.read().unwrap();
        match state.state.get(LAST_RESET_KEY) {
            Some(value) => {
                let date = value
                    .parse()
                    .with_context(|| format!("malformed last reset date '{value}'"))?;
                Ok(Some(date))
            }
            None => Ok(None),
        }
    }

    fn set_last_reset_date(&self, date: NaiveDate) -> Result<()> {
        let mut state = self.inner.write().unwrap();
        state
            .state
            .insert(LAST_RESET_KEY.to_string(), date.to_string());
        Ok(())
    }
}

// ============================================================================
// Shared Repository Types
// ============================================================================

/// Thread-safe shared repository handle
pub type SharedRosterRepository = Arc<dyn RosterRepository>;

/// Create a shared SQLite repository
pub fn create_sqlite_repository(path: impl AsRef<Path>) -> Result<SharedRosterRepository> {
    let repo = SqliteRosterRepository::new(path)?;
    Ok(Arc::new(repo))
}

/// Create a shared in-memory repository
pub fn create_memory_repository() -> SharedRosterRepository {
    Arc::new(MemoryRosterRepository::new())
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn window() -> FairnessWindow {
        FairnessWindow::new(date(2025, 7, 1), date(2025, 8, 24))
    }

    // Helper to exercise both implementations with one test body
    fn create_test_repos() -> Vec<Box<dyn RosterRepository>> {
        vec![
            Box::new(SqliteRosterRepository::in_memory().unwrap()),
            Box::new(MemoryRosterRepository::new()),
        ]
    }

    #[test]
    fn test_add_and_load_roster_in_id_order() {
        for repo in create_test_repos() {
            let alice = repo.add_employee("Alice Example", "alice").unwrap();
            let bob = repo.add_employee("Bob Sample", "bob").unwrap();
            assert!(alice.id < bob.id);
            assert_eq!(alice.status, EmployeeStatus::Available);

            let roster = repo.load_roster().unwrap();
            assert_eq!(roster.len(), 2);
            assert_eq!(roster[0].handle, "alice");
            assert_eq!(roster[1].handle, "bob");
        }
    }

    #[test]
    fn test_duplicate_handle_is_rejected() {
        for repo in create_test_repos() {
            repo.add_employee("Alice Example", "alice").unwrap();
            let err = repo.add_employee("Other Alice", "alice").unwrap_err();
            assert!(err.to_string().contains("already exists"));
        }
    }

    #[test]
    fn test_find_by_handle() {
        for repo in create_test_repos() {
            repo.add_employee("Alice Example", "alice").unwrap();
            let found = repo.find_by_handle("alice").unwrap().unwrap();
            assert_eq!(found.name, "Alice Example");
            assert!(repo.find_by_handle("nobody").unwrap().is_none());
        }
    }

    #[test]
    fn test_update_status() {
        for repo in create_test_repos() {
            repo.add_employee("Alice Example", "alice").unwrap();
            assert!(repo
                .update_status("alice", EmployeeStatus::Vacation)
                .unwrap());
            let found = repo.find_by_handle("alice").unwrap().unwrap();
            assert_eq!(found.status, EmployeeStatus::Vacation);

            assert!(!repo
                .update_status("nobody", EmployeeStatus::Sick)
                .unwrap());
        }
    }

    #[test]
    fn test_summaries_aggregate_within_window() {
        for repo in create_test_repos() {
            let alice = repo.add_employee("Alice Example", "alice").unwrap();
            let bob = repo.add_employee("Bob Sample", "bob").unwrap();

            repo.append_records(&[
                DutyRecord::new(alice.id, DutyCategory::Support, date(2025, 7, 7)),
                DutyRecord::new(alice.id, DutyCategory::Support, date(2025, 7, 21)),
                DutyRecord::new(alice.id, DutyCategory::ExpressRelease, date(2025, 8, 4)),
                // Outside the window on both sides.
                DutyRecord::new(bob.id, DutyCategory::Support, date(2025, 6, 30)),
                DutyRecord::new(bob.id, DutyCategory::Support, date(2025, 8, 25)),
            ])
            .unwrap();

            let ledger = repo.duty_summaries(window()).unwrap();

            let support = ledger.summary(alice.id, DutyCategory::Support);
            assert_eq!(support.count, 2);
            assert_eq!(support.last_duty_date, Some(date(2025, 7, 21)));

            let express = ledger.summary(alice.id, DutyCategory::ExpressRelease);
            assert_eq!(express.count, 1);
            assert_eq!(express.last_duty_date, Some(date(2025, 8, 4)));

            // Bob has no in-window history at all.
            assert_eq!(
                ledger.summary(bob.id, DutyCategory::Support),
                DutySummary::zero()
            );

            for (_, _, summary) in ledger.iter() {
                assert!(summary.is_consistent());
            }
        }
    }

    #[test]
    fn test_window_bounds_are_inclusive() {
        for repo in create_test_repos() {
            let alice = repo.add_employee("Alice Example", "alice").unwrap();
            repo.append_records(&[
                DutyRecord::new(alice.id, DutyCategory::Support, date(2025, 7, 1)),
                DutyRecord::new(alice.id, DutyCategory::Support, date(2025, 8, 24)),
            ])
            .unwrap();

            let ledger = repo.duty_summaries(window()).unwrap();
            let summary = ledger.summary(alice.id, DutyCategory::Support);
            assert_eq!(summary.count, 2);
            assert_eq!(summary.last_duty_date, Some(date(2025, 8, 24)));
        }
    }

    #[test]
    fn test_delete_records_between() {
        for repo in create_test_repos() {
            let alice = repo.add_employee("Alice Example", "alice").unwrap();
            repo.append_records(&[
                DutyRecord::new(alice.id, DutyCategory::Support, date(2025, 8, 18)),
                DutyRecord::new(alice.id, DutyCategory::Support, date(2025, 8, 19)),
                DutyRecord::new(alice.id, DutyCategory::Support, date(2025, 8, 25)),
            ])
            .unwrap();

            let removed = repo
                .delete_records_between(date(2025, 8, 18), date(2025, 8, 24))
                .unwrap();
            assert_eq!(removed, 2);

            let ledger = repo
                .duty_summaries(FairnessWindow::new(date(2025, 8, 1), date(2025, 8, 31)))
                .unwrap();
            assert_eq!(ledger.summary(alice.id, DutyCategory::Support).count, 1);
        }
    }

    #[test]
    fn test_last_reset_roundtrip() {
        for repo in create_test_repos() {
            assert!(repo.last_reset_date().unwrap().is_none());
            repo.set_last_reset_date(date(2025, 8, 14)).unwrap();
            assert_eq!(repo.last_reset_date().unwrap(), Some(date(2025, 8, 14)));
            // Overwrite moves the marker.
            repo.set_last_reset_date(date(2025, 8, 21)).unwrap();
            assert_eq!(repo.last_reset_date().unwrap(), Some(date(2025, 8, 21)));
        }
    }

    #[test]
    fn test_status_string_roundtrip_through_store() {
        for repo in create_test_repos() {
            repo.add_employee("Terry Sample", "terry").unwrap();
            repo.update_status("terry", EmployeeStatus::Terminated)
                .unwrap();
            let roster = repo.load_roster().unwrap();
            assert_eq!(roster[0].status, EmployeeStatus::Terminated);
        }
    }
}
