//! Common test utilities

use chrono::NaiveDate;

use rota::models::{DutyLedger, Employee, EmployeeStatus, FairnessWindow};

/// Shorthand for building dates in tests
pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// The Monday most tests schedule against
#[allow(dead_code)]
pub fn monday() -> NaiveDate {
    date(2025, 8, 18)
}

/// Fairness window covering Q3 2025 up to the scheduled week's Sunday
#[allow(dead_code)]
pub fn window() -> FairnessWindow {
    FairnessWindow::new(date(2025, 7, 1), date(2025, 8, 24))
}

/// An empty ledger over the standard test window
#[allow(dead_code)]
pub fn empty_ledger() -> DutyLedger {
    DutyLedger::new(window())
}

/// Roster of `n` available employees with ids 1..=n and handles emp1..empN
#[allow(dead_code)]
pub fn roster_of(n: usize) -> Vec<Employee> {
    (1..=n as i64)
        .map(|id| {
            Employee::new(
                id,
                format!("Employee {id}"),
                format!("emp{id}"),
                EmployeeStatus::Available,
            )
        })
        .collect()
}
