//! Fairness ordering: ascending workload, oldest last duty first.

use crate::models::{DutyCategory, DutyLedger, Employee};

/// Order candidates for `category` by ascending duty count, ties broken
/// by ascending last-duty date. An absent date sorts before any present
/// date, so employees who never served in the window lead outright.
///
/// The sort is stable and leaves residual ties in the caller's roster
/// order; it must be re-run per category because an employee's position
/// differs between categories.
pub fn rank<'a>(
    candidates: Vec<&'a Employee>,
    category: DutyCategory,
    ledger: &DutyLedger,
) -> Vec<&'a Employee> {
    let mut ranked = candidates;
    ranked.sort_by_key(|employee| {
        let summary = ledger.summary(employee.id, category);
        (summary.count, summary.last_duty_date)
    });
    ranked
}
