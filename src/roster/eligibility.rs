//! Candidate admission rules, applied before ranking.
//!
//! Eligibility is a hard yes/no gate; preference among eligible employees
//! is the ranker's and selector's concern. Rules, in order:
//!
//! 1. Non-available statuses (sick, vacation, terminated) are out.
//! 2. The Express winner cannot also take Instances in the same week.
//! 3. An employee with no window history for the category is always in.
//! 4. Otherwise the employee is still in: counts are tracked per
//!    category, so window activity in any other category, including the
//!    opposite release role, never disqualifies on its own.

use crate::models::{DutyCategory, DutySummary, Employee, EmployeeId};

/// Decide whether `employee` may be considered for `category`.
///
/// `summary` is the employee's aggregate for this category in the current
/// window; `excluded` carries the Express winner's id while the Instances
/// slot is being filled. No side effects.
pub fn is_eligible(
    employee: &Employee,
    category: DutyCategory,
    summary: DutySummary,
    excluded: Option<EmployeeId>,
) -> bool {
    if !employee.status.is_available() {
        return false;
    }
    if category == DutyCategory::InstancesRelease && excluded == Some(employee.id) {
        return false;
    }
    if summary.count == 0 {
        // Never served in this window: always a candidate.
        return true;
    }
    // Prior window history only influences ranking and cooldown, never
    // admission.
    true
}
