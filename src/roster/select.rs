//! Two-phase slot selection.
//!
//! Phase 1 walks the ranked candidates and takes the first one who never
//! served or whose last duty lies at least the cooldown behind the target
//! date. Phase 2 fires only when the whole pool is inside cooldown: the
//! same ranked order is re-scanned ignoring the cooldown test, so the
//! lowest-count candidate absorbs the extra load and a slot is never left
//! empty while any eligible employee exists.

use chrono::NaiveDate;

use super::error::{RosterError, RosterResult};
use crate::models::{DutyCategory, DutyLedger, DutySummary, Employee};

/// Per-category cooldown thresholds, in days
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cooldowns {
    pub support_days: u32,
    pub release_days: u32,
}

impl Cooldowns {
    pub fn new(support_days: u32, release_days: u32) -> Self {
        Self {
            support_days,
            release_days,
        }
    }

    /// Threshold applying to `category`
    pub fn for_category(&self, category: DutyCategory) -> u32 {
        if category.is_release() {
            self.release_days
        } else {
            self.support_days
        }
    }
}

impl Default for Cooldowns {
    fn default() -> Self {
        Self {
            support_days: 7,
            release_days: 14,
        }
    }
}

/// A successful pick: the chosen employee plus the summary they will
/// carry once the assignment is recorded (count + 1, last duty = target
/// date).
#[derive(Debug, Clone, Copy)]
pub struct Selection<'a> {
    pub employee: &'a Employee,
    pub updated_summary: DutySummary,
}

/// Pick the assignee for one slot from an already filtered and ranked
/// candidate sequence.
///
/// Fails with `NoEligibleCandidate` only when `ranked` is empty; with at
/// least one candidate the phase-2 fallback guarantees a pick.
pub fn select<'a>(
    ranked: &[&'a Employee],
    category: DutyCategory,
    ledger: &DutyLedger,
    cooldown_days: u32,
    target_date: NaiveDate,
) -> RosterResult<Selection<'a>> {
    if ranked.is_empty() {
        return Err(RosterError::no_eligible(category, target_date));
    }

    let chosen = ranked
        .iter()
        .copied()
        .find(|employee| {
            past_cooldown(
                ledger.summary(employee.id, category),
                cooldown_days,
                target_date,
            )
        })
        // Whole pool inside cooldown: fall back to the lowest-count head.
        .unwrap_or(ranked[0]);

    let updated_summary = ledger.summary(chosen.id, category).after_duty(target_date);
    Ok(Selection {
        employee: chosen,
        updated_summary,
    })
}

/// Strict-phase test: never served, or rested at least `cooldown_days`
fn past_cooldown(summary: DutySummary, cooldown_days: u32, target_date: NaiveDate) -> bool {
    match summary.last_duty_date {
        None => true,
        Some(last) => (target_date - last).num_days() >= i64::from(cooldown_days),
    }
}
