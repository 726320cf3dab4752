//! Week assignment orchestration.
//!
//! The builder drives the two-phase selector through the fixed slot order
//! of one week:
//!
//! ```text
//! ExpressPending ──► InstancesPending ──► SupportPending(0) ─ ... ─► SupportPending(4) ──► Complete
//!        │                  │                     │                          │
//!        └──────────────────┴──────── any selector failure ─────────────────┘
//!                                          │
//!                                          ▼
//!                                  Err (run discarded)
//! ```
//!
//! Every slot builds a fresh filtered and ranked candidate sequence; the
//! builder works on its own copy of the duty ledger and hands back the
//! proposed records only on completion, so a failed run leaves no trace
//! anywhere (all-or-nothing). Release winners stay in the Support pool:
//! one person may hold a release role and a Support shift in the same
//! week, but never both release roles, and never two Support days.

use std::collections::HashSet;

use chrono::{Days, NaiveDate};

use super::error::{RosterError, RosterResult};
use super::select::{Cooldowns, Selection};
use super::{eligibility, rank, select, week};
use crate::models::{
    AssignmentSlot, DutyCategory, DutyLedger, DutyRecord, Employee, EmployeeId, WeekAssignment,
    SUPPORT_DAYS_PER_WEEK,
};

/// Progress through the fixed slot order of one run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BuildState {
    ExpressPending,
    InstancesPending,
    SupportPending { day: usize },
    Complete,
}

/// Everything a completed run hands back for persistence: the assignment,
/// the history records realizing it, and the working ledger with every
/// assignee's summary already advanced (count + 1, last duty = slot date).
#[derive(Debug, Clone)]
pub struct ScheduleOutcome {
    pub assignment: WeekAssignment,
    pub records: Vec<DutyRecord>,
    pub ledger: DutyLedger,
}

/// Assembles one week's duty assignment from a roster snapshot and a
/// derived duty ledger.
///
/// The builder is pure computation: no I/O, no clock, no logging. It
/// consumes itself on `build`, so a single instance produces at most one
/// assignment.
pub struct WeekAssignmentBuilder<'a> {
    roster: &'a [Employee],
    ledger: DutyLedger,
    cooldowns: Cooldowns,
    week_start: NaiveDate,
}

impl<'a> WeekAssignmentBuilder<'a> {
    pub fn new(
        roster: &'a [Employee],
        ledger: DutyLedger,
        cooldowns: Cooldowns,
        week_start: NaiveDate,
    ) -> Self {
        Self {
            roster,
            ledger,
            cooldowns,
            week_start,
        }
    }

    /// Run the state machine to completion.
    ///
    /// Express and Instances land on the target Monday; Support day `d`
    /// lands on Monday + `d`. Any selector failure aborts the whole run
    /// with the category and date that could not be filled.
    pub fn build(mut self) -> RosterResult<ScheduleOutcome> {
        let week_start = self.week_start;
        if !week::is_monday(week_start) {
            return Err(RosterError::invariant(format!(
                "week start {week_start} is not a Monday"
            )));
        }

        let mut assignment = WeekAssignment::new(week_start);
        let mut express_winner: Option<EmployeeId> = None;
        let mut support_used: HashSet<EmployeeId> = HashSet::new();
        let mut state = BuildState::ExpressPending;

        while state != BuildState::Complete {
            state = match state {
                BuildState::ExpressPending => {
                    let id = self.fill_slot(
                        &mut assignment,
                        DutyCategory::ExpressRelease,
                        week_start,
                        None,
                        &support_used,
                    )?;
                    express_winner = Some(id);
                    BuildState::InstancesPending
                }
                BuildState::InstancesPending => {
                    let id = self.fill_slot(
                        &mut assignment,
                        DutyCategory::InstancesRelease,
                        week_start,
                        express_winner,
                        &support_used,
                    )?;
                    if express_winner == Some(id) {
                        return Err(RosterError::invariant(format!(
                            "employee {id} holds both release roles"
                        )));
                    }
                    BuildState::SupportPending { day: 0 }
                }
                BuildState::SupportPending { day } => {
                    let date = week_start + Days::new(day as u64);
                    let id = self.fill_slot(
                        &mut assignment,
                        DutyCategory::Support,
                        date,
                        None,
                        &support_used,
                    )?;
                    if !support_used.insert(id) {
                        return Err(RosterError::invariant(format!(
                            "employee {id} assigned a second support day"
                        )));
                    }
                    if day + 1 == SUPPORT_DAYS_PER_WEEK {
                        BuildState::Complete
                    } else {
                        BuildState::SupportPending { day: day + 1 }
                    }
                }
                BuildState::Complete => BuildState::Complete,
            };
        }

        if !assignment.is_valid() {
            return Err(RosterError::invariant(
                "completed assignment failed structural validation",
            ));
        }

        let records = assignment.to_records();
        Ok(ScheduleOutcome {
            assignment,
            records,
            ledger: self.ledger,
        })
    }

    /// Filter, rank, and select for a single slot, then fold the pick
    /// into the working ledger and assignment.
    fn fill_slot(
        &mut self,
        assignment: &mut WeekAssignment,
        category: DutyCategory,
        date: NaiveDate,
        excluded: Option<EmployeeId>,
        support_used: &HashSet<EmployeeId>,
    ) -> RosterResult<EmployeeId> {
        let candidates: Vec<&'a Employee> = self
            .roster
            .iter()
            .filter(|employee| {
                if category == DutyCategory::Support && support_used.contains(&employee.id) {
                    return false;
                }
                eligibility::is_eligible(
                    employee,
                    category,
                    self.ledger.summary(employee.id, category),
                    excluded,
                )
            })
            .collect();

        let ranked = rank::rank(candidates, category, &self.ledger);
        let Selection {
            employee,
            updated_summary,
        } = select::select(
            &ranked,
            category,
            &self.ledger,
            self.cooldowns.for_category(category),
            date,
        )?;

        self.ledger
            .set_summary(employee.id, category, updated_summary);
        assignment.push(AssignmentSlot {
            employee_id: employee.id,
            category,
            date,
        });
        Ok(employee.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DutySummary, EmployeeStatus, FairnessWindow};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn monday() -> NaiveDate {
        date(2025, 8, 18)
    }

    fn window() -> FairnessWindow {
        FairnessWindow::new(date(2025, 7, 1), date(2025, 8, 24))
    }

    fn roster_of(n: usize) -> Vec<Employee> {
        (1..=n as EmployeeId)
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

    fn build(roster: &[Employee], ledger: DutyLedger) -> RosterResult<ScheduleOutcome> {
        WeekAssignmentBuilder::new(roster, ledger, Cooldowns::default(), monday()).build()
    }

    #[test]
    fn test_seven_fresh_employees_fill_a_full_week() {
        let roster = roster_of(7);
        let outcome = build(&roster, DutyLedger::new(window())).unwrap();
        let assignment = &outcome.assignment;

        assert!(assignment.is_valid());
        assert_eq!(assignment.express(), Some(1));
        assert_eq!(assignment.instances(), Some(2));

        let support: Vec<EmployeeId> = assignment
            .support_slots()
            .iter()
            .map(|slot| slot.employee_id)
            .collect();
        assert_eq!(support, vec![1, 2, 3, 4, 5]);

        // Slot dates: releases on Monday, support Monday through Friday.
        assert!(assignment
            .slots
            .iter()
            .filter(|slot| slot.category.is_release())
            .all(|slot| slot.date == monday()));
        let support_dates: Vec<NaiveDate> = assignment
            .support_slots()
            .iter()
            .map(|slot| slot.date)
            .collect();
        assert_eq!(
            support_dates,
            (0..5u64).map(|d| monday() + Days::new(d)).collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_two_employees_fail_on_wednesday_support() {
        let roster = roster_of(2);
        let err = build(&roster, DutyLedger::new(window())).unwrap_err();
        assert_eq!(
            err,
            RosterError::no_eligible(DutyCategory::Support, date(2025, 8, 20))
        );
    }

    #[test]
    fn test_failed_run_returns_nothing_partial() {
        let roster = roster_of(2);
        let result = build(&roster, DutyLedger::new(window()));
        // The error carries no assignment; the caller's ledger was moved
        // in and dropped with the builder, never mutated in place.
        assert!(result.is_err());
    }

    #[test]
    fn test_release_winner_may_take_a_support_shift() {
        let roster = roster_of(7);
        let outcome = build(&roster, DutyLedger::new(window())).unwrap();
        let assignment = &outcome.assignment;
        let express = assignment.express().unwrap();
        assert!(assignment
            .support_slots()
            .iter()
            .any(|slot| slot.employee_id == express));
    }

    #[test]
    fn test_unavailable_employees_never_assigned() {
        let mut roster = roster_of(8);
        roster[2].status = EmployeeStatus::Sick;
        roster[5].status = EmployeeStatus::Vacation;
        let outcome = build(&roster, DutyLedger::new(window())).unwrap();
        let assigned = outcome.assignment.assignees();
        assert!(!assigned.contains(&roster[2].id));
        assert!(!assigned.contains(&roster[5].id));
    }

    #[test]
    fn test_terminated_employee_never_assigned() {
        let mut roster = roster_of(7);
        roster[0].status = EmployeeStatus::Terminated;
        let outcome = build(&roster, DutyLedger::new(window())).unwrap();
        assert!(!outcome.assignment.assignees().contains(&1));
    }

    #[test]
    fn test_express_prefers_lower_count() {
        let roster = roster_of(7);
        let mut ledger = DutyLedger::new(window());
        // Give everyone except employee 4 an express duty well in the past.
        for id in [1, 2, 3, 5, 6, 7] {
            ledger.set_summary(
                id,
                DutyCategory::ExpressRelease,
                DutySummary::new(1, Some(date(2025, 7, 7))),
            );
        }
        let outcome = build(&roster, ledger).unwrap();
        assert_eq!(outcome.assignment.express(), Some(4));
    }

    #[test]
    fn test_hot_employee_skipped_until_fallback_needed() {
        // Employee 1 ranks first for support by count but served 3 days
        // before the Monday; with others available they wait.
        let roster = roster_of(7);
        let mut ledger = DutyLedger::new(window());
        ledger.set_summary(
            1,
            DutyCategory::Support,
            DutySummary::new(1, Some(date(2025, 8, 15))),
        );
        for id in 2..=7 {
            ledger.set_summary(
                id,
                DutyCategory::Support,
                DutySummary::new(2, Some(date(2025, 7, 14))),
            );
        }
        let outcome = build(&roster, ledger).unwrap();
        let support: Vec<EmployeeId> = outcome
            .assignment
            .support_slots()
            .iter()
            .map(|slot| slot.employee_id)
            .collect();
        // Monday through Thursday go to the rested pool; by Friday the
        // 7-day cooldown for employee 1 has elapsed (Aug 15 + 7 = Aug 22),
        // and their lower count takes the slot in the strict phase.
        assert_eq!(support[..4], [2, 3, 4, 5]);
        assert_eq!(support[4], 1);
    }

    #[test]
    fn test_outcome_ledger_carries_advanced_summaries() {
        let roster = roster_of(7);
        let outcome = build(&roster, DutyLedger::new(window())).unwrap();

        let express = outcome.assignment.express().unwrap();
        let summary = outcome.ledger.summary(express, DutyCategory::ExpressRelease);
        assert_eq!(summary.count, 1);
        assert_eq!(summary.last_duty_date, Some(monday()));

        for slot in outcome.assignment.support_slots() {
            let summary = outcome.ledger.summary(slot.employee_id, DutyCategory::Support);
            assert_eq!(summary.count, 1);
            assert_eq!(summary.last_duty_date, Some(slot.date));
        }
    }

    #[test]
    fn test_records_match_assignment() {
        let roster = roster_of(7);
        let outcome = build(&roster, DutyLedger::new(window())).unwrap();
        assert_eq!(outcome.records.len(), 7);
        for (record, slot) in outcome.records.iter().zip(&outcome.assignment.slots) {
            assert_eq!(record.employee_id, slot.employee_id);
            assert_eq!(record.category, slot.category);
            assert_eq!(record.date, slot.date);
        }
    }

    #[test]
    fn test_non_monday_week_start_is_rejected() {
        let roster = roster_of(7);
        let builder = WeekAssignmentBuilder::new(
            &roster,
            DutyLedger::new(window()),
            Cooldowns::default(),
            date(2025, 8, 19),
        );
        let err = builder.build().unwrap_err();
        assert!(matches!(err, RosterError::InvariantViolation { .. }));
    }

    #[test]
    fn test_all_on_leave_fails_on_express() {
        let mut roster = roster_of(7);
        for employee in &mut roster {
            employee.status = EmployeeStatus::Vacation;
        }
        let err = build(&roster, DutyLedger::new(window())).unwrap_err();
        assert_eq!(
            err,
            RosterError::no_eligible(DutyCategory::ExpressRelease, monday())
        );
    }
}
