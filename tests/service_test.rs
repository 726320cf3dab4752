//! Schedule-service tests over the in-memory repository: week
//! resolution, save idempotency, and the fairness reset lifecycle.

mod common;

use std::sync::Arc;

use chrono::Days;

use common::date;
use rota::config::SchedulingConfig;
use rota::models::{DutyCategory, DutyRecord, EmployeeStatus, FairnessWindow};
use rota::service::ScheduleService;
use rota::storage::{MemoryRosterRepository, RosterRepository, SharedRosterRepository};

struct Fixture {
    repo: Arc<MemoryRosterRepository>,
    service: ScheduleService,
}

fn fixture(roster_size: usize) -> Fixture {
    let repo = Arc::new(MemoryRosterRepository::new());
    let shared: SharedRosterRepository = repo.clone();
    for i in 1..=roster_size {
        shared
            .add_employee(&format!("Employee {i}"), &format!("emp{i}"))
            .unwrap();
    }
    let service = ScheduleService::new(shared, &SchedulingConfig::default());
    Fixture { repo, service }
}

#[test]
fn preview_leaves_no_history() {
    let f = fixture(7);
    f.service.generate(None, date(2025, 8, 14), false).unwrap();
    assert_eq!(f.repo.history_len(), 0);
}

#[test]
fn save_appends_exactly_one_week_of_records() {
    let f = fixture(7);
    let generated = f.service.generate(None, date(2025, 8, 14), true).unwrap();
    assert!(generated.saved);
    assert_eq!(f.repo.history_len(), 7);
}

#[test]
fn resaving_a_week_does_not_double_count() {
    let f = fixture(7);
    let today = date(2025, 8, 14);

    f.service.generate(None, today, true).unwrap();
    assert_eq!(f.repo.history_len(), 7);

    // Saving the same week again replaces the records instead of
    // stacking a second copy.
    f.service.generate(None, today, true).unwrap();
    assert_eq!(f.repo.history_len(), 7);

    let window = FairnessWindow::new(date(2025, 7, 1), date(2025, 8, 24));
    let ledger = f.repo.duty_summaries(window).unwrap();
    for id in 1..=7i64 {
        for category in DutyCategory::all() {
            assert!(ledger.summary(id, category).count <= 1);
        }
    }
}

#[test]
fn resaving_does_not_disturb_other_weeks() {
    let f = fixture(7);

    f.service
        .generate(Some(date(2025, 8, 18)), date(2025, 8, 14), true)
        .unwrap();
    f.service
        .generate(Some(date(2025, 8, 25)), date(2025, 8, 21), true)
        .unwrap();
    assert_eq!(f.repo.history_len(), 14);

    // Regenerate only the first week.
    f.service
        .generate(Some(date(2025, 8, 18)), date(2025, 8, 21), true)
        .unwrap();
    assert_eq!(f.repo.history_len(), 14);
}

#[test]
fn first_run_starts_the_reset_clock_without_firing() {
    let f = fixture(7);
    let today = date(2025, 8, 14);

    let generated = f.service.generate(None, today, false).unwrap();
    assert!(!generated.reset_performed);
    assert_eq!(f.repo.last_reset_date().unwrap(), Some(today));
}

#[test]
fn first_run_window_opens_at_the_quarter_start() {
    let f = fixture(7);
    let today = date(2025, 8, 14);

    // History recorded before the service ever ran must still count.
    f.repo
        .append_records(&[DutyRecord::new(
            1,
            DutyCategory::Support,
            date(2025, 7, 7),
        )])
        .unwrap();

    let generated = f.service.generate(None, today, false).unwrap();
    assert_eq!(generated.window.start, date(2025, 7, 1));

    // Employee 1 already served in the quarter, so a fresh teammate
    // takes the Monday slot instead.
    let monday_slot = generated.assignment.support_slots()[0].employee_id;
    assert_ne!(monday_slot, 1);
}

#[test]
fn past_week_inside_the_quarter_is_schedulable_on_first_run() {
    let f = fixture(7);

    // The week of Aug 4 closed before today but lies inside Q3.
    let generated = f
        .service
        .generate(Some(date(2025, 8, 4)), date(2025, 8, 14), false)
        .unwrap();
    assert_eq!(generated.window.start, date(2025, 7, 1));
    assert_eq!(generated.assignment.week_start, date(2025, 8, 4));
}

#[test]
fn elapsed_interval_fires_the_reset_and_narrows_the_window() {
    let f = fixture(7);
    let today = date(2025, 8, 14);
    f.repo.set_last_reset_date(date(2025, 5, 1)).unwrap();

    // Pre-reset history would otherwise dominate the counters.
    f.repo
        .append_records(&[DutyRecord::new(
            1,
            DutyCategory::Support,
            date(2025, 7, 7),
        )])
        .unwrap();

    let generated = f.service.generate(None, today, false).unwrap();
    assert!(generated.reset_performed);
    assert_eq!(f.repo.last_reset_date().unwrap(), Some(today));
    assert_eq!(generated.window.start, today);

    // The old record fell out of the window, so employee 1 reads as
    // fresh again and keeps the Monday support slot.
    let monday_slot = generated.assignment.support_slots()[0].employee_id;
    assert_eq!(monday_slot, 1);
}

#[test]
fn window_start_does_not_fire_before_the_interval() {
    let f = fixture(7);
    f.repo.set_last_reset_date(date(2025, 7, 20)).unwrap();

    let generated = f.service.generate(None, date(2025, 8, 14), false).unwrap();
    assert!(!generated.reset_performed);
    assert_eq!(generated.window.start, date(2025, 7, 20));
}

#[test]
fn unavailable_employees_are_passed_over_end_to_end() {
    let f = fixture(9);
    f.service
        .update_statuses(&[
            ("emp1".to_string(), EmployeeStatus::Sick),
            ("emp2".to_string(), EmployeeStatus::Vacation),
        ])
        .unwrap();

    let generated = f.service.generate(None, date(2025, 8, 14), false).unwrap();
    let assignees = generated.assignment.assignees();
    assert!(!assignees.contains(&1));
    assert!(!assignees.contains(&2));
}

#[test]
fn staffing_shortfall_is_reported_not_panicked() {
    let f = fixture(3);
    let err = f
        .service
        .generate(None, date(2025, 8, 14), true)
        .unwrap_err();
    assert!(err.is_staffing_shortfall());
    // All-or-nothing: the failed run saved nothing.
    assert_eq!(f.repo.history_len(), 0);
}

#[test]
fn consecutive_weeks_rotate_the_release_roles() {
    let f = fixture(8);
    let first_monday = date(2025, 8, 18);

    let mut express_holders = Vec::new();
    for week in 0..4u64 {
        let week_start = first_monday + Days::new(7 * week);
        let generated = f
            .service
            .generate(Some(week_start), week_start - Days::new(4), true)
            .unwrap();
        express_holders.push(generated.assignment.express().unwrap());
    }

    // The 14-day release cooldown forbids an immediate repeat.
    for pair in express_holders.windows(2) {
        assert_ne!(pair[0], pair[1], "express role repeated in back-to-back weeks");
    }
}

#[test]
fn team_overview_reflects_saved_history() {
    let f = fixture(7);
    let today = date(2025, 8, 14);
    f.service.generate(None, today, true).unwrap();

    let overview = f.service.team_overview(date(2025, 8, 20)).unwrap();
    assert_eq!(overview.members.len(), 7);

    let express_counts: u32 = overview
        .members
        .iter()
        .flat_map(|m| &m.summaries)
        .filter(|(category, _)| *category == DutyCategory::ExpressRelease)
        .map(|(_, summary)| summary.count)
        .sum();
    assert_eq!(express_counts, 1, "exactly one express duty was saved");
}
