//! Schedule service: the single orchestration point both front ends use.
//!
//! Every user-facing operation goes through here. A scheduling run is
//! "read history, run the core, write results" and must see one
//! consistent snapshot, so the whole run holds one lock; requests can
//! arrive concurrently from the bot server and the CLI.

use std::sync::Mutex;

use chrono::NaiveDate;

use crate::config::SchedulingConfig;
use crate::error::Result;
use crate::models::{
    DutyCategory, DutyLedger, DutySummary, Employee, EmployeeStatus, FairnessWindow,
    WeekAssignment,
};
use crate::roster::select::Cooldowns;
use crate::roster::window::FairnessWindowPolicy;
use crate::roster::{week, WeekAssignmentBuilder};
use crate::storage::SharedRosterRepository;

/// Everything one generate run hands to the presentation layer
#[derive(Debug, Clone)]
pub struct GeneratedSchedule {
    pub assignment: WeekAssignment,
    /// Roster snapshot the run was computed from
    pub roster: Vec<Employee>,
    pub window: FairnessWindow,
    /// Whether the run was persisted
    pub saved: bool,
    /// Whether the periodic fairness reset fired during this run
    pub reset_performed: bool,
}

/// One employee's standing for the team overview
#[derive(Debug, Clone)]
pub struct TeamMember {
    pub employee: Employee,
    /// Per-category summaries in `DutyCategory::all()` order
    pub summaries: Vec<(DutyCategory, DutySummary)>,
}

/// Roster standing over the current fairness window
#[derive(Debug, Clone)]
pub struct TeamOverview {
    pub window: FairnessWindow,
    pub members: Vec<TeamMember>,
}

/// Outcome of a batch status update; unknown handles are reported, not
/// fatal
#[derive(Debug, Clone, Default)]
pub struct UpdateReport {
    pub updated: Vec<String>,
    pub unknown: Vec<String>,
}

/// User-facing operations over the roster store and the scheduling core
pub struct ScheduleService {
    repo: SharedRosterRepository,
    cooldowns: Cooldowns,
    window_policy: FairnessWindowPolicy,
    run_lock: Mutex<()>,
}

impl ScheduleService {
    pub fn new(repo: SharedRosterRepository, scheduling: &SchedulingConfig) -> Self {
        Self {
            repo,
            cooldowns: Cooldowns::new(
                scheduling.support_cooldown_days,
                scheduling.release_cooldown_days,
            ),
            window_policy: FairnessWindowPolicy::new(scheduling.reset_interval_days),
            run_lock: Mutex::new(()),
        }
    }

    /// Generate (and optionally persist) the schedule for one week.
    ///
    /// An explicit `week_start` is normalized to its Monday; otherwise
    /// the upcoming Monday relative to `today` is used. Saving replaces
    /// any records already stored for that week, so regenerating a saved
    /// week never double-counts.
    pub fn generate(
        &self,
        week_start: Option<NaiveDate>,
        today: NaiveDate,
        save: bool,
    ) -> Result<GeneratedSchedule> {
        let _guard = self.run_lock.lock().unwrap();

        let week_start = match week_start {
            Some(date) => week::week_monday(date),
            None => week::upcoming_monday(today),
        };

        let (last_reset, reset_performed) = self.resolve_reset(today)?;
        let window = self
            .window_policy
            .window_for_week(week_start, today, last_reset)?;

        let roster = self.repo.load_roster()?;
        let ledger = self.repo.duty_summaries(window)?;

        tracing::info!(
            week_start = %week_start,
            window = %window,
            roster_size = roster.len(),
            reset_performed,
            "running scheduling"
        );

        let outcome = WeekAssignmentBuilder::new(&roster, ledger, self.cooldowns, week_start)
            .build()?;

        if save {
            // Replace-then-append keeps re-saving a week idempotent.
            let removed = self
                .repo
                .delete_records_between(week_start, week::week_end(week_start))?;
            if removed > 0 {
                tracing::info!(week_start = %week_start, removed, "replaced previously saved week");
            }
            self.repo.append_records(&outcome.records)?;
        }

        Ok(GeneratedSchedule {
            assignment: outcome.assignment,
            roster,
            window,
            saved: save,
            reset_performed,
        })
    }

    /// Roster standing over the window a run started today would use.
    /// Read-only: never initializes or advances the reset marker.
    pub fn team_overview(&self, today: NaiveDate) -> Result<TeamOverview> {
        let _guard = self.run_lock.lock().unwrap();

        let last_reset = self.repo.last_reset_date()?;
        let week_start = week::week_monday(today);
        let window = self
            .window_policy
            .window_for_week(week_start, today, last_reset)?;

        let roster = self.repo.load_roster()?;
        let ledger = self.repo.duty_summaries(window)?;

        let members = roster
            .into_iter()
            .map(|employee| {
                let summaries = DutyCategory::all()
                    .into_iter()
                    .map(|category| (category, ledger.summary(employee.id, category)))
                    .collect();
                TeamMember {
                    employee,
                    summaries,
                }
            })
            .collect();

        Ok(TeamOverview { window, members })
    }

    /// Add an employee with status `available`
    pub fn add_employee(&self, handle: &str, name: &str) -> Result<Employee> {
        let employee = self.repo.add_employee(name, handle)?;
        tracing::info!(handle = %employee.handle, id = employee.id, "employee added");
        Ok(employee)
    }

    /// Apply a batch of status updates, reporting unknown handles rather
    /// than failing the batch
    pub fn update_statuses(&self, updates: &[(String, EmployeeStatus)]) -> Result<UpdateReport> {
        let mut report = UpdateReport::default();
        for (handle, status) in updates {
            if self.repo.update_status(handle, *status)? {
                tracing::info!(handle = %handle, status = %status, "status updated");
                report.updated.push(handle.clone());
            } else {
                tracing::warn!(handle = %handle, "status update for unknown handle");
                report.unknown.push(handle.clone());
            }
        }
        Ok(report)
    }

    /// Read the reset marker, initializing it on first contact, and
    /// advance it when the reset interval has elapsed. Returns the marker
    /// the window derivation should use and whether a reset fired.
    fn resolve_reset(&self, today: NaiveDate) -> Result<(Option<NaiveDate>, bool)> {
        let last_reset = self.repo.last_reset_date()?;

        match last_reset {
            None => {
                // First run ever: start the 90-day clock now. No reset
                // has happened, so this run's window still opens at the
                // quarter start and sees any in-quarter history.
                self.repo.set_last_reset_date(today)?;
                Ok((None, false))
            }
            Some(last) if self.window_policy.should_reset(today, Some(last)) => {
                self.repo.set_last_reset_date(today)?;
                tracing::info!(previous = %last, new = %today, "fairness counters reset");
                Ok((Some(today), true))
            }
            Some(last) => Ok((Some(last), false)),
        }
    }

    /// Ledger for an arbitrary window; used by tests and diagnostics
    pub fn ledger_for(&self, window: FairnessWindow) -> Result<DutyLedger> {
        Ok(self.repo.duty_summaries(window)?)
    }
}
