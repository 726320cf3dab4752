//! Fairness window derivation and the periodic counter reset.
//!
//! Duty summaries are only ever computed over a bounded window so that
//! counts re-level periodically instead of growing forever. The window
//! start is the later of the current quarter start and the last reset
//! date; when the reset interval has elapsed the start jumps to today and
//! the caller persists today as the new reset marker. The start never
//! moves backwards across runs.

use chrono::NaiveDate;

use super::error::{RosterError, RosterResult};
use super::week;
use crate::models::FairnessWindow;

/// Default reset interval between counter re-levelings, in days
pub const DEFAULT_RESET_INTERVAL_DAYS: u32 = 90;

/// Computes the fairness window for a scheduling run and decides when the
/// periodic reset is due.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FairnessWindowPolicy {
    reset_interval_days: u32,
}

impl FairnessWindowPolicy {
    pub fn new(reset_interval_days: u32) -> Self {
        Self {
            reset_interval_days,
        }
    }

    pub fn reset_interval_days(&self) -> u32 {
        self.reset_interval_days
    }

    /// Whether the periodic reset is due. A ledger that has never been
    /// reset (`last_reset = None`) is not due; the caller initializes the
    /// marker instead.
    pub fn should_reset(&self, today: NaiveDate, last_reset: Option<NaiveDate>) -> bool {
        match last_reset {
            Some(last) => (today - last).num_days() >= i64::from(self.reset_interval_days),
            None => false,
        }
    }

    /// Window bounding the summaries for a run targeting `week_start`.
    ///
    /// The end is the Sunday of the target week. Scheduling a week that
    /// closed before the window start cannot be judged fairly and fails
    /// with `InvalidWindow`.
    pub fn window_for_week(
        &self,
        week_start: NaiveDate,
        today: NaiveDate,
        last_reset: Option<NaiveDate>,
    ) -> RosterResult<FairnessWindow> {
        let start = if self.should_reset(today, last_reset) {
            today
        } else {
            let quarter = week::quarter_start(today);
            match last_reset {
                Some(last) if last > quarter => last,
                _ => quarter,
            }
        };
        let end = week::week_end(week_start);

        let window = FairnessWindow::new(start, end);
        if !window.is_valid() {
            return Err(RosterError::invalid_window(start, end));
        }
        Ok(window)
    }
}

impl Default for FairnessWindowPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_RESET_INTERVAL_DAYS)
    }
}
