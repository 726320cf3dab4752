// Core data structures for the rota duty roster

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Opaque employee identifier, assigned by the roster store.
pub type EmployeeId = i64;

/// Number of daily Support slots in one scheduled week (Monday-Friday).
pub const SUPPORT_DAYS_PER_WEEK: usize = 5;

/// Employment status controlling duty eligibility
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmployeeStatus {
    Available,
    Sick,
    Vacation,
    Terminated,
}

impl EmployeeStatus {
    /// Get string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Available => "available",
            Self::Sick => "sick",
            Self::Vacation => "vacation",
            Self::Terminated => "terminated",
        }
    }

    /// Create from string (accepts the legacy "fired" spelling)
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "available" => Some(Self::Available),
            "sick" => Some(Self::Sick),
            "vacation" => Some(Self::Vacation),
            "terminated" | "fired" => Some(Self::Terminated),
            _ => None,
        }
    }

    /// Get all statuses
    pub fn all() -> Vec<Self> {
        vec![
            Self::Available,
            Self::Sick,
            Self::Vacation,
            Self::Terminated,
        ]
    }

    /// Whether the employee may currently be scheduled at all
    pub fn is_available(&self) -> bool {
        matches!(self, Self::Available)
    }
}

impl fmt::Display for EmployeeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Duty category enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DutyCategory {
    ExpressRelease,
    InstancesRelease,
    Support,
}

impl DutyCategory {
    /// Get string representation (matches the stored history format)
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ExpressRelease => "express_release",
            Self::InstancesRelease => "instances_release",
            Self::Support => "support",
        }
    }

    /// Human-readable name for rendered messages
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::ExpressRelease => "Express release",
            Self::InstancesRelease => "Instances release",
            Self::Support => "Support",
        }
    }

    /// Create from string (supports short forms)
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "express_release" | "express" => Some(Self::ExpressRelease),
            "instances_release" | "instances" => Some(Self::InstancesRelease),
            "support" => Some(Self::Support),
            _ => None,
        }
    }

    /// Get all categories, release roles first
    pub fn all() -> Vec<Self> {
        vec![Self::ExpressRelease, Self::InstancesRelease, Self::Support]
    }

    /// Whether this is one of the two release roles
    pub fn is_release(&self) -> bool {
        matches!(self, Self::ExpressRelease | Self::InstancesRelease)
    }
}

impl fmt::Display for DutyCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Roster member
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    pub id: EmployeeId,
    pub name: String,
    /// Chat mention name, stored without the leading '@'
    pub handle: String,
    pub status: EmployeeStatus,
}

impl Employee {
    pub fn new(
        id: EmployeeId,
        name: impl Into<String>,
        handle: impl Into<String>,
        status: EmployeeStatus,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            handle: handle.into(),
            status,
        }
    }

    /// Chat mention form, e.g. "@alice"
    pub fn mention(&self) -> String {
        format!("@{}", self.handle)
    }
}

/// One completed (or proposed) duty, append-only once persisted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DutyRecord {
    pub employee_id: EmployeeId,
    pub category: DutyCategory,
    pub date: NaiveDate,
}

impl DutyRecord {
    pub fn new(employee_id: EmployeeId, category: DutyCategory, date: NaiveDate) -> Self {
        Self {
            employee_id,
            category,
            date,
        }
    }
}

/// Per-(employee, category) aggregate over one fairness window.
///
/// `count == 0` holds exactly when `last_duty_date` is absent; both are
/// always derived from the duty history, never maintained by hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DutySummary {
    pub count: u32,
    pub last_duty_date: Option<NaiveDate>,
}

impl DutySummary {
    pub fn new(count: u32, last_duty_date: Option<NaiveDate>) -> Self {
        Self {
            count,
            last_duty_date,
        }
    }

    /// Summary for an employee with no history in the window
    pub fn zero() -> Self {
        Self::default()
    }

    /// Check the count/date pairing invariant
    pub fn is_consistent(&self) -> bool {
        (self.count == 0) == self.last_duty_date.is_none()
    }

    /// Fold one duty date into the aggregate
    pub fn record(&mut self, date: NaiveDate) {
        self.count += 1;
        self.last_duty_date = Some(match self.last_duty_date {
            Some(last) if last > date => last,
            _ => date,
        });
    }

    /// The summary this employee would carry after serving on `date`
    pub fn after_duty(mut self, date: NaiveDate) -> Self {
        self.record(date);
        self
    }
}

/// Inclusive date range bounding which duty records feed the summaries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FairnessWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl FairnessWindow {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    pub fn is_valid(&self) -> bool {
        self.start <= self.end
    }
}

impl fmt::Display for FairnessWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

/// Materialized duty summaries for one fairness window.
///
/// Entries are keyed by (employee, category); a missing entry reads as the
/// zero summary. The scheduling run works on a clone of this map so the
/// caller's view stays untouched until the run commits.
#[derive(Debug, Clone)]
pub struct DutyLedger {
    window: FairnessWindow,
    summaries: HashMap<(EmployeeId, DutyCategory), DutySummary>,
}

impl DutyLedger {
    /// Empty ledger for a window
    pub fn new(window: FairnessWindow) -> Self {
        Self {
            window,
            summaries: HashMap::new(),
        }
    }

    /// Derive a ledger by folding duty records; records outside the window
    /// are ignored.
    pub fn from_records(window: FairnessWindow, records: &[DutyRecord]) -> Self {
        let mut ledger = Self::new(window);
        for record in records {
            if window.contains(record.date) {
                ledger.record_duty(record.employee_id, record.category, record.date);
            }
        }
        ledger
    }

    pub fn window(&self) -> FairnessWindow {
        self.window
    }

    /// Summary for an (employee, category) pair; zero when absent
    pub fn summary(&self, employee_id: EmployeeId, category: DutyCategory) -> DutySummary {
        self.summaries
            .get(&(employee_id, category))
            .copied()
            .unwrap_or_default()
    }

    /// Install a pre-aggregated summary (used by storage-side derivation)
    pub fn set_summary(
        &mut self,
        employee_id: EmployeeId,
        category: DutyCategory,
        summary: DutySummary,
    ) {
        self.summaries.insert((employee_id, category), summary);
    }

    /// Fold one duty into the aggregate for its (employee, category) pair
    pub fn record_duty(&mut self, employee_id: EmployeeId, category: DutyCategory, date: NaiveDate) {
        self.summaries
            .entry((employee_id, category))
            .or_default()
            .record(date);
    }

    /// Number of (employee, category) pairs with window history
    pub fn len(&self) -> usize {
        self.summaries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.summaries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (EmployeeId, DutyCategory, DutySummary)> + '_ {
        self.summaries
            .iter()
            .map(|((id, category), summary)| (*id, *category, *summary))
    }
}

/// One filled duty slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentSlot {
    pub employee_id: EmployeeId,
    pub category: DutyCategory,
    pub date: NaiveDate,
}

/// The complete output of one scheduling run: one Express slot, one
/// Instances slot, and five Support slots for Monday-Friday of the target
/// week, in assignment order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekAssignment {
    /// Monday of the scheduled week
    pub week_start: NaiveDate,
    pub slots: Vec<AssignmentSlot>,
}

impl WeekAssignment {
    pub fn new(week_start: NaiveDate) -> Self {
        Self {
            week_start,
            slots: Vec::new(),
        }
    }

    pub fn push(&mut self, slot: AssignmentSlot) {
        self.slots.push(slot);
    }

    fn single(&self, category: DutyCategory) -> Option<EmployeeId> {
        let mut found = self
            .slots
            .iter()
            .filter(|slot| slot.category == category)
            .map(|slot| slot.employee_id);
        let id = found.next()?;
        // Two slots of a single-holder category invalidate the assignment.
        match found.next() {
            Some(_) => None,
            None => Some(id),
        }
    }

    /// The Express release assignee, if assigned exactly once
    pub fn express(&self) -> Option<EmployeeId> {
        self.single(DutyCategory::ExpressRelease)
    }

    /// The Instances release assignee, if assigned exactly once
    pub fn instances(&self) -> Option<EmployeeId> {
        self.single(DutyCategory::InstancesRelease)
    }

    /// Support slots in date order
    pub fn support_slots(&self) -> Vec<&AssignmentSlot> {
        let mut slots: Vec<&AssignmentSlot> = self
            .slots
            .iter()
            .filter(|slot| slot.category == DutyCategory::Support)
            .collect();
        slots.sort_by_key(|slot| slot.date);
        slots
    }

    /// Ids of all assignees, in slot order, with duplicates preserved
    pub fn assignees(&self) -> Vec<EmployeeId> {
        self.slots.iter().map(|slot| slot.employee_id).collect()
    }

    /// Structural validity: 7 slots, distinct release holders, 5 distinct
    /// Support assignees on distinct dates
    pub fn is_valid(&self) -> bool {
        if self.slots.len() != 2 + SUPPORT_DAYS_PER_WEEK {
            return false;
        }
        let (express, instances) = match (self.express(), self.instances()) {
            (Some(e), Some(i)) => (e, i),
            _ => return false,
        };
        if express == instances {
            return false;
        }
        let support = self.support_slots();
        if support.len() != SUPPORT_DAYS_PER_WEEK {
            return false;
        }
        let mut ids: Vec<EmployeeId> = support.iter().map(|slot| slot.employee_id).collect();
        ids.sort_unstable();
        ids.dedup();
        if ids.len() != SUPPORT_DAYS_PER_WEEK {
            return false;
        }
        let mut dates: Vec<NaiveDate> = support.iter().map(|slot| slot.date).collect();
        dates.sort_unstable();
        dates.dedup();
        dates.len() == SUPPORT_DAYS_PER_WEEK
    }

    /// Proposed history records for persisting this assignment
    pub fn to_records(&self) -> Vec<DutyRecord> {
        self.slots
            .iter()
            .map(|slot| DutyRecord::new(slot.employee_id, slot.category, slot.date))
            .collect()
    }
}
