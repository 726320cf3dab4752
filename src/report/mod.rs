//! Rendering of scheduling results as plain English chat markdown.
//!
//! The bot and the CLI share these functions; no template engine, no
//! localization. Everything renders from the structured data the
//! service returns.

use std::collections::HashMap;
use std::fmt::Write;

use crate::error::Error;
use crate::models::{DutyCategory, Employee, EmployeeId, EmployeeStatus};
use crate::roster::week;
use crate::service::{GeneratedSchedule, TeamOverview, UpdateReport};

/// Render the weekly duty announcement
pub fn render_announcement(generated: &GeneratedSchedule) -> String {
    let handles: HashMap<EmployeeId, &str> = generated
        .roster
        .iter()
        .map(|e| (e.id, e.handle.as_str()))
        .collect();
    let mention = |id: EmployeeId| match handles.get(&id) {
        Some(handle) => format!("@{handle}"),
        None => format!("employee #{id}"),
    };

    let assignment = &generated.assignment;
    let week_start = assignment.week_start;
    let mut out = String::new();

    let _ = writeln!(
        out,
        "Hello team! Duty schedule for the week of {} \u{2013} {}.",
        week_start,
        week::week_end(week_start)
    );
    out.push('\n');

    out.push_str("*Releases*\n");
    if let Some(id) = assignment.express() {
        let _ = writeln!(out, "{} \u{2014} Express release", mention(id));
    }
    if let Some(id) = assignment.instances() {
        let _ = writeln!(out, "{} \u{2014} Instances release", mention(id));
    }
    out.push('\n');

    out.push_str("*Support*\n");
    for slot in assignment.support_slots() {
        let _ = writeln!(
            out,
            "{} \u{2014} {}",
            mention(slot.employee_id),
            slot.date.format("%A")
        );
    }

    if generated.reset_performed {
        out.push_str("\n\u{1F504} Fairness counters were reset for a new period.\n");
    }
    if generated.saved {
        out.push_str("\n\u{2705} Schedule saved to the database.\n");
    }

    out
}

/// Render the team overview, one line per employee
pub fn render_team(overview: &TeamOverview) -> String {
    if overview.members.is_empty() {
        return String::from(
            "The roster is empty.\nAdd employees with */schedule add @handle Full Name*",
        );
    }

    let mut out = format!("Team standing for {}:\n\n", overview.window);
    for member in &overview.members {
        let employee = &member.employee;
        let _ = write!(
            out,
            "{} {} \u{2014} {} ({})",
            status_emoji(employee.status),
            employee.mention(),
            employee.name,
            employee.status
        );
        for (category, summary) in &member.summaries {
            match summary.last_duty_date {
                Some(last) => {
                    let _ = write!(
                        out,
                        " | {}: {} (last {})",
                        category.display_name(),
                        summary.count,
                        last
                    );
                }
                None => {
                    let _ = write!(out, " | {}: no duty yet", category.display_name());
                }
            }
        }
        out.push('\n');
    }
    out
}

/// Render the batch status update outcome
pub fn render_update_report(report: &UpdateReport) -> String {
    let mut out = String::new();
    if !report.updated.is_empty() {
        let _ = writeln!(out, "Statuses updated: {}", mentions(&report.updated));
    }
    if !report.unknown.is_empty() {
        let _ = writeln!(out, "Unknown handles ignored: {}", mentions(&report.unknown));
    }
    if out.is_empty() {
        out.push_str("Nothing to update.\n");
    }
    out
}

/// Render the confirmation for a newly added employee
pub fn render_employee_added(employee: &Employee) -> String {
    format!("Employee {} ({}) added.\n", employee.mention(), employee.name)
}

/// Render the `/schedule` command reference
pub fn render_help() -> String {
    String::from(
        "*Duty schedule commands*\n\
         /schedule generate [YYYY-MM-DD] \u{2014} preview the week's schedule\n\
         /schedule save [YYYY-MM-DD] \u{2014} generate and save the week's schedule\n\
         /schedule team \u{2014} show the team and duty counters\n\
         /schedule status @handle <status>[, @handle <status>...] \u{2014} update statuses\n\
         \u{2003}statuses: available, sick, vacation, terminated\n\
         /schedule add @handle <full name> \u{2014} add an employee\n\
         /schedule help \u{2014} show this message\n",
    )
}

/// Render an operation failure for end users
pub fn render_failure(error: &Error) -> String {
    if error.is_staffing_shortfall() {
        // RosterError's display already names the category and day.
        if let Error::Roster(inner) = error {
            return format!(
                "Could not build the schedule: {inner}.\nCheck staffing and statuses with */schedule team*."
            );
        }
    }
    format!("Something went wrong: {error}")
}

fn status_emoji(status: EmployeeStatus) -> &'static str {
    match status {
        EmployeeStatus::Available => "\u{1F7E2}",
        EmployeeStatus::Sick => "\u{1F912}",
        EmployeeStatus::Vacation => "\u{1F3D6}",
        EmployeeStatus::Terminated => "\u{26AB}",
    }
}

fn mentions(handles: &[String]) -> String {
    handles
        .iter()
        .map(|handle| format!("@{handle}"))
        .collect::<Vec<_>>()
        .join(", ")
}
