//! `/schedule` command grammar.
//!
//! Commands arrive as free-form chat text; parsing is deliberately
//! forgiving. Anything unrecognized after the `/schedule` prefix turns
//! into `Help` so users always get the reference instead of silence.

use chrono::NaiveDate;

use crate::models::EmployeeStatus;

/// Command prefix the bot reacts to; other messages are ignored
pub const COMMAND_PREFIX: &str = "/schedule";

/// A parsed `/schedule` command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BotCommand {
    /// Preview a week's schedule without saving
    Generate { week_start: Option<NaiveDate> },
    /// Generate and persist a week's schedule
    Save { week_start: Option<NaiveDate> },
    /// Team overview with duty counters
    Team,
    /// Batch status update, `@handle status` pairs
    Status {
        updates: Vec<(String, EmployeeStatus)>,
    },
    /// Add an employee
    Add { handle: String, name: String },
    /// Command reference
    Help,
}

impl BotCommand {
    /// Parse a chat message. Returns `None` for messages that are not
    /// addressed to the bot at all; a bare `/schedule` means `Generate`.
    pub fn parse(content: &str) -> Option<Self> {
        let mut parts = content.split_whitespace();
        // The prefix must stand alone as the first word.
        match parts.next() {
            Some(token) if token == COMMAND_PREFIX => {}
            _ => return None,
        }

        let command = match parts.next() {
            None => Self::Generate { week_start: None },
            Some("generate") => Self::Generate {
                week_start: parse_date(parts.next()),
            },
            Some("save") => Self::Save {
                week_start: parse_date(parts.next()),
            },
            Some("team") => Self::Team,
            Some("status") => {
                let rest: Vec<&str> = parts.collect();
                let updates = parse_statuses(&rest);
                if updates.is_empty() {
                    Self::Help
                } else {
                    Self::Status { updates }
                }
            }
            Some("add") => match parts.next() {
                Some(handle) if handle.starts_with('@') => {
                    let name = parts.collect::<Vec<_>>().join(" ");
                    if name.is_empty() {
                        Self::Help
                    } else {
                        Self::Add {
                            handle: handle.trim_start_matches('@').to_string(),
                            name,
                        }
                    }
                }
                _ => Self::Help,
            },
            Some(_) => Self::Help,
        };

        Some(command)
    }
}

fn parse_date(token: Option<&str>) -> Option<NaiveDate> {
    token.and_then(|t| t.parse().ok())
}

/// Parse `@handle status[, @handle status...]` pairs; malformed pairs
/// and unknown statuses are skipped
fn parse_statuses(tokens: &[&str]) -> Vec<(String, EmployeeStatus)> {
    let mut updates = Vec::new();
    let mut i = 0;
    while i < tokens.len() {
        let token = tokens[i];
        if let Some(handle) = token.strip_prefix('@') {
            if let Some(next) = tokens.get(i + 1) {
                if !next.starts_with('@') {
                    let status_str = next.trim_end_matches(',');
                    if let Some(status) = EmployeeStatus::parse(status_str) {
                        updates.push((handle.trim_end_matches(',').to_string(), status));
                    }
                    i += 2;
                    continue;
                }
            }
        }
        i += 1;
    }
    updates
}
