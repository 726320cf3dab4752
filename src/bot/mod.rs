//! Chat-bot front end.
//!
//! An HTTP endpoint receives chat messages, picks out `/schedule ...`
//! commands, runs them through the schedule service, and delivers the
//! rendered reply back through the webhook channel.

pub mod command;
pub mod server;

pub use command::BotCommand;
pub use server::{AppState, BotServer};
