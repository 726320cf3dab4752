pub mod add;
pub mod generate;
pub mod serve;
pub mod status;
pub mod team;

// Re-export command functions for convenience
pub use add::add;
pub use generate::generate;
pub use serve::serve;
pub use status::status;
pub use team::team;
