use anyhow::{Context, Result};

use rota::config::Config;
use rota::report;
use rota::service::ScheduleService;
use rota::storage::create_sqlite_repository;

/// Add an employee to the roster
pub fn add(config: &Config, handle: &str, name: &str) -> Result<()> {
    let handle = handle.trim_start_matches('@');

    let repo = create_sqlite_repository(&config.database.path)
        .context("Failed to open the roster database")?;
    let service = ScheduleService::new(repo, &config.scheduling);

    let employee = service
        .add_employee(handle, name)
        .with_context(|| format!("Failed to add employee @{handle}"))?;

    println!("{}", report::render_employee_added(&employee));
    Ok(())
}
