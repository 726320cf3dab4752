use anyhow::{Context, Result};

use rota::config::Config;
use rota::report;
use rota::service::ScheduleService;
use rota::storage::create_sqlite_repository;

/// Print the team overview with per-category duty counters
pub fn team(config: &Config) -> Result<()> {
    let repo = create_sqlite_repository(&config.database.path)
        .context("Failed to open the roster database")?;
    let service = ScheduleService::new(repo, &config.scheduling);

    let today = chrono::Local::now().date_naive();
    let overview = service
        .team_overview(today)
        .context("Failed to load the team overview")?;

    println!("{}", report::render_team(&overview));
    Ok(())
}
