use anyhow::{Context, Result};
use chrono::NaiveDate;

use rota::config::Config;
use rota::report;
use rota::service::ScheduleService;
use rota::storage::create_sqlite_repository;

/// Generate (and optionally save) a week's duty schedule and print it
pub fn generate(config: &Config, week: Option<NaiveDate>, save: bool) -> Result<()> {
    let repo = create_sqlite_repository(&config.database.path)
        .context("Failed to open the roster database")?;
    let service = ScheduleService::new(repo, &config.scheduling);

    let today = chrono::Local::now().date_naive();
    match service.generate(week, today, save) {
        Ok(generated) => {
            println!("{}", report::render_announcement(&generated));
            Ok(())
        }
        Err(e) if e.is_staffing_shortfall() => {
            // A thin roster is a user problem, not a crash.
            println!("{}", report::render_failure(&e));
            std::process::exit(1);
        }
        Err(e) => Err(e).context("Failed to generate the schedule"),
    }
}
