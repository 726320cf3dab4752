use anyhow::{bail, Context, Result};

use rota::config::Config;
use rota::models::EmployeeStatus;
use rota::report;
use rota::service::ScheduleService;
use rota::storage::create_sqlite_repository;

/// Apply status updates given as alternating `@handle status` arguments
pub fn status(config: &Config, args: &[String]) -> Result<()> {
    let updates = parse_pairs(args)?;

    let repo = create_sqlite_repository(&config.database.path)
        .context("Failed to open the roster database")?;
    let service = ScheduleService::new(repo, &config.scheduling);

    let outcome = service
        .update_statuses(&updates)
        .context("Failed to update statuses")?;

    println!("{}", report::render_update_report(&outcome));
    Ok(())
}

fn parse_pairs(args: &[String]) -> Result<Vec<(String, EmployeeStatus)>> {
    if args.is_empty() || args.len() % 2 != 0 {
        bail!("expected alternating @handle status pairs, e.g. @alice sick @bob vacation");
    }

    let mut updates = Vec::with_capacity(args.len() / 2);
    for pair in args.chunks(2) {
        let handle = pair[0].trim_start_matches('@').trim_end_matches(',');
        let status_str = pair[1].trim_end_matches(',');
        let Some(status) = EmployeeStatus::parse(status_str) else {
            bail!("unknown status '{status_str}' (expected available, sick, vacation or terminated)");
        };
        updates.push((handle.to_string(), status));
    }
    Ok(updates)
}
