use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};

use rota::bot::BotServer;
use rota::config::Config;
use rota::notify::{WebhookConfig, WebhookNotifier};
use rota::service::ScheduleService;
use rota::storage::create_sqlite_repository;

/// Run the chat-bot HTTP server until Ctrl-C
pub async fn serve(config: &Config) -> Result<()> {
    println!("Starting rota bot server");
    println!("========================");
    println!("  Host: {}", config.server.host);
    println!("  Port: {}", config.server.port);
    println!("  Database: {}", config.database.path.display());
    if config.webhook_enabled() {
        println!("  Webhook: {}", config.webhook.url);
    } else {
        println!("  Webhook: disabled (replies are logged only)");
    }
    println!();

    let repo = create_sqlite_repository(&config.database.path)
        .context("Failed to open the roster database")?;
    let service = Arc::new(ScheduleService::new(repo, &config.scheduling));

    let notifier = if config.webhook_enabled() {
        let notifier = WebhookNotifier::new(WebhookConfig::from(&config.webhook))
            .context("Invalid webhook configuration")?;
        Some(Arc::new(notifier))
    } else {
        None
    };

    let bind_address: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .with_context(|| {
            format!(
                "Invalid server address {}:{}",
                config.server.host, config.server.port
            )
        })?;

    let server = BotServer::new(bind_address, service, notifier);

    server
        .start_with_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("Shutdown signal received");
        })
        .await
        .context("Bot server failed")?;

    Ok(())
}
