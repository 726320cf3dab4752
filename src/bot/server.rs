//! Bot HTTP server.
//!
//! One endpoint accepts chat webhook callbacks, one serves a health
//! probe. Command replies go back out through the delivery channel, not
//! the HTTP response; the response is a small JSON ack so the chat
//! platform does not retry.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tower_http::trace::TraceLayer;

use crate::notify::WebhookNotifier;
use crate::report;
use crate::service::ScheduleService;

use super::command::BotCommand;

// ============================================================================
// App State
// ============================================================================

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Schedule service shared with any concurrent CLI use
    pub service: Arc<ScheduleService>,

    /// Outbound reply channel; absent when no webhook is configured
    pub notifier: Option<Arc<WebhookNotifier>>,

    /// Server start time
    pub start_time: Instant,
}

// ============================================================================
// Wire Types
// ============================================================================

/// Incoming chat message; the platform sends more fields than these and
/// they are all tolerated
#[derive(Debug, Deserialize)]
pub struct ChatMessage {
    #[serde(default)]
    pub content: String,
}

/// Ack returned for processed webhook calls
#[derive(Debug, Serialize)]
pub struct AckResponse {
    pub status: String,
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_secs: u64,
}

// ============================================================================
// Bot Server
// ============================================================================

/// Chat-bot HTTP server
pub struct BotServer {
    bind_address: SocketAddr,
    state: AppState,
}

impl BotServer {
    /// Create a new bot server
    pub fn new(
        bind_address: SocketAddr,
        service: Arc<ScheduleService>,
        notifier: Option<Arc<WebhookNotifier>>,
    ) -> Self {
        let state = AppState {
            service,
            notifier,
            start_time: Instant::now(),
        };
        Self {
            bind_address,
            state,
        }
    }

    /// Get the application state
    pub fn state(&self) -> AppState {
        self.state.clone()
    }

    /// Build the router with all routes
    pub fn build_router(&self) -> Router {
        create_router(self.state.clone()).layer(TraceLayer::new_for_http())
    }

    /// Start with graceful shutdown
    pub async fn start_with_shutdown(
        &self,
        shutdown_signal: impl std::future::Future<Output = ()> + Send + 'static,
    ) -> anyhow::Result<()> {
        let router = self.build_router();

        tracing::info!("Starting bot server on {}", self.bind_address);

        let listener = tokio::net::TcpListener::bind(self.bind_address).await?;
        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown_signal)
            .await?;

        tracing::info!("Bot server shutdown complete");
        Ok(())
    }
}

/// Create the API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/webhook", post(handle_webhook))
        .route("/api/health", get(health_check))
        .with_state(state)
}

// ============================================================================
// Handlers
// ============================================================================

async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: state.start_time.elapsed().as_secs(),
    })
}

async fn handle_webhook(
    State(state): State<AppState>,
    Json(message): Json<ChatMessage>,
) -> impl IntoResponse {
    let Some(command) = BotCommand::parse(&message.content) else {
        // Not addressed to the bot; ignore without noise.
        return StatusCode::NO_CONTENT.into_response();
    };

    tracing::info!(command = ?command, "bot command received");

    let today = chrono::Local::now().date_naive();
    let reply = run_command(&state.service, command, today);

    if let Some(notifier) = &state.notifier {
        if let Err(e) = notifier.send(&reply).await {
            tracing::error!(error = %e, "failed to deliver bot reply");
            return (
                StatusCode::BAD_GATEWAY,
                Json(AckResponse {
                    status: "delivery_failed".to_string(),
                }),
            )
                .into_response();
        }
    }

    (
        StatusCode::OK,
        Json(AckResponse {
            status: "ok".to_string(),
        }),
    )
        .into_response()
}

/// Execute one parsed command and render its reply
pub fn run_command(
    service: &ScheduleService,
    command: BotCommand,
    today: chrono::NaiveDate,
) -> String {
    match command {
        BotCommand::Generate { week_start } => {
            match service.generate(week_start, today, false) {
                Ok(generated) => report::render_announcement(&generated),
                Err(e) => report::render_failure(&e),
            }
        }
        BotCommand::Save { week_start } => match service.generate(week_start, today, true) {
            Ok(generated) => report::render_announcement(&generated),
            Err(e) => report::render_failure(&e),
        },
        BotCommand::Team => match service.team_overview(today) {
            Ok(overview) => report::render_team(&overview),
            Err(e) => report::render_failure(&e),
        },
        BotCommand::Status { updates } => match service.update_statuses(&updates) {
            Ok(outcome) => report::render_update_report(&outcome),
            Err(e) => report::render_failure(&e),
        },
        BotCommand::Add { handle, name } => match service.add_employee(&handle, &name) {
            Ok(employee) => report::render_employee_added(&employee),
            Err(e) => report::render_failure(&e),
        },
        BotCommand::Help => report::render_help(),
    }
}
