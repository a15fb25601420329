mod config;
mod error;
mod game;
mod models;
mod routes;

use std::{sync::Arc, time::Duration};

use anyhow::Result;
use config::Config;
use game::GameSessionManager;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// How often the idle sweeper wakes up
pub const IDLE_SWEEP_INTERVAL: Duration = Duration::from_secs(15);

/// Application state shared across all handlers
pub struct AppState {
    pub config: Config,
    pub games: GameSessionManager,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let games = GameSessionManager::new(&config.game);
        Self { config, games }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "battleship_backend=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Battleship backend server...");

    // Load configuration
    let config = Config::from_env()?;
    tracing::info!(
        "Configuration loaded (unknown player policy: {:?})",
        config.game.unknown_player_policy
    );

    let state = Arc::new(AppState::new(config));

    // Spawn background task to drop abandoned games
    if let Some(timeout) = state.config.game.session_idle_timeout {
        let sweep_state = state.clone();
        tokio::spawn(async move {
            idle_session_sweep_task(sweep_state, timeout).await;
        });
        tracing::info!("Idle games expire after {:?}", timeout);
    }

    // Configure CORS
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = routes::create_routes()
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state.clone());

    // Start server
    let addr = state.config.server_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Server listening on {}", addr);
    tracing::info!("Single player API: http://{}/single_player", addr);
    tracing::info!("Health check: http://{}/health", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Background task that periodically removes games idle beyond `timeout`
async fn idle_session_sweep_task(state: Arc<AppState>, timeout: Duration) {
    let mut interval = tokio::time::interval(IDLE_SWEEP_INTERVAL);

    loop {
        interval.tick().await;

        let removed = state.games.sweep_idle(timeout);
        if removed > 0 {
            tracing::debug!(
                "Idle sweep removed {} games, {} remain",
                removed,
                state.games.store().len()
            );
        }
    }
}
