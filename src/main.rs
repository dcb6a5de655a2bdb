//! Focus Timer - a presence-aware Pomodoro session timer
//!
//! This is the main entry point for the focus-timer server.

use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

use focus_timer::{
    api::create_router,
    config::Config,
    state::AppState,
    utils::shutdown_signal,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("focus_timer={},tower_http=info", config.log_level()))
        .init();

    config.validate()?;

    info!("Starting focus-timer server v{}", env!("CARGO_PKG_VERSION"));
    info!(
        "Configuration: host={}, port={}, work={}min, short break={}min, long break={}min, long break every {} sessions, auto-pause={}",
        config.host,
        config.port,
        config.work_minutes,
        config.short_break_minutes,
        config.long_break_minutes,
        config.sessions_until_long_break,
        !config.no_auto_pause
    );

    // Create application state
    let state = Arc::new(AppState::new(
        config.port,
        config.host.clone(),
        config.timer_settings(),
    ));

    // Create HTTP router with all endpoints
    let app = create_router(Arc::clone(&state));

    // Bind to the specified address
    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Server running on http://{}", addr);
    info!("Endpoints:");
    info!("  POST /api/pomodoro/start      - Start the timer");
    info!("  POST /api/pomodoro/pause      - Pause the timer");
    info!("  POST /api/pomodoro/resume     - Resume a paused timer");
    info!("  POST /api/pomodoro/reset      - Reset the current session");
    info!("  POST /api/pomodoro/switch     - Switch session type");
    info!("  POST /api/pomodoro/presence   - Report person presence");
    info!("  POST /api/pomodoro/auto-pause - Toggle presence auto-pause");
    info!("  GET  /api/pomodoro/state      - Current timer state");
    info!("  GET  /ws/pomodoro             - Timer event stream");
    info!("  GET  /health                  - Health check");

    // Setup graceful shutdown
    let server = axum::serve(listener, app);

    tokio::select! {
        result = server => {
            if let Err(e) = result {
                tracing::error!("Server error: {}", e);
            }
        }
        _ = shutdown_signal() => {
            info!("Shutdown signal received");
        }
    }

    if let Err(e) = state.timer.shutdown() {
        tracing::error!("Failed to stop session timer: {}", e);
    }

    info!("Server shutdown complete");
    Ok(())
}
