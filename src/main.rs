//! Quiz Timer - a deadline timer for timed quiz attempts
//! 
//! This is the main entry point for the quiz-timer application.

use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info};

use quiz_timer::{
    clock::{Clock, SystemClock},
    config::Config,
    server::run,
    state::AppState,
    tasks::TimerExit,
    utils::shutdown_signal,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("quiz_timer={},tower_http=info", config.log_level()))
        .init();

    info!("Starting quiz-timer server v{}", env!("CARGO_PKG_VERSION"));

    // Refuse to start on malformed timer inputs rather than show a wrong countdown
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let session = match config.build_session(clock) {
        Ok(session) => session,
        Err(e) => {
            error!("Configuration error: {}", e);
            return Err(e.into());
        }
    };

    info!("Configuration: host={}, port={}, limit={}min, start={}, deadline={}",
          config.host, config.port, session.time_limit_minutes(),
          session.start_time().to_rfc3339(), session.deadline().to_rfc3339());

    // Create application state
    let state = Arc::new(AppState::new(
        &session,
        config.submitter(),
        config.port,
        config.host.clone(),
    ));

    // Bind to the specified address
    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Server running on http://{}", addr);
    info!("Endpoints:");
    info!("  GET  /timer  - Current countdown and phase");
    info!("  POST /submit - Submit the attempt early");
    info!("  GET  /health - Health check");

    if run(state, listener, shutdown_signal()).await? == TimerExit::Shutdown {
        info!("Shutdown signal received");
    }

    info!("Server shutdown complete");
    Ok(())
}
