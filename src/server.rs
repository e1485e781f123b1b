//! Hosting loop: the HTTP surface and the deadline timer together

use std::{future::Future, sync::Arc};
use tokio::{net::TcpListener, sync::oneshot};
use tracing::{error, info};

use crate::{
    api::create_router,
    state::AppState,
    tasks::{deadline_timer_task, TimerExit},
};

/// Serve the API until the timer ends, then stop gracefully.
///
/// The timer only finishes once any submission has been handed off, and the
/// server drains in-flight requests before returning, so a `POST /submit`
/// caller always gets its response.
pub async fn run<F>(state: Arc<AppState>, listener: TcpListener, shutdown: F) -> anyhow::Result<TimerExit>
where
    F: Future<Output = ()> + Send + 'static,
{
    let (timer_done_tx, timer_done_rx) = oneshot::channel::<()>();

    // Start the deadline timer background task
    let timer_state = Arc::clone(&state);
    let timer = tokio::spawn(async move {
        let exit = deadline_timer_task(timer_state, shutdown).await;
        let _ = timer_done_tx.send(());
        exit
    });

    let app = create_router(state);
    let served = axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            let _ = timer_done_rx.await;
            info!("Timer finished, draining connections");
        })
        .await;

    if let Err(e) = served {
        error!("Server error: {}", e);
        timer.abort();
        return Err(e.into());
    }

    let exit = timer.await?;
    info!("Timer finished: {:?}", exit);
    Ok(exit)
}
