//! HTTP endpoint handlers

use std::sync::Arc;
use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
};
use tracing::{info, warn};

use crate::state::{AppState, Submission, SubmitOutcome};
use super::responses::{HealthResponse, SubmitRequest, SubmitResponse, TimerStatusResponse};

/// Handle GET /timer - Return the current display state
pub async fn timer_handler(State(state): State<Arc<AppState>>) -> Json<TimerStatusResponse> {
    Json(TimerStatusResponse {
        view: state.current_view(),
        time_limit_minutes: state.session().time_limit_minutes(),
        submission: state.submission(),
        last_error: state.last_error(),
        uptime: state.get_uptime(),
        port: state.port,
        host: state.host.clone(),
    })
}

/// Handle POST /submit - Submit the attempt before the deadline
pub async fn submit_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SubmitRequest>,
) -> (StatusCode, Json<SubmitResponse>) {
    if let Some(existing) = state.submission() {
        return (StatusCode::CONFLICT, Json(SubmitResponse::already_submitted(existing)));
    }

    if let (Some(answered), Some(total)) = (request.answered, request.total) {
        if answered > total {
            warn!("Rejecting submit with {} of {} answered", answered, total);
            return (
                StatusCode::BAD_REQUEST,
                Json(SubmitResponse::invalid(format!(
                    "answered ({}) cannot exceed total ({})",
                    answered, total
                ))),
            );
        }
    }

    if let Some(prompt) = request.unanswered_prompt() {
        info!("Submit held for confirmation: {}", prompt);
        return (StatusCode::CONFLICT, Json(SubmitResponse::confirm_required(prompt)));
    }

    let session = state.session();
    let submission = Submission::manual(
        session,
        session.clock().now(),
        request.answered,
        request.total,
    );

    match state.submit(submission).await {
        SubmitOutcome::Accepted(submission) => {
            info!("Submit endpoint called - attempt submitted");
            (StatusCode::OK, Json(SubmitResponse::submitted(submission)))
        }
        SubmitOutcome::AlreadySubmitted(existing) => {
            (StatusCode::CONFLICT, Json(SubmitResponse::already_submitted(existing)))
        }
    }
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}
