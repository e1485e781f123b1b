//! End-to-end tests of the hosting loop over a real socket

mod common;

use std::{
    sync::{
        atomic::{AtomicBool, AtomicUsize, Ordering},
        Arc,
    },
    time::Duration,
};

use async_trait::async_trait;
use chrono::Duration as ChronoDuration;
use common::attempt_start;
use quiz_timer::{
    error::SubmissionError,
    server::run,
    services::Submitter,
    state::{AppState, SubmitOutcome, Submission, Thresholds, TimerSession},
    tasks::TimerExit,
    ManualClock,
};
use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::{TcpListener, TcpStream},
    sync::oneshot,
};

/// Submitter that takes a while and then reports a failure
#[derive(Default)]
struct SlowFailingSubmitter {
    calls: AtomicUsize,
    finished: AtomicBool,
}

#[async_trait]
impl Submitter for SlowFailingSubmitter {
    async fn submit(&self, _submission: &Submission) -> Result<(), SubmissionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(200)).await;
        self.finished.store(true, Ordering::SeqCst);
        Err(SubmissionError::CommandFailed {
            code: Some(1),
            stderr: "grader offline".to_string(),
        })
    }
}

async fn start(
    limit_minutes: i64,
    elapsed_seconds: i64,
) -> (Arc<AppState>, Arc<SlowFailingSubmitter>, TcpListener) {
    let clock = Arc::new(ManualClock::new(
        attempt_start() + ChronoDuration::seconds(elapsed_seconds),
    ));
    let session =
        TimerSession::new(attempt_start(), limit_minutes, Thresholds::default(), clock).unwrap();
    let submitter = Arc::new(SlowFailingSubmitter::default());
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    let state = Arc::new(AppState::new(
        &session,
        submitter.clone(),
        port,
        "127.0.0.1".to_string(),
    ));
    (state, submitter, listener)
}

async fn post_submit(port: u16, body: &str) -> String {
    let mut stream = TcpStream::connect(("127.0.0.1", port)).await.unwrap();
    let request = format!(
        "POST /submit HTTP/1.1\r\nHost: localhost\r\nContent-Type: application/json\r\n\
         Content-Length: {}\r\nConnection: close\r\n\r\n{}",
        body.len(),
        body
    );
    stream.write_all(request.as_bytes()).await.unwrap();

    let mut response = String::new();
    stream.read_to_string(&mut response).await.unwrap();
    response
}

#[tokio::test]
async fn manual_submit_is_answered_and_handed_off_before_the_host_stops() {
    let (state, submitter, listener) = start(10, 30).await;
    let port = state.port;
    let host = tokio::spawn(run(
        Arc::clone(&state),
        listener,
        futures::future::pending(),
    ));

    let response = tokio::time::timeout(
        Duration::from_secs(5),
        post_submit(port, r#"{"answered": 4, "total": 4}"#),
    )
    .await
    .unwrap();

    assert!(response.starts_with("HTTP/1.1 200"), "{}", response);
    assert!(response.contains(r#""status":"submitted""#), "{}", response);
    assert!(submitter.finished.load(Ordering::SeqCst));

    let exit = tokio::time::timeout(Duration::from_secs(5), host)
        .await
        .unwrap()
        .unwrap()
        .unwrap();
    assert_eq!(exit, TimerExit::Submitted);

    assert_eq!(submitter.calls.load(Ordering::SeqCst), 1);
    assert!(state.is_handed_off());
    assert!(state.last_error().unwrap().contains("grader offline"));
}

#[tokio::test]
async fn expired_session_submits_and_stops_without_requests() {
    let (state, submitter, listener) = start(1, 90).await;

    let exit = tokio::time::timeout(
        Duration::from_secs(5),
        run(Arc::clone(&state), listener, futures::future::pending()),
    )
    .await
    .unwrap()
    .unwrap();

    assert!(matches!(exit, TimerExit::Expired(SubmitOutcome::Accepted(_))));
    assert!(submitter.finished.load(Ordering::SeqCst));
    assert!(state.last_error().is_some());
}

#[tokio::test]
async fn shutdown_stops_the_host_without_submitting() {
    let (state, submitter, listener) = start(10, 0).await;
    let (stop_tx, stop_rx) = oneshot::channel::<()>();
    let host = tokio::spawn(run(Arc::clone(&state), listener, async move {
        let _ = stop_rx.await;
    }));

    stop_tx.send(()).unwrap();
    let exit = tokio::time::timeout(Duration::from_secs(5), host)
        .await
        .unwrap()
        .unwrap()
        .unwrap();

    assert_eq!(exit, TimerExit::Shutdown);
    assert_eq!(submitter.calls.load(Ordering::SeqCst), 0);
    assert!(state.submission().is_none());
}
