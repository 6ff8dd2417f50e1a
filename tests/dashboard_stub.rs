//! Integration tests against a local dashboard stub
//!
//! A minimal HTTP/1.1 responder on a loopback socket stands in for the
//! Chromium dashboard, so the paginated range fetch and the client's retry
//! behavior can be exercised end to end without a live upstream. Tests that
//! ride through backoff or inter-request delays run with a paused tokio
//! clock so the sleeps auto-advance.

use std::sync::{Arc, Mutex};

use serde_json::Value;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use chromecal::data::MilestoneClient;
use chromecal::upstream::{UpstreamClient, UpstreamError};

/// Request paths seen by the stub, in arrival order
type RequestLog = Arc<Mutex<Vec<String>>>;

/// Spawns a one-shot-per-connection HTTP stub and returns its base URL
/// together with the request log
async fn spawn_stub(handler: fn(&str) -> (u16, String)) -> (String, RequestLog) {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("Failed to bind stub");
    let addr = listener.local_addr().expect("Stub should have an address");
    let log: RequestLog = Arc::new(Mutex::new(Vec::new()));
    let task_log = Arc::clone(&log);

    tokio::spawn(async move {
        loop {
            let (mut socket, _) = match listener.accept().await {
                Ok(conn) => conn,
                Err(_) => break,
            };
            let log = Arc::clone(&task_log);
            tokio::spawn(async move {
                let mut buf = vec![0u8; 4096];
                let n = socket.read(&mut buf).await.unwrap_or(0);
                let request = String::from_utf8_lossy(&buf[..n]).into_owned();
                let path = request
                    .lines()
                    .next()
                    .and_then(|line| line.split_whitespace().nth(1))
                    .unwrap_or("/")
                    .to_string();
                log.lock().unwrap().push(path.clone());

                let (status, body) = handler(&path);
                let reason = if status == 200 { "OK" } else { "Internal Server Error" };
                let response = format!(
                    "HTTP/1.1 {status} {reason}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                    body.len()
                );
                let _ = socket.write_all(response.as_bytes()).await;
            });
        }
    });

    (format!("http://{addr}"), log)
}

/// Dashboard behavior for the range-fetch test: the unparameterized call
/// reports milestone 81 as the latest, every page serves one stable date,
/// and the page for milestone 83 always fails
fn milestone_handler(path: &str) -> (u16, String) {
    match path.strip_prefix("/fetch_milestone_schedule?mstone=") {
        Some(n) => {
            let mstone: u64 = n.parse().unwrap_or(0);
            if mstone < 80 || mstone == 83 {
                (500, "{}".to_string())
            } else {
                let body = format!(
                    "{{\"mstones\":[{{\"mstone\":{},\"stable_date\":\"2022-03-{:02}T00:00:00\"}}]}}",
                    mstone,
                    mstone - 79
                );
                (200, body)
            }
        }
        None => (200, "{\"mstones\":[{\"mstone\":81}]}".to_string()),
    }
}

fn always_failing_handler(_path: &str) -> (u16, String) {
    (500, "{}".to_string())
}

fn garbage_handler(_path: &str) -> (u16, String) {
    (200, "not json".to_string())
}

#[tokio::test(start_paused = true)]
async fn test_mid_range_page_failure_is_skipped() {
    let (url, log) = spawn_stub(milestone_handler).await;
    let client = MilestoneClient::new(UpstreamClient::with_base_url(url));

    let index = client
        .fetch_schedule()
        .await
        .expect("One bad page must not abort the range fetch");

    let mstones: Vec<u64> = index.values().flatten().map(|r| r.mstone).collect();
    assert!(mstones.contains(&80), "Floor of the range should be present");
    assert!(mstones.contains(&82));
    assert!(mstones.contains(&84), "Pages after the gap should still land");
    assert!(mstones.contains(&86), "Range should reach latest+5");
    assert!(!mstones.contains(&83), "The failing page is skipped, not fatal");
    assert_eq!(mstones.len(), 6);

    let paths = log.lock().unwrap().clone();
    assert!(paths.contains(&"/fetch_milestone_schedule".to_string()));
    assert!(paths.contains(&"/fetch_milestone_schedule?mstone=80".to_string()));
    assert!(paths.contains(&"/fetch_milestone_schedule?mstone=86".to_string()));
    assert!(
        !paths.iter().any(|p| p.ends_with("mstone=79")),
        "Nothing below the floor should be requested"
    );
    assert!(
        !paths.iter().any(|p| p.ends_with("mstone=87")),
        "Nothing past latest+5 should be requested"
    );
}

#[tokio::test(start_paused = true)]
async fn test_http_failures_use_the_full_retry_budget() {
    let (url, log) = spawn_stub(always_failing_handler).await;
    let client = UpstreamClient::with_base_url(url);

    let result: Result<Value, UpstreamError> = client.get_json("/fetch_releases").await;

    assert!(matches!(result, Err(UpstreamError::Http(_))));
    assert_eq!(
        log.lock().unwrap().len(),
        3,
        "A persistent server failure should be attempted three times"
    );
}

#[tokio::test]
async fn test_parse_failure_is_not_retried() {
    let (url, log) = spawn_stub(garbage_handler).await;
    let client = UpstreamClient::with_base_url(url);

    let result: Result<Value, UpstreamError> = client.get_json("/fetch_releases").await;

    assert!(matches!(result, Err(UpstreamError::Parse(_))));
    assert_eq!(
        log.lock().unwrap().len(),
        1,
        "An unparseable body will not parse differently; no retry"
    );
}
