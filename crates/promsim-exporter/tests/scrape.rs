//! HTTP scrape scenarios against a live listener.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::net::SocketAddr;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::watch;

use promsim_exporter::app_state::AppState;
use promsim_exporter::config::{self, SimConfig};
use promsim_exporter::router;
use promsim_exporter::workload::Workload;

const FAST: &str = r#"
version: 1
exporter:
  listen: "127.0.0.1:0"
workload:
  latency_min_secs: 0.005
  latency_max_secs: 0.01
"#;

async fn serve(cfg: SimConfig) -> (SocketAddr, AppState) {
    let state = AppState::new(cfg).unwrap();
    let listener = TcpListener::bind(state.cfg().exporter.listen_addr().unwrap())
        .await
        .unwrap();
    let addr = listener.local_addr().unwrap();
    let app = router::build_router(state.clone());
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (addr, state)
}

async fn get(addr: SocketAddr, path: &str) -> (u16, String, String) {
    let mut s = TcpStream::connect(addr).await.unwrap();
    let req = format!("GET {path} HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n");
    s.write_all(req.as_bytes()).await.unwrap();
    let mut raw = String::new();
    s.read_to_string(&mut raw).await.unwrap();

    let (head, body) = raw.split_once("\r\n\r\n").expect("http response");
    let status = head
        .split_whitespace()
        .nth(1)
        .and_then(|c| c.parse().ok())
        .expect("status code");
    (status, head.to_ascii_lowercase(), body.to_string())
}

/// Drop `process_*` lines, which change between scrapes on their own.
fn instrument_lines(body: &str) -> Vec<&str> {
    body.lines()
        .filter(|l| !l.starts_with("process_") && !l.contains(" process_"))
        .collect()
}

fn request_count(body: &str) -> u64 {
    body.lines()
        .find_map(|l| l.strip_prefix("request_count_total "))
        .expect("request_count_total sample")
        .parse()
        .expect("integer count")
}

#[tokio::test]
async fn scrape_reports_progress() {
    let (addr, state) = serve(config::load_from_str(FAST).unwrap()).await;
    let w = Workload::new(state.metrics(), state.cfg().workload.clone()).unwrap();
    let (_stop, rx) = watch::channel(false);
    tokio::spawn(w.run(StdRng::seed_from_u64(3), rx));

    tokio::time::sleep(Duration::from_millis(100)).await;
    let (status, head, body) = get(addr, "/metrics").await;
    assert_eq!(status, 200);
    assert!(head.contains("content-type: text/plain; version=0.0.4"));
    for name in [
        "request_processing_seconds",
        "request_count",
        "room_temperature_celsius",
    ] {
        assert!(body.lines().any(|l| l.starts_with(name)), "{name} missing:\n{body}");
    }
    let first = request_count(&body);
    assert!(first >= 1);

    tokio::time::sleep(Duration::from_millis(100)).await;
    let (_, _, body) = get(addr, "/metrics").await;
    assert!(request_count(&body) > first);
}

#[tokio::test]
async fn scrapes_are_read_only() {
    let (addr, state) = serve(config::load_from_str(FAST).unwrap()).await;
    state.metrics().request_count.inc();

    let (_, _, a) = get(addr, "/metrics").await;
    let (_, _, b) = get(addr, "/metrics").await;
    assert_eq!(instrument_lines(&a), instrument_lines(&b));
    assert_eq!(request_count(&a), 1);
}

#[tokio::test]
async fn scrape_includes_process_metrics() {
    let (addr, _) = serve(config::load_from_str(FAST).unwrap()).await;
    let (_, _, body) = get(addr, "/metrics").await;

    assert!(body.contains("# TYPE process_start_time_seconds gauge\n"));
    let start: f64 = body
        .lines()
        .find_map(|l| l.strip_prefix("process_start_time_seconds "))
        .expect("process_start_time_seconds sample")
        .parse()
        .expect("float");
    assert!(start > 0.0);
    if cfg!(target_os = "linux") {
        assert!(body.contains("# TYPE process_cpu_seconds_total counter\n"));
        assert!(body.contains("process_open_fds "));
    }
}

#[tokio::test]
async fn health_and_readiness() {
    let (addr, state) = serve(config::load_from_str(FAST).unwrap()).await;

    assert_eq!(get(addr, "/healthz").await.0, 200);
    let (status, _, body) = get(addr, "/readyz").await;
    assert_eq!((status, body.as_str()), (200, "ready"));

    state.set_draining();
    let (status, _, body) = get(addr, "/readyz").await;
    assert_eq!((status, body.as_str()), (503, "draining"));
    assert_eq!(get(addr, "/healthz").await.0, 200);
}

#[tokio::test]
async fn unknown_path_is_404() {
    let (addr, _) = serve(config::load_from_str(FAST).unwrap()).await;
    assert_eq!(get(addr, "/nope").await.0, 404);
}
