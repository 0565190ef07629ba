use once_cell::sync::Lazy;
use reqwest::Client;
use serde_json::{json, Value};
use std::net::TcpListener;
use std::process::{Child, Command, Stdio};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tokio::time::sleep;

const API_KEY: &str = "test-key-123";

struct TestServer {
    base_url: String,
    child: Child,
}

impl Drop for TestServer {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

static TEST_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));
static SERVER: Lazy<Mutex<Option<Arc<TestServer>>>> = Lazy::new(|| Mutex::new(None));

#[cfg(unix)]
mod cleanup {
    use std::sync::atomic::{AtomicI32, Ordering};
    use std::sync::Once;

    static REGISTER: Once = Once::new();
    static PID: AtomicI32 = AtomicI32::new(0);

    pub fn register(pid: u32) {
        REGISTER.call_once(|| {
            PID.store(pid as i32, Ordering::SeqCst);
            unsafe {
                libc::atexit(on_exit);
            }
        });
    }

    extern "C" fn on_exit() {
        let pid = PID.load(Ordering::SeqCst);
        if pid > 0 {
            unsafe {
                libc::kill(pid, libc::SIGTERM);
            }
        }
    }
}

fn pick_free_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind random port");
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    port
}

fn unique_snapshot_path() -> String {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    let mut path = std::env::temp_dir();
    path.push(format!(
        "metrics_dashboard_http_{}_{}.json",
        std::process::id(),
        nanos
    ));
    path.to_string_lossy().to_string()
}

fn snapshot_fixture() -> Value {
    json!({
        "user": {
            "total_count": 120,
            "active_count": 100,
            "inactive_count": 20,
            "new_users_7_days": {
                "count": 6,
                "preview": [
                    { "display_name": "Ama Mensah", "user_id": "user-0001-abcdef", "created": "2026-08-20T08:00:00Z", "occupation": "dj" },
                    { "display_name": "Kofi Owusu", "user_id": "usr42", "created": "2026-08-22T10:30:00Z" }
                ]
            },
            "types": {
                "customer": { "new_7_days": { "count": 4 } },
                "artist": { "new_7_days": { "count": 2 } }
            },
            "by_country": {
                "GH": {
                    "total_last_30_days": 30,
                    "artist": {
                        "count": 12,
                        "preview": [
                            { "display_name": "Ama Mensah", "latitude": 5.6, "longitude": -0.19 },
                            { "display_name": "no-coords" }
                        ]
                    }
                },
                "NG": { "total_last_30_days": 12, "customer": { "count": 9 } }
            }
        },
        "booking": {
            "last_30_days": {
                "insights": {
                    "total_last_30d": 42,
                    "by_status": { "confirmed": 30, "cancelled": 12 },
                    "total_revenue_30d": 999.5
                },
                "preview": [
                    { "booking_id": "bk_0123456789", "status": "confirmed", "type": "studio", "total_price": 120.0, "currency": "USD", "from_time": "2026-08-20T09:00:00Z", "service_provider_name": "Studio A", "customer_name": "Ama Mensah" },
                    { "booking_id": "bk2", "status": "cancelled", "type": "event", "total_price": 80.0, "currency": "USD", "from_time": "2026-08-21T18:00:00Z", "service_provider_name": "Studio A" },
                    { "booking_id": "bk3", "status": "confirmed", "type": "studio", "total_price": 95.0, "currency": "USD", "from_time": "2026-08-21T20:00:00Z", "service_provider_name": "Studio B" }
                ]
            }
        }
    })
}

async fn wait_until_ready(base_url: &str) {
    let client = Client::new();
    let deadline = Instant::now() + Duration::from_secs(3);
    loop {
        if let Ok(resp) = client.get(format!("{base_url}/api/overview")).send().await {
            if resp.status().is_success() {
                return;
            }
        }
        if Instant::now() > deadline {
            panic!("server did not become ready");
        }
        sleep(Duration::from_millis(100)).await;
    }
}

async fn spawn_server(snapshot_path: &str, upstream_base_url: &str) -> TestServer {
    let port = pick_free_port();
    let child = Command::new(env!("CARGO_BIN_EXE_metrics_dashboard"))
        .env("PORT", port.to_string())
        .env("DASHBOARD_ENV", "local")
        .env("SNAPSHOT_PATH", snapshot_path)
        .env("METRICS_BASE_URL", upstream_base_url)
        .env("METRICS_API_KEY", API_KEY)
        .env("RUST_LOG", "info")
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .spawn()
        .expect("failed to spawn server");

    #[cfg(unix)]
    cleanup::register(child.id());

    let base_url = format!("http://127.0.0.1:{port}");
    wait_until_ready(&base_url).await;

    TestServer { base_url, child }
}

/// Shared server preloaded with the fixture snapshot. Its upstream points at
/// an unreachable port, so only the refresh endpoint can fail on it.
async fn shared_server() -> Arc<TestServer> {
    let mut guard = SERVER.lock().await;
    if let Some(server) = guard.as_ref() {
        return Arc::clone(server);
    }
    let snapshot_path = unique_snapshot_path();
    std::fs::write(
        &snapshot_path,
        serde_json::to_vec(&snapshot_fixture()).unwrap(),
    )
    .unwrap();
    let server = Arc::new(spawn_server(&snapshot_path, "http://127.0.0.1:9").await);
    *guard = Some(Arc::clone(&server));
    server
}

/// Stub metrics API that enforces the key in both the header and the query
/// parameter, the way the real endpoint does.
async fn spawn_upstream() -> String {
    use axum::extract::Query;
    use axum::http::{HeaderMap, StatusCode};
    use axum::routing::get;
    use axum::{Json, Router};
    use std::collections::HashMap;

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = Router::new().route(
        "/v1/metrics/performance",
        get(
            |Query(query): Query<HashMap<String, String>>, headers: HeaderMap| async move {
                let header_ok = headers
                    .get("x-api-key")
                    .and_then(|value| value.to_str().ok())
                    == Some(API_KEY);
                let query_ok = query.get("secure_api_key").map(String::as_str) == Some(API_KEY);
                if header_ok && query_ok {
                    (
                        StatusCode::OK,
                        Json(json!({ "payload": { "user": { "total_count": 7, "active_count": 5, "inactive_count": 2 } } })),
                    )
                } else {
                    (StatusCode::UNAUTHORIZED, Json(json!({ "error": "bad key" })))
                }
            },
        ),
    );
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

#[tokio::test]
async fn http_overview_reflects_snapshot() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let view: Value = client
        .get(format!("{}/api/overview", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(view["total"], 120);
    assert_eq!(view["active"], 100);
    assert_eq!(view["inactive"], 20);
}

#[tokio::test]
async fn http_period_breakdown_prefers_aggregate() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let view: Value = client
        .get(format!("{}/api/periods/7d", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(view["count"], 6);
    assert_eq!(view["by_type"]["customer"], 4);
    assert_eq!(view["by_type"]["artist"], 2);
    assert_eq!(view["preview"][0]["user_id"], "user-000…");
    assert_eq!(view["preview"][1]["user_id"], "usr42");
    assert_eq!(view["preview"][0]["created"], "2026-08-20");
}

#[tokio::test]
async fn http_unknown_period_is_bad_request() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let response = client
        .get(format!("{}/api/periods/yearly", server.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 400);

    let response = client
        .get(format!("{}/api/types/admin", server.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 400);
}

#[tokio::test]
async fn http_country_insights_from_snapshot() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let view: Value = client
        .get(format!("{}/api/countries", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(view["total_new_30d"], 42);
    assert_eq!(view["per_country_breakdown"][0]["country"], "GH");
    assert_eq!(view["per_country_breakdown"][0]["total"], 12);
    assert_eq!(view["map_points"].as_array().unwrap().len(), 1);
    assert_eq!(view["map_points"][0]["display_name"], "Ama Mensah");
}

#[tokio::test]
async fn http_booking_insights_from_snapshot() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let view: Value = client
        .get(format!("{}/api/bookings", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(view["total"], 42);
    assert_eq!(view["by_status"]["confirmed"], 30);
    assert_eq!(view["currency_label"], "USD");
    assert_eq!(view["top_providers"][0]["provider"], "Studio A");
    assert_eq!(view["top_providers"][0]["revenue"], 200.0);
    assert_eq!(view["daily_counts"][0]["date"], "2026-08-20");
    assert_eq!(view["daily_counts"][1]["count"], 2);
    assert_eq!(view["preview_rows"][0]["booking_id"], "bk_01234…");
}

#[tokio::test]
async fn http_refresh_against_unreachable_upstream_fails() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let response = client
        .post(format!("{}/api/refresh", server.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 502);
}

#[tokio::test]
async fn http_refresh_pulls_snapshot_from_upstream() {
    let _guard = TEST_LOCK.lock().await;
    let upstream = spawn_upstream().await;
    let snapshot_path = unique_snapshot_path();
    let server = spawn_server(&snapshot_path, &upstream).await;
    let client = Client::new();

    // No snapshot yet: the views answer with their zero defaults.
    let before: Value = client
        .get(format!("{}/api/overview", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(before["total"], 0);

    let refreshed: Value = client
        .post(format!("{}/api/refresh", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(refreshed["overview"]["total"], 7);
    assert!(!refreshed["fetched_at"].as_str().unwrap().is_empty());

    let after: Value = client
        .get(format!("{}/api/overview", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(after["total"], 7);
    assert_eq!(after["active"], 5);

    // The fetched snapshot is persisted for the next start.
    let persisted: Value =
        serde_json::from_slice(&std::fs::read(&snapshot_path).unwrap()).unwrap();
    assert_eq!(persisted["user"]["total_count"], 7);
}
