//! Shared helpers: in-process mock MAP devices and status payloads.

#![allow(dead_code)]

use axum::{extract::RawQuery, http::HeaderMap, routing::get, Router};
use malina_exporter::collectors::{fields::required_fields, FIELDS};
use malina_exporter::malina::{DeviceTarget, StatusRecord};
use serde_json::{json, Map, Value};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// What a mock device saw of one request
#[derive(Debug, Clone)]
pub struct SeenRequest {
    pub authorization: Option<String>,
    pub query: Option<String>,
}

pub struct MockDevice {
    pub host: String,
    pub seen: Arc<Mutex<Vec<SeenRequest>>>,
}

impl MockDevice {
    pub fn requests(&self) -> Vec<SeenRequest> {
        self.seen.lock().unwrap().clone()
    }

    pub fn target(&self, name: &str) -> DeviceTarget {
        DeviceTarget::new(name, self.host.clone(), Duration::from_secs(2))
    }
}

/// Spawn a device serving `body` on `/read_json.php`, optionally after a delay
pub async fn spawn_device_with_delay(body: String, delay: Duration) -> MockDevice {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let recorded = seen.clone();

    let app = Router::new().route(
        "/read_json.php",
        get(move |headers: HeaderMap, RawQuery(query): RawQuery| {
            let recorded = recorded.clone();
            let body = body.clone();
            async move {
                recorded.lock().unwrap().push(SeenRequest {
                    authorization: headers
                        .get("authorization")
                        .and_then(|v| v.to_str().ok())
                        .map(str::to_string),
                    query,
                });
                tokio::time::sleep(delay).await;
                body
            }
        }),
    );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let host = listener.local_addr().unwrap().to_string();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    MockDevice { host, seen }
}

pub async fn spawn_device(body: String) -> MockDevice {
    spawn_device_with_delay(body, Duration::ZERO).await
}

pub async fn spawn_healthy_device() -> MockDevice {
    spawn_device(full_status().to_string()).await
}

/// A host on which nothing listens
pub fn closed_host() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    addr.to_string()
}

/// Payload with every table field set to 1 and firmware "1.2"
pub fn full_status() -> Value {
    let mut map = Map::new();
    map.insert("fw".to_string(), json!("1.2"));
    for spec in FIELDS {
        map.insert(spec.field.to_string(), json!(1));
    }
    Value::Object(map)
}

/// Only the required fields plus firmware
pub fn required_status() -> Value {
    let mut map = Map::new();
    map.insert("fw".to_string(), json!("1.2"));
    for spec in required_fields() {
        map.insert(spec.field.to_string(), json!(1));
    }
    Value::Object(map)
}

/// `full_status` with some fields replaced
pub fn status_with(overrides: Value) -> Value {
    let mut status = full_status();
    if let (Value::Object(base), Value::Object(extra)) = (&mut status, overrides) {
        base.extend(extra);
    }
    status
}

/// `full_status` without the given fields
pub fn status_without(fields: &[&str]) -> Value {
    let mut status = full_status();
    if let Value::Object(map) = &mut status {
        for field in fields {
            map.remove(*field);
        }
    }
    status
}

pub fn record(value: Value) -> StatusRecord {
    serde_json::from_value(value).unwrap()
}

pub fn target(name: &str, host: &str) -> DeviceTarget {
    DeviceTarget::new(name, host, Duration::from_secs(1))
}

/// Log output captured from the crate's `tracing` events, without ANSI colours
#[derive(Clone, Default)]
pub struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
    /// Install a debug-level `fmt` subscriber for the current thread
    pub fn install(&self) -> tracing::subscriber::DefaultGuard {
        let logs = self.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::new("malina_exporter=debug"))
            .with_ansi(false)
            .with_writer(move || logs.clone())
            .finish();
        tracing::subscriber::set_default(subscriber)
    }

    pub fn lines(&self, level: &str) -> Vec<String> {
        String::from_utf8_lossy(&self.0.lock().unwrap())
            .lines()
            .filter(|line| line.contains(level))
            .map(str::to_string)
            .collect()
    }
}

impl std::io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}
