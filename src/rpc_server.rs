//! PocketCSV RPC Server: JSON-RPC over stdin/stdout for the popup host.
//!
//! Protocol: one JSON object per line (newline-delimited JSON).
//! Request:  {"id":1, "method":"popup.search", "params":{"query":"rust"}}
//! Response: {"id":1, "result":{...}} or {"id":1, "error":"..."}

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use log::{error, info, warn};
use serde_json::{json, Value};
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::Mutex;

use pocketcsv::app::App;
use pocketcsv::platform;
use pocketcsv::rpc_handler::{handle_method, RpcState};
use pocketcsv::services::key_value_store::SqliteKeyValueStore;
use pocketcsv::services::settings_engine::{SettingsEngine, SettingsEngineTrait};

/// Simple rate limiter: max requests per second.
struct RateLimiter {
    window_start: Instant,
    request_count: u32,
    max_per_second: u32,
}

impl RateLimiter {
    fn new(max_per_second: u32) -> Self {
        Self { window_start: Instant::now(), request_count: 0, max_per_second }
    }

    /// Returns true if the request is allowed, false if rate-limited.
    fn check(&mut self) -> bool {
        if self.window_start.elapsed().as_secs() >= 1 {
            self.window_start = Instant::now();
            self.request_count = 0;
        }
        self.request_count += 1;
        self.request_count <= self.max_per_second
    }
}

fn emit(value: Value) {
    println!("{}", value);
    let _ = io::stdout().flush();
}

/// Logs go to a file; stdout carries the protocol.
fn init_logging(data_dir: &Path) {
    let log_config = ConfigBuilder::new().set_time_format_rfc3339().build();
    if let Ok(log_file) = File::create(data_dir.join("pocketcsv-rpc.log")) {
        let _ = WriteLogger::init(LevelFilter::Debug, log_config, log_file);
    }
}

#[tokio::main]
async fn main() {
    let data_dir = platform::get_data_dir();
    if let Err(e) = fs::create_dir_all(&data_dir) {
        emit(json!({"event": "error", "error": format!("cannot create data dir: {}", e)}));
        return;
    }
    init_logging(&data_dir);
    info!("PocketCSV RPC starting, data dir {}", data_dir.display());

    let mut settings_engine = SettingsEngine::new(None);
    if let Err(e) = settings_engine.load() {
        warn!("Falling back to default settings: {}", e);
    }

    let store = match SqliteKeyValueStore::open(data_dir.join("pocketcsv.db")) {
        Ok(store) => store,
        Err(e) => {
            error!("Cannot open database: {}", e);
            emit(json!({"event": "error", "error": e.to_string()}));
            return;
        }
    };

    let mut app = App::new(Arc::new(store), settings_engine.get_settings().clone());
    if let Err(e) = app.init().await {
        error!("Startup failed: {}", e);
        emit(json!({"event": "error", "error": e.to_string()}));
        return;
    }

    let state = Mutex::new(RpcState { app, settings_engine });
    emit(json!({"event": "ready", "version": env!("CARGO_PKG_VERSION")}));

    let mut rate_limiter = RateLimiter::new(200);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        let line = match lines.next_line().await {
            Ok(Some(l)) => l,
            Ok(None) => break,
            Err(e) => {
                warn!("stdin read failed: {}", e);
                break;
            }
        };
        if line.trim().is_empty() {
            continue;
        }

        let req: Value = match serde_json::from_str(&line) {
            Ok(v) => v,
            Err(e) => {
                emit(json!({"id": null, "error": format!("parse error: {}", e)}));
                continue;
            }
        };

        let id = req.get("id").cloned().unwrap_or(Value::Null);

        if !rate_limiter.check() {
            emit(json!({"id": id, "error": "rate limit exceeded"}));
            continue;
        }

        let method = req.get("method").and_then(|v| v.as_str()).unwrap_or("");
        let params = req.get("params").cloned().unwrap_or(json!({}));

        let response = match handle_method(&state, method, &params).await {
            Ok(val) => json!({"id": id, "result": val}),
            Err(err) => {
                info!("{} failed: {}", method, err);
                json!({"id": id, "error": err})
            }
        };
        emit(response);
    }

    info!("stdin closed, shutting down");
}
