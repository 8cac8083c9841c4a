//! RPC method handler for the PocketCSV JSON-RPC protocol.
//!
//! Kept apart from `rpc_server.rs` so it can be unit-tested. `handle_method`
//! dispatches one request to the [`App`] and returns the JSON result or an
//! error string suitable for showing to the user.

use serde_json::{json, Value};
use tokio::sync::Mutex;

use crate::app::{export_status, import_status, App};
use crate::services::settings_engine::{SettingsEngine, SettingsEngineTrait};
use crate::types::errors::{ImportError, TabError};
use crate::types::tab::{ActiveTab, TabHost};

/// Everything a request can touch.
pub struct RpcState {
    pub app: App,
    pub settings_engine: SettingsEngine,
}

/// Tab host backed by the request itself: the active tab comes from the
/// params, and open requests are handed back to the caller in the result.
#[derive(Default)]
struct RequestTabHost {
    tab: Option<ActiveTab>,
    opened: Vec<(String, bool)>,
}

impl TabHost for RequestTabHost {
    fn active_tab(&self) -> Result<ActiveTab, TabError> {
        self.tab.clone().ok_or(TabError::NoActiveTab)
    }

    fn open_tab(&mut self, url: &str, active: bool) -> Result<(), TabError> {
        self.opened.push((url.to_string(), active));
        Ok(())
    }
}

fn str_param<'a>(params: &'a Value, name: &str) -> Result<&'a str, String> {
    params
        .get(name)
        .and_then(|v| v.as_str())
        .ok_or_else(|| format!("missing {}", name))
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<Value, String> {
    serde_json::to_value(value).map_err(|e| e.to_string())
}

/// Dispatch a JSON-RPC method call.
///
/// Returns `Ok(Value)` on success or `Err(String)` with an error message.
pub async fn handle_method(
    state: &Mutex<RpcState>,
    method: &str,
    params: &Value,
) -> Result<Value, String> {
    let mut guard = state.lock().await;
    let RpcState {
        app,
        settings_engine,
    } = &mut *guard;

    match method {
        "ping" => Ok(json!({"pong": true})),

        // ─── Popup view ───
        "popup.view" => to_json(&app.view()),
        "popup.search" => {
            let query = str_param(params, "query")?;
            app.search(query);
            to_json(&app.view())
        }
        "popup.go_to" => {
            let page = params
                .get("page")
                .and_then(|v| v.as_u64())
                .ok_or("missing page")?;
            app.go_to(page as usize);
            to_json(&app.view())
        }

        // ─── Bookmarks ───
        "bookmark.capture" => {
            let tab = match params.get("tab") {
                Some(v) if !v.is_null() => Some(
                    serde_json::from_value::<ActiveTab>(v.clone())
                        .map_err(|e| format!("invalid tab: {}", e))?,
                ),
                _ => None,
            };
            let host = RequestTabHost {
                tab,
                ..Default::default()
            };
            let bookmark = app.capture(&host).await.map_err(|e| e.to_string())?;
            Ok(json!({"bookmark": to_json(&bookmark)?, "view": to_json(&app.view())?}))
        }
        "bookmark.update" => {
            let id = str_param(params, "id")?;
            let url = str_param(params, "url")?;
            let title = params.get("title").and_then(|v| v.as_str()).unwrap_or("");
            let updated = app
                .save_edit(id, url, title)
                .await
                .map_err(|e| e.to_string())?;
            Ok(json!({"updated": updated}))
        }
        "bookmark.delete" => {
            let id = str_param(params, "id")?;
            let deleted = app.delete(id).await.map_err(|e| e.to_string())?;
            Ok(json!({"deleted": deleted}))
        }
        "bookmark.open" => {
            let id = str_param(params, "id")?;
            let background = params
                .get("background")
                .and_then(|v| v.as_bool())
                .unwrap_or(false);
            let mut host = RequestTabHost::default();
            app.open(&mut host, id, background)
                .map_err(|e| e.to_string())?;
            let (url, active) = host.opened.pop().ok_or("open request was not recorded")?;
            Ok(json!({"url": url, "active": active}))
        }

        // ─── Import / export ───
        "csv.import" => {
            if let Some(reason) = params.get("read_error").and_then(|v| v.as_str()) {
                return Err(ImportError::FileReadFailed(reason.to_string()).to_string());
            }
            let csv = params.get("csv").and_then(|v| v.as_str());
            let count = app.import_csv(csv).await.map_err(|e| e.to_string())?;
            Ok(json!({"count": count, "message": import_status(count)}))
        }
        "csv.export" => {
            let file = app.export_csv().map_err(|e| e.to_string())?;
            Ok(json!({
                "filename": file.filename,
                "contents": file.contents,
                "count": file.count,
                "message": export_status(file.count),
            }))
        }
        "stats" => {
            let stats = app.stats();
            Ok(json!({"total": stats.total, "oldest": stats.oldest_text()}))
        }

        // ─── Settings ───
        "settings.get" => to_json(settings_engine.get_settings()),
        "settings.set" => {
            let key = str_param(params, "key")?;
            let value = params.get("value").cloned().ok_or("missing value")?;
            settings_engine
                .set_value(key, value)
                .map_err(|e| e.to_string())?;
            app.apply_settings(settings_engine.get_settings().clone());
            to_json(settings_engine.get_settings())
        }
        "settings.reset" => {
            settings_engine.reset().map_err(|e| e.to_string())?;
            app.apply_settings(settings_engine.get_settings().clone());
            to_json(settings_engine.get_settings())
        }

        _ => Err(format!("unknown method: {}", method)),
    }
}
