//! Method dispatcher for the QR Nexus IPC protocol.
//!
//! The presentation layer sends `{method, params}` objects over the web-view
//! IPC channel; `handle_method` routes each call to the history
//! repositories, the payload builder and the settings via the `App` struct.

use std::sync::Mutex;

use serde_json::{json, Value};

use crate::app::App;
use crate::managers::history_manager::HistoryManagerTrait;
use crate::services::payload::{build_payload, classify};
use crate::services::settings_engine::SettingsEngineTrait;
use crate::services::theme_engine::ThemeEngineTrait;
use crate::types::generate::GenerationInput;
use crate::types::history::{HistoryList, RecordKind};

fn str_param<'a>(params: &'a Value, name: &str) -> Result<&'a str, String> {
    params
        .get(name)
        .and_then(|v| v.as_str())
        .ok_or_else(|| format!("missing {}", name))
}

fn generation_input(params: &Value) -> Result<GenerationInput, String> {
    let input = params.get("input").cloned().ok_or("missing input")?;
    serde_json::from_value(input).map_err(|e| format!("invalid input: {}", e))
}

/// Dispatches `<list>.<op>` calls shared by both history lists.
fn handle_history(app: &Mutex<App>, list: HistoryList, op: &str, params: &Value) -> Result<Value, String> {
    let a = app.lock().map_err(|e| e.to_string())?;
    let history = a.history(list);
    match op {
        "list" => {
            let records = history.list().map_err(|e| e.to_string())?;
            Ok(json!(records))
        }
        "pinned" => {
            let records = history.list_pinned().map_err(|e| e.to_string())?;
            Ok(json!(records))
        }
        "delete" => {
            let id = str_param(params, "id")?;
            history.remove(id).map_err(|e| e.to_string())?;
            Ok(json!({"ok": true}))
        }
        "toggle_favorite" => {
            let id = str_param(params, "id")?;
            let favorite = history.toggle_favorite(id).map_err(|e| e.to_string())?;
            Ok(json!({"id": id, "favorite": favorite}))
        }
        "clear" => {
            drop(history);
            a.clear_history(list).map_err(|e| e.to_string())?;
            Ok(json!({"ok": true}))
        }
        _ => Err(format!("unknown method: {}.{}", list.storage_key(), op)),
    }
}

/// Dispatch a method call to the appropriate handler.
///
/// Returns `Ok(Value)` on success or `Err(String)` with an error message.
pub fn handle_method(app: &Mutex<App>, method: &str, params: &Value) -> Result<Value, String> {
    match method {
        "ping" => Ok(json!({"pong": true})),

        // ─── Scans ───
        "scans.record" => {
            let payload = str_param(params, "payload")?;
            if payload.is_empty() {
                return Err("empty payload".to_string());
            }
            let a = app.lock().map_err(|e| e.to_string())?;
            let outcome = a.record_camera_scan(payload).map_err(|e| e.to_string())?;
            serde_json::to_value(outcome).map_err(|e| e.to_string())
        }

        // ─── Generated ───
        "generated.save" => {
            let input = generation_input(params)?;
            let a = app.lock().map_err(|e| e.to_string())?;
            let record = a.save_generated(&input).map_err(|e| e.to_string())?;
            Ok(json!({"saved": record.is_some(), "record": record}))
        }

        // ─── Payloads ───
        "generate.payload" => {
            let input = generation_input(params)?;
            Ok(json!({"payload": build_payload(&input), "type": input.kind()}))
        }
        "classify" => {
            let payload = str_param(params, "payload")?;
            let kind: RecordKind = classify(payload);
            Ok(json!({"type": kind}))
        }

        // ─── Settings ───
        "settings.get" => {
            let a = app.lock().map_err(|e| e.to_string())?;
            serde_json::to_value(a.settings_engine.get_settings()).map_err(|e| e.to_string())
        }
        "settings.toggle_theme" => {
            let mut a = app.lock().map_err(|e| e.to_string())?;
            let theme = a.toggle_theme().map_err(|e| e.to_string())?;
            Ok(json!({"theme": theme}))
        }
        "settings.toggle_haptics" => {
            let mut a = app.lock().map_err(|e| e.to_string())?;
            let enabled = a.toggle_haptics().map_err(|e| e.to_string())?;
            Ok(json!({"haptics_enabled": enabled}))
        }
        "theme.colors" => {
            let a = app.lock().map_err(|e| e.to_string())?;
            Ok(json!({
                "theme": a.theme_engine.get_theme(),
                "colors": a.theme_engine.colors(),
                "qr": a.theme_engine.qr_colors(),
            }))
        }

        _ => match method.split_once('.') {
            Some(("scans", op)) => handle_history(app, HistoryList::Scanned, op, params),
            Some(("generated", op)) => handle_history(app, HistoryList::Generated, op, params),
            _ => Err(format!("unknown method: {}", method)),
        },
    }
}
