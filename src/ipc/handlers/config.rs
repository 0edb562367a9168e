use serde_json::Value;

use crate::backend::BackendClient;
use crate::ipc::error::{backend_err, err, item_ok};
use crate::ipc::types::{AppState, Request};

fn client<'a>(state: &'a AppState, req: &Request) -> Result<&'a BackendClient, Value> {
    state.backend.as_ref().ok_or_else(|| {
        err(
            &req.id,
            "backend_unconfigured",
            "no backend configured; call backend.configure first",
            None,
        )
    })
}

fn handle_list(state: &AppState, req: &Request) -> Value {
    let backend = match client(state, req) {
        Ok(v) => v,
        Err(e) => return e,
    };
    match backend.get_configs() {
        Ok(v) => item_ok(&req.id, v),
        Err(e) => backend_err(&req.id, &e),
    }
}

fn handle_get(state: &AppState, req: &Request) -> Value {
    let backend = match client(state, req) {
        Ok(v) => v,
        Err(e) => return e,
    };
    let key = match crate::ipc::helpers::required_str(req, "key") {
        Ok(v) => v,
        Err(e) => return e,
    };
    match backend.get_config(&key) {
        Ok(v) => item_ok(&req.id, v),
        Err(e) => backend_err(&req.id, &e),
    }
}

fn handle_update(state: &AppState, req: &Request) -> Value {
    let backend = match client(state, req) {
        Ok(v) => v,
        Err(e) => return e,
    };
    let key = match crate::ipc::helpers::required_str(req, "key") {
        Ok(v) => v,
        Err(e) => return e,
    };
    let body = req.params.get("value").cloned().unwrap_or(Value::Null);
    match backend.put_config(&key, &body) {
        Ok(v) => item_ok(&req.id, v),
        Err(e) => backend_err(&req.id, &e),
    }
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<Value> {
    match req.method.as_str() {
        "config.list" => Some(handle_list(state, req)),
        "config.get" => Some(handle_get(state, req)),
        "config.update" => Some(handle_update(state, req)),
        _ => None,
    }
}
