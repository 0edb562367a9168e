use serde_json::json;

use crate::backend::BackendClient;
use crate::ipc::error::{err, ok};
use crate::ipc::helpers::{opt_bool, required_str};
use crate::ipc::types::{AppState, Request};
use crate::store::Store;

fn handle_health(state: &mut AppState, req: &Request) -> serde_json::Value {
    ok(
        &req.id,
        json!({
            "version": env!("CARGO_PKG_VERSION"),
            "backendConfigured": state.backend.is_some(),
            "latencyMs": state.latency.as_millis() as u64,
        }),
    )
}

fn handle_backend_configure(state: &mut AppState, req: &Request) -> serde_json::Value {
    let base_url = match required_str(req, "baseUrl") {
        Ok(v) => v,
        Err(e) => return e,
    };
    let token = crate::ipc::helpers::opt_str(&req.params, "token").unwrap_or_default();
    match BackendClient::new(base_url.clone(), token) {
        Ok(client) => {
            state.backend = Some(client);
            ok(&req.id, json!({ "baseUrl": base_url }))
        }
        Err(e) => err(&req.id, "bad_params", e.to_string(), None),
    }
}

/// Swaps the whole dataset. `seed: false` gives tests a blank store.
fn handle_store_reset(state: &mut AppState, req: &Request) -> serde_json::Value {
    let seed = opt_bool(&req.params, "seed").unwrap_or(true);
    state.store = if seed { Store::seeded() } else { Store::empty() };
    ok(
        &req.id,
        json!({
            "seeded": seed,
            "counts": {
                "campaigns": state.store.campaigns.len(),
                "channels": state.store.channels.len(),
                "leads": state.store.leads.len(),
                "students": state.store.students.len(),
                "staff": state.store.staff.len(),
                "revenue": state.store.revenue.len(),
                "tables": state.store.tables.len(),
                "foods": state.store.foods.len(),
                "categories": state.store.categories.len(),
            }
        }),
    )
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "health" => Some(handle_health(state, req)),
        "backend.configure" => Some(handle_backend_configure(state, req)),
        "store.reset" => Some(handle_store_reset(state, req)),
        _ => None,
    }
}
