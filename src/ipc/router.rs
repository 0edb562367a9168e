use super::handlers;
use super::types::{AppState, Request};
use crate::ipc::error::err;

pub fn handle_request(state: &mut AppState, req: Request) -> serde_json::Value {
    // Simulated backend latency, applied uniformly before dispatch.
    if !state.latency.is_zero() {
        std::thread::sleep(state.latency);
    }
    tracing::debug!(method = %req.method, "dispatch");

    if let Some(resp) = handlers::core::try_handle(state, &req) {
        return resp;
    }
    if let Some(resp) = handlers::campaigns::try_handle(state, &req) {
        return resp;
    }
    if let Some(resp) = handlers::channels::try_handle(state, &req) {
        return resp;
    }
    if let Some(resp) = handlers::leads::try_handle(state, &req) {
        return resp;
    }
    if let Some(resp) = handlers::students::try_handle(state, &req) {
        return resp;
    }
    if let Some(resp) = handlers::staff::try_handle(state, &req) {
        return resp;
    }
    if let Some(resp) = handlers::revenue::try_handle(state, &req) {
        return resp;
    }
    if let Some(resp) = handlers::menu::try_handle(state, &req) {
        return resp;
    }
    if let Some(resp) = handlers::tables::try_handle(state, &req) {
        return resp;
    }
    if let Some(resp) = handlers::config::try_handle(state, &req) {
        return resp;
    }
    if let Some(resp) = handlers::statistics::try_handle(state, &req) {
        return resp;
    }
    if let Some(resp) = handlers::reports::try_handle(state, &req) {
        return resp;
    }

    err(
        &req.id,
        "not_implemented",
        format!("unknown method: {}", req.method),
        None,
    )
}
