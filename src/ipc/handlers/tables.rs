use serde_json::{json, Value};

use crate::calc;
use crate::ipc::error::{backend_err, err, item_ok, list_ok, miss_ok, service_err};
use crate::ipc::helpers::{
    opt_str, opt_typed, opt_u64, raw_json, required_id, required_str, ListOptions,
};
use crate::ipc::types::{AppState, Request};
use crate::store::{DiningTable, ServiceError, TableState};

fn handle_list(state: &AppState, req: &Request) -> Value {
    let opts = ListOptions::parse(&req.params);
    let wanted_state = opt_str(&req.params, "state");

    let mut rows: Vec<Value> = state
        .store
        .tables
        .iter()
        .filter(|t| opts.matches_search(&[&t.name, t.note.as_deref().unwrap_or("")]))
        .filter(|t| {
            wanted_state.as_deref().map_or(true, |want| {
                calc::normalize(want) == calc::normalize(t.state.as_str())
            })
        })
        .map(raw_json)
        .collect();
    calc::sort_records(&mut rows, opts.sort_by.as_deref(), opts.sort_direction, "name");
    let (data, meta) = calc::paginate(&rows, opts.page, opts.size);
    list_ok(&req.id, data, &meta)
}

fn handle_get(state: &AppState, req: &Request) -> Value {
    let id = match required_id(req, "id") {
        Ok(v) => v,
        Err(e) => return e,
    };
    match state.store.tables.iter().find(|t| t.id == id) {
        Some(t) => item_ok(&req.id, raw_json(t)),
        None => miss_ok(&req.id),
    }
}

fn handle_create(state: &mut AppState, req: &Request) -> Value {
    let name = match required_str(req, "name") {
        Ok(v) => v,
        Err(e) => return e,
    };
    let table_state = match opt_typed::<TableState>(req, "state") {
        Ok(v) => v.unwrap_or(TableState::Available),
        Err(e) => return e,
    };
    let table = DiningTable {
        id: state.store.table_ids.next(),
        name,
        seats: opt_u64(&req.params, "seats").unwrap_or(4) as u32,
        state: table_state,
        note: opt_str(&req.params, "note"),
    };
    state.store.tables.push(table.clone());
    item_ok(&req.id, raw_json(&table))
}

fn handle_update(state: &mut AppState, req: &Request) -> Value {
    let id = match required_id(req, "id") {
        Ok(v) => v,
        Err(e) => return e,
    };
    let next_state = match opt_typed::<TableState>(req, "state") {
        Ok(v) => v,
        Err(e) => return e,
    };
    let p = req.params.clone();

    let Some(t) = state.store.tables.iter_mut().find(|t| t.id == id) else {
        return service_err(&req.id, &ServiceError::not_found("table", id));
    };
    if let Some(next) = next_state {
        if !t.state.can_move_to(next) {
            return service_err(
                &req.id,
                &ServiceError::bad_transition("table", t.state.as_str(), next.as_str()),
            );
        }
        t.state = next;
    }
    if let Some(v) = opt_str(&p, "name") {
        t.name = v;
    }
    if let Some(v) = opt_u64(&p, "seats") {
        t.seats = v as u32;
    }
    if p.get("note").is_some() {
        t.note = opt_str(&p, "note");
    }
    item_ok(&req.id, raw_json(&t.clone()))
}

fn handle_delete(state: &mut AppState, req: &Request) -> Value {
    let id = match required_id(req, "id") {
        Ok(v) => v,
        Err(e) => return e,
    };
    let Some(pos) = state.store.tables.iter().position(|t| t.id == id) else {
        return service_err(&req.id, &ServiceError::not_found("table", id));
    };
    let removed = state.store.tables.remove(pos);
    item_ok(&req.id, raw_json(&removed))
}

/// Order submission goes to the real backend, not the mock store. The table
/// must exist locally; the order body is forwarded as-is.
fn handle_order_submit(state: &mut AppState, req: &Request) -> Value {
    let table_id = match required_id(req, "tableId") {
        Ok(v) => v,
        Err(e) => return e,
    };
    if !state.store.tables.iter().any(|t| t.id == table_id) {
        return service_err(&req.id, &ServiceError::not_found("table", table_id));
    }
    let Some(backend) = state.backend.as_ref() else {
        return err(
            &req.id,
            "backend_unconfigured",
            "no backend configured; call backend.configure first",
            None,
        );
    };
    let body = json!({
        "tableId": table_id,
        "items": req.params.get("items").cloned().unwrap_or_else(|| json!([])),
        "note": req.params.get("note").cloned().unwrap_or(Value::Null),
    });
    match backend.submit_order(&body) {
        Ok(resp) => item_ok(&req.id, resp),
        Err(e) => backend_err(&req.id, &e),
    }
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<Value> {
    match req.method.as_str() {
        "tables.list" => Some(handle_list(state, req)),
        "tables.get" => Some(handle_get(state, req)),
        "tables.create" => Some(handle_create(state, req)),
        "tables.update" => Some(handle_update(state, req)),
        "tables.delete" => Some(handle_delete(state, req)),
        "orders.submit" => Some(handle_order_submit(state, req)),
        _ => None,
    }
}
