use serde_json::{json, Value};

use crate::calc;
use crate::enrich::{self, NameIndex};
use crate::ipc::error::{item_ok, list_ok, miss_ok, ok, service_err};
use crate::ipc::helpers::{
    opt_f64, opt_id_list, opt_str, opt_typed, raw_json, required_id, required_str, ListOptions,
};
use crate::ipc::types::{AppState, Request};
use crate::store::{ActiveStatus, ServiceError, StaffMember, StaffRole};

fn handle_list(state: &AppState, req: &Request) -> Value {
    let opts = ListOptions::parse(&req.params);
    let role = opt_str(&req.params, "role");
    let department = opt_str(&req.params, "department");

    let mut rows: Vec<Value> = state
        .store
        .staff
        .iter()
        .filter(|s| opts.matches_search(&[&s.full_name, &s.code]))
        .filter(|s| opts.status_matches(s.status.as_str()))
        .filter(|s| {
            role.as_deref().map_or(true, |want| {
                raw_json(&s.role)
                    .as_str()
                    .map_or(false, |have| calc::normalize(have) == calc::normalize(want))
            })
        })
        .filter(|s| {
            department.as_deref().map_or(true, |want| {
                s.department
                    .as_deref()
                    .map_or(false, |have| calc::normalize(have) == calc::normalize(want))
            })
        })
        .map(raw_json)
        .collect();
    calc::sort_records(
        &mut rows,
        opts.sort_by.as_deref(),
        opts.sort_direction,
        "fullName",
    );
    let (mut data, meta) = calc::paginate(&rows, opts.page, opts.size);
    let idx = NameIndex::build(&state.store);
    for row in &mut data {
        enrich::staff(row, &idx);
    }
    list_ok(&req.id, data, &meta)
}

fn handle_get(state: &AppState, req: &Request) -> Value {
    let id = match required_id(req, "id") {
        Ok(v) => v,
        Err(e) => return e,
    };
    match state.store.staff.iter().find(|s| s.id == id) {
        Some(s) => {
            let mut row = raw_json(s);
            enrich::staff(&mut row, &NameIndex::build(&state.store));
            item_ok(&req.id, row)
        }
        None => miss_ok(&req.id),
    }
}

fn handle_create(state: &mut AppState, req: &Request) -> Value {
    let full_name = match required_str(req, "fullName") {
        Ok(v) => v,
        Err(e) => return e,
    };
    let role = match opt_typed::<StaffRole>(req, "role") {
        Ok(v) => v.unwrap_or(StaffRole::Sales),
        Err(e) => return e,
    };
    let status = match opt_typed::<ActiveStatus>(req, "status") {
        Ok(v) => v.unwrap_or(ActiveStatus::Active),
        Err(e) => return e,
    };
    let p = &req.params;
    let id = state.store.staff_ids.next();
    let member = StaffMember {
        id,
        code: opt_str(p, "code").unwrap_or_else(|| format!("NV{id:03}")),
        full_name,
        role,
        department: opt_str(p, "department"),
        status,
        campaign_ids: opt_id_list(p, "campaignIds").unwrap_or_default(),
        kpi_score: opt_f64(p, "kpiScore").unwrap_or(0.0),
    };
    state.store.staff.push(member.clone());
    let mut row = raw_json(&member);
    enrich::staff(&mut row, &NameIndex::build(&state.store));
    item_ok(&req.id, row)
}

fn handle_update(state: &mut AppState, req: &Request) -> Value {
    let id = match required_id(req, "id") {
        Ok(v) => v,
        Err(e) => return e,
    };
    let role = match opt_typed::<StaffRole>(req, "role") {
        Ok(v) => v,
        Err(e) => return e,
    };
    let status = match opt_typed::<ActiveStatus>(req, "status") {
        Ok(v) => v,
        Err(e) => return e,
    };
    let p = req.params.clone();

    let Some(s) = state.store.staff.iter_mut().find(|s| s.id == id) else {
        return service_err(&req.id, &ServiceError::not_found("staff member", id));
    };
    if let Some(v) = opt_str(&p, "fullName") {
        s.full_name = v;
    }
    if let Some(v) = opt_str(&p, "code") {
        s.code = v;
    }
    if let Some(v) = role {
        s.role = v;
    }
    if let Some(v) = status {
        s.status = v;
    }
    if p.get("department").is_some() {
        s.department = opt_str(&p, "department");
    }
    if let Some(v) = opt_id_list(&p, "campaignIds") {
        s.campaign_ids = v;
    }
    if let Some(v) = opt_f64(&p, "kpiScore") {
        s.kpi_score = v;
    }
    let snapshot = s.clone();
    let mut row = raw_json(&snapshot);
    enrich::staff(&mut row, &NameIndex::build(&state.store));
    item_ok(&req.id, row)
}

fn handle_delete(state: &mut AppState, req: &Request) -> Value {
    let id = match required_id(req, "id") {
        Ok(v) => v,
        Err(e) => return e,
    };
    let Some(pos) = state.store.staff.iter().position(|s| s.id == id) else {
        return service_err(&req.id, &ServiceError::not_found("staff member", id));
    };
    let removed = state.store.staff.remove(pos);
    let mut row = raw_json(&removed);
    enrich::staff(&mut row, &NameIndex::build(&state.store));
    item_ok(&req.id, row)
}

/// Top-3 staff by kpi score, whole collection.
fn handle_top_performers(state: &AppState, req: &Request) -> Value {
    let mut ranked: Vec<Value> = state
        .store
        .staff
        .iter()
        .map(|s| {
            json!({
                "id": s.id,
                "code": s.code,
                "fullName": s.full_name,
                "kpiScore": s.kpi_score,
            })
        })
        .collect();
    calc::sort_records(
        &mut ranked,
        Some("kpiScore"),
        calc::SortDirection::Desc,
        "kpiScore",
    );
    ranked.truncate(3);
    ok(
        &req.id,
        json!({ "data": ranked, "metadata": Value::Null }),
    )
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<Value> {
    match req.method.as_str() {
        "staff.list" => Some(handle_list(state, req)),
        "staff.get" => Some(handle_get(state, req)),
        "staff.create" => Some(handle_create(state, req)),
        "staff.update" => Some(handle_update(state, req)),
        "staff.delete" => Some(handle_delete(state, req)),
        "staff.topPerformers" => Some(handle_top_performers(state, req)),
        _ => None,
    }
}
