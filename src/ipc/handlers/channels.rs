use serde_json::{json, Value};

use crate::calc;
use crate::enrich;
use crate::ipc::error::{item_ok, list_ok, miss_ok, ok, service_err};
use crate::ipc::helpers::{
    opt_str, opt_typed, raw_json, required_id, required_str, ListOptions,
};
use crate::ipc::types::{AppState, Request};
use crate::store::{ActiveStatus, Channel, ChannelType, MonthlyMetrics, ServiceError};

fn handle_list(state: &AppState, req: &Request) -> Value {
    let opts = ListOptions::parse(&req.params);
    let wanted_type = opt_str(&req.params, "channelType");

    let mut rows: Vec<Value> = state
        .store
        .channels
        .iter()
        .filter(|c| opts.matches_search(&[&c.name, c.owner.as_deref().unwrap_or("")]))
        .filter(|c| opts.status_matches(c.status.as_str()))
        .filter(|c| {
            wanted_type.as_deref().map_or(true, |want| {
                raw_json(&c.channel_type)
                    .as_str()
                    .map_or(false, |have| calc::normalize(have) == calc::normalize(want))
            })
        })
        .map(raw_json)
        .collect();
    calc::sort_records(&mut rows, opts.sort_by.as_deref(), opts.sort_direction, "name");
    let (mut data, meta) = calc::paginate(&rows, opts.page, opts.size);
    for row in &mut data {
        enrich::channel(row);
    }
    list_ok(&req.id, data, &meta)
}

fn handle_get(state: &AppState, req: &Request) -> Value {
    let id = match required_id(req, "id") {
        Ok(v) => v,
        Err(e) => return e,
    };
    match state.store.channels.iter().find(|c| c.id == id) {
        Some(c) => {
            let mut row = raw_json(c);
            enrich::channel(&mut row);
            item_ok(&req.id, row)
        }
        None => miss_ok(&req.id),
    }
}

fn handle_create(state: &mut AppState, req: &Request) -> Value {
    let name = match required_str(req, "name") {
        Ok(v) => v,
        Err(e) => return e,
    };
    let channel_type = match opt_typed::<ChannelType>(req, "channelType") {
        Ok(v) => v.unwrap_or(ChannelType::OnlineAds),
        Err(e) => return e,
    };
    let status = match opt_typed::<ActiveStatus>(req, "status") {
        Ok(v) => v.unwrap_or(ActiveStatus::Active),
        Err(e) => return e,
    };
    let monthly_stats = match opt_typed::<Vec<MonthlyMetrics>>(req, "monthlyStats") {
        Ok(v) => v.unwrap_or_default(),
        Err(e) => return e,
    };
    let channel = Channel {
        id: state.store.channel_ids.next(),
        name,
        channel_type,
        status,
        owner: opt_str(&req.params, "owner"),
        monthly_stats,
    };
    state.store.channels.push(channel.clone());
    let mut row = raw_json(&channel);
    enrich::channel(&mut row);
    item_ok(&req.id, row)
}

fn handle_update(state: &mut AppState, req: &Request) -> Value {
    let id = match required_id(req, "id") {
        Ok(v) => v,
        Err(e) => return e,
    };
    let channel_type = match opt_typed::<ChannelType>(req, "channelType") {
        Ok(v) => v,
        Err(e) => return e,
    };
    let status = match opt_typed::<ActiveStatus>(req, "status") {
        Ok(v) => v,
        Err(e) => return e,
    };
    let monthly_stats = match opt_typed::<Vec<MonthlyMetrics>>(req, "monthlyStats") {
        Ok(v) => v,
        Err(e) => return e,
    };
    let p = req.params.clone();

    let Some(c) = state.store.channels.iter_mut().find(|c| c.id == id) else {
        return service_err(&req.id, &ServiceError::not_found("channel", id));
    };
    if let Some(v) = opt_str(&p, "name") {
        c.name = v;
    }
    if let Some(v) = channel_type {
        c.channel_type = v;
    }
    if let Some(v) = status {
        c.status = v;
    }
    if p.get("owner").is_some() {
        c.owner = opt_str(&p, "owner");
    }
    if let Some(v) = monthly_stats {
        c.monthly_stats = v;
    }
    let snapshot = c.clone();
    let mut row = raw_json(&snapshot);
    enrich::channel(&mut row);
    item_ok(&req.id, row)
}

fn handle_delete(state: &mut AppState, req: &Request) -> Value {
    let id = match required_id(req, "id") {
        Ok(v) => v,
        Err(e) => return e,
    };
    let Some(pos) = state.store.channels.iter().position(|c| c.id == id) else {
        return service_err(&req.id, &ServiceError::not_found("channel", id));
    };
    let removed = state.store.channels.remove(pos);
    let mut row = raw_json(&removed);
    enrich::channel(&mut row);
    item_ok(&req.id, row)
}

/// Per-channel aggregated stats plus an all-channels totals row.
fn handle_summary(state: &AppState, req: &Request) -> Value {
    let mut rows: Vec<Value> = Vec::new();
    let mut grand = calc::MetricTotals::default();
    for c in &state.store.channels {
        let totals = calc::aggregate_metrics(&c.monthly_stats);
        grand.spend += totals.spend;
        grand.leads += totals.leads;
        grand.new_students += totals.new_students;
        grand.revenue += totals.revenue;
        grand.profit += totals.profit;
        rows.push(json!({
            "id": c.id,
            "name": c.name,
            "status": c.status.as_str(),
            "totals": totals,
            "roi": calc::roi(totals.revenue, totals.spend),
        }));
    }
    ok(
        &req.id,
        json!({
            "data": {
                "channels": rows,
                "totals": grand,
                "overallRoi": calc::roi(grand.revenue, grand.spend),
            },
            "metadata": Value::Null
        }),
    )
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<Value> {
    match req.method.as_str() {
        "channels.list" => Some(handle_list(state, req)),
        "channels.get" => Some(handle_get(state, req)),
        "channels.create" => Some(handle_create(state, req)),
        "channels.update" => Some(handle_update(state, req)),
        "channels.delete" => Some(handle_delete(state, req)),
        "channels.summary" => Some(handle_summary(state, req)),
        _ => None,
    }
}
