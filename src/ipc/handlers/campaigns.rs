use serde_json::{json, Value};
use std::collections::BTreeMap;

use crate::calc;
use crate::enrich::{self, NameIndex};
use crate::ipc::error::{item_ok, list_ok, miss_ok, ok, service_err};
use crate::ipc::helpers::{
    now_stamp, opt_f64, opt_id_list, opt_str, opt_str_list, opt_typed, opt_u64, raw_json,
    required_id, required_str, ListOptions,
};
use crate::ipc::types::{AppState, Request};
use crate::store::{Campaign, CampaignStatus, MonthlyMetrics, ServiceError};

fn handle_list(state: &AppState, req: &Request) -> Value {
    let opts = ListOptions::parse(&req.params);
    let staff_id = opt_u64(&req.params, "staffId");
    let channel_id = opt_u64(&req.params, "channelId");

    let mut rows: Vec<Value> = state
        .store
        .campaigns
        .iter()
        .filter(|c| {
            calc::overlaps_timeframe(
                calc::parse_date(c.start_date.as_deref()),
                calc::parse_date(c.end_date.as_deref()),
                opts.timeframe_start,
                opts.timeframe_end,
            )
        })
        .filter(|c| opts.matches_search(&[&c.name, &c.code]))
        .filter(|c| opts.status_matches(c.status.as_str()))
        .filter(|c| staff_id.map_or(true, |id| c.staff_id == Some(id)))
        .filter(|c| channel_id.map_or(true, |id| c.channel_ids.contains(&id)))
        .map(raw_json)
        .collect();
    calc::sort_records(
        &mut rows,
        opts.sort_by.as_deref(),
        opts.sort_direction,
        "startDate",
    );
    let (mut data, meta) = calc::paginate(&rows, opts.page, opts.size);
    let idx = NameIndex::build(&state.store);
    for row in &mut data {
        enrich::campaign(row, &idx);
    }
    list_ok(&req.id, data, &meta)
}

fn handle_get(state: &AppState, req: &Request) -> Value {
    let id = match required_id(req, "id") {
        Ok(v) => v,
        Err(e) => return e,
    };
    match state.store.campaigns.iter().find(|c| c.id == id) {
        Some(c) => {
            let mut row = raw_json(c);
            enrich::campaign(&mut row, &NameIndex::build(&state.store));
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
    let status = match opt_typed::<CampaignStatus>(req, "status") {
        Ok(v) => v.unwrap_or(CampaignStatus::Planning),
        Err(e) => return e,
    };
    let metrics_history = match opt_typed::<Vec<MonthlyMetrics>>(req, "metricsHistory") {
        Ok(v) => v.unwrap_or_default(),
        Err(e) => return e,
    };
    let p = &req.params;
    let now = now_stamp();
    let id = state.store.campaign_ids.next();
    let campaign = Campaign {
        id,
        name,
        code: opt_str(p, "code").unwrap_or_else(|| format!("CMP-{id:03}")),
        status,
        start_date: opt_str(p, "startDate"),
        end_date: opt_str(p, "endDate"),
        channel_ids: opt_id_list(p, "channelIds").unwrap_or_default(),
        budget: opt_f64(p, "budget").unwrap_or(0.0),
        actual_cost: opt_f64(p, "actualCost").unwrap_or(0.0),
        expected_revenue: opt_f64(p, "expectedRevenue").unwrap_or(0.0),
        actual_revenue: opt_f64(p, "actualRevenue").unwrap_or(0.0),
        lead_count: opt_u64(p, "leadCount").unwrap_or(0),
        new_student_count: opt_u64(p, "newStudentCount").unwrap_or(0),
        staff_id: opt_u64(p, "staffId"),
        tags: opt_str_list(p, "tags").unwrap_or_default(),
        metrics_history,
        created_at: now.clone(),
        updated_at: now,
    };
    state.store.campaigns.push(campaign.clone());
    let mut row = raw_json(&campaign);
    enrich::campaign(&mut row, &NameIndex::build(&state.store));
    item_ok(&req.id, row)
}

fn handle_update(state: &mut AppState, req: &Request) -> Value {
    let id = match required_id(req, "id") {
        Ok(v) => v,
        Err(e) => return e,
    };
    let next_status = match opt_typed::<CampaignStatus>(req, "status") {
        Ok(v) => v,
        Err(e) => return e,
    };
    let metrics_history = match opt_typed::<Vec<MonthlyMetrics>>(req, "metricsHistory") {
        Ok(v) => v,
        Err(e) => return e,
    };
    let p = req.params.clone();

    let Some(c) = state.store.campaigns.iter_mut().find(|c| c.id == id) else {
        return service_err(&req.id, &ServiceError::not_found("campaign", id));
    };
    if let Some(next) = next_status {
        if !c.status.can_move_to(next) {
            return service_err(
                &req.id,
                &ServiceError::bad_transition("campaign", c.status.as_str(), next.as_str()),
            );
        }
        c.status = next;
    }
    if let Some(v) = opt_str(&p, "name") {
        c.name = v;
    }
    if let Some(v) = opt_str(&p, "code") {
        c.code = v;
    }
    // Nullable fields: a present null clears, absence leaves untouched.
    if p.get("startDate").is_some() {
        c.start_date = opt_str(&p, "startDate");
    }
    if p.get("endDate").is_some() {
        c.end_date = opt_str(&p, "endDate");
    }
    if p.get("staffId").is_some() {
        c.staff_id = opt_u64(&p, "staffId");
    }
    if let Some(v) = opt_id_list(&p, "channelIds") {
        c.channel_ids = v;
    }
    if let Some(v) = opt_str_list(&p, "tags") {
        c.tags = v;
    }
    if let Some(v) = metrics_history {
        c.metrics_history = v;
    }
    if let Some(v) = opt_f64(&p, "budget") {
        c.budget = v;
    }
    if let Some(v) = opt_f64(&p, "actualCost") {
        c.actual_cost = v;
    }
    if let Some(v) = opt_f64(&p, "expectedRevenue") {
        c.expected_revenue = v;
    }
    if let Some(v) = opt_f64(&p, "actualRevenue") {
        c.actual_revenue = v;
    }
    if let Some(v) = opt_u64(&p, "leadCount") {
        c.lead_count = v;
    }
    if let Some(v) = opt_u64(&p, "newStudentCount") {
        c.new_student_count = v;
    }
    c.updated_at = now_stamp();

    let snapshot = c.clone();
    let mut row = raw_json(&snapshot);
    enrich::campaign(&mut row, &NameIndex::build(&state.store));
    item_ok(&req.id, row)
}

fn handle_delete(state: &mut AppState, req: &Request) -> Value {
    let id = match required_id(req, "id") {
        Ok(v) => v,
        Err(e) => return e,
    };
    let Some(pos) = state.store.campaigns.iter().position(|c| c.id == id) else {
        return service_err(&req.id, &ServiceError::not_found("campaign", id));
    };
    let removed = state.store.campaigns.remove(pos);
    let mut row = raw_json(&removed);
    enrich::campaign(&mut row, &NameIndex::build(&state.store));
    item_ok(&req.id, row)
}

/// Whole-collection reduction: counts by status, spend/revenue totals and a
/// top-3 ranking by roi.
fn handle_summary(state: &AppState, req: &Request) -> Value {
    let mut by_status: BTreeMap<&'static str, u64> = BTreeMap::new();
    let mut total_budget = 0.0;
    let mut total_cost = 0.0;
    let mut total_revenue = 0.0;
    let mut ranked: Vec<Value> = Vec::new();

    for c in &state.store.campaigns {
        *by_status.entry(c.status.as_str()).or_insert(0) += 1;
        total_budget += c.budget;
        total_cost += c.actual_cost;
        total_revenue += c.actual_revenue;
        ranked.push(json!({
            "id": c.id,
            "name": c.name,
            "roi": calc::roi(c.actual_revenue, c.actual_cost),
            "profit": calc::profit(c.actual_revenue, c.actual_cost),
        }));
    }
    calc::sort_records(&mut ranked, Some("roi"), calc::SortDirection::Desc, "roi");
    ranked.truncate(3);

    ok(
        &req.id,
        json!({
            "data": {
                "total": state.store.campaigns.len(),
                "byStatus": by_status,
                "totalBudget": total_budget,
                "totalActualCost": total_cost,
                "totalActualRevenue": total_revenue,
                "overallRoi": calc::roi(total_revenue, total_cost),
                "topByRoi": ranked,
            },
            "metadata": Value::Null
        }),
    )
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<Value> {
    match req.method.as_str() {
        "campaigns.list" => Some(handle_list(state, req)),
        "campaigns.get" => Some(handle_get(state, req)),
        "campaigns.create" => Some(handle_create(state, req)),
        "campaigns.update" => Some(handle_update(state, req)),
        "campaigns.delete" => Some(handle_delete(state, req)),
        "campaigns.summary" => Some(handle_summary(state, req)),
        _ => None,
    }
}
