use serde_json::{json, Value};
use std::collections::BTreeMap;

use crate::calc;
use crate::enrich::{self, NameIndex};
use crate::ipc::error::{item_ok, list_ok, miss_ok, ok, service_err};
use crate::ipc::helpers::{
    now_stamp, opt_str, opt_str_list, opt_typed, opt_u64, raw_json, required_id, required_str,
    ListOptions,
};
use crate::ipc::types::{AppState, Request};
use crate::store::{InterestLevel, Lead, LeadStatus, ServiceError};

fn handle_list(state: &AppState, req: &Request) -> Value {
    let opts = ListOptions::parse(&req.params);
    let p = &req.params;
    let channel_id = opt_u64(p, "channelId");
    let campaign_id = opt_u64(p, "campaignId");
    let staff_id = opt_u64(p, "staffId");
    let interest = opt_str(p, "interestLevel");

    let mut rows: Vec<Value> = state
        .store
        .leads
        .iter()
        .filter(|l| {
            let created = calc::parse_date(Some(&l.created_at));
            calc::overlaps_timeframe(created, created, opts.timeframe_start, opts.timeframe_end)
        })
        .filter(|l| {
            opts.matches_search(&[
                &l.full_name,
                l.phone.as_deref().unwrap_or(""),
                l.email.as_deref().unwrap_or(""),
            ])
        })
        .filter(|l| opts.status_matches(l.status.as_str()))
        .filter(|l| {
            interest.as_deref().map_or(true, |want| {
                calc::normalize(want) == calc::normalize(l.interest_level.as_str())
            })
        })
        .filter(|l| channel_id.map_or(true, |id| l.channel_id == Some(id)))
        .filter(|l| campaign_id.map_or(true, |id| l.campaign_id == Some(id)))
        .filter(|l| staff_id.map_or(true, |id| l.staff_id == Some(id)))
        .map(raw_json)
        .collect();
    calc::sort_records(
        &mut rows,
        opts.sort_by.as_deref(),
        opts.sort_direction,
        "createdAt",
    );
    let (mut data, meta) = calc::paginate(&rows, opts.page, opts.size);
    let idx = NameIndex::build(&state.store);
    for row in &mut data {
        enrich::lead(row, &idx);
    }
    list_ok(&req.id, data, &meta)
}

fn handle_get(state: &AppState, req: &Request) -> Value {
    let id = match required_id(req, "id") {
        Ok(v) => v,
        Err(e) => return e,
    };
    match state.store.leads.iter().find(|l| l.id == id) {
        Some(l) => {
            let mut row = raw_json(l);
            enrich::lead(&mut row, &NameIndex::build(&state.store));
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
    let status = match opt_typed::<LeadStatus>(req, "status") {
        Ok(v) => v.unwrap_or(LeadStatus::New),
        Err(e) => return e,
    };
    let interest_level = match opt_typed::<InterestLevel>(req, "interestLevel") {
        Ok(v) => v.unwrap_or(InterestLevel::Medium),
        Err(e) => return e,
    };
    let p = &req.params;
    let now = now_stamp();
    let lead = Lead {
        id: state.store.lead_ids.next(),
        full_name,
        phone: opt_str(p, "phone"),
        email: opt_str(p, "email"),
        status,
        interest_level,
        channel_id: opt_u64(p, "channelId"),
        campaign_id: opt_u64(p, "campaignId"),
        staff_id: opt_u64(p, "staffId"),
        tags: opt_str_list(p, "tags").unwrap_or_default(),
        converted_student_id: opt_u64(p, "convertedStudentId"),
        created_at: now.clone(),
        updated_at: now,
    };
    state.store.leads.push(lead.clone());
    let mut row = raw_json(&lead);
    enrich::lead(&mut row, &NameIndex::build(&state.store));
    item_ok(&req.id, row)
}

fn handle_update(state: &mut AppState, req: &Request) -> Value {
    let id = match required_id(req, "id") {
        Ok(v) => v,
        Err(e) => return e,
    };
    let next_status = match opt_typed::<LeadStatus>(req, "status") {
        Ok(v) => v,
        Err(e) => return e,
    };
    let interest = match opt_typed::<InterestLevel>(req, "interestLevel") {
        Ok(v) => v,
        Err(e) => return e,
    };
    let p = req.params.clone();

    let Some(l) = state.store.leads.iter_mut().find(|l| l.id == id) else {
        return service_err(&req.id, &ServiceError::not_found("lead", id));
    };
    if let Some(next) = next_status {
        if !l.status.can_move_to(next) {
            return service_err(
                &req.id,
                &ServiceError::bad_transition("lead", l.status.as_str(), next.as_str()),
            );
        }
        l.status = next;
    }
    if let Some(v) = opt_str(&p, "fullName") {
        l.full_name = v;
    }
    if p.get("phone").is_some() {
        l.phone = opt_str(&p, "phone");
    }
    if p.get("email").is_some() {
        l.email = opt_str(&p, "email");
    }
    if let Some(v) = interest {
        l.interest_level = v;
    }
    if p.get("channelId").is_some() {
        l.channel_id = opt_u64(&p, "channelId");
    }
    if p.get("campaignId").is_some() {
        l.campaign_id = opt_u64(&p, "campaignId");
    }
    if p.get("staffId").is_some() {
        l.staff_id = opt_u64(&p, "staffId");
    }
    if let Some(v) = opt_str_list(&p, "tags") {
        l.tags = v;
    }
    if p.get("convertedStudentId").is_some() {
        l.converted_student_id = opt_u64(&p, "convertedStudentId");
    }
    l.updated_at = now_stamp();

    let snapshot = l.clone();
    let mut row = raw_json(&snapshot);
    enrich::lead(&mut row, &NameIndex::build(&state.store));
    item_ok(&req.id, row)
}

fn handle_delete(state: &mut AppState, req: &Request) -> Value {
    let id = match required_id(req, "id") {
        Ok(v) => v,
        Err(e) => return e,
    };
    let Some(pos) = state.store.leads.iter().position(|l| l.id == id) else {
        return service_err(&req.id, &ServiceError::not_found("lead", id));
    };
    let removed = state.store.leads.remove(pos);
    let mut row = raw_json(&removed);
    enrich::lead(&mut row, &NameIndex::build(&state.store));
    item_ok(&req.id, row)
}

/// Funnel breakdown over the whole collection: counts per status and per
/// interest level, plus the registered-over-total conversion rate.
fn handle_funnel(state: &AppState, req: &Request) -> Value {
    let mut by_status: BTreeMap<&'static str, u64> = BTreeMap::new();
    let mut by_interest: BTreeMap<&'static str, u64> = BTreeMap::new();
    let mut registered = 0u64;
    for l in &state.store.leads {
        *by_status.entry(l.status.as_str()).or_insert(0) += 1;
        *by_interest.entry(l.interest_level.as_str()).or_insert(0) += 1;
        if l.status == LeadStatus::Registered {
            registered += 1;
        }
    }
    let total = state.store.leads.len() as u64;
    ok(
        &req.id,
        json!({
            "data": {
                "total": total,
                "byStatus": by_status,
                "byInterestLevel": by_interest,
                "registered": registered,
                "conversionRate": calc::conversion_rate(registered as f64, total as f64),
            },
            "metadata": Value::Null
        }),
    )
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<Value> {
    match req.method.as_str() {
        "leads.list" => Some(handle_list(state, req)),
        "leads.get" => Some(handle_get(state, req)),
        "leads.create" => Some(handle_create(state, req)),
        "leads.update" => Some(handle_update(state, req)),
        "leads.delete" => Some(handle_delete(state, req)),
        "leads.funnel" => Some(handle_funnel(state, req)),
        _ => None,
    }
}
