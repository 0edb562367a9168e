use serde_json::{json, Value};
use std::collections::BTreeMap;

use crate::calc;
use crate::enrich::{self, NameIndex};
use crate::ipc::error::{item_ok, list_ok, miss_ok, ok, service_err};
use crate::ipc::helpers::{
    opt_f64, opt_str, opt_typed, opt_u64, raw_json, required_id, ListOptions,
};
use crate::ipc::types::{AppState, Request};
use crate::store::{PaymentMethod, RevenueRecord, ServiceError};

fn handle_list(state: &AppState, req: &Request) -> Value {
    let opts = ListOptions::parse(&req.params);
    let p = &req.params;
    let student_id = opt_u64(p, "studentId");
    let campaign_id = opt_u64(p, "campaignId");
    let channel_id = opt_u64(p, "channelId");
    let method = opt_str(p, "paymentMethod");

    let mut rows: Vec<Value> = state
        .store
        .revenue
        .iter()
        .filter(|r| {
            let paid = calc::parse_date(r.payment_date.as_deref());
            calc::overlaps_timeframe(paid, paid, opts.timeframe_start, opts.timeframe_end)
        })
        .filter(|r| opts.matches_search(&[&r.receipt_no]))
        .filter(|r| {
            method.as_deref().map_or(true, |want| {
                calc::normalize(want) == calc::normalize(r.payment_method.as_str())
            })
        })
        .filter(|r| student_id.map_or(true, |id| r.student_id == Some(id)))
        .filter(|r| campaign_id.map_or(true, |id| r.campaign_id == Some(id)))
        .filter(|r| channel_id.map_or(true, |id| r.channel_id == Some(id)))
        .map(raw_json)
        .collect();
    calc::sort_records(
        &mut rows,
        opts.sort_by.as_deref(),
        opts.sort_direction,
        "paymentDate",
    );
    let (mut data, meta) = calc::paginate(&rows, opts.page, opts.size);
    let idx = NameIndex::build(&state.store);
    for row in &mut data {
        enrich::revenue(row, &idx);
    }
    list_ok(&req.id, data, &meta)
}

fn handle_get(state: &AppState, req: &Request) -> Value {
    let id = match required_id(req, "id") {
        Ok(v) => v,
        Err(e) => return e,
    };
    match state.store.revenue.iter().find(|r| r.id == id) {
        Some(r) => {
            let mut row = raw_json(r);
            enrich::revenue(&mut row, &NameIndex::build(&state.store));
            item_ok(&req.id, row)
        }
        None => miss_ok(&req.id),
    }
}

fn handle_create(state: &mut AppState, req: &Request) -> Value {
    let method = match opt_typed::<PaymentMethod>(req, "paymentMethod") {
        Ok(v) => v.unwrap_or(PaymentMethod::Cash),
        Err(e) => return e,
    };
    let p = &req.params;
    let amount = opt_f64(p, "amount").unwrap_or(0.0);
    let discount_amount = opt_f64(p, "discountAmount").unwrap_or(0.0);
    // net = amount - discount unless the caller overrides it explicitly.
    let net_amount = opt_f64(p, "netAmount").unwrap_or(amount - discount_amount);
    let id = state.store.revenue_ids.next();
    let record = RevenueRecord {
        id,
        receipt_no: opt_str(p, "receiptNo").unwrap_or_else(|| format!("RCP-{id:05}")),
        student_id: opt_u64(p, "studentId"),
        campaign_id: opt_u64(p, "campaignId"),
        channel_id: opt_u64(p, "channelId"),
        amount,
        discount_amount,
        net_amount,
        payment_method: method,
        payment_date: opt_str(p, "paymentDate"),
    };
    state.store.revenue.push(record.clone());
    let mut row = raw_json(&record);
    enrich::revenue(&mut row, &NameIndex::build(&state.store));
    item_ok(&req.id, row)
}

fn handle_update(state: &mut AppState, req: &Request) -> Value {
    let id = match required_id(req, "id") {
        Ok(v) => v,
        Err(e) => return e,
    };
    let method = match opt_typed::<PaymentMethod>(req, "paymentMethod") {
        Ok(v) => v,
        Err(e) => return e,
    };
    let p = req.params.clone();

    let Some(r) = state.store.revenue.iter_mut().find(|r| r.id == id) else {
        return service_err(&req.id, &ServiceError::not_found("revenue record", id));
    };
    let amount_changed = p.get("amount").is_some();
    let discount_changed = p.get("discountAmount").is_some();
    let net_supplied = p.get("netAmount").is_some();

    if let Some(v) = opt_str(&p, "receiptNo") {
        r.receipt_no = v;
    }
    if p.get("studentId").is_some() {
        r.student_id = opt_u64(&p, "studentId");
    }
    if p.get("campaignId").is_some() {
        r.campaign_id = opt_u64(&p, "campaignId");
    }
    if p.get("channelId").is_some() {
        r.channel_id = opt_u64(&p, "channelId");
    }
    if let Some(v) = opt_f64(&p, "amount") {
        r.amount = v;
    }
    if let Some(v) = opt_f64(&p, "discountAmount") {
        r.discount_amount = v;
    }
    if let Some(v) = method {
        r.payment_method = v;
    }
    if p.get("paymentDate").is_some() {
        r.payment_date = opt_str(&p, "paymentDate");
    }
    // Recompute net only when its inputs moved and no explicit override came in.
    if net_supplied {
        if let Some(v) = opt_f64(&p, "netAmount") {
            r.net_amount = v;
        }
    } else if amount_changed || discount_changed {
        r.net_amount = r.amount - r.discount_amount;
    }

    let snapshot = r.clone();
    let mut row = raw_json(&snapshot);
    enrich::revenue(&mut row, &NameIndex::build(&state.store));
    item_ok(&req.id, row)
}

fn handle_delete(state: &mut AppState, req: &Request) -> Value {
    let id = match required_id(req, "id") {
        Ok(v) => v,
        Err(e) => return e,
    };
    let Some(pos) = state.store.revenue.iter().position(|r| r.id == id) else {
        return service_err(&req.id, &ServiceError::not_found("revenue record", id));
    };
    let removed = state.store.revenue.remove(pos);
    let mut row = raw_json(&removed);
    enrich::revenue(&mut row, &NameIndex::build(&state.store));
    item_ok(&req.id, row)
}

fn handle_summary(state: &AppState, req: &Request) -> Value {
    let mut gross = 0.0;
    let mut discount = 0.0;
    let mut net = 0.0;
    let mut by_method: BTreeMap<&'static str, u64> = BTreeMap::new();
    for r in &state.store.revenue {
        gross += r.amount;
        discount += r.discount_amount;
        net += r.net_amount;
        *by_method.entry(r.payment_method.as_str()).or_insert(0) += 1;
    }
    ok(
        &req.id,
        json!({
            "data": {
                "total": state.store.revenue.len(),
                "grossAmount": gross,
                "discountAmount": discount,
                "netAmount": net,
                "byPaymentMethod": by_method,
            },
            "metadata": Value::Null
        }),
    )
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<Value> {
    match req.method.as_str() {
        "revenue.list" => Some(handle_list(state, req)),
        "revenue.get" => Some(handle_get(state, req)),
        "revenue.create" => Some(handle_create(state, req)),
        "revenue.update" => Some(handle_update(state, req)),
        "revenue.delete" => Some(handle_delete(state, req)),
        "revenue.summary" => Some(handle_summary(state, req)),
        _ => None,
    }
}
