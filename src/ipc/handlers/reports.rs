use serde_json::{json, Value};
use std::collections::BTreeMap;

use crate::calc;
use crate::ipc::error::ok;
use crate::ipc::types::{AppState, Request};

/// Net revenue bucketed by payment month, ascending. Records without a
/// parseable payment date land in an "unknown" bucket at the end.
fn handle_monthly_revenue(state: &AppState, req: &Request) -> Value {
    let mut buckets: BTreeMap<String, (f64, u64)> = BTreeMap::new();
    let mut unknown = (0.0, 0u64);
    for r in &state.store.revenue {
        match r.payment_date.as_deref().and_then(|d| d.get(..7)) {
            Some(month) => {
                let entry = buckets.entry(month.to_string()).or_insert((0.0, 0));
                entry.0 += r.net_amount;
                entry.1 += 1;
            }
            None => {
                unknown.0 += r.net_amount;
                unknown.1 += 1;
            }
        }
    }
    let mut rows: Vec<Value> = buckets
        .into_iter()
        .map(|(month, (net, count))| {
            json!({ "month": month, "netRevenue": net, "count": count })
        })
        .collect();
    if unknown.1 > 0 {
        rows.push(json!({ "month": Value::Null, "netRevenue": unknown.0, "count": unknown.1 }));
    }
    ok(&req.id, json!({ "data": rows, "metadata": Value::Null }))
}

/// One row per campaign: aggregated metrics history plus derived figures
/// from the actuals, sorted by roi descending.
fn handle_campaign_performance(state: &AppState, req: &Request) -> Value {
    let mut rows: Vec<Value> = state
        .store
        .campaigns
        .iter()
        .map(|c| {
            let history = calc::aggregate_metrics(&c.metrics_history);
            json!({
                "id": c.id,
                "name": c.name,
                "code": c.code,
                "status": c.status.as_str(),
                "budget": c.budget,
                "actualCost": c.actual_cost,
                "actualRevenue": c.actual_revenue,
                "roi": calc::roi(c.actual_revenue, c.actual_cost),
                "profit": calc::profit(c.actual_revenue, c.actual_cost),
                "conversionRate": calc::conversion_rate(
                    c.new_student_count as f64,
                    c.lead_count as f64
                ),
                "history": history,
            })
        })
        .collect();
    calc::sort_records(&mut rows, Some("roi"), calc::SortDirection::Desc, "roi");
    ok(&req.id, json!({ "data": rows, "metadata": Value::Null }))
}

/// Channel totals with roi, sorted descending.
fn handle_channel_roi(state: &AppState, req: &Request) -> Value {
    let mut rows: Vec<Value> = state
        .store
        .channels
        .iter()
        .map(|c| {
            let totals = calc::aggregate_metrics(&c.monthly_stats);
            json!({
                "id": c.id,
                "name": c.name,
                "status": c.status.as_str(),
                "totals": totals,
                "roi": calc::roi(totals.revenue, totals.spend),
            })
        })
        .collect();
    calc::sort_records(&mut rows, Some("roi"), calc::SortDirection::Desc, "roi");
    ok(&req.id, json!({ "data": rows, "metadata": Value::Null }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<Value> {
    match req.method.as_str() {
        "reports.monthlyRevenue" => Some(handle_monthly_revenue(state, req)),
        "reports.campaignPerformance" => Some(handle_campaign_performance(state, req)),
        "reports.channelRoi" => Some(handle_channel_roi(state, req)),
        _ => None,
    }
}
