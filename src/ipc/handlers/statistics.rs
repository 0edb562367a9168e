use serde_json::{json, Value};
use std::collections::BTreeMap;

use crate::calc;
use crate::ipc::error::ok;
use crate::ipc::types::{AppState, Request};
use crate::store::{CampaignStatus, LeadStatus, TableState};

/// One-shot dashboard snapshot reduced from every collection.
fn handle_dashboard(state: &AppState, req: &Request) -> Value {
    let store = &state.store;

    let active_campaigns = store
        .campaigns
        .iter()
        .filter(|c| c.status == CampaignStatus::Active)
        .count();
    let net_revenue: f64 = store.revenue.iter().map(|r| r.net_amount).sum();
    let new_students = store.students.iter().filter(|s| s.new_student).count();

    let mut funnel: BTreeMap<&'static str, u64> = BTreeMap::new();
    let mut registered = 0u64;
    for l in &store.leads {
        *funnel.entry(l.status.as_str()).or_insert(0) += 1;
        if l.status == LeadStatus::Registered {
            registered += 1;
        }
    }

    let mut occupancy: BTreeMap<&'static str, u64> = BTreeMap::new();
    for t in &store.tables {
        *occupancy.entry(t.state.as_str()).or_insert(0) += 1;
    }
    let occupied = store
        .tables
        .iter()
        .filter(|t| t.state == TableState::Occupied)
        .count();

    ok(
        &req.id,
        json!({
            "data": {
                "counts": {
                    "campaigns": store.campaigns.len(),
                    "channels": store.channels.len(),
                    "leads": store.leads.len(),
                    "students": store.students.len(),
                    "staff": store.staff.len(),
                    "revenueRecords": store.revenue.len(),
                    "tables": store.tables.len(),
                    "foods": store.foods.len(),
                    "categories": store.categories.len(),
                },
                "activeCampaigns": active_campaigns,
                "netRevenue": net_revenue,
                "newStudents": new_students,
                "leadFunnel": funnel,
                "leadConversionRate": calc::conversion_rate(
                    registered as f64,
                    store.leads.len() as f64
                ),
                "tableOccupancy": occupancy,
                "occupiedTables": occupied,
            },
            "metadata": Value::Null
        }),
    )
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<Value> {
    match req.method.as_str() {
        "stats.dashboard" => Some(handle_dashboard(state, req)),
        _ => None,
    }
}
