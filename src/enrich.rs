use serde_json::{json, Value};
use std::collections::HashMap;

use crate::calc;
use crate::store::Store;

/// Id-to-display-name lookup tables, built once per request instead of
/// scanning the related collection per record.
pub struct NameIndex {
    channels: HashMap<u64, String>,
    campaigns: HashMap<u64, String>,
    staff: HashMap<u64, String>,
    students: HashMap<u64, String>,
    categories: HashMap<u64, String>,
    foods_per_category: HashMap<u64, u64>,
}

impl NameIndex {
    pub fn build(store: &Store) -> Self {
        let mut foods_per_category = HashMap::new();
        for f in &store.foods {
            if let Some(cid) = f.category_id {
                *foods_per_category.entry(cid).or_insert(0) += 1;
            }
        }
        NameIndex {
            channels: store
                .channels
                .iter()
                .map(|c| (c.id, c.name.clone()))
                .collect(),
            campaigns: store
                .campaigns
                .iter()
                .map(|c| (c.id, c.name.clone()))
                .collect(),
            staff: store
                .staff
                .iter()
                .map(|s| (s.id, s.full_name.clone()))
                .collect(),
            students: store
                .students
                .iter()
                .map(|s| (s.id, s.full_name.clone()))
                .collect(),
            categories: store
                .categories
                .iter()
                .map(|c| (c.id, c.name.clone()))
                .collect(),
            foods_per_category,
        }
    }

    fn resolve(map: &HashMap<u64, String>, id: Option<u64>) -> Value {
        match id.and_then(|id| map.get(&id)) {
            Some(name) => json!(name),
            None => Value::Null,
        }
    }
}

fn id_of(row: &Value, key: &str) -> Option<u64> {
    row.get(key).and_then(Value::as_u64)
}

fn num_of(row: &Value, key: &str) -> f64 {
    row.get(key).and_then(|v| calc::to_number(v)).unwrap_or(0.0)
}

fn set(row: &mut Value, key: &str, v: Value) {
    if let Some(obj) = row.as_object_mut() {
        obj.insert(key.to_string(), v);
    }
}

/// Attaches channel/staff names plus recomputed roi, profit and conversion
/// rate. Derived values live only on the returned row, never in the store.
pub fn campaign(row: &mut Value, idx: &NameIndex) {
    let names: Vec<Value> = row
        .get("channelIds")
        .and_then(Value::as_array)
        .map(|ids| {
            ids.iter()
                .map(|id| NameIndex::resolve(&idx.channels, id.as_u64()))
                .collect()
        })
        .unwrap_or_default();
    let revenue = num_of(row, "actualRevenue");
    let cost = num_of(row, "actualCost");
    let leads = num_of(row, "leadCount");
    let new_students = num_of(row, "newStudentCount");

    set(row, "channelNames", Value::Array(names));
    set(
        row,
        "staffName",
        NameIndex::resolve(&idx.staff, id_of(row, "staffId")),
    );
    set(row, "roi", json!(calc::roi(revenue, cost)));
    set(row, "profit", json!(calc::profit(revenue, cost)));
    set(
        row,
        "conversionRate",
        json!(calc::conversion_rate(new_students, leads)),
    );
}

/// Attaches aggregated monthly totals and roi derived from them.
pub fn channel(row: &mut Value) {
    let stats: Vec<crate::store::MonthlyMetrics> = row
        .get("monthlyStats")
        .cloned()
        .and_then(|v| serde_json::from_value(v).ok())
        .unwrap_or_default();
    let totals = calc::aggregate_metrics(&stats);
    set(row, "roi", json!(calc::roi(totals.revenue, totals.spend)));
    set(row, "totals", json!(totals));
}

pub fn lead(row: &mut Value, idx: &NameIndex) {
    set(
        row,
        "channelName",
        NameIndex::resolve(&idx.channels, id_of(row, "channelId")),
    );
    set(
        row,
        "campaignName",
        NameIndex::resolve(&idx.campaigns, id_of(row, "campaignId")),
    );
    set(
        row,
        "staffName",
        NameIndex::resolve(&idx.staff, id_of(row, "staffId")),
    );
    set(
        row,
        "convertedStudentName",
        NameIndex::resolve(&idx.students, id_of(row, "convertedStudentId")),
    );
}

pub fn student(row: &mut Value, idx: &NameIndex) {
    let outstanding = num_of(row, "tuitionFee") - num_of(row, "paidAmount");
    set(
        row,
        "campaignName",
        NameIndex::resolve(&idx.campaigns, id_of(row, "campaignId")),
    );
    set(
        row,
        "channelName",
        NameIndex::resolve(&idx.channels, id_of(row, "channelId")),
    );
    set(
        row,
        "staffName",
        NameIndex::resolve(&idx.staff, id_of(row, "staffId")),
    );
    set(row, "outstandingAmount", json!(outstanding));
}

pub fn staff(row: &mut Value, idx: &NameIndex) {
    let names: Vec<Value> = row
        .get("campaignIds")
        .and_then(Value::as_array)
        .map(|ids| {
            ids.iter()
                .map(|id| NameIndex::resolve(&idx.campaigns, id.as_u64()))
                .collect()
        })
        .unwrap_or_default();
    set(row, "campaignNames", Value::Array(names));
}

pub fn revenue(row: &mut Value, idx: &NameIndex) {
    set(
        row,
        "studentName",
        NameIndex::resolve(&idx.students, id_of(row, "studentId")),
    );
    set(
        row,
        "campaignName",
        NameIndex::resolve(&idx.campaigns, id_of(row, "campaignId")),
    );
    set(
        row,
        "channelName",
        NameIndex::resolve(&idx.channels, id_of(row, "channelId")),
    );
}

pub fn food(row: &mut Value, idx: &NameIndex) {
    set(
        row,
        "categoryName",
        NameIndex::resolve(&idx.categories, id_of(row, "categoryId")),
    );
}

pub fn category(row: &mut Value, idx: &NameIndex) {
    let count = id_of(row, "id")
        .and_then(|id| idx.foods_per_category.get(&id).copied())
        .unwrap_or(0);
    set(row, "foodCount", json!(count));
}
