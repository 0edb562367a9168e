use chrono::{NaiveDate, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::calc::{self, SortDirection};
use crate::ipc::error::err;
use crate::ipc::types::Request;

pub fn now_stamp() -> String {
    Utc::now().to_rfc3339()
}

pub fn raw_json<T: Serialize>(t: &T) -> Value {
    serde_json::to_value(t).unwrap_or(Value::Null)
}

pub fn opt_str(params: &Value, key: &str) -> Option<String> {
    params
        .get(key)
        .and_then(Value::as_str)
        .map(|s| s.to_string())
}

pub fn opt_f64(params: &Value, key: &str) -> Option<f64> {
    params.get(key).and_then(|v| calc::to_number(v))
}

pub fn opt_u64(params: &Value, key: &str) -> Option<u64> {
    match params.get(key) {
        Some(Value::Number(n)) => n.as_u64(),
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    }
}

pub fn opt_bool(params: &Value, key: &str) -> Option<bool> {
    params.get(key).and_then(Value::as_bool)
}

pub fn opt_id_list(params: &Value, key: &str) -> Option<Vec<u64>> {
    params.get(key).and_then(Value::as_array).map(|arr| {
        arr.iter()
            .filter_map(|v| match v {
                Value::Number(n) => n.as_u64(),
                Value::String(s) => s.trim().parse().ok(),
                _ => None,
            })
            .collect()
    })
}

pub fn opt_str_list(params: &Value, key: &str) -> Option<Vec<String>> {
    params.get(key).and_then(Value::as_array).map(|arr| {
        arr.iter()
            .filter_map(Value::as_str)
            .map(|s| s.to_string())
            .collect()
    })
}

pub fn required_str(req: &Request, key: &str) -> Result<String, Value> {
    opt_str(&req.params, key)
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| err(&req.id, "bad_params", format!("missing {}", key), None))
}

/// Ids are numeric-coerced: a JSON number or a numeric string both work.
pub fn required_id(req: &Request, key: &str) -> Result<u64, Value> {
    opt_u64(&req.params, key).ok_or_else(|| {
        err(
            &req.id,
            "bad_params",
            format!("missing or non-numeric {}", key),
            None,
        )
    })
}

/// Optional typed field (status enums, metric arrays); a present but
/// malformed value is a bad_params error, absence and null are None.
pub fn opt_typed<T: DeserializeOwned>(req: &Request, key: &str) -> Result<Option<T>, Value> {
    match req.params.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(v) => serde_json::from_value(v.clone())
            .map(Some)
            .map_err(|_| err(&req.id, "bad_params", format!("invalid {}", key), None)),
    }
}

/// Options recognized by every list operation. Entity-specific equality
/// filters are read separately by each handler.
pub struct ListOptions {
    pub page: usize,
    pub size: usize,
    pub search: Option<String>,
    pub status: Option<String>,
    pub sort_by: Option<String>,
    pub sort_direction: SortDirection,
    pub timeframe_start: Option<NaiveDate>,
    pub timeframe_end: Option<NaiveDate>,
}

impl ListOptions {
    pub fn parse(params: &Value) -> Self {
        ListOptions {
            page: opt_u64(params, "page").unwrap_or(0) as usize,
            size: opt_u64(params, "size").unwrap_or(10) as usize,
            search: opt_str(params, "search").filter(|s| !s.trim().is_empty()),
            status: opt_str(params, "status").filter(|s| !s.trim().is_empty()),
            sort_by: opt_str(params, "sortBy"),
            sort_direction: SortDirection::parse(opt_str(params, "sortDirection").as_deref()),
            timeframe_start: calc::parse_date(opt_str(params, "timeframeStart").as_deref()),
            timeframe_end: calc::parse_date(opt_str(params, "timeframeEnd").as_deref()),
        }
    }

    /// True when no search term is set or any candidate field contains it,
    /// case-insensitively.
    pub fn matches_search(&self, fields: &[&str]) -> bool {
        match &self.search {
            None => true,
            Some(term) => fields.iter().any(|f| calc::contains_normalized(f, term)),
        }
    }

    pub fn status_matches(&self, status: &str) -> bool {
        self.status
            .as_deref()
            .map_or(true, |want| calc::normalize(want) == calc::normalize(status))
    }
}
