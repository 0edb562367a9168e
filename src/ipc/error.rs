use serde_json::{json, Value};

use crate::backend::BackendError;
use crate::calc::PageMeta;
use crate::store::ServiceError;

pub fn ok(id: &str, result: Value) -> Value {
    json!({
        "id": id,
        "ok": true,
        "result": result
    })
}

pub fn err(id: &str, code: &str, message: impl Into<String>, details: Option<Value>) -> Value {
    let mut error = json!({
        "code": code,
        "message": message.into(),
    });
    if let Some(d) = details {
        error["details"] = d;
    }
    json!({
        "id": id,
        "ok": false,
        "error": error,
    })
}

/// List envelope: `{ data: [...], metadata: { page, size, ... } }`.
pub fn list_ok(id: &str, data: Vec<Value>, meta: &PageMeta) -> Value {
    ok(id, json!({ "data": data, "metadata": meta }))
}

/// Single-item envelope for found records and mutation results.
pub fn item_ok(id: &str, data: Value) -> Value {
    ok(id, json!({ "data": data, "metadata": Value::Null }))
}

/// Soft miss: a read on an unknown id succeeds with null data.
pub fn miss_ok(id: &str) -> Value {
    item_ok(id, Value::Null)
}

pub fn service_err(id: &str, e: &ServiceError) -> Value {
    err(id, e.code(), e.to_string(), None)
}

pub fn backend_err(id: &str, e: &BackendError) -> Value {
    let details = match e {
        BackendError::Status { status, .. } => Some(json!({ "status": status })),
        BackendError::Unreachable(_) => None,
    };
    err(id, e.code(), e.to_string(), details)
}
