mod test_support;

use serde_json::json;
use test_support::{request_err, request_ok, spawn_sidecar};

#[test]
fn config_calls_fail_cleanly_without_a_backend() {
    let (_child, mut stdin, mut reader) = spawn_sidecar();

    let err = request_err(&mut stdin, &mut reader, "1", "config.list", json!({}));
    assert_eq!(err["code"], json!("backend_unconfigured"));

    let err = request_err(
        &mut stdin,
        &mut reader,
        "2",
        "config.get",
        json!({ "key": "opening_hours" }),
    );
    assert_eq!(err["code"], json!("backend_unconfigured"));
}

#[test]
fn order_submission_needs_an_existing_table_and_a_backend() {
    let (_child, mut stdin, mut reader) = spawn_sidecar();

    // Missing table wins over missing backend: the local check runs first.
    let err = request_err(
        &mut stdin,
        &mut reader,
        "1",
        "orders.submit",
        json!({ "tableId": 999, "items": [] }),
    );
    assert_eq!(err["code"], json!("not_found"));

    let err = request_err(
        &mut stdin,
        &mut reader,
        "2",
        "orders.submit",
        json!({ "tableId": 1, "items": [{ "foodId": 1, "quantity": 2 }] }),
    );
    assert_eq!(err["code"], json!("backend_unconfigured"));
}

#[test]
fn unreachable_backend_maps_to_a_network_error() {
    let (_child, mut stdin, mut reader) = spawn_sidecar();

    // Nothing listens on the discard port; the connect fails immediately.
    let _ = request_ok(
        &mut stdin,
        &mut reader,
        "1",
        "backend.configure",
        json!({ "baseUrl": "http://127.0.0.1:9", "token": "tok" }),
    );
    let health = request_ok(&mut stdin, &mut reader, "2", "health", json!({}));
    assert_eq!(health["backendConfigured"], json!(true));

    let err = request_err(&mut stdin, &mut reader, "3", "config.list", json!({}));
    assert_eq!(err["code"], json!("backend_unreachable"));
    assert!(err["message"]
        .as_str()
        .expect("message")
        .to_lowercase()
        .contains("network"));
}

#[test]
fn backend_configure_rejects_blank_urls() {
    let (_child, mut stdin, mut reader) = spawn_sidecar();

    let err = request_err(
        &mut stdin,
        &mut reader,
        "1",
        "backend.configure",
        json!({ "baseUrl": "   " }),
    );
    assert_eq!(err["code"], json!("bad_params"));
}
