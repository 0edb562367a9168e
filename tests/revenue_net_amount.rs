mod test_support;

use serde_json::json;
use test_support::{request_ok, reset_empty, spawn_sidecar};

#[test]
fn net_amount_defaults_to_amount_minus_discount() {
    let (_child, mut stdin, mut reader) = spawn_sidecar();
    reset_empty(&mut stdin, &mut reader);

    let created = request_ok(
        &mut stdin,
        &mut reader,
        "1",
        "revenue.create",
        json!({ "amount": 1000, "discountAmount": 150 }),
    );
    assert_eq!(created["data"]["netAmount"], json!(850.0));
    assert!(created["data"]["receiptNo"]
        .as_str()
        .expect("receipt")
        .starts_with("RCP-"));
}

#[test]
fn explicit_net_amount_override_wins_on_create() {
    let (_child, mut stdin, mut reader) = spawn_sidecar();
    reset_empty(&mut stdin, &mut reader);

    let created = request_ok(
        &mut stdin,
        &mut reader,
        "1",
        "revenue.create",
        json!({ "amount": 1000, "discountAmount": 150, "netAmount": 900 }),
    );
    assert_eq!(created["data"]["netAmount"], json!(900.0));
}

#[test]
fn net_amount_recomputes_only_when_inputs_change() {
    let (_child, mut stdin, mut reader) = spawn_sidecar();
    reset_empty(&mut stdin, &mut reader);

    let created = request_ok(
        &mut stdin,
        &mut reader,
        "1",
        "revenue.create",
        json!({ "amount": 500, "discountAmount": 0 }),
    );
    let id = created["data"]["id"].as_u64().expect("id");

    // Patching an unrelated field leaves net alone.
    let dated = request_ok(
        &mut stdin,
        &mut reader,
        "2",
        "revenue.update",
        json!({ "id": id, "paymentDate": "2025-07-01" }),
    );
    assert_eq!(dated["data"]["netAmount"], json!(500.0));

    // Patching the discount recomputes net from the merged record.
    let discounted = request_ok(
        &mut stdin,
        &mut reader,
        "3",
        "revenue.update",
        json!({ "id": id, "discountAmount": 75 }),
    );
    assert_eq!(discounted["data"]["netAmount"], json!(425.0));

    // An explicit override beats recomputation.
    let overridden = request_ok(
        &mut stdin,
        &mut reader,
        "4",
        "revenue.update",
        json!({ "id": id, "amount": 600, "netAmount": 599 }),
    );
    assert_eq!(overridden["data"]["netAmount"], json!(599.0));
}

#[test]
fn summary_totals_cover_the_whole_collection() {
    let (_child, mut stdin, mut reader) = spawn_sidecar();
    reset_empty(&mut stdin, &mut reader);

    for (i, (amount, discount, method)) in [
        (100.0, 0.0, "CASH"),
        (200.0, 20.0, "CARD"),
        (300.0, 0.0, "CASH"),
    ]
    .iter()
    .enumerate()
    {
        let _ = request_ok(
            &mut stdin,
            &mut reader,
            &format!("r{i}"),
            "revenue.create",
            json!({ "amount": amount, "discountAmount": discount, "paymentMethod": method }),
        );
    }

    let summary = request_ok(&mut stdin, &mut reader, "s", "revenue.summary", json!({}));
    assert_eq!(summary["data"]["grossAmount"], json!(600.0));
    assert_eq!(summary["data"]["discountAmount"], json!(20.0));
    assert_eq!(summary["data"]["netAmount"], json!(580.0));
    assert_eq!(summary["data"]["byPaymentMethod"]["CASH"], json!(2));
    assert_eq!(summary["data"]["byPaymentMethod"]["CARD"], json!(1));
}
