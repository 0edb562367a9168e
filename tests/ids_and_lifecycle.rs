mod test_support;

use serde_json::json;
use test_support::{request_err, request_ok, reset_empty, spawn_sidecar};

#[test]
fn sequential_creates_assign_ids_one_then_two() {
    let (_child, mut stdin, mut reader) = spawn_sidecar();
    reset_empty(&mut stdin, &mut reader);

    let first = request_ok(
        &mut stdin,
        &mut reader,
        "1",
        "staff.create",
        json!({ "fullName": "First Hire" }),
    );
    let second = request_ok(
        &mut stdin,
        &mut reader,
        "2",
        "staff.create",
        json!({ "fullName": "Second Hire" }),
    );
    assert_eq!(first["data"]["id"], json!(1));
    assert_eq!(second["data"]["id"], json!(2));
}

#[test]
fn deleted_ids_are_never_reissued() {
    let (_child, mut stdin, mut reader) = spawn_sidecar();
    reset_empty(&mut stdin, &mut reader);

    let first = request_ok(
        &mut stdin,
        &mut reader,
        "1",
        "staff.create",
        json!({ "fullName": "Quitter" }),
    );
    let id = first["data"]["id"].as_u64().expect("id");
    let _ = request_ok(
        &mut stdin,
        &mut reader,
        "2",
        "staff.delete",
        json!({ "id": id }),
    );
    let replacement = request_ok(
        &mut stdin,
        &mut reader,
        "3",
        "staff.create",
        json!({ "fullName": "Replacement" }),
    );
    assert_eq!(replacement["data"]["id"], json!(2));
}

#[test]
fn get_soft_misses_while_update_and_delete_hard_fail() {
    let (_child, mut stdin, mut reader) = spawn_sidecar();
    reset_empty(&mut stdin, &mut reader);

    let miss = request_ok(
        &mut stdin,
        &mut reader,
        "1",
        "leads.get",
        json!({ "id": 404 }),
    );
    assert_eq!(miss["data"], json!(null));
    assert_eq!(miss["metadata"], json!(null));

    let update_err = request_err(
        &mut stdin,
        &mut reader,
        "2",
        "leads.update",
        json!({ "id": 404, "fullName": "Nobody" }),
    );
    assert_eq!(update_err["code"], json!("not_found"));

    let delete_err = request_err(
        &mut stdin,
        &mut reader,
        "3",
        "leads.delete",
        json!({ "id": 404 }),
    );
    assert_eq!(delete_err["code"], json!("not_found"));
}

#[test]
fn delete_removes_exactly_one_and_returns_the_removed_record() {
    let (_child, mut stdin, mut reader) = spawn_sidecar();

    let before = request_ok(&mut stdin, &mut reader, "1", "foods.list", json!({ "size": 100 }));
    let before_total = before["metadata"]["totalElements"].as_u64().expect("total");
    assert!(before_total > 0);

    let removed = request_ok(
        &mut stdin,
        &mut reader,
        "2",
        "foods.delete",
        json!({ "id": 1 }),
    );
    assert_eq!(removed["data"]["id"], json!(1));
    assert_eq!(removed["data"]["name"], json!("Pho Bo"));
    // Removed record comes back enriched.
    assert_eq!(removed["data"]["categoryName"], json!("Mains"));

    let after = request_ok(&mut stdin, &mut reader, "3", "foods.list", json!({ "size": 100 }));
    assert_eq!(
        after["metadata"]["totalElements"].as_u64(),
        Some(before_total - 1)
    );
}

#[test]
fn string_ids_are_numeric_coerced() {
    let (_child, mut stdin, mut reader) = spawn_sidecar();

    let by_number = request_ok(
        &mut stdin,
        &mut reader,
        "1",
        "students.get",
        json!({ "id": 1 }),
    );
    let by_string = request_ok(
        &mut stdin,
        &mut reader,
        "2",
        "students.get",
        json!({ "id": "1" }),
    );
    assert_eq!(by_number["data"]["id"], by_string["data"]["id"]);

    let bad = request_err(
        &mut stdin,
        &mut reader,
        "3",
        "students.get",
        json!({ "id": "one" }),
    );
    assert_eq!(bad["code"], json!("bad_params"));
}

#[test]
fn update_patch_preserves_untouched_array_fields() {
    let (_child, mut stdin, mut reader) = spawn_sidecar();
    reset_empty(&mut stdin, &mut reader);

    let created = request_ok(
        &mut stdin,
        &mut reader,
        "1",
        "leads.create",
        json!({ "fullName": "Tagged Lead", "tags": ["vip", "ielts"] }),
    );
    let id = created["data"]["id"].as_u64().expect("id");

    let renamed = request_ok(
        &mut stdin,
        &mut reader,
        "2",
        "leads.update",
        json!({ "id": id, "fullName": "Renamed Lead" }),
    );
    assert_eq!(renamed["data"]["tags"], json!(["vip", "ielts"]));

    let retagged = request_ok(
        &mut stdin,
        &mut reader,
        "3",
        "leads.update",
        json!({ "id": id, "tags": ["cold"] }),
    );
    assert_eq!(retagged["data"]["tags"], json!(["cold"]));
    assert_eq!(retagged["data"]["fullName"], json!("Renamed Lead"));
}
