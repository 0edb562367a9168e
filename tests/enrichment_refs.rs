mod test_support;

use serde_json::json;
use test_support::{request_ok, reset_empty, spawn_sidecar};

#[test]
fn dangling_references_enrich_to_null_instead_of_failing() {
    let (_child, mut stdin, mut reader) = spawn_sidecar();
    reset_empty(&mut stdin, &mut reader);

    let created = request_ok(
        &mut stdin,
        &mut reader,
        "1",
        "leads.create",
        json!({
            "fullName": "Orphan Lead",
            "channelId": 999,
            "campaignId": 888,
            "staffId": 777
        }),
    );
    assert_eq!(created["data"]["channelName"], json!(null));
    assert_eq!(created["data"]["campaignName"], json!(null));
    assert_eq!(created["data"]["staffName"], json!(null));
}

#[test]
fn references_resolve_through_the_name_index() {
    let (_child, mut stdin, mut reader) = spawn_sidecar();

    // Seeded lead 1 points at channel 1, campaign 1, staff 2, student 1.
    let lead = request_ok(&mut stdin, &mut reader, "1", "leads.get", json!({ "id": 1 }));
    assert_eq!(lead["data"]["channelName"], json!("Facebook Ads"));
    assert_eq!(lead["data"]["campaignName"], json!("Summer Intensive 2025"));
    assert_eq!(lead["data"]["staffName"], json!("Duc Pham"));
    assert_eq!(lead["data"]["convertedStudentName"], json!("An Nguyen"));
}

#[test]
fn enrichment_survives_deleting_the_referenced_record() {
    let (_child, mut stdin, mut reader) = spawn_sidecar();

    let _ = request_ok(
        &mut stdin,
        &mut reader,
        "1",
        "categories.delete",
        json!({ "id": 1 }),
    );
    let food = request_ok(&mut stdin, &mut reader, "2", "foods.get", json!({ "id": 1 }));
    assert_eq!(food["data"]["categoryName"], json!(null));
    // The stored reference itself is untouched.
    assert_eq!(food["data"]["categoryId"], json!(1));
}

#[test]
fn student_rows_carry_outstanding_amount() {
    let (_child, mut stdin, mut reader) = spawn_sidecar();

    let student = request_ok(
        &mut stdin,
        &mut reader,
        "1",
        "students.get",
        json!({ "id": 1 }),
    );
    assert_eq!(student["data"]["tuitionFee"], json!(1200.0));
    assert_eq!(student["data"]["paidAmount"], json!(800.0));
    assert_eq!(student["data"]["outstandingAmount"], json!(400.0));
    assert_eq!(student["data"]["staffName"], json!("Duc Pham"));
}

#[test]
fn campaign_channel_names_align_with_channel_ids() {
    let (_child, mut stdin, mut reader) = spawn_sidecar();

    let campaign = request_ok(
        &mut stdin,
        &mut reader,
        "1",
        "campaigns.get",
        json!({ "id": 1 }),
    );
    assert_eq!(
        campaign["data"]["channelNames"],
        json!(["Facebook Ads", "Parent Referral"])
    );
    assert_eq!(campaign["data"]["staffName"], json!("Mai Tran"));
}
