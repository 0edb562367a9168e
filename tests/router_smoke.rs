mod test_support;

use serde_json::json;
use test_support::{request, request_ok, spawn_sidecar};

#[test]
fn router_dispatch_smoke_covers_handler_families() {
    let (mut child, mut stdin, mut reader) = spawn_sidecar();

    let health = request_ok(&mut stdin, &mut reader, "1", "health", json!({}));
    assert_eq!(health["backendConfigured"], json!(false));

    let _ = request_ok(&mut stdin, &mut reader, "2", "campaigns.list", json!({}));
    let _ = request_ok(&mut stdin, &mut reader, "3", "campaigns.summary", json!({}));
    let _ = request_ok(&mut stdin, &mut reader, "4", "channels.list", json!({}));
    let _ = request_ok(&mut stdin, &mut reader, "5", "channels.summary", json!({}));
    let _ = request_ok(&mut stdin, &mut reader, "6", "leads.list", json!({}));
    let _ = request_ok(&mut stdin, &mut reader, "7", "leads.funnel", json!({}));
    let _ = request_ok(&mut stdin, &mut reader, "8", "students.list", json!({}));
    let _ = request_ok(&mut stdin, &mut reader, "9", "students.summary", json!({}));
    let _ = request_ok(&mut stdin, &mut reader, "10", "staff.list", json!({}));
    let _ = request_ok(
        &mut stdin,
        &mut reader,
        "11",
        "staff.topPerformers",
        json!({}),
    );
    let _ = request_ok(&mut stdin, &mut reader, "12", "revenue.list", json!({}));
    let _ = request_ok(&mut stdin, &mut reader, "13", "revenue.summary", json!({}));
    let _ = request_ok(&mut stdin, &mut reader, "14", "foods.list", json!({}));
    let _ = request_ok(&mut stdin, &mut reader, "15", "categories.list", json!({}));
    let _ = request_ok(&mut stdin, &mut reader, "16", "tables.list", json!({}));
    let _ = request_ok(&mut stdin, &mut reader, "17", "stats.dashboard", json!({}));
    let _ = request_ok(
        &mut stdin,
        &mut reader,
        "18",
        "reports.monthlyRevenue",
        json!({}),
    );
    let _ = request_ok(
        &mut stdin,
        &mut reader,
        "19",
        "reports.campaignPerformance",
        json!({}),
    );
    let _ = request_ok(&mut stdin, &mut reader, "20", "reports.channelRoi", json!({}));

    let created = request_ok(
        &mut stdin,
        &mut reader,
        "21",
        "tables.create",
        json!({ "name": "T9", "seats": 2 }),
    );
    let table_id = created["data"]["id"].as_u64().expect("table id");
    let _ = request_ok(
        &mut stdin,
        &mut reader,
        "22",
        "tables.delete",
        json!({ "id": table_id }),
    );

    let unknown = request(&mut stdin, &mut reader, "23", "bogus.method", json!({}));
    assert_eq!(unknown["ok"], json!(false));
    assert_eq!(unknown["error"]["code"], json!("not_implemented"));

    drop(stdin);
    let _ = child.wait();
}
