mod test_support;

use serde_json::json;
use test_support::{request_ok, reset_empty, spawn_sidecar};

fn add_student(
    stdin: &mut std::process::ChildStdin,
    reader: &mut std::io::BufReader<std::process::ChildStdout>,
    id: &str,
    name: &str,
) {
    let _ = request_ok(
        stdin,
        reader,
        id,
        "students.create",
        json!({ "fullName": name }),
    );
}

#[test]
fn search_matches_case_insensitively_and_pages_the_matches() {
    let (_child, mut stdin, mut reader) = spawn_sidecar();
    reset_empty(&mut stdin, &mut reader);

    for (i, name) in ["An Nguyen", "Han Tran", "Bao Le", "Thanh Vo", "Linh Pham"]
        .iter()
        .enumerate()
    {
        add_student(&mut stdin, &mut reader, &format!("s{i}"), name);
    }

    // Three of five names contain "an" case-insensitively.
    let page = request_ok(
        &mut stdin,
        &mut reader,
        "q",
        "students.list",
        json!({ "search": "an", "page": 0, "size": 2 }),
    );
    assert_eq!(page["data"].as_array().map(|a| a.len()), Some(2));
    assert_eq!(page["metadata"]["totalElements"], json!(3));
    assert_eq!(page["metadata"]["totalPages"], json!(2));
    assert_eq!(page["metadata"]["count"], json!(2));

    let last = request_ok(
        &mut stdin,
        &mut reader,
        "q2",
        "students.list",
        json!({ "search": "AN", "page": 1, "size": 2 }),
    );
    assert_eq!(last["data"].as_array().map(|a| a.len()), Some(1));
    assert_eq!(last["metadata"]["count"], json!(1));
}

#[test]
fn empty_collection_lists_one_empty_page() {
    let (_child, mut stdin, mut reader) = spawn_sidecar();
    reset_empty(&mut stdin, &mut reader);

    let page = request_ok(
        &mut stdin,
        &mut reader,
        "1",
        "students.list",
        json!({ "page": 0, "size": 10 }),
    );
    assert_eq!(page["data"], json!([]));
    assert_eq!(page["metadata"]["totalElements"], json!(0));
    assert_eq!(page["metadata"]["totalPages"], json!(1));
}

#[test]
fn paging_beyond_the_end_returns_empty_data_not_an_error() {
    let (_child, mut stdin, mut reader) = spawn_sidecar();
    reset_empty(&mut stdin, &mut reader);
    add_student(&mut stdin, &mut reader, "s", "Solo Student");

    let page = request_ok(
        &mut stdin,
        &mut reader,
        "1",
        "students.list",
        json!({ "page": 7, "size": 10 }),
    );
    assert_eq!(page["data"], json!([]));
    assert_eq!(page["metadata"]["totalElements"], json!(1));
    assert_eq!(page["metadata"]["count"], json!(0));
}

#[test]
fn identical_list_calls_are_idempotent() {
    let (_child, mut stdin, mut reader) = spawn_sidecar();

    let opts = json!({ "search": "a", "sortBy": "fullName", "sortDirection": "desc", "size": 3 });
    let first = request_ok(&mut stdin, &mut reader, "1", "leads.list", opts.clone());
    let second = request_ok(&mut stdin, &mut reader, "2", "leads.list", opts);
    assert_eq!(first, second);
}

#[test]
fn sort_by_named_key_and_direction() {
    let (_child, mut stdin, mut reader) = spawn_sidecar();
    reset_empty(&mut stdin, &mut reader);

    for (i, (name, fee)) in [("A", 300.0), ("B", 100.0), ("C", 200.0)].iter().enumerate() {
        let _ = request_ok(
            &mut stdin,
            &mut reader,
            &format!("s{i}"),
            "students.create",
            json!({ "fullName": name, "tuitionFee": fee }),
        );
    }

    let sorted = request_ok(
        &mut stdin,
        &mut reader,
        "q",
        "students.list",
        json!({ "sortBy": "tuitionFee", "sortDirection": "desc" }),
    );
    let names: Vec<&str> = sorted["data"]
        .as_array()
        .expect("rows")
        .iter()
        .map(|r| r["fullName"].as_str().unwrap_or(""))
        .collect();
    assert_eq!(names, vec!["A", "C", "B"]);
}
