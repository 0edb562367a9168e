use serde_json::{json, Value};
use std::collections::BTreeMap;

use crate::calc;
use crate::enrich::{self, NameIndex};
use crate::ipc::error::{item_ok, list_ok, miss_ok, ok, service_err};
use crate::ipc::helpers::{
    now_stamp, opt_bool, opt_f64, opt_str, opt_typed, opt_u64, raw_json, required_id,
    required_str, ListOptions,
};
use crate::ipc::types::{AppState, Request};
use crate::store::{ActiveStatus, EnrollmentStatus, ServiceError, Student};

fn handle_list(state: &AppState, req: &Request) -> Value {
    let opts = ListOptions::parse(&req.params);
    let p = &req.params;
    let campaign_id = opt_u64(p, "campaignId");
    let channel_id = opt_u64(p, "channelId");
    let staff_id = opt_u64(p, "staffId");
    let enrollment = opt_str(p, "enrollmentStatus");
    let new_only = opt_bool(p, "newStudent");

    let mut rows: Vec<Value> = state
        .store
        .students
        .iter()
        .filter(|s| {
            let created = calc::parse_date(Some(&s.created_at));
            calc::overlaps_timeframe(created, created, opts.timeframe_start, opts.timeframe_end)
        })
        .filter(|s| {
            opts.matches_search(&[
                &s.full_name,
                &s.code,
                s.phone.as_deref().unwrap_or(""),
                s.email.as_deref().unwrap_or(""),
            ])
        })
        .filter(|s| opts.status_matches(s.status.as_str()))
        .filter(|s| {
            enrollment.as_deref().map_or(true, |want| {
                calc::normalize(want) == calc::normalize(s.enrollment_status.as_str())
            })
        })
        .filter(|s| campaign_id.map_or(true, |id| s.campaign_id == Some(id)))
        .filter(|s| channel_id.map_or(true, |id| s.channel_id == Some(id)))
        .filter(|s| staff_id.map_or(true, |id| s.staff_id == Some(id)))
        .filter(|s| new_only.map_or(true, |want| s.new_student == want))
        .map(raw_json)
        .collect();
    calc::sort_records(
        &mut rows,
        opts.sort_by.as_deref(),
        opts.sort_direction,
        "createdAt",
    );
    let (mut data, meta) = calc::paginate(&rows, opts.page, opts.size);
    let idx = NameIndex::build(&state.store);
    for row in &mut data {
        enrich::student(row, &idx);
    }
    list_ok(&req.id, data, &meta)
}

fn handle_get(state: &AppState, req: &Request) -> Value {
    let id = match required_id(req, "id") {
        Ok(v) => v,
        Err(e) => return e,
    };
    match state.store.students.iter().find(|s| s.id == id) {
        Some(s) => {
            let mut row = raw_json(s);
            enrich::student(&mut row, &NameIndex::build(&state.store));
            item_ok(&req.id, row)
        }
        None => miss_ok(&req.id),
    }
}

fn handle_create(state: &mut AppState, req: &Request) -> Value {
    let full_name = match required_str(req, "fullName") {
        Ok(v) => v,
        Err(e) => return e,
    };
    let status = match opt_typed::<ActiveStatus>(req, "status") {
        Ok(v) => v.unwrap_or(ActiveStatus::Active),
        Err(e) => return e,
    };
    let enrollment_status = match opt_typed::<EnrollmentStatus>(req, "enrollmentStatus") {
        Ok(v) => v.unwrap_or(EnrollmentStatus::Enrolled),
        Err(e) => return e,
    };
    let p = &req.params;
    let id = state.store.student_ids.next();
    let student = Student {
        id,
        code: opt_str(p, "code").unwrap_or_else(|| format!("HV{id:03}")),
        full_name,
        phone: opt_str(p, "phone"),
        email: opt_str(p, "email"),
        status,
        enrollment_status,
        campaign_id: opt_u64(p, "campaignId"),
        channel_id: opt_u64(p, "channelId"),
        staff_id: opt_u64(p, "staffId"),
        tuition_fee: opt_f64(p, "tuitionFee").unwrap_or(0.0),
        paid_amount: opt_f64(p, "paidAmount").unwrap_or(0.0),
        new_student: opt_bool(p, "newStudent").unwrap_or(true),
        created_at: now_stamp(),
    };
    state.store.students.push(student.clone());
    let mut row = raw_json(&student);
    enrich::student(&mut row, &NameIndex::build(&state.store));
    item_ok(&req.id, row)
}

fn handle_update(state: &mut AppState, req: &Request) -> Value {
    let id = match required_id(req, "id") {
        Ok(v) => v,
        Err(e) => return e,
    };
    let status = match opt_typed::<ActiveStatus>(req, "status") {
        Ok(v) => v,
        Err(e) => return e,
    };
    let enrollment = match opt_typed::<EnrollmentStatus>(req, "enrollmentStatus") {
        Ok(v) => v,
        Err(e) => return e,
    };
    let p = req.params.clone();

    let Some(s) = state.store.students.iter_mut().find(|s| s.id == id) else {
        return service_err(&req.id, &ServiceError::not_found("student", id));
    };
    if let Some(v) = opt_str(&p, "fullName") {
        s.full_name = v;
    }
    if let Some(v) = opt_str(&p, "code") {
        s.code = v;
    }
    if p.get("phone").is_some() {
        s.phone = opt_str(&p, "phone");
    }
    if p.get("email").is_some() {
        s.email = opt_str(&p, "email");
    }
    if let Some(v) = status {
        s.status = v;
    }
    if let Some(v) = enrollment {
        s.enrollment_status = v;
    }
    if p.get("campaignId").is_some() {
        s.campaign_id = opt_u64(&p, "campaignId");
    }
    if p.get("channelId").is_some() {
        s.channel_id = opt_u64(&p, "channelId");
    }
    if p.get("staffId").is_some() {
        s.staff_id = opt_u64(&p, "staffId");
    }
    if let Some(v) = opt_f64(&p, "tuitionFee") {
        s.tuition_fee = v;
    }
    if let Some(v) = opt_f64(&p, "paidAmount") {
        s.paid_amount = v;
    }
    if let Some(v) = opt_bool(&p, "newStudent") {
        s.new_student = v;
    }
    let snapshot = s.clone();
    let mut row = raw_json(&snapshot);
    enrich::student(&mut row, &NameIndex::build(&state.store));
    item_ok(&req.id, row)
}

fn handle_delete(state: &mut AppState, req: &Request) -> Value {
    let id = match required_id(req, "id") {
        Ok(v) => v,
        Err(e) => return e,
    };
    let Some(pos) = state.store.students.iter().position(|s| s.id == id) else {
        return service_err(&req.id, &ServiceError::not_found("student", id));
    };
    let removed = state.store.students.remove(pos);
    let mut row = raw_json(&removed);
    enrich::student(&mut row, &NameIndex::build(&state.store));
    item_ok(&req.id, row)
}

fn handle_summary(state: &AppState, req: &Request) -> Value {
    let mut by_enrollment: BTreeMap<&'static str, u64> = BTreeMap::new();
    let mut tuition = 0.0;
    let mut paid = 0.0;
    let mut new_students = 0u64;
    for s in &state.store.students {
        *by_enrollment.entry(s.enrollment_status.as_str()).or_insert(0) += 1;
        tuition += s.tuition_fee;
        paid += s.paid_amount;
        if s.new_student {
            new_students += 1;
        }
    }
    ok(
        &req.id,
        json!({
            "data": {
                "total": state.store.students.len(),
                "byEnrollmentStatus": by_enrollment,
                "totalTuition": tuition,
                "totalPaid": paid,
                "totalOutstanding": tuition - paid,
                "newStudents": new_students,
            },
            "metadata": Value::Null
        }),
    )
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<Value> {
    match req.method.as_str() {
        "students.list" => Some(handle_list(state, req)),
        "students.get" => Some(handle_get(state, req)),
        "students.create" => Some(handle_create(state, req)),
        "students.update" => Some(handle_update(state, req)),
        "students.delete" => Some(handle_delete(state, req)),
        "students.summary" => Some(handle_summary(state, req)),
        _ => None,
    }
}
