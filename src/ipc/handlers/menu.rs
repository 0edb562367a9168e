use serde_json::Value;

use crate::calc;
use crate::enrich::{self, NameIndex};
use crate::ipc::error::{item_ok, list_ok, miss_ok, service_err};
use crate::ipc::helpers::{
    opt_f64, opt_str, opt_typed, opt_u64, raw_json, required_id, required_str, ListOptions,
};
use crate::ipc::types::{AppState, Request};
use crate::store::{Category, Food, FoodStatus, ServiceError};

fn foods_list(state: &AppState, req: &Request) -> Value {
    let opts = ListOptions::parse(&req.params);
    let category_id = opt_u64(&req.params, "categoryId");
    let status = opt_str(&req.params, "status");

    let mut rows: Vec<Value> = state
        .store
        .foods
        .iter()
        .filter(|f| {
            opts.matches_search(&[&f.name, f.description.as_deref().unwrap_or("")])
        })
        .filter(|f| {
            status.as_deref().map_or(true, |want| {
                raw_json(&f.status)
                    .as_str()
                    .map_or(false, |have| calc::normalize(have) == calc::normalize(want))
            })
        })
        .filter(|f| category_id.map_or(true, |id| f.category_id == Some(id)))
        .map(raw_json)
        .collect();
    calc::sort_records(&mut rows, opts.sort_by.as_deref(), opts.sort_direction, "name");
    let (mut data, meta) = calc::paginate(&rows, opts.page, opts.size);
    let idx = NameIndex::build(&state.store);
    for row in &mut data {
        enrich::food(row, &idx);
    }
    list_ok(&req.id, data, &meta)
}

fn foods_get(state: &AppState, req: &Request) -> Value {
    let id = match required_id(req, "id") {
        Ok(v) => v,
        Err(e) => return e,
    };
    match state.store.foods.iter().find(|f| f.id == id) {
        Some(f) => {
            let mut row = raw_json(f);
            enrich::food(&mut row, &NameIndex::build(&state.store));
            item_ok(&req.id, row)
        }
        None => miss_ok(&req.id),
    }
}

fn foods_create(state: &mut AppState, req: &Request) -> Value {
    let name = match required_str(req, "name") {
        Ok(v) => v,
        Err(e) => return e,
    };
    let status = match opt_typed::<FoodStatus>(req, "status") {
        Ok(v) => v.unwrap_or(FoodStatus::Available),
        Err(e) => return e,
    };
    let p = &req.params;
    let food = Food {
        id: state.store.food_ids.next(),
        name,
        category_id: opt_u64(p, "categoryId"),
        price: opt_f64(p, "price").unwrap_or(0.0),
        status,
        image_url: opt_str(p, "imageUrl"),
        description: opt_str(p, "description"),
    };
    state.store.foods.push(food.clone());
    let mut row = raw_json(&food);
    enrich::food(&mut row, &NameIndex::build(&state.store));
    item_ok(&req.id, row)
}

fn foods_update(state: &mut AppState, req: &Request) -> Value {
    let id = match required_id(req, "id") {
        Ok(v) => v,
        Err(e) => return e,
    };
    let status = match opt_typed::<FoodStatus>(req, "status") {
        Ok(v) => v,
        Err(e) => return e,
    };
    let p = req.params.clone();

    let Some(f) = state.store.foods.iter_mut().find(|f| f.id == id) else {
        return service_err(&req.id, &ServiceError::not_found("food", id));
    };
    if let Some(v) = opt_str(&p, "name") {
        f.name = v;
    }
    if p.get("categoryId").is_some() {
        f.category_id = opt_u64(&p, "categoryId");
    }
    if let Some(v) = opt_f64(&p, "price") {
        f.price = v;
    }
    if let Some(v) = status {
        f.status = v;
    }
    if p.get("imageUrl").is_some() {
        f.image_url = opt_str(&p, "imageUrl");
    }
    if p.get("description").is_some() {
        f.description = opt_str(&p, "description");
    }
    let snapshot = f.clone();
    let mut row = raw_json(&snapshot);
    enrich::food(&mut row, &NameIndex::build(&state.store));
    item_ok(&req.id, row)
}

fn foods_delete(state: &mut AppState, req: &Request) -> Value {
    let id = match required_id(req, "id") {
        Ok(v) => v,
        Err(e) => return e,
    };
    let Some(pos) = state.store.foods.iter().position(|f| f.id == id) else {
        return service_err(&req.id, &ServiceError::not_found("food", id));
    };
    let removed = state.store.foods.remove(pos);
    let mut row = raw_json(&removed);
    enrich::food(&mut row, &NameIndex::build(&state.store));
    item_ok(&req.id, row)
}

fn categories_list(state: &AppState, req: &Request) -> Value {
    let opts = ListOptions::parse(&req.params);
    let mut rows: Vec<Value> = state
        .store
        .categories
        .iter()
        .filter(|c| opts.matches_search(&[&c.name]))
        .map(raw_json)
        .collect();
    calc::sort_records(&mut rows, opts.sort_by.as_deref(), opts.sort_direction, "name");
    let (mut data, meta) = calc::paginate(&rows, opts.page, opts.size);
    let idx = NameIndex::build(&state.store);
    for row in &mut data {
        enrich::category(row, &idx);
    }
    list_ok(&req.id, data, &meta)
}

fn categories_get(state: &AppState, req: &Request) -> Value {
    let id = match required_id(req, "id") {
        Ok(v) => v,
        Err(e) => return e,
    };
    match state.store.categories.iter().find(|c| c.id == id) {
        Some(c) => {
            let mut row = raw_json(c);
            enrich::category(&mut row, &NameIndex::build(&state.store));
            item_ok(&req.id, row)
        }
        None => miss_ok(&req.id),
    }
}

fn categories_create(state: &mut AppState, req: &Request) -> Value {
    let name = match required_str(req, "name") {
        Ok(v) => v,
        Err(e) => return e,
    };
    let category = Category {
        id: state.store.category_ids.next(),
        name,
        description: opt_str(&req.params, "description"),
    };
    state.store.categories.push(category.clone());
    let mut row = raw_json(&category);
    enrich::category(&mut row, &NameIndex::build(&state.store));
    item_ok(&req.id, row)
}

fn categories_update(state: &mut AppState, req: &Request) -> Value {
    let id = match required_id(req, "id") {
        Ok(v) => v,
        Err(e) => return e,
    };
    let p = req.params.clone();
    let Some(c) = state.store.categories.iter_mut().find(|c| c.id == id) else {
        return service_err(&req.id, &ServiceError::not_found("category", id));
    };
    if let Some(v) = opt_str(&p, "name") {
        c.name = v;
    }
    if p.get("description").is_some() {
        c.description = opt_str(&p, "description");
    }
    let snapshot = c.clone();
    let mut row = raw_json(&snapshot);
    enrich::category(&mut row, &NameIndex::build(&state.store));
    item_ok(&req.id, row)
}

fn categories_delete(state: &mut AppState, req: &Request) -> Value {
    let id = match required_id(req, "id") {
        Ok(v) => v,
        Err(e) => return e,
    };
    let Some(pos) = state.store.categories.iter().position(|c| c.id == id) else {
        return service_err(&req.id, &ServiceError::not_found("category", id));
    };
    // Foods keep their categoryId; enrichment resolves it to null from now on.
    let removed = state.store.categories.remove(pos);
    let mut row = raw_json(&removed);
    enrich::category(&mut row, &NameIndex::build(&state.store));
    item_ok(&req.id, row)
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<Value> {
    match req.method.as_str() {
        "foods.list" => Some(foods_list(state, req)),
        "foods.get" => Some(foods_get(state, req)),
        "foods.create" => Some(foods_create(state, req)),
        "foods.update" => Some(foods_update(state, req)),
        "foods.delete" => Some(foods_delete(state, req)),
        "categories.list" => Some(categories_list(state, req)),
        "categories.get" => Some(categories_get(state, req)),
        "categories.create" => Some(categories_create(state, req)),
        "categories.update" => Some(categories_update(state, req)),
        "categories.delete" => Some(categories_delete(state, req)),
        _ => None,
    }
}
