use chrono::NaiveDate;
use serde::Serialize;
use serde_json::Value;
use std::cmp::Ordering;

use crate::store::MonthlyMetrics;

/// Lowercased, trimmed form used for every case-insensitive text comparison.
pub fn normalize(s: &str) -> String {
    s.trim().to_lowercase()
}

pub fn contains_normalized(haystack: &str, needle: &str) -> bool {
    normalize(haystack).contains(&normalize(needle))
}

/// Numeric coercion that keeps "filter not provided" distinct from
/// "filter value is 0": null, absence and empty strings all map to None.
pub fn to_number(v: &Value) -> Option<f64> {
    match v {
        Value::Null => None,
        Value::Number(n) => n.as_f64(),
        Value::String(s) if s.trim().is_empty() => None,
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

pub fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

/// (revenue - cost) / cost, 2 decimals. Zero cost yields 0, not infinity.
pub fn roi(revenue: f64, cost: f64) -> f64 {
    if cost == 0.0 {
        return 0.0;
    }
    round2((revenue - cost) / cost)
}

pub fn profit(revenue: f64, cost: f64) -> f64 {
    revenue - cost
}

pub fn conversion_rate(new_students: f64, leads: f64) -> f64 {
    if leads == 0.0 {
        return 0.0;
    }
    round2(new_students / leads)
}

/// Leading `YYYY-MM-DD` of a date or RFC3339 stamp; anything else is None.
pub fn parse_date(s: Option<&str>) -> Option<NaiveDate> {
    let s = s?;
    let head = s.get(..10)?;
    NaiveDate::parse_from_str(head, "%Y-%m-%d").ok()
}

/// Interval-overlap test between a record's [start,end] window and the
/// requested [from,to] window. Absent query bounds are unbounded. A record
/// missing one of its own dates borrows the other, so partial date info
/// never excludes a record; a record with no dates at all always matches.
pub fn overlaps_timeframe(
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
) -> bool {
    let rec_start = start.or(end);
    let rec_end = end.or(start);
    let after_from = match (from, rec_end) {
        (Some(f), Some(e)) => e >= f,
        _ => true,
    };
    let before_to = match (to, rec_start) {
        (Some(t), Some(s)) => s <= t,
        _ => true,
    };
    after_from && before_to
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn parse(s: Option<&str>) -> Self {
        match s.map(|v| normalize(v)).as_deref() {
            Some("desc") => SortDirection::Desc,
            _ => SortDirection::Asc,
        }
    }
}

fn field_ord(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x
            .as_f64()
            .partial_cmp(&y.as_f64())
            .unwrap_or(Ordering::Equal),
        (Value::String(x), Value::String(y)) => normalize(x).cmp(&normalize(y)),
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        // Missing/null keys sort after everything else.
        (Value::Null, Value::Null) => Ordering::Equal,
        (Value::Null, _) => Ordering::Greater,
        (_, Value::Null) => Ordering::Less,
        _ => Ordering::Equal,
    }
}

/// Sorts JSON rows by a named key. An unrecognized or absent key falls back
/// to `fallback`. `sort_by` is stable, so equal keys keep input order.
pub fn sort_records(rows: &mut [Value], key: Option<&str>, dir: SortDirection, fallback: &str) {
    let key = match key {
        Some(k) if rows.iter().any(|r| r.get(k).is_some()) => k.to_string(),
        _ => fallback.to_string(),
    };
    rows.sort_by(|a, b| {
        let av = a.get(&key).unwrap_or(&Value::Null);
        let bv = b.get(&key).unwrap_or(&Value::Null);
        let ord = field_ord(av, bv);
        match dir {
            SortDirection::Asc => ord,
            SortDirection::Desc => ord.reverse(),
        }
    });
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    pub page: usize,
    pub size: usize,
    pub total_elements: usize,
    pub total_pages: usize,
    pub count: usize,
}

/// 0-indexed page slice plus metadata. Slicing past the end returns an empty
/// page; `totalPages` is never below 1, even for an empty collection.
pub fn paginate<T: Clone>(rows: &[T], page: usize, size: usize) -> (Vec<T>, PageMeta) {
    let size = size.max(1);
    let total_elements = rows.len();
    let total_pages = (total_elements.div_ceil(size)).max(1);
    let from = (page.saturating_mul(size)).min(total_elements);
    let to = (from + size).min(total_elements);
    let data = rows[from..to].to_vec();
    let count = data.len();
    (
        data,
        PageMeta {
            page,
            size,
            total_elements,
            total_pages,
            count,
        },
    )
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricTotals {
    pub spend: f64,
    pub leads: u64,
    pub new_students: u64,
    pub revenue: f64,
    pub profit: f64,
}

/// Cumulative totals over monthly metric entries.
pub fn aggregate_metrics(items: &[MonthlyMetrics]) -> MetricTotals {
    let mut t = MetricTotals::default();
    for m in items {
        t.spend += m.spend;
        t.leads += m.leads;
        t.new_students += m.new_students;
        t.revenue += m.revenue;
        t.profit += m.profit;
    }
    t
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn roi_guards_zero_cost() {
        assert_eq!(roi(1500.0, 0.0), 0.0);
        assert_eq!(roi(1500.0, 1000.0), 0.5);
        assert_eq!(roi(1000.0, 3000.0), -0.67);
    }

    #[test]
    fn conversion_rate_guards_zero_leads() {
        assert_eq!(conversion_rate(3.0, 0.0), 0.0);
        assert_eq!(conversion_rate(1.0, 3.0), 0.33);
    }

    #[test]
    fn to_number_distinguishes_absent_from_zero() {
        assert_eq!(to_number(&Value::Null), None);
        assert_eq!(to_number(&json!("")), None);
        assert_eq!(to_number(&json!("  ")), None);
        assert_eq!(to_number(&json!(0)), Some(0.0));
        assert_eq!(to_number(&json!("12.5")), Some(12.5));
        assert_eq!(to_number(&json!(true)), None);
    }

    #[test]
    fn paginate_empty_collection_reports_one_page() {
        let (data, meta) = paginate::<i32>(&[], 0, 10);
        assert!(data.is_empty());
        assert_eq!(meta.total_elements, 0);
        assert_eq!(meta.total_pages, 1);
        assert_eq!(meta.count, 0);
    }

    #[test]
    fn paginate_page_bounds() {
        let rows: Vec<i32> = (1..=7).collect();
        let (data, meta) = paginate(&rows, 0, 3);
        assert_eq!(data, vec![1, 2, 3]);
        assert_eq!(meta.total_pages, 3);

        let (last, meta) = paginate(&rows, 2, 3);
        assert_eq!(last, vec![7]);
        assert_eq!(meta.count, 1);

        let (beyond, meta) = paginate(&rows, 9, 3);
        assert!(beyond.is_empty());
        assert_eq!(meta.total_elements, 7);
    }

    #[test]
    fn timeframe_overlap_with_partial_dates() {
        let d = |s: &str| parse_date(Some(s));
        // Window fully outside the record.
        assert!(!overlaps_timeframe(
            d("2025-01-01"),
            d("2025-02-01"),
            d("2025-03-01"),
            d("2025-04-01"),
        ));
        // Partial overlap counts.
        assert!(overlaps_timeframe(
            d("2025-01-15"),
            d("2025-03-15"),
            d("2025-03-01"),
            d("2025-04-01"),
        ));
        // Record missing its end date borrows the start date.
        assert!(overlaps_timeframe(
            d("2025-03-10"),
            None,
            d("2025-03-01"),
            d("2025-04-01"),
        ));
        // No dates at all always matches.
        assert!(overlaps_timeframe(
            None,
            None,
            d("2025-03-01"),
            d("2025-04-01")
        ));
        // Unbounded query matches everything.
        assert!(overlaps_timeframe(
            d("1999-01-01"),
            d("1999-01-02"),
            None,
            None
        ));
    }

    #[test]
    fn sort_records_falls_back_on_unknown_key() {
        let mut rows = vec![
            json!({"name": "banh mi", "price": 3.0}),
            json!({"name": "pho", "price": 8.0}),
            json!({"name": "com tam", "price": 6.5}),
        ];
        sort_records(&mut rows, Some("nonsense"), SortDirection::Asc, "name");
        assert_eq!(rows[0]["name"], "banh mi");
        assert_eq!(rows[2]["name"], "pho");

        sort_records(&mut rows, Some("price"), SortDirection::Desc, "name");
        assert_eq!(rows[0]["name"], "pho");
        assert_eq!(rows[2]["name"], "banh mi");
    }

    #[test]
    fn sort_records_puts_null_keys_last() {
        let mut rows = vec![
            json!({"name": "b"}),
            json!({"name": "a", "paymentDate": "2025-02-01"}),
            json!({"name": "c", "paymentDate": "2025-01-01"}),
        ];
        sort_records(&mut rows, Some("paymentDate"), SortDirection::Asc, "name");
        assert_eq!(rows[0]["name"], "c");
        assert_eq!(rows[1]["name"], "a");
        assert_eq!(rows[2]["name"], "b");
    }

    #[test]
    fn aggregate_metrics_sums_every_series() {
        let items = vec![
            MonthlyMetrics {
                month: "2025-05".into(),
                spend: 100.0,
                leads: 10,
                new_students: 2,
                revenue: 400.0,
                profit: 300.0,
            },
            MonthlyMetrics {
                month: "2025-06".into(),
                spend: 50.0,
                leads: 5,
                new_students: 1,
                revenue: 150.0,
                profit: 100.0,
            },
        ];
        let t = aggregate_metrics(&items);
        assert_eq!(t.spend, 150.0);
        assert_eq!(t.leads, 15);
        assert_eq!(t.new_students, 3);
        assert_eq!(t.revenue, 550.0);
        assert_eq!(t.profit, 400.0);
    }
}
