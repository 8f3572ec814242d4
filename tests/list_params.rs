use std::collections::HashMap;

use chrono::{TimeZone, Utc};
use storefront_api::{
    response::{PageRef, Pagination},
    routes::params::{FilterOp, ListParams, parse_datetime},
    services::order_service::generate_order_number,
};

fn query(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[test]
fn reserved_keys_are_not_filters() {
    let params = ListParams::from_query(&query(&[
        ("page", "2"),
        ("limit", "10"),
        ("sort", "-createdAt"),
        ("select", "orderNumber"),
    ]))
    .unwrap();

    assert!(params.filters.is_empty());
    assert_eq!(params.page, 2);
    assert_eq!(params.limit, 10);
    assert_eq!(params.offset(), 10);
}

#[test]
fn bare_keys_become_equality_filters() {
    let params = ListParams::from_query(&query(&[("status", "pending")])).unwrap();

    assert_eq!(params.filters.len(), 1);
    assert_eq!(params.filters[0].field, "status");
    assert_eq!(params.filters[0].op, FilterOp::Eq);
    assert_eq!(params.filters[0].raw, "pending");
}

#[test]
fn bracket_suffixes_select_comparison_operators() {
    let params = ListParams::from_query(&query(&[
        ("total[gte]", "10"),
        ("subtotal[lt]", "100"),
        ("status[in]", "pending,confirmed"),
    ]))
    .unwrap();

    let op_for = |field: &str| {
        params
            .filters
            .iter()
            .find(|f| f.field == field)
            .map(|f| f.op)
            .unwrap()
    };
    assert_eq!(op_for("total"), FilterOp::Gte);
    assert_eq!(op_for("subtotal"), FilterOp::Lt);
    assert_eq!(op_for("status"), FilterOp::In);
}

#[test]
fn unknown_operator_is_rejected() {
    let err = ListParams::from_query(&query(&[("total[regex]", "10")])).unwrap_err();
    assert!(err.to_string().contains("Unknown filter operator"));
}

#[test]
fn sort_parses_direction_prefixes() {
    let params =
        ListParams::from_query(&query(&[("sort", "-createdAt,total")])).unwrap();

    assert_eq!(params.sort.len(), 2);
    assert_eq!(params.sort[0].field, "createdAt");
    assert!(params.sort[0].descending);
    assert_eq!(params.sort[1].field, "total");
    assert!(!params.sort[1].descending);
}

#[test]
fn pagination_defaults_and_clamps() {
    let params = ListParams::from_query(&query(&[])).unwrap();
    assert_eq!(params.page, 1);
    assert_eq!(params.limit, 25);
    assert_eq!(params.offset(), 0);

    let params = ListParams::from_query(&query(&[("page", "0"), ("limit", "9999")])).unwrap();
    assert_eq!(params.page, 1);
    assert_eq!(params.limit, 100);
}

#[test]
fn datetimes_accept_rfc3339_and_plain_dates() {
    let expected = Utc.with_ymd_and_hms(2026, 1, 15, 0, 0, 0).unwrap();
    assert_eq!(parse_datetime("2026-01-15").unwrap(), expected);
    assert_eq!(parse_datetime("2026-01-15T00:00:00Z").unwrap(), expected);
    assert!(parse_datetime("yesterday").is_err());
}

#[test]
fn order_numbers_embed_timestamp_and_sequence() {
    let now = Utc.with_ymd_and_hms(2026, 1, 15, 10, 30, 0).unwrap();
    let number = generate_order_number(0, now);
    assert_eq!(number, format!("ORD-{}-0001", now.timestamp_millis()));

    assert!(generate_order_number(41, now).ends_with("-0042"));
    assert!(generate_order_number(9999, now).ends_with("-10000"));
}

#[test]
fn pagination_window_yields_next_and_prev() {
    let first = Pagination::from_window(1, 25, 30);
    assert_eq!(first.next, Some(PageRef { page: 2, limit: 25 }));
    assert_eq!(first.prev, None);

    let second = Pagination::from_window(2, 25, 30);
    assert_eq!(second.next, None);
    assert_eq!(second.prev, Some(PageRef { page: 1, limit: 25 }));

    let only = Pagination::from_window(1, 25, 10);
    assert_eq!(only.next, None);
    assert_eq!(only.prev, None);

    // Exact multiple: page 1 of 50/25 still has a next page.
    let exact = Pagination::from_window(1, 25, 50);
    assert_eq!(exact.next, Some(PageRef { page: 2, limit: 25 }));
}
