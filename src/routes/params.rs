use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::{AppError, AppResult};

/// Keys consumed by pagination/projection handling and stripped before
/// filter construction.
const RESERVED_KEYS: [&str; 4] = ["select", "sort", "page", "limit"];

const DEFAULT_LIMIT: i64 = 25;
const MAX_LIMIT: i64 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOp {
    Eq,
    Gt,
    Gte,
    Lt,
    Lte,
    In,
}

impl FilterOp {
    fn parse(op: &str) -> Option<Self> {
        match op {
            "gt" => Some(FilterOp::Gt),
            "gte" => Some(FilterOp::Gte),
            "lt" => Some(FilterOp::Lt),
            "lte" => Some(FilterOp::Lte),
            "in" => Some(FilterOp::In),
            _ => None,
        }
    }
}

/// One raw filter term: `status=pending` or `total[gte]=10`. The value stays
/// untyped here; services type it against their column whitelist.
#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    pub field: String,
    pub op: FilterOp,
    pub raw: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SortKey {
    pub field: String,
    pub descending: bool,
}

/// Parsed list-endpoint parameters: filters, sort keys, offset pagination.
#[derive(Debug)]
pub struct ListParams {
    pub filters: Vec<Filter>,
    pub sort: Vec<SortKey>,
    pub page: i64,
    pub limit: i64,
}

impl ListParams {
    pub fn from_query(query: &HashMap<String, String>) -> AppResult<Self> {
        let mut filters = Vec::new();
        for (key, value) in query {
            if RESERVED_KEYS.contains(&key.as_str()) {
                continue;
            }
            let filter = match key.strip_suffix(']').and_then(|k| k.split_once('[')) {
                Some((field, op)) => Filter {
                    field: field.to_string(),
                    op: FilterOp::parse(op).ok_or_else(|| {
                        AppError::BadRequest(format!("Unknown filter operator: {op}"))
                    })?,
                    raw: value.clone(),
                },
                None => Filter {
                    field: key.clone(),
                    op: FilterOp::Eq,
                    raw: value.clone(),
                },
            };
            filters.push(filter);
        }

        let sort = query
            .get("sort")
            .map(|s| {
                s.split(',')
                    .map(str::trim)
                    .filter(|f| !f.is_empty())
                    .map(|f| match f.strip_prefix('-') {
                        Some(field) => SortKey {
                            field: field.to_string(),
                            descending: true,
                        },
                        None => SortKey {
                            field: f.to_string(),
                            descending: false,
                        },
                    })
                    .collect()
            })
            .unwrap_or_default();

        let page = query
            .get("page")
            .and_then(|p| p.parse::<i64>().ok())
            .unwrap_or(1)
            .max(1);
        let limit = query
            .get("limit")
            .and_then(|l| l.parse::<i64>().ok())
            .unwrap_or(DEFAULT_LIMIT)
            .clamp(1, MAX_LIMIT);

        Ok(Self {
            filters,
            sort,
            page,
            limit,
        })
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1) * self.limit
    }
}

/// Accepts RFC 3339 timestamps or plain `YYYY-MM-DD` dates (read as UTC
/// midnight).
pub fn parse_datetime(raw: &str) -> AppResult<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map(|d| d.and_time(NaiveTime::MIN).and_utc())
        .map_err(|_| AppError::BadRequest(format!("Invalid date: {raw}")))
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct PageParams {
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

impl PageParams {
    pub fn normalize(&self) -> (i64, i64, i64) {
        let page = self.page.unwrap_or(1).max(1);
        let limit = self.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
        let offset = (page - 1) * limit;
        (page, limit, offset)
    }
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    Asc,
    Desc,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ProductSortBy {
    CreatedAt,
    Price,
    Name,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductQuery {
    #[serde(flatten)]
    pub pagination: PageParams,
    pub q: Option<String>,
    pub category: Option<Uuid>,
    pub is_active: Option<bool>,
    pub is_featured: Option<bool>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub sort_by: Option<ProductSortBy>,
    pub sort_order: Option<SortOrder>,
}
