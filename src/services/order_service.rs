use std::collections::HashMap;

use chrono::{DateTime, Utc};
use sea_orm::sea_query::{Expr, LockType, SimpleExpr};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    audit::log_audit,
    dto::orders::{CreateOrderRequest, SalesStats, SalesSummary, StatsQuery, UpdateOrderRequest},
    entity::{
        orders::{ActiveModel as OrderActive, Column as OrderCol, Entity as Orders, Model as OrderModel},
        products::{Column as ProdCol, Entity as Products},
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin},
    models::{Order, OrderItemList, OrderStatus, OrderType, PaymentStatus},
    response::{ApiResponse, Pagination},
    routes::params::{Filter, FilterOp, ListParams, SortKey, parse_datetime},
    state::AppState,
};

/// Order numbers are a pure function of the current order count and the
/// creation instant: `ORD-<unix-millis>-<zero-padded sequence>`.
pub fn generate_order_number(count: i64, now: DateTime<Utc>) -> String {
    format!("ORD-{}-{:04}", now.timestamp_millis(), count + 1)
}

pub async fn create_order(
    state: &AppState,
    user: Option<&AuthUser>,
    payload: CreateOrderRequest,
) -> AppResult<ApiResponse<Order>> {
    if payload.order_items.is_empty() {
        return Err(AppError::BadRequest("No order items".into()));
    }
    payload
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    // Validate stock across all items, insert, then decrement, all inside one
    // transaction with the product rows locked so concurrent checkouts
    // cannot oversell.
    let txn = state.orm.begin().await?;

    for item in &payload.order_items {
        let product = Products::find_by_id(item.product)
            .lock(LockType::Update)
            .one(&txn)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Product not found: {}", item.product)))?;
        if product.stock < item.quantity {
            return Err(AppError::BadRequest(format!(
                "Not enough stock for product: {}",
                product.name
            )));
        }
    }

    let count = Orders::find().count(&txn).await? as i64;
    let now = Utc::now();

    let order = OrderActive {
        id: Set(Uuid::new_v4()),
        order_number: Set(generate_order_number(count, now)),
        user_id: Set(user.map(|u| u.user_id)),
        customer: Set(payload.customer),
        order_items: Set(OrderItemList(payload.order_items.clone())),
        subtotal: Set(payload.subtotal),
        tax: Set(payload.tax),
        discount: Set(payload.discount),
        total: Set(payload.total),
        order_type: Set(payload
            .order_type
            .unwrap_or(OrderType::Whatsapp)
            .as_str()
            .to_owned()),
        status: Set(OrderStatus::Pending.as_str().to_owned()),
        payment_status: Set(PaymentStatus::Pending.as_str().to_owned()),
        notes: Set(payload.notes),
        created_at: Set(now.into()),
    }
    .insert(&txn)
    .await?;

    for item in &payload.order_items {
        Products::update_many()
            .col_expr(ProdCol::Stock, Expr::col(ProdCol::Stock).sub(item.quantity))
            .filter(ProdCol::Id.eq(item.product))
            .exec(&txn)
            .await?;
    }

    txn.commit().await?;

    if let Err(err) = log_audit(
        &state.pool,
        user.map(|u| u.user_id),
        "order_create",
        Some("orders"),
        Some(serde_json::json!({ "order_id": order.id, "order_number": order.order_number })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    let order = order_from_entity(order)?;
    Ok(ApiResponse::with_message("Order created", order))
}

pub async fn list_orders(
    state: &AppState,
    user: &AuthUser,
    query: &HashMap<String, String>,
) -> AppResult<ApiResponse<Vec<Order>>> {
    ensure_admin(user)?;
    let params = ListParams::from_query(query)?;
    let condition = filter_condition(&params.filters)?;

    let mut finder = Orders::find().filter(condition);
    finder = apply_sort(finder, &params.sort)?;

    let total = finder.clone().count(&state.orm).await? as i64;

    let orders = finder
        .limit(params.limit as u64)
        .offset(params.offset() as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(order_from_entity)
        .collect::<AppResult<Vec<_>>>()?;

    let pagination = Pagination::from_window(params.page, params.limit, total);
    let count = orders.len();
    Ok(ApiResponse::list(orders, count, pagination))
}

/// Fetch one order or fail with a not-found error. Shared with the invoice
/// renderer, which must reject missing orders before emitting any bytes.
pub async fn find_order(state: &AppState, id: Uuid) -> AppResult<Order> {
    let order = Orders::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or_else(|| AppError::NotFound("Order not found".into()))?;
    order_from_entity(order)
}

pub async fn get_order(state: &AppState, id: Uuid) -> AppResult<ApiResponse<Order>> {
    Ok(ApiResponse::success(find_order(state, id).await?))
}

pub async fn update_order(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateOrderRequest,
) -> AppResult<ApiResponse<Order>> {
    ensure_admin(user)?;
    payload
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let existing = Orders::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or_else(|| AppError::NotFound("Order not found".into()))?;

    let mut active: OrderActive = existing.into();
    if let Some(customer) = payload.customer {
        active.customer = Set(customer);
    }
    if let Some(items) = payload.order_items {
        if items.is_empty() {
            return Err(AppError::BadRequest("No order items".into()));
        }
        active.order_items = Set(OrderItemList(items));
    }
    if let Some(subtotal) = payload.subtotal {
        active.subtotal = Set(subtotal);
    }
    if let Some(tax) = payload.tax {
        active.tax = Set(tax);
    }
    if let Some(discount) = payload.discount {
        active.discount = Set(discount);
    }
    if let Some(total) = payload.total {
        active.total = Set(total);
    }
    if let Some(order_type) = payload.order_type {
        active.order_type = Set(order_type.as_str().to_owned());
    }
    if let Some(status) = payload.status {
        active.status = Set(status.as_str().to_owned());
    }
    if let Some(payment_status) = payload.payment_status {
        active.payment_status = Set(payment_status.as_str().to_owned());
    }
    if let Some(notes) = payload.notes {
        active.notes = Set(Some(notes));
    }

    let order = active.update(&state.orm).await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "order_update",
        Some("orders"),
        Some(serde_json::json!({ "order_id": order.id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::with_message("Updated", order_from_entity(order)?))
}

pub async fn delete_order(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    ensure_admin(user)?;
    Orders::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or_else(|| AppError::NotFound("Order not found".into()))?;

    Orders::delete_by_id(id).exec(&state.orm).await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "order_delete",
        Some("orders"),
        Some(serde_json::json!({ "order_id": id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(serde_json::json!({})))
}

pub async fn sales_stats(
    state: &AppState,
    user: &AuthUser,
    query: StatsQuery,
) -> AppResult<ApiResponse<SalesStats>> {
    ensure_admin(user)?;
    let start = query.start_date.as_deref().map(parse_datetime).transpose()?;
    let end = query.end_date.as_deref().map(parse_datetime).transpose()?;

    let (total_orders, total_revenue, average_order_value): (i64, f64, f64) = sqlx::query_as(
        r#"
        SELECT COUNT(*), COALESCE(SUM(total), 0), COALESCE(AVG(total), 0)
        FROM orders
        WHERE ($1::timestamptz IS NULL OR created_at >= $1)
          AND ($2::timestamptz IS NULL OR created_at <= $2)
        "#,
    )
    .bind(start)
    .bind(end)
    .fetch_one(&state.pool)
    .await?;

    let orders_by_status = grouped_counts(state, "status", start, end).await?;
    let orders_by_type = grouped_counts(state, "order_type", start, end).await?;

    Ok(ApiResponse::success(SalesStats {
        summary: SalesSummary {
            total_orders,
            total_revenue,
            average_order_value,
        },
        orders_by_status,
        orders_by_type,
    }))
}

async fn grouped_counts(
    state: &AppState,
    column: &str,
    start: Option<DateTime<Utc>>,
    end: Option<DateTime<Utc>>,
) -> AppResult<HashMap<String, i64>> {
    // `column` is one of two fixed identifiers, never caller input.
    let sql = format!(
        r#"
        SELECT {column}, COUNT(*)
        FROM orders
        WHERE ($1::timestamptz IS NULL OR created_at >= $1)
          AND ($2::timestamptz IS NULL OR created_at <= $2)
        GROUP BY {column}
        "#
    );
    let rows: Vec<(String, i64)> = sqlx::query_as(&sql)
        .bind(start)
        .bind(end)
        .fetch_all(&state.pool)
        .await?;
    Ok(rows.into_iter().collect())
}

fn order_column(field: &str) -> Option<OrderCol> {
    match field {
        "orderNumber" => Some(OrderCol::OrderNumber),
        "status" => Some(OrderCol::Status),
        "paymentStatus" => Some(OrderCol::PaymentStatus),
        "orderType" => Some(OrderCol::OrderType),
        "subtotal" => Some(OrderCol::Subtotal),
        "tax" => Some(OrderCol::Tax),
        "discount" => Some(OrderCol::Discount),
        "total" => Some(OrderCol::Total),
        "createdAt" => Some(OrderCol::CreatedAt),
        _ => None,
    }
}

fn is_numeric_field(field: &str) -> bool {
    matches!(field, "subtotal" | "tax" | "discount" | "total")
}

fn filter_condition(filters: &[Filter]) -> AppResult<Condition> {
    let mut condition = Condition::all();
    for filter in filters {
        let col = order_column(&filter.field).ok_or_else(|| {
            AppError::BadRequest(format!("Cannot filter by field: {}", filter.field))
        })?;
        let expr = if is_numeric_field(&filter.field) {
            typed_filter(col, filter, |raw| {
                raw.parse::<f64>().map_err(|_| {
                    AppError::BadRequest(format!("Invalid numeric value: {raw}"))
                })
            })?
        } else if filter.field == "createdAt" {
            typed_filter(col, filter, parse_datetime)?
        } else {
            typed_filter(col, filter, |raw| Ok(raw.to_string()))?
        };
        condition = condition.add(expr);
    }
    Ok(condition)
}

fn typed_filter<V, F>(col: OrderCol, filter: &Filter, parse: F) -> AppResult<SimpleExpr>
where
    V: Into<sea_orm::Value>,
    F: Fn(&str) -> AppResult<V>,
{
    Ok(match filter.op {
        FilterOp::Eq => col.eq(parse(&filter.raw)?),
        FilterOp::Gt => col.gt(parse(&filter.raw)?),
        FilterOp::Gte => col.gte(parse(&filter.raw)?),
        FilterOp::Lt => col.lt(parse(&filter.raw)?),
        FilterOp::Lte => col.lte(parse(&filter.raw)?),
        FilterOp::In => col.is_in(
            filter
                .raw
                .split(',')
                .map(|v| parse(v.trim()))
                .collect::<AppResult<Vec<V>>>()?,
        ),
    })
}

fn apply_sort(
    mut finder: sea_orm::Select<Orders>,
    sort: &[SortKey],
) -> AppResult<sea_orm::Select<Orders>> {
    if sort.is_empty() {
        return Ok(finder.order_by_desc(OrderCol::CreatedAt));
    }
    for key in sort {
        let col = order_column(&key.field).ok_or_else(|| {
            AppError::BadRequest(format!("Cannot sort by field: {}", key.field))
        })?;
        finder = if key.descending {
            finder.order_by_desc(col)
        } else {
            finder.order_by_asc(col)
        };
    }
    Ok(finder)
}

fn order_from_entity(model: OrderModel) -> AppResult<Order> {
    Ok(Order {
        id: model.id,
        order_number: model.order_number,
        user: model.user_id,
        customer: model.customer,
        order_items: model.order_items.0,
        subtotal: model.subtotal,
        tax: model.tax,
        discount: model.discount,
        total: model.total,
        order_type: model.order_type.parse().map_err(AppError::BadRequest)?,
        status: model.status.parse().map_err(AppError::BadRequest)?,
        payment_status: model.payment_status.parse().map_err(AppError::BadRequest)?,
        notes: model.notes,
        created_at: model.created_at.with_timezone(&Utc),
    })
}
