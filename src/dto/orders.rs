use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::models::{Customer, OrderItem, OrderStatus, OrderType, PaymentStatus};

#[derive(Debug, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    #[validate(nested)]
    pub order_items: Vec<OrderItem>,
    #[validate(nested)]
    pub customer: Customer,
    #[validate(range(min = 0.0, message = "Subtotal cannot be negative"))]
    pub subtotal: f64,
    #[serde(default)]
    #[validate(range(min = 0.0, message = "Tax cannot be negative"))]
    pub tax: f64,
    #[serde(default)]
    #[validate(range(min = 0.0, message = "Discount cannot be negative"))]
    pub discount: f64,
    #[validate(range(min = 0.0, message = "Total cannot be negative"))]
    pub total: f64,
    #[serde(default)]
    pub order_type: Option<OrderType>,
    #[validate(length(max = 500, message = "Notes cannot be more than 500 characters"))]
    pub notes: Option<String>,
}

/// Partial merge for admin updates. The order number and creation timestamp
/// are immutable and deliberately absent here.
#[derive(Debug, Default, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOrderRequest {
    #[validate(nested)]
    pub customer: Option<Customer>,
    #[validate(nested)]
    pub order_items: Option<Vec<OrderItem>>,
    #[validate(range(min = 0.0, message = "Subtotal cannot be negative"))]
    pub subtotal: Option<f64>,
    #[validate(range(min = 0.0, message = "Tax cannot be negative"))]
    pub tax: Option<f64>,
    #[validate(range(min = 0.0, message = "Discount cannot be negative"))]
    pub discount: Option<f64>,
    #[validate(range(min = 0.0, message = "Total cannot be negative"))]
    pub total: Option<f64>,
    pub order_type: Option<OrderType>,
    pub status: Option<OrderStatus>,
    pub payment_status: Option<PaymentStatus>,
    #[validate(length(max = 500, message = "Notes cannot be more than 500 characters"))]
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StatsQuery {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

#[derive(Debug, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SalesSummary {
    pub total_orders: i64,
    pub total_revenue: f64,
    pub average_order_value: f64,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SalesStats {
    pub summary: SalesSummary,
    pub orders_by_status: HashMap<String, i64>,
    pub orders_by_type: HashMap<String, i64>,
}
