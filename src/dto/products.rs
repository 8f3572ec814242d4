use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductRequest {
    #[validate(length(
        min = 1,
        max = 100,
        message = "Product name must be between 1 and 100 characters"
    ))]
    pub name: String,
    #[validate(length(
        min = 1,
        max = 1000,
        message = "Description must be between 1 and 1000 characters"
    ))]
    pub description: String,
    #[validate(range(min = 0.0, message = "Price cannot be negative"))]
    pub price: f64,
    #[validate(range(min = 0.0, message = "Compare price cannot be negative"))]
    pub compare_price: Option<f64>,
    pub category: Uuid,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    #[validate(range(min = 0, message = "Stock cannot be negative"))]
    pub stock: i32,
    pub sku: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub is_featured: bool,
    #[validate(range(min = 1.0, max = 5.0, message = "Rating must be between 1 and 5"))]
    pub average_rating: Option<f64>,
}

#[derive(Debug, Default, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductRequest {
    #[validate(length(
        min = 1,
        max = 100,
        message = "Product name must be between 1 and 100 characters"
    ))]
    pub name: Option<String>,
    #[validate(length(
        min = 1,
        max = 1000,
        message = "Description must be between 1 and 1000 characters"
    ))]
    pub description: Option<String>,
    #[validate(range(min = 0.0, message = "Price cannot be negative"))]
    pub price: Option<f64>,
    #[validate(range(min = 0.0, message = "Compare price cannot be negative"))]
    pub compare_price: Option<f64>,
    pub category: Option<Uuid>,
    pub images: Option<Vec<String>>,
    #[validate(range(min = 0, message = "Stock cannot be negative"))]
    pub stock: Option<i32>,
    pub sku: Option<String>,
    pub tags: Option<Vec<String>>,
    pub is_active: Option<bool>,
    pub is_featured: Option<bool>,
    #[validate(range(min = 1.0, max = 5.0, message = "Rating must be between 1 and 5"))]
    pub average_rating: Option<f64>,
}

fn default_true() -> bool {
    true
}
