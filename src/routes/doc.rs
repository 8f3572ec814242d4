use utoipa::{
    Modify, OpenApi,
    openapi::{
        self,
        OpenApi as OpenApiSpec,
        security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    },
};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::{
        auth::{LoginRequest, LoginResponse, RegisterRequest},
        categories::{CreateCategoryRequest, UpdateCategoryRequest},
        orders::{CreateOrderRequest, SalesStats, SalesSummary, StatsQuery, UpdateOrderRequest},
        products::{CreateProductRequest, UpdateProductRequest},
    },
    error::ErrorBody,
    models::{
        Address, Category, Customer, Order, OrderItem, OrderStatus, OrderType, PaymentStatus,
        Product, User,
    },
    response::{ApiResponse, PageRef, Pagination},
    routes::{auth, categories, health, invoices, orders, params, products},
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        auth::register,
        auth::login,
        products::list_products,
        products::get_product,
        products::create_product,
        products::update_product,
        products::delete_product,
        categories::list_categories,
        categories::get_category,
        categories::create_category,
        categories::update_category,
        categories::delete_category,
        orders::list_orders,
        orders::sales_stats,
        orders::get_order,
        orders::create_order,
        orders::update_order,
        orders::delete_order,
        invoices::download_invoice,
    ),
    components(
        schemas(
            Order,
            OrderItem,
            Customer,
            Address,
            OrderStatus,
            OrderType,
            PaymentStatus,
            Product,
            Category,
            User,
            CreateOrderRequest,
            UpdateOrderRequest,
            StatsQuery,
            SalesStats,
            SalesSummary,
            CreateProductRequest,
            UpdateProductRequest,
            CreateCategoryRequest,
            UpdateCategoryRequest,
            RegisterRequest,
            LoginRequest,
            LoginResponse,
            categories::CategoryQuery,
            params::PageParams,
            params::ProductQuery,
            Pagination,
            PageRef,
            ErrorBody,
            ApiResponse<Order>,
            ApiResponse<Vec<Order>>,
            ApiResponse<Product>,
            ApiResponse<Vec<Product>>,
            ApiResponse<Category>,
            ApiResponse<Vec<Category>>,
            ApiResponse<SalesStats>,
            ApiResponse<User>,
            ApiResponse<LoginResponse>,
        )
    ),
    security(
        ("bearer_auth" = [])
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Auth", description = "Authentication endpoints"),
        (name = "Products", description = "Product catalog endpoints"),
        (name = "Categories", description = "Category endpoints"),
        (name = "Orders", description = "Order endpoints"),
        (name = "Invoices", description = "PDF invoice endpoints"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
