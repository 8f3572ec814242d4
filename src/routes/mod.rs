use axum::Router;
use axum::routing::get;

use crate::state::AppState;

pub mod auth;
pub mod categories;
pub mod doc;
pub mod health;
pub mod invoices;
pub mod orders;
pub mod params;
pub mod products;

// Build the API router without binding state; it is provided at the top level.
pub fn create_api_router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health_check))
        .nest("/auth", auth::router())
        .nest("/products", products::router())
        .nest("/categories", categories::router())
        .nest("/orders", orders::router())
        .nest("/invoices", invoices::router())
}
