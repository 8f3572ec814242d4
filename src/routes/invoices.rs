use axum::{
    Router,
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Response},
    routing::get,
};
use uuid::Uuid;

use crate::{
    error::AppResult,
    middleware::auth::AuthUser,
    services::invoice_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new().route("/{order_id}", get(download_invoice))
}

#[utoipa::path(
    get,
    path = "/api/invoices/{order_id}",
    params(("order_id" = Uuid, Path, description = "Order ID")),
    responses(
        (status = 200, description = "PDF invoice (admin only)", content_type = "application/pdf"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Order not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Invoices"
)]
pub async fn download_invoice(
    State(state): State<AppState>,
    user: AuthUser,
    Path(order_id): Path<Uuid>,
) -> AppResult<Response> {
    let invoice = invoice_service::generate_invoice(&state, &user, order_id).await?;

    let headers = [
        (header::CONTENT_TYPE, "application/pdf".to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"facture-{}.pdf\"", invoice.order_number),
        ),
    ];
    Ok((headers, invoice.bytes).into_response())
}
