use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin},
    services::order_service,
    state::AppState,
};

/// A rendered invoice ready to stream: document bytes plus the order number
/// used for the attachment filename.
#[derive(Debug)]
pub struct RenderedInvoice {
    pub order_number: String,
    pub bytes: Vec<u8>,
}

pub async fn generate_invoice(
    state: &AppState,
    user: &AuthUser,
    order_id: Uuid,
) -> AppResult<RenderedInvoice> {
    ensure_admin(user)?;

    // The not-found check runs before any document assembly so callers get a
    // clean 404 instead of a truncated PDF.
    let order = order_service::find_order(state, order_id).await?;

    let bytes = state
        .invoices
        .render(&order)
        .map_err(AppError::Internal)?;

    tracing::debug!(order_number = %order.order_number, size = bytes.len(), "invoice rendered");

    Ok(RenderedInvoice {
        order_number: order.order_number,
        bytes,
    })
}
