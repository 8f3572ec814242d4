use crate::db::{DbPool, OrmConn};
use crate::invoice::InvoiceRenderer;

#[derive(Clone)]
pub struct AppState {
    pub pool: DbPool,
    pub orm: OrmConn,
    pub invoices: InvoiceRenderer,
}
