//! PDF invoice rendering.
//!
//! The layout is a fixed single page: header block, customer/metadata block,
//! line-item table, totals, footer. Rows sit at hand-computed vertical
//! offsets measured in points from the top of a Letter page; very long item
//! lists overrun the page rather than paginate.

use printpdf::{
    BuiltinFont, Color, IndirectFontRef, Line, Mm, PdfDocument, PdfLayerReference, Point, Pt, Rgb,
};

use crate::config::SellerInfo;
use crate::models::Order;

pub mod format;

use format::{format_currency, format_date, order_type_label, status_label};

const PAGE_WIDTH: f32 = 612.0;
const PAGE_HEIGHT: f32 = 792.0;

const MARGIN_LEFT: f32 = 50.0;
const RULE_RIGHT: f32 = 550.0;

pub const TABLE_TOP: f32 = 330.0;
pub const ROW_HEIGHT: f32 = 30.0;

const COL_ARTICLE: f32 = 50.0;
const COL_QUANTITY: f32 = 300.0;
const COL_UNIT_PRICE: f32 = 390.0;
const COL_TOTAL: f32 = 480.0;

const BODY_SIZE: f32 = 10.0;
const TITLE_SIZE: f32 = 20.0;

/// Top-based y position of line-item row `index`.
pub fn row_y(index: usize) -> f32 {
    TABLE_TOP + ROW_HEIGHT + index as f32 * ROW_HEIGHT
}

/// Vertical offsets of the totals block. The discount row, when present,
/// pushes the tax and total rows 20pt further down.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TotalsLayout {
    pub subtotal_y: f32,
    pub discount_y: Option<f32>,
    pub tax_y: f32,
    pub total_y: f32,
}

pub fn totals_layout(item_count: usize, has_discount: bool) -> TotalsLayout {
    let last_row = if item_count == 0 {
        TABLE_TOP + ROW_HEIGHT
    } else {
        row_y(item_count - 1)
    };
    let subtotal_y = last_row + 40.0;
    let discount_y = has_discount.then_some(subtotal_y + 20.0);
    let tax_y = subtotal_y + if has_discount { 40.0 } else { 20.0 };
    TotalsLayout {
        subtotal_y,
        discount_y,
        tax_y,
        total_y: tax_y + 25.0,
    }
}

/// Projects a persisted order into a single-page PDF document.
#[derive(Debug, Clone)]
pub struct InvoiceRenderer {
    seller: SellerInfo,
}

impl InvoiceRenderer {
    pub fn new(seller: SellerInfo) -> Self {
        Self { seller }
    }

    pub fn render(&self, order: &Order) -> anyhow::Result<Vec<u8>> {
        let (doc, page, layer) = PdfDocument::new(
            format!("Facture {}", order.order_number),
            Mm::from(Pt(PAGE_WIDTH)),
            Mm::from(Pt(PAGE_HEIGHT)),
            "Page 1",
        );
        let layer = doc.get_page(page).get_layer(layer);
        let regular = doc.add_builtin_font(BuiltinFont::Helvetica)?;
        let bold = doc.add_builtin_font(BuiltinFont::HelveticaBold)?;

        layer.set_fill_color(text_color());
        layer.set_outline_color(rule_color());
        layer.set_outline_thickness(1.0);

        self.draw_header(&layer, &regular);
        draw_customer_block(&layer, &regular, &bold, order);
        draw_item_table(&layer, &regular, &bold, order);
        draw_footer(&layer, &regular);

        Ok(doc.save_to_bytes()?)
    }

    fn draw_header(&self, layer: &PdfLayerReference, font: &IndirectFontRef) {
        let s = &self.seller;
        text(layer, font, &s.name, TITLE_SIZE, MARGIN_LEFT, 45.0);
        text(layer, font, &s.address, BODY_SIZE, MARGIN_LEFT, 70.0);
        text(layer, font, &s.city, BODY_SIZE, MARGIN_LEFT, 85.0);
        text(layer, font, &format!("Tél: {}", s.phone), BODY_SIZE, MARGIN_LEFT, 100.0);
        text(layer, font, &format!("Email: {}", s.email), BODY_SIZE, MARGIN_LEFT, 115.0);
        text(layer, font, &format!("SIRET: {}", s.siret), BODY_SIZE, MARGIN_LEFT, 130.0);
        text(layer, font, &format!("TVA: {}", s.tva), BODY_SIZE, MARGIN_LEFT, 145.0);
    }
}

fn draw_customer_block(
    layer: &PdfLayerReference,
    regular: &IndirectFontRef,
    bold: &IndirectFontRef,
    order: &Order,
) {
    let top = 200.0;

    text(layer, regular, "FACTURE", TITLE_SIZE, MARGIN_LEFT, top);
    text(
        layer,
        regular,
        &format!("Numéro: {}", order.order_number),
        BODY_SIZE,
        MARGIN_LEFT,
        top + 30.0,
    );
    text(
        layer,
        regular,
        &format!("Date: {}", format_date(order.created_at)),
        BODY_SIZE,
        MARGIN_LEFT,
        top + 45.0,
    );
    text(
        layer,
        regular,
        &format!("Statut: {}", status_label(order.status.as_str())),
        BODY_SIZE,
        MARGIN_LEFT,
        top + 60.0,
    );
    text(
        layer,
        regular,
        &format!("Type: {}", order_type_label(order.order_type.as_str())),
        BODY_SIZE,
        MARGIN_LEFT,
        top + 75.0,
    );

    let right = 300.0;
    text(layer, regular, "Facturé à:", BODY_SIZE, right, top);
    text(layer, bold, &order.customer.name, BODY_SIZE, right, top + 15.0);
    text(layer, regular, &order.customer.phone, BODY_SIZE, right, top + 30.0);

    if let Some(email) = &order.customer.email {
        text(layer, regular, email, BODY_SIZE, right, top + 45.0);
    }

    if let Some(address) = &order.customer.address {
        if let Some(street) = &address.street {
            text(layer, regular, street, BODY_SIZE, right, top + 60.0);
            if let Some(city) = &address.city {
                text(layer, regular, city, BODY_SIZE, right, top + 75.0);
            }
        }
    }
}

fn draw_item_table(
    layer: &PdfLayerReference,
    regular: &IndirectFontRef,
    bold: &IndirectFontRef,
    order: &Order,
) {
    table_row(layer, bold, TABLE_TOP, "Article", "Quantité", "Prix unitaire", "Total");
    rule(layer, TABLE_TOP + 20.0);

    for (i, item) in order.order_items.iter().enumerate() {
        let y = row_y(i);
        table_row(
            layer,
            regular,
            y,
            &item.name,
            &item.quantity.to_string(),
            &format_currency(item.price),
            &format_currency(item.price * f64::from(item.quantity)),
        );
        rule(layer, y + 20.0);
    }

    let totals = totals_layout(order.order_items.len(), order.discount > 0.0);

    amount_row(
        layer,
        regular,
        totals.subtotal_y,
        "Sous-total:",
        &format_currency(order.subtotal),
    );
    if let Some(y) = totals.discount_y {
        amount_row(
            layer,
            regular,
            y,
            "Remise:",
            &format!("-{}", format_currency(order.discount)),
        );
    }
    amount_row(layer, regular, totals.tax_y, "TVA:", &format_currency(order.tax));
    amount_row(layer, bold, totals.total_y, "TOTAL:", &format_currency(order.total));
}

fn draw_footer(layer: &PdfLayerReference, font: &IndirectFontRef) {
    let message =
        "Merci pour votre confiance. Pour toute question concernant cette facture, contactez-nous.";
    // Approximate centering from Helvetica's average advance width.
    let width = message.chars().count() as f32 * BODY_SIZE * 0.5;
    let x = (MARGIN_LEFT + (500.0 - width) / 2.0).max(MARGIN_LEFT);
    text(layer, font, message, BODY_SIZE, x, 780.0);
}

fn table_row(
    layer: &PdfLayerReference,
    font: &IndirectFontRef,
    y: f32,
    article: &str,
    quantity: &str,
    unit_price: &str,
    line_total: &str,
) {
    text(layer, font, article, BODY_SIZE, COL_ARTICLE, y);
    text(layer, font, quantity, BODY_SIZE, COL_QUANTITY, y);
    text(layer, font, unit_price, BODY_SIZE, COL_UNIT_PRICE, y);
    text(layer, font, line_total, BODY_SIZE, COL_TOTAL, y);
}

fn amount_row(
    layer: &PdfLayerReference,
    font: &IndirectFontRef,
    y: f32,
    label: &str,
    amount: &str,
) {
    text(layer, font, label, BODY_SIZE, COL_UNIT_PRICE, y);
    text(layer, font, amount, BODY_SIZE, COL_TOTAL, y);
}

/// Place text at a top-based offset; PDF user space grows upward, so the
/// baseline is the page height minus the offset and the font ascent.
fn text(
    layer: &PdfLayerReference,
    font: &IndirectFontRef,
    content: &str,
    size: f32,
    x: f32,
    y_top: f32,
) {
    layer.use_text(
        content,
        size,
        Mm::from(Pt(x)),
        Mm::from(Pt(PAGE_HEIGHT - y_top - size)),
        font,
    );
}

fn rule(layer: &PdfLayerReference, y_top: f32) {
    let y = Mm::from(Pt(PAGE_HEIGHT - y_top));
    let line = Line {
        points: vec![
            (Point::new(Mm::from(Pt(MARGIN_LEFT)), y), false),
            (Point::new(Mm::from(Pt(RULE_RIGHT)), y), false),
        ],
        is_closed: false,
    };
    layer.add_line(line);
}

fn text_color() -> Color {
    Color::Rgb(Rgb::new(0.267, 0.267, 0.267, None))
}

fn rule_color() -> Color {
    Color::Rgb(Rgb::new(0.667, 0.667, 0.667, None))
}
