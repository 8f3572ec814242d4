use chrono::{TimeZone, Utc};
use storefront_api::{
    config::SellerInfo,
    invoice::{InvoiceRenderer, ROW_HEIGHT, TABLE_TOP, format, row_y, totals_layout},
    models::{Customer, Order, OrderItem, OrderStatus, OrderType, PaymentStatus},
};
use uuid::Uuid;

fn sample_order(items: usize, discount: f64) -> Order {
    let order_items = (0..items)
        .map(|i| OrderItem {
            product: Uuid::new_v4(),
            name: format!("Article {}", i + 1),
            quantity: 2,
            price: 10.0,
        })
        .collect::<Vec<_>>();
    let subtotal: f64 = order_items.iter().map(|i| i.price * f64::from(i.quantity)).sum();

    Order {
        id: Uuid::new_v4(),
        order_number: "ORD-1700000000000-0001".into(),
        user: None,
        customer: Customer {
            name: "Jean Dupont".into(),
            email: Some("jean@example.com".into()),
            phone: "+33 6 12 34 56 78".into(),
            address: None,
        },
        order_items,
        subtotal,
        tax: subtotal * 0.2,
        discount,
        total: subtotal + subtotal * 0.2 - discount,
        order_type: OrderType::Whatsapp,
        status: OrderStatus::Pending,
        payment_status: PaymentStatus::Pending,
        notes: None,
        created_at: Utc.with_ymd_and_hms(2026, 1, 15, 10, 30, 0).unwrap(),
    }
}

#[test]
fn item_rows_start_below_table_header() {
    assert_eq!(row_y(0), TABLE_TOP + ROW_HEIGHT);
    assert_eq!(row_y(3), TABLE_TOP + 4.0 * ROW_HEIGHT);
}

#[test]
fn totals_block_follows_last_item_row() {
    let layout = totals_layout(2, false);
    assert_eq!(layout.subtotal_y, row_y(1) + 40.0);
    assert_eq!(layout.discount_y, None);
    assert_eq!(layout.tax_y, layout.subtotal_y + 20.0);
    assert_eq!(layout.total_y, layout.tax_y + 25.0);
}

#[test]
fn discount_row_pushes_tax_and_total_down() {
    let without = totals_layout(2, false);
    let with = totals_layout(2, true);

    assert_eq!(with.subtotal_y, without.subtotal_y);
    assert_eq!(with.discount_y, Some(with.subtotal_y + 20.0));
    assert_eq!(with.tax_y, without.tax_y + 20.0);
    assert_eq!(with.total_y, without.total_y + 20.0);
}

#[test]
fn render_produces_pdf_bytes() {
    let renderer = InvoiceRenderer::new(SellerInfo::from_env());
    let bytes = renderer.render(&sample_order(3, 0.0)).unwrap();
    assert!(bytes.starts_with(b"%PDF"));
}

#[test]
fn render_handles_discount_and_full_address() {
    let renderer = InvoiceRenderer::new(SellerInfo::from_env());
    let mut order = sample_order(1, 5.0);
    order.customer.address = Some(storefront_api::models::Address {
        street: Some("12 Rue des Lilas".into()),
        city: Some("Lyon".into()),
        state: None,
        zip_code: Some("69003".into()),
        country: Some("France".into()),
    });
    let bytes = renderer.render(&order).unwrap();
    assert!(bytes.starts_with(b"%PDF"));
}

#[test]
fn currency_uses_french_conventions() {
    assert_eq!(format::format_currency(1234.56), "1\u{a0}234,56\u{a0}€");
    assert_eq!(format::format_currency(0.0), "0,00\u{a0}€");
    assert_eq!(format::format_currency(7.5), "7,50\u{a0}€");
    assert_eq!(format::format_currency(-5.5), "-5,50\u{a0}€");
    assert_eq!(format::format_currency(1_000_000.0), "1\u{a0}000\u{a0}000,00\u{a0}€");
}

#[test]
fn currency_rounds_to_cents() {
    assert_eq!(format::format_currency(19.999), "20,00\u{a0}€");
    assert_eq!(format::format_currency(0.005), "0,01\u{a0}€");
}

#[test]
fn dates_render_in_french() {
    let date = Utc.with_ymd_and_hms(2026, 1, 15, 10, 30, 0).unwrap();
    assert_eq!(format::format_date(date), "15 janvier 2026");

    let date = Utc.with_ymd_and_hms(2025, 8, 1, 0, 0, 0).unwrap();
    assert_eq!(format::format_date(date), "1 août 2025");
}

#[test]
fn status_labels_are_french_with_verbatim_fallback() {
    assert_eq!(format::status_label("pending"), "En attente");
    assert_eq!(format::status_label("confirmed"), "Confirmée");
    assert_eq!(format::status_label("processing"), "En traitement");
    assert_eq!(format::status_label("shipped"), "Expédiée");
    assert_eq!(format::status_label("delivered"), "Livrée");
    assert_eq!(format::status_label("cancelled"), "Annulée");
    assert_eq!(format::status_label("archived"), "archived");
}

#[test]
fn order_type_labels_are_french_with_verbatim_fallback() {
    assert_eq!(format::order_type_label("whatsapp"), "WhatsApp");
    assert_eq!(format::order_type_label("pos"), "Point de vente");
    assert_eq!(format::order_type_label("online"), "En ligne");
    assert_eq!(format::order_type_label("kiosk"), "kiosk");
}
