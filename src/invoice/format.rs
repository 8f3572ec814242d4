use chrono::{DateTime, Locale, Utc};

/// Two-decimal French EUR formatting: comma decimal separator, non-breaking
/// thousands groups, suffixed symbol (`1 234,56 €`).
pub fn format_currency(amount: f64) -> String {
    let sign = if amount < 0.0 { "-" } else { "" };
    let cents = (amount.abs() * 100.0).round() as i64;
    let whole = (cents / 100).to_string();
    let frac = cents % 100;

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, c) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push('\u{a0}');
        }
        grouped.push(c);
    }

    format!("{sign}{grouped},{frac:02}\u{a0}€")
}

/// Localized long form: day, full French month name, year.
pub fn format_date(date: DateTime<Utc>) -> String {
    date.format_localized("%-d %B %Y", Locale::fr_FR).to_string()
}

/// Display label for an order status. Unknown values pass through verbatim
/// so documents for forward-compatible data still render.
pub fn status_label(status: &str) -> &str {
    match status {
        "pending" => "En attente",
        "confirmed" => "Confirmée",
        "processing" => "En traitement",
        "shipped" => "Expédiée",
        "delivered" => "Livrée",
        "cancelled" => "Annulée",
        other => other,
    }
}

/// Display label for an order channel, same fallback rule.
pub fn order_type_label(order_type: &str) -> &str {
    match order_type {
        "whatsapp" => "WhatsApp",
        "pos" => "Point de vente",
        "online" => "En ligne",
        other => other,
    }
}
