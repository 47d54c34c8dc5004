//! Plain-text invoice and revenue report rendering

use crate::orders::money::format_amount;
use chrono::{TimeZone, Utc};
use shared::models::{OrderDetail, Payment, PaymentLine};

const RULE_WIDTH: usize = 56;

/// `YYYY-MM-DD HH:MM` (UTC) for a millisecond timestamp
pub fn format_timestamp(millis: i64) -> String {
    Utc.timestamp_millis_opt(millis)
        .single()
        .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| millis.to_string())
}

fn rule(c: char) -> String {
    std::iter::repeat_n(c, RULE_WIDTH).collect()
}

/// Invoice body for a settled (or about to be settled) order
pub fn render_invoice(restaurant: &str, detail: &OrderDetail, payment: Option<&Payment>) -> String {
    let order = &detail.order;
    let mut out = String::new();

    out.push_str(&format!("{restaurant} - INVOICE\n"));
    out.push_str(&rule('='));
    out.push('\n');
    out.push_str(&format!("Order no.:  {}\n", order.id));
    out.push_str(&format!("Date:       {}\n", format_timestamp(order.created_at)));
    out.push_str(&format!(
        "Customer:   {}\n",
        detail.customer_name.as_deref().unwrap_or("Walk-in")
    ));
    if let Some(email) = &detail.customer_email {
        out.push_str(&format!("Email:      {email}\n"));
    }
    if let Some(table) = &detail.table_name {
        out.push_str(&format!("Table:      {table}\n"));
    }
    out.push_str(&rule('-'));
    out.push('\n');

    out.push_str(&format!(
        "{:<24}{:>6}{:>12}{:>14}\n",
        "Item", "Qty", "Unit", "Total"
    ));
    for item in &detail.items {
        out.push_str(&format!(
            "{:<24}{:>6}{:>12}{:>14}\n",
            truncate(&item.product_name, 23),
            item.quantity,
            format_amount(item.unit_price),
            format_amount(item.line_total)
        ));
    }
    out.push_str(&rule('-'));
    out.push('\n');
    out.push_str(&format!("{:<42}{:>14}\n", "TOTAL", format_amount(order.total_amount)));

    if let Some(payment) = payment {
        out.push('\n');
        out.push_str(&format!("Paid by:     {}\n", payment.method));
        if let Some(last4) = &payment.card_last4 {
            out.push_str(&format!("Card:        **** {last4}\n"));
        }
        out.push_str(&format!("Transaction: {}\n", payment.transaction_id));
        out.push_str(&format!("Paid at:     {}\n", format_timestamp(payment.created_at)));
    }

    out.push('\n');
    out.push_str("Thank you for dining with us!\n");
    out
}

fn truncate(s: &str, max_chars: usize) -> String {
    s.chars().take(max_chars).collect()
}

fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// Spreadsheet-importable CSV of payments
pub fn revenue_csv(lines: &[PaymentLine]) -> String {
    let mut out = String::from("payment_id,order_id,table,customer,amount,method,transaction_id,paid_at\n");
    for line in lines {
        let row = [
            line.payment_id.to_string(),
            line.order_id.to_string(),
            line.table_name.clone().unwrap_or_default(),
            line.customer_name.clone().unwrap_or_default(),
            format_amount(line.amount),
            line.method.to_string(),
            line.transaction_id.clone(),
            format_timestamp(line.created_at),
        ];
        let row: Vec<String> = row.iter().map(|f| csv_field(f)).collect();
        out.push_str(&row.join(","));
        out.push('\n');
    }
    out
}

/// Human-readable revenue report
pub fn revenue_text(restaurant: &str, lines: &[PaymentLine], generated_at: i64) -> String {
    let total: f64 = crate::orders::money::round_money(lines.iter().map(|l| l.amount).sum());
    let mut out = String::new();

    out.push_str(&format!("{restaurant} - REVENUE REPORT\n"));
    out.push_str(&rule('='));
    out.push('\n');
    out.push_str(&format!("Generated:  {}\n", format_timestamp(generated_at)));
    out.push_str(&format!("Payments:   {}\n", lines.len()));
    out.push_str(&format!("Revenue:    {}\n", format_amount(total)));
    out.push_str(&rule('-'));
    out.push('\n');

    out.push_str(&format!(
        "{:<6}{:<7}{:<8}{:<14}{:>10}  {:<6}{}\n",
        "Pay", "Order", "Table", "Customer", "Amount", "Method", "Date"
    ));
    for line in lines {
        out.push_str(&format!(
            "{:<6}{:<7}{:<8}{:<14}{:>10}  {:<6}{}\n",
            line.payment_id,
            line.order_id,
            truncate(line.table_name.as_deref().unwrap_or("N/A"), 7),
            truncate(line.customer_name.as_deref().unwrap_or("N/A"), 13),
            format_amount(line.amount),
            line.method,
            format_timestamp(line.created_at)
        ));
    }
    out
}
