//! Message formatting for stock alerts and the daily report

use chrono::{DateTime, TimeZone};

use crate::notifier::Notification;
use crate::product::display_name;
use crate::state::ProductStatus;

pub const STOCK_ALERT_TITLE: &str = "Microcenter Stock Alert!";
pub const DAILY_REPORT_TITLE: &str = "StockSmart Daily Report";

/// Alert for a product that just came into stock
pub fn stock_alert(product_url: &str) -> Notification {
    Notification::new(
        STOCK_ALERT_TITLE,
        format!(
            "{} is now IN STOCK!\n\n{}",
            display_name(product_url),
            product_url
        ),
    )
}

/// Summary of every product's last observed status
pub fn daily_report<Z>(now: &DateTime<Z>, statuses: &[ProductStatus]) -> Notification
where
    Z: TimeZone,
    Z::Offset: std::fmt::Display,
{
    let in_stock = statuses.iter().filter(|s| s.in_stock).count();
    let out_of_stock = statuses.len() - in_stock;

    let mut lines = vec![
        format!(
            "Daily Status Report - {}\n",
            now.format("%Y-%m-%d %I:%M %p %Z")
        ),
        format!("In Stock: {} | Out of Stock: {}\n", in_stock, out_of_stock),
    ];
    lines.extend(statuses.iter().map(|s| {
        format!(
            "- {}: {}",
            display_name(&s.url),
            if s.in_stock { "IN STOCK" } else { "Out of Stock" }
        )
    }));

    Notification::new(DAILY_REPORT_TITLE, lines.join("\n"))
}
