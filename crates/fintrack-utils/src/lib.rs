//! Utility functions and helpers
//!
//! Display formatting is pinned to the en-IN locale with INR as currency.

use chrono::{DateTime, Datelike, NaiveDate};
use rust_decimal::{Decimal, RoundingStrategy};

const RUPEE: &str = "₹";

/// Group an integer digit string the Indian way (12,34,567)
pub fn group_indian(digits: &str) -> String {
    if digits.len() <= 3 {
        return digits.to_string();
    }
    let (head, tail) = digits.split_at(digits.len() - 3);
    let mut groups: Vec<&str> = Vec::new();
    let mut end = head.len();
    while end > 0 {
        let start = end.saturating_sub(2);
        groups.push(&head[start..end]);
        end = start;
    }
    groups.reverse();
    format!("{},{}", groups.join(","), tail)
}

/// Format an amount with Indian grouping and two decimals, without a symbol
pub fn format_amount(amount: Decimal) -> String {
    let (negative, body) = split_amount(amount);
    if negative {
        format!("-{}", body)
    } else {
        body
    }
}

/// Format an amount as INR currency, e.g. `₹1,234.50`
pub fn format_currency(amount: Decimal) -> String {
    let (negative, body) = split_amount(amount);
    if negative {
        format!("-{}{}", RUPEE, body)
    } else {
        format!("{}{}", RUPEE, body)
    }
}

fn split_amount(amount: Decimal) -> (bool, String) {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let negative = rounded.is_sign_negative() && !rounded.is_zero();
    let text = format!("{:.2}", rounded.abs());
    let (int_part, frac_part) = text.split_once('.').unwrap_or((text.as_str(), "00"));
    (negative, format!("{}.{}", group_indian(int_part), frac_part))
}

/// Format a date the en-IN way (D/M/YYYY)
pub fn format_naive_date(date: NaiveDate) -> String {
    format!("{}/{}/{}", date.day(), date.month(), date.year())
}

/// Format an ISO date or RFC 3339 timestamp; unparseable input is returned as is
pub fn format_date(date_str: &str) -> String {
    let trimmed = date_str.trim();
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return format_naive_date(date);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return format_naive_date(dt.date_naive());
    }
    date_str.to_string()
}

/// Escape text before interpolating it into HTML
pub fn escape_html(content: &str) -> String {
    let mut out = String::with_capacity(content.len());
    for c in content.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
