//! Formatting of money and playtime for display.

use crate::types::{Cents, Minutes};

/// Formats a whole number with comma thousands separators.
pub fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);

    for (i, digit) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }

        grouped.push(digit);
    }

    grouped
}

/// Formats an amount of cents as US dollars, e.g. `$1,234.56`.
pub fn format_usd_cents(cents: Cents) -> String {
    format!("${}.{:02}", group_thousands(cents / 100), cents % 100)
}

/// Formats a dollar amount as US dollars rounded to the cent.
pub fn format_usd(dollars: f64) -> String {
    if !dollars.is_finite() || dollars <= 0.0 {
        return format_usd_cents(0);
    }

    format_usd_cents((dollars * 100.0).round() as Cents)
}

/// Playtime in hours with one decimal and thousands separators, e.g. `1,234.5 hrs`.
pub fn format_hours_precise(minutes: Minutes) -> String {
    let tenths = (minutes as f64 / 6.0).round() as u64;

    format!("{}.{} hrs", group_thousands(tenths / 10), tenths % 10)
}

/// Playtime in hours shortened for tight spaces, e.g. `950 hrs`, `12.3K hrs`, `1.2M hrs`.
pub fn format_hours_compact(minutes: Minutes) -> String {
    let hours = minutes as f64 / 60.0;

    if hours >= 1_000_000.0 {
        format!("{:.1}M hrs", hours / 1_000_000.0)
    } else if hours >= 1_000.0 {
        format!("{:.1}K hrs", hours / 1_000.0)
    } else {
        format!("{} hrs", hours.round() as u64)
    }
}
