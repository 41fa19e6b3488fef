//! Display formatting of row values.

use rust_decimal::{Decimal, RoundingStrategy};

use super::types::{FormatKind, FormatSpec};

/// Marker shown in place of a value whose expression failed.
pub const ERROR_MARKER: &str = "#ERR";

/// Formats `value` for display.
///
/// Currency values get `currency_symbol` after the sign, percent values a
/// trailing `%`; every kind groups thousands with commas. Integers ignore
/// `decimals`.
#[must_use]
pub fn format_value(value: Decimal, spec: &FormatSpec, currency_symbol: &str) -> String {
    let decimals = match spec.kind {
        FormatKind::Integer => 0,
        _ => spec.decimals,
    };
    let rounded = value.round_dp_with_strategy(decimals, RoundingStrategy::MidpointAwayFromZero);
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    let digits = group_thousands(rounded.abs(), decimals);
    match spec.kind {
        FormatKind::Currency => format!("{sign}{currency_symbol}{digits}"),
        FormatKind::Percent => format!("{sign}{digits}%"),
        FormatKind::Integer | FormatKind::Decimal => format!("{sign}{digits}"),
    }
}

/// Formats an optional value, empty when absent.
#[must_use]
pub fn format_optional(value: Option<Decimal>, spec: &FormatSpec, currency_symbol: &str) -> String {
    value.map_or_else(String::new, |v| format_value(v, spec, currency_symbol))
}

fn group_thousands(value: Decimal, decimals: u32) -> String {
    let text = format!("{value:.prec$}", prec = decimals as usize);
    let (int_part, frac_part) = match text.split_once('.') {
        Some((int_part, frac_part)) => (int_part, Some(frac_part)),
        None => (text.as_str(), None),
    };

    let mut grouped = String::with_capacity(text.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if let Some(frac) = frac_part {
        grouped.push('.');
        grouped.push_str(frac);
    }
    grouped
}
