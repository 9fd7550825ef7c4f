//! Display formatting for amounts.
//!
//! Storage and comparison always use the raw [`Decimal`]; these helpers are
//! for presentation only.

use emanet_shared::DisplayConfig;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::registry::{Lookup, Unit, ValueType};

/// Label shown for a value type that no longer exists.
pub const UNKNOWN_TYPE_LABEL: &str = "Bilinmeyen tür";

/// Formats a number with fixed fraction digits and grouped thousands.
///
/// Rounds half away from zero. With the default config `1234.5` renders as
/// `1.234,50`.
#[must_use]
pub fn format_number(amount: Decimal, display: &DisplayConfig) -> String {
    let mut rounded =
        amount.round_dp_with_strategy(display.decimals, RoundingStrategy::MidpointAwayFromZero);
    let negative = rounded < Decimal::ZERO;
    rounded = rounded.abs();
    rounded.rescale(display.decimals);

    let text = rounded.to_string();
    let (integer, fraction) = text.split_once('.').unwrap_or((text.as_str(), ""));

    let mut grouped = String::with_capacity(text.len() + integer.len() / 3 + 1);
    if negative {
        grouped.push('-');
    }
    for (i, digit) in integer.chars().enumerate() {
        if i > 0 && (integer.len() - i) % 3 == 0 {
            grouped.push_str(&display.thousands_separator);
        }
        grouped.push(digit);
    }
    if !fraction.is_empty() {
        grouped.push_str(&display.decimal_separator);
        grouped.push_str(fraction);
    }
    grouped
}

/// Display name of a resolved value type.
#[must_use]
pub fn value_type_label<'a>(value_type: &Lookup<&'a ValueType>) -> &'a str {
    match value_type {
        Lookup::Found(t) => t.name.as_str(),
        Lookup::NotFound => UNKNOWN_TYPE_LABEL,
    }
}

/// Formats an amount followed by the unit suffix of its value type.
///
/// An unknown value type renders the number alone.
#[must_use]
pub fn format_amount_with_unit(
    amount: Decimal,
    value_type: &Lookup<&ValueType>,
    display: &DisplayConfig,
) -> String {
    let number = format_number(amount, display);
    match value_type {
        Lookup::Found(t) => format!("{number} {}", t.unit.suffix(&display.currency_code)),
        Lookup::NotFound => number,
    }
}

/// Formats a signed net position: `+` or `-` followed by the absolute amount.
///
/// Exact zero renders without decimals (`0 gram`); an unknown type falls back
/// to the currency suffix.
#[must_use]
pub fn format_net(net: Decimal, value_type: &Lookup<&ValueType>, display: &DisplayConfig) -> String {
    if net.is_zero() {
        let unit = match value_type {
            Lookup::Found(t) => t.unit,
            Lookup::NotFound => Unit::Currency,
        };
        return format!("0 {}", unit.suffix(&display.currency_code));
    }
    let sign = if net.is_sign_negative() { '-' } else { '+' };
    format!(
        "{sign}{}",
        format_amount_with_unit(net.abs(), value_type, display)
    )
}
