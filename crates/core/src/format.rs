//! Display formatting for prices, dates and percentages.

use chrono::NaiveDate;

/// Placeholder shown for values that cannot be formatted.
pub const NOT_AVAILABLE: &str = "N/A";

/// Format a numeric string as a price: two decimal places with comma
/// thousands separators. Non-numeric input yields [`NOT_AVAILABLE`].
///
/// ```
/// use sitebook_core::format::format_price;
/// assert_eq!(format_price("1234567.891"), "1,234,567.89");
/// assert_eq!(format_price("abc"), "N/A");
/// ```
pub fn format_price(raw: &str) -> String {
    match raw.trim().parse::<f64>() {
        Ok(value) => format_amount(value),
        Err(_) => NOT_AVAILABLE.to_string(),
    }
}

/// Format a number with two decimals and thousands separators.
pub fn format_amount(value: f64) -> String {
    if !value.is_finite() {
        return NOT_AVAILABLE.to_string();
    }

    let fixed = format!("{:.2}", value.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    // Values that round to zero lose their sign.
    let sign = if value < 0.0 && fixed != "0.00" { "-" } else { "" };
    format!("{sign}{grouped}.{frac_part}")
}

/// [`format_amount`] with a currency symbol after the sign.
pub fn format_currency(value: f64, symbol: &str) -> String {
    let amount = format_amount(value);
    match amount.strip_prefix('-') {
        Some(rest) => format!("-{symbol}{rest}"),
        None if amount == NOT_AVAILABLE => amount,
        None => format!("{symbol}{amount}"),
    }
}

/// `DD/MM/YYYY`, or [`NOT_AVAILABLE`] when the date is unknown.
pub fn format_date(date: Option<NaiveDate>) -> String {
    date.map_or_else(
        || NOT_AVAILABLE.to_string(),
        |d| d.format("%d/%m/%Y").to_string(),
    )
}

/// One decimal place with a `%` suffix.
pub fn format_percentage(value: Option<f64>) -> String {
    match value {
        Some(v) if v.is_finite() => format!("{v:.1}%"),
        _ => NOT_AVAILABLE.to_string(),
    }
}
