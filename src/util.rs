// Numeric normalization and number formatting.
//
// Inventory exports carry quantities as locale-formatted text ("16,384",
// " 2 048 ", ""). Everything that turns such a cell into a number lives here
// so the loader and the engine only ever see finite, non-negative values.
use num_format::{Locale, ToFormattedString};

/// Characters stripped as thousands separators before parsing. `.` is never
/// treated as a grouping mark; it is always the decimal point.
const GROUPING_SEPARATORS: [char; 6] = [',', '_', '\'', ' ', '\u{a0}', '\u{202f}'];

/// Parse a raw cell into a number, or `None` if it is empty, unparseable or
/// not finite.
///
/// - Trims surrounding whitespace.
/// - Strips grouping separators like `","`.
/// - Keeps the sign, so callers can tell a negative value from garbage.
pub fn parse_quantity(raw: &str) -> Option<f64> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    let cleaned: String = s.chars().filter(|c| !GROUPING_SEPARATORS.contains(c)).collect();
    match cleaned.parse::<f64>() {
        Ok(v) if v.is_finite() => Some(v),
        _ => None,
    }
}

/// Lenient normalization: anything that is not a finite non-negative number
/// becomes `0.0`. Never fails.
pub fn normalize_quantity(raw: &str) -> f64 {
    match parse_quantity(raw) {
        Some(v) if v > 0.0 => v,
        _ => 0.0,
    }
}

/// Whether normalizing `raw` replaced its content with zero. Blank cells only
/// count when the field is required to carry a value.
pub fn is_coerced(raw: &str, required: bool) -> bool {
    if raw.trim().is_empty() {
        return required;
    }
    !matches!(parse_quantity(raw), Some(v) if v >= 0.0)
}

/// Case-insensitive RHEL family detection on a guest OS label.
pub fn is_rhel_like(os_label: &str) -> bool {
    let lower = os_label.to_lowercase();
    lower.contains("red hat") || lower.contains("rhel")
}

pub fn percent(part: f64, whole: f64) -> f64 {
    // Share of `whole` in percent; 0 for an empty whole to avoid NaNs.
    if whole <= 0.0 {
        return 0.0;
    }
    part / whole * 100.0
}

pub fn format_number(n: f64, decimals: usize) -> String {
    // Fixed decimals plus thousands separators, e.g. `1,234,567.89`.
    let neg = n.is_sign_negative() && n != 0.0;
    let s = format!("{:.*}", decimals, n.abs());
    let mut parts = s.split('.');
    let int_part = parts.next().unwrap_or("0");
    let frac_part = parts.next();
    let int_val: i64 = int_part.parse().unwrap_or(0);
    let mut res = int_val.to_formatted_string(&Locale::en);
    if let Some(frac) = frac_part {
        res.push('.');
        res.push_str(frac);
    }
    // Rounding can turn a tiny negative into "0.00"; drop the sign then.
    if neg && res.chars().any(|c| c.is_ascii_digit() && c != '0') {
        format!("-{}", res)
    } else {
        res
    }
}

pub fn format_int<T>(n: T) -> String
where
    T: ToFormattedString,
{
    n.to_formatted_string(&Locale::en)
}
