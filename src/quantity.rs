//! Ingredient quantity parsing and formatting.
//!
//! Recipe quantities arrive as free-form strings ("1 1/2", "2.5", "a pinch").
//! Parsing is total: anything unrecognized stays opaque text, and every
//! operation degrades to a readable fallback instead of failing.

/// Fractions used when rendering decimal amounts back to cook-friendly text.
const COMMON_FRACTIONS: &[(f64, &str)] = &[
    (0.125, "1/8"),
    (0.25, "1/4"),
    (1.0 / 3.0, "1/3"),
    (0.375, "3/8"),
    (0.5, "1/2"),
    (0.625, "5/8"),
    (2.0 / 3.0, "2/3"),
    (0.75, "3/4"),
    (0.875, "7/8"),
];

/// Maximum distance from a common fraction for snapping during formatting.
const FRACTION_SNAP_TOLERANCE: f64 = 0.05;

/// Parse a quantity string into a decimal value.
///
/// Handles:
/// - Integers: "8" → 8.0
/// - Decimals: "2.5" → 2.5
/// - Fractions: "1/2" → 0.5
/// - Mixed numbers: "1 1/2" → 1.5
///
/// Anything else (including a zero denominator) returns `None`.
pub fn parse_amount(amount: &str) -> Option<f64> {
    let amount = amount.trim();

    if amount.is_empty() {
        return None;
    }

    // Try mixed number: "1 1/2" or "2 3/4". Exactly one space, with the
    // fraction as the second token; looser spacing is not a number.
    let parts: Vec<&str> = amount.split(' ').collect();
    if parts.len() == 2 && parts[1].contains('/') {
        let whole: f64 = parts[0].parse().ok()?;
        let frac = parse_fraction(parts[1])?;
        return Some(whole + frac);
    }

    // Try fraction: "1/2"
    if amount.contains('/') {
        return parse_fraction(amount);
    }

    // Try decimal or integer
    amount.parse().ok()
}

/// Parse a fraction string like "1/2" or "3/4". No spaces around the
/// slash: "1 / 2" is rejected.
fn parse_fraction(s: &str) -> Option<f64> {
    let (num, denom) = s.split_once('/')?;
    let num: f64 = num.parse().ok()?;
    let denom: f64 = denom.parse().ok()?;
    if denom == 0.0 {
        return None;
    }
    Some(num / denom)
}

/// Format a decimal amount as cook-friendly text.
///
/// Whole values render bare ("2"). Values near a common fraction render as
/// fractions ("1 1/2"). Everything else keeps one decimal place, with a
/// trailing ".0" dropped.
pub fn format_amount(value: f64) -> String {
    let whole = value.trunc() as i64;
    let frac = value.fract();

    if frac == 0.0 {
        return whole.to_string();
    }

    // Snap to the nearest common fraction within tolerance.
    let snapped = COMMON_FRACTIONS
        .iter()
        .map(|(decimal, label)| ((frac - decimal).abs(), *label))
        .filter(|(distance, _)| *distance <= FRACTION_SNAP_TOLERANCE)
        .min_by(|a, b| a.0.total_cmp(&b.0));

    if let Some((_, label)) = snapped {
        return if whole == 0 {
            label.to_string()
        } else {
            format!("{} {}", whole, label)
        };
    }

    // Round to 1 decimal place using standard rounding (not banker's)
    let rounded = (value * 10.0).round() / 10.0;
    if rounded.fract() == 0.0 {
        format!("{:.0}", rounded)
    } else {
        format!("{:.1}", rounded)
    }
}

/// Combine two quantity strings, summing when both parse.
///
/// When either side is opaque text the originals are joined with " + " so
/// nothing is silently dropped from a grocery list.
pub fn combine_quantities(a: &str, b: &str) -> String {
    match (parse_amount(a), parse_amount(b)) {
        (Some(x), Some(y)) => format_amount(x + y),
        _ => format!("{} + {}", a, b),
    }
}

/// Scale a quantity string by a multiplier, as when adjusting servings.
///
/// Non-numeric quantities ("to taste") are returned unchanged.
pub fn scale_quantity(quantity: &str, multiplier: f64) -> String {
    match parse_amount(quantity) {
        Some(value) => format_amount(value * multiplier),
        None => quantity.to_string(),
    }
}

/// Render an ingredient line from its parts: quantity, unit, then name.
/// Absent or empty parts are skipped.
pub fn format_ingredient(name: &str, quantity: Option<&str>, unit: Option<&str>) -> String {
    let mut parts: Vec<&str> = Vec::new();
    if let Some(quantity) = quantity.filter(|q| !q.is_empty()) {
        parts.push(quantity);
    }
    if let Some(unit) = unit.filter(|u| !u.is_empty()) {
        parts.push(unit);
    }
    if !name.is_empty() {
        parts.push(name);
    }
    parts.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_amount_integer() {
        assert_eq!(parse_amount("8"), Some(8.0));
        assert_eq!(parse_amount("12"), Some(12.0));
    }

    #[test]
    fn test_parse_amount_decimal() {
        assert_eq!(parse_amount("2.5"), Some(2.5));
        assert_eq!(parse_amount("0.25"), Some(0.25));
    }

    #[test]
    fn test_parse_amount_fraction() {
        assert_eq!(parse_amount("1/2"), Some(0.5));
        assert_eq!(parse_amount("3/4"), Some(0.75));
        assert_eq!(parse_amount(" 1/4 "), Some(0.25));
    }

    #[test]
    fn test_parse_amount_mixed_number() {
        assert_eq!(parse_amount("1 1/2"), Some(1.5));
        assert_eq!(parse_amount("2 3/4"), Some(2.75));
    }

    #[test]
    fn test_parse_amount_rejects_garbage() {
        assert_eq!(parse_amount(""), None);
        assert_eq!(parse_amount("   "), None);
        assert_eq!(parse_amount("a pinch"), None);
        assert_eq!(parse_amount("1/0"), None);
        assert_eq!(parse_amount("one"), None);
    }

    #[test]
    fn test_parse_amount_rejects_loose_spacing() {
        // Only the exact "W N/D" and "N/D" shapes count as numbers.
        assert_eq!(parse_amount("1  1/2"), None);
        assert_eq!(parse_amount("1 / 2"), None);
        assert_eq!(parse_amount("1/ 2"), None);
        assert_eq!(parse_amount("1 /2"), None);
        assert_eq!(parse_amount("1 1 / 2"), None);
    }

    #[test]
    fn test_format_amount_whole() {
        assert_eq!(format_amount(5.0), "5");
        assert_eq!(format_amount(12.0), "12");
        assert_eq!(format_amount(0.0), "0");
    }

    #[test]
    fn test_format_amount_snaps_to_fractions() {
        assert_eq!(format_amount(0.5), "1/2");
        assert_eq!(format_amount(1.5), "1 1/2");
        assert_eq!(format_amount(0.25), "1/4");
        assert_eq!(format_amount(2.75), "2 3/4");
        assert_eq!(format_amount(1.0 / 3.0), "1/3");
        assert_eq!(format_amount(2.0 / 3.0), "2/3");
        // Within tolerance of a fraction.
        assert_eq!(format_amount(0.33), "1/3");
        assert_eq!(format_amount(0.66), "2/3");
    }

    #[test]
    fn test_format_amount_falls_back_to_decimal() {
        assert_eq!(format_amount(1.43), "1.4");
        assert_eq!(format_amount(0.05), "0.1");
        assert_eq!(format_amount(1.97), "2");
    }

    #[test]
    fn test_combine_quantities_numeric() {
        assert_eq!(combine_quantities("1/4", "3/4"), "1");
        assert_eq!(combine_quantities("1 1/2", "1/2"), "2");
        assert_eq!(combine_quantities("1", "0.5"), "1 1/2");
        assert_eq!(combine_quantities("1/3", "1/3"), "2/3");
    }

    #[test]
    fn test_combine_quantities_preserves_text() {
        assert_eq!(combine_quantities("a pinch", "a dash"), "a pinch + a dash");
        assert_eq!(combine_quantities("1", "to taste"), "1 + to taste");
    }

    #[test]
    fn test_scale_quantity() {
        assert_eq!(scale_quantity("1", 0.5), "1/2");
        assert_eq!(scale_quantity("1 1/2", 2.0), "3");
        assert_eq!(scale_quantity("2", 1.5), "3");
        assert_eq!(scale_quantity("3/4", 2.0), "1 1/2");
    }

    #[test]
    fn test_scale_quantity_text_unchanged() {
        assert_eq!(scale_quantity("to taste", 2.0), "to taste");
        assert_eq!(scale_quantity("a splash", 0.5), "a splash");
    }

    #[test]
    fn test_format_ingredient() {
        assert_eq!(
            format_ingredient("flour", Some("2"), Some("cups")),
            "2 cups flour"
        );
        assert_eq!(format_ingredient("salt", None, None), "salt");
        assert_eq!(format_ingredient("eggs", Some("3"), None), "3 eggs");
        assert_eq!(format_ingredient("butter", Some(""), Some("tbsp")), "tbsp butter");
    }
}
