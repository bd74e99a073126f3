//! Numeric input normalization for weight and stock fields
//!
//! Text typed into a completion form is reduced to a canonical value as it
//! arrives, so the draft never holds a malformed number:
//!
//! - weights are kilograms with at most three decimals, stored exactly as a
//!   whole number of grams ([`Weight`])
//! - stock counts are whole pieces (`u32`)
//!
//! # Example
//!
//! ```rust
//! use produksi::numeric::{format_for_display, normalize_decimal, Weight};
//!
//! let w = normalize_decimal("1.2.345kg", Weight::ZERO);
//! assert_eq!(w, Weight::from_grams(1_234));
//! assert_eq!(format_for_display(w), "1.234");
//! assert_eq!(format_for_display(Weight::ZERO), "");
//! ```

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::iter::Sum;
use std::ops::Add;

/// Decimal places kept for a weight in kilograms
pub const WEIGHT_DECIMALS: usize = 3;

const GRAMS_PER_KG: u64 = 1_000;

/// A non-negative weight, exact to the gram
///
/// Serializes as a JSON number of kilograms. Deserializes from a number or a
/// numeric string (decimal columns often arrive as `"10.500"`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Weight(u64);

impl Weight {
    pub const ZERO: Weight = Weight(0);

    pub const fn from_grams(grams: u64) -> Self {
        Self(grams)
    }

    pub const fn grams(self) -> u64 {
        self.0
    }

    pub fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Convert a kilogram float coming off the wire, rounded to the nearest gram
    ///
    /// Returns `None` for negative, non-finite or out-of-range values.
    pub fn from_kg(kg: f64) -> Option<Self> {
        if !kg.is_finite() || kg < 0.0 {
            return None;
        }
        let grams = (kg * GRAMS_PER_KG as f64).round();
        if grams > u64::MAX as f64 {
            return None;
        }
        Some(Self(grams as u64))
    }

    pub fn as_kg(self) -> f64 {
        self.0 as f64 / GRAMS_PER_KG as f64
    }

    /// Difference clamped at zero
    pub fn saturating_sub(self, other: Weight) -> Weight {
        Weight(self.0.saturating_sub(other.0))
    }
}

impl Add for Weight {
    type Output = Weight;

    fn add(self, rhs: Weight) -> Weight {
        Weight(self.0.saturating_add(rhs.0))
    }
}

impl Sum for Weight {
    fn sum<I: Iterator<Item = Weight>>(iter: I) -> Weight {
        iter.fold(Weight::ZERO, Add::add)
    }
}

impl<'a> Sum<&'a Weight> for Weight {
    fn sum<I: Iterator<Item = &'a Weight>>(iter: I) -> Weight {
        iter.copied().sum()
    }
}

/// Kilograms with up to three decimals, trailing zeros removed (`4.5`, `10`)
impl fmt::Display for Weight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let whole = self.0 / GRAMS_PER_KG;
        let frac = self.0 % GRAMS_PER_KG;
        if frac == 0 {
            return write!(f, "{}", whole);
        }
        let digits = format!("{:03}", frac);
        write!(f, "{}.{}", whole, digits.trim_end_matches('0'))
    }
}

impl Serialize for Weight {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.as_kg())
    }
}

impl<'de> Deserialize<'de> for Weight {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(WeightVisitor)
    }
}

struct WeightVisitor;

impl<'de> Visitor<'de> for WeightVisitor {
    type Value = Weight;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a non-negative weight in kilograms, as a number or numeric string")
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Weight, E> {
        v.checked_mul(GRAMS_PER_KG)
            .map(Weight)
            .ok_or_else(|| E::custom(format!("weight {} kg out of range", v)))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Weight, E> {
        if v < 0 {
            return Err(E::custom(format!("negative weight {} kg", v)));
        }
        self.visit_u64(v as u64)
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Weight, E> {
        Weight::from_kg(v).ok_or_else(|| E::custom(format!("invalid weight {} kg", v)))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Weight, E> {
        let kg: f64 = v
            .trim()
            .parse()
            .map_err(|_| E::custom(format!("invalid weight '{}'", v)))?;
        self.visit_f64(kg)
    }
}

/// Reduce raw keystroke text to the canonical decimal text form
///
/// Keeps digits and the first `.`; digits after later points join the
/// fraction; a leading point gets a `0`; the fraction is cut (not rounded) to
/// three digits. Partial input such as `"5."` is preserved.
pub fn sanitize_decimal_text(raw: &str) -> String {
    let mut whole = String::new();
    let mut fraction = String::new();
    let mut seen_point = false;

    for c in raw.chars() {
        if c == '.' {
            seen_point = true;
        } else if c.is_ascii_digit() {
            if !seen_point {
                whole.push(c);
            } else if fraction.len() < WEIGHT_DECIMALS {
                fraction.push(c);
            }
        }
    }

    if !seen_point {
        return whole;
    }
    if whole.is_empty() {
        whole.push('0');
    }
    format!("{}.{}", whole, fraction)
}

/// Parse canonical decimal text; `None` only when the value does not fit
fn parse_sanitized(text: &str) -> Option<Weight> {
    let (whole, fraction) = text.split_once('.').unwrap_or((text, ""));

    let mut kg: u64 = 0;
    for digit in whole.bytes() {
        kg = kg.checked_mul(10)?.checked_add(u64::from(digit - b'0'))?;
    }

    let mut grams: u64 = 0;
    for i in 0..WEIGHT_DECIMALS {
        let digit = fraction.as_bytes().get(i).map_or(0, |d| d - b'0');
        grams = grams * 10 + u64::from(digit);
    }

    kg.checked_mul(GRAMS_PER_KG)?
        .checked_add(grams)
        .map(Weight)
}

/// Normalize free text into a weight
///
/// Empty text and a lone `.` give zero. If the text cannot be represented
/// (the whole part overflows) `prior` is returned unchanged.
pub fn normalize_decimal(raw: &str, prior: Weight) -> Weight {
    parse_sanitized(&sanitize_decimal_text(raw)).unwrap_or(prior)
}

/// Normalize free text into a piece count
///
/// Every non-digit is dropped; empty text gives zero; overflow keeps `prior`.
pub fn normalize_integer(raw: &str, prior: u32) -> u32 {
    let mut value: u32 = 0;
    for digit in raw.bytes().filter(u8::is_ascii_digit) {
        match value
            .checked_mul(10)
            .and_then(|v| v.checked_add(u32::from(digit - b'0')))
        {
            Some(next) => value = next,
            None => return prior,
        }
    }
    value
}

/// Text to put back into a weight field; zero renders empty so the field
/// shows its placeholder
pub fn format_for_display(value: Weight) -> String {
    if value.is_zero() {
        String::new()
    } else {
        value.to_string()
    }
}

/// Same placeholder rule for the stock field
pub fn format_count_for_display(value: u32) -> String {
    if value == 0 {
        String::new()
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn decimal(raw: &str) -> Weight {
        normalize_decimal(raw, Weight::ZERO)
    }

    #[test]
    fn test_sanitize_strips_and_collapses_points() {
        assert_eq!(sanitize_decimal_text("12a.5b"), "12.5");
        assert_eq!(sanitize_decimal_text("1.2.3"), "1.23");
        assert_eq!(sanitize_decimal_text(".5"), "0.5");
        assert_eq!(sanitize_decimal_text("5."), "5.");
        assert_eq!(sanitize_decimal_text("."), "0.");
        assert_eq!(sanitize_decimal_text("1.23456"), "1.234");
        assert_eq!(sanitize_decimal_text("-3,5 kg"), "35");
    }

    #[test]
    fn test_empty_and_lone_point_are_zero() {
        assert_eq!(decimal(""), Weight::ZERO);
        assert_eq!(decimal("."), Weight::ZERO);
        assert_eq!(normalize_decimal("", Weight::from_grams(7_000)), Weight::ZERO);
    }

    #[test]
    fn test_decimal_truncates_instead_of_rounding() {
        assert_eq!(decimal("2.9999"), Weight::from_grams(2_999));
        assert_eq!(decimal("0.0005"), Weight::ZERO);
    }

    #[test]
    fn test_decimal_never_keeps_more_than_three_places() {
        let inputs = ["1..2..3..4..5", "9.87654321", "..", "x.y.z", "0.1.2.3.4", "1234567.8901"];
        for raw in inputs {
            let text = sanitize_decimal_text(raw);
            assert!(text.matches('.').count() <= 1, "{} -> {}", raw, text);
            let fraction = text.split_once('.').map_or("", |(_, f)| f);
            assert!(fraction.len() <= WEIGHT_DECIMALS, "{} -> {}", raw, text);

            let shown = decimal(raw).to_string();
            let shown_fraction = shown.split_once('.').map_or("", |(_, f)| f);
            assert!(shown_fraction.len() <= WEIGHT_DECIMALS);
        }
    }

    #[test]
    fn test_overflow_keeps_prior_value() {
        let prior = Weight::from_grams(4_500);
        assert_eq!(normalize_decimal("99999999999999999999999", prior), prior);
        assert_eq!(normalize_integer("99999999999", 20), 20);
    }

    #[test]
    fn test_integer_strips_non_digits() {
        assert_eq!(normalize_integer("", 5), 0);
        assert_eq!(normalize_integer("1.5", 0), 15);
        assert_eq!(normalize_integer("20 pcs", 0), 20);
        assert_eq!(normalize_integer("-3", 0), 3);
    }

    #[test]
    fn test_display_hides_zero() {
        assert_eq!(format_for_display(Weight::ZERO), "");
        assert_eq!(format_count_for_display(0), "");
        assert_eq!(format_count_for_display(12), "12");
    }

    #[test]
    fn test_display_trims_trailing_zeros() {
        assert_eq!(format_for_display(Weight::from_grams(4_500)), "4.5");
        assert_eq!(format_for_display(Weight::from_grams(10_000)), "10");
        assert_eq!(format_for_display(Weight::from_grams(1)), "0.001");
        assert_eq!(format_for_display(Weight::from_grams(20_050)), "20.05");
    }

    #[test]
    fn test_display_round_trips_through_normalizer() {
        for grams in [1, 10, 999, 1_000, 4_500, 123_456, 7_000_001] {
            let w = Weight::from_grams(grams);
            assert_eq!(decimal(&format_for_display(w)), w);
        }
    }

    proptest! {
        #[test]
        fn test_any_text_normalizes_to_three_places(raw in ".{0,40}") {
            let text = sanitize_decimal_text(&raw);
            prop_assert!(text.matches('.').count() <= 1);
            let fraction = text.split_once('.').map_or("", |(_, f)| f);
            prop_assert!(fraction.len() <= WEIGHT_DECIMALS);

            let shown = decimal(&raw).to_string();
            prop_assert!(shown.matches('.').count() <= 1);
            let shown_fraction = shown.split_once('.').map_or("", |(_, f)| f);
            prop_assert!(shown_fraction.len() <= WEIGHT_DECIMALS);
        }

        #[test]
        fn test_any_weight_round_trips_through_display(grams in 0u64..1_000_000_000_000) {
            let w = Weight::from_grams(grams);
            let shown = format_for_display(w);
            prop_assert_eq!(shown.is_empty(), grams == 0);
            prop_assert_eq!(decimal(&shown), w);
        }
    }

    #[test]
    fn test_weight_wire_format() {
        let w: Weight = serde_json::from_str("4.5").unwrap();
        assert_eq!(w, Weight::from_grams(4_500));
        let w: Weight = serde_json::from_str("\"10.500\"").unwrap();
        assert_eq!(w, Weight::from_grams(10_500));
        let w: Weight = serde_json::from_str("12").unwrap();
        assert_eq!(w, Weight::from_grams(12_000));
        let w: Weight = serde_json::from_str("0.1").unwrap();
        assert_eq!(w, Weight::from_grams(100));

        assert!(serde_json::from_str::<Weight>("-1").is_err());
        assert!(serde_json::from_str::<Weight>("\"abc\"").is_err());

        assert_eq!(serde_json::to_string(&Weight::from_grams(5_500)).unwrap(), "5.5");
    }

    #[test]
    fn test_weight_sum() {
        let total: Weight = [Weight::from_grams(4_000), Weight::from_grams(5_500)]
            .iter()
            .sum();
        assert_eq!(total, Weight::from_grams(9_500));
    }
}
