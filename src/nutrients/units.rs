//! Unit conversion and the ×100 fixed-point encoding used by every record.
//!
//! Every function treats a missing, zero, negative or non-finite input as
//! "not reported" and returns `None`.

fn reported(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite() && *v > 0.0)
}

fn round_to_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

pub fn micrograms_to_grams(micrograms: Option<f64>) -> Option<f64> {
    reported(micrograms).map(|v| v / 1_000_000.0)
}

pub fn milligrams_to_grams(milligrams: Option<f64>) -> Option<f64> {
    reported(milligrams).map(|v| v / 1_000.0)
}

/// Encodes a decimal as `round(round(x, 2) * 100)`.
///
/// Positive amounts that round to zero (anything below 0.005) are treated as
/// trace amounts and come back as `None`, so a present value is always >= 1.
pub fn to_fixed_point(value: Option<f64>) -> Option<i64> {
    let value = reported(value)?;
    let scaled = (round_to_cents(value) * 100.0).round() as i64;
    (scaled > 0).then_some(scaled)
}

pub fn from_fixed_point(value: Option<i64>) -> Option<f64> {
    value
        .filter(|v| *v > 0)
        .map(|v| round_to_cents(v as f64 / 100.0))
}

/// Calorie density, present only when both inputs are positive.
pub fn calories_per_gram(calories_kcal: Option<f64>, weight_grams: Option<f64>) -> Option<i64> {
    match (reported(calories_kcal), reported(weight_grams)) {
        (Some(kcal), Some(grams)) => to_fixed_point(Some(kcal / grams)),
        _ => None,
    }
}

/// Normalizes a provider amount to grams. Unknown units are not reported.
pub fn grams_from(amount: f64, unit: &str) -> Option<f64> {
    match unit {
        "µg" => micrograms_to_grams(Some(amount)),
        "mg" => milligrams_to_grams(Some(amount)),
        "g" => Some(amount),
        _ => None,
    }
}

/// Milligram fields take the amount verbatim and only when it is in `mg`.
pub fn milligrams_from(amount: f64, unit: &str) -> Option<f64> {
    match unit {
        "mg" => Some(amount),
        _ => None,
    }
}
