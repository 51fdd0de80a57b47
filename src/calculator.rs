//! Recommended daily water intake.

use crate::structs::profile::{Climate, Gender};

/// Milliliters of water per kilogram of body weight.
fn base_multiplier(gender: Option<Gender>) -> f64 {
    match gender {
        Some(Gender::Female) => 31.0,
        Some(Gender::Male) => 35.0,
        Some(Gender::Other) | None => 33.0,
    }
}

fn climate_multiplier(climate: Option<Climate>) -> f64 {
    match climate {
        Some(Climate::Hot) => 1.3,
        Some(Climate::Humid) => 1.2,
        Some(Climate::Mild) | None => 1.0,
        Some(Climate::Cold) => 0.9,
    }
}

/// Daily target in milliliters. An absent climate counts as mild and an absent
/// gender as other.
///
/// Callers must pass a finite, positive weight.
pub fn compute_daily_target(weight_kg: f64, climate: Option<Climate>, gender: Option<Gender>) -> u32 {
    let amount = weight_kg * base_multiplier(gender) * climate_multiplier(climate);

    // f64::round is half away from zero
    amount.round().max(0.0) as u32
}

/// Same as [`compute_daily_target`], taking the raw strings a profile form
/// would hand over. Anything unrecognized falls back to mild / other.
pub fn compute_daily_target_from_strs(weight_kg: f64, climate: &str, gender: &str) -> u32 {
    compute_daily_target(weight_kg, climate.parse().ok(), gender.parse().ok())
}
