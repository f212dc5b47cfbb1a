//! Numeric conversion helpers centralizing safe numeric casts.

use num_traits::cast::cast;

/// Convert an upgrade level into an `i32` exponent, saturating at `i32::MAX`.
#[must_use]
pub fn level_to_exponent(level: u32) -> i32 {
    cast::<u32, i32>(level).unwrap_or(i32::MAX)
}

/// Convert a level into `f64` for stat arithmetic.
#[must_use]
pub fn level_to_f64(level: u32) -> f64 {
    f64::from(level)
}

/// Floor a f64 and clamp it to the u32 range, returning 0 for non-finite or negative values.
#[must_use]
pub fn floor_f64_to_u32(value: f64) -> u32 {
    if !value.is_finite() || value <= 0.0 {
        return 0;
    }
    let max = f64::from(u32::MAX);
    cast::<f64, u32>(value.min(max).floor()).unwrap_or(0)
}

/// Floor a f64 and clamp it to the u64 range, returning 0 for non-finite or negative values.
#[must_use]
pub fn floor_f64_to_u64(value: f64) -> u64 {
    if !value.is_finite() || value <= 0.0 {
        return 0;
    }
    let max = cast::<u64, f64>(u64::MAX).unwrap_or(f64::MAX);
    cast::<f64, u64>(value.min(max).floor()).unwrap_or(u64::MAX)
}

/// Replace negative or non-finite balances with zero.
#[must_use]
pub fn non_negative_finite(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exponent_saturates() {
        assert_eq!(level_to_exponent(3), 3);
        assert_eq!(level_to_exponent(u32::MAX), i32::MAX);
    }

    #[test]
    fn floors_clamp_ranges() {
        assert_eq!(floor_f64_to_u32(3.9), 3);
        assert_eq!(floor_f64_to_u32(-2.0), 0);
        assert_eq!(floor_f64_to_u32(f64::NAN), 0);
        assert_eq!(floor_f64_to_u32(1e20), u32::MAX);
        assert_eq!(floor_f64_to_u64(42.0), 42);
        assert_eq!(floor_f64_to_u64(f64::INFINITY), 0);
    }

    #[test]
    fn balances_never_negative() {
        assert!((non_negative_finite(12.5) - 12.5).abs() < f64::EPSILON);
        assert!(non_negative_finite(-1.0).abs() < f64::EPSILON);
        assert!(non_negative_finite(f64::NAN).abs() < f64::EPSILON);
    }
}
