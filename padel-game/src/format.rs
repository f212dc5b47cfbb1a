//! Compact number formatting for point displays.
use crate::constants::POINT_SUFFIXES;

/// Format a point amount the way the stats bar and shop show it.
///
/// Below 1000 the value is floored to an integer; above that it is scaled to
/// the largest suffix not exceeding it and printed with one decimal.
#[must_use]
pub fn format_points(n: f64) -> String {
    let Some((scale, suffix)) = POINT_SUFFIXES
        .iter()
        .rev()
        .find(|(scale, _)| n >= *scale)
    else {
        return format!("{}", n.floor());
    };
    format!("{:.1}{suffix}", n / scale)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn small_values_are_floored() {
        assert_eq!(format_points(0.0), "0");
        assert_eq!(format_points(1.9), "1");
        assert_eq!(format_points(999.99), "999");
    }

    #[test]
    fn suffixes_scale() {
        assert_eq!(format_points(1_000.0), "1.0K");
        assert_eq!(format_points(1_500.0), "1.5K");
        assert_eq!(format_points(2_500_000.0), "2.5M");
        assert_eq!(format_points(7_000_000_000.0), "7.0B");
        assert_eq!(format_points(3_200_000_000_000.0), "3.2T");
        assert_eq!(format_points(5e15), "5000.0T");
    }

    proptest! {
        #[test]
        fn prop_format_never_panics(n in 0.0f64..1e18) {
            let s = format_points(n);
            prop_assert!(!s.is_empty());
            prop_assert!(!s.starts_with('-'), "got: {}", s);
        }

        #[test]
        fn prop_small_integers_print_plainly(n in 0u32..1000) {
            prop_assert_eq!(format_points(f64::from(n)), n.to_string());
        }
    }
}
