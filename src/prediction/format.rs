// Human readable rendering of a predicted recovery duration

use std::fmt;

use itertools::Itertools;

const MINUTES_PER_HOUR: i64 = 60;
const MINUTES_PER_DAY: i64 = 24 * MINUTES_PER_HOUR;

/// A recovery duration split into its largest unit and the remainder.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecoveryTime {
    /// Largest non-zero unit, e.g. "2 Days"
    pub primary: String,
    /// Smaller non-zero units left over, e.g. "3 Hours 5 Minutes"
    pub secondary: Option<String>,
}

impl fmt::Display for RecoveryTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.secondary {
            Some(secondary) => write!(f, "{} {}", self.primary, secondary),
            None => write!(f, "{}", self.primary),
        }
    }
}

fn unit(count: i64, singular: &str, plural: &str) -> String {
    format!("{} {}", count, if count == 1 { singular } else { plural })
}

/// Format a duration given in fractional days.
///
/// The duration is rounded to the nearest minute first, then split into whole
/// days, hours and minutes. Negative and non-finite inputs render as zero minutes.
pub fn format_recovery_time(days: f64) -> RecoveryTime {
    let total_minutes = if days.is_finite() {
        ((days * MINUTES_PER_DAY as f64).round() as i64).max(0)
    } else {
        0
    };

    let full_days = total_minutes / MINUTES_PER_DAY;
    let remaining = total_minutes % MINUTES_PER_DAY;
    let full_hours = remaining / MINUTES_PER_HOUR;
    let minutes = remaining % MINUTES_PER_HOUR;

    let (primary, rest) = if full_days > 0 {
        (
            unit(full_days, "Day", "Days"),
            vec![(full_hours, "Hour", "Hours"), (minutes, "Minute", "Minutes")],
        )
    } else if full_hours > 0 {
        (
            unit(full_hours, "Hour", "Hours"),
            vec![(minutes, "Minute", "Minutes")],
        )
    } else {
        (unit(minutes, "Minute", "Minutes"), vec![])
    };

    let secondary = rest
        .into_iter()
        .filter(|(count, _, _)| *count > 0)
        .map(|(count, singular, plural)| unit(count, singular, plural))
        .join(" ");

    RecoveryTime {
        primary,
        secondary: (!secondary.is_empty()).then_some(secondary),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_day_and_a_half() {
        let time = format_recovery_time(1.5);
        assert_eq!(time.primary, "1 Day");
        assert_eq!(time.secondary.as_deref(), Some("12 Hours"));
        assert_eq!(time.to_string(), "1 Day 12 Hours");
    }

    #[test]
    fn test_half_day_has_no_secondary() {
        let time = format_recovery_time(0.5);
        assert_eq!(time.primary, "12 Hours");
        assert_eq!(time.secondary, None);
    }

    #[test]
    fn test_fifteen_minutes() {
        let time = format_recovery_time(15.0 / 1440.0);
        assert_eq!(time.primary, "15 Minutes");
        assert_eq!(time.secondary, None);

        let time = format_recovery_time(0.0104166);
        assert_eq!(time.primary, "15 Minutes");
    }

    #[test]
    fn test_singular_units_and_skipped_zero_hours() {
        // 1 day, 0 hours, 1 minute
        let time = format_recovery_time(1.0 + 1.0 / 1440.0);
        assert_eq!(time.primary, "1 Day");
        assert_eq!(time.secondary.as_deref(), Some("1 Minute"));

        // 2 hours 30 minutes
        let time = format_recovery_time(150.0 / 1440.0);
        assert_eq!(time.primary, "2 Hours");
        assert_eq!(time.secondary.as_deref(), Some("30 Minutes"));

        // 3 days 1 hour 5 minutes
        let time = format_recovery_time(3.0 + 65.0 / 1440.0);
        assert_eq!(time.primary, "3 Days");
        assert_eq!(time.secondary.as_deref(), Some("1 Hour 5 Minutes"));
    }

    #[test]
    fn test_rounding_to_nearest_minute() {
        // 59.6 minutes rounds up to a full hour
        let time = format_recovery_time(59.6 / 1440.0);
        assert_eq!(time.primary, "1 Hour");
        assert_eq!(time.secondary, None);
    }

    #[test]
    fn test_degenerate_inputs() {
        assert_eq!(format_recovery_time(0.0).primary, "0 Minutes");
        assert_eq!(format_recovery_time(-2.0).primary, "0 Minutes");
        assert_eq!(format_recovery_time(f64::NAN).primary, "0 Minutes");
    }

    fn parse_minutes(text: &str) -> i64 {
        text.split_whitespace()
            .collect::<Vec<_>>()
            .chunks(2)
            .map(|pair| {
                let count: i64 = pair[0].parse().unwrap();
                match pair[1] {
                    "Day" | "Days" => count * MINUTES_PER_DAY,
                    "Hour" | "Hours" => count * MINUTES_PER_HOUR,
                    _ => count,
                }
            })
            .sum()
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        #[test]
        fn prop_rendered_units_add_up_to_rounded_minutes(days in 0.0f64..60.0) {
            let time = format_recovery_time(days);
            let expected = (days * 1440.0).round() as i64;
            prop_assert_eq!(parse_minutes(&time.to_string()), expected);
        }

        #[test]
        fn prop_secondary_never_contains_zero_units(days in 0.0f64..60.0) {
            let time = format_recovery_time(days);
            if let Some(secondary) = time.secondary {
                prop_assert!(!secondary.starts_with("0 "));
                prop_assert!(!secondary.contains(" 0 "));
            }
        }
    }
}
