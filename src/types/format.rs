//! Text conversions used by the renderer and the settings form.

use std::time::Duration;

/// Formats a duration as `HH:MM:SS`, dropping sub-second precision.
///
/// Hours are not wrapped at 24.
pub fn format_duration(duration: Duration) -> String {
    let total = duration.as_secs();
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let seconds = total % 60;
    format!("{hours:02}:{minutes:02}:{seconds:02}")
}

/// Parses the leading integer of a form value.
///
/// Leading whitespace and a single sign are accepted and parsing stops at the
/// first non-digit, so `"12abc"` yields 12. Text without a leading number and
/// negative numbers both yield 0, which callers treat as invalid input.
pub fn parse_positive_int(text: &str) -> u64 {
    let trimmed = text.trim_start();
    let (negative, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let digit_count = rest.bytes().take_while(u8::is_ascii_digit).count();
    if negative || digit_count == 0 {
        return 0;
    }

    rest.bytes().take(digit_count).fold(0u64, |acc, b| {
        acc.saturating_mul(10).saturating_add(u64::from(b - b'0'))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    mod format_duration_tests {
        use super::*;

        #[test]
        fn test_zero() {
            assert_eq!(format_duration(Duration::ZERO), "00:00:00");
        }

        #[test]
        fn test_leading_zeros() {
            assert_eq!(format_duration(Duration::from_secs(65)), "00:01:05");
            assert_eq!(format_duration(Duration::from_secs(1500)), "00:25:00");
        }

        #[test]
        fn test_hours_are_not_wrapped() {
            assert_eq!(format_duration(Duration::from_secs(3600)), "01:00:00");
            assert_eq!(
                format_duration(Duration::from_secs(100 * 3600 + 59)),
                "100:00:59"
            );
        }

        #[test]
        fn test_truncates_millis() {
            assert_eq!(format_duration(Duration::from_millis(2999)), "00:00:02");
        }
    }

    mod parse_positive_int_tests {
        use super::*;

        #[test]
        fn test_plain_numbers() {
            assert_eq!(parse_positive_int("25"), 25);
            assert_eq!(parse_positive_int("  300"), 300);
            assert_eq!(parse_positive_int("+7"), 7);
        }

        #[test]
        fn test_stops_at_first_non_digit() {
            assert_eq!(parse_positive_int("12abc"), 12);
            assert_eq!(parse_positive_int("3.9"), 3);
        }

        #[test]
        fn test_garbage_is_zero() {
            assert_eq!(parse_positive_int(""), 0);
            assert_eq!(parse_positive_int("abc"), 0);
            assert_eq!(parse_positive_int("-"), 0);
        }

        #[test]
        fn test_negative_is_zero() {
            assert_eq!(parse_positive_int("-5"), 0);
            assert_eq!(parse_positive_int("-0"), 0);
        }

        #[test]
        fn test_overflow_saturates() {
            assert_eq!(parse_positive_int("99999999999999999999999"), u64::MAX);
        }
    }
}
