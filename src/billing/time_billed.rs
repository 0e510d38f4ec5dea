use std::str::FromStr;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;
use serde_json::Value;

use crate::error::ValidationError;

// Upper bound for one task's minutes. Keeps sums, hours * 60 and the REAL column in range.
pub const MAX_TIME_BILLED: i64 = 1_000_000_000;

fn minutes_per_hour() -> Decimal {
    Decimal::from(60)
}

fn out_of_range(field: &'static str, max: impl ToString, value: impl ToString) -> ValidationError {
    ValidationError::TooLarge {
        field,
        max: max.to_string(),
        value: value.to_string(),
    }
}

// One decimal place, halves away from zero
pub fn round_minutes(minutes: Decimal) -> Decimal {
    minutes.round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero)
}

// Shortest round-trip text of the float, so 45.05 stays 45.05 instead of 45.0499...
pub fn decimal_from_f64(value: f64) -> Option<Decimal> {
    if !value.is_finite() {
        return None;
    }
    Decimal::from_str(&value.to_string()).ok()
}

pub fn parse_minutes(field: &'static str, value: &Value) -> Result<Decimal, ValidationError> {
    let not_numeric = || ValidationError::NotNumeric {
        field,
        value: value.to_string(),
    };

    match value {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(Decimal::from(i))
            } else if let Some(u) = n.as_u64() {
                Ok(Decimal::from(u))
            } else {
                n.as_f64().and_then(decimal_from_f64).ok_or_else(not_numeric)
            }
        }
        Value::String(s) => Decimal::from_str(s.trim()).map_err(|_| not_numeric()),
        _ => Err(not_numeric()),
    }
}

pub fn check_minutes(field: &'static str, minutes: Decimal) -> Result<Decimal, ValidationError> {
    if minutes.is_sign_negative() && !minutes.is_zero() {
        return Err(ValidationError::Negative {
            field,
            value: minutes.to_string(),
        });
    }
    if minutes > Decimal::from(MAX_TIME_BILLED) {
        return Err(out_of_range(field, MAX_TIME_BILLED, minutes));
    }
    Ok(minutes)
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HoursMinutes {
    pub hours: u64,
    pub minutes: Decimal,
}

// floor(total / 60) hours and round(total mod 60, 1) minutes. No carry: 119.96 is 1 hour 60.0 minutes.
pub fn split_minutes(total: Decimal) -> Result<HoursMinutes, ValidationError> {
    let hours = (total / minutes_per_hour()).floor();
    let mut minutes = round_minutes(total - hours * minutes_per_hour());
    minutes.rescale(1);

    let hours = hours
        .to_u64()
        .ok_or_else(|| out_of_range("time_billed", u64::MAX, total))?;
    Ok(HoursMinutes { hours, minutes })
}

pub fn combine_hours_minutes(hours: Decimal, minutes: Decimal) -> Result<Decimal, ValidationError> {
    hours
        .trunc()
        .checked_mul(minutes_per_hour())
        .and_then(|m| m.checked_add(minutes))
        .map(round_minutes)
        .ok_or_else(|| out_of_range("hours", MAX_TIME_BILLED / 60, hours))
}

/// Renders a minute total for the billing views, e.g. `"2 hours, 15.5 minutes."`.
pub fn format_time_billed(total: Decimal) -> Result<String, ValidationError> {
    let HoursMinutes { hours, minutes } = split_minutes(total)?;

    Ok(if hours > 0 && !minutes.is_zero() {
        format!("{} hours, {} minutes.", hours, minutes)
    } else if hours > 0 {
        format!("{} hours.", hours)
    } else {
        format!("{} minutes.", minutes)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn formatted(s: &str) -> String {
        format_time_billed(dec(s)).unwrap()
    }

    #[test]
    fn formats_reference_values() {
        assert_eq!(formatted("0"), "0.0 minutes.");
        assert_eq!(formatted("60"), "1 hours.");
        assert_eq!(formatted("90"), "1 hours, 30.0 minutes.");
        assert_eq!(formatted("45.05"), "45.1 minutes.");
        assert_eq!(formatted("135.5"), "2 hours, 15.5 minutes.");
    }

    #[test]
    fn float_input_rounds_half_up() {
        let minutes = parse_minutes("time_billed", &json!(45.05)).unwrap();
        assert_eq!(minutes, dec("45.05"));
        assert_eq!(format_time_billed(minutes).unwrap(), "45.1 minutes.");
    }

    #[test]
    fn remainder_that_rounds_to_sixty_stays_in_minutes() {
        assert_eq!(formatted("119.96"), "1 hours, 60.0 minutes.");
        assert_eq!(formatted("59.97"), "60.0 minutes.");
        assert_eq!(
            split_minutes(dec("59.97")).unwrap(),
            HoursMinutes { hours: 0, minutes: dec("60.0") }
        );
    }

    #[test]
    fn hours_and_minutes_round_trip() {
        let total = combine_hours_minutes(dec("2"), dec("15.5")).unwrap();
        assert_eq!(total, dec("135.5"));
        assert_eq!(format_time_billed(total).unwrap(), "2 hours, 15.5 minutes.");

        let split = split_minutes(total).unwrap();
        assert_eq!(split.hours, 2);
        assert_eq!(split.minutes, dec("15.5"));
        assert_eq!(
            combine_hours_minutes(Decimal::from(split.hours), split.minutes).unwrap(),
            total
        );
    }

    #[test]
    fn repeated_round_trips_do_not_drift() {
        let mut total = combine_hours_minutes(dec("1"), dec("7.35")).unwrap();
        assert_eq!(total, dec("67.4"));
        for _ in 0..10 {
            let split = split_minutes(total).unwrap();
            total = combine_hours_minutes(Decimal::from(split.hours), split.minutes).unwrap();
        }
        assert_eq!(total, dec("67.4"));
    }

    #[test]
    fn fractional_hours_are_truncated() {
        assert_eq!(combine_hours_minutes(dec("1.9"), dec("0")).unwrap(), dec("60"));
    }

    #[test]
    fn huge_hours_are_rejected_instead_of_overflowing() {
        let result = combine_hours_minutes(dec("2000000000000000000000000000"), dec("0"));
        assert!(matches!(result, Err(ValidationError::TooLarge { field: "hours", .. })));

        let result = combine_hours_minutes(dec("1"), Decimal::MAX);
        assert!(matches!(result, Err(ValidationError::TooLarge { .. })));
    }

    #[test]
    fn hour_counts_beyond_u64_are_an_error() {
        assert!(matches!(
            format_time_billed(dec("1000000000000000000000000")),
            Err(ValidationError::TooLarge { field: "time_billed", .. })
        ));
        assert_eq!(
            split_minutes(dec("600000000000")).unwrap().hours,
            10_000_000_000
        );
    }

    #[test]
    fn check_minutes_bounds() {
        assert_eq!(check_minutes("time_billed", dec("0")).unwrap(), dec("0"));
        assert_eq!(
            check_minutes("time_billed", Decimal::from(MAX_TIME_BILLED)).unwrap(),
            Decimal::from(MAX_TIME_BILLED)
        );
        assert!(matches!(
            check_minutes("time_billed", dec("1000000000.1")),
            Err(ValidationError::TooLarge { .. })
        ));
        assert!(matches!(
            check_minutes("time_billed", dec("-0.1")),
            Err(ValidationError::Negative { .. })
        ));
    }

    #[test]
    fn parses_numbers_and_numeric_strings() {
        assert_eq!(parse_minutes("time_billed", &json!(12)).unwrap(), dec("12"));
        assert_eq!(parse_minutes("time_billed", &json!(" 7.5 ")).unwrap(), dec("7.5"));
        assert!(matches!(
            parse_minutes("time_billed", &json!("abc")),
            Err(ValidationError::NotNumeric { field: "time_billed", .. })
        ));
        assert!(parse_minutes("time_billed", &json!(null)).is_err());
        assert!(parse_minutes("time_billed", &json!([1])).is_err());
    }
}
