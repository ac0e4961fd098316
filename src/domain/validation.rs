//! Field-level checks applied before a record is stored.

use std::sync::LazyLock;

use regex::Regex;
use rust_decimal::Decimal;

use crate::domain::{Config, ValidationError};

static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s.]+$").expect("e-mail pattern is a valid regex")
});

/// A text field that must be present and fit the configured length.
pub(crate) fn required(
    field: &'static str,
    value: &str,
    config: &Config,
) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::Required { field });
    }
    bounded(field, value, config)
}

/// A text field that may be empty but must fit the configured length.
pub(crate) fn bounded(
    field: &'static str,
    value: &str,
    config: &Config,
) -> Result<(), ValidationError> {
    let max = config.max_text_length();
    let len = value.chars().count();
    if len > max {
        return Err(ValidationError::TooLong { field, max, len });
    }
    Ok(())
}

/// An optional e-mail address. Empty is allowed.
pub(crate) fn email(value: &str, config: &Config) -> Result<(), ValidationError> {
    bounded("email", value, config)?;
    if value.is_empty() || EMAIL.is_match(value) {
        Ok(())
    } else {
        Err(ValidationError::Email(value.to_string()))
    }
}

/// A decimal with at most `max_digits` digits, `decimal_places` of them
/// after the point.
///
/// Trailing zeros do not count, so `50.00` has two digits and no places.
pub(crate) fn decimal(
    field: &'static str,
    value: Decimal,
    config: &Config,
) -> Result<(), ValidationError> {
    let max_digits = config.max_digits();
    let decimal_places = config.decimal_places();

    let normalized = value.normalize();
    let places = normalized.scale();
    let digits = normalized
        .mantissa()
        .unsigned_abs()
        .checked_ilog10()
        .map_or(1, |log| log + 1)
        .max(places);
    let whole_digits = digits - places;

    if digits > max_digits
        || places > decimal_places
        || whole_digits > max_digits.saturating_sub(decimal_places)
    {
        return Err(ValidationError::Precision {
            field,
            value,
            max_digits,
            decimal_places,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use test_case::test_case;

    use super::*;

    #[test_case(5000, 2; "fifty")]
    #[test_case(99999, 2; "largest value")]
    #[test_case(-99999, 2; "smallest value")]
    #[test_case(50, 3; "trailing zero beyond places")]
    #[test_case(1, 2; "one cent")]
    #[test_case(0, 0; "zero")]
    fn accepts_decimals_within_precision(num: i64, scale: u32) {
        let config = Config::default();
        assert!(decimal("amount", Decimal::new(num, scale), &config).is_ok());
    }

    #[test_case(100_000, 2; "too many whole digits")]
    #[test_case(1234, 3; "too many places")]
    #[test_case(1000, 0; "four whole digits")]
    fn rejects_decimals_beyond_precision(num: i64, scale: u32) {
        let config = Config::default();
        let error = decimal("amount", Decimal::new(num, scale), &config).unwrap_err();
        assert!(matches!(
            error,
            ValidationError::Precision {
                field: "amount",
                max_digits: 5,
                decimal_places: 2,
                ..
            }
        ));
    }

    #[test]
    fn required_rejects_whitespace() {
        let config = Config::default();
        assert_eq!(
            required("names", "  ", &config),
            Err(ValidationError::Required { field: "names" })
        );
    }

    #[test]
    fn length_counts_characters_not_bytes() {
        let config = Config::default();
        let accented = "ñ".repeat(255);
        assert!(required("names", &accented, &config).is_ok());

        let too_long = "a".repeat(256);
        assert_eq!(
            bounded("phone", &too_long, &config),
            Err(ValidationError::TooLong {
                field: "phone",
                max: 255,
                len: 256
            })
        );
    }

    #[test_case("ana@example.com", true; "plain address")]
    #[test_case("", true; "empty is allowed")]
    #[test_case("ana.lopez+tv@mail.example.ec", true; "subdomain and tag")]
    #[test_case("ana", false; "missing at")]
    #[test_case("ana@example", false; "missing tld")]
    #[test_case("ana @example.com", false; "whitespace")]
    fn email_addresses(input: &str, valid: bool) {
        let config = Config::default();
        assert_eq!(email(input, &config).is_ok(), valid);
    }
}
