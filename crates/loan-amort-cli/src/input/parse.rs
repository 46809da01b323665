use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::str::FromStr;

use super::InputError;

/// Accepted date layouts, tried in order.
const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%m/%d/%Y", "%m/%d/%y"];

/// Parse a date in any of the accepted layouts.
///
/// A slash date whose year has exactly two digits is read as `MM/DD/YY`
/// (00-68 map to 20xx, 69-99 to 19xx); `%Y` alone would accept it as year 24.
pub fn parse_date(text: &str) -> Result<NaiveDate, InputError> {
    let text = text.trim();
    let two_digit_year = text.contains('/') && text.rsplit('/').next().is_some_and(|y| y.len() == 2);

    DATE_FORMATS
        .iter()
        .filter(|fmt| !(two_digit_year && fmt.ends_with("%Y")))
        .find_map(|fmt| NaiveDate::parse_from_str(text, fmt).ok())
        .ok_or_else(|| InputError::UnsupportedDateFormat(text.to_string()))
}

/// Like [`parse_date`], but a blank cell means "no date".
pub fn parse_optional_date(text: &str) -> Result<Option<NaiveDate>, InputError> {
    if text.trim().is_empty() {
        Ok(None)
    } else {
        parse_date(text).map(Some)
    }
}

/// Parse a whole number from trimmed text.
pub fn parse_int<T>(text: &str) -> Result<T, String>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    text.trim().parse::<T>().map_err(|e| e.to_string())
}

/// Parse a decimal from trimmed text, accepting scientific notation.
pub fn parse_decimal(text: &str) -> Result<Decimal, String> {
    let text = text.trim();
    Decimal::from_str(text)
        .or_else(|_| Decimal::from_scientific(text))
        .map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_parse_date_iso() {
        assert_eq!(parse_date("2024-03-01").unwrap(), d(2024, 3, 1));
        assert_eq!(parse_date("  2024-03-01 ").unwrap(), d(2024, 3, 1));
    }

    #[test]
    fn test_parse_date_us_four_digit_year() {
        assert_eq!(parse_date("03/01/2024").unwrap(), d(2024, 3, 1));
        assert_eq!(parse_date("3/1/2024").unwrap(), d(2024, 3, 1));
    }

    #[test]
    fn test_parse_date_us_two_digit_year() {
        assert_eq!(parse_date("03/01/24").unwrap(), d(2024, 3, 1));
        assert_eq!(parse_date("12/31/99").unwrap(), d(1999, 12, 31));
    }

    #[test]
    fn test_parse_date_rejects_other_layouts() {
        for text in ["2024.03.01", "01-03-2024", "March 1, 2024", "02/30/2024", ""] {
            let err = parse_date(text).unwrap_err();
            assert!(
                matches!(err, InputError::UnsupportedDateFormat(_)),
                "{text:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_parse_optional_date_blank_is_none() {
        assert_eq!(parse_optional_date("").unwrap(), None);
        assert_eq!(parse_optional_date("   ").unwrap(), None);
        assert_eq!(parse_optional_date("01/15/2024").unwrap(), Some(d(2024, 1, 15)));
    }

    #[test]
    fn test_parse_int() {
        assert_eq!(parse_int::<i32>(" 360 ").unwrap(), 360);
        assert_eq!(parse_int::<i32>("-3").unwrap(), -3);
        assert!(parse_int::<u32>("-3").is_err());
        assert!(parse_int::<i32>("12.5").is_err());
    }

    #[test]
    fn test_parse_decimal() {
        assert_eq!(parse_decimal(" 100000.00 ").unwrap(), dec!(100000.00));
        assert_eq!(parse_decimal("6.875").unwrap(), dec!(6.875));
        assert_eq!(parse_decimal("1e5").unwrap(), dec!(100000));
        assert!(parse_decimal("12,000").is_err());
        assert!(parse_decimal("").is_err());
    }
}
