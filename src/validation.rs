//! Parsing and validation of the fields shared by the JSON request bodies.
//!
//! Request bodies are deserialized with every field optional so that a
//! missing field produces a 400 with a helpful message instead of a
//! deserialization rejection.

use axum::extract::{FromRequest, FromRequestParts};
use serde::Deserialize;
use time::{Date, macros::format_description};

use crate::Error;

/// A JSON request body whose rejections are rendered as [Error] responses.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(Error))]
pub struct JsonBody<T>(pub T);

/// A path parameter whose rejections are rendered as [Error] responses.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(Error))]
pub struct PathParam<T>(pub T);

/// An amount as sent by a client, either a JSON number or a numeric string.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum AmountInput {
    Number(f64),
    Text(String),
}

/// Return the trimmed text if it is present and not blank.
pub fn non_blank(text: Option<&str>) -> Option<&str> {
    text.map(str::trim).filter(|text| !text.is_empty())
}

/// The largest amount accepted for a single record.
///
/// Sums of many records at this size stay finite, so totals and balances
/// always serialize as numbers.
pub const MAX_AMOUNT: f64 = 1e15;

/// Parse an amount, which must be a finite number greater than zero and at
/// most [MAX_AMOUNT].
///
/// # Errors
/// Returns an [Error::InvalidAmount] if the amount is not a positive number
/// or is larger than [MAX_AMOUNT].
pub fn parse_amount(amount: &AmountInput) -> Result<f64, Error> {
    let value = match amount {
        AmountInput::Number(value) => *value,
        AmountInput::Text(text) => text
            .trim()
            .parse::<f64>()
            .map_err(|_| Error::InvalidAmount(text.clone()))?,
    };

    if !value.is_finite() || value <= 0.0 || value > MAX_AMOUNT {
        return Err(Error::InvalidAmount(value.to_string()));
    }

    Ok(value)
}

/// Parse a calendar date in the format YYYY-MM-DD.
///
/// A full ISO 8601 timestamp such as "2025-03-01T00:00:00.000Z" is accepted
/// and truncated to its date.
///
/// # Errors
/// Returns an [Error::InvalidDate] if the text does not start with a valid date.
pub fn parse_date(text: &str) -> Result<Date, Error> {
    let text = text.trim();
    let date_part = text.get(..10).unwrap_or(text);

    Date::parse(date_part, format_description!("[year]-[month]-[day]"))
        .map_err(|_| Error::InvalidDate(text.to_owned()))
}

#[cfg(test)]
mod tests {
    use time::macros::date;

    use crate::{
        Error,
        validation::{AmountInput, MAX_AMOUNT, non_blank, parse_amount, parse_date},
    };

    #[test]
    fn parses_numeric_amounts() {
        assert_eq!(parse_amount(&AmountInput::Number(12.5)), Ok(12.5));
        assert_eq!(parse_amount(&AmountInput::Text(" 500 ".to_owned())), Ok(500.0));
    }

    #[test]
    fn rejects_non_positive_amounts() {
        assert!(matches!(
            parse_amount(&AmountInput::Number(0.0)),
            Err(Error::InvalidAmount(_))
        ));
        assert!(matches!(
            parse_amount(&AmountInput::Number(-3.0)),
            Err(Error::InvalidAmount(_))
        ));
        assert!(matches!(
            parse_amount(&AmountInput::Text("ten".to_owned())),
            Err(Error::InvalidAmount(_))
        ));
    }

    #[test]
    fn rejects_amounts_above_limit() {
        assert_eq!(parse_amount(&AmountInput::Number(MAX_AMOUNT)), Ok(MAX_AMOUNT));
        assert!(matches!(
            parse_amount(&AmountInput::Number(1e308)),
            Err(Error::InvalidAmount(_))
        ));
        assert!(matches!(
            parse_amount(&AmountInput::Text("1e16".to_owned())),
            Err(Error::InvalidAmount(_))
        ));
    }

    #[test]
    fn parses_plain_and_timestamp_dates() {
        assert_eq!(parse_date("2025-03-01"), Ok(date!(2025 - 03 - 01)));
        assert_eq!(
            parse_date("2025-03-01T10:20:30.000Z"),
            Ok(date!(2025 - 03 - 01))
        );
    }

    #[test]
    fn rejects_invalid_dates() {
        assert!(matches!(parse_date("01/03/2025"), Err(Error::InvalidDate(_))));
        assert!(matches!(parse_date("2025-02-30"), Err(Error::InvalidDate(_))));
        assert!(matches!(parse_date(""), Err(Error::InvalidDate(_))));
    }

    #[test]
    fn blank_text_is_missing() {
        assert_eq!(non_blank(Some("  ")), None);
        assert_eq!(non_blank(None), None);
        assert_eq!(non_blank(Some(" Alex ")), Some("Alex"));
    }

    #[test]
    fn amount_deserializes_from_number_or_string() {
        let number: AmountInput = serde_json::from_str("42.5").unwrap();
        let text: AmountInput = serde_json::from_str("\"42.5\"").unwrap();

        assert_eq!(number, AmountInput::Number(42.5));
        assert_eq!(text, AmountInput::Text("42.5".to_owned()));
    }
}
