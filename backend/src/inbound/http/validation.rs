//! Shared validation helpers for inbound HTTP adapters.

use std::str::FromStr;

use base64::Engine;
use serde_json::json;

use crate::domain::{Error, Money, Probability, UserId};

/// Error for a required field that was absent from the payload.
pub(crate) fn missing_field_error(field: &str) -> Error {
    Error::invalid_request(format!("{field} is required")).with_details(json!({
        "field": field,
        "code": "missing_field",
    }))
}

fn invalid_value_error(field: &str, value: &str, message: impl Into<String>) -> Error {
    Error::invalid_request(message).with_details(json!({
        "field": field,
        "value": value,
        "code": "invalid_value",
    }))
}

/// Parse an enum-backed field via its `FromStr` implementation.
pub(crate) fn parse_enum_field<T>(field: &str, value: &str, expected: &str) -> Result<T, Error>
where
    T: FromStr,
{
    value
        .parse()
        .map_err(|_| invalid_value_error(field, value, format!("{field} must be one of: {expected}")))
}

/// Parse a two-decimal currency amount.
pub(crate) fn parse_money_field(field: &str, value: &str) -> Result<Money, Error> {
    Money::parse(value).map_err(|err| invalid_value_error(field, value, err.to_string()))
}

/// Parse a two-decimal probability in `[0.00, 1.00]`.
pub(crate) fn parse_probability_field(field: &str, value: &str) -> Result<Probability, Error> {
    Probability::parse(value).map_err(|err| invalid_value_error(field, value, err.to_string()))
}

/// Parse a UUID-backed principal identifier.
pub(crate) fn parse_user_id_field(field: &str, value: &str) -> Result<UserId, Error> {
    UserId::parse(value).map_err(|err| invalid_value_error(field, value, err.to_string()))
}

/// Decode standard base64 content for an attachment payload.
pub(crate) fn decode_base64_field(field: &str, value: &str) -> Result<Vec<u8>, Error> {
    base64::engine::general_purpose::STANDARD
        .decode(value)
        .map_err(|_| {
            Error::invalid_request(format!("{field} must be valid base64")).with_details(json!({
                "field": field,
                "code": "invalid_base64",
            }))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DisasterType, ErrorCode};

    #[test]
    fn missing_field_errors_carry_the_field_name() {
        let err = missing_field_error("estimatedLoss");
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
        assert_eq!(
            err.details().and_then(|d| d.get("field")).and_then(|v| v.as_str()),
            Some("estimatedLoss")
        );
    }

    #[test]
    fn enum_fields_parse_or_explain() {
        let parsed: DisasterType =
            parse_enum_field("disasterType", "flood", "wildfire, flood").expect("valid value");
        assert_eq!(parsed, DisasterType::Flood);

        let err = parse_enum_field::<DisasterType>("disasterType", "volcano", "wildfire, flood")
            .expect_err("invalid value");
        assert_eq!(
            err.details().and_then(|d| d.get("value")).and_then(|v| v.as_str()),
            Some("volcano")
        );
    }

    #[test]
    fn money_fields_reject_extra_decimals() {
        assert!(parse_money_field("estimatedLoss", "10.123").is_err());
        assert_eq!(
            parse_money_field("estimatedLoss", "10.12").expect("valid").cents(),
            1012
        );
    }

    #[test]
    fn base64_fields_decode_or_explain() {
        assert_eq!(
            decode_base64_field("data", "aGVsbG8=").expect("valid base64"),
            b"hello"
        );
        let err = decode_base64_field("data", "!!!").expect_err("invalid base64");
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
    }
}
