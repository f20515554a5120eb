// Field normalization and shared validation rules for public submissions

use lazy_static::lazy_static;
use regex::Regex;
use serde_json::Value;
use validator::ValidationError;

lazy_static! {
    /// Indian mobile number: ten digits starting with 6-9
    pub static ref MOBILE_REGEX: Regex = Regex::new(r"^[6-9]\d{9}$").unwrap();
    pub static ref EMAIL_REGEX: Regex = Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap();
    /// Indian postal code: six digits, no leading zero
    pub static ref PINCODE_REGEX: Regex = Regex::new(r"^[1-9]\d{5}$").unwrap();
    pub static ref STATE_SLUG_REGEX: Regex = Regex::new(r"^[a-z0-9-]+$").unwrap();
}

/// Trim and optionally validate a string field
///
/// # Returns
/// * `None` - If the field is None or empty after trimming
/// * `Some(String)` - The trimmed string if not empty
pub fn trim_optional_field(field: Option<String>) -> Option<String> {
    field.and_then(|s| {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}

/// Keep only ASCII digits; "+91 98765-43210" style input is not rewritten beyond that
pub fn normalize_phone(field: Option<String>) -> Option<String> {
    field.and_then(|s| {
        let digits: String = s.chars().filter(|c| c.is_ascii_digit()).collect();
        if digits.is_empty() {
            None
        } else {
            Some(digits)
        }
    })
}

pub fn normalize_email(field: Option<String>) -> Option<String> {
    trim_optional_field(field).map(|s| s.to_lowercase())
}

/// Blank strings and nulls collapse to absent; everything else is kept for validation
pub fn normalize_id(field: Option<Value>) -> Option<Value> {
    match field {
        Some(Value::Null) => None,
        Some(Value::String(s)) => trim_optional_field(Some(s)).map(Value::String),
        other => other,
    }
}

/// Numeric ids arrive as JSON numbers or, from HTML forms, numeric strings
pub fn parse_id(value: &Value) -> Option<i64> {
    let id = match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }?;
    (id >= 1).then_some(id)
}

pub fn validate_positive_id(value: &Value) -> Result<(), ValidationError> {
    match parse_id(value) {
        Some(_) => Ok(()),
        None => {
            let mut error = ValidationError::new("positive_id");
            error.add_param("value".into(), value);
            Err(error)
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_mobile_regex() {
        assert!(MOBILE_REGEX.is_match("9876543210"));
        assert!(MOBILE_REGEX.is_match("6000000000"));
        assert!(!MOBILE_REGEX.is_match("5876543210"));
        assert!(!MOBILE_REGEX.is_match("987654321"));
        assert!(!MOBILE_REGEX.is_match("98765432100"));
    }

    #[test]
    fn test_email_regex() {
        assert!(EMAIL_REGEX.is_match("user@example.com"));
        assert!(!EMAIL_REGEX.is_match("user@example"));
        assert!(!EMAIL_REGEX.is_match("user example@x.com"));
    }

    #[test]
    fn test_pincode_regex() {
        assert!(PINCODE_REGEX.is_match("110001"));
        assert!(!PINCODE_REGEX.is_match("011001"));
        assert!(!PINCODE_REGEX.is_match("11001"));
    }

    #[test]
    fn test_normalize_phone_strips_formatting() {
        assert_eq!(
            normalize_phone(Some("+91 98765-43210".into())).as_deref(),
            Some("919876543210")
        );
        assert_eq!(
            normalize_phone(Some(" 98765 43210 ".into())).as_deref(),
            Some("9876543210")
        );
        assert_eq!(normalize_phone(Some("  ".into())), None);
    }

    #[test]
    fn test_normalize_email() {
        assert_eq!(
            normalize_email(Some("  User@Example.COM ".into())).as_deref(),
            Some("user@example.com")
        );
        assert_eq!(normalize_email(Some("".into())), None);
    }

    #[test]
    fn test_parse_id_accepts_numbers_and_numeric_strings() {
        assert_eq!(parse_id(&json!(7)), Some(7));
        assert_eq!(parse_id(&json!("12")), Some(12));
        assert_eq!(parse_id(&json!(0)), None);
        assert_eq!(parse_id(&json!("abc")), None);
        assert_eq!(parse_id(&json!(1.5)), None);
        assert!(validate_positive_id(&json!("x")).is_err());
    }

    #[test]
    fn test_normalize_id() {
        assert_eq!(normalize_id(Some(json!(" "))), None);
        assert_eq!(normalize_id(Some(Value::Null)), None);
        assert_eq!(normalize_id(Some(json!(" 3 "))), Some(json!("3")));
    }
}
