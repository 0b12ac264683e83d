//! Reusable validators and commit transforms for field cells.
//!
//! Every validator here treats a blank value as valid so it can be attached
//! to optional fields. Requiredness is decided separately by the cell or by
//! the conditional rules of its section.

use super::field::{FieldValue, Transform, Validator};
use super::rules::VisaStatus;
use crate::utils::text_processing::{collapse_whitespace, group_phone_digits, phone_digits};
use chrono::NaiveDate;
use log::*;
use regex::Regex;
use std::sync::Arc;

const EMAIL_PATTERN: &str = r"^[^\s@]+@[^\s@]+\.[^\s@]+$";
const ZIP_PATTERN: &str = r"^\d{5}(-\d{4})?$";
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Build a validator from a regex pattern, accepting blank values.
///
/// If the pattern fails to compile the validator accepts everything, so a
/// bad pattern never locks a user out of a form.
pub fn pattern(pattern: &str, message: &str) -> Validator {
    let re = match Regex::new(pattern) {
        Ok(r) => Some(r),
        Err(e) => {
            warn!("Failed to compile regex pattern '{}': {}", pattern, e);
            None
        }
    };
    let message = message.to_owned();
    Arc::new(move |value: &FieldValue| {
        if value.is_empty() {
            return None;
        }
        let re = re.as_ref()?;
        let text = value.to_string();
        if re.is_match(text.trim()) {
            None
        } else {
            Some(message.clone())
        }
    })
}

pub fn email() -> Validator {
    pattern(EMAIL_PATTERN, "Enter a valid email address")
}

pub fn zip_code() -> Validator {
    pattern(ZIP_PATTERN, "Enter a 5-digit ZIP code")
}

/// Phone numbers must reduce to ten digits, optionally after a leading `1`.
///
pub fn phone() -> Validator {
    Arc::new(|value: &FieldValue| {
        if value.is_empty() {
            return None;
        }
        match phone_digits(&value.to_string()) {
            Some(_) => None,
            None => Some("Enter a 10-digit phone number".to_string()),
        }
    })
}

/// Calendar date in `YYYY-MM-DD` form.
///
pub fn date() -> Validator {
    Arc::new(|value: &FieldValue| {
        if value.is_empty() {
            return None;
        }
        match NaiveDate::parse_from_str(value.to_string().trim(), DATE_FORMAT) {
            Ok(_) => None,
            Err(_) => Some("Enter a date as YYYY-MM-DD".to_string()),
        }
    })
}

pub fn number_in_range(min: f64, max: f64) -> Validator {
    Arc::new(move |value: &FieldValue| {
        if value.is_empty() {
            return None;
        }
        match value.as_number() {
            Some(n) if n >= min && n <= max => None,
            Some(_) => Some(format!("Enter a number between {} and {}", min, max)),
            None => Some("Enter a number".to_string()),
        }
    })
}

pub fn positive_number() -> Validator {
    Arc::new(|value: &FieldValue| {
        if value.is_empty() {
            return None;
        }
        match value.as_number() {
            Some(n) if n > 0.0 => None,
            Some(_) => Some("Enter a number greater than zero".to_string()),
            None => Some("Enter a number".to_string()),
        }
    })
}

pub fn year() -> Validator {
    number_in_range(1950.0, 2100.0)
}

pub fn max_length(max: usize) -> Validator {
    Arc::new(move |value: &FieldValue| {
        let len = value.to_string().chars().count();
        if len > max {
            Some(format!("Must be at most {} characters", max))
        } else {
            None
        }
    })
}

/// Value must match one of the options, ignoring case.
///
pub fn one_of(options: &[&str]) -> Validator {
    let options: Vec<String> = options.iter().map(|o| o.to_lowercase()).collect();
    Arc::new(move |value: &FieldValue| {
        if value.is_empty() {
            return None;
        }
        let text = value.to_string().trim().to_lowercase();
        if options.iter().any(|o| *o == text) {
            None
        } else {
            Some(format!("Choose one of: {}", options.join(", ")))
        }
    })
}

pub fn visa_status() -> Validator {
    Arc::new(|value: &FieldValue| {
        if value.is_empty() {
            return None;
        }
        match value.to_string().parse::<VisaStatus>() {
            Ok(_) => None,
            Err(e) => Some(e.to_string()),
        }
    })
}

/// Commit transform grouping a ten-digit phone number as `555-123-4567`.
///
pub fn group_phone() -> Transform {
    Arc::new(|value: FieldValue| match value {
        FieldValue::Text(s) => FieldValue::Text(group_phone_digits(&s)),
        FieldValue::Number(n) => FieldValue::Text(group_phone_digits(&format!("{}", n))),
        other => other,
    })
}

/// Commit transform rounding a numeric entry to the nearest integer.
///
/// Text that does not parse is left untouched for the validator to reject.
pub fn round_to_integer() -> Transform {
    Arc::new(|value: FieldValue| {
        if value.is_empty() {
            return value;
        }
        match value.as_number() {
            Some(n) => FieldValue::Number(n.round()),
            None => value,
        }
    })
}

/// Commit transform trimming text and collapsing inner whitespace.
///
pub fn trim() -> Transform {
    Arc::new(|value: FieldValue| match value {
        FieldValue::Text(s) => FieldValue::Text(collapse_whitespace(&s)),
        other => other,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check(validator: &Validator, value: &str) -> Option<String> {
        validator(&FieldValue::from(value))
    }

    #[test]
    fn test_every_validator_accepts_empty_string() {
        let validators = vec![
            email(),
            zip_code(),
            phone(),
            date(),
            number_in_range(0.0, 10.0),
            positive_number(),
            year(),
            max_length(3),
            one_of(&["hourly", "annual"]),
            visa_status(),
        ];
        for validator in validators.iter() {
            assert_eq!(check(validator, ""), None);
            assert_eq!(check(validator, "   "), None);
        }
    }

    #[test]
    fn test_email() {
        let v = email();
        assert_eq!(check(&v, "a@b.com"), None);
        assert!(check(&v, "a@b").is_some());
        assert!(check(&v, "not an email").is_some());
    }

    #[test]
    fn test_phone_counts_digits() {
        let v = phone();
        assert_eq!(check(&v, "555-123-4567"), None);
        assert_eq!(check(&v, "(555) 123 4567"), None);
        assert_eq!(check(&v, "15551234567"), None);
        assert!(check(&v, "25551234567").is_some());
        assert!(check(&v, "555-1234").is_some());
    }

    #[test]
    fn test_zip_and_date() {
        assert_eq!(check(&zip_code(), "02139"), None);
        assert_eq!(check(&zip_code(), "02139-1234"), None);
        assert!(check(&zip_code(), "2139").is_some());
        assert_eq!(check(&date(), "2024-02-29"), None);
        assert!(check(&date(), "2023-02-29").is_some());
        assert!(check(&date(), "02/01/2024").is_some());
    }

    #[test]
    fn test_numbers() {
        assert_eq!(check(&number_in_range(0.0, 60.0), "12"), None);
        assert!(check(&number_in_range(0.0, 60.0), "61").is_some());
        assert!(check(&number_in_range(0.0, 60.0), "ten").is_some());
        assert_eq!(positive_number()(&FieldValue::Number(85.0)), None);
        assert!(check(&positive_number(), "0").is_some());
        assert!(check(&year(), "1800").is_some());
    }

    #[test]
    fn test_numbers_reject_non_finite_values() {
        for text in ["inf", "-inf", "infinity", "NaN"] {
            assert_eq!(check(&positive_number(), text), Some("Enter a number".to_string()));
            assert!(check(&number_in_range(0.0, 60.0), text).is_some());
        }
        assert!(positive_number()(&FieldValue::Number(f64::INFINITY)).is_some());
        assert_eq!(round_to_integer()(FieldValue::from("inf")), FieldValue::from("inf"));
    }

    #[test]
    fn test_one_of_and_max_length() {
        let v = one_of(&["hourly", "annual"]);
        assert_eq!(check(&v, "Hourly"), None);
        assert!(check(&v, "weekly").is_some());
        assert_eq!(check(&max_length(5), "short"), None);
        assert!(check(&max_length(5), "too long").is_some());
    }

    #[test]
    fn test_visa_status_rejects_unknown_values() {
        assert_eq!(check(&visa_status(), "h1b"), None);
        assert!(check(&visa_status(), "tourist").is_some());
    }

    #[test]
    fn test_transforms() {
        assert_eq!(
            group_phone()(FieldValue::from("5551234567")),
            FieldValue::from("555-123-4567")
        );
        assert_eq!(round_to_integer()(FieldValue::from("2.4")), FieldValue::Number(2.0));
        assert_eq!(round_to_integer()(FieldValue::from("")), FieldValue::from(""));
        assert_eq!(round_to_integer()(FieldValue::from("abc")), FieldValue::from("abc"));
        assert_eq!(trim()(FieldValue::from("  Jane   Doe ")), FieldValue::from("Jane Doe"));
    }
}
