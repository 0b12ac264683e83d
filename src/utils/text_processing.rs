//! Text processing utilities.
//!
//! Helpers used by commit transforms to normalize free-form input such as
//! phone numbers and names.

use log::*;
use regex::Regex;

/// Reduce a phone number to its ten national digits.
///
/// A leading country code `1` on an eleven-digit number is dropped. Returns
/// `None` when the input does not reduce to ten digits.
pub fn phone_digits(text: &str) -> Option<String> {
    let mut digits: String = text.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.len() == 11 && digits.starts_with('1') {
        digits.remove(0);
    }
    if digits.len() == 10 {
        Some(digits)
    } else {
        None
    }
}

/// Group a ten-digit phone number as `555-123-4567`.
///
/// Input that does not reduce to ten digits is returned unchanged so the
/// validator can report it.
pub fn group_phone_digits(text: &str) -> String {
    match phone_digits(text) {
        Some(d) => format!("{}-{}-{}", &d[0..3], &d[3..6], &d[6..10]),
        None => text.to_string(),
    }
}

/// Trim text and collapse runs of whitespace into single spaces.
///
pub fn collapse_whitespace(text: &str) -> String {
    let re = match Regex::new(r"\s+") {
        Ok(r) => r,
        Err(e) => {
            warn!("Failed to compile whitespace pattern: {}", e);
            return text.trim().to_string();
        }
    };
    re.replace_all(text.trim(), " ").to_string()
}
