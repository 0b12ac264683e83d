//! Section validity aggregation.
//!
//! The aggregator knows nothing about rules. Callers pass only the errors of
//! visible cells and only the values of cells that must be present.

use super::field::FieldValue;

/// Returns true when no error is present and every value is non-blank.
///
pub fn is_valid(errors: &[Option<String>], values: &[&FieldValue]) -> bool {
    let no_errors = errors.iter().all(|e| e.is_none());
    let all_present = values.iter().all(|v| !v.is_empty());
    no_errors && all_present
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_inputs_are_valid() {
        assert!(is_valid(&[], &[]));
    }

    #[test]
    fn test_any_error_is_invalid() {
        let value = FieldValue::from("x");
        assert!(!is_valid(&[None, Some("bad".to_string())], &[&value]));
    }

    #[test]
    fn test_any_blank_value_is_invalid() {
        let present = FieldValue::from("x");
        let blank = FieldValue::from("");
        assert!(!is_valid(&[None, None], &[&present, &blank]));
        assert!(is_valid(&[None, None], &[&present]));
    }

    #[test]
    fn test_numbers_and_booleans_count_as_present() {
        let number = FieldValue::Number(0.0);
        let flag = FieldValue::Bool(false);
        assert!(is_valid(&[None], &[&number, &flag]));
    }
}
