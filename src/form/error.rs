//! Form-specific error types.

/// Errors that can occur while editing sections and lists.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FormError {
    /// Field name does not exist in the section or item
    #[error("Unknown field: {name}")]
    UnknownField { name: String },

    /// List name does not exist in the section
    #[error("Unknown list: {name}")]
    UnknownList { name: String },

    /// List already holds its maximum number of items
    #[error("List '{list}' already holds the maximum of {max} items")]
    ListFull { list: String, max: usize },

    /// Removing a confirmed item would drop below the minimum
    #[error("List '{list}' requires at least {min} items")]
    BelowMinimum { list: String, min: usize },

    /// Item id does not exist in the list
    #[error("Item {id} not found in list '{list}'")]
    ItemNotFound { list: String, id: u64 },

    /// Trigger value is not a recognised visa status
    #[error("Unknown visa status: {0}")]
    UnknownVisaStatus(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_form_error_display() {
        let error = FormError::UnknownField {
            name: "email".to_string(),
        };
        assert!(error.to_string().contains("Unknown field"));
        assert!(error.to_string().contains("email"));

        let error = FormError::ListFull {
            list: "references".to_string(),
            max: 5,
        };
        assert!(error.to_string().contains("references"));
        assert!(error.to_string().contains('5'));

        let error = FormError::BelowMinimum {
            list: "references".to_string(),
            min: 2,
        };
        assert!(error.to_string().contains("at least 2"));

        let error = FormError::ItemNotFound {
            list: "references".to_string(),
            id: 7,
        };
        assert!(error.to_string().contains("Item 7"));

        let error = FormError::UnknownVisaStatus("tourist".to_string());
        assert!(error.to_string().contains("tourist"));
    }
}
