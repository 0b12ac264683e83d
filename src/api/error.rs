//! Record API-specific error types.

/// Errors that can occur during record API operations.
#[derive(Debug, thiserror::Error)]
pub enum RecordApiError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    HttpRequest(#[from] reqwest::Error),

    /// API returned an error response
    #[error("API error (status {status}): {message}")]
    ApiError { status: u16, message: String },

    /// Failed to deserialize API response
    #[error("Failed to deserialize API response: {0}")]
    Deserialization(#[from] serde_json::Error),

    /// Record not found
    #[error("Record not found: {id}")]
    RecordNotFound { id: String },

    /// Server accepted a write but returned no record id
    #[error("Server returned a record without an id")]
    MissingId,

    /// Sync did not settle within the configured timeout
    #[error("Request timed out after {seconds}s")]
    Timeout { seconds: u64 },
}
