//! HTTP client for record API requests.
//!
//! This module provides a low-level HTTP client wrapper for making requests
//! to the record API, handling authentication, envelopes and error statuses.

use super::error::RecordApiError;
use super::models::Wrapper;
use reqwest::{Method, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Makes requests to the record API and conforms response data to a model.
///
pub struct Client {
    pub(crate) access_token: Option<String>,
    pub(crate) base_url: String,
    pub(crate) http_client: reqwest::Client,
}

impl Client {
    /// Returns a new instance for the given access token and base URL.
    ///
    pub fn new(access_token: Option<&str>, base_url: &str) -> Result<Self, RecordApiError> {
        Ok(Client {
            access_token: access_token.map(|t| t.to_owned()),
            base_url: base_url.trim_end_matches('/').to_owned(),
            http_client: reqwest::Client::builder().build()?,
        })
    }

    /// Return model data at the path or error.
    ///
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, RecordApiError> {
        self.call_with_body::<T>(Method::GET, path, None).await
    }

    pub async fn post<T: DeserializeOwned>(
        &self,
        path: &str,
        body: Value,
    ) -> Result<T, RecordApiError> {
        self.call_with_body::<T>(Method::POST, path, Some(body)).await
    }

    pub async fn put<T: DeserializeOwned>(
        &self,
        path: &str,
        body: Value,
    ) -> Result<T, RecordApiError> {
        self.call_with_body::<T>(Method::PUT, path, Some(body)).await
    }

    /// Make request with optional body, check the status and unwrap the
    /// `data` envelope.
    ///
    pub(crate) async fn call_with_body<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> Result<T, RecordApiError> {
        let request_url = format!("{}/{}", &self.base_url, path.trim_start_matches('/'));
        log::debug!("{} {}", method, request_url);

        let mut request = self.http_client.request(method, &request_url);
        if let Some(token) = &self.access_token {
            request = request.header("Authorization", format!("Bearer {}", token));
        }
        if let Some(body) = body {
            request = request.json(&Wrapper { data: body });
        }

        let response = request.send().await?;
        let response = Self::check_status(response).await?;

        // Keep the bytes so the body can be logged if deserialization fails
        let response_bytes = response.bytes().await?;
        match serde_json::from_slice::<Wrapper<T>>(&response_bytes) {
            Ok(model) => Ok(model.data),
            Err(e) => {
                log::error!(
                    "Failed to deserialize API response: {}. Response body: {}",
                    e,
                    String::from_utf8_lossy(&response_bytes)
                );
                Err(e.into())
            }
        }
    }

    async fn check_status(response: Response) -> Result<Response, RecordApiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let response_text = response
            .text()
            .await
            .unwrap_or_else(|_| String::from("Unable to read response"));
        log::error!(
            "API request failed with status {}: {}",
            status,
            response_text
        );
        Err(RecordApiError::ApiError {
            status: status.as_u16(),
            message: Self::error_message(status, &response_text),
        })
    }

    /// Prefer the server's `errors[0].message`, falling back to the raw body
    /// or the status reason.
    fn error_message(status: StatusCode, body: &str) -> String {
        if let Ok(json) = serde_json::from_str::<Value>(body) {
            if let Some(message) = json
                .get("errors")
                .and_then(|e| e.as_array())
                .and_then(|e| e.first())
                .and_then(|e| e.get("message"))
                .and_then(|m| m.as_str())
            {
                return message.to_string();
            }
        }
        if body.trim().is_empty() {
            status
                .canonical_reason()
                .unwrap_or("Unknown error")
                .to_string()
        } else {
            body.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_message_prefers_errors_array() {
        let body = r#"{"errors":[{"message":"email is taken"}]}"#;
        assert_eq!(
            Client::error_message(StatusCode::UNPROCESSABLE_ENTITY, body),
            "email is taken"
        );
    }

    #[test]
    fn test_error_message_falls_back() {
        assert_eq!(
            Client::error_message(StatusCode::INTERNAL_SERVER_ERROR, ""),
            "Internal Server Error"
        );
        assert_eq!(
            Client::error_message(StatusCode::BAD_GATEWAY, "upstream down"),
            "upstream down"
        );
    }

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let client = Client::new(None, "http://localhost:8080/").unwrap();
        assert_eq!(client.base_url, "http://localhost:8080");
    }
}
