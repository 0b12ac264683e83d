mod client;
mod error;
mod models;
mod resource;

pub use error::RecordApiError;
pub use resource::Record;

use async_trait::async_trait;
use client::Client;
use log::debug;
use serde_json::{Map, Value};

/// Remote storage for wizard records.
///
/// Any error is treated by callers as a retryable user-facing failure.
#[async_trait]
pub trait RecordSync: Send + Sync {
    async fn create_record(&self, payload: &Map<String, Value>) -> Result<Record, RecordApiError>;

    async fn update_record(
        &self,
        id: &str,
        payload: &Map<String, Value>,
    ) -> Result<Record, RecordApiError>;

    async fn fetch_record_by_id(&self, id: &str) -> Result<Record, RecordApiError>;
}

/// Responsible for asynchronous interaction with the record API for one
/// collection of records.
///
pub struct RecordApi {
    client: Client,
    collection: String,
}

impl RecordApi {
    /// Returns a new instance for the given base URL, token and collection.
    ///
    pub fn new(
        base_url: &str,
        access_token: Option<&str>,
        collection: &str,
    ) -> Result<RecordApi, RecordApiError> {
        debug!(
            "Initializing record API client for '{}' at {}...",
            collection, base_url
        );
        Ok(RecordApi {
            client: Client::new(access_token, base_url)?,
            collection: collection.to_string(),
        })
    }

    fn collection_path(&self) -> String {
        format!("{}/", self.collection)
    }

    fn record_path(&self, id: &str) -> String {
        format!("{}/{}", self.collection, id)
    }
}

#[async_trait]
impl RecordSync for RecordApi {
    async fn create_record(&self, payload: &Map<String, Value>) -> Result<Record, RecordApiError> {
        debug!("Creating record in '{}'...", self.collection);
        let record: Record = self
            .client
            .post(&self.collection_path(), Value::Object(payload.clone()))
            .await?;
        if record.id.is_none() {
            return Err(RecordApiError::MissingId);
        }
        Ok(record)
    }

    async fn update_record(
        &self,
        id: &str,
        payload: &Map<String, Value>,
    ) -> Result<Record, RecordApiError> {
        debug!("Updating record {} in '{}'...", id, self.collection);
        self.client
            .put(&self.record_path(id), Value::Object(payload.clone()))
            .await
    }

    async fn fetch_record_by_id(&self, id: &str) -> Result<Record, RecordApiError> {
        debug!("Requesting record {} from '{}'...", id, self.collection);
        match self.client.get::<Record>(&self.record_path(id)).await {
            Err(RecordApiError::ApiError { status: 404, .. }) => {
                Err(RecordApiError::RecordNotFound { id: id.to_string() })
            }
            other => other,
        }
    }
}
