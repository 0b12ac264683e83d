use serde::{Deserialize, Serialize};

/// Envelope used by the record API for request and response bodies.
///
#[derive(Debug, Serialize, Deserialize)]
pub struct Wrapper<T> {
    pub data: T,
}
