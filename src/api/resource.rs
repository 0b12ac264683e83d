use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Defines the record data structure shared by every wizard.
///
/// Section payloads are merged flat into `fields`; list payloads are nested
/// arrays under the list's name.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Record {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub complete: bool,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Record {
    /// Returns a record with an id and no fields.
    ///
    pub fn with_id(id: &str) -> Self {
        Record {
            id: Some(id.to_string()),
            ..Record::default()
        }
    }

    /// Overwrite fields with every key of the payload.
    ///
    pub fn merge(&mut self, item: &Map<String, Value>) -> &mut Self {
        for (key, value) in item.iter() {
            if key == "complete" {
                self.complete = value.as_bool().unwrap_or(self.complete);
                continue;
            }
            self.fields.insert(key.clone(), value.clone());
        }
        self
    }
}
