use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::store::{Document, ID_FIELD};

/// A task as submitted by a client: any JSON object.
///
/// Tasks are schemaless; by convention they carry a `category`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskInput(pub Document);

impl TaskInput {
    /// Converts the input into a document ready for insertion.
    /// A client-supplied `_id` is dropped; the store assigns identifiers.
    pub fn into_document(self) -> Document {
        let mut doc = self.0;
        doc.remove(ID_FIELD);
        doc
    }
}

/// Payload of `PUT /tasks/{id}`. Only the category of a task can be changed.
///
/// Like the rest of a task, the category is schemaless: any JSON value is
/// stored as given, and a missing `category` is stored as `null`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryUpdate {
    #[serde(default)]
    pub category: Value,
}

impl CategoryUpdate {
    /// The fields to set on the stored task.
    pub fn into_fields(self) -> Document {
        let mut fields = Document::new();
        fields.insert("category".to_string(), self.category);
        fields
    }
}
