use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::store::{Document, DocumentId, ID_FIELD};

/// Payload of `POST /users`: an email plus any other attributes.
///
/// The email is only used as the uniqueness key, so its format is not checked.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserInput {
    pub email: String,
    /// Free-form attributes stored alongside the email.
    #[serde(flatten)]
    pub attributes: Document,
}

impl UserInput {
    pub fn into_document(self) -> Document {
        let mut doc = self.attributes;
        doc.remove(ID_FIELD);
        doc.insert("email".to_string(), Value::String(self.email));
        doc
    }
}

/// Body returned when registering an email that is already taken.
#[derive(Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserExists {
    pub message: String,
    pub inserted_id: Option<DocumentId>,
}

impl Default for UserExists {
    fn default() -> Self {
        Self {
            message: "User already exists".to_string(),
            inserted_id: None,
        }
    }
}
