use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;

use super::{
    with_id, Collection, CollectionInfo, DeleteOutcome, Document, DocumentId, InsertOutcome,
    StoreError, UpdateOutcome, ID_FIELD,
};

/// In-process collection keeping documents in insertion order, used as the
/// test adapter behind [`Store::in_memory`](super::Store::in_memory).
///
/// Each operation holds the lock for its whole duration, so single-document
/// writes are atomic with respect to each other, as they are in PostgreSQL.
pub struct MemoryCollection {
    info: CollectionInfo,
    documents: RwLock<Vec<(DocumentId, Document)>>,
}

impl MemoryCollection {
    pub fn new(info: CollectionInfo) -> Self {
        Self {
            info,
            documents: RwLock::new(Vec::new()),
        }
    }

    /// Number of stored documents.
    pub async fn len(&self) -> usize {
        self.documents.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl Collection for MemoryCollection {
    async fn find_by_id(&self, id: &str) -> Result<Document, StoreError> {
        let id: DocumentId = id.parse()?;
        self.documents
            .read()
            .await
            .iter()
            .find(|(doc_id, _)| *doc_id == id)
            .map(|(doc_id, doc)| with_id(*doc_id, doc.clone()))
            .ok_or(StoreError::NotFound {
                entity: self.info.entity,
            })
    }

    async fn find_one(&self, field: &str, value: &Value) -> Result<Option<Document>, StoreError> {
        Ok(self
            .documents
            .read()
            .await
            .iter()
            .find(|(_, doc)| doc.get(field) == Some(value))
            .map(|(id, doc)| with_id(*id, doc.clone())))
    }

    async fn find_all(&self) -> Result<Vec<Document>, StoreError> {
        Ok(self
            .documents
            .read()
            .await
            .iter()
            .map(|(id, doc)| with_id(*id, doc.clone()))
            .collect())
    }

    async fn insert_one(&self, mut doc: Document) -> Result<InsertOutcome, StoreError> {
        doc.remove(ID_FIELD);
        let mut documents = self.documents.write().await;

        if let Some(field) = self.info.unique_field {
            if let Some(value) = doc.get(field) {
                if documents.iter().any(|(_, existing)| existing.get(field) == Some(value)) {
                    return Err(StoreError::Conflict(format!(
                        "{}.{} already holds {}",
                        self.info.name, field, value
                    )));
                }
            }
        }

        let id = DocumentId::generate();
        documents.push((id, doc));
        Ok(InsertOutcome::new(id))
    }

    async fn update_one(&self, id: &str, fields: Document) -> Result<UpdateOutcome, StoreError> {
        let id: DocumentId = id.parse()?;
        let mut documents = self.documents.write().await;

        let Some((_, doc)) = documents.iter_mut().find(|(doc_id, _)| *doc_id == id) else {
            return Ok(UpdateOutcome::new(0, 0));
        };

        let mut modified = false;
        for (key, value) in fields {
            if key == ID_FIELD {
                continue;
            }
            if doc.get(&key) != Some(&value) {
                doc.insert(key, value);
                modified = true;
            }
        }
        Ok(UpdateOutcome::new(1, u64::from(modified)))
    }

    async fn delete_one(&self, id: &str) -> Result<DeleteOutcome, StoreError> {
        let id: DocumentId = id.parse()?;
        let mut documents = self.documents.write().await;

        match documents.iter().position(|(doc_id, _)| *doc_id == id) {
            Some(index) => {
                documents.remove(index);
                Ok(DeleteOutcome::new(1))
            }
            None => Ok(DeleteOutcome::new(0)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{TASKS, USERS};
    use serde_json::json;

    fn doc(value: Value) -> Document {
        value.as_object().cloned().expect("test documents are objects")
    }

    #[actix_rt::test]
    async fn test_insert_then_find_by_id() {
        let tasks = MemoryCollection::new(TASKS);
        let outcome = tasks
            .insert_one(doc(json!({ "title": "Write report", "category": "todo" })))
            .await
            .unwrap();

        let found = tasks
            .find_by_id(&outcome.inserted_id.to_string())
            .await
            .unwrap();
        assert_eq!(found["title"], "Write report");
        assert_eq!(found[ID_FIELD], json!(outcome.inserted_id.to_string()));
    }

    #[actix_rt::test]
    async fn test_find_by_id_distinguishes_missing_from_malformed() {
        let tasks = MemoryCollection::new(TASKS);

        match tasks.find_by_id(&DocumentId::generate().to_string()).await {
            Err(StoreError::NotFound { entity }) => assert_eq!(entity, "Task"),
            other => panic!("expected NotFound, got {:?}", other),
        }
        assert!(matches!(
            tasks.find_by_id("12345").await,
            Err(StoreError::InvalidArgument(_))
        ));
    }

    #[actix_rt::test]
    async fn test_unique_field_rejects_duplicates() {
        let users = MemoryCollection::new(USERS);
        users
            .insert_one(doc(json!({ "email": "a@b.com", "name": "A" })))
            .await
            .unwrap();

        let second = users
            .insert_one(doc(json!({ "email": "a@b.com", "name": "B" })))
            .await;
        assert!(matches!(second, Err(StoreError::Conflict(_))));
        assert_eq!(users.len().await, 1);

        let found = users
            .find_one("email", &json!("a@b.com"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found["name"], "A");
    }

    #[actix_rt::test]
    async fn test_update_reports_matched_and_modified() {
        let tasks = MemoryCollection::new(TASKS);
        let id = tasks
            .insert_one(doc(json!({ "title": "t", "category": "todo" })))
            .await
            .unwrap()
            .inserted_id
            .to_string();

        let changed = tasks
            .update_one(&id, doc(json!({ "category": "done" })))
            .await
            .unwrap();
        assert_eq!((changed.matched_count, changed.modified_count), (1, 1));

        let unchanged = tasks
            .update_one(&id, doc(json!({ "category": "done" })))
            .await
            .unwrap();
        assert_eq!((unchanged.matched_count, unchanged.modified_count), (1, 0));

        let missing = tasks
            .update_one(&DocumentId::generate().to_string(), doc(json!({ "category": "x" })))
            .await
            .unwrap();
        assert_eq!(missing.matched_count, 0);

        let task = tasks.find_by_id(&id).await.unwrap();
        assert_eq!(task["category"], "done");
        assert_eq!(task["title"], "t");
    }

    #[actix_rt::test]
    async fn test_delete_is_idempotent_in_count() {
        let tasks = MemoryCollection::new(TASKS);
        let id = tasks
            .insert_one(doc(json!({ "title": "t" })))
            .await
            .unwrap()
            .inserted_id
            .to_string();

        assert_eq!(tasks.delete_one(&id).await.unwrap().deleted_count, 1);
        assert_eq!(tasks.delete_one(&id).await.unwrap().deleted_count, 0);
        assert!(tasks.is_empty().await);
    }
}
