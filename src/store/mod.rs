//!
//! # Document Store
//!
//! This module defines the document-store seam used by every handler. A
//! [`Collection`] is a group of JSON documents addressed by a store-generated
//! [`DocumentId`]. Handlers never talk to PostgreSQL directly; they receive a
//! [`Store`] through `web::Data` and call one collection operation per request.
//!
//! Two adapters are provided:
//! - [`postgres::PgCollection`], backed by a `JSONB` column via `sqlx`.
//! - [`memory::MemoryCollection`], an in-process adapter used by the test suite.
//!
//! Every operation returns `Result<_, StoreError>` so the HTTP layer can map
//! error kinds to status codes in one place (see `crate::error`).

pub mod memory;
pub mod postgres;

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use sqlx::PgPool;
use thiserror::Error;
use uuid::Uuid;

pub use memory::MemoryCollection;
pub use postgres::PgCollection;

/// A schemaless JSON document.
pub type Document = Map<String, Value>;

/// Field under which a document's identifier is exposed when read back.
pub const ID_FIELD: &str = "_id";

/// Static description of a collection, shared by all adapters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollectionInfo {
    /// Table / collection name.
    pub name: &'static str,
    /// Human-readable entity name used in "not found" messages.
    pub entity: &'static str,
    /// Top-level field whose value must be unique across the collection.
    pub unique_field: Option<&'static str>,
}

pub const USERS: CollectionInfo = CollectionInfo {
    name: "users",
    entity: "User",
    unique_field: Some("email"),
};

pub const TASKS: CollectionInfo = CollectionInfo {
    name: "tasks",
    entity: "Task",
    unique_field: None,
};

/// Store-generated document identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(Uuid);

impl DocumentId {
    pub fn generate() -> Self {
        DocumentId(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl From<Uuid> for DocumentId {
    fn from(id: Uuid) -> Self {
        DocumentId(id)
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for DocumentId {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s)
            .map(DocumentId)
            .map_err(|_| StoreError::InvalidArgument(format!("malformed document id: {:?}", s)))
    }
}

/// Errors surfaced by collection operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No document matched the given identifier.
    #[error("{entity} not found")]
    NotFound { entity: &'static str },
    /// The caller supplied an argument the store cannot interpret, e.g. a malformed id.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    /// A unique field already holds the given value.
    #[error("conflict: {0}")]
    Conflict(String),
    /// The backing database failed or could not be reached.
    #[error("store unavailable: {0}")]
    Unavailable(#[source] sqlx::Error),
    /// A stored document could not be (de)serialized.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<sqlx::Error> for StoreError {
    fn from(error: sqlx::Error) -> StoreError {
        match &error {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                StoreError::Conflict(db.message().to_string())
            }
            _ => StoreError::Unavailable(error),
        }
    }
}

/// Result of a successful `insert_one`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertOutcome {
    pub acknowledged: bool,
    pub inserted_id: DocumentId,
}

impl InsertOutcome {
    pub fn new(inserted_id: DocumentId) -> Self {
        Self {
            acknowledged: true,
            inserted_id,
        }
    }
}

/// Result of an `update_one`. A zero `matched_count` means no document had the id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOutcome {
    pub acknowledged: bool,
    pub matched_count: u64,
    pub modified_count: u64,
    pub upserted_id: Option<DocumentId>,
    pub upserted_count: u64,
}

impl UpdateOutcome {
    pub fn new(matched_count: u64, modified_count: u64) -> Self {
        Self {
            acknowledged: true,
            matched_count,
            modified_count,
            upserted_id: None,
            upserted_count: 0,
        }
    }
}

/// Result of a `delete_one`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteOutcome {
    pub acknowledged: bool,
    pub deleted_count: u64,
}

impl DeleteOutcome {
    pub fn new(deleted_count: u64) -> Self {
        Self {
            acknowledged: true,
            deleted_count,
        }
    }
}

/// Operations a document collection supports.
///
/// Identifiers are passed as the raw strings received from clients; adapters
/// parse them and report [`StoreError::InvalidArgument`] when malformed.
#[async_trait]
pub trait Collection: Send + Sync {
    /// Returns the document with `id`, or [`StoreError::NotFound`].
    async fn find_by_id(&self, id: &str) -> Result<Document, StoreError>;

    /// Returns the first document whose top-level `field` equals `value`.
    async fn find_one(&self, field: &str, value: &Value) -> Result<Option<Document>, StoreError>;

    /// Returns all documents in insertion order.
    async fn find_all(&self) -> Result<Vec<Document>, StoreError>;

    /// Inserts `doc` under a freshly generated id. Any `_id` in `doc` is ignored.
    async fn insert_one(&self, doc: Document) -> Result<InsertOutcome, StoreError>;

    /// Sets the top-level fields in `fields` on the document with `id`.
    async fn update_one(&self, id: &str, fields: Document) -> Result<UpdateOutcome, StoreError>;

    /// Deletes the document with `id`, if any.
    async fn delete_one(&self, id: &str) -> Result<DeleteOutcome, StoreError>;
}

/// The collections the application works with, shared by all workers.
#[derive(Clone)]
pub struct Store {
    pub users: Arc<dyn Collection>,
    pub tasks: Arc<dyn Collection>,
}

impl Store {
    /// Builds a PostgreSQL-backed store, creating the tables if needed.
    pub async fn postgres(pool: PgPool) -> Result<Self, StoreError> {
        postgres::ensure_schema(&pool, &[USERS, TASKS]).await?;
        Ok(Self {
            users: Arc::new(PgCollection::new(pool.clone(), USERS)),
            tasks: Arc::new(PgCollection::new(pool, TASKS)),
        })
    }

    /// Builds an empty in-process store.
    ///
    /// This is the test adapter: the server binary always runs on
    /// [`Store::postgres`], while unit and integration tests drive the handlers
    /// through this store without a database.
    pub fn in_memory() -> Self {
        Self {
            users: Arc::new(MemoryCollection::new(USERS)),
            tasks: Arc::new(MemoryCollection::new(TASKS)),
        }
    }
}

/// Attaches `id` to `doc` under [`ID_FIELD`].
pub(crate) fn with_id(id: DocumentId, mut doc: Document) -> Document {
    doc.insert(ID_FIELD.to_string(), Value::String(id.to_string()));
    doc
}
