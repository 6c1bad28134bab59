use async_trait::async_trait;
use serde_json::Value;
use sqlx::types::Json;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use super::{
    with_id, Collection, CollectionInfo, DeleteOutcome, Document, DocumentId, InsertOutcome,
    StoreError, UpdateOutcome, ID_FIELD,
};

/// Creates the table backing each collection if it does not exist yet,
/// plus a unique expression index for collections with a unique field.
pub async fn ensure_schema(pool: &PgPool, collections: &[CollectionInfo]) -> Result<(), StoreError> {
    for info in collections {
        sqlx::query(&format!(
            "CREATE TABLE IF NOT EXISTS {} (
                id UUID PRIMARY KEY,
                doc JSONB NOT NULL,
                created_at TIMESTAMPTZ NOT NULL DEFAULT now()
            )",
            info.name
        ))
        .execute(pool)
        .await?;

        if let Some(field) = info.unique_field {
            sqlx::query(&format!(
                "CREATE UNIQUE INDEX IF NOT EXISTS {table}_{field}_key ON {table} ((doc->>'{field}'))",
                table = info.name,
                field = field
            ))
            .execute(pool)
            .await?;
        }
        log::debug!("Collection `{}` is ready", info.name);
    }
    Ok(())
}

#[derive(FromRow)]
struct DocumentRow {
    id: Uuid,
    doc: Json<Document>,
}

impl DocumentRow {
    fn into_document(self) -> Document {
        with_id(DocumentId::from(self.id), self.doc.0)
    }
}

/// A collection stored as `(id, doc JSONB)` rows in a PostgreSQL table.
///
/// Table names come from a static [`CollectionInfo`], never from request data.
#[derive(Debug, Clone)]
pub struct PgCollection {
    pool: PgPool,
    info: CollectionInfo,
}

impl PgCollection {
    pub fn new(pool: PgPool, info: CollectionInfo) -> Self {
        Self { pool, info }
    }
}

#[async_trait]
impl Collection for PgCollection {
    async fn find_by_id(&self, id: &str) -> Result<Document, StoreError> {
        let id: DocumentId = id.parse()?;
        let row = sqlx::query_as::<_, DocumentRow>(&format!(
            "SELECT id, doc FROM {} WHERE id = $1",
            self.info.name
        ))
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        row.map(DocumentRow::into_document)
            .ok_or(StoreError::NotFound {
                entity: self.info.entity,
            })
    }

    async fn find_one(&self, field: &str, value: &Value) -> Result<Option<Document>, StoreError> {
        let row = sqlx::query_as::<_, DocumentRow>(&format!(
            "SELECT id, doc FROM {} WHERE doc -> $1 = $2 ORDER BY created_at LIMIT 1",
            self.info.name
        ))
        .bind(field)
        .bind(Json(value))
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(DocumentRow::into_document))
    }

    async fn find_all(&self) -> Result<Vec<Document>, StoreError> {
        let rows = sqlx::query_as::<_, DocumentRow>(&format!(
            "SELECT id, doc FROM {} ORDER BY created_at, id",
            self.info.name
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(DocumentRow::into_document).collect())
    }

    async fn insert_one(&self, mut doc: Document) -> Result<InsertOutcome, StoreError> {
        doc.remove(ID_FIELD);
        let id = DocumentId::generate();

        sqlx::query(&format!(
            "INSERT INTO {} (id, doc) VALUES ($1, $2)",
            self.info.name
        ))
        .bind(id.as_uuid())
        .bind(Json(&doc))
        .execute(&self.pool)
        .await?;

        Ok(InsertOutcome::new(id))
    }

    async fn update_one(&self, id: &str, mut fields: Document) -> Result<UpdateOutcome, StoreError> {
        let id: DocumentId = id.parse()?;
        fields.remove(ID_FIELD);

        // `prev` holds the row as it was before the update, `t` as it is after.
        let modified = sqlx::query_scalar::<_, bool>(&format!(
            "UPDATE {table} AS t SET doc = t.doc || $2
             FROM (SELECT id, doc FROM {table} WHERE id = $1 FOR UPDATE) AS prev
             WHERE t.id = prev.id
             RETURNING prev.doc IS DISTINCT FROM t.doc",
            table = self.info.name
        ))
        .bind(id.as_uuid())
        .bind(Json(&fields))
        .fetch_all(&self.pool)
        .await?;

        let matched = modified.len() as u64;
        let modified = modified.into_iter().filter(|changed| *changed).count() as u64;
        Ok(UpdateOutcome::new(matched, modified))
    }

    async fn delete_one(&self, id: &str) -> Result<DeleteOutcome, StoreError> {
        let id: DocumentId = id.parse()?;
        let result = sqlx::query(&format!("DELETE FROM {} WHERE id = $1", self.info.name))
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await?;

        Ok(DeleteOutcome::new(result.rows_affected()))
    }
}
