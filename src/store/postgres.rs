// src/store/postgres.rs
use async_trait::async_trait;
use serde_json::{Map, Value};
use sqlx::{types::Json, FromRow, PgPool};
use tracing::instrument;

use super::{Collection, Document, DocumentStore, Filter, StoreError, UpdateOutcome, ID_FIELD};

/// All collections share one `documents` table; each row carries its
/// collection name and a JSONB body.
#[derive(Clone)]
pub struct PgDocumentStore {
    pool: PgPool,
}

#[derive(FromRow)]
struct DocumentRow {
    id: i64,
    body: Json<Value>,
}

impl DocumentRow {
    fn into_document(self, collection: Collection) -> Result<Document, StoreError> {
        match self.body.0 {
            Value::Object(body) => Ok(Document { id: self.id, body }),
            _ => Err(StoreError::Corrupt { collection: collection.as_str(), id: self.id }),
        }
    }
}

// $2 and $3 are the optional id/email keys of a Filter.
const MATCH_CLAUSE: &str = "collection = $1
           AND ($2::BIGINT IS NULL OR id = $2)
           AND ($3::TEXT IS NULL OR body->>'email' = $3)";

impl PgDocumentStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn migrate(&self) -> Result<(), StoreError> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }

    async fn first_match(&self, collection: Collection, filter: &Filter) -> Result<Option<DocumentRow>, StoreError> {
        let sql = format!("SELECT id, body FROM documents WHERE {MATCH_CLAUSE} ORDER BY id LIMIT 1");
        let row = sqlx::query_as::<_, DocumentRow>(&sql)
            .bind(collection.as_str())
            .bind(filter.id)
            .bind(filter.email.as_deref())
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }
}

#[async_trait]
impl DocumentStore for PgDocumentStore {
    #[instrument(skip(self))]
    async fn find(&self, collection: Collection, filter: &Filter) -> Result<Vec<Document>, StoreError> {
        let sql = format!("SELECT id, body FROM documents WHERE {MATCH_CLAUSE} ORDER BY id");
        let rows = sqlx::query_as::<_, DocumentRow>(&sql)
            .bind(collection.as_str())
            .bind(filter.id)
            .bind(filter.email.as_deref())
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(|row| row.into_document(collection)).collect()
    }

    #[instrument(skip(self))]
    async fn find_one(&self, collection: Collection, filter: &Filter) -> Result<Option<Document>, StoreError> {
        self.first_match(collection, filter)
            .await?
            .map(|row| row.into_document(collection))
            .transpose()
    }

    #[instrument(skip(self, body))]
    async fn insert_one(&self, collection: Collection, mut body: Map<String, Value>) -> Result<i64, StoreError> {
        body.remove(ID_FIELD);
        let id: i64 = sqlx::query_scalar("INSERT INTO documents (collection, body) VALUES ($1, $2) RETURNING id")
            .bind(collection.as_str())
            .bind(Json(Value::Object(body)))
            .fetch_one(&self.pool)
            .await?;
        Ok(id)
    }

    #[instrument(skip(self, value))]
    async fn set_field(
        &self,
        collection: Collection,
        filter: &Filter,
        field: &str,
        value: Value,
    ) -> Result<UpdateOutcome, StoreError> {
        let Some(row) = self.first_match(collection, filter).await? else {
            return Ok(UpdateOutcome { matched: 0, modified: 0 });
        };

        let result = sqlx::query(
            "UPDATE documents
             SET body = body || jsonb_build_object($2::TEXT, $3::JSONB)
             WHERE id = $1 AND (body -> $2::TEXT) IS DISTINCT FROM $3::JSONB",
        )
        .bind(row.id)
        .bind(field)
        .bind(Json(value))
        .execute(&self.pool)
        .await?;

        Ok(UpdateOutcome { matched: 1, modified: result.rows_affected() })
    }

    #[instrument(skip(self))]
    async fn delete_one(&self, collection: Collection, filter: &Filter) -> Result<u64, StoreError> {
        let sql = format!(
            "DELETE FROM documents
             WHERE id = (SELECT id FROM documents WHERE {MATCH_CLAUSE} ORDER BY id LIMIT 1)"
        );
        let result = sqlx::query(&sql)
            .bind(collection.as_str())
            .bind(filter.id)
            .bind(filter.email.as_deref())
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
