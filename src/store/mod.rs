// src/store/mod.rs
//! Document storage behind the HTTP handlers.
//!
//! Every collection holds schemaless JSON objects. Handlers and the role
//! authorizer only ever talk to [`DocumentStore`], so the Postgres backend
//! and the in-memory backend are interchangeable.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use serde_json::{Map, Value};
use thiserror::Error;

pub use memory::MemoryDocumentStore;
pub use postgres::PgDocumentStore;

/// Field name under which a document's id is exposed to clients.
pub const ID_FIELD: &str = "_id";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Users,
    Menu,
    Reviews,
    Carts,
}

impl Collection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Collection::Users => "users",
            Collection::Menu => "menu",
            Collection::Reviews => "reviews",
            Collection::Carts => "carts",
        }
    }
}

/// Conjunctive match on the two keys the service ever queries by.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filter {
    pub id: Option<i64>,
    pub email: Option<String>,
}

impl Filter {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn by_id(id: i64) -> Self {
        Self { id: Some(id), email: None }
    }

    pub fn by_email(email: impl Into<String>) -> Self {
        Self { id: None, email: Some(email.into()) }
    }

    pub fn and_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn matches(&self, doc: &Document) -> bool {
        if let Some(id) = self.id {
            if doc.id != id {
                return false;
            }
        }
        if let Some(email) = &self.email {
            if doc.email() != Some(email.as_str()) {
                return false;
            }
        }
        true
    }
}

/// A stored JSON object and the id the store assigned to it.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: i64,
    pub body: Map<String, Value>,
}

impl Document {
    pub fn email(&self) -> Option<&str> {
        self.body.get("email").and_then(Value::as_str)
    }

    pub fn get_str(&self, field: &str) -> Option<&str> {
        self.body.get(field).and_then(Value::as_str)
    }

    /// Client-facing JSON: the body with `_id` set to the store id.
    pub fn into_json(self) -> Value {
        let mut body = self.body;
        body.insert(ID_FIELD.to_string(), Value::from(self.id));
        Value::Object(body)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpdateOutcome {
    pub matched: u64,
    pub modified: u64,
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("migration failed: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
    #[error("stored document {id} in {collection} is not a JSON object")]
    Corrupt { collection: &'static str, id: i64 },
}

#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn find(&self, collection: Collection, filter: &Filter) -> Result<Vec<Document>, StoreError>;

    async fn find_one(&self, collection: Collection, filter: &Filter) -> Result<Option<Document>, StoreError> {
        Ok(self.find(collection, filter).await?.into_iter().next())
    }

    /// Stores `body` and returns the id assigned to it. A client-supplied
    /// `_id` in the body is discarded.
    async fn insert_one(&self, collection: Collection, body: Map<String, Value>) -> Result<i64, StoreError>;

    /// Sets one top-level field on the first document matching `filter`.
    async fn set_field(
        &self,
        collection: Collection,
        filter: &Filter,
        field: &str,
        value: Value,
    ) -> Result<UpdateOutcome, StoreError>;

    /// Deletes the first document matching `filter`, returning the number removed.
    async fn delete_one(&self, collection: Collection, filter: &Filter) -> Result<u64, StoreError>;

    async fn ping(&self) -> Result<(), StoreError>;
}
