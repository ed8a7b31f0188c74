// src/database.rs
use std::sync::Arc;

use sqlx::{postgres::PgPoolOptions, PgPool};
use tracing::info;

use crate::config::StoreBackend;
use crate::store::{DocumentStore, MemoryDocumentStore, PgDocumentStore, StoreError};

pub async fn create_pool(database_url: &str, max_connections: u32) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await
}

/// Opens the configured backend, applies migrations and pings it. Any
/// failure here is fatal for startup.
pub async fn connect_store(backend: &StoreBackend) -> Result<Arc<dyn DocumentStore>, StoreError> {
    let store: Arc<dyn DocumentStore> = match backend {
        StoreBackend::Postgres { url, max_connections } => {
            let pool = create_pool(url, *max_connections).await?;
            let store = PgDocumentStore::new(pool);
            store.migrate().await?;
            Arc::new(store)
        }
        StoreBackend::Memory => Arc::new(MemoryDocumentStore::new()),
    };

    store.ping().await?;
    info!("Pinged document store; connection is healthy");
    Ok(store)
}
