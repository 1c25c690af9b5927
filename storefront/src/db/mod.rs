//! Database Module
//!
//! Embedded SurrealDB: RocksDB on disk for the real store, in-memory for
//! tests. Schema is applied in code at open time (see [`schema`]).

pub mod models;
pub mod repository;
pub mod schema;

use std::path::Path;

use shared::AppError;
use surrealdb::Surreal;
use surrealdb::engine::local::{Db, Mem, RocksDb};

const NAMESPACE: &str = "storefront";
const DATABASE: &str = "storefront";

/// Open the on-disk store and bring the schema up to date
pub async fn open(path: &Path) -> Result<Surreal<Db>, AppError> {
    let db: Surreal<Db> = Surreal::new::<RocksDb>(path)
        .await
        .map_err(|e| AppError::database(format!("Failed to open database: {e}")))?;
    init(&db).await?;
    tracing::info!(path = %path.display(), "database opened");
    Ok(db)
}

/// Open a fresh in-memory store (tests and ephemeral sessions)
pub async fn open_in_memory() -> Result<Surreal<Db>, AppError> {
    let db: Surreal<Db> = Surreal::new::<Mem>(())
        .await
        .map_err(|e| AppError::database(format!("Failed to open in-memory database: {e}")))?;
    init(&db).await?;
    Ok(db)
}

async fn init(db: &Surreal<Db>) -> Result<(), AppError> {
    db.use_ns(NAMESPACE)
        .use_db(DATABASE)
        .await
        .map_err(|e| AppError::database(format!("Failed to select namespace: {e}")))?;
    schema::apply(db).await?;
    Ok(())
}
