//! Versioned store schema
//!
//! The schema is applied in code: each version is a batch of `DEFINE`
//! statements, and the applied version is recorded in `schema_meta`. Later
//! versions only add tables, fields, or indexes, never remove, so a store
//! written by an older build opens cleanly under a newer one.

use serde::{Deserialize, Serialize};
use shared::AppError;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

/// Current schema version
pub const SCHEMA_VERSION: u32 = 2;

const META_TABLE: &str = "schema_meta";
const META_KEY: &str = "version";

/// Version 1: core tables and the lookup indexes implied by the query
/// patterns: by user, by (user, plant) pair, by order, by (order, plant)
/// pair, by country.
const V1: &str = "
    DEFINE TABLE IF NOT EXISTS users SCHEMALESS;
    DEFINE INDEX IF NOT EXISTS users_email ON users FIELDS email UNIQUE;

    DEFINE TABLE IF NOT EXISTS cart SCHEMALESS;
    DEFINE INDEX IF NOT EXISTS cart_user ON cart FIELDS user;
    DEFINE INDEX IF NOT EXISTS cart_user_plant ON cart FIELDS user, plant UNIQUE;

    DEFINE TABLE IF NOT EXISTS likes SCHEMALESS;
    DEFINE INDEX IF NOT EXISTS likes_user ON likes FIELDS user;
    DEFINE INDEX IF NOT EXISTS likes_user_plant ON likes FIELDS user, plant UNIQUE;

    DEFINE TABLE IF NOT EXISTS orders SCHEMALESS;
    DEFINE INDEX IF NOT EXISTS orders_user ON orders FIELDS user;

    DEFINE TABLE IF NOT EXISTS order_items SCHEMALESS;
    DEFINE INDEX IF NOT EXISTS order_items_order ON order_items FIELDS order;
    DEFINE INDEX IF NOT EXISTS order_items_order_plant ON order_items FIELDS order, plant;

    DEFINE TABLE IF NOT EXISTS plants SCHEMALESS;
    DEFINE INDEX IF NOT EXISTS plants_country ON plants FIELDS country;
";

/// Version 2: admin inventory era, stock-range queries and per-admin
/// catalog listing.
const V2: &str = "
    DEFINE INDEX IF NOT EXISTS plants_quantity ON plants FIELDS quantity;
    DEFINE INDEX IF NOT EXISTS plants_created_by ON plants FIELDS created_by;
";

#[derive(Debug, Serialize, Deserialize)]
struct SchemaMeta {
    version: u32,
}

/// Bring the store schema up to [`SCHEMA_VERSION`]
pub async fn apply(db: &Surreal<Db>) -> Result<(), AppError> {
    let current = applied_version(db).await?;
    if current >= SCHEMA_VERSION {
        return Ok(());
    }

    for (version, statements) in [(1, V1), (2, V2)] {
        if current < version {
            db.query(statements)
                .await
                .map_err(|e| AppError::database(format!("schema v{version} failed: {e}")))?
                .check()
                .map_err(|e| AppError::database(format!("schema v{version} failed: {e}")))?;
            tracing::info!(version, "schema version applied");
        }
    }

    let _: Option<SchemaMeta> = db
        .upsert((META_TABLE, META_KEY))
        .content(SchemaMeta {
            version: SCHEMA_VERSION,
        })
        .await
        .map_err(|e| AppError::database(format!("Failed to record schema version: {e}")))?;
    Ok(())
}

/// Read the applied schema version, 0 for a fresh store
pub async fn applied_version(db: &Surreal<Db>) -> Result<u32, AppError> {
    let meta: Option<SchemaMeta> = db
        .select((META_TABLE, META_KEY))
        .await
        .map_err(|e| AppError::database(format!("Failed to read schema version: {e}")))?;
    Ok(meta.map(|m| m.version).unwrap_or(0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_apply_records_version() {
        let db = crate::db::open_in_memory().await.unwrap();
        assert_eq!(applied_version(&db).await.unwrap(), SCHEMA_VERSION);
    }

    #[tokio::test]
    async fn test_apply_is_idempotent() {
        let db = crate::db::open_in_memory().await.unwrap();
        apply(&db).await.unwrap();
        apply(&db).await.unwrap();
        assert_eq!(applied_version(&db).await.unwrap(), SCHEMA_VERSION);
    }
}
