//! Store state
//!
//! [`Store`] is the root object: configuration, the embedded database
//! handle, the change bus, and the per-plant lock map shared by every
//! reservation operation. It is `Clone`: all fields are shared handles, so
//! copies are cheap and observe the same store.

use std::sync::Arc;

use serde_json::Value;
use shared::{AppResult, ChangeAction, ChangeEvent};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;
use tokio::sync::broadcast;

use crate::core::Config;
use crate::db;
use crate::events::ChangeBus;
use crate::inventory::{KeyedLocks, ReservationEngine};
use crate::services::{
    CartService, CatalogService, IdentityService, OrderService, ReportingService, WishlistService,
};

#[derive(Clone)]
pub struct Store {
    /// Store configuration
    pub config: Config,
    /// Embedded database handle
    pub db: Surreal<Db>,
    /// Change bus for live views
    changes: Arc<ChangeBus>,
    /// Per-plant locks serializing reservation operations
    pub(crate) locks: Arc<KeyedLocks>,
}

impl Store {
    /// Open the on-disk store under `config.work_dir`
    pub async fn open(config: &Config) -> AppResult<Self> {
        let db_dir = config.database_dir();
        std::fs::create_dir_all(&db_dir).map_err(|e| {
            shared::AppError::config(format!(
                "Failed to create database directory {}: {e}",
                db_dir.display()
            ))
        })?;

        let db = db::open(&db_dir.join("store.db")).await?;
        Ok(Self::with_db(config.clone(), db))
    }

    /// Open a fresh in-memory store (tests and ephemeral sessions)
    pub async fn open_in_memory() -> AppResult<Self> {
        let db = db::open_in_memory().await?;
        Ok(Self::with_db(Config::with_work_dir(":memory:"), db))
    }

    fn with_db(config: Config, db: Surreal<Db>) -> Self {
        Self {
            config,
            db,
            changes: Arc::new(ChangeBus::new()),
            locks: Arc::new(KeyedLocks::new()),
        }
    }

    /// Subscribe to committed store changes
    pub fn subscribe(&self) -> broadcast::Receiver<ChangeEvent> {
        self.changes.subscribe()
    }

    /// Current change version for a resource
    pub fn change_version(&self, resource: &str) -> u64 {
        self.changes.version(resource)
    }

    /// Publish a committed change to all subscribers
    pub(crate) fn publish(
        &self,
        resource: &str,
        action: ChangeAction,
        id: impl Into<String>,
        data: Option<Value>,
    ) {
        self.changes.publish(resource, action, id, data);
    }

    // =========================================================================
    // Service accessors
    // =========================================================================

    /// The inventory reservation engine
    pub fn engine(&self) -> ReservationEngine {
        ReservationEngine::new(self.clone())
    }

    pub fn catalog(&self) -> CatalogService {
        CatalogService::new(self.clone())
    }

    pub fn cart(&self) -> CartService {
        CartService::new(self.clone())
    }

    pub fn wishlist(&self) -> WishlistService {
        WishlistService::new(self.clone())
    }

    pub fn identity(&self) -> IdentityService {
        IdentityService::new(self.clone())
    }

    pub fn orders(&self) -> OrderService {
        OrderService::new(self.clone())
    }

    pub fn reporting(&self) -> ReportingService {
        ReportingService::new(self.clone())
    }
}
