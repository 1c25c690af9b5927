//! Storefront engine
//!
//! A local-first plant shop engine: catalog, cart, wishlist, identity,
//! orders, and the inventory reservation rules that keep stock counters and
//! order totals consistent. There is no server backend; every service is a
//! thin wrapper over transactional reads/writes against an embedded
//! database, and all committed mutations are published on a change bus so
//! live views can re-query.
//!
//! # Architecture
//!
//! ```text
//! Catalog ──▶ browsing ──▶ Cart ──▶ Checkout ─┐
//!                                             ▼
//!                              ReservationEngine ──▶ Orders + Plant counters
//!                                             ▲
//!            Admin editor ── User editor ─────┘
//! ```
//!
//! Every stock mutation (checkout, admin order edit, user order edit)
//! flows through [`inventory::ReservationEngine`], which serializes
//! operations per plant and keeps `quantity + selling_quantity ==
//! original_quantity`.

pub mod core;
pub mod db;
pub mod events;
pub mod inventory;
pub mod services;
pub mod utils;

// Re-exports
pub use core::{Config, Store};
pub use inventory::{CheckoutReceipt, ReservationEngine};
pub use shared::{AppError, AppResult, ChangeAction, ChangeEvent, ErrorCode, Role, SessionUser};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};
