//! Shared types for the storefront engine
//!
//! Common types used across crates: error codes, the application error
//! type, the session actor, and the store-change event payload.

pub mod change;
pub mod error;
pub mod session;

// Re-exports
pub use change::{ChangeAction, ChangeEvent};
pub use error::{AppError, AppResult, ErrorCategory, ErrorCode};
pub use serde::{Deserialize, Serialize};
pub use session::{Role, SessionUser};
