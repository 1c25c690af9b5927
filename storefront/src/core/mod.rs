//! Core Module
//!
//! Configuration and the [`Store`] root object.

pub mod config;
pub mod state;

pub use config::Config;
pub use state::Store;
