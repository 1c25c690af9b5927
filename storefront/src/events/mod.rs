//! Store-change events
//!
//! Live views (stock counts, cart badges, order lists) re-render by
//! subscribing to the change bus instead of cross-component refresh calls.

pub mod bus;

pub use bus::{ChangeBus, ResourceVersions};

// Re-export shared payload types for convenience
pub use shared::{ChangeAction, ChangeEvent};
