//! Inventory Reservation Engine
//!
//! Every change to an order's line items goes through this module so the
//! plant stock counters stay consistent with what has actually been
//! reserved. Checkout, the admin order editor, and the user order editor are
//! different call sites of the same primitive set; none of them touches the
//! counters directly.
//!
//! # Counter model
//!
//! ```text
//! original_quantity  =  quantity  +  selling_quantity
//!  (ever stocked)      (available)   (reserved/sold)
//!
//! reserve(n):  quantity -= n, selling_quantity += n   (refused if short)
//! release(n):  quantity += n, selling_quantity -= n   (clamped at 0)
//! ```
//!
//! # Atomicity
//!
//! Operations on one plant are serialized through a per-plant async lock,
//! and the counter writes themselves are single conditional statements
//! (`WHERE quantity >= $qty`), so two interleaved reservations can never
//! oversell. Multi-record sequences (reserve + line write) roll back the
//! reservation when the line write fails.

pub mod checkout;
pub mod engine;
pub mod locks;


// Re-exports
pub use checkout::CheckoutReceipt;
pub use engine::ReservationEngine;
pub use locks::KeyedLocks;
