//! Database Models

// Catalog
pub mod plant;

// Users
pub mod user;

// Ledgers
pub mod cart_item;
pub mod wishlist;

// Orders
pub mod order;

// Re-exports
pub use cart_item::{CartItem, CartTotals};
pub use order::{Order, OrderDetail, OrderItem, OrderWithUser};
pub use plant::{PLACEHOLDER_IMAGE, Plant, PlantCreate, PlantUpdate};
pub use user::User;
pub use wishlist::WishlistEntry;
