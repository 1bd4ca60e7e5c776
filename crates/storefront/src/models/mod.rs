//! Domain models for the storefront.

pub mod order;
pub mod session;
pub mod user;

pub use order::{Order, OrderLineItem, ShippingInfo};
pub use session::{CurrentUser, session_keys};
pub use user::User;
