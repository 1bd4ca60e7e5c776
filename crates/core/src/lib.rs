//! Shared types for the Velour storefront.
//!
//! This crate holds the small vocabulary of types that cross crate
//! boundaries: newtype entity IDs, the validated [`Email`] address, and the
//! [`OrderStatus`] lifecycle enum. Everything here is plain data with no I/O.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::email::{Email, EmailError};
pub use types::id::{OrderId, UserId};
pub use types::status::OrderStatus;
