//! Business logic services.

pub mod auth;
pub mod checkout;
pub mod notifications;
pub mod sync;
