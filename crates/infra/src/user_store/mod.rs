//! Record store boundary for user rows.
//!
//! This module defines an infrastructure-facing abstraction for a
//! key-indexed record store (integer primary key, store-assigned) without
//! making any storage assumptions. The "not found" business rule lives in
//! the service layer; implementations report absence, not failure.

pub mod in_memory;
pub mod postgres;
pub mod r#trait;

pub use in_memory::InMemoryUserStore;
pub use postgres::PostgresUserStore;
pub use r#trait::{StoreError, UserStore};
