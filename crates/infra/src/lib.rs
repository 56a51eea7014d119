//! Infrastructure layer: persistence adapters for the user record store.

pub mod user_store;

pub use user_store::{InMemoryUserStore, PostgresUserStore, StoreError, UserStore};
