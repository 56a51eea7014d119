//! Users domain module.
//!
//! This crate contains the User record and its field-set operations,
//! implemented purely as deterministic domain logic (no IO, no HTTP, no
//! storage).

pub mod user;

pub use user::{User, UserDraft};
