use async_trait::async_trait;
use thiserror::Error;

use usersvc_core::UserId;
use usersvc_users::{User, UserDraft};

/// Storage-level failure.
///
/// `Conflict` is the only variant with business meaning (the boundary maps
/// it to HTTP 409); everything else is an operational fault.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// An integrity constraint was violated on write (e.g. duplicate email).
    #[error("{0}")]
    Conflict(String),

    /// The backend could not be reached (pool closed, connection refused).
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// Any other backend failure.
    #[error("{0}")]
    Backend(String),
}

/// Key-indexed record store for user rows.
///
/// Each call is a single store round trip; implementations provide the
/// atomicity of one write, nothing more. Absent keys are reported as
/// `Ok(None)` / `Ok(false)`, never as errors.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Fetch one record by primary key.
    async fn get(&self, id: UserId) -> Result<Option<User>, StoreError>;

    /// All records in store order (ascending id).
    async fn list(&self) -> Result<Vec<User>, StoreError>;

    /// Persist a new record. The store assigns the id.
    async fn insert(&self, draft: UserDraft) -> Result<User, StoreError>;

    /// Rewrite the record at `user.id()`. The caller has already
    /// established existence.
    async fn update(&self, user: User) -> Result<User, StoreError>;

    /// Remove the record at `id`. Returns whether a row was removed.
    async fn delete(&self, id: UserId) -> Result<bool, StoreError>;
}
