use std::sync::Arc;

use sqlx::PgPool;

use usersvc_core::{DomainError, DomainResult, UserId};
use usersvc_infra::{InMemoryUserStore, PostgresUserStore, StoreError, UserStore};
use usersvc_users::{User, UserDraft};

/// Orchestrates store access for the user resource.
///
/// The sole place holding business rules — currently: "not found"
/// detection. Each operation is a single store round trip (plus at most one
/// existence check), success or a single typed failure; no retries, no
/// partial-failure semantics.
pub struct UserService {
    store: Arc<dyn UserStore>,
}

impl UserService {
    pub fn new(store: Arc<dyn UserStore>) -> Self {
        Self { store }
    }

    /// The user at `id`, or `NotFound`.
    pub async fn find_by_id(&self, id: UserId) -> DomainResult<User> {
        self.store
            .get(id)
            .await
            .map_err(store_error)?
            .ok_or_else(|| not_found(id))
    }

    /// All users in store order; empty when the store is empty.
    pub async fn find_all(&self) -> DomainResult<Vec<User>> {
        self.store.list().await.map_err(store_error)
    }

    /// Persist a new user; the store assigns the id.
    pub async fn create(&self, draft: UserDraft) -> DomainResult<User> {
        self.store.insert(draft).await.map_err(store_error)
    }

    /// Map draft fields onto the user at `id` and persist; `NotFound` if
    /// absent. The id is preserved.
    pub async fn update(&self, id: UserId, draft: UserDraft) -> DomainResult<User> {
        let mut user = self.find_by_id(id).await?;
        user.apply(draft);
        self.store.update(user).await.map_err(store_error)
    }

    /// Remove the user at `id`; `NotFound` if absent.
    pub async fn delete(&self, id: UserId) -> DomainResult<()> {
        if self.store.delete(id).await.map_err(store_error)? {
            Ok(())
        } else {
            Err(not_found(id))
        }
    }
}

fn not_found(id: UserId) -> DomainError {
    DomainError::not_found(format!("user {} not found", id))
}

fn store_error(err: StoreError) -> DomainError {
    match err {
        StoreError::Conflict(msg) => DomainError::Conflict(msg),
        other => DomainError::store(other.to_string()),
    }
}

/// Pick the store from the environment: `DATABASE_URL` set → Postgres,
/// otherwise the in-memory store (dev/test).
pub async fn build_store() -> Arc<dyn UserStore> {
    match std::env::var("DATABASE_URL") {
        Ok(url) => match PgPool::connect(&url).await {
            Ok(pool) => {
                tracing::info!("using postgres user store");
                Arc::new(PostgresUserStore::new(pool))
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to connect to postgres, falling back to in-memory store");
                Arc::new(InMemoryUserStore::new())
            }
        },
        Err(_) => {
            tracing::info!("DATABASE_URL not set, using in-memory user store");
            Arc::new(InMemoryUserStore::new())
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use super::*;

    fn service() -> UserService {
        UserService::new(Arc::new(InMemoryUserStore::new()))
    }

    fn draft(name: &str, email: &str) -> UserDraft {
        UserDraft::new(name, email, "123")
    }

    #[tokio::test]
    async fn find_by_id_returns_the_stored_user() {
        let service = service();
        let created = service
            .create(draft("nomeTeste", "emailTeste@gmail.com"))
            .await
            .unwrap();

        let found = service.find_by_id(created.id()).await.unwrap();

        assert_eq!(found, created);
    }

    #[tokio::test]
    async fn find_by_id_absent_is_not_found() {
        let err = service().find_by_id(UserId::new(2)).await.unwrap_err();

        assert_eq!(err, DomainError::NotFound("user 2 not found".to_string()));
    }

    #[tokio::test]
    async fn find_all_on_empty_store_is_empty() {
        assert!(service().find_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn create_returns_the_persisted_record() {
        let service = service();

        let created = service.create(draft("a", "a@example.com")).await.unwrap();

        assert_eq!(created.id().as_i32(), 1);
        assert_eq!(created.name(), "a");
        assert_eq!(service.find_all().await.unwrap(), vec![created]);
    }

    #[tokio::test]
    async fn create_duplicate_email_is_a_conflict() {
        let service = service();
        service.create(draft("a", "a@example.com")).await.unwrap();

        let err = service.create(draft("b", "a@example.com")).await.unwrap_err();

        assert!(matches!(err, DomainError::Conflict(_)));
    }

    #[tokio::test]
    async fn update_maps_draft_onto_found_user() {
        let service = service();
        let created = service.create(draft("a", "a@example.com")).await.unwrap();

        let updated = service
            .update(created.id(), draft("renamed", "renamed@example.com"))
            .await
            .unwrap();

        assert_eq!(updated.id(), created.id());
        assert_eq!(updated.name(), "renamed");
        assert_eq!(updated.email(), "renamed@example.com");
    }

    #[tokio::test]
    async fn update_absent_is_not_found() {
        let err = service()
            .update(UserId::new(9), draft("a", "a@example.com"))
            .await
            .unwrap_err();

        assert!(matches!(err, DomainError::NotFound(_)));
    }

    #[tokio::test]
    async fn delete_absent_is_not_found() {
        let err = service().delete(UserId::new(9)).await.unwrap_err();

        assert!(matches!(err, DomainError::NotFound(_)));
    }

    /// Counts store calls so tests can pin down the single-round-trip
    /// contract.
    struct CountingStore {
        inner: InMemoryUserStore,
        deletes: AtomicUsize,
    }

    impl CountingStore {
        fn new() -> Self {
            Self {
                inner: InMemoryUserStore::new(),
                deletes: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl UserStore for CountingStore {
        async fn get(&self, id: UserId) -> Result<Option<User>, StoreError> {
            self.inner.get(id).await
        }

        async fn list(&self) -> Result<Vec<User>, StoreError> {
            self.inner.list().await
        }

        async fn insert(&self, draft: UserDraft) -> Result<User, StoreError> {
            self.inner.insert(draft).await
        }

        async fn update(&self, user: User) -> Result<User, StoreError> {
            self.inner.update(user).await
        }

        async fn delete(&self, id: UserId) -> Result<bool, StoreError> {
            self.deletes.fetch_add(1, Ordering::SeqCst);
            self.inner.delete(id).await
        }
    }

    #[tokio::test]
    async fn delete_invokes_store_deletion_exactly_once() {
        let store = Arc::new(CountingStore::new());
        let service = UserService::new(store.clone());
        let created = service.create(draft("a", "a@example.com")).await.unwrap();

        service.delete(created.id()).await.unwrap();

        assert_eq!(store.deletes.load(Ordering::SeqCst), 1);
    }
}
