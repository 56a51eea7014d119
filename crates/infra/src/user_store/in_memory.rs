use std::collections::BTreeMap;
use std::sync::RwLock;

use async_trait::async_trait;

use usersvc_core::UserId;
use usersvc_users::{User, UserDraft};

use super::r#trait::{StoreError, UserStore};

#[derive(Debug, Default)]
struct Rows {
    by_id: BTreeMap<UserId, User>,
    next_id: i32,
}

/// In-memory user record store.
///
/// Intended for tests/dev. Ids are assigned from a monotonically increasing
/// counter, so store order (ascending id) is insertion order. Enforces the
/// same unique-email constraint as the relational schema so integrity
/// conflicts surface identically on both backends.
#[derive(Debug, Default)]
pub struct InMemoryUserStore {
    rows: RwLock<Rows>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn email_taken(rows: &Rows, email: &str, excluding: Option<UserId>) -> bool {
        rows.by_id
            .values()
            .any(|u| u.email() == email && Some(u.id()) != excluding)
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn get(&self, id: UserId) -> Result<Option<User>, StoreError> {
        let rows = self
            .rows
            .read()
            .map_err(|_| StoreError::Backend("lock poisoned".to_string()))?;
        Ok(rows.by_id.get(&id).cloned())
    }

    async fn list(&self) -> Result<Vec<User>, StoreError> {
        let rows = self
            .rows
            .read()
            .map_err(|_| StoreError::Backend("lock poisoned".to_string()))?;
        // BTreeMap iterates in key order, which is assignment order here.
        Ok(rows.by_id.values().cloned().collect())
    }

    async fn insert(&self, draft: UserDraft) -> Result<User, StoreError> {
        let mut rows = self
            .rows
            .write()
            .map_err(|_| StoreError::Backend("lock poisoned".to_string()))?;

        if Self::email_taken(&rows, &draft.email, None) {
            return Err(StoreError::Conflict(format!(
                "email '{}' already registered",
                draft.email
            )));
        }

        rows.next_id += 1;
        let user = User::new(UserId::new(rows.next_id), draft);
        rows.by_id.insert(user.id(), user.clone());
        Ok(user)
    }

    async fn update(&self, user: User) -> Result<User, StoreError> {
        let mut rows = self
            .rows
            .write()
            .map_err(|_| StoreError::Backend("lock poisoned".to_string()))?;

        if Self::email_taken(&rows, user.email(), Some(user.id())) {
            return Err(StoreError::Conflict(format!(
                "email '{}' already registered",
                user.email()
            )));
        }

        if !rows.by_id.contains_key(&user.id()) {
            // Existence is the caller's responsibility; a vanished row is a
            // backend fault, not a business outcome.
            return Err(StoreError::Backend(format!(
                "update affected no rows for id {}",
                user.id()
            )));
        }

        rows.by_id.insert(user.id(), user.clone());
        Ok(user)
    }

    async fn delete(&self, id: UserId) -> Result<bool, StoreError> {
        let mut rows = self
            .rows
            .write()
            .map_err(|_| StoreError::Backend("lock poisoned".to_string()))?;
        Ok(rows.by_id.remove(&id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(name: &str, email: &str) -> UserDraft {
        UserDraft::new(name, email, "123")
    }

    #[tokio::test]
    async fn insert_assigns_ascending_ids() {
        let store = InMemoryUserStore::new();

        let a = store.insert(draft("a", "a@example.com")).await.unwrap();
        let b = store.insert(draft("b", "b@example.com")).await.unwrap();

        assert_eq!(a.id().as_i32(), 1);
        assert_eq!(b.id().as_i32(), 2);
    }

    #[tokio::test]
    async fn get_returns_inserted_record() {
        let store = InMemoryUserStore::new();
        let inserted = store.insert(draft("a", "a@example.com")).await.unwrap();

        let found = store.get(inserted.id()).await.unwrap();

        assert_eq!(found, Some(inserted));
    }

    #[tokio::test]
    async fn get_absent_id_is_none_not_error() {
        let store = InMemoryUserStore::new();

        assert_eq!(store.get(UserId::new(42)).await.unwrap(), None);
    }

    #[tokio::test]
    async fn list_is_ordered_by_id() {
        let store = InMemoryUserStore::new();
        store.insert(draft("a", "a@example.com")).await.unwrap();
        store.insert(draft("b", "b@example.com")).await.unwrap();
        store.insert(draft("c", "c@example.com")).await.unwrap();

        let all = store.list().await.unwrap();

        let ids: Vec<i32> = all.iter().map(|u| u.id().as_i32()).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn list_empty_store_is_empty_vec() {
        let store = InMemoryUserStore::new();

        assert!(store.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn insert_rejects_duplicate_email() {
        let store = InMemoryUserStore::new();
        store.insert(draft("a", "a@example.com")).await.unwrap();

        let err = store.insert(draft("b", "a@example.com")).await.unwrap_err();

        assert!(matches!(err, StoreError::Conflict(_)));
    }

    #[tokio::test]
    async fn update_rewrites_fields() {
        let store = InMemoryUserStore::new();
        let mut user = store.insert(draft("a", "a@example.com")).await.unwrap();

        user.apply(UserDraft::new("renamed", "renamed@example.com", "pw"));
        let updated = store.update(user.clone()).await.unwrap();

        assert_eq!(updated, user);
        assert_eq!(store.get(user.id()).await.unwrap(), Some(user));
    }

    #[tokio::test]
    async fn update_rejects_email_of_another_row() {
        let store = InMemoryUserStore::new();
        store.insert(draft("a", "a@example.com")).await.unwrap();
        let mut b = store.insert(draft("b", "b@example.com")).await.unwrap();

        b.apply(UserDraft::new("b", "a@example.com", "123"));
        let err = store.update(b).await.unwrap_err();

        assert!(matches!(err, StoreError::Conflict(_)));
    }

    #[tokio::test]
    async fn update_keeping_own_email_is_not_a_conflict() {
        let store = InMemoryUserStore::new();
        let mut user = store.insert(draft("a", "a@example.com")).await.unwrap();

        user.apply(UserDraft::new("renamed", "a@example.com", "123"));

        assert!(store.update(user).await.is_ok());
    }

    #[tokio::test]
    async fn delete_reports_whether_a_row_was_removed() {
        let store = InMemoryUserStore::new();
        let user = store.insert(draft("a", "a@example.com")).await.unwrap();

        assert!(store.delete(user.id()).await.unwrap());
        assert!(!store.delete(user.id()).await.unwrap());
        assert_eq!(store.get(user.id()).await.unwrap(), None);
    }
}
