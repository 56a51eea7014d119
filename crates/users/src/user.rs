use usersvc_core::{Entity, UserId};

/// The store-independent field set of a user.
///
/// Used both for inserts (before the store has assigned an id) and for
/// mapping inbound fields onto an existing record on update. Field presence
/// is enforced at the wire boundary; the draft itself carries no rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserDraft {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl UserDraft {
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            password: password.into(),
        }
    }
}

/// A persisted user record.
///
/// The id is assigned by the record store and never changes afterwards;
/// `apply` rewrites every other field. The password is held in memory like
/// any other field — keeping it out of outbound serialization is the wire
/// layer's job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    id: UserId,
    name: String,
    email: String,
    password: String,
}

impl User {
    /// Build a record from a draft once the store has assigned an id.
    pub fn new(id: UserId, draft: UserDraft) -> Self {
        Self {
            id,
            name: draft.name,
            email: draft.email,
            password: draft.password,
        }
    }

    /// Rehydrate a record from already-persisted parts (store row → domain).
    pub fn from_parts(
        id: UserId,
        name: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            email: email.into(),
            password: password.into(),
        }
    }

    /// Map draft fields onto this record. The id is preserved.
    pub fn apply(&mut self, draft: UserDraft) {
        self.name = draft.name;
        self.email = draft.email;
        self.password = draft.password;
    }

    pub fn id(&self) -> UserId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn password(&self) -> &str {
        &self.password
    }
}

impl Entity for User {
    type Id = UserId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
