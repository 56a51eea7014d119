//! Request/response DTOs and field-by-field mapping to/from the domain
//! record.

use serde::{Deserialize, Serialize};

use usersvc_users::{User, UserDraft};

/// Wire representation of a user.
///
/// `password` is write-only: accepted on input, excluded from output
/// serialization. `id` is ignored on input (the store assigns it) and
/// always present on output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserDto {
    #[serde(default)]
    pub id: Option<i32>,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password: String,
}

impl UserDto {
    /// Inbound mapping: the store-independent field set. Any client-sent id
    /// is dropped here.
    pub fn into_draft(self) -> UserDraft {
        UserDraft::new(self.name, self.email, self.password)
    }
}

/// Outbound mapping, field by field.
impl From<&User> for UserDto {
    fn from(user: &User) -> Self {
        Self {
            id: Some(user.id().as_i32()),
            name: user.name().to_string(),
            email: user.email().to_string(),
            password: user.password().to_string(),
        }
    }
}
