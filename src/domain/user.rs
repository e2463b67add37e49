use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::{EmailAddress, FullName, Role, UserId};

/// A registered account. Created at registration, mutated by profile and
/// password updates, never deleted by the application.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub full_name: FullName,
    pub email: EmailAddress,
    /// SHA-256 hex digest of the password; never the plaintext.
    pub password_hash: String,
    pub role: Role,
    pub created_at: NaiveDateTime,
}

/// Information required to create a new [`User`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewUser {
    pub full_name: FullName,
    pub email: EmailAddress,
    pub password_hash: String,
    pub role: Role,
    pub created_at: NaiveDateTime,
}
