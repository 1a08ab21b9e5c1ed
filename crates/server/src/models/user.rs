//! User domain types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use oakline_core::{Email, Role, UserId};

use crate::models::cart::Cart;

/// A registered user.
///
/// The password is stored as an argon2 hash and never leaves the store
/// in responses; see [`User::profile`]. Client users own exactly one
/// cart, created empty at registration. Management users carry a title
/// instead.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub email: Email,
    pub password_hash: String,
    pub address: String,
    pub role: Role,
    /// Management role/title string; `None` for clients.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// The client's cart; `None` for management users.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cart: Option<Cart>,
    pub created_at: DateTime<Utc>,
}

/// Public view of a user, safe to return from the API.
#[derive(Debug, Clone, Serialize)]
pub struct UserProfile {
    pub id: UserId,
    pub username: String,
    pub email: Email,
    pub address: String,
    pub role: Role,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl User {
    /// Whether this user may perform management operations.
    #[must_use]
    pub fn is_management(&self) -> bool {
        self.role == Role::Management
    }

    /// The hash-free view of this user.
    #[must_use]
    pub fn profile(&self) -> UserProfile {
        UserProfile {
            id: self.id,
            username: self.username.clone(),
            email: self.email.clone(),
            address: self.address.clone(),
            role: self.role,
            title: self.title.clone(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_excludes_password_hash() {
        let user = User {
            id: UserId::new(1),
            username: "dana".to_string(),
            email: Email::parse("dana@example.com").unwrap(),
            password_hash: "$argon2id$v=19$m=19456,t=2,p=1$abc$def".to_string(),
            address: "12 Elm St".to_string(),
            role: Role::Client,
            title: None,
            cart: Some(Cart::new()),
            created_at: Utc::now(),
        };

        let json = serde_json::to_string(&user.profile()).unwrap();
        assert!(!json.contains("argon2"));
        assert!(json.contains("dana"));
    }
}
