//! Authentication service.
//!
//! Registration, login and profile edits against the user directory,
//! with argon2 password hashing.

mod error;

pub use error::AuthError;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

use oakline_core::{Email, Role, UserId};

use crate::models::session::SessionUser;
use crate::models::user::UserProfile;
use crate::store::users::{NewUser, UserUpdate};
use crate::store::{StoreError, UserDirectory};

/// Minimum password length.
const MIN_PASSWORD_LENGTH: usize = 8;

/// Registration request, pre-hashing.
#[derive(Debug, Clone)]
pub struct Registration {
    pub username: String,
    pub email: String,
    pub password: String,
    pub address: String,
    pub role: Role,
    pub title: Option<String>,
}

/// Profile edit request. `None` leaves a field untouched.
#[derive(Debug, Clone, Default)]
pub struct ProfileEdit {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub address: Option<String>,
}

/// Authentication service.
///
/// Borrows the user directory for the duration of one operation, so a
/// service instance is created per request under the directory lock.
pub struct AuthService<'a> {
    users: &'a mut UserDirectory,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub fn new(users: &'a mut UserDirectory) -> Self {
        Self { users }
    }

    /// Register a new user and persist the directory.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidEmail` if the email format is invalid.
    /// Returns `AuthError::WeakPassword` if the password doesn't meet requirements.
    /// Returns `AuthError::UserAlreadyExists` if the username is taken.
    pub fn register(&mut self, registration: Registration) -> Result<UserProfile, AuthError> {
        let email = Email::parse(&registration.email)?;
        validate_password(&registration.password)?;
        let password_hash = hash_password(&registration.password)?;

        let profile = self
            .users
            .create(NewUser {
                username: registration.username,
                email,
                password_hash,
                address: registration.address,
                role: registration.role,
                title: registration.title,
            })
            .map_err(|e| match e {
                StoreError::Conflict(_) => AuthError::UserAlreadyExists,
                other => AuthError::Store(other),
            })?
            .profile();

        self.users.flush()?;
        Ok(profile)
    }

    /// Login with username and password.
    ///
    /// Credentials are matched on username; a missing user and a wrong
    /// password are indistinguishable to the caller.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` if the username/password is wrong.
    pub fn login(&mut self, username: &str, password: &str) -> Result<SessionUser, AuthError> {
        let user = self
            .users
            .find_by_username(username)
            .ok_or(AuthError::InvalidCredentials)?;

        verify_password(password, &user.password_hash)?;

        Ok(SessionUser {
            id: user.id,
            username: user.username.clone(),
            role: user.role,
        })
    }

    /// Apply a profile edit and persist the directory.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::UserNotFound` if the id is unknown,
    /// `AuthError::UserAlreadyExists` on a username collision, and
    /// validation errors for a bad email or weak password.
    pub fn edit_profile(&mut self, id: UserId, edit: ProfileEdit) -> Result<UserProfile, AuthError> {
        let email = edit.email.as_deref().map(Email::parse).transpose()?;
        let password_hash = match edit.password.as_deref() {
            Some(password) => {
                validate_password(password)?;
                Some(hash_password(password)?)
            }
            None => None,
        };

        let profile = self
            .users
            .edit(
                id,
                UserUpdate {
                    username: edit.username,
                    email,
                    password_hash,
                    address: edit.address,
                },
            )
            .map_err(|e| match e {
                StoreError::Conflict(_) => AuthError::UserAlreadyExists,
                StoreError::NotFound(_) => AuthError::UserNotFound,
                other => AuthError::Store(other),
            })?
            .profile();

        self.users.flush()?;
        Ok(profile)
    }

    /// Get a user's public profile by ID.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::UserNotFound` if the user doesn't exist.
    pub fn get_profile(&self, id: UserId) -> Result<UserProfile, AuthError> {
        self.users
            .get(id)
            .map(crate::models::user::User::profile)
            .ok_or(AuthError::UserNotFound)
    }
}

/// Validate password strength requirements.
fn validate_password(password: &str) -> Result<(), AuthError> {
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(AuthError::WeakPassword(format!(
            "password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }

    Ok(())
}

/// Hash a password using Argon2id.
pub(crate) fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

/// Verify a password against a hash.
fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::InvalidCredentials)?;
    let argon2 = Argon2::default();

    argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::InvalidCredentials)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn directory() -> (tempfile::TempDir, UserDirectory) {
        let dir = tempfile::tempdir().unwrap();
        let users = UserDirectory::open(dir.path().join("users.json")).unwrap();
        (dir, users)
    }

    fn registration(username: &str) -> Registration {
        Registration {
            username: username.to_string(),
            email: format!("{username}@example.com"),
            password: "hunter2hunter2".to_string(),
            address: "12 Elm St".to_string(),
            role: Role::Client,
            title: None,
        }
    }

    #[test]
    fn test_register_then_login() {
        let (_dir, mut users) = directory();
        let mut auth = AuthService::new(&mut users);

        let profile = auth.register(registration("dana")).unwrap();
        assert_eq!(profile.username, "dana");

        let session = auth.login("dana", "hunter2hunter2").unwrap();
        assert_eq!(session.id, profile.id);
        assert_eq!(session.role, Role::Client);

        assert!(matches!(
            auth.login("dana", "wrong-password"),
            Err(AuthError::InvalidCredentials)
        ));
        assert!(matches!(
            auth.login("nobody", "hunter2hunter2"),
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_register_rejects_bad_input() {
        let (_dir, mut users) = directory();
        let mut auth = AuthService::new(&mut users);

        assert!(matches!(
            auth.register(Registration {
                email: "not-an-email".to_string(),
                ..registration("dana")
            }),
            Err(AuthError::InvalidEmail(_))
        ));
        assert!(matches!(
            auth.register(Registration {
                password: "short".to_string(),
                ..registration("dana")
            }),
            Err(AuthError::WeakPassword(_))
        ));

        auth.register(registration("dana")).unwrap();
        assert!(matches!(
            auth.register(registration("dana")),
            Err(AuthError::UserAlreadyExists)
        ));
    }

    #[test]
    fn test_password_is_stored_hashed() {
        let (_dir, mut users) = directory();
        AuthService::new(&mut users)
            .register(registration("dana"))
            .unwrap();

        let stored = users.find_by_username("dana").unwrap();
        assert_ne!(stored.password_hash, "hunter2hunter2");
        assert!(stored.password_hash.starts_with("$argon2"));
    }

    #[test]
    fn test_edit_profile_changes_login_password() {
        let (_dir, mut users) = directory();
        let mut auth = AuthService::new(&mut users);
        let id = auth.register(registration("dana")).unwrap().id;

        let profile = auth
            .edit_profile(
                id,
                ProfileEdit {
                    address: Some("7 Oak Ave".to_string()),
                    password: Some("correct-horse-battery".to_string()),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(profile.address, "7 Oak Ave");

        assert!(auth.login("dana", "hunter2hunter2").is_err());
        auth.login("dana", "correct-horse-battery").unwrap();

        assert!(matches!(
            auth.edit_profile(UserId::new(99), ProfileEdit::default()),
            Err(AuthError::UserNotFound)
        ));
    }
}
