//! User directory: registered clients and management accounts.

use std::path::{Path, PathBuf};

use chrono::Utc;
use tracing::info;

use oakline_core::{Email, Role, UserId};

use crate::models::cart::Cart;
use crate::models::user::User;
use crate::store::{StoreError, load_snapshot, save_snapshot};

/// Fields required to register a user. Ids and timestamps are assigned
/// by the directory.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: Email,
    pub password_hash: String,
    pub address: String,
    pub role: Role,
    pub title: Option<String>,
}

/// Profile fields a user may change after registration. `None` leaves
/// the field untouched.
#[derive(Debug, Clone, Default)]
pub struct UserUpdate {
    pub username: Option<String>,
    pub email: Option<Email>,
    pub password_hash: Option<String>,
    pub address: Option<String>,
}

/// All registered users, keyed by unique username.
///
/// Client users get an empty cart at creation; management users carry a
/// title and no cart. Mutations are in-memory until
/// [`UserDirectory::flush`].
#[derive(Debug)]
pub struct UserDirectory {
    path: PathBuf,
    users: Vec<User>,
}

impl UserDirectory {
    /// Open the directory at `path`. A missing file yields an empty
    /// directory.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] / [`StoreError::Corrupt`] when an
    /// existing snapshot cannot be read.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let users = load_snapshot(&path)?;
        Ok(Self { path, users })
    }

    /// The snapshot file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.users.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    /// Register a new user.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Conflict`] when the username is taken.
    pub fn create(&mut self, new_user: NewUser) -> Result<&User, StoreError> {
        if self.find_by_username(&new_user.username).is_some() {
            return Err(StoreError::Conflict(format!(
                "username {} is taken",
                new_user.username
            )));
        }

        let cart = match new_user.role {
            Role::Client => Some(Cart::new()),
            Role::Management => None,
        };
        let user = User {
            id: self.next_id(),
            username: new_user.username,
            email: new_user.email,
            password_hash: new_user.password_hash,
            address: new_user.address,
            role: new_user.role,
            title: new_user.title,
            cart,
            created_at: Utc::now(),
        };
        info!(id = %user.id, username = %user.username, role = %user.role, "user created");
        self.users.push(user);
        Ok(self.users.last().unwrap_or_else(|| unreachable!()))
    }

    /// Look up a user by id.
    #[must_use]
    pub fn get(&self, id: UserId) -> Option<&User> {
        self.users.iter().find(|user| user.id == id)
    }

    /// Look up a user by exact username.
    #[must_use]
    pub fn find_by_username(&self, username: &str) -> Option<&User> {
        self.users.iter().find(|user| user.username == username)
    }

    /// Apply a profile update to an existing user.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] for an unknown id and
    /// [`StoreError::Conflict`] when a username change collides with
    /// another account.
    pub fn edit(&mut self, id: UserId, update: UserUpdate) -> Result<&User, StoreError> {
        if let Some(username) = &update.username
            && self
                .find_by_username(username)
                .is_some_and(|other| other.id != id)
        {
            return Err(StoreError::Conflict(format!("username {username} is taken")));
        }

        let user = self
            .users
            .iter_mut()
            .find(|user| user.id == id)
            .ok_or_else(|| StoreError::NotFound(format!("user {id}")))?;

        if let Some(username) = update.username {
            user.username = username;
        }
        if let Some(email) = update.email {
            user.email = email;
        }
        if let Some(password_hash) = update.password_hash {
            user.password_hash = password_hash;
        }
        if let Some(address) = update.address {
            user.address = address;
        }
        info!(%id, username = %user.username, "user profile updated");
        Ok(user)
    }

    /// Delete a user. Returns whether a removal occurred.
    pub fn delete(&mut self, id: UserId) -> bool {
        let before = self.users.len();
        self.users.retain(|user| user.id != id);
        self.users.len() != before
    }

    /// A client's cart, if the user exists and is a client.
    #[must_use]
    pub fn cart(&self, id: UserId) -> Option<&Cart> {
        self.get(id).and_then(|user| user.cart.as_ref())
    }

    /// Mutable access to a client's cart.
    pub fn cart_mut(&mut self, id: UserId) -> Option<&mut Cart> {
        self.users
            .iter_mut()
            .find(|user| user.id == id)
            .and_then(|user| user.cart.as_mut())
    }

    /// Persist the whole directory to its snapshot file.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] when the write fails.
    pub fn flush(&self) -> Result<(), StoreError> {
        save_snapshot(&self.path, &self.users)
    }

    fn next_id(&self) -> UserId {
        let max = self.users.iter().map(|user| user.id.as_i32()).max();
        UserId::new(max.unwrap_or(0) + 1)
    }
}
