//! User management commands.
//!
//! # Usage
//!
//! ```bash
//! # Create a client account
//! oakline-cli user create -u dana -e dana@example.com -p "long password" -a "12 Elm St"
//!
//! # Create a management account
//! oakline-cli user create -u morgan -e morgan@example.com -p "long password" \
//!     -a "HQ" -r management --title "Store Manager"
//! ```

use std::path::Path;

use thiserror::Error;
use tracing::info;

use oakline_core::Role;
use oakline_server::services::auth::{AuthError, AuthService, Registration};
use oakline_server::store::{StoreError, UserDirectory};

/// Errors that can occur during user commands.
#[derive(Debug, Error)]
pub enum UserCommandError {
    /// Invalid role string.
    #[error("Invalid role: {0}. Valid roles: client, management")]
    InvalidRole(String),

    /// Registration was rejected.
    #[error("registration failed: {0}")]
    Auth(#[from] AuthError),

    /// Store could not be opened.
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

/// Create a new user account in the directory under `data_dir`.
///
/// # Errors
///
/// Returns [`UserCommandError`] for an unknown role, a failed
/// registration (duplicate username, weak password, bad email) or a
/// store failure.
pub fn create(
    data_dir: &Path,
    username: &str,
    email: &str,
    password: &str,
    address: &str,
    role: &str,
    title: Option<&str>,
) -> Result<(), UserCommandError> {
    let role: Role = role
        .parse()
        .map_err(|_| UserCommandError::InvalidRole(role.to_owned()))?;

    let mut users = UserDirectory::open(data_dir.join("users.json"))?;
    let profile = AuthService::new(&mut users).register(Registration {
        username: username.to_owned(),
        email: email.to_owned(),
        password: password.to_owned(),
        address: address.to_owned(),
        role,
        title: title.map(str::to_owned),
    })?;

    info!(id = %profile.id, username = %profile.username, role = %profile.role, "user created");
    Ok(())
}
