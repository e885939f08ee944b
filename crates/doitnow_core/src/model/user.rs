//! User domain model and authentication guard.
//!
//! # Responsibility
//! - Define the user record shared by the session and the record store.
//! - Provide the username/password guard used at login.
//!
//! # Invariants
//! - `username` is stored normalized (trimmed, lowercase).
//! - Passwords are compared as plain strings.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Username of the administrator account.
pub const ADMIN_USERNAME: &str = "admin";
/// Password of the seed administrator account created on first start.
pub const DEFAULT_ADMIN_PASSWORD: &str = "password";

/// Registered account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Unique, normalized login name.
    pub username: String,
    pub password: String,
}

impl User {
    /// Creates a user, normalizing the username.
    pub fn new(username: &str, password: impl Into<String>) -> Self {
        Self {
            username: normalize_username(username),
            password: password.into(),
        }
    }

    /// Seed account written when no user store exists yet.
    pub fn default_admin() -> Self {
        Self::new(ADMIN_USERNAME, DEFAULT_ADMIN_PASSWORD)
    }

    /// Returns whether this is the administrator account.
    pub fn is_admin(&self) -> bool {
        self.username == ADMIN_USERNAME
    }
}

/// Normalizes raw username input (trim + lowercase).
pub fn normalize_username(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Returns whether `username` (normalized first) is registered.
pub fn user_exists(users: &[User], username: &str) -> bool {
    let normalized = normalize_username(username);
    users.iter().any(|user| user.username == normalized)
}

/// Login guard failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    UnknownUser(String),
    WrongPassword(String),
}

impl Display for AuthError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownUser(_) => write!(f, "User does not exist"),
            Self::WrongPassword(_) => write!(f, "Wrong password"),
        }
    }
}

impl Error for AuthError {}

/// Matches a username/password pair against the loaded user set.
///
/// The password must belong to the same account as the username.
pub fn authenticate<'a>(
    users: &'a [User],
    username: &str,
    password: &str,
) -> Result<&'a User, AuthError> {
    let normalized = normalize_username(username);
    let user = users
        .iter()
        .find(|user| user.username == normalized)
        .ok_or_else(|| AuthError::UnknownUser(normalized.clone()))?;
    if user.password != password.trim() {
        return Err(AuthError::WrongPassword(normalized));
    }
    Ok(user)
}

#[cfg(test)]
mod tests {
    use super::{authenticate, normalize_username, user_exists, AuthError, User};

    fn users() -> Vec<User> {
        vec![User::default_admin(), User::new("Bob", "pw1")]
    }

    #[test]
    fn new_normalizes_username() {
        let user = User::new("  BoB ", "secret");
        assert_eq!(user.username, "bob");
        assert_eq!(user.password, "secret");
        assert_eq!(normalize_username(" ALICE\t"), "alice");
    }

    #[test]
    fn user_exists_is_case_insensitive() {
        let users = users();
        assert!(user_exists(&users, "BOB"));
        assert!(!user_exists(&users, "carol"));
    }

    #[test]
    fn authenticate_requires_password_of_same_account() {
        let users = users();
        assert_eq!(authenticate(&users, "bob", "pw1").unwrap().username, "bob");
        // admin's password must not unlock bob
        assert_eq!(
            authenticate(&users, "bob", "password").unwrap_err(),
            AuthError::WrongPassword("bob".to_string())
        );
        assert_eq!(
            authenticate(&users, "nobody", "pw1").unwrap_err(),
            AuthError::UnknownUser("nobody".to_string())
        );
    }

    #[test]
    fn default_admin_is_admin() {
        assert!(User::default_admin().is_admin());
        assert!(!User::new("bob", "x").is_admin());
    }
}
