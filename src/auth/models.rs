//! Authentication Models
//! Mission: Define user accounts, token claims and the auth request/response bodies

use bcrypt::{hash, verify, DEFAULT_COST};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// bcrypt only reads the first 72 bytes of its input.
pub const MAX_PASSWORD_BYTES: usize = 72;

/// Registered user account
#[derive(Debug, Clone, Serialize)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String, // bcrypt hash - never serialize
}

/// Reasons a user cannot be registered
#[derive(Debug, thiserror::Error)]
pub enum UserError {
    #[error("name is required")]
    MissingName,
    #[error("email is required")]
    MissingEmail,
    #[error("password is required")]
    MissingPassword,
    #[error("password must be at most 72 bytes")]
    PasswordTooLong,
    #[error("failed to hash password: {0}")]
    Hash(#[from] bcrypt::BcryptError),
}

impl UserError {
    /// True for errors caused by the caller's input.
    pub fn is_validation(&self) -> bool {
        !matches!(self, UserError::Hash(_))
    }
}

impl User {
    /// Register a new user with the default bcrypt cost
    pub fn register(name: &str, email: &str, password: &str) -> Result<Self, UserError> {
        Self::register_with_cost(name, email, password, DEFAULT_COST)
    }

    /// Register a new user, hashing the password with the given bcrypt cost.
    ///
    /// The password is hashed before any field is checked, so a rejected
    /// registration costs the same as an accepted one.
    pub fn register_with_cost(
        name: &str,
        email: &str,
        password: &str,
        cost: u32,
    ) -> Result<Self, UserError> {
        let password_hash = hash(password, cost)?;

        if name.is_empty() {
            return Err(UserError::MissingName);
        }
        if email.is_empty() {
            return Err(UserError::MissingEmail);
        }
        if password.is_empty() {
            return Err(UserError::MissingPassword);
        }
        if password.len() > MAX_PASSWORD_BYTES {
            return Err(UserError::PasswordTooLong);
        }

        Ok(Self {
            id: Uuid::new_v4(),
            name: name.to_string(),
            email: email.to_string(),
            password_hash,
        })
    }

    /// Check a plaintext password against the stored hash
    pub fn verify_password(&self, password: &str) -> bool {
        if password.len() > MAX_PASSWORD_BYTES {
            return false;
        }
        verify(password, &self.password_hash).unwrap_or(false)
    }
}

/// JWT Claims payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // subject (user_id)
    pub iat: usize,
    pub exp: usize, // expiration timestamp
}

/// Registration request body
#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Token request body
#[derive(Debug, Deserialize)]
pub struct TokenRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Token response
#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
}
