//! Authentication Module
//! Mission: Register users, issue JWT tokens and gate protected endpoints

pub mod api;
pub mod jwt;
pub mod middleware;
pub mod models;
pub mod user_store;

pub use api::AuthState;
pub use jwt::{TokenError, TokenService};
pub use middleware::{auth_middleware, AuthenticatedUser};
pub use models::User;
pub use user_store::{CredentialStore, SqliteUserStore};
