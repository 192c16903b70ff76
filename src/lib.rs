//! Product API Library
//!
//! A product catalogue served over HTTP. Registration and token issuance are
//! public; every product route requires a bearer token issued by this service.

pub mod app;
pub mod auth;
pub mod config;
pub mod error;
pub mod middleware;
pub mod products;

pub use app::{build_router, AppState};
pub use config::Config;
