//! Service configuration
//!
//! Every option can be given as a flag or through the environment (a `.env`
//! file is loaded first by `load_env`).
//!
//! Environment:
//!   BIND_ADDR - Listen address (default: 0.0.0.0:8000)
//!   DATABASE_PATH - SQLite database file (default: product_api.db)
//!   JWT_SECRET - Token signing key
//!   JWT_EXPIRES_IN - Token lifetime in seconds (default: 300, at most ten years)
//!   BCRYPT_COST - Password hashing cost (default: 12)

use crate::auth::jwt::MAX_TTL_SECONDS;
use clap::Parser;
use std::net::SocketAddr;
use std::path::Path;

pub const DEV_JWT_SECRET: &str = "dev-secret-change-in-production-minimum-32-characters";

#[derive(Parser, Debug, Clone)]
#[command(name = "product-api")]
#[command(about = "Product catalogue API with bearer-token authentication")]
pub struct Config {
    /// Address to listen on
    #[arg(long, env = "BIND_ADDR", default_value = "0.0.0.0:8000")]
    pub bind: SocketAddr,

    /// SQLite database file
    #[arg(long, env = "DATABASE_PATH", default_value = "product_api.db")]
    pub database_path: String,

    /// Token signing key
    #[arg(long, env = "JWT_SECRET", default_value = DEV_JWT_SECRET, hide_env_values = true)]
    pub jwt_secret: String,

    /// Token lifetime in seconds
    #[arg(
        long,
        env = "JWT_EXPIRES_IN",
        default_value_t = 300,
        value_parser = clap::value_parser!(u64).range(1..=MAX_TTL_SECONDS)
    )]
    pub jwt_expires_in: u64,

    /// bcrypt cost factor
    #[arg(
        long,
        env = "BCRYPT_COST",
        default_value_t = bcrypt::DEFAULT_COST,
        value_parser = clap::value_parser!(u32).range(4..=31)
    )]
    pub bcrypt_cost: u32,
}

impl Config {
    /// Load `.env` and parse flags/environment.
    pub fn load() -> Self {
        load_env();
        Self::parse()
    }

    pub fn uses_dev_secret(&self) -> bool {
        self.jwt_secret == DEV_JWT_SECRET
    }
}

fn load_env() {
    // 1) Standard dotenv search (cwd + parents)
    let _ = dotenv::dotenv();

    // 2) Also try the crate root .env when running from elsewhere
    let candidate = Path::new(env!("CARGO_MANIFEST_DIR")).join(".env");
    if candidate.exists() {
        let _ = dotenv::from_path(&candidate);
    }
}
