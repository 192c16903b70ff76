//! Product Storage
//!
//! Store interface for products plus the SQLite backend.
//!
//! ```sql
//! CREATE TABLE products (
//!     id TEXT PRIMARY KEY,
//!     name TEXT NOT NULL,
//!     price REAL NOT NULL,
//!     created_at TEXT NOT NULL  -- RFC 3339, UTC, nanosecond precision
//! );
//! ```
//!
//! Every row read back is re-validated; rows that fail come back as
//! `StoreError::Corrupt` instead of being served.

use crate::error::StoreError;
use crate::products::entity::Product;
use chrono::{DateTime, SecondsFormat, Utc};
use parking_lot::Mutex;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;
use tracing::{debug, info};
use uuid::Uuid;

/// Largest page a single list call returns.
pub const MAX_PAGE_SIZE: u32 = 100;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    /// Anything other than `desc` sorts ascending.
    pub fn parse(s: &str) -> Self {
        if s.eq_ignore_ascii_case("desc") {
            SortOrder::Desc
        } else {
            SortOrder::Asc
        }
    }

    fn as_sql(&self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

/// Listing window. `page` is 1-indexed; pagination applies only when both
/// `page` and `limit` are non-zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListQuery {
    pub page: u32,
    pub limit: u32,
    pub sort: SortOrder,
}

impl ListQuery {
    fn window(&self) -> (i64, i64) {
        if self.page == 0 || self.limit == 0 {
            return (-1, 0);
        }
        let limit = self.limit.min(MAX_PAGE_SIZE) as i64;
        (limit, (self.page as i64 - 1) * limit)
    }
}

/// Persistence contract for products.
pub trait ProductStore: Send + Sync {
    fn create(&self, product: &Product) -> Result<(), StoreError>;
    fn find_by_id(&self, id: &Uuid) -> Result<Product, StoreError>;
    fn list(&self, query: &ListQuery) -> Result<Vec<Product>, StoreError>;
    fn update(&self, product: &Product) -> Result<(), StoreError>;
    fn delete(&self, id: &Uuid) -> Result<(), StoreError>;
}

/// Product storage with SQLite backend
pub struct SqliteProductStore {
    conn: Mutex<Connection>,
}

struct ProductRow {
    id: String,
    name: String,
    price: f64,
    created_at: String,
}

impl ProductRow {
    fn read(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            name: row.get(1)?,
            price: row.get(2)?,
            created_at: row.get(3)?,
        })
    }

    fn into_product(self) -> Result<Product, StoreError> {
        let created_at = DateTime::parse_from_rfc3339(&self.created_at)
            .map_err(|e| StoreError::Corrupt(format!("product {}: created_at: {}", self.id, e)))?
            .with_timezone(&Utc);

        Product::from_parts(&self.id, self.name, self.price, created_at)
            .map_err(|e| StoreError::Corrupt(format!("product {:?}: {}", self.id, e)))
    }
}

fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

impl SqliteProductStore {
    /// Open (or create) the product database at the given path
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous = NORMAL;",
        )?;
        Self::with_connection(conn)
    }

    /// Create an in-memory store (for testing).
    pub fn in_memory() -> Result<Self, StoreError> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self, StoreError> {
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS products (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                price REAL NOT NULL,
                created_at TEXT NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_products_created_at
                ON products(created_at, id);",
        )?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }
}

impl ProductStore for SqliteProductStore {
    fn create(&self, product: &Product) -> Result<(), StoreError> {
        let conn = self.conn.lock();
        conn.execute(
            "INSERT INTO products (id, name, price, created_at) VALUES (?1, ?2, ?3, ?4)",
            params![
                product.id.to_string(),
                product.name,
                product.price,
                format_timestamp(&product.created_at),
            ],
        )?;

        info!("Stored product {}", product.id);
        Ok(())
    }

    fn find_by_id(&self, id: &Uuid) -> Result<Product, StoreError> {
        let row = {
            let conn = self.conn.lock();
            conn.query_row(
                "SELECT id, name, price, created_at FROM products WHERE id = ?1",
                params![id.to_string()],
                ProductRow::read,
            )
            .optional()?
        };

        row.ok_or(StoreError::NotFound)?.into_product()
    }

    fn list(&self, query: &ListQuery) -> Result<Vec<Product>, StoreError> {
        let (limit, offset) = query.window();
        let order = query.sort.as_sql();
        let sql = format!(
            "SELECT id, name, price, created_at FROM products
             ORDER BY created_at {order}, id {order}
             LIMIT ?1 OFFSET ?2"
        );

        let rows = {
            let conn = self.conn.lock();
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt
                .query_map(params![limit, offset], ProductRow::read)?
                .collect::<Result<Vec<_>, _>>()?;
            rows
        };

        debug!("Listed {} products ({:?})", rows.len(), query);

        rows.into_iter().map(ProductRow::into_product).collect()
    }

    fn update(&self, product: &Product) -> Result<(), StoreError> {
        let conn = self.conn.lock();
        let rows_affected = conn.execute(
            "UPDATE products SET name = ?2, price = ?3 WHERE id = ?1",
            params![product.id.to_string(), product.name, product.price],
        )?;

        if rows_affected == 0 {
            return Err(StoreError::NotFound);
        }

        info!("Updated product {}", product.id);
        Ok(())
    }

    fn delete(&self, id: &Uuid) -> Result<(), StoreError> {
        let conn = self.conn.lock();
        let rows_affected =
            conn.execute("DELETE FROM products WHERE id = ?1", params![id.to_string()])?;

        if rows_affected == 0 {
            return Err(StoreError::NotFound);
        }

        info!("🗑️  Deleted product {}", id);
        Ok(())
    }
}
