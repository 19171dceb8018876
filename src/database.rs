//! Database access used by the uniqueness probe.

use async_trait::async_trait;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;

use crate::error::DatabaseError;

/// Result of a raw query
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryResult {
    returned_rows: usize,
}

impl QueryResult {
    pub fn new(returned_rows: usize) -> Self {
        Self { returned_rows }
    }

    pub fn returned_rows(&self) -> usize {
        self.returned_rows
    }
}

/// Raw SQL access
#[async_trait]
pub trait Database: Send + Sync {
    /// Escapes a value for embedding inside a single-quoted SQL literal
    fn escape_string(&self, value: &str) -> String {
        value.replace('\'', "''")
    }

    async fn query(&self, sql: &str) -> Result<QueryResult, DatabaseError>;
}

/// SQLite database backed by a connection pool
#[derive(Clone)]
pub struct SqliteDatabase {
    pool: SqlitePool,
}

impl SqliteDatabase {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Connects to a database file, creating it when missing
    pub async fn open(path: &str) -> Result<Self, DatabaseError> {
        let database_url = if path.starts_with("sqlite:") {
            path.to_string()
        } else {
            format!("sqlite:{}?mode=rwc", path)
        };
        // Every connection to an in-memory database must be the same one
        let max_connections = if database_url.contains(":memory:") { 1 } else { 5 };
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect(&database_url)
            .await?;
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl Database for SqliteDatabase {
    async fn query(&self, sql: &str) -> Result<QueryResult, DatabaseError> {
        let rows = sqlx::query(sql).fetch_all(&self.pool).await?;
        Ok(QueryResult::new(rows.len()))
    }
}
