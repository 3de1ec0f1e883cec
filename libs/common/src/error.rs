//! Error types shared by the Resume Hub crates
//!
//! Storage failures are split by backend: [`DatabaseError`] for PostgreSQL
//! and [`CacheError`] for Redis.

use redis::RedisError;
use sqlx::Error as SqlxError;
use sqlx::migrate::MigrateError;
use thiserror::Error;

/// Custom error type for database operations
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Error occurred during database connection
    #[error("Database connection error: {0}")]
    Connection(#[source] SqlxError),

    /// Error occurred during database query execution
    #[error("Database query error: {0}")]
    Query(#[source] SqlxError),

    /// A unique constraint rejected the write; carries the constraint name
    #[error("Unique constraint violated: {0}")]
    UniqueViolation(String),

    /// Error occurred during database migration
    #[error("Database migration error: {0}")]
    Migration(String),

    /// Configuration error
    #[error("Database configuration error: {0}")]
    Configuration(String),
}

impl DatabaseError {
    /// True when the error is a unique violation on the given constraint
    pub fn violates(&self, constraint: &str) -> bool {
        matches!(self, DatabaseError::UniqueViolation(name) if name == constraint)
    }
}

impl From<SqlxError> for DatabaseError {
    fn from(err: SqlxError) -> Self {
        if let SqlxError::Database(db_err) = &err {
            if db_err.is_unique_violation() {
                let constraint = db_err.constraint().unwrap_or_default().to_string();
                return DatabaseError::UniqueViolation(constraint);
            }
        }
        DatabaseError::Query(err)
    }
}

impl From<MigrateError> for DatabaseError {
    fn from(err: MigrateError) -> Self {
        DatabaseError::Migration(err.to_string())
    }
}

/// Custom error type for cache operations
#[derive(Error, Debug)]
pub enum CacheError {
    /// The Redis URL could not be parsed
    #[error("Cache configuration error: {0}")]
    Configuration(String),

    /// Error returned by the Redis server or connection
    #[error("Cache command error: {0}")]
    Command(#[from] RedisError),
}

/// Type alias for Result with DatabaseError
pub type DatabaseResult<T> = Result<T, DatabaseError>;

/// Type alias for Result with CacheError
pub type CacheResult<T> = Result<T, CacheError>;
