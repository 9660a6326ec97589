//! Database error types

use thiserror::Error;

/// Errors raised by the claims database layer
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Failed to connect to database: {0}")]
    ConnectionFailed(String),

    #[error("Invalid database configuration: {0}")]
    InvalidConfig(String),

    #[error("Connection pool exhausted")]
    PoolExhausted,

    #[error("Query failed: {0}")]
    QueryFailed(String),

    #[error("Entity not found: {0}")]
    NotFound(String),

    /// Unique index violation, in practice a reused claim number
    #[error("Duplicate entry: {0}")]
    DuplicateEntry(String),

    /// NOT NULL or CHECK constraint rejected the row
    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),

    /// A column could not be decoded into the row type
    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Migration failed: {0}")]
    MigrationFailed(#[from] sqlx::migrate::MigrateError),
}

impl DatabaseError {
    /// Creates a not found error for a specific entity type and identifier
    ///
    /// ```rust
    /// use infra_db::DatabaseError;
    ///
    /// let error = DatabaseError::not_found("Claim", "CLAIM20250626143000");
    /// assert!(error.to_string().contains("CLAIM20250626143000"));
    /// ```
    pub fn not_found(entity: &str, id: impl std::fmt::Display) -> Self {
        DatabaseError::NotFound(format!("{} with id '{}' not found", entity, id))
    }

    pub fn duplicate(entity: &str, field: &str, value: impl std::fmt::Display) -> Self {
        DatabaseError::DuplicateEntry(format!("{} with {} '{}' already exists", entity, field, value))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, DatabaseError::NotFound(_))
    }

    pub fn is_connection_error(&self) -> bool {
        matches!(self, DatabaseError::ConnectionFailed(_) | DatabaseError::PoolExhausted)
    }
}

/// Maps SQLx errors onto the variants above using PostgreSQL SQLSTATE codes
///
/// See <https://www.postgresql.org/docs/current/errcodes-appendix.html>
impl From<&sqlx::Error> for DatabaseError {
    fn from(error: &sqlx::Error) -> Self {
        match error {
            sqlx::Error::RowNotFound => DatabaseError::NotFound("Record not found".to_string()),
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed => DatabaseError::PoolExhausted,
            sqlx::Error::Io(io) => DatabaseError::ConnectionFailed(io.to_string()),
            sqlx::Error::ColumnDecode { index, source } => {
                DatabaseError::SerializationError(format!("column {}: {}", index, source))
            }
            sqlx::Error::Database(db_err) => {
                let message = db_err.message().to_string();
                match db_err.code().as_deref() {
                    Some("23505") => DatabaseError::DuplicateEntry(message),
                    Some("23502") | Some("23514") => DatabaseError::ConstraintViolation(message),
                    _ => DatabaseError::QueryFailed(message),
                }
            }
            other => DatabaseError::QueryFailed(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_message() {
        let error = DatabaseError::not_found("Claim", "CLAIM20250626143000");
        assert!(error.is_not_found());
        assert!(error.to_string().contains("CLAIM20250626143000"));
    }

    #[test]
    fn test_row_not_found_maps_to_not_found() {
        assert!(DatabaseError::from(&sqlx::Error::RowNotFound).is_not_found());
    }

    #[test]
    fn test_pool_errors_are_connection_errors() {
        assert!(DatabaseError::from(&sqlx::Error::PoolTimedOut).is_connection_error());
        assert!(DatabaseError::from(&sqlx::Error::PoolClosed).is_connection_error());
        assert!(!DatabaseError::duplicate("Claim", "claim_number", "CLAIM1").is_connection_error());
    }
}
