//! Error handling utilities for repositories

use clan_core::error::DomainError;
use sqlx::Error as SqlxError;

/// Convert SQLx error to DomainError
pub fn map_db_error(e: SqlxError) -> DomainError {
    DomainError::DatabaseError(e.to_string())
}

/// Map a CHECK violation (unknown rank text) to a validation error
pub fn map_check_violation(e: SqlxError, value: &str) -> DomainError {
    if let Some(db_err) = e.as_database_error() {
        if db_err.is_check_violation() {
            return DomainError::InvalidRank(value.to_string());
        }
    }
    map_db_error(e)
}
