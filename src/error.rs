//! # Scope Error Types
//!
//! Fragment construction never fails. Everything here is raised either while a
//! scope table is being built (configuration) or by a host when merged options
//! are executed or a record is persisted.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScopeError {
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Unknown scope: {name}")]
    UnknownScope { name: String },

    #[error("Invalid option {key}: {message}")]
    InvalidOption { key: String, message: String },

    #[error("Read-only record: {table} #{id} cannot be saved")]
    ReadOnlyRecord { table: String, id: i64 },

    #[error("Record not found: {table} #{id}")]
    RecordNotFound { table: String, id: i64 },

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl ScopeError {
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn invalid_option(key: &str, message: impl Into<String>) -> Self {
        Self::InvalidOption {
            key: key.to_string(),
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ScopeError>;
