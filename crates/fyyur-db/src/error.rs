//! Directory error kinds.

use sea_orm::{DbErr, SqlErr};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DirectoryError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("validation failed: {0}")]
    Validation(String),

    #[error("constraint violation: {0}")]
    ConstraintViolation(String),

    #[error("database unreachable: {0}")]
    Connectivity(String),

    #[error("database error: {0}")]
    Database(DbErr),
}

impl DirectoryError {
    /// Short machine-readable tag for the error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "not_found",
            Self::Validation(_) => "validation",
            Self::ConstraintViolation(_) => "constraint_violation",
            Self::Connectivity(_) => "connectivity",
            Self::Database(_) => "database",
        }
    }
}

impl From<DbErr> for DirectoryError {
    fn from(err: DbErr) -> Self {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(msg))
            | Some(SqlErr::ForeignKeyConstraintViolation(msg)) => {
                return Self::ConstraintViolation(msg)
            }
            _ => {}
        }

        match err {
            DbErr::RecordNotFound(msg) => Self::NotFound(msg),
            DbErr::Conn(e) => Self::Connectivity(e.to_string()),
            DbErr::ConnectionAcquire(e) => Self::Connectivity(e.to_string()),
            other => Self::Database(other),
        }
    }
}
