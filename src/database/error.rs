use std::fmt;
use std::time::Duration;

use sqlx::error::ErrorKind;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintKind {
    Unique,
    ForeignKey,
    NotNull,
    Check,
}

impl fmt::Display for ConstraintKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ConstraintKind::Unique => "unique",
            ConstraintKind::ForeignKey => "foreign key",
            ConstraintKind::NotNull => "not-null",
            ConstraintKind::Check => "check",
        })
    }
}

/// Errors from record store operations. Classified variants carry no driver
/// text; only `Infrastructure` wraps the raw sqlx error.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: i64 },

    #[error("{entity} violates a {kind} constraint")]
    ConstraintViolation {
        entity: &'static str,
        kind: ConstraintKind,
        constraint: Option<String>,
    },

    #[error("Database operation timed out after {0:?}")]
    Timeout(Duration),

    #[error(transparent)]
    Infrastructure(sqlx::Error),
}

impl StoreError {
    /// Map a driver error for `entity`, separating constraint violations
    /// from everything else
    pub fn classify(entity: &'static str, err: sqlx::Error) -> Self {
        let kind = match &err {
            sqlx::Error::Database(db) => match db.kind() {
                ErrorKind::UniqueViolation => Some(ConstraintKind::Unique),
                ErrorKind::ForeignKeyViolation => Some(ConstraintKind::ForeignKey),
                ErrorKind::NotNullViolation => Some(ConstraintKind::NotNull),
                ErrorKind::CheckViolation => Some(ConstraintKind::Check),
                _ => None,
            },
            _ => None,
        };

        match (kind, err) {
            (Some(kind), sqlx::Error::Database(db)) => StoreError::ConstraintViolation {
                entity,
                kind,
                constraint: db.constraint().map(str::to_string),
            },
            (_, err) => StoreError::Infrastructure(err),
        }
    }
}
