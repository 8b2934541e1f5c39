use std::fmt;

use thiserror::Error;

use crate::entity::ValueKind;

/// Why a field selector was rejected for an entity.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SelectorMismatch {
    UnknownColumn,
    KindMismatch {
        declared: ValueKind,
        requested: ValueKind,
    },
}

impl fmt::Display for SelectorMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SelectorMismatch::UnknownColumn => write!(f, "unknown column"),
            SelectorMismatch::KindMismatch {
                declared,
                requested,
            } => write!(f, "column is {declared}, selector expects {requested}"),
        }
    }
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("cannot coerce {found} into {expected}")]
pub struct CoercionError {
    pub expected: &'static str,
    pub found: String,
}

impl CoercionError {
    pub fn new(expected: &'static str, found: impl fmt::Display) -> Self {
        Self {
            expected,
            found: found.to_string(),
        }
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("database schema version mismatch: found {found}, expected {expected}; please run with --reset option")]
    SchemaVersion { found: i64, expected: i64 },
    #[error("store lock poisoned")]
    Poisoned,
    #[error(transparent)]
    Coercion(#[from] CoercionError),
}

#[derive(Debug, Error)]
pub enum QueryError {
    #[error("invalid selector {table}.{column}: {reason}")]
    InvalidSelector {
        table: &'static str,
        column: String,
        reason: SelectorMismatch,
    },
    #[error("store unavailable: {0}")]
    StoreUnavailable(StoreError),
    #[error("type coercion failed: {0}")]
    TypeCoercion(#[from] CoercionError),
}

impl QueryError {
    pub fn unknown_column(table: &'static str, column: impl Into<String>) -> Self {
        QueryError::InvalidSelector {
            table,
            column: column.into(),
            reason: SelectorMismatch::UnknownColumn,
        }
    }
}

// Coercion failures keep their own variant; any other store failure is an outage.
impl From<StoreError> for QueryError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Coercion(err) => QueryError::TypeCoercion(err),
            other => QueryError::StoreUnavailable(other),
        }
    }
}
