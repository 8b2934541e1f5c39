use std::{cmp::Ordering, fmt, hash::Hash};

use chrono::NaiveDateTime;
use rusqlite::types::{ToSql, ToSqlOutput};
use serde::Serialize;

use crate::error::CoercionError;

/// Display and parse layout. The fraction is optional when parsing and
/// omitted when zero.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

/// Layout written to stores. The fixed-width fraction keeps sub-second
/// precision and makes text order match chronological order.
pub const STORED_TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.9f";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueKind {
    Integer,
    Text,
    Timestamp,
}

impl ValueKind {
    pub const fn name(self) -> &'static str {
        match self {
            ValueKind::Integer => "integer",
            ValueKind::Text => "text",
            ValueKind::Timestamp => "timestamp",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Store-neutral scalar used for column values, predicate operands and
/// grouping keys.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Value {
    Null,
    Integer(i64),
    Text(String),
    Timestamp(NaiveDateTime),
}

impl Value {
    pub fn kind(&self) -> Option<ValueKind> {
        match self {
            Value::Null => None,
            Value::Integer(_) => Some(ValueKind::Integer),
            Value::Text(_) => Some(ValueKind::Text),
            Value::Timestamp(_) => Some(ValueKind::Timestamp),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// SQL comparison: unknown (`None`) when either side is NULL or the
    /// operands are of different kinds.
    pub fn compare(&self, other: &Value) -> Option<Ordering> {
        match (self, other) {
            (Value::Integer(a), Value::Integer(b)) => Some(a.cmp(b)),
            (Value::Text(a), Value::Text(b)) => Some(a.cmp(b)),
            (Value::Timestamp(a), Value::Timestamp(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("NULL"),
            Value::Integer(n) => write!(f, "{n}"),
            Value::Text(s) => write!(f, "'{s}'"),
            Value::Timestamp(ts) => write!(f, "{}", ts.format(TIMESTAMP_FORMAT)),
        }
    }
}

impl ToSql for Value {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        use rusqlite::types::Value as Sql;
        Ok(match self {
            Value::Null => ToSqlOutput::Owned(Sql::Null),
            Value::Integer(n) => ToSqlOutput::Owned(Sql::Integer(*n)),
            Value::Text(s) => ToSqlOutput::Borrowed(s.as_str().into()),
            Value::Timestamp(ts) => {
                ToSqlOutput::Owned(Sql::Text(ts.format(STORED_TIMESTAMP_FORMAT).to_string()))
            }
        })
    }
}

impl TryFrom<rusqlite::types::Value> for Value {
    type Error = CoercionError;

    fn try_from(value: rusqlite::types::Value) -> Result<Self, Self::Error> {
        use rusqlite::types::Value as Sql;
        match value {
            Sql::Null => Ok(Value::Null),
            Sql::Integer(n) => Ok(Value::Integer(n)),
            Sql::Text(s) => Ok(Value::Text(s)),
            Sql::Real(r) => Err(CoercionError::new("integer or text", format!("real {r}"))),
            Sql::Blob(b) => Err(CoercionError::new(
                "integer or text",
                format!("blob of {} bytes", b.len()),
            )),
        }
    }
}

/// A Rust type usable as a field type and grouping key.
pub trait FieldValue: Clone + Eq + Hash + Send + 'static {
    const KIND: ValueKind;

    fn into_value(self) -> Value;

    fn from_value(value: Value) -> Result<Self, CoercionError>;
}

impl FieldValue for i64 {
    const KIND: ValueKind = ValueKind::Integer;

    fn into_value(self) -> Value {
        Value::Integer(self)
    }

    fn from_value(value: Value) -> Result<Self, CoercionError> {
        match value {
            Value::Integer(n) => Ok(n),
            other => Err(CoercionError::new("integer", other)),
        }
    }
}

impl FieldValue for String {
    const KIND: ValueKind = ValueKind::Text;

    fn into_value(self) -> Value {
        Value::Text(self)
    }

    fn from_value(value: Value) -> Result<Self, CoercionError> {
        match value {
            Value::Text(s) => Ok(s),
            other => Err(CoercionError::new("text", other)),
        }
    }
}

impl FieldValue for NaiveDateTime {
    const KIND: ValueKind = ValueKind::Timestamp;

    fn into_value(self) -> Value {
        Value::Timestamp(self)
    }

    fn from_value(value: Value) -> Result<Self, CoercionError> {
        match value {
            Value::Timestamp(ts) => Ok(ts),
            Value::Text(s) => NaiveDateTime::parse_from_str(&s, TIMESTAMP_FORMAT)
                .map_err(|_| CoercionError::new("timestamp", Value::Text(s))),
            other => Err(CoercionError::new("timestamp", other)),
        }
    }
}

/// Nullable keys: NULL becomes `None`.
impl<T: FieldValue> FieldValue for Option<T> {
    const KIND: ValueKind = T::KIND;

    fn into_value(self) -> Value {
        self.map(T::into_value).unwrap_or(Value::Null)
    }

    fn from_value(value: Value) -> Result<Self, CoercionError> {
        match value {
            Value::Null => Ok(None),
            other => T::from_value(other).map(Some),
        }
    }
}
