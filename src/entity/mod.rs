// Entity contracts: column metadata, typed values and field selectors.
pub mod employee;
pub mod fixture;
mod selector;
mod value;

pub use employee::{Department, Employee, EmployeeField, EmployeeFilter, EmployeeRepository};
pub use selector::FieldSelector;
pub use value::{FieldValue, Value, ValueKind, STORED_TIMESTAMP_FORMAT, TIMESTAMP_FORMAT};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Column {
    pub name: &'static str,
    pub kind: ValueKind,
    pub primary_key: bool,
    pub nullable: bool,
}

impl Column {
    /// A required (`NOT NULL`) column.
    pub const fn new(name: &'static str, kind: ValueKind) -> Self {
        Self {
            name,
            kind,
            primary_key: false,
            nullable: false,
        }
    }

    pub const fn primary_key(self) -> Self {
        Self {
            primary_key: true,
            ..self
        }
    }

    pub const fn nullable(self) -> Self {
        Self {
            nullable: true,
            ..self
        }
    }
}

/// A record persisted in a table with a fixed set of typed columns.
pub trait Entity: Send + Sync + 'static {
    const TABLE: &'static str;
    const COLUMNS: &'static [Column];

    /// Read one column of this record; `None` if the column is not part of
    /// the entity.
    fn value_of(&self, column: &str) -> Option<Value>;

    fn column(name: &str) -> Option<&'static Column> {
        Self::COLUMNS.iter().find(|c| c.name == name)
    }

    fn primary_key() -> Option<&'static Column> {
        Self::COLUMNS.iter().find(|c| c.primary_key)
    }
}
