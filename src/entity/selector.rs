use std::fmt;

use super::{Column, Entity, FieldValue};
use crate::{
    error::{QueryError, SelectorMismatch},
    query::{CompareOp, Expr, Predicate},
};

/// Typed reference to one field of `E` whose values are of type `V`.
///
/// Carries the column name used by stores and an accessor used to read the
/// same field from an in-memory record.
pub struct FieldSelector<E, V> {
    column: &'static str,
    get: fn(&E) -> V,
}

impl<E, V> Clone for FieldSelector<E, V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<E, V> Copy for FieldSelector<E, V> {}

impl<E, V> fmt::Debug for FieldSelector<E, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldSelector")
            .field("column", &self.column)
            .finish()
    }
}

impl<E, V> FieldSelector<E, V> {
    pub const fn new(column: &'static str, get: fn(&E) -> V) -> Self {
        Self { column, get }
    }

    pub const fn column(&self) -> &'static str {
        self.column
    }

    pub fn extract(&self, entity: &E) -> V {
        (self.get)(entity)
    }
}

impl<E: Entity, V: FieldValue> FieldSelector<E, V> {
    /// Check that the column belongs to `E` and is declared with `V`'s kind.
    pub fn resolve(&self) -> Result<&'static Column, QueryError> {
        let column =
            E::column(self.column).ok_or_else(|| QueryError::unknown_column(E::TABLE, self.column))?;
        if column.kind != V::KIND {
            return Err(QueryError::InvalidSelector {
                table: E::TABLE,
                column: self.column.to_string(),
                reason: SelectorMismatch::KindMismatch {
                    declared: column.kind,
                    requested: V::KIND,
                },
            });
        }
        Ok(column)
    }

    fn compare(&self, op: CompareOp, value: V) -> Predicate<E> {
        Predicate::new(Expr::Compare {
            column: self.column,
            op,
            value: value.into_value(),
        })
    }

    pub fn eq(&self, value: V) -> Predicate<E> {
        self.compare(CompareOp::Eq, value)
    }

    pub fn ne(&self, value: V) -> Predicate<E> {
        self.compare(CompareOp::Ne, value)
    }

    pub fn lt(&self, value: V) -> Predicate<E> {
        self.compare(CompareOp::Lt, value)
    }

    pub fn lte(&self, value: V) -> Predicate<E> {
        self.compare(CompareOp::Lte, value)
    }

    pub fn gt(&self, value: V) -> Predicate<E> {
        self.compare(CompareOp::Gt, value)
    }

    pub fn gte(&self, value: V) -> Predicate<E> {
        self.compare(CompareOp::Gte, value)
    }

    pub fn is_in(&self, values: impl IntoIterator<Item = V>) -> Predicate<E> {
        Predicate::new(Expr::In {
            column: self.column,
            values: values.into_iter().map(FieldValue::into_value).collect(),
        })
    }

    pub fn is_null(&self) -> Predicate<E> {
        Predicate::new(Expr::IsNull {
            column: self.column,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{Department, Employee, Value};

    #[test]
    fn resolve_accepts_declared_columns() {
        let column = Employee::DEPARTMENT.resolve().unwrap();
        assert_eq!(column.name, "department");
    }

    #[test]
    fn resolve_rejects_foreign_column() {
        let salary: FieldSelector<Employee, i64> = FieldSelector::new("salary", |e| e.id);
        let err = salary.resolve().unwrap_err();
        assert!(matches!(
            err,
            QueryError::InvalidSelector {
                table: "employee",
                reason: SelectorMismatch::UnknownColumn,
                ..
            }
        ));
    }

    #[test]
    fn resolve_rejects_kind_mismatch() {
        let wrong: FieldSelector<Employee, i64> = FieldSelector::new("department", |e| e.id);
        let err = wrong.resolve().unwrap_err();
        match err {
            QueryError::InvalidSelector { reason, .. } => assert_eq!(
                reason,
                SelectorMismatch::KindMismatch {
                    declared: crate::entity::ValueKind::Text,
                    requested: crate::entity::ValueKind::Integer,
                }
            ),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn builders_produce_typed_leaves() {
        let predicate = Employee::DEPARTMENT.eq(Department::It);
        assert_eq!(
            predicate.expr(),
            &Expr::Compare {
                column: "department",
                op: CompareOp::Eq,
                value: Value::Text("IT".into()),
            }
        );
    }
}
