use std::{
    cmp::Ordering,
    fmt,
    marker::PhantomData,
    ops::{BitAnd, BitOr, Not},
};

use crate::{
    entity::{Entity, Value},
    error::{QueryError, SelectorMismatch},
};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum CompareOp {
    Eq,
    Ne,
    Lt,
    Lte,
    Gt,
    Gte,
}

impl CompareOp {
    pub const fn symbol(self) -> &'static str {
        match self {
            CompareOp::Eq => "=",
            CompareOp::Ne => "<>",
            CompareOp::Lt => "<",
            CompareOp::Lte => "<=",
            CompareOp::Gt => ">",
            CompareOp::Gte => ">=",
        }
    }

    pub fn holds(self, ordering: Ordering) -> bool {
        match self {
            CompareOp::Eq => ordering == Ordering::Equal,
            CompareOp::Ne => ordering != Ordering::Equal,
            CompareOp::Lt => ordering == Ordering::Less,
            CompareOp::Lte => ordering != Ordering::Greater,
            CompareOp::Gt => ordering == Ordering::Greater,
            CompareOp::Gte => ordering != Ordering::Less,
        }
    }
}

///
/// Expr
///
/// Untyped filter tree. Leaves name a column; inner nodes combine leaves.
/// Each store backend translates it into its own filter representation.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Expr {
    True,
    Compare {
        column: &'static str,
        op: CompareOp,
        value: Value,
    },
    In {
        column: &'static str,
        values: Vec<Value>,
    },
    IsNull {
        column: &'static str,
    },
    And(Vec<Expr>),
    Or(Vec<Expr>),
    Not(Box<Expr>),
}

impl Expr {
    fn visit_columns<'a>(&'a self, out: &mut Vec<(&'static str, Option<&'a Value>)>) {
        match self {
            Expr::True => {}
            Expr::Compare { column, value, .. } => out.push((*column, Some(value))),
            Expr::In { column, values } => {
                out.push((*column, None));
                out.extend(values.iter().map(|v| (*column, Some(v))));
            }
            Expr::IsNull { column } => out.push((*column, None)),
            Expr::And(children) | Expr::Or(children) => {
                for child in children {
                    child.visit_columns(out);
                }
            }
            Expr::Not(inner) => inner.visit_columns(out),
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn join(f: &mut fmt::Formatter<'_>, children: &[Expr], sep: &str) -> fmt::Result {
            f.write_str("(")?;
            for (i, child) in children.iter().enumerate() {
                if i > 0 {
                    f.write_str(sep)?;
                }
                write!(f, "{child}")?;
            }
            f.write_str(")")
        }

        match self {
            Expr::True => f.write_str("TRUE"),
            Expr::Compare { column, op, value } => {
                write!(f, "{column} {} {value}", op.symbol())
            }
            Expr::In { column, values } => {
                write!(f, "{column} IN ")?;
                f.write_str("[")?;
                for (i, value) in values.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{value}")?;
                }
                f.write_str("]")
            }
            Expr::IsNull { column } => write!(f, "{column} IS NULL"),
            Expr::And(children) if children.is_empty() => f.write_str("TRUE"),
            Expr::Or(children) if children.is_empty() => f.write_str("FALSE"),
            Expr::And(children) => join(f, children, " AND "),
            Expr::Or(children) => join(f, children, " OR "),
            Expr::Not(inner) => write!(f, "NOT {inner}"),
        }
    }
}

/// A filter over entities of type `E`.
pub struct Predicate<E> {
    expr: Expr,
    _entity: PhantomData<fn() -> E>,
}

impl<E> Predicate<E> {
    pub fn new(expr: Expr) -> Self {
        Self {
            expr,
            _entity: PhantomData,
        }
    }

    /// Matches every row.
    pub fn all() -> Self {
        Self::new(Expr::True)
    }

    pub fn expr(&self) -> &Expr {
        &self.expr
    }

    pub fn into_expr(self) -> Expr {
        self.expr
    }

    pub fn and(self, other: Self) -> Self {
        let expr = match (self.expr, other.expr) {
            (Expr::True, rhs) => rhs,
            (lhs, Expr::True) => lhs,
            (Expr::And(mut lhs), Expr::And(rhs)) => {
                lhs.extend(rhs);
                Expr::And(lhs)
            }
            (Expr::And(mut lhs), rhs) => {
                lhs.push(rhs);
                Expr::And(lhs)
            }
            (lhs, rhs) => Expr::And(vec![lhs, rhs]),
        };
        Self::new(expr)
    }

    pub fn or(self, other: Self) -> Self {
        let expr = match (self.expr, other.expr) {
            (Expr::Or(mut lhs), Expr::Or(rhs)) => {
                lhs.extend(rhs);
                Expr::Or(lhs)
            }
            (Expr::Or(mut lhs), rhs) => {
                lhs.push(rhs);
                Expr::Or(lhs)
            }
            (lhs, rhs) => Expr::Or(vec![lhs, rhs]),
        };
        Self::new(expr)
    }

    pub fn negate(self) -> Self {
        match self.expr {
            Expr::Not(inner) => Self::new(*inner),
            expr => Self::new(Expr::Not(Box::new(expr))),
        }
    }
}

impl<E: Entity> Predicate<E> {
    /// Every column named by the predicate must belong to `E`, and every
    /// operand must match the column's declared kind.
    pub fn validate(&self) -> Result<(), QueryError> {
        let mut refs = Vec::new();
        self.expr.visit_columns(&mut refs);
        for (name, operand) in refs {
            let column = E::column(name).ok_or_else(|| QueryError::unknown_column(E::TABLE, name))?;
            if let Some(requested) = operand.and_then(Value::kind) {
                if requested != column.kind {
                    return Err(QueryError::InvalidSelector {
                        table: E::TABLE,
                        column: name.to_string(),
                        reason: SelectorMismatch::KindMismatch {
                            declared: column.kind,
                            requested,
                        },
                    });
                }
            }
        }
        Ok(())
    }

    /// In-memory evaluation; rows whose outcome is unknown do not match.
    pub fn matches(&self, row: &E) -> bool {
        super::eval::eval(&self.expr, row) == Some(true)
    }
}

impl<E> Clone for Predicate<E> {
    fn clone(&self) -> Self {
        Self::new(self.expr.clone())
    }
}

impl<E> fmt::Debug for Predicate<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Predicate").field(&self.expr).finish()
    }
}

impl<E> fmt::Display for Predicate<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.expr, f)
    }
}

impl<E> PartialEq for Predicate<E> {
    fn eq(&self, other: &Self) -> bool {
        self.expr == other.expr
    }
}

impl<E> Default for Predicate<E> {
    fn default() -> Self {
        Self::all()
    }
}

impl<E> BitAnd for Predicate<E> {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self::Output {
        self.and(rhs)
    }
}

impl<E> BitOr for Predicate<E> {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        self.or(rhs)
    }
}

impl<E> Not for Predicate<E> {
    type Output = Self;

    fn not(self) -> Self::Output {
        self.negate()
    }
}
