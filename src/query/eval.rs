// In-memory predicate evaluation with SQL three-valued logic.
use super::Expr;
use crate::entity::{Entity, Value};

/// `Some(true)`/`Some(false)` for a definite outcome, `None` for unknown.
pub(crate) fn eval<E: Entity>(expr: &Expr, row: &E) -> Option<bool> {
    match expr {
        Expr::True => Some(true),
        Expr::Compare { column, op, value } => {
            let lhs = row.value_of(column)?;
            lhs.compare(value).map(|ordering| op.holds(ordering))
        }
        Expr::In { column, values } => {
            let lhs = row.value_of(column)?;
            if lhs.is_null() {
                return None;
            }
            let mut unknown = false;
            for candidate in values {
                match lhs.compare(candidate) {
                    Some(ordering) if ordering.is_eq() => return Some(true),
                    Some(_) => {}
                    None => unknown = true,
                }
            }
            if unknown {
                None
            } else {
                Some(false)
            }
        }
        Expr::IsNull { column } => row.value_of(column).map(|v| v.is_null()),
        Expr::And(children) => {
            let mut outcome = Some(true);
            for child in children {
                match eval(child, row) {
                    Some(false) => return Some(false),
                    Some(true) => {}
                    None => outcome = None,
                }
            }
            outcome
        }
        Expr::Or(children) => {
            let mut outcome = Some(false);
            for child in children {
                match eval(child, row) {
                    Some(true) => return Some(true),
                    Some(false) => {}
                    None => outcome = None,
                }
            }
            outcome
        }
        Expr::Not(inner) => eval(inner, row).map(|b| !b),
    }
}

/// Read a grouping key; columns the row does not carry group under NULL.
pub(crate) fn group_key<E: Entity>(row: &E, column: &str) -> Value {
    row.value_of(column).unwrap_or(Value::Null)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        entity::{Column, FieldSelector, ValueKind},
        query::Predicate,
    };

    struct Sample {
        score: Option<i64>,
    }

    impl Entity for Sample {
        const TABLE: &'static str = "sample";
        const COLUMNS: &'static [Column] = &[Column::new("score", ValueKind::Integer).nullable()];

        fn value_of(&self, column: &str) -> Option<Value> {
            match column {
                "score" => Some(self.score.map(Value::Integer).unwrap_or(Value::Null)),
                _ => None,
            }
        }
    }

    const SCORE: FieldSelector<Sample, Option<i64>> = FieldSelector::new("score", |p| p.score);

    fn sample(score: Option<i64>) -> Sample {
        Sample { score }
    }

    #[test]
    fn comparison_against_null_is_unknown() {
        let p = SCORE.gt(Some(10));
        assert_eq!(eval(p.expr(), &sample(None)), None);
        assert!(!p.matches(&sample(None)));
        assert!(p.matches(&sample(Some(11))));
    }

    #[test]
    fn negating_unknown_stays_unknown() {
        let p = !SCORE.gt(Some(10));
        assert_eq!(eval(p.expr(), &sample(None)), None);
        assert!(!p.matches(&sample(None)));
        assert!(p.matches(&sample(Some(3))));
    }

    #[test]
    fn or_with_true_branch_overrides_unknown() {
        let p = SCORE.gt(Some(10)) | Predicate::all();
        assert!(p.matches(&sample(None)));
    }

    #[test]
    fn and_with_false_branch_overrides_unknown() {
        let p = SCORE.gt(Some(10)) & SCORE.is_null().negate();
        assert_eq!(eval(p.expr(), &sample(None)), Some(false));
    }

    #[test]
    fn in_list_semantics() {
        let p = SCORE.is_in([Some(1), Some(2)]);
        assert!(p.matches(&sample(Some(2))));
        assert!(!p.matches(&sample(Some(3))));
        assert_eq!(eval(p.expr(), &sample(None)), None);

        let with_null = SCORE.is_in([Some(1), None]);
        assert_eq!(eval(with_null.expr(), &sample(Some(3))), None);
        assert_eq!(eval(with_null.expr(), &sample(Some(1))), Some(true));

        let empty = SCORE.is_in(Vec::new());
        assert_eq!(eval(empty.expr(), &sample(Some(1))), Some(false));
    }

    #[test]
    fn is_null_matches_missing_values() {
        assert!(SCORE.is_null().matches(&sample(None)));
        assert!(!SCORE.is_null().matches(&sample(Some(0))));
    }

    #[test]
    fn group_key_defaults_to_null() {
        assert_eq!(group_key(&sample(Some(4)), "score"), Value::Integer(4));
        assert_eq!(group_key(&sample(Some(4)), "missing"), Value::Null);
    }
}
