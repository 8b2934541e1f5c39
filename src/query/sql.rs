// Predicate translation for SQL backends.
use super::{Expr, Predicate};
use crate::entity::{Column, Value, ValueKind};

/// A `WHERE` clause with positional `?` parameters, in order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SqlFilter {
    pub clause: String,
    pub params: Vec<Value>,
}

pub fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

pub fn render<E>(predicate: &Predicate<E>) -> SqlFilter {
    let mut clause = String::new();
    let mut params = Vec::new();
    render_expr(predicate.expr(), &mut clause, &mut params);
    SqlFilter { clause, params }
}

fn render_expr(expr: &Expr, out: &mut String, params: &mut Vec<Value>) {
    match expr {
        Expr::True => out.push('1'),
        Expr::Compare { column, op, value } => {
            out.push_str(&quote_ident(column));
            out.push(' ');
            out.push_str(op.symbol());
            out.push_str(" ?");
            params.push(value.clone());
        }
        Expr::In { values, .. } if values.is_empty() => out.push('0'),
        Expr::In { column, values } => {
            out.push_str(&quote_ident(column));
            out.push_str(" IN (");
            for (i, value) in values.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                out.push('?');
                params.push(value.clone());
            }
            out.push(')');
        }
        Expr::IsNull { column } => {
            out.push_str(&quote_ident(column));
            out.push_str(" IS NULL");
        }
        Expr::And(children) => render_joined(children, " AND ", '1', out, params),
        Expr::Or(children) => render_joined(children, " OR ", '0', out, params),
        Expr::Not(inner) => {
            out.push_str("NOT (");
            render_expr(inner, out, params);
            out.push(')');
        }
    }
}

fn render_joined(
    children: &[Expr],
    sep: &str,
    empty: char,
    out: &mut String,
    params: &mut Vec<Value>,
) {
    if children.is_empty() {
        out.push(empty);
        return;
    }
    out.push('(');
    for (i, child) in children.iter().enumerate() {
        if i > 0 {
            out.push_str(sep);
        }
        render_expr(child, out, params);
    }
    out.push(')');
}

/// `SELECT key, COUNT(*) ... GROUP BY key` with the filter pushed down
/// before grouping.
pub fn grouped_count_query(table: &str, column: &str, filter: &SqlFilter) -> String {
    let column = quote_ident(column);
    format!(
        "SELECT {column}, COUNT(*) FROM {} WHERE {} GROUP BY {column}",
        quote_ident(table),
        filter.clause
    )
}

pub fn count_query(table: &str, filter: &SqlFilter) -> String {
    format!(
        "SELECT COUNT(*) FROM {} WHERE {}",
        quote_ident(table),
        filter.clause
    )
}

fn column_type(kind: ValueKind) -> &'static str {
    match kind {
        ValueKind::Integer => "INTEGER",
        // timestamps are fixed-width text, see `STORED_TIMESTAMP_FORMAT`
        ValueKind::Text | ValueKind::Timestamp => "TEXT",
    }
}

/// `CREATE TABLE IF NOT EXISTS` for an entity's column list.
pub fn create_table_query(table: &str, columns: &[Column]) -> String {
    let defs = columns
        .iter()
        .map(|c| {
            let mut def = format!("{} {}", quote_ident(c.name), column_type(c.kind));
            if c.primary_key {
                def.push_str(" PRIMARY KEY");
            } else if !c.nullable {
                def.push_str(" NOT NULL");
            }
            def
        })
        .collect::<Vec<_>>()
        .join(", ");
    format!("CREATE TABLE IF NOT EXISTS {} ({defs})", quote_ident(table))
}
