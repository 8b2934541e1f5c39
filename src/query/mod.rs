// Filter trees, their per-backend translations, and the grouped count.
mod eval;
mod group_count;
mod predicate;
mod report;
mod repository;
pub mod sql;

pub use group_count::{group_and_count, GroupCountResult};
pub use predicate::{CompareOp, Expr, Predicate};
pub use report::CountReport;
pub use repository::Repository;

pub(crate) use eval::group_key;
