use std::{collections::BTreeMap, fmt::Display};

use serde::{Deserialize, Serialize};

use super::GroupCountResult;
use crate::entity::FieldValue;

/// Printable form of a grouped count: keys rendered as text and sorted, so
/// output is stable across runs.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountReport {
    pub field: String,
    pub counts: BTreeMap<String, u64>,
    pub total: u64,
}

impl CountReport {
    pub fn new<V: FieldValue + Display>(field: &str, result: &GroupCountResult<V>) -> Self {
        let counts = result
            .iter()
            .map(|(key, count)| (key.to_string(), *count))
            .collect();
        Self {
            field: field.to_string(),
            counts,
            total: result.total(),
        }
    }
}
