use anyhow::{Context, Result};

use crate::{
    entity::{EmployeeField, EmployeeFilter, EmployeeRepository},
    storage::SqliteStore,
};

pub fn run(store: SqliteStore, by: EmployeeField, filter: &EmployeeFilter) -> Result<()> {
    let repo = EmployeeRepository::new(store);
    let predicate = filter.to_predicate();
    log::info!("🔎 Counting employees by {} where {}", by, predicate);

    let report = by
        .count_report(&repo, &predicate)
        .with_context(|| format!("counting employees by {}", by))?;
    log::info!(
        "📊 {} groups, {} employees",
        report.counts.len(),
        report.total
    );

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
