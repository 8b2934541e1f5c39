use anyhow::{Context, Result};

use crate::{
    entity::{fixture, EmployeeRepository},
    storage::SqliteStore,
};

pub fn run(store: SqliteStore) -> Result<()> {
    let repo = EmployeeRepository::new(store);
    let employees = fixture::demo_employees();
    let saved = repo
        .save_all(&employees)
        .context("saving demo employees")?;
    log::info!("🌱 Seeded {} employees into {}", saved, repo.store().path);
    Ok(())
}
