#![allow(dead_code)]

use std::path::Path;
use std::process::Command as ProcCommand;

use groupcount::{
    entity::Employee,
    storage::{EntityStore, EntityWriter, MemoryStore, SqliteStore},
};
use tempfile::TempDir;

pub fn sqlite_store(dir: &TempDir, rows: &[Employee]) -> SqliteStore {
    let store = SqliteStore::new(dir.path().join("groupcount.sqlite"));
    store.init().expect("init sqlite store");
    store.save_all(rows).expect("seed sqlite store");
    store
}

pub fn memory_store(rows: &[Employee]) -> MemoryStore<Employee> {
    MemoryStore::with_rows(rows.to_vec())
}

/// Both backends holding `rows`. The returned dir must outlive the stores.
pub fn backends(rows: &[Employee]) -> (TempDir, Vec<(&'static str, Box<dyn EntityStore<Employee>>)>) {
    let dir = TempDir::new().expect("temp dir");
    let sqlite = sqlite_store(&dir, rows);
    let memory = memory_store(rows);
    let stores: Vec<(&'static str, Box<dyn EntityStore<Employee>>)> =
        vec![("sqlite", Box::new(sqlite)), ("memory", Box::new(memory))];
    (dir, stores)
}

pub fn base_cmd(data_dir: &Path) -> ProcCommand {
    let mut command = ProcCommand::new(env!("CARGO_BIN_EXE_groupcount"));
    command
        .env("DOTENV_PATH", data_dir.join("missing.env"))
        .env_remove("GROUPCOUNT_LOG_FILE")
        .arg("--data-dir")
        .arg(data_dir);
    command
}
