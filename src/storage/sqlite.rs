use rusqlite::{params_from_iter, Connection};
use std::path::Path;

use super::traits::{EntityStore, EntityWriter};
use crate::{
    entity::{Employee, Entity, Value},
    error::StoreError,
    query::{
        sql::{self, SqlFilter},
        Predicate,
    },
};

const DB_SCHEMA_VERSION: i64 = 2;

/// SQLite database file holding one table per entity.
///
/// The versioned schema covers `employee`. Tables of other entities are
/// created from `Entity::COLUMNS` on first use.
#[derive(Clone, Debug)]
pub struct SqliteStore {
    pub path: String,
}

fn db_grouped_count(
    conn: &Connection,
    table: &str,
    column: &str,
    filter: &SqlFilter,
) -> Result<Vec<(Value, i64)>, StoreError> {
    let query = sql::grouped_count_query(table, column, filter);
    let mut stmt = conn.prepare(&query)?;
    let raw = stmt
        .query_map(params_from_iter(filter.params.iter()), |row| {
            let key: rusqlite::types::Value = row.get(0)?;
            let count: i64 = row.get(1)?;
            Ok((key, count))
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    let mut rows = Vec::with_capacity(raw.len());
    for (key, count) in raw {
        rows.push((Value::try_from(key)?, count));
    }
    Ok(rows)
}

fn db_ensure_table<E: Entity>(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(&sql::create_table_query(E::TABLE, E::COLUMNS))
}

fn db_count(conn: &Connection, table: &str, filter: &SqlFilter) -> rusqlite::Result<i64> {
    let query = sql::count_query(table, filter);
    conn.query_row(&query, params_from_iter(filter.params.iter()), |row| row.get(0))
}

fn db_save_all<E: Entity>(conn: &Connection, rows: &[E]) -> rusqlite::Result<usize> {
    let columns = E::COLUMNS
        .iter()
        .map(|c| sql::quote_ident(c.name))
        .collect::<Vec<_>>()
        .join(", ");
    let placeholders = (1..=E::COLUMNS.len())
        .map(|i| format!("?{i}"))
        .collect::<Vec<_>>()
        .join(", ");
    let insert = format!(
        "INSERT OR REPLACE INTO {} ({columns}) VALUES ({placeholders})",
        sql::quote_ident(E::TABLE)
    );

    let tx = conn.unchecked_transaction()?;
    let mut written = 0;
    {
        let mut stmt = tx.prepare(&insert)?;
        for row in rows {
            let values = E::COLUMNS
                .iter()
                .map(|c| row.value_of(c.name).unwrap_or(Value::Null))
                .collect::<Vec<_>>();
            written += stmt.execute(params_from_iter(values.iter()))?;
        }
    }
    tx.commit()?;
    Ok(written)
}

impl SqliteStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_string_lossy().to_string(),
        }
    }

    pub fn reset_all(&self) -> Result<(), StoreError> {
        if !Path::new(&self.path).exists() {
            return Ok(());
        }
        std::fs::remove_file(&self.path)?;
        Ok(())
    }

    pub fn init(&self) -> Result<(), StoreError> {
        self.with_conn(|_conn| Ok(()))
    }

    fn with_conn<F, T>(&self, f: F) -> Result<T, StoreError>
    where
        F: FnOnce(&Connection) -> Result<T, StoreError>,
    {
        let conn = Connection::open(&self.path)?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "synchronous", "NORMAL")?;
        conn.busy_timeout(std::time::Duration::from_millis(500))?;

        Self::migrate(&conn)?;
        f(&conn)
    }

    fn migrate(conn: &Connection) -> Result<(), StoreError> {
        let version: i64 = conn.query_row("PRAGMA user_version", [], |row| row.get(0))?;

        if version == DB_SCHEMA_VERSION {
            return Ok(());
        }

        if version == 0 {
            log::info!(
                "SQLite schema migration: {} -> {}",
                version,
                DB_SCHEMA_VERSION
            );
            conn.execute_batch(&format!(
                "{};
                CREATE INDEX employee_department_idx ON employee(department);
                CREATE INDEX employee_date_of_birth_idx ON employee(date_of_birth);",
                sql::create_table_query(Employee::TABLE, Employee::COLUMNS)
            ))?;
            conn.pragma_update(None, "user_version", DB_SCHEMA_VERSION)?;
            return Ok(());
        }

        // version 1 stored whole seconds without a fraction
        if version == 1 {
            log::info!(
                "SQLite schema migration: {} -> {}",
                version,
                DB_SCHEMA_VERSION
            );
            conn.execute_batch(
                r#"
            UPDATE employee
               SET date_of_birth = date_of_birth || '.000000000'
             WHERE length(date_of_birth) = 19;
            "#,
            )?;
            conn.pragma_update(None, "user_version", DB_SCHEMA_VERSION)?;
            return Ok(());
        }

        Err(StoreError::SchemaVersion {
            found: version,
            expected: DB_SCHEMA_VERSION,
        })
    }
}

impl<E: Entity> EntityStore<E> for SqliteStore {
    fn grouped_count(
        &self,
        column: &'static str,
        filter: &Predicate<E>,
    ) -> Result<Vec<(Value, i64)>, StoreError> {
        let filter = sql::render(filter);
        self.with_conn(|conn| {
            db_ensure_table::<E>(conn)?;
            db_grouped_count(conn, E::TABLE, column, &filter)
        })
    }

    fn count(&self, filter: &Predicate<E>) -> Result<i64, StoreError> {
        let filter = sql::render(filter);
        self.with_conn(|conn| {
            db_ensure_table::<E>(conn)?;
            Ok(db_count(conn, E::TABLE, &filter)?)
        })
    }
}

impl<E: Entity> EntityWriter<E> for SqliteStore {
    fn save_all(&self, rows: &[E]) -> Result<usize, StoreError> {
        self.with_conn(|conn| {
            db_ensure_table::<E>(conn)?;
            Ok(db_save_all(conn, rows)?)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        entity::{fixture, Department, Employee},
        error::QueryError,
        query::group_and_count,
    };
    use chrono::NaiveDate;
    use rusqlite::{Connection, OptionalExtension};
    use std::time::{SystemTime, UNIX_EPOCH};

    fn unique_temp_file(prefix: &str, ext: &str) -> std::path::PathBuf {
        let mut p = std::env::temp_dir();
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        p.push(format!("{}_{}.{}", prefix, nanos, ext));
        p
    }

    fn seeded(prefix: &str) -> (std::path::PathBuf, SqliteStore) {
        let path = unique_temp_file(prefix, "db");
        let store = SqliteStore::new(&path);
        store.init().unwrap();
        store.save_all(fixture::demo_employees().as_slice()).unwrap();
        (path, store)
    }

    fn cutoff() -> chrono::NaiveDateTime {
        NaiveDate::from_ymd_opt(1975, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    #[test]
    fn sqlite_reset_all_ok_when_missing() {
        let path = unique_temp_file("groupcount_reset", "db");
        let store = SqliteStore::new(&path);
        store.reset_all().unwrap();
        assert!(!path.exists());
    }

    #[test]
    fn sqlite_reset_all_removes_existing_file() {
        let path = unique_temp_file("groupcount_reset", "db");
        std::fs::write(&path, b"dummy").unwrap();
        assert!(path.exists());
        let store = SqliteStore::new(&path);
        store.reset_all().unwrap();
        assert!(!path.exists());
    }

    #[test]
    fn sqlite_init_initializes_schema() {
        let path = unique_temp_file("groupcount_init", "db");
        let store = SqliteStore::new(&path);
        store.init().unwrap();

        let conn = Connection::open(&path).unwrap();
        let table = conn
            .query_row(
                "SELECT name FROM sqlite_master WHERE type='table' AND name='employee'",
                [],
                |row| row.get::<_, String>(0),
            )
            .optional()
            .unwrap();
        assert_eq!(table.as_deref(), Some("employee"));

        let version: i64 = conn
            .pragma_query_value(None, "user_version", |row| row.get(0))
            .unwrap();
        assert_eq!(version, DB_SCHEMA_VERSION);
    }

    #[test]
    fn sqlite_fails_on_mismatched_schema_version() {
        let path = unique_temp_file("groupcount_bad_version", "db");
        let store = SqliteStore::new(&path);

        let conn = Connection::open(&path).unwrap();
        conn.execute_batch("PRAGMA user_version = 999;").unwrap();

        let err = store.init().expect_err("init should fail on version mismatch");
        let msg = format!("{err}");
        assert!(msg.contains("database schema version mismatch"));
        assert!(msg.contains("--reset"));
    }

    #[test]
    fn sqlite_groups_scenario_by_department() {
        let (_path, store) = seeded("groupcount_scenario");
        let result = group_and_count(
            &store,
            &Employee::DEPARTMENT,
            &Employee::DATE_OF_BIRTH.lt(cutoff()),
        )
        .unwrap();

        assert_eq!(result.len(), 3);
        assert_eq!(result.get(&Department::Hr), 15);
        assert_eq!(result.get(&Department::It), 16);
        assert_eq!(result.get(&Department::Communication), 14);
    }

    #[test]
    fn sqlite_groups_by_timestamp_keys() {
        let (_path, store) = seeded("groupcount_dob");
        let filter = Employee::DEPARTMENT.eq(Department::Hr) & Employee::DATE_OF_BIRTH.gte(cutoff());
        let result = group_and_count(&store, &Employee::DATE_OF_BIRTH, &filter).unwrap();
        assert_eq!(result.total(), 5);
        assert!(result.iter().all(|(dob, _)| *dob >= cutoff()));
    }

    #[test]
    fn sqlite_count_matches_filter() {
        let (_path, store) = seeded("groupcount_count");
        let filter: Predicate<Employee> = Employee::DATE_OF_BIRTH.lt(cutoff());
        assert_eq!(EntityStore::<Employee>::count(&store, &filter).unwrap(), 45);
        assert_eq!(
            EntityStore::<Employee>::count(&store, &Predicate::all()).unwrap(),
            50
        );
    }

    #[test]
    fn sqlite_save_all_replaces_by_primary_key() {
        let (path, store) = seeded("groupcount_replace");
        let mut moved = fixture::demo_employees()[0].clone();
        moved.department = Department::It;
        assert_eq!(store.save_all(std::slice::from_ref(&moved)).unwrap(), 1);

        let conn = Connection::open(&path).unwrap();
        let rows: i64 = conn
            .query_row("SELECT COUNT(*) FROM employee", [], |row| row.get(0))
            .unwrap();
        assert_eq!(rows, 50);
        let department: String = conn
            .query_row("SELECT department FROM employee WHERE id = 1", [], |row| row.get(0))
            .unwrap();
        assert_eq!(department, "IT");
    }

    #[test]
    fn sqlite_unknown_stored_key_is_type_coercion() {
        let (path, store) = seeded("groupcount_coercion");
        let conn = Connection::open(&path).unwrap();
        conn.execute(
            "INSERT INTO employee (id, first_name, last_name, date_of_birth, department)
             VALUES (99, 'Ivo', 'Sala', '1961-01-01T00:00:00.000000000', 'FINANCE')",
            [],
        )
        .unwrap();

        let err = group_and_count(&store, &Employee::DEPARTMENT, &Predicate::all()).unwrap_err();
        assert!(matches!(err, QueryError::TypeCoercion(_)));
    }

    #[test]
    fn sqlite_stored_key_with_other_case_is_type_coercion() {
        let (path, store) = seeded("groupcount_case");
        let conn = Connection::open(&path).unwrap();
        conn.execute(
            "INSERT INTO employee (id, first_name, last_name, date_of_birth, department)
             VALUES (98, 'Ivo', 'Sala', '1961-01-01T00:00:00.000000000', 'hr')",
            [],
        )
        .unwrap();

        let err = group_and_count(&store, &Employee::DEPARTMENT, &Predicate::all()).unwrap_err();
        match err {
            QueryError::TypeCoercion(inner) => assert_eq!(inner.found, "'hr'"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn sqlite_keeps_sub_second_birth_times() {
        let path = unique_temp_file("groupcount_subsecond", "db");
        let store = SqliteStore::new(&path);
        let base = NaiveDate::from_ymd_opt(1960, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let mut employees = fixture::demo_employees()[..2].to_vec();
        employees[0].date_of_birth = base + chrono::Duration::milliseconds(200);
        employees[1].date_of_birth = base + chrono::Duration::milliseconds(700);
        store.save_all(employees.as_slice()).unwrap();

        let all = group_and_count(&store, &Employee::DATE_OF_BIRTH, &Predicate::all()).unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all.get(&employees[0].date_of_birth), 1);
        assert_eq!(all.get(&employees[1].date_of_birth), 1);

        let cutoff = base + chrono::Duration::milliseconds(500);
        let early =
            group_and_count(&store, &Employee::DATE_OF_BIRTH, &Employee::DATE_OF_BIRTH.lt(cutoff))
                .unwrap();
        assert_eq!(early.len(), 1);
        assert_eq!(early.get(&employees[0].date_of_birth), 1);
    }

    #[test]
    fn sqlite_migrates_whole_second_birth_dates() {
        let path = unique_temp_file("groupcount_v1", "db");
        {
            let conn = Connection::open(&path).unwrap();
            conn.execute_batch(
                r#"
                CREATE TABLE employee (
                    id INTEGER PRIMARY KEY,
                    first_name TEXT NOT NULL,
                    last_name TEXT NOT NULL,
                    date_of_birth TEXT NOT NULL,
                    department TEXT NOT NULL
                );
                INSERT INTO employee VALUES (1, 'Ada', 'Rossi', '1975-01-01T00:00:00', 'IT');
                INSERT INTO employee VALUES (2, 'Bo', 'Quinn', '1960-05-05T00:00:00', 'HR');
                PRAGMA user_version = 1;
                "#,
            )
            .unwrap();
        }

        let store = SqliteStore::new(&path);
        store.init().unwrap();

        let conn = Connection::open(&path).unwrap();
        let dob: String = conn
            .query_row("SELECT date_of_birth FROM employee WHERE id = 1", [], |row| row.get(0))
            .unwrap();
        assert_eq!(dob, "1975-01-01T00:00:00.000000000");

        let before = EntityStore::<Employee>::count(&store, &Employee::DATE_OF_BIRTH.lt(cutoff()))
            .unwrap();
        assert_eq!(before, 1);
    }

    struct Note {
        id: i64,
        label: Option<String>,
    }

    impl Entity for Note {
        const TABLE: &'static str = "note";
        const COLUMNS: &'static [crate::entity::Column] = &[
            crate::entity::Column::new("id", crate::entity::ValueKind::Integer).primary_key(),
            crate::entity::Column::new("label", crate::entity::ValueKind::Text).nullable(),
        ];

        fn value_of(&self, column: &str) -> Option<Value> {
            match column {
                "id" => Some(Value::Integer(self.id)),
                "label" => Some(self.label.clone().map(Value::Text).unwrap_or(Value::Null)),
                _ => None,
            }
        }
    }

    const LABEL: crate::entity::FieldSelector<Note, Option<String>> =
        crate::entity::FieldSelector::new("label", |n| n.label.clone());

    #[test]
    fn sqlite_creates_tables_for_other_entities() {
        let path = unique_temp_file("groupcount_notes", "db");
        let store = SqliteStore::new(&path);
        let notes = [
            Note { id: 1, label: Some("todo".into()) },
            Note { id: 2, label: Some("todo".into()) },
            Note { id: 3, label: None },
        ];
        store.save_all(notes.as_slice()).unwrap();

        let result = group_and_count(&store, &LABEL, &Predicate::all()).unwrap();
        assert_eq!(result.get(&Some("todo".to_string())), 2);
        assert_eq!(result.get(&None), 1);
        assert_eq!(EntityStore::<Note>::count(&store, &LABEL.is_null()).unwrap(), 1);
    }

    #[test]
    fn sqlite_unreachable_path_is_store_unavailable() {
        let dir = unique_temp_file("groupcount_missing_dir", "d");
        let store = SqliteStore::new(dir.join("nested").join("db.sqlite"));
        let err = group_and_count(&store, &Employee::DEPARTMENT, &Predicate::all()).unwrap_err();
        assert!(matches!(err, QueryError::StoreUnavailable(_)));
    }
}
