// Integration tests for the migration framework

use docflow_store::db::{self, StoreConfig};
use docflow_store::migrations::{applied_migrations, apply_migrations};
use rusqlite::Connection;
use std::sync::{Arc, Barrier};
use std::thread;

fn setup_test_db() -> Connection {
    Connection::open_in_memory().expect("Failed to create in-memory database")
}

fn get_table_names(conn: &Connection) -> Vec<String> {
    let mut stmt = conn
        .prepare("SELECT name FROM sqlite_master WHERE type = 'table' ORDER BY name")
        .unwrap();
    stmt.query_map([], |row| row.get(0))
        .unwrap()
        .collect::<Result<Vec<String>, _>>()
        .unwrap()
}

#[test]
fn test_apply_migrations_on_empty_db() {
    // Given: An empty SQLite database
    let mut conn = setup_test_db();

    // When: Migrations are applied
    let result = apply_migrations(&mut conn);

    // Then: All migrations succeed
    assert!(result.is_ok(), "Migrations should succeed: {:?}", result.err());

    let tables = get_table_names(&conn);
    for expected in [
        "schema_version",
        "users",
        "user_roles",
        "documents",
        "approval_steps",
        "audit_logs",
        "sqlite_sequence", // Auto-created by SQLite for AUTOINCREMENT columns
    ] {
        assert!(
            tables.contains(&expected.to_string()),
            "Missing table: {}",
            expected
        );
    }
}

#[test]
fn test_migrations_are_recorded_once() {
    let mut conn = setup_test_db();

    apply_migrations(&mut conn).unwrap();
    apply_migrations(&mut conn).unwrap();

    let applied = applied_migrations(&conn).unwrap();
    assert_eq!(applied, vec!["001_initial_schema".to_string()]);

    let checksum: String = conn
        .query_row(
            "SELECT checksum FROM schema_version WHERE migration_id = '001_initial_schema'",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(checksum.len(), 64);
}

#[test]
fn test_append_only_triggers_exist() {
    let mut conn = setup_test_db();
    apply_migrations(&mut conn).unwrap();

    let triggers: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'trigger' AND tbl_name = 'audit_logs'",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(triggers, 2);
}

#[test]
fn test_concurrent_open_of_fresh_database_migrates_once() {
    const OPENERS: usize = 4;

    for round in 0..10 {
        let dir = tempfile::tempdir().unwrap();
        let path = Arc::new(dir.path().join(format!("fresh-{}.db", round)));
        let barrier = Arc::new(Barrier::new(OPENERS));

        let handles: Vec<_> = (0..OPENERS)
            .map(|_| {
                let path = Arc::clone(&path);
                let barrier = Arc::clone(&barrier);
                thread::spawn(move || {
                    barrier.wait();
                    db::open_configured(path.as_path(), &StoreConfig::default())
                        .map(|_| ())
                        .map_err(|e| e.to_string())
                })
            })
            .collect();

        for handle in handles {
            let result = handle.join().unwrap();
            assert!(result.is_ok(), "round {}: open failed: {:?}", round, result);
        }

        let conn = Connection::open(path.as_path()).unwrap();
        assert_eq!(
            applied_migrations(&conn).unwrap(),
            vec!["001_initial_schema".to_string()]
        );
    }
}
