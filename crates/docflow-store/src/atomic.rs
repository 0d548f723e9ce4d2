//! Storage boundary primitives
//!
//! `begin_exclusive` opens an IMMEDIATE transaction, which takes the
//! database write lock up front. Any other writer blocks in `BEGIN` (up to
//! the connection's busy timeout) until this transaction commits or rolls
//! back, so everything read afterwards inside it is stable.

use crate::errors::{from_rusqlite_in, Result};
use crate::repo::SqliteRepo;
use docflow_core::errors::ExError;
use docflow_core::model::{Document, DocumentId};
use rusqlite::{Connection, Transaction, TransactionBehavior};

/// Begin a transaction holding the exclusive write lock
///
/// # Errors
///
/// - `Timeout` if the lock could not be obtained within the busy timeout
/// - `Persistence` for any other SQLite failure
pub fn begin_exclusive(conn: &mut Connection) -> Result<Transaction<'_>> {
    conn.transaction_with_behavior(TransactionBehavior::Immediate)
        .map_err(from_rusqlite_in("begin_exclusive"))
}

/// Load a document inside a transaction opened by `begin_exclusive`
///
/// # Errors
///
/// Propagates store failures; a missing row is `Ok(None)`.
pub fn load_document_exclusive(
    tx: &Transaction<'_>,
    document_id: DocumentId,
) -> Result<Option<Document>> {
    SqliteRepo::get_document(tx, document_id)
}

/// Commit a transaction opened by `begin_exclusive`
///
/// # Errors
///
/// `Timeout` or `Persistence` when SQLite refuses the commit.
pub fn commit(tx: Transaction<'_>) -> Result<()> {
    tx.commit().map_err(from_rusqlite_in("commit"))
}

/// Run `f` in one exclusive transaction
///
/// Commits when `f` returns `Ok`; any `Err` drops the transaction, which
/// rolls everything back.
///
/// # Errors
///
/// Whatever `f` returns, or the store error from begin/commit.
pub fn run_atomic<T, E, F>(conn: &mut Connection, f: F) -> std::result::Result<T, E>
where
    F: FnOnce(&Transaction<'_>) -> std::result::Result<T, E>,
    E: From<ExError>,
{
    let tx = begin_exclusive(conn)?;
    let value = f(&tx)?;
    commit(tx)?;
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{configure, StoreConfig};
    use crate::migrations::apply_migrations;
    use docflow_core::errors::ExErrorKind;
    use std::time::Duration;

    fn setup_file_db(dir: &tempfile::TempDir, timeout_ms: u64) -> Connection {
        let mut conn = Connection::open(dir.path().join("atomic.db")).unwrap();
        configure(
            &conn,
            &StoreConfig {
                busy_timeout: Duration::from_millis(timeout_ms),
            },
        )
        .unwrap();
        apply_migrations(&mut conn).unwrap();
        conn
    }

    #[test]
    fn test_run_atomic_rolls_back_on_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut conn = setup_file_db(&dir, 1000);

        let result: std::result::Result<(), ExError> = run_atomic(&mut conn, |tx| {
            SqliteRepo::insert_user(tx, "ghost", false)?;
            Err(ExError::new(ExErrorKind::Internal).with_message("abort"))
        });

        assert!(result.is_err());
        assert!(SqliteRepo::find_user_by_username(&conn, "ghost")
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_run_atomic_commits_on_success() {
        let dir = tempfile::tempdir().unwrap();
        let mut conn = setup_file_db(&dir, 1000);

        let user = run_atomic::<_, ExError, _>(&mut conn, |tx| {
            SqliteRepo::insert_user(tx, "alice", false)
        })
        .unwrap();

        assert_eq!(
            SqliteRepo::find_user_by_username(&conn, "alice").unwrap(),
            Some(user)
        );
    }

    #[test]
    fn test_second_writer_times_out_while_lock_held() {
        let dir = tempfile::tempdir().unwrap();
        let mut holder = setup_file_db(&dir, 1000);
        let mut contender = setup_file_db(&dir, 50);

        let _tx = begin_exclusive(&mut holder).unwrap();
        let err = begin_exclusive(&mut contender).unwrap_err();

        assert_eq!(err.kind(), ExErrorKind::Timeout);
        assert_eq!(err.op(), Some("begin_exclusive"));
    }
}
