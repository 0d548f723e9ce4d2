//! Repository layer for persisting workflow records to SQLite

pub mod sqlite_repo;

pub use sqlite_repo::SqliteRepo;
