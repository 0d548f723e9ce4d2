//! Docflow Store - SQLite persistence for the approval workflow
//!
//! Provides:
//! - Connection management and per-connection configuration
//! - Embedded, checksummed schema migrations
//! - The storage boundary: exclusive transactions and locked aggregate loads
//! - Repository functions for users, documents, approval steps and audit logs
//! - A role directory and read-only reporting queries

pub mod atomic;
pub mod db;
pub mod errors;
pub mod migrations;
pub mod queries;
pub mod repo;
pub mod role_directory;

// Re-export key types
pub use db::StoreConfig;
pub use errors::Result;
pub use repo::SqliteRepo;
pub use role_directory::SqliteRoleDirectory;
