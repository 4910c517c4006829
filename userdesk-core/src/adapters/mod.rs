//! Adapter implementations
//!
//! Adapters implement the port traits with concrete technologies:
//! - DuckDB for the UserRepository port
//! - An in-memory map for tests and embedding without a database file

pub mod duckdb;
pub mod memory;
