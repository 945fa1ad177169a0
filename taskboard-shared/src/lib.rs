//! # Taskboard Shared Library
//!
//! This crate contains the domain types, storage adapters and business logic
//! used by the Taskboard API server.
//!
//! ## Module Organization
//!
//! - `models`: Database models and data structures
//! - `repository`: Storage traits with PostgreSQL and in-memory implementations
//! - `cache`: Key-value cache abstraction and in-memory implementation
//! - `redis`: Redis client (the production cache)
//! - `auth`: Password hashing, JWT tokens and request authentication
//! - `storage`: Profile photo storage (local directory or in-memory)
//! - `services`: Auth, task and photo services
//! - `db`: Connection pool and migrations
//! - `error`: Service error taxonomy

pub mod auth;
pub mod cache;
pub mod db;
pub mod error;
pub mod models;
pub mod redis;
pub mod repository;
pub mod services;
pub mod storage;

/// Current version of the Taskboard shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
