//! # InvoiceDesk Shared Library
//!
//! Types and business logic behind the InvoiceDesk dashboard API.
//!
//! ## Module Organization
//!
//! - `models`: Invoices, customers and users, with their SQL
//! - `invoices`: The validate → persist → invalidate → navigate pipeline
//! - `cache`: Rendered-view cache and its invalidation hook
//! - `auth`: Password hashing, credential checks and session tokens
//! - `db`: Connection pool and migrations

pub mod auth;
pub mod cache;
pub mod db;
pub mod invoices;
pub mod models;

/// Current version of the InvoiceDesk shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
