//! # InvoiceDesk API Server Library
//!
//! HTTP surface of the invoice dashboard.
//!
//! ## Modules
//!
//! - `app`: Application state, router builder and session guard
//! - `config`: Configuration management
//! - `error`: Error handling and HTTP response mapping
//! - `middleware`: Security headers
//! - `routes`: Route handlers

pub mod app;
pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
