/// API route handlers
///
/// - `health`: Health check endpoint
/// - `auth`: Sign-in
/// - `invoices`: Invoice listing, edit view and form mutations
/// - `customers`: Customer options for the invoice form

pub mod auth;
pub mod customers;
pub mod health;
pub mod invoices;
