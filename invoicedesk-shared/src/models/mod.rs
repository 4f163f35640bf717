/// Database models for InvoiceDesk
///
/// # Models
///
/// - `invoice`: Invoices, listing rows and the edit-form view
/// - `customer`: Customers referenced by invoices
/// - `user`: Dashboard accounts
///
/// # Example
///
/// ```no_run
/// use invoicedesk_shared::models::customer::Customer;
/// use invoicedesk_shared::db::pool::{create_pool, DatabaseConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
/// let customers = Customer::list_fields(&pool).await?;
/// # Ok(())
/// # }
/// ```

pub mod customer;
pub mod invoice;
pub mod user;
