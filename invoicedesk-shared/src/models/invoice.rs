/// Invoice model and database operations
///
/// This module provides the Invoice model, the row shapes read by the
/// dashboard listing and edit views, and the parameterized statements used
/// by the mutation pipeline.
///
/// # Schema
///
/// ```sql
/// CREATE TYPE invoice_status AS ENUM ('pending', 'paid');
///
/// CREATE TABLE invoices (
///     id UUID PRIMARY KEY,
///     customer_id UUID NOT NULL REFERENCES customers(id) ON DELETE CASCADE,
///     amount BIGINT NOT NULL CHECK (amount > 0),
///     status invoice_status NOT NULL,
///     date DATE NOT NULL
/// );
/// ```
///
/// Amounts are stored as integer cents. The `date` column is assigned once at
/// insert and never rewritten.
///
/// # Example
///
/// ```no_run
/// use invoicedesk_shared::models::invoice::{Invoice, ListingQuery};
/// use invoicedesk_shared::db::pool::{create_pool, DatabaseConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
///
/// let listing = ListingQuery { query: Some("pending".into()), page: Some("2".into()) };
/// let rows = Invoice::list_filtered(&pool, listing.search_term(), listing.current_page()).await?;
/// let pages = Invoice::count_pages(&pool, listing.search_term()).await?;
/// println!("{} rows on this page, {} pages total", rows.len(), pages);
/// # Ok(())
/// # }
/// ```

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Number of invoices shown on one page of the listing view
pub const ITEMS_PER_PAGE: i64 = 6;

/// Invoice payment status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "invoice_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum InvoiceStatus {
    /// Awaiting payment
    Pending,

    /// Settled
    Paid,
}

impl InvoiceStatus {
    /// Converts status to its stored string form
    pub fn as_str(&self) -> &'static str {
        match self {
            InvoiceStatus::Pending => "pending",
            InvoiceStatus::Paid => "paid",
        }
    }

    /// Parses a submitted status value
    ///
    /// Matching is exact: only `pending` and `paid` are accepted.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "pending" => Some(InvoiceStatus::Pending),
            "paid" => Some(InvoiceStatus::Paid),
            _ => None,
        }
    }
}

/// Invoice record as stored
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Invoice {
    /// Invoice ID, generated at creation and never changed
    pub id: Uuid,

    /// Customer being billed
    pub customer_id: Uuid,

    /// Amount in cents (always > 0)
    pub amount: i64,

    /// Payment status
    pub status: InvoiceStatus,

    /// Issue date, set server-side at insert
    pub date: NaiveDate,
}

/// Input for inserting a new invoice
///
/// `customer_id` is kept as submitted; the database resolves it against
/// `customers(id)` and rejects unknown or malformed references.
#[derive(Debug, Clone, PartialEq)]
pub struct NewInvoice {
    pub id: Uuid,
    pub customer_id: String,
    pub amount: i64,
    pub status: InvoiceStatus,
    pub date: NaiveDate,
}

/// Fields an update may overwrite
///
/// The identifier and issue date are deliberately absent.
#[derive(Debug, Clone, PartialEq)]
pub struct InvoiceChanges {
    pub customer_id: String,
    pub amount: i64,
    pub status: InvoiceStatus,
}

/// One row of the invoice listing, joined with its customer
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct InvoiceListItem {
    pub id: Uuid,
    pub amount: i64,
    pub date: NaiveDate,
    pub status: InvoiceStatus,
    pub name: String,
    pub email: String,
    pub image_url: String,
}

/// Invoice as presented to the edit form
///
/// `amount` is in dollars so the form can be re-submitted unchanged.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvoiceForm {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub amount: f64,
    pub status: InvoiceStatus,
}

impl From<Invoice> for InvoiceForm {
    fn from(invoice: Invoice) -> Self {
        Self {
            id: invoice.id,
            customer_id: invoice.customer_id,
            amount: invoice.amount as f64 / 100.0,
            status: invoice.status,
        }
    }
}

/// Search and pagination parameters of the listing view
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListingQuery {
    /// Free-text search term
    pub query: Option<String>,

    /// Requested page, as it appeared in the URL
    pub page: Option<String>,
}

impl ListingQuery {
    /// Search term, empty when absent
    pub fn search_term(&self) -> &str {
        self.query.as_deref().unwrap_or("")
    }

    /// Requested page, falling back to 1 for missing or unusable values
    pub fn current_page(&self) -> i64 {
        self.page
            .as_deref()
            .and_then(|p| p.trim().parse::<i64>().ok())
            .filter(|p| *p >= 1)
            .unwrap_or(1)
    }
}

const LISTING_FILTER: &str = r#"
    customers.name ILIKE $1 OR
    customers.email ILIKE $1 OR
    invoices.amount::text ILIKE $1 OR
    invoices.date::text ILIKE $1 OR
    invoices.status::text ILIKE $1
"#;

fn search_pattern(query: &str) -> String {
    format!("%{}%", query)
}

impl Invoice {
    /// Inserts a new invoice
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The customer reference does not resolve (foreign key or uuid parse)
    /// - The amount violates the positive-amount check
    /// - Database connection fails
    pub async fn create(pool: &PgPool, data: NewInvoice) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            INSERT INTO invoices (id, customer_id, amount, status, date)
            VALUES ($1, $2::uuid, $3, $4, $5)
            "#,
        )
        .bind(data.id)
        .bind(data.customer_id)
        .bind(data.amount)
        .bind(data.status)
        .bind(data.date)
        .execute(pool)
        .await?;

        Ok(())
    }

    /// Overwrites customer, amount and status of an invoice
    ///
    /// Returns the number of rows touched (0 when the id does not exist).
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        data: InvoiceChanges,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE invoices
            SET customer_id = $2::uuid, amount = $3, status = $4
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(data.customer_id)
        .bind(data.amount)
        .bind(data.status)
        .execute(pool)
        .await?;

        Ok(result.rows_affected())
    }

    /// Deletes an invoice by ID
    ///
    /// Returns the number of rows removed (0 when the id does not exist).
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM invoices WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected())
    }

    /// Finds an invoice by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let invoice = sqlx::query_as::<_, Invoice>(
            r#"
            SELECT id, customer_id, amount, status, date
            FROM invoices
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(invoice)
    }

    /// Lists one page of invoices matching a search term
    ///
    /// The term is matched case-insensitively against customer name and
    /// email, and against the textual amount, date and status. Results are
    /// newest first.
    pub async fn list_filtered(
        pool: &PgPool,
        query: &str,
        page: i64,
    ) -> Result<Vec<InvoiceListItem>, sqlx::Error> {
        let offset = (page.max(1) - 1) * ITEMS_PER_PAGE;

        let sql = format!(
            r#"
            SELECT invoices.id, invoices.amount, invoices.date, invoices.status,
                   customers.name, customers.email, customers.image_url
            FROM invoices
            JOIN customers ON invoices.customer_id = customers.id
            WHERE {LISTING_FILTER}
            ORDER BY invoices.date DESC
            LIMIT $2 OFFSET $3
            "#
        );

        let rows = sqlx::query_as::<_, InvoiceListItem>(&sql)
            .bind(search_pattern(query))
            .bind(ITEMS_PER_PAGE)
            .bind(offset)
            .fetch_all(pool)
            .await?;

        Ok(rows)
    }

    /// Counts the listing pages needed for a search term
    pub async fn count_pages(pool: &PgPool, query: &str) -> Result<i64, sqlx::Error> {
        let sql = format!(
            r#"
            SELECT COUNT(*)
            FROM invoices
            JOIN customers ON invoices.customer_id = customers.id
            WHERE {LISTING_FILTER}
            "#
        );

        let (count,): (i64,) = sqlx::query_as(&sql)
            .bind(search_pattern(query))
            .fetch_one(pool)
            .await?;

        Ok(total_pages(count))
    }
}

/// Pages needed to show `count` rows
pub fn total_pages(count: i64) -> i64 {
    (count + ITEMS_PER_PAGE - 1) / ITEMS_PER_PAGE
}
