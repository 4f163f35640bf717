/// Invoice mutation pipeline
///
/// Each operation runs the same steps:
///
/// ```text
/// raw form ──validate──▶ typed data ──one statement──▶ invalidate listing ──▶ navigate
///     │                                   │
///     └─ Invalid(field report)            └─ Failed(generic message)
/// ```
///
/// Validation failures never reach storage. Storage faults are logged with
/// their classified kind and reported with a fixed message. Navigation is a
/// returned value ([`MutationResult::Redirect`]), so nothing downstream of a
/// successful write can be mistaken for a storage failure.
///
/// # Example
///
/// ```no_run
/// use std::collections::HashMap;
/// use invoicedesk_shared::cache::RenderCache;
/// use invoicedesk_shared::invoices::mutations::{InvoiceMutations, MutationResult};
/// use sqlx::PgPool;
///
/// # async fn example(pool: PgPool, form: HashMap<String, String>) {
/// let views: RenderCache<String> = RenderCache::new();
/// let mutations = InvoiceMutations::new(&pool, &views);
///
/// match mutations.create(&form).await {
///     MutationResult::Redirect(to) => println!("go to {}", to),
///     other => println!("stay on the form: {:?}", other),
/// }
/// # }
/// ```

use std::collections::HashMap;

use chrono::Utc;
use serde::Serialize;
use tracing::{debug, error, info};
use uuid::Uuid;

use super::schema::{validate_invoice_form, FieldErrors};
use super::store::InvoiceStore;
use crate::cache::ViewCache;
use crate::models::invoice::{InvoiceChanges, NewInvoice};

/// Path of the invoice listing view
pub const INVOICES_PATH: &str = "/dashboard/invoices";

pub const CREATE_MISSING_FIELDS: &str = "Missing Fields. Failed to Create Invoice.";
pub const UPDATE_MISSING_FIELDS: &str = "Missing Fields. Failed to Update Invoice.";
pub const CREATE_FAILED: &str = "Database Error: Failed to Create Invoice.";
pub const UPDATE_FAILED: &str = "Database Error: Failed to Update Invoice.";
pub const DELETE_FAILED: &str = "Database Error: Failed to Delete Invoice.";
pub const DELETED: &str = "Deleted Invoice.";

/// What the originating form needs to re-render
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FormState {
    /// Messages per failing field
    pub errors: FieldErrors,

    /// Top-level message
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl FormState {
    fn message(message: &str) -> Self {
        Self {
            errors: FieldErrors::new(),
            message: Some(message.to_string()),
        }
    }
}

/// Outcome of a mutation
#[derive(Debug, Clone, PartialEq)]
pub enum MutationResult {
    /// Success: the caller should transfer control to this path
    Redirect(String),

    /// Success without navigation, carrying a status message
    Completed(String),

    /// Input rejected; nothing was written
    Invalid(FormState),

    /// Storage rejected or failed the write
    Failed(FormState),
}

impl MutationResult {
    pub fn is_success(&self) -> bool {
        matches!(self, MutationResult::Redirect(_) | MutationResult::Completed(_))
    }
}

/// Runs invoice mutations against a store and a view cache
pub struct InvoiceMutations<'a, S: ?Sized, C: ?Sized> {
    store: &'a S,
    views: &'a C,
}

impl<'a, S, C> InvoiceMutations<'a, S, C>
where
    S: InvoiceStore + ?Sized,
    C: ViewCache + ?Sized,
{
    pub fn new(store: &'a S, views: &'a C) -> Self {
        Self { store, views }
    }

    /// Creates an invoice from a raw form submission
    ///
    /// The amount is stored in cents and the issue date is today's UTC
    /// calendar day. On success the listing is invalidated and the caller is
    /// sent back to it.
    pub async fn create(&self, raw: &HashMap<String, String>) -> MutationResult {
        let valid = match validate_invoice_form(raw) {
            Ok(valid) => valid,
            Err(errors) => return rejected(errors, CREATE_MISSING_FIELDS),
        };

        let invoice = NewInvoice {
            id: Uuid::new_v4(),
            customer_id: valid.customer_id,
            amount: valid.amount_cents,
            status: valid.status,
            date: Utc::now().date_naive(),
        };
        let id = invoice.id;
        let status = invoice.status.as_str();

        if let Err(e) = self.store.insert(invoice).await {
            error!(kind = %e.kind(), error = %e, "Failed to create invoice");
            return MutationResult::Failed(FormState::message(CREATE_FAILED));
        }

        info!(invoice_id = %id, status, "Invoice created");
        self.back_to_listing()
    }

    /// Updates customer, amount and status of an existing invoice
    ///
    /// The identifier and issue date are never written. Updating an id that
    /// does not exist touches nothing and still navigates back.
    pub async fn update(&self, id: Uuid, raw: &HashMap<String, String>) -> MutationResult {
        let valid = match validate_invoice_form(raw) {
            Ok(valid) => valid,
            Err(errors) => return rejected(errors, UPDATE_MISSING_FIELDS),
        };

        let status = valid.status.as_str();
        let changes = InvoiceChanges {
            customer_id: valid.customer_id,
            amount: valid.amount_cents,
            status: valid.status,
        };

        match self.store.update(id, changes).await {
            Ok(rows) => {
                info!(invoice_id = %id, rows, status, "Invoice updated");
                self.back_to_listing()
            }
            Err(e) => {
                error!(invoice_id = %id, kind = %e.kind(), error = %e, "Failed to update invoice");
                MutationResult::Failed(FormState::message(UPDATE_FAILED))
            }
        }
    }

    /// Deletes an invoice
    ///
    /// Deleting an id that does not exist is reported as success.
    pub async fn delete(&self, id: Uuid) -> MutationResult {
        match self.store.delete(id).await {
            Ok(rows) => {
                info!(invoice_id = %id, rows, "Invoice deleted");
                self.views.invalidate(INVOICES_PATH);
                MutationResult::Completed(DELETED.to_string())
            }
            Err(e) => {
                error!(invoice_id = %id, kind = %e.kind(), error = %e, "Failed to delete invoice");
                MutationResult::Failed(FormState::message(DELETE_FAILED))
            }
        }
    }

    fn back_to_listing(&self) -> MutationResult {
        self.views.invalidate(INVOICES_PATH);
        MutationResult::Redirect(INVOICES_PATH.to_string())
    }
}

fn rejected(errors: FieldErrors, message: &str) -> MutationResult {
    debug!(fields = ?errors.keys().collect::<Vec<_>>(), "Invoice submission rejected");
    MutationResult::Invalid(FormState {
        errors,
        message: Some(message.to_string()),
    })
}
