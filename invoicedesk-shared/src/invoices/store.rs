/// Persistence seam for invoice mutations
///
/// The mutation executor talks to storage only through [`InvoiceStore`]:
/// one parameterized statement per call. The PostgreSQL implementation lives
/// on [`PgPool`] and delegates to the statements in
/// [`crate::models::invoice`].
///
/// Storage faults are classified on the way out so they can be logged with
/// a useful kind, while callers still show one generic message.

use std::fmt;

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::invoice::{Invoice, InvoiceChanges, NewInvoice};

/// Broad category of a persistence fault
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreErrorKind {
    /// A constraint or reference was violated (SQLSTATE class 23, bad uuid text)
    ConstraintViolation,

    /// The database could not be reached or the pool gave up
    Connectivity,

    /// Anything else
    Unknown,
}

impl fmt::Display for StoreErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreErrorKind::ConstraintViolation => write!(f, "constraint violation"),
            StoreErrorKind::Connectivity => write!(f, "connectivity fault"),
            StoreErrorKind::Unknown => write!(f, "unknown fault"),
        }
    }
}

/// Classified persistence error
#[derive(Debug, thiserror::Error)]
#[error("{kind}: {source}")]
pub struct StoreError {
    kind: StoreErrorKind,

    #[source]
    source: sqlx::Error,
}

impl StoreError {
    /// Wraps a storage error with an explicit kind
    pub fn new(kind: StoreErrorKind, source: sqlx::Error) -> Self {
        Self { kind, source }
    }

    /// Category of the fault
    pub fn kind(&self) -> StoreErrorKind {
        self.kind
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(source: sqlx::Error) -> Self {
        let kind = classify(&source);
        Self { kind, source }
    }
}

fn classify(err: &sqlx::Error) -> StoreErrorKind {
    match err {
        sqlx::Error::Database(db_err) => match db_err.code() {
            // 22P02: invalid_text_representation, e.g. a customer id that is not a uuid
            Some(code) if code.starts_with("23") || code == "22P02" => {
                StoreErrorKind::ConstraintViolation
            }
            _ => StoreErrorKind::Unknown,
        },
        sqlx::Error::Io(_)
        | sqlx::Error::Tls(_)
        | sqlx::Error::PoolTimedOut
        | sqlx::Error::PoolClosed
        | sqlx::Error::WorkerCrashed => StoreErrorKind::Connectivity,
        _ => StoreErrorKind::Unknown,
    }
}

/// Storage operations the mutation executor needs
#[async_trait]
pub trait InvoiceStore: Send + Sync {
    /// Inserts one invoice
    async fn insert(&self, invoice: NewInvoice) -> Result<(), StoreError>;

    /// Overwrites one invoice, returning rows affected
    async fn update(&self, id: Uuid, changes: InvoiceChanges) -> Result<u64, StoreError>;

    /// Removes one invoice, returning rows affected
    async fn delete(&self, id: Uuid) -> Result<u64, StoreError>;
}

#[async_trait]
impl InvoiceStore for PgPool {
    async fn insert(&self, invoice: NewInvoice) -> Result<(), StoreError> {
        Ok(Invoice::create(self, invoice).await?)
    }

    async fn update(&self, id: Uuid, changes: InvoiceChanges) -> Result<u64, StoreError> {
        Ok(Invoice::update(self, id, changes).await?)
    }

    async fn delete(&self, id: Uuid) -> Result<u64, StoreError> {
        Ok(Invoice::delete(self, id).await?)
    }
}
