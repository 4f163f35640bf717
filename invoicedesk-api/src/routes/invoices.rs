/// Invoice endpoints
///
/// # Endpoints
///
/// - `GET  /dashboard/invoices?query&page` - Listing view (cached per query)
/// - `POST /dashboard/invoices` - Create from a form submission
/// - `GET  /dashboard/invoices/:id/edit` - Edit form view
/// - `POST /dashboard/invoices/:id` - Update from a form submission
/// - `POST /dashboard/invoices/:id/delete` - Delete
///
/// Form mutations answer with:
///
/// | outcome | status | body |
/// |---|---|---|
/// | redirect | 303 See Other | `Location: /dashboard/invoices` |
/// | completed | 200 | `{"message": ...}` |
/// | invalid input | 422 | form state (`errors`, `message`) |
/// | storage failure | 500 | form state (`message`) |

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    Form, Json,
};
use invoicedesk_shared::{
    invoices::mutations::{InvoiceMutations, MutationResult, INVOICES_PATH},
    models::{
        customer::{Customer, CustomerField},
        invoice::{Invoice, InvoiceForm, InvoiceListItem, ListingQuery},
    },
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::HashMap;
use tracing::debug;
use uuid::Uuid;

/// One rendered page of the invoice listing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvoicesPage {
    pub invoices: Vec<InvoiceListItem>,
    pub query: String,
    pub current_page: i64,
    pub total_pages: i64,
}

/// Edit form view
#[derive(Debug, Serialize)]
pub struct EditInvoiceView {
    pub invoice: InvoiceForm,
    pub customers: Vec<CustomerField>,
}

/// HTTP rendering of a mutation outcome
pub struct MutationResponse(pub MutationResult);

impl IntoResponse for MutationResponse {
    fn into_response(self) -> Response {
        match self.0 {
            MutationResult::Redirect(target) => Redirect::to(&target).into_response(),
            MutationResult::Completed(message) => {
                (StatusCode::OK, Json(json!({ "message": message }))).into_response()
            }
            MutationResult::Invalid(state) => (StatusCode::UNPROCESSABLE_ENTITY, Json(state)).into_response(),
            MutationResult::Failed(state) => (StatusCode::INTERNAL_SERVER_ERROR, Json(state)).into_response(),
        }
    }
}

/// Cache key for one listing request
///
/// Equivalent query strings (e.g. `page=abc` and no page) share an entry.
fn listing_variant(listing: &ListingQuery) -> String {
    format!("query={}&page={}", listing.search_term(), listing.current_page())
}

/// Listing view
pub async fn list_invoices(
    State(state): State<AppState>,
    Query(listing): Query<ListingQuery>,
) -> ApiResult<Json<InvoicesPage>> {
    let variant = listing_variant(&listing);

    if let Some(page) = state.views.get(INVOICES_PATH, &variant) {
        debug!(variant = %variant, "Serving cached listing");
        return Ok(Json(page));
    }

    // Must be read before the storage reads below
    let generation = state.views.generation(INVOICES_PATH);
    let query = listing.search_term();
    let current_page = listing.current_page();

    let page = InvoicesPage {
        invoices: Invoice::list_filtered(&state.db, query, current_page).await?,
        query: query.to_string(),
        current_page,
        total_pages: Invoice::count_pages(&state.db, query).await?,
    };

    state
        .views
        .put_if_current(INVOICES_PATH, &variant, page.clone(), generation);
    Ok(Json(page))
}

/// Edit form view
///
/// # Errors
///
/// - `404 Not Found`: no invoice with this id
pub async fn edit_invoice(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<EditInvoiceView>> {
    let invoice = Invoice::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Invoice not found".to_string()))?;

    Ok(Json(EditInvoiceView {
        invoice: invoice.into(),
        customers: Customer::list_fields(&state.db).await?,
    }))
}

/// Create
pub async fn create_invoice(
    State(state): State<AppState>,
    Form(raw): Form<HashMap<String, String>>,
) -> MutationResponse {
    let mutations = InvoiceMutations::new(&state.db, &state.views);
    MutationResponse(mutations.create(&raw).await)
}

/// Update
pub async fn update_invoice(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Form(raw): Form<HashMap<String, String>>,
) -> MutationResponse {
    let mutations = InvoiceMutations::new(&state.db, &state.views);
    MutationResponse(mutations.update(id, &raw).await)
}

/// Delete
pub async fn delete_invoice(State(state): State<AppState>, Path(id): Path<Uuid>) -> MutationResponse {
    let mutations = InvoiceMutations::new(&state.db, &state.views);
    MutationResponse(mutations.delete(id).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::header;
    use invoicedesk_shared::invoices::mutations::{FormState, CREATE_FAILED, DELETED};

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn test_redirect_is_see_other() {
        let response = MutationResponse(MutationResult::Redirect(INVOICES_PATH.to_string())).into_response();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers().get(header::LOCATION).unwrap(), INVOICES_PATH);
    }

    #[tokio::test]
    async fn test_completed_carries_message() {
        let response = MutationResponse(MutationResult::Completed(DELETED.to_string())).into_response();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, json!({ "message": DELETED }));
    }

    #[tokio::test]
    async fn test_invalid_and_failed_carry_form_state() {
        let mut errors = invoicedesk_shared::invoices::schema::FieldErrors::new();
        errors.insert("amount".to_string(), vec!["Please enter an amount greater than $0.".to_string()]);
        let invalid = FormState {
            errors,
            message: Some("Missing Fields. Failed to Create Invoice.".to_string()),
        };

        let response = MutationResponse(MutationResult::Invalid(invalid)).into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body = body_json(response).await;
        assert_eq!(body["errors"]["amount"][0], "Please enter an amount greater than $0.");

        let failed = FormState {
            errors: Default::default(),
            message: Some(CREATE_FAILED.to_string()),
        };
        let response = MutationResponse(MutationResult::Failed(failed)).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_json(response).await, json!({ "errors": {}, "message": CREATE_FAILED }));
    }

    #[test]
    fn test_equivalent_listings_share_cache_entry() {
        let unset = ListingQuery::default();
        let garbage = ListingQuery {
            query: None,
            page: Some("abc".to_string()),
        };
        let second = ListingQuery {
            query: None,
            page: Some("2".to_string()),
        };

        assert_eq!(listing_variant(&unset), listing_variant(&garbage));
        assert_ne!(listing_variant(&unset), listing_variant(&second));
    }
}
