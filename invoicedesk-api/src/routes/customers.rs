/// Customer endpoints
///
/// - `GET /dashboard/customers` - Options for the invoice form's customer select

use crate::{app::AppState, error::ApiResult};
use axum::{extract::State, Json};
use invoicedesk_shared::models::customer::{Customer, CustomerField};

/// Lists every customer, ordered by name
pub async fn list_customers(State(state): State<AppState>) -> ApiResult<Json<Vec<CustomerField>>> {
    Ok(Json(Customer::list_fields(&state.db).await?))
}
