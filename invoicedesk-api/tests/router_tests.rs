/// Router tests that need no database
///
/// The application runs against a pool pointed at a port where nothing
/// listens, so every path that reaches storage sees a connectivity failure.

mod common;

use axum::http::{header, StatusCode};
use common::*;
use invoicedesk_api::routes::invoices::InvoicesPage;
use invoicedesk_shared::auth::credentials::{INVALID_CREDENTIALS, SOMETHING_WENT_WRONG};
use invoicedesk_shared::auth::session::{create_session_token, SessionClaims};
use invoicedesk_shared::invoices::mutations::{
    CREATE_FAILED, CREATE_MISSING_FIELDS, DELETE_FAILED, INVOICES_PATH, UPDATE_FAILED,
    UPDATE_MISSING_FIELDS,
};
use invoicedesk_shared::invoices::schema::{AMOUNT_NOT_POSITIVE, CUSTOMER_REQUIRED, STATUS_REQUIRED};
use serde_json::json;
use tower::Service as _;
use uuid::Uuid;

const CUSTOMER: &str = "3958dc9e-712f-4377-85e9-fec4b6a6442a";

#[tokio::test]
async fn test_dashboard_without_session_redirects_to_login() {
    let (_, app) = offline_app();

    for request in [
        get("/dashboard/invoices", None),
        get("/dashboard/customers", None),
        post_form("/dashboard/invoices", None, &[("amount", "10")]),
        get("/dashboard/invoices", Some("Bearer not.a.token")),
        get("/dashboard/invoices", Some("Basic dXNlcjpwYXNz")),
    ] {
        let response = app.clone().call(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers().get(header::LOCATION).unwrap(), "/login");
    }
}

#[tokio::test]
async fn test_expired_session_redirects_to_login() {
    let (_, app) = offline_app();
    let claims = SessionClaims::with_expiration(&test_user(), chrono::Duration::hours(-1));
    let token = create_session_token(&claims, SECRET).unwrap();

    let response = app
        .clone()
        .call(get("/dashboard/invoices", Some(&format!("Bearer {}", token))))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
}

#[tokio::test]
async fn test_create_with_empty_form_reports_every_field() {
    let (_, app) = offline_app();
    let auth = bearer(&test_user());

    let response = app
        .clone()
        .call(post_form("/dashboard/invoices", Some(&auth), &[]))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = body_json(response).await;
    assert_eq!(body["message"], CREATE_MISSING_FIELDS);
    assert_eq!(body["errors"]["customerId"], json!([CUSTOMER_REQUIRED]));
    assert_eq!(body["errors"]["amount"], json!([AMOUNT_NOT_POSITIVE]));
    assert_eq!(body["errors"]["status"], json!([STATUS_REQUIRED]));
}

#[tokio::test]
async fn test_update_with_bad_amount_reports_only_amount() {
    let (_, app) = offline_app();
    let auth = bearer(&test_user());
    let uri = format!("/dashboard/invoices/{}", Uuid::new_v4());

    let response = app
        .clone()
        .call(post_form(
            &uri,
            Some(&auth),
            &[("customerId", CUSTOMER), ("amount", "-3"), ("status", "paid")],
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = body_json(response).await;
    assert_eq!(body["message"], UPDATE_MISSING_FIELDS);
    assert_eq!(body["errors"], json!({ "amount": [AMOUNT_NOT_POSITIVE] }));
}

#[tokio::test]
async fn test_storage_outage_gives_generic_failure() {
    let (_, app) = offline_app();
    let auth = bearer(&test_user());
    let valid = [("customerId", CUSTOMER), ("amount", "45.00"), ("status", "pending")];
    let id = Uuid::new_v4();

    let cases = [
        (post_form("/dashboard/invoices", Some(&auth), &valid), CREATE_FAILED),
        (post_form(&format!("/dashboard/invoices/{}", id), Some(&auth), &valid), UPDATE_FAILED),
        (post_form(&format!("/dashboard/invoices/{}/delete", id), Some(&auth), &[]), DELETE_FAILED),
    ];

    for (request, message) in cases {
        let response = app.clone().call(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_json(response).await, json!({ "errors": {}, "message": message }));
    }
}

#[tokio::test]
async fn test_form_values_are_not_split_on_separators() {
    let (_, app) = offline_app();
    let auth = bearer(&test_user());

    let response = app
        .clone()
        .call(post_form(
            "/dashboard/invoices",
            Some(&auth),
            &[("customerId", CUSTOMER), ("amount", "1&status=paid")],
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = body_json(response).await;
    assert_eq!(
        body["errors"],
        json!({ "amount": [AMOUNT_NOT_POSITIVE], "status": [STATUS_REQUIRED] })
    );
}

#[tokio::test]
async fn test_malformed_invoice_id_is_rejected() {
    let (_, app) = offline_app();
    let auth = bearer(&test_user());

    let response = app
        .clone()
        .call(post_form("/dashboard/invoices/not-a-uuid/delete", Some(&auth), &[]))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_listing_served_from_cache() {
    let (state, app) = offline_app();
    let auth = bearer(&test_user());

    state.views.put(
        INVOICES_PATH,
        "query=&page=1",
        InvoicesPage {
            invoices: Vec::new(),
            query: String::new(),
            current_page: 1,
            total_pages: 0,
        },
    );

    // Unusable page numbers fall back to page 1
    for uri in ["/dashboard/invoices", "/dashboard/invoices?page=abc"] {
        let response = app.clone().call(get(uri, Some(&auth))).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body["current_page"], 1);
        assert_eq!(body["total_pages"], 0);
    }

    // A failed mutation leaves the cached listing in place
    let response = app
        .clone()
        .call(post_form(
            "/dashboard/invoices",
            Some(&auth),
            &[("customerId", CUSTOMER), ("amount", "1"), ("status", "paid")],
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(state.views.variants(INVOICES_PATH), 1);
}

#[tokio::test]
async fn test_login_destination_is_served() {
    let (state, app) = offline_app();
    let auth = bearer(&test_user());

    state.views.put(
        INVOICES_PATH,
        "query=&page=1",
        InvoicesPage {
            invoices: Vec::new(),
            query: String::new(),
            current_page: 1,
            total_pages: 0,
        },
    );

    // Dashboard root forwards to the listing
    let response = app.clone().call(get("/dashboard", Some(&auth))).await.unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers().get(header::LOCATION).unwrap(), INVOICES_PATH);

    let response = app.clone().call(get(INVOICES_PATH, Some(&auth))).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_uncached_listing_with_outage_is_masked() {
    let (_, app) = offline_app();
    let auth = bearer(&test_user());

    let response = app
        .clone()
        .call(get(&with_query(INVOICES_PATH, &[("query", "acme & co")]), Some(&auth)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body_json(response).await["message"], SOMETHING_WENT_WRONG);
}

#[tokio::test]
async fn test_login_with_malformed_credentials() {
    let (_, app) = offline_app();

    let response = app
        .clone()
        .call(post_form("/login", None, &[("email", "not-an-email"), ("password", "123456")]))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["message"], INVALID_CREDENTIALS);
}

#[tokio::test]
async fn test_login_with_lookup_failure() {
    let (_, app) = offline_app();

    let response = app
        .clone()
        .call(post_form(
            "/login",
            None,
            &[("email", "user@nextmail.com"), ("password", "123456")],
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body_json(response).await["message"], SOMETHING_WENT_WRONG);
}

#[tokio::test]
async fn test_health_reports_degraded_database() {
    let (_, app) = offline_app();

    let response = app.clone().call(get("/health", None)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().get("X-Content-Type-Options").is_some());

    let body = body_json(response).await;
    assert_eq!(body["status"], "degraded");
    assert_eq!(body["database"], "disconnected");
}
