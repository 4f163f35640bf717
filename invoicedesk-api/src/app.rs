/// Application state and router builder
///
/// This module defines the shared application state and provides
/// a function to build the Axum router with all routes and middleware.
///
/// # Example
///
/// ```no_run
/// use invoicedesk_api::{app::AppState, config::Config};
/// use sqlx::PgPool;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let pool = PgPool::connect(&config.database.url).await?;
/// let state = AppState::new(pool, config);
/// let app = invoicedesk_api::app::build_router(state);
/// # Ok(())
/// # }
/// ```

use crate::{config::Config, middleware::security::SecurityHeadersLayer, routes::invoices::InvoicesPage};
use axum::{
    extract::{Request, State},
    http::{header, HeaderValue, Method},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
    Router,
};
use invoicedesk_shared::{auth::session, cache::RenderCache, invoices::mutations::INVOICES_PATH};
use sqlx::PgPool;
use std::sync::Arc;
use tower_http::{
    compression::CompressionLayer,
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::{debug, Level};

/// Where unauthenticated dashboard requests are sent
pub const LOGIN_PATH: &str = "/login";

/// Shared application state
///
/// Cloned for each request handler via Axum's `State` extractor.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: PgPool,

    /// Rendered listing views
    pub views: RenderCache<InvoicesPage>,

    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Creates new application state with an empty view cache
    pub fn new(db: PgPool, config: Config) -> Self {
        Self {
            db,
            views: RenderCache::new(),
            config: Arc::new(config),
        }
    }

    /// Secret for session token operations
    pub fn session_secret(&self) -> &str {
        &self.config.session.secret
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// # Architecture
///
/// ```text
/// /
/// ├── GET  /health                           # Health check (public)
/// ├── POST /login                            # Sign in (public)
/// └── /dashboard/                            # Session required
///     ├── GET  /                             # Redirects to the listing
///     ├── GET  /invoices?query&page          # Listing (cached)
///     ├── POST /invoices                     # Create
///     ├── GET  /invoices/:id/edit            # Edit form view
///     ├── POST /invoices/:id                 # Update
///     ├── POST /invoices/:id/delete          # Delete
///     └── GET  /customers                    # Customer select options
/// ```
///
/// # Middleware Stack
///
/// Applied in order (bottom to top):
/// 1. Session guard (dashboard routes only)
/// 2. Logging (tower-http TraceLayer)
/// 3. Response compression (gzip, br)
/// 4. CORS (tower-http CorsLayer)
/// 5. Security headers
pub fn build_router(state: AppState) -> Router {
    use crate::routes;

    let public_routes = Router::new()
        .route("/health", get(routes::health::health_check))
        .route(LOGIN_PATH, post(routes::auth::login));

    let dashboard_routes = Router::new()
        .route("/", get(|| async { Redirect::to(INVOICES_PATH) }))
        .route(
            "/invoices",
            get(routes::invoices::list_invoices).post(routes::invoices::create_invoice),
        )
        .route("/invoices/:id/edit", get(routes::invoices::edit_invoice))
        .route("/invoices/:id", post(routes::invoices::update_invoice))
        .route("/invoices/:id/delete", post(routes::invoices::delete_invoice))
        .route("/customers", get(routes::customers::list_customers))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            session_guard,
        ));

    // Configure CORS based on environment
    let cors = if state.config.api.cors_origins.iter().any(|origin| origin == "*") {
        CorsLayer::permissive()
    } else {
        let origins: Vec<HeaderValue> = state
            .config
            .api
            .cors_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
            .allow_credentials(true)
            .max_age(std::time::Duration::from_secs(3600))
    };

    Router::new()
        .merge(public_routes)
        .nest("/dashboard", dashboard_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(CompressionLayer::new())
        .layer(cors)
        .layer(SecurityHeadersLayer::new(state.config.api.production))
        .with_state(state)
}

/// Session guard for dashboard routes
///
/// Validates the bearer session token and injects its claims into request
/// extensions. Requests without a valid session are redirected to the login
/// page.
async fn session_guard(State(state): State<AppState>, mut req: Request, next: Next) -> Response {
    let token = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "));

    let Some(token) = token else {
        debug!(path = %req.uri().path(), "No session, redirecting to login");
        return Redirect::to(LOGIN_PATH).into_response();
    };

    match session::validate_session_token(token, state.session_secret()) {
        Ok(claims) => {
            req.extensions_mut().insert(claims);
            next.run(req).await
        }
        Err(e) => {
            debug!(error = %e, "Rejected session, redirecting to login");
            Redirect::to(LOGIN_PATH).into_response()
        }
    }
}
