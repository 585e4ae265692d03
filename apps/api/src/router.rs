//! Shared application router builder.
//!
//! Both the binary and the integration tests build the app here, so tests
//! run the same middleware stack production does.
//!
//! ```text
//! /health                         GET
//! /api/auth/register|login|logout POST
//! /api/stock/import|export        POST
//! /api/stock/movements            GET (query) | POST (body)
//! /api/stock/summary|current      GET
//! /api/stock/{productId}[/audit]  GET
//! /api/products[/{id}]            GET POST | GET PUT DELETE
//! /api/categories[/{id}]          GET POST | GET PUT DELETE
//! ```

use std::time::Duration;

use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderValue, Method};
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::{warn, Level};

use crate::handlers::{auth, categories, health, products, stock};
use crate::state::AppState;

/// Build the full application [`Router`] with its middleware layers.
pub fn build_app_router(state: AppState) -> Router {
    let cors = build_cors_layer(&state.config.cors_origins);

    Router::new()
        .route("/health", get(health::health_check))
        .nest("/api", api_routes())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors)
        .with_state(state)
}

fn api_routes() -> Router<AppState> {
    Router::new()
        // Auth
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/auth/logout", post(auth::logout))
        // Stock
        .route("/stock/import", post(stock::import))
        .route("/stock/export", post(stock::export))
        .route(
            "/stock/movements",
            get(stock::list_movements).post(stock::search_movements),
        )
        .route("/stock/summary", get(stock::summary))
        .route("/stock/current", get(stock::current))
        .route("/stock/{product_id}", get(stock::balance))
        .route("/stock/{product_id}/audit", get(stock::audit))
        // Catalog
        .route("/products", get(products::list).post(products::create))
        .route(
            "/products/{id}",
            get(products::get)
                .put(products::update)
                .delete(products::delete),
        )
        .route("/categories", get(categories::list).post(categories::create))
        .route(
            "/categories/{id}",
            get(categories::get)
                .put(categories::update)
                .delete(categories::delete),
        )
}

/// CORS for the configured origins. Origins that are not valid header
/// values are skipped with a warning.
pub fn build_cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(origin = %origin, error = %e, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
        .allow_credentials(true)
        .max_age(Duration::from_secs(3600))
}
