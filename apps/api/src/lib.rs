//! # Stockroom API
//!
//! HTTP server for the stock ledger.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Stockroom API Server                            │
//! │                                                                         │
//! │  Client ───► axum (CORS, trace) ───► AuthUser ───► handlers            │
//! │                                                        │                │
//! │              ┌─────────────────────┬───────────────────┤                │
//! │              ▼                     ▼                   ▼                │
//! │        StockEngine          CatalogManager      JwtAuthenticator       │
//! │              └─────────────────────┴──► SQLite ◄───────┘                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration
//! Environment variables (or the same keys in `stockroom.toml`):
//! - `STOCKROOM_JWT_SECRET` - Secret for token signing (required)
//! - `STOCKROOM_HOST` / `STOCKROOM_PORT` - Listen address (default: 0.0.0.0:3000)
//! - `STOCKROOM_DATABASE_PATH` - SQLite file (default: ./stockroom.db)
//! - `STOCKROOM_JWT_EXPIRY_HOURS` - Token lifetime (default: 24)
//! - `STOCKROOM_CORS_ORIGINS` - Comma-separated origins
//! - `STOCKROOM_CATEGORY_DELETE_POLICY` - `detach` | `reject`
//! - `STOCKROOM_PRODUCT_DELETE_POLICY` - `cascade` | `retain_history`

pub mod auth;
pub mod config;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod router;
pub mod state;

// Re-exports
pub use auth::{AuthError, Authenticator, JwtAuthenticator};
pub use config::{ApiConfig, ConfigError};
pub use error::{ApiError, ApiResult};
pub use router::build_app_router;
pub use state::AppState;
