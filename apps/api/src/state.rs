use std::sync::Arc;

use stockroom_db::Database;
use stockroom_engine::{CatalogManager, StockEngine};

use crate::auth::{Authenticator, JwtAuthenticator};
use crate::config::ApiConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheap to clone: the database is a pool handle, the rest sits behind `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// Database handle, used directly for accounts and health.
    pub db: Database,
    pub engine: StockEngine<Database>,
    pub catalog: CatalogManager<Database>,
    pub auth: Arc<dyn Authenticator>,
    pub config: Arc<ApiConfig>,
}

impl AppState {
    pub fn new(db: Database, config: ApiConfig) -> Self {
        let auth = JwtAuthenticator::new(
            config.jwt_secret.clone(),
            config.jwt_issuer.clone(),
            config.jwt_expiry_hours,
        );

        AppState {
            engine: StockEngine::new(db.clone()),
            catalog: CatalogManager::new(db.clone(), config.catalog_policy()),
            db,
            auth: Arc::new(auth),
            config: Arc::new(config),
        }
    }
}
