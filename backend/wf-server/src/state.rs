use wf_auth::TokenCodec;

use std::sync::Arc;

use sqlx::SqlitePool;

/// Shared application state handed to every handler and extractor.
#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub tokens: Arc<TokenCodec>,
    /// Whether session cookies carry the Secure attribute
    pub cookie_secure: bool,
    /// CORS origin, "*" for any
    pub allowed_origin: String,
}
