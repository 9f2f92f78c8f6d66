use crate::DEFAULT_ALLOWED_ORIGIN;

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CorsConfig {
    /// Allowed cross-origin source; "*" permits any origin
    pub allowed_origin: String,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origin: String::from(DEFAULT_ALLOWED_ORIGIN),
        }
    }
}
