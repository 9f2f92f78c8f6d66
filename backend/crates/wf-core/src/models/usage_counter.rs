use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Per-identity, per-feature monotonically increasing request counter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageCounter {
    pub identity_id: Uuid,
    pub feature: String,
    pub count: i64,
}
