use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One entry in the append-only account activity trail.
///
/// Entries are never updated or deleted once written.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityEntry {
    pub id: Uuid,
    pub identity_id: Uuid,

    /// Action tag, e.g. "REGISTER", "LOGGED-IN", "CHANGED_PASSWORD"
    pub action: String,

    /// Free-form detail payload (changed fields, client IP, user agent)
    pub details: serde_json::Value,

    pub created_at: DateTime<Utc>,
}

impl ActivityEntry {
    pub fn new(identity_id: Uuid, action: impl Into<String>, details: serde_json::Value) -> Self {
        Self {
            id: Uuid::new_v4(),
            identity_id,
            action: action.into(),
            details,
            created_at: Utc::now(),
        }
    }
}
