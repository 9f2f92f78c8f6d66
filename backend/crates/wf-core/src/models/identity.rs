//! Identity entity - the persisted user account record.

use crate::Role;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Full identity record as stored.
///
/// `password_hash` and `refresh_token` never leave the service; handlers
/// respond with [`PublicIdentity`] instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub id: Uuid,
    pub full_name: String,
    pub email: String,
    /// Argon2id PHC string, recomputed only through the set-password path
    pub password_hash: String,
    pub role: Role,
    pub is_active: bool,
    /// Current live refresh token; None when no session is active
    pub refresh_token: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Identity {
    /// Create a new identity with default role and no active session
    pub fn new(full_name: String, email: String, password_hash: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            full_name,
            email,
            password_hash,
            role: Role::User,
            is_active: true,
            refresh_token: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// Sanitized projection of an identity: the credential hash and refresh
/// token are structurally absent, not just skipped at serialization time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicIdentity {
    pub id: Uuid,
    pub full_name: String,
    pub email: String,
    pub role: Role,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Identity> for PublicIdentity {
    fn from(identity: Identity) -> Self {
        Self {
            id: identity.id,
            full_name: identity.full_name,
            email: identity.email,
            role: identity.role,
            is_active: identity.is_active,
            created_at: identity.created_at,
            updated_at: identity.updated_at,
        }
    }
}
