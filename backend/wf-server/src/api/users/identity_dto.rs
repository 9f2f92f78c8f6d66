use wf_core::PublicIdentity;

use serde::Serialize;

/// Identity DTO for JSON serialization; never carries credentials
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentityDto {
    pub id: String,
    pub full_name: String,
    pub email: String,
    pub role: String,
    pub is_active: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl From<PublicIdentity> for IdentityDto {
    fn from(identity: PublicIdentity) -> Self {
        Self {
            id: identity.id.to_string(),
            full_name: identity.full_name,
            email: identity.email,
            role: identity.role.to_string(),
            is_active: identity.is_active,
            created_at: identity.created_at.to_rfc3339(),
            updated_at: identity.updated_at.to_rfc3339(),
        }
    }
}
