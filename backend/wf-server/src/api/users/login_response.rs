use crate::IdentityDto;

use serde::Serialize;

/// Login response data: the sanitized profile plus both tokens.
///
/// Tokens are duplicated in the body for clients that cannot use
/// cookies (mobile apps, CLI tools).
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub user: IdentityDto,
    pub access_token: String,
    pub refresh_token: String,
}
