//! Axum extractor enforcing the access-token gate.

use crate::{ApiError, state::AppState};

use wf_core::PublicIdentity;
use wf_db::IdentityRepository;

use std::future::Future;

use axum::{extract::FromRequestParts, http::request::Parts};
use uuid::Uuid;

/// The authenticated caller, resolved to its sanitized profile.
///
/// Token lookup order: `accessToken` cookie first, then
/// `Authorization: Bearer`. A valid signature alone is not enough;
/// the subject must still resolve to a stored identity.
pub struct AuthIdentity(pub PublicIdentity);

impl FromRequestParts<AppState> for AuthIdentity {
    type Rejection = ApiError;

    #[allow(clippy::manual_async_fn)]
    fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> impl Future<Output = Result<Self, Self::Rejection>> + Send {
        async move {
            let token = wf_auth::extract_access_token(&parts.headers)
                .ok_or_else(|| ApiError::unauthorized("Unauthorized request"))?;

            let claims = state.tokens.verify_access_token(&token)?;

            let identity_id = Uuid::parse_str(&claims.sub)
                .map_err(|_| ApiError::unauthorized("Invalid access token"))?;

            let repo = IdentityRepository::new(state.pool.clone());
            let identity = repo
                .find_public_by_id(identity_id)
                .await?
                .ok_or_else(|| ApiError::unauthorized("Invalid access token"))?;

            Ok(AuthIdentity(identity))
        }
    }
}
