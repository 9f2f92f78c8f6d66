//! Role gate layered on top of the access-token gate.

use crate::{ApiError, api::extractors::auth_identity::AuthIdentity, state::AppState};

use wf_core::PublicIdentity;
use wf_db::IdentityRepository;

use std::future::Future;
use std::panic::Location;

use axum::{extract::FromRequestParts, http::request::Parts};
use error_location::ErrorLocation;

/// The authenticated caller, additionally required to hold the admin role.
///
/// The role is re-read from the store rather than trusted from the
/// gate's result, so a demotion takes effect mid-session.
pub struct AdminIdentity(pub PublicIdentity);

impl FromRequestParts<AppState> for AdminIdentity {
    type Rejection = ApiError;

    #[allow(clippy::manual_async_fn)]
    fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> impl Future<Output = Result<Self, Self::Rejection>> + Send {
        async move {
            let AuthIdentity(identity) = AuthIdentity::from_request_parts(parts, state).await?;

            let repo = IdentityRepository::new(state.pool.clone());
            let current = repo
                .find_by_email(&identity.email)
                .await?
                .ok_or_else(|| ApiError::unauthorized("Invalid access token"))?;

            if !current.is_admin() {
                return Err(ApiError::Forbidden {
                    message: "Admin access required".to_string(),
                    location: ErrorLocation::from(Location::caller()),
                });
            }

            Ok(AdminIdentity(PublicIdentity::from(current)))
        }
    }
}
