//! Best-effort client metadata for the activity log.

use std::convert::Infallible;
use std::future::Future;

use axum::{extract::FromRequestParts, http::request::Parts};

const UNKNOWN: &str = "unknown";

/// Client IP and user agent as reported by request headers.
///
/// `X-Forwarded-For` may carry a comma-separated chain; the first
/// entry is the originating client. Absent headers become "unknown"
/// rather than failing the request.
pub struct ClientMeta {
    pub ip_address: String,
    pub user_agent: String,
}

impl<S: Send + Sync> FromRequestParts<S> for ClientMeta {
    type Rejection = Infallible;

    #[allow(clippy::manual_async_fn)]
    fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> impl Future<Output = Result<Self, Self::Rejection>> + Send {
        async move {
            let ip_address = parts
                .headers
                .get("x-forwarded-for")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.split(',').next())
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| UNKNOWN.to_string());

            let user_agent = parts
                .headers
                .get(axum::http::header::USER_AGENT)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
                .unwrap_or_else(|| UNKNOWN.to_string());

            Ok(ClientMeta {
                ip_address,
                user_agent,
            })
        }
    }
}
