//! Session cookie construction.
//!
//! Both tokens are delivered as HttpOnly cookies scoped to the whole
//! site. Clearing uses the same attributes with an empty value and
//! Max-Age=0 so browsers drop the cookie immediately.

use crate::{ApiError, ApiResult};

use wf_auth::{TokenCodec, extract::{ACCESS_TOKEN_COOKIE, REFRESH_TOKEN_COOKIE}};

use std::panic::Location;

use axum::http::{HeaderMap, HeaderValue, header::SET_COOKIE};
use error_location::ErrorLocation;

/// Append Set-Cookie headers for a freshly minted session pair.
#[track_caller]
pub fn append_session_cookies(
    headers: &mut HeaderMap,
    access_token: &str,
    refresh_token: &str,
    tokens: &TokenCodec,
    secure: bool,
) -> ApiResult<()> {
    headers.append(
        SET_COOKIE,
        session_cookie(
            ACCESS_TOKEN_COOKIE,
            access_token,
            tokens.access_ttl_secs(),
            secure,
        )?,
    );
    headers.append(
        SET_COOKIE,
        session_cookie(
            REFRESH_TOKEN_COOKIE,
            refresh_token,
            tokens.refresh_ttl_secs(),
            secure,
        )?,
    );
    Ok(())
}

/// Append Set-Cookie headers that clear both session cookies.
#[track_caller]
pub fn append_cleared_cookies(headers: &mut HeaderMap, secure: bool) -> ApiResult<()> {
    headers.append(SET_COOKIE, session_cookie(ACCESS_TOKEN_COOKIE, "", 0, secure)?);
    headers.append(SET_COOKIE, session_cookie(REFRESH_TOKEN_COOKIE, "", 0, secure)?);
    Ok(())
}

#[track_caller]
fn session_cookie(
    name: &str,
    value: &str,
    max_age_secs: i64,
    secure: bool,
) -> ApiResult<HeaderValue> {
    let mut cookie = format!(
        "{name}={value}; HttpOnly; Path=/; SameSite=Lax; Max-Age={max_age_secs}"
    );
    if secure {
        cookie.push_str("; Secure");
    }

    HeaderValue::from_str(&cookie).map_err(|e| ApiError::Internal {
        message: format!("Failed to build session cookie: {e}"),
        location: ErrorLocation::from(Location::caller()),
    })
}
