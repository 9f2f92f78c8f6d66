//! Account and session REST API handlers.
//!
//! All success responses use the [`ApiResponse`] envelope; failures are
//! rendered by [`ApiError`]. Session state lives in two places that must
//! stay consistent: the signed tokens held by the client and the single
//! stored refresh token per identity.

use crate::{
    ApiError, ApiResponse, ApiResult, ChangePasswordRequest, ClientMeta, IdentityDto, LoginRequest,
    LoginResponse, RefreshRequest, RefreshResponse, RegisterRequest, UpdateDetailsRequest,
    UsageReportDto,
    api::cookies::{append_cleared_cookies, append_session_cookies},
    api::extractors::{admin_identity::AdminIdentity, auth_identity::AuthIdentity},
    state::AppState,
};

use wf_core::{ActivityEntry, Identity, PublicIdentity, email};
use wf_db::{ActivityLogRepository, IdentityRepository, UsageRepository};

use std::panic::Location;

use axum::{
    Json,
    body::Bytes,
    extract::State,
    http::HeaderMap,
    response::{IntoResponse, Response},
};
use error_location::ErrorLocation;
use serde_json::json;
use uuid::Uuid;

const MIN_PASSWORD_LEN: usize = 8;

// =============================================================================
// Handlers
// =============================================================================

/// POST /api/v1/users/register
///
/// Create a new identity with the default role and no active session.
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> ApiResult<Response> {
    let full_name = require_field(req.full_name, "fullName")?;
    let email_addr = require_field(req.email, "email")?;
    let password = require_field(req.password, "password")?;

    validate_email(&email_addr)?;
    validate_password(&password, "password")?;

    let repo = IdentityRepository::new(state.pool.clone());
    if repo.find_by_email(&email_addr).await?.is_some() {
        return Err(ApiError::Conflict {
            message: "User with this email already exists".to_string(),
            location: ErrorLocation::from(Location::caller()),
        });
    }

    let password_hash = wf_auth::password::hash_password(&password)?;
    let identity = Identity::new(full_name, email_addr, password_hash);

    // A concurrent registration can still win the race; the unique
    // index converts that into the same conflict error.
    repo.create(&identity).await?;

    log_activity(
        &state,
        identity.id,
        "REGISTER",
        json!({ "fullName": identity.full_name, "email": identity.email }),
    )
    .await?;

    log::info!("Registered identity {} ({})", identity.id, identity.email);

    let dto = IdentityDto::from(PublicIdentity::from(identity));
    Ok(ApiResponse::created(dto, "User registered successfully").into_response())
}

/// POST /api/v1/users/login
///
/// Verify credentials, mint a token pair, and start a session. The new
/// refresh token unconditionally replaces any previous one.
pub async fn login(
    State(state): State<AppState>,
    meta: ClientMeta,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Response> {
    let email_addr = require_field(req.email, "email")?;
    let password = require_field(req.password, "password")?;

    let repo = IdentityRepository::new(state.pool.clone());
    let identity = repo
        .find_by_email(&email_addr)
        .await?
        .ok_or_else(|| ApiError::NotFound {
            message: "User not found".to_string(),
            location: ErrorLocation::from(Location::caller()),
        })?;

    if !wf_auth::password::verify_password(&identity.password_hash, &password) {
        return Err(ApiError::BadCredentials {
            message: "Invalid credentials".to_string(),
            location: ErrorLocation::from(Location::caller()),
        });
    }

    let access_token = state.tokens.mint_access_token(&identity)?;
    let refresh_token = state.tokens.mint_refresh_token(identity.id)?;

    repo.begin_session(identity.id, &refresh_token).await?;

    log_activity(
        &state,
        identity.id,
        "LOGGED-IN",
        json!({ "ipAddress": meta.ip_address, "userAgent": meta.user_agent }),
    )
    .await?;

    log::info!("Identity {} logged in", identity.id);

    let mut headers = HeaderMap::new();
    append_session_cookies(
        &mut headers,
        &access_token,
        &refresh_token,
        &state.tokens,
        state.cookie_secure,
    )?;

    let body = LoginResponse {
        user: IdentityDto::from(PublicIdentity::from(identity)),
        access_token,
        refresh_token,
    };

    Ok((headers, ApiResponse::ok(body, "User logged in successfully")).into_response())
}

/// POST /api/v1/users/refresh-token
///
/// Rotate the session: the presented refresh token is consumed and
/// replaced atomically. This route is deliberately outside the
/// access-token gate - an expired access token is the normal case here.
pub async fn refresh_access_token(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> ApiResult<Response> {
    // Cookie first, then request body for cookie-less clients
    let presented = wf_auth::extract_refresh_token(&headers)
        .or_else(|| {
            serde_json::from_slice::<RefreshRequest>(&body)
                .ok()
                .and_then(|req| req.refresh_token)
        })
        .ok_or_else(|| ApiError::unauthorized("Unauthorized request"))?;

    let claims = state.tokens.verify_refresh_token(&presented)?;

    let identity_id = Uuid::parse_str(&claims.sub)
        .map_err(|_| ApiError::unauthorized("Invalid refresh token"))?;

    let repo = IdentityRepository::new(state.pool.clone());
    let identity = repo
        .find_by_id(identity_id)
        .await?
        .ok_or_else(|| ApiError::unauthorized("Invalid refresh token"))?;

    let access_token = state.tokens.mint_access_token(&identity)?;
    let refresh_token = state.tokens.mint_refresh_token(identity.id)?;

    // Conditional update: succeeds only if the stored token still equals
    // the presented one. Of two concurrent refreshes exactly one wins;
    // the loser (or a replayed token) is rejected here.
    let rotated = repo
        .rotate_refresh_token(identity.id, &presented, &refresh_token)
        .await?;
    if !rotated {
        return Err(ApiError::unauthorized("Refresh token is expired or used"));
    }

    log::debug!("Rotated refresh token for identity {}", identity.id);

    let mut headers = HeaderMap::new();
    append_session_cookies(
        &mut headers,
        &access_token,
        &refresh_token,
        &state.tokens,
        state.cookie_secure,
    )?;

    let body = RefreshResponse {
        access_token,
        refresh_token,
    };

    Ok((headers, ApiResponse::ok(body, "Access token refreshed")).into_response())
}

/// GET /api/v1/users/profile
///
/// The gate already resolved the caller to its sanitized profile.
pub async fn get_profile(AuthIdentity(identity): AuthIdentity) -> ApiResult<Response> {
    let dto = IdentityDto::from(identity);
    Ok(ApiResponse::ok(dto, "User profile fetched successfully").into_response())
}

/// PATCH /api/v1/users/update-details
///
/// Partial update of name and/or email; at least one field is required.
pub async fn update_details(
    State(state): State<AppState>,
    AuthIdentity(identity): AuthIdentity,
    Json(req): Json<UpdateDetailsRequest>,
) -> ApiResult<Response> {
    let full_name = req.full_name.filter(|v| !v.trim().is_empty());
    let email_addr = req.email.filter(|v| !v.trim().is_empty());

    if full_name.is_none() && email_addr.is_none() {
        return Err(ApiError::validation(
            "At least one of fullName or email is required",
            None,
        ));
    }

    let repo = IdentityRepository::new(state.pool.clone());

    if let Some(ref new_email) = email_addr {
        validate_email(new_email)?;

        // Pre-check for a friendlier message; the unique index still
        // backstops the race between check and update.
        if let Some(existing) = repo.find_by_email(new_email).await? {
            if existing.id != identity.id {
                return Err(ApiError::Conflict {
                    message: "Email is already taken by another user".to_string(),
                    location: ErrorLocation::from(Location::caller()),
                });
            }
        }
    }

    repo.update_details(identity.id, full_name.as_deref(), email_addr.as_deref())
        .await?;

    let mut changed: Vec<&str> = Vec::new();
    if full_name.is_some() {
        changed.push("fullName");
    }
    if email_addr.is_some() {
        changed.push("email");
    }

    log_activity(
        &state,
        identity.id,
        "UPDATED DETAILS",
        json!({ "fields": changed }),
    )
    .await?;

    let updated = repo
        .find_public_by_id(identity.id)
        .await?
        .ok_or_else(|| ApiError::NotFound {
            message: "User not found".to_string(),
            location: ErrorLocation::from(Location::caller()),
        })?;

    let dto = IdentityDto::from(updated);
    Ok(ApiResponse::ok(dto, "User details updated successfully").into_response())
}

/// PATCH /api/v1/users/change-password
///
/// Requires the current password before storing a new hash. Existing
/// sessions stay valid; only the credential changes.
pub async fn change_password(
    State(state): State<AppState>,
    AuthIdentity(identity): AuthIdentity,
    meta: ClientMeta,
    Json(req): Json<ChangePasswordRequest>,
) -> ApiResult<Response> {
    let old_password = require_field(req.old_password, "oldPassword")?;
    let new_password = require_field(req.new_password, "newPassword")?;
    validate_password(&new_password, "newPassword")?;

    let repo = IdentityRepository::new(state.pool.clone());
    let stored = repo
        .find_by_id(identity.id)
        .await?
        .ok_or_else(|| ApiError::NotFound {
            message: "User not found".to_string(),
            location: ErrorLocation::from(Location::caller()),
        })?;

    if !wf_auth::password::verify_password(&stored.password_hash, &old_password) {
        return Err(ApiError::BadCredentials {
            message: "Invalid old password".to_string(),
            location: ErrorLocation::from(Location::caller()),
        });
    }

    let password_hash = wf_auth::password::hash_password(&new_password)?;
    repo.set_password_hash(identity.id, &password_hash).await?;

    log_activity(
        &state,
        identity.id,
        "CHANGED_PASSWORD",
        json!({ "ipAddress": meta.ip_address, "userAgent": meta.user_agent }),
    )
    .await?;

    log::info!("Identity {} changed password", identity.id);

    Ok(ApiResponse::ok((), "Password updated successfully").into_response())
}

/// POST /api/v1/users/logout
///
/// End the session: drop the stored refresh token and clear both
/// cookies. Already-minted access tokens expire on their own.
pub async fn logout(
    State(state): State<AppState>,
    AuthIdentity(identity): AuthIdentity,
    meta: ClientMeta,
) -> ApiResult<Response> {
    let repo = IdentityRepository::new(state.pool.clone());
    repo.clear_session(identity.id).await?;

    log_activity(
        &state,
        identity.id,
        "LOGGED OUT",
        json!({ "ipAddress": meta.ip_address, "userAgent": meta.user_agent }),
    )
    .await?;

    log::info!("Identity {} logged out", identity.id);

    let mut headers = HeaderMap::new();
    append_cleared_cookies(&mut headers, state.cookie_secure)?;

    Ok((headers, ApiResponse::ok((), "User logged out successfully")).into_response())
}

/// GET /api/v1/users/usage-report
///
/// Admin-only aggregate of feature usage counters across identities.
pub async fn usage_report(
    State(state): State<AppState>,
    AdminIdentity(_admin): AdminIdentity,
) -> ApiResult<Response> {
    let repo = UsageRepository::new(state.pool.clone());
    let rows = repo.report().await?;

    let report: Vec<UsageReportDto> = rows.into_iter().map(UsageReportDto::from).collect();
    Ok(ApiResponse::ok(report, "Usage report generated").into_response())
}

// =============================================================================
// Helpers
// =============================================================================

#[track_caller]
fn require_field(value: Option<String>, field: &str) -> ApiResult<String> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(ApiError::validation(
            format!("{field} is required"),
            Some(field),
        )),
    }
}

#[track_caller]
fn validate_email(value: &str) -> ApiResult<()> {
    if email::is_well_formed(value) {
        Ok(())
    } else {
        Err(ApiError::validation("Invalid email format", Some("email")))
    }
}

#[track_caller]
fn validate_password(value: &str, field: &str) -> ApiResult<()> {
    if value.len() >= MIN_PASSWORD_LEN {
        Ok(())
    } else {
        Err(ApiError::validation(
            format!("Password must be at least {MIN_PASSWORD_LEN} characters"),
            Some(field),
        ))
    }
}

async fn log_activity(
    state: &AppState,
    identity_id: Uuid,
    action: &str,
    details: serde_json::Value,
) -> ApiResult<()> {
    let log = ActivityLogRepository::new(state.pool.clone());
    log.append(&ActivityEntry::new(identity_id, action, details))
        .await?;
    Ok(())
}
