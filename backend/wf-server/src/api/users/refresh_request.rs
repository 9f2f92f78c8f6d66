use serde::Deserialize;

/// POST /api/v1/users/refresh-token request body.
///
/// The body is a fallback for non-browser clients; the `refreshToken`
/// cookie takes precedence when both are present.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest {
    pub refresh_token: Option<String>,
}
