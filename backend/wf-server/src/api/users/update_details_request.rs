use serde::Deserialize;

/// PATCH /api/v1/users/update-details request body
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDetailsRequest {
    pub full_name: Option<String>,
    pub email: Option<String>,
}
