use serde::Deserialize;

/// POST /api/v1/users/register request body.
///
/// Fields are optional at the deserialization layer so missing values
/// produce envelope validation errors instead of extractor rejections.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}
