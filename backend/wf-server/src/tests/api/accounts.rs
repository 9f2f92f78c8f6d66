use crate::tests::harness::{
    TEST_PASSWORD, app, bearer, login_user, promote_to_admin, register_user, request, set_cookies,
    test_state,
};

use wf_db::UsageRepository;

use http::StatusCode;
use serde_json::json;
use uuid::Uuid;

#[tokio::test]
async fn register_returns_sanitized_profile_in_envelope() {
    let state = test_state().await;

    let (status, _, body) = request(
        app(&state),
        "POST",
        "/api/v1/users/register",
        &[],
        Some(json!({
            "fullName": "Ada Lovelace",
            "email": "ada@example.com",
            "password": TEST_PASSWORD,
        })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["statusCode"], 201);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["fullName"], "Ada Lovelace");
    assert_eq!(body["data"]["email"], "ada@example.com");
    assert_eq!(body["data"]["role"], "user");
    assert_eq!(body["data"]["isActive"], true);
    // Credentials must never appear in responses
    assert!(body["data"].get("passwordHash").is_none());
    assert!(body["data"].get("refreshToken").is_none());
}

#[tokio::test]
async fn register_rejects_missing_password() {
    let state = test_state().await;

    let (status, _, body) = request(
        app(&state),
        "POST",
        "/api/v1/users/register",
        &[],
        Some(json!({ "fullName": "Ada", "email": "ada@example.com" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["errors"][0], "password");
}

#[tokio::test]
async fn register_rejects_malformed_email() {
    let state = test_state().await;

    let (status, _, body) = request(
        app(&state),
        "POST",
        "/api/v1/users/register",
        &[],
        Some(json!({
            "fullName": "Ada",
            "email": "not-an-email",
            "password": TEST_PASSWORD,
        })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid email format");
}

#[tokio::test]
async fn register_rejects_short_password() {
    let state = test_state().await;

    let (status, _, body) = request(
        app(&state),
        "POST",
        "/api/v1/users/register",
        &[],
        Some(json!({
            "fullName": "Ada",
            "email": "ada@example.com",
            "password": "short",
        })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errors"][0], "password");
}

#[tokio::test]
async fn duplicate_registration_is_rejected() {
    let state = test_state().await;
    register_user(&state, "Ada", "ada@example.com").await;

    let (status, _, body) = request(
        app(&state),
        "POST",
        "/api/v1/users/register",
        &[],
        Some(json!({
            "fullName": "Other Ada",
            "email": "ada@example.com",
            "password": TEST_PASSWORD,
        })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "User with this email already exists");
}

#[tokio::test]
async fn login_unknown_email_is_not_found() {
    let state = test_state().await;

    let (status, _, body) = request(
        app(&state),
        "POST",
        "/api/v1/users/login",
        &[],
        Some(json!({ "email": "ghost@example.com", "password": TEST_PASSWORD })),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "User not found");
}

#[tokio::test]
async fn login_wrong_password_is_rejected() {
    let state = test_state().await;
    register_user(&state, "Ada", "ada@example.com").await;

    let (status, _, body) = request(
        app(&state),
        "POST",
        "/api/v1/users/login",
        &[],
        Some(json!({ "email": "ada@example.com", "password": "wrong-password" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid credentials");
}

#[tokio::test]
async fn login_sets_both_session_cookies() {
    let state = test_state().await;
    register_user(&state, "Ada", "ada@example.com").await;

    let (status, headers, body) = request(
        app(&state),
        "POST",
        "/api/v1/users/login",
        &[],
        Some(json!({ "email": "ada@example.com", "password": TEST_PASSWORD })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["data"]["accessToken"].is_string());
    assert!(body["data"]["refreshToken"].is_string());
    assert_eq!(body["data"]["user"]["email"], "ada@example.com");

    let cookies = set_cookies(&headers);
    assert_eq!(cookies.len(), 2);
    assert!(cookies.iter().any(|c| c.starts_with("accessToken=")));
    assert!(cookies.iter().any(|c| c.starts_with("refreshToken=")));
    for cookie in &cookies {
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("SameSite=Lax"));
        // cookie_secure is off in the test state
        assert!(!cookie.contains("Secure"));
    }
}

#[tokio::test]
async fn profile_requires_a_token() {
    let state = test_state().await;

    let (status, _, body) =
        request(app(&state), "GET", "/api/v1/users/profile", &[], None).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Unauthorized request");
}

#[tokio::test]
async fn profile_accepts_bearer_token() {
    let state = test_state().await;
    register_user(&state, "Ada", "ada@example.com").await;
    let (access, _) = login_user(&state, "ada@example.com").await;

    let (status, _, body) = request(
        app(&state),
        "GET",
        "/api/v1/users/profile",
        &[bearer(&access)],
        None,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["email"], "ada@example.com");
}

#[tokio::test]
async fn profile_accepts_access_cookie() {
    let state = test_state().await;
    register_user(&state, "Ada", "ada@example.com").await;
    let (access, _) = login_user(&state, "ada@example.com").await;

    let (status, _, body) = request(
        app(&state),
        "GET",
        "/api/v1/users/profile",
        &[crate::tests::harness::access_cookie(&access)],
        None,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["email"], "ada@example.com");
}

#[tokio::test]
async fn update_details_changes_email() {
    let state = test_state().await;
    register_user(&state, "Ada", "ada@example.com").await;
    let (access, _) = login_user(&state, "ada@example.com").await;

    let (status, _, body) = request(
        app(&state),
        "PATCH",
        "/api/v1/users/update-details",
        &[bearer(&access)],
        Some(json!({ "email": "countess@example.com" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["email"], "countess@example.com");
    assert_eq!(body["data"]["fullName"], "Ada");
}

#[tokio::test]
async fn update_details_requires_at_least_one_field() {
    let state = test_state().await;
    register_user(&state, "Ada", "ada@example.com").await;
    let (access, _) = login_user(&state, "ada@example.com").await;

    let (status, _, body) = request(
        app(&state),
        "PATCH",
        "/api/v1/users/update-details",
        &[bearer(&access)],
        Some(json!({})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "At least one of fullName or email is required");
}

#[tokio::test]
async fn update_details_rejects_taken_email() {
    let state = test_state().await;
    register_user(&state, "Ada", "ada@example.com").await;
    register_user(&state, "Grace", "grace@example.com").await;
    let (access, _) = login_user(&state, "grace@example.com").await;

    let (status, _, body) = request(
        app(&state),
        "PATCH",
        "/api/v1/users/update-details",
        &[bearer(&access)],
        Some(json!({ "email": "ada@example.com" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Email is already taken by another user");
}

#[tokio::test]
async fn change_password_requires_correct_old_password() {
    let state = test_state().await;
    register_user(&state, "Ada", "ada@example.com").await;
    let (access, _) = login_user(&state, "ada@example.com").await;

    let (status, _, body) = request(
        app(&state),
        "PATCH",
        "/api/v1/users/change-password",
        &[bearer(&access)],
        Some(json!({ "oldPassword": "wrong-password", "newPassword": "brand-new-pass1" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid old password");
}

#[tokio::test]
async fn change_password_takes_effect_on_next_login() {
    let state = test_state().await;
    register_user(&state, "Ada", "ada@example.com").await;
    let (access, _) = login_user(&state, "ada@example.com").await;

    let (status, _, _) = request(
        app(&state),
        "PATCH",
        "/api/v1/users/change-password",
        &[bearer(&access)],
        Some(json!({ "oldPassword": TEST_PASSWORD, "newPassword": "brand-new-pass1" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // Old password no longer works
    let (status, _, _) = request(
        app(&state),
        "POST",
        "/api/v1/users/login",
        &[],
        Some(json!({ "email": "ada@example.com", "password": TEST_PASSWORD })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // New one does
    let (status, _, _) = request(
        app(&state),
        "POST",
        "/api/v1/users/login",
        &[],
        Some(json!({ "email": "ada@example.com", "password": "brand-new-pass1" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn usage_report_is_forbidden_for_regular_users() {
    let state = test_state().await;
    register_user(&state, "Ada", "ada@example.com").await;
    let (access, _) = login_user(&state, "ada@example.com").await;

    let (status, _, body) = request(
        app(&state),
        "GET",
        "/api/v1/users/usage-report",
        &[bearer(&access)],
        None,
    )
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["message"], "Admin access required");
}

#[tokio::test]
async fn usage_report_aggregates_counters_for_admins() {
    let state = test_state().await;
    let profile = register_user(&state, "Ada", "ada@example.com").await;
    promote_to_admin(&state.pool, "ada@example.com").await;
    let (access, _) = login_user(&state, "ada@example.com").await;

    let identity_id: Uuid = profile["id"].as_str().unwrap().parse().unwrap();
    let usage = UsageRepository::new(state.pool.clone());
    usage.record(identity_id, "weather").await.unwrap();
    usage.record(identity_id, "weather").await.unwrap();

    let (status, _, body) = request(
        app(&state),
        "GET",
        "/api/v1/users/usage-report",
        &[bearer(&access)],
        None,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let rows = body["data"].as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["email"], "ada@example.com");
    assert_eq!(rows[0]["feature"], "weather");
    assert_eq!(rows[0]["count"], 2);
}
