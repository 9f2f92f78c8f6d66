use crate::tests::harness::{
    app, bearer, login_user, refresh_cookie, register_user, request, set_cookies, test_state,
    test_state_with_ttls,
};

use http::StatusCode;
use serde_json::json;

#[tokio::test]
async fn refresh_with_cookie_rotates_the_pair() {
    let state = test_state().await;
    register_user(&state, "Ada", "ada@example.com").await;
    let (_, refresh) = login_user(&state, "ada@example.com").await;

    let (status, headers, body) = request(
        app(&state),
        "POST",
        "/api/v1/users/refresh-token",
        &[refresh_cookie(&refresh)],
        None,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Access token refreshed");

    let new_refresh = body["data"]["refreshToken"].as_str().unwrap();
    assert_ne!(new_refresh, refresh);
    assert!(body["data"]["accessToken"].is_string());

    let cookies = set_cookies(&headers);
    assert!(cookies.iter().any(|c| c.starts_with("accessToken=")));
    assert!(cookies.iter().any(|c| c.starts_with("refreshToken=")));
}

#[tokio::test]
async fn refresh_accepts_token_in_request_body() {
    let state = test_state().await;
    register_user(&state, "Ada", "ada@example.com").await;
    let (_, refresh) = login_user(&state, "ada@example.com").await;

    let (status, _, body) = request(
        app(&state),
        "POST",
        "/api/v1/users/refresh-token",
        &[],
        Some(json!({ "refreshToken": refresh })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["data"]["accessToken"].is_string());
}

#[tokio::test]
async fn replayed_refresh_token_is_rejected() {
    let state = test_state().await;
    register_user(&state, "Ada", "ada@example.com").await;
    let (_, refresh) = login_user(&state, "ada@example.com").await;

    let (status, _, _) = request(
        app(&state),
        "POST",
        "/api/v1/users/refresh-token",
        &[refresh_cookie(&refresh)],
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // The rotated-away token must not be usable again
    let (status, _, body) = request(
        app(&state),
        "POST",
        "/api/v1/users/refresh-token",
        &[refresh_cookie(&refresh)],
        None,
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Refresh token is expired or used");
}

#[tokio::test]
async fn refresh_without_any_token_is_unauthorized() {
    let state = test_state().await;

    let (status, _, body) = request(
        app(&state),
        "POST",
        "/api/v1/users/refresh-token",
        &[],
        None,
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Unauthorized request");
}

#[tokio::test]
async fn refresh_with_garbage_token_is_unauthorized() {
    let state = test_state().await;

    let (status, _, _) = request(
        app(&state),
        "POST",
        "/api/v1/users/refresh-token",
        &[refresh_cookie("not-a-jwt")],
        None,
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn expired_access_token_is_rejected_at_the_gate() {
    // Access tokens are minted already expired; refresh stays valid
    let state = test_state_with_ttls(-120, 864_000).await;
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

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Token is expired");
}

#[tokio::test]
async fn expired_refresh_token_is_rejected() {
    let state = test_state_with_ttls(900, -120).await;
    register_user(&state, "Ada", "ada@example.com").await;
    let (_, refresh) = login_user(&state, "ada@example.com").await;

    let (status, _, _) = request(
        app(&state),
        "POST",
        "/api/v1/users/refresh-token",
        &[refresh_cookie(&refresh)],
        None,
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn logout_clears_cookies_and_ends_the_session() {
    let state = test_state().await;
    register_user(&state, "Ada", "ada@example.com").await;
    let (access, refresh) = login_user(&state, "ada@example.com").await;

    let (status, headers, _) = request(
        app(&state),
        "POST",
        "/api/v1/users/logout",
        &[bearer(&access)],
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let cookies = set_cookies(&headers);
    assert_eq!(cookies.len(), 2);
    for cookie in &cookies {
        assert!(cookie.contains("Max-Age=0"), "not cleared: {cookie}");
    }

    // The stored refresh token is gone, so refreshing fails
    let (status, _, _) = request(
        app(&state),
        "POST",
        "/api/v1/users/refresh-token",
        &[refresh_cookie(&refresh)],
        None,
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // Already-minted access tokens keep working until they expire
    let (status, _, _) = request(
        app(&state),
        "GET",
        "/api/v1/users/profile",
        &[bearer(&access)],
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn second_login_invalidates_the_first_refresh_token() {
    let state = test_state().await;
    register_user(&state, "Ada", "ada@example.com").await;
    let (_, first_refresh) = login_user(&state, "ada@example.com").await;
    let (_, second_refresh) = login_user(&state, "ada@example.com").await;

    let (status, _, _) = request(
        app(&state),
        "POST",
        "/api/v1/users/refresh-token",
        &[refresh_cookie(&first_refresh)],
        None,
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _, _) = request(
        app(&state),
        "POST",
        "/api/v1/users/refresh-token",
        &[refresh_cookie(&second_refresh)],
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn concurrent_refreshes_have_exactly_one_winner() {
    let state = test_state().await;
    register_user(&state, "Ada", "ada@example.com").await;
    let (_, refresh) = login_user(&state, "ada@example.com").await;

    let first_cookies = [refresh_cookie(&refresh)];
    let second_cookies = [refresh_cookie(&refresh)];
    let first = request(
        app(&state),
        "POST",
        "/api/v1/users/refresh-token",
        &first_cookies,
        None,
    );
    let second = request(
        app(&state),
        "POST",
        "/api/v1/users/refresh-token",
        &second_cookies,
        None,
    );

    let ((status_a, _, _), (status_b, _, _)) = tokio::join!(first, second);

    let winners = [status_a, status_b]
        .iter()
        .filter(|s| **s == StatusCode::OK)
        .count();
    assert_eq!(winners, 1, "got {status_a} and {status_b}");

    let losers = [status_a, status_b]
        .iter()
        .filter(|s| **s == StatusCode::UNAUTHORIZED)
        .count();
    assert_eq!(losers, 1);
}
