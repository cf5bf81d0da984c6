use axum::http::header::SET_COOKIE;
use axum::http::{Method, StatusCode};
use uuid::Uuid;

use crate::tests::helper;

async fn provider_app() -> axum::Router {
    let mut config = helper::test_config();
    config.auth_url = Some(helper::spawn_upstream().await);
    helper::setup_test_app_with(config).0
}

#[tokio::test]
async fn test_sign_out_with_cookie() {
    let app = provider_app().await;
    let token = helper::token_for(Uuid::new_v4());

    let (status, headers, body) = helper::send(
        &app,
        Method::POST,
        "/api/auth/signout",
        None,
        &[helper::session_cookie(&token)],
    )
    .await;

    assert_eq!(StatusCode::OK, status);
    assert_eq!(body["success"], true);

    let cleared = headers.get(SET_COOKIE).unwrap().to_str().unwrap();
    assert!(cleared.starts_with("supabase-auth-token="));
    assert!(cleared.contains("Max-Age=0"));
}

#[tokio::test]
async fn test_sign_out_with_bearer() {
    let app = provider_app().await;

    let (status, _, body) = helper::send(
        &app,
        Method::POST,
        "/api/auth/signout",
        None,
        &[helper::bearer(&helper::token_for(Uuid::new_v4()))],
    )
    .await;

    assert_eq!(StatusCode::OK, status);
    assert_eq!(body["success"], true);
}

#[tokio::test]
async fn test_sign_out_without_session_is_idempotent() {
    let app = provider_app().await;

    let (status, headers, body) =
        helper::send(&app, Method::POST, "/api/auth/signout", None, &[]).await;

    assert_eq!(StatusCode::OK, status);
    assert_eq!(body["success"], true);

    let cleared = headers.get(SET_COOKIE).unwrap().to_str().unwrap();
    assert!(cleared.starts_with("supabase-auth-token="));
}

#[tokio::test]
async fn test_sign_out_without_session_skips_provider() {
    // no AUTH_URL: a provider call would fail with 500
    let (app, _) = helper::setup_test_app();

    let (status, _, body) =
        helper::send(&app, Method::POST, "/api/auth/signout", None, &[]).await;

    assert_eq!(StatusCode::OK, status);
    assert_eq!(body["success"], true);
}

#[tokio::test]
async fn test_sign_out_rejected_by_provider() {
    let app = provider_app().await;

    let (status, _, body) = helper::send(
        &app,
        Method::POST,
        "/api/auth/signout",
        None,
        &[helper::bearer("revoked-token")],
    )
    .await;

    assert_eq!(StatusCode::BAD_REQUEST, status);
    assert_eq!(body["error"], "invalid JWT");
}

#[tokio::test]
async fn test_sign_out_provider_unavailable() {
    // no AUTH_URL configured
    let (app, _) = helper::setup_test_app();

    let (status, _, body) = helper::send(
        &app,
        Method::POST,
        "/api/auth/signout",
        None,
        &[helper::bearer(&helper::token_for(Uuid::new_v4()))],
    )
    .await;
    assert_eq!(StatusCode::INTERNAL_SERVER_ERROR, status);
    assert!(body["error"].is_string());

    let mut config = helper::test_config();
    config.auth_url = Some(helper::unreachable_base_url());
    let (app, _) = helper::setup_test_app_with(config);

    let (status, _, _) = helper::send(
        &app,
        Method::POST,
        "/api/auth/signout",
        None,
        &[helper::bearer(&helper::token_for(Uuid::new_v4()))],
    )
    .await;
    assert_eq!(StatusCode::INTERNAL_SERVER_ERROR, status);
}
