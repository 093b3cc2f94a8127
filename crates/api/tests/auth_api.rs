//! Integration tests for registration, login, token refresh, logout, and
//! account lockout.

mod common;

use axum::http::StatusCode;
use common::{body_json, get_auth, post_json, post_json_auth, register_company, TEST_PASSWORD};
use sqlx::PgPool;

/// Log in and return the auth response JSON.
async fn login(app: &axum::Router, username: &str, password: &str) -> serde_json::Value {
    let body = serde_json::json!({ "username": username, "password": password });
    let response = post_json(app, "/api/v1/auth/login", body).await;
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await
}

// ---------------------------------------------------------------------------
// Registration
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn register_creates_company_and_admin(pool: PgPool) {
    let app = common::build_test_app(pool);

    let json = register_company(&app, "Farmácia Central", "ana").await;

    assert!(json["access_token"].is_string());
    assert!(json["refresh_token"].is_string());
    assert!(json["expires_in"].is_number());
    assert_eq!(json["user"]["username"], "ana");
    assert_eq!(json["user"]["role"], "admin");
    assert!(json["user"]["company_id"].is_number());

    // Registration must also have created the default alert settings row.
    let token = json["access_token"].as_str().unwrap();
    let response = get_auth(&app, "/api/v1/alerts/settings", token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let settings = body_json(response).await;
    assert_eq!(settings["company_id"], json["user"]["company_id"]);
}

#[sqlx::test(migrations = "../../migrations")]
async fn register_rejects_duplicate_username(pool: PgPool) {
    let app = common::build_test_app(pool);
    register_company(&app, "Empresa A", "duplicada").await;

    let body = serde_json::json!({
        "company_name": "Empresa B",
        "username": "duplicada",
        "email": "outra@test.com",
        "password": TEST_PASSWORD,
    });
    let response = post_json(&app, "/api/v1/auth/register", body).await;

    assert_eq!(response.status(), StatusCode::CONFLICT);
    let json = body_json(response).await;
    assert_eq!(json["code"], "CONFLICT");
}

#[sqlx::test(migrations = "../../migrations")]
async fn register_rejects_short_password(pool: PgPool) {
    let app = common::build_test_app(pool);

    let body = serde_json::json!({
        "company_name": "Empresa",
        "username": "curta",
        "email": "curta@test.com",
        "password": "1234567",
    });
    let response = post_json(&app, "/api/v1/auth/register", body).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Login
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn login_succeeds_with_correct_password(pool: PgPool) {
    let app = common::build_test_app(pool);
    register_company(&app, "Empresa", "logando").await;

    let json = login(&app, "logando", TEST_PASSWORD).await;
    assert!(json["access_token"].is_string());
    assert_eq!(json["user"]["username"], "logando");
}

#[sqlx::test(migrations = "../../migrations")]
async fn login_fails_with_wrong_password(pool: PgPool) {
    let app = common::build_test_app(pool);
    register_company(&app, "Empresa", "errada").await;

    let body = serde_json::json!({ "username": "errada", "password": "senha-incorreta" });
    let response = post_json(&app, "/api/v1/auth/login", body).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../../migrations")]
async fn login_fails_for_unknown_user(pool: PgPool) {
    let app = common::build_test_app(pool);

    let body = serde_json::json!({ "username": "fantasma", "password": "tanto-faz" });
    let response = post_json(&app, "/api/v1/auth/login", body).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../../migrations")]
async fn repeated_failures_lock_the_account(pool: PgPool) {
    let app = common::build_test_app(pool);
    register_company(&app, "Empresa", "travada").await;

    // Five consecutive failures trip the lock.
    for _ in 0..5 {
        let body = serde_json::json!({ "username": "travada", "password": "senha-errada" });
        let response = post_json(&app, "/api/v1/auth/login", body).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    // Even the correct password is rejected while locked.
    let body = serde_json::json!({ "username": "travada", "password": TEST_PASSWORD });
    let response = post_json(&app, "/api/v1/auth/login", body).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

// ---------------------------------------------------------------------------
// Refresh + logout
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn refresh_rotates_the_token(pool: PgPool) {
    let app = common::build_test_app(pool);
    let json = register_company(&app, "Empresa", "girando").await;
    let refresh_token = json["refresh_token"].as_str().unwrap().to_string();

    let body = serde_json::json!({ "refresh_token": refresh_token });
    let response = post_json(&app, "/api/v1/auth/refresh", body).await;
    assert_eq!(response.status(), StatusCode::OK);

    let refreshed = body_json(response).await;
    let new_refresh = refreshed["refresh_token"].as_str().unwrap();
    assert_ne!(new_refresh, refresh_token, "refresh token must rotate");

    // The old refresh token is single-use.
    let body = serde_json::json!({ "refresh_token": refresh_token });
    let response = post_json(&app, "/api/v1/auth/refresh", body).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../../migrations")]
async fn logout_revokes_all_sessions(pool: PgPool) {
    let app = common::build_test_app(pool);
    let json = register_company(&app, "Empresa", "saindo").await;
    let access_token = json["access_token"].as_str().unwrap();
    let refresh_token = json["refresh_token"].as_str().unwrap();

    let response = post_json_auth(
        &app,
        "/api/v1/auth/logout",
        access_token,
        serde_json::json!({}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    // The refresh token no longer works.
    let body = serde_json::json!({ "refresh_token": refresh_token });
    let response = post_json(&app, "/api/v1/auth/refresh", body).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

// ---------------------------------------------------------------------------
// /users/me
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn me_returns_the_authenticated_user(pool: PgPool) {
    let app = common::build_test_app(pool);
    let json = register_company(&app, "Empresa", "eumesmo").await;
    let token = json["access_token"].as_str().unwrap();

    let response = get_auth(&app, "/api/v1/users/me", token).await;
    assert_eq!(response.status(), StatusCode::OK);

    let me = body_json(response).await;
    assert_eq!(me["username"], "eumesmo");
    assert_eq!(me["email"], "eumesmo@test.com");
    // The password hash must never serialize.
    assert!(me.get("password_hash").is_none());
}

#[sqlx::test(migrations = "../../migrations")]
async fn garbage_token_is_rejected(pool: PgPool) {
    let app = common::build_test_app(pool);

    let response = get_auth(&app, "/api/v1/users/me", "not-a-jwt").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
