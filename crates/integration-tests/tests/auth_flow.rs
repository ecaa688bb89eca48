//! Integration tests for the session and role-gate flow.
//!
//! These tests require:
//! - A running `PostgreSQL` database with migrations applied
//! - The API server running (cargo run -p harvest-roster-api)
//! - For admin tests, a bootstrapped admin and its credentials in
//!   `ROSTER_ADMIN_EMAIL` / `ROSTER_ADMIN_PASSWORD`
//!
//! Run with: cargo test -p harvest-roster-integration-tests -- --ignored

use reqwest::{Client, StatusCode};
use serde_json::{Value, json};

use harvest_roster_core::Role;
use harvest_roster_integration_tests::{api_base_url, cookie_client, unique_email};

/// Register a fresh worker and leave its session cookie in the client.
async fn register_worker(client: &Client, email: &str) -> Value {
    let base_url = api_base_url();
    let resp = client
        .post(format!("{base_url}/api/auth/register"))
        .json(&json!({
            "name": "Test Worker",
            "email": email,
            "password": "hunter22",
            "phone": "08012345678",
            "address": "12 Test Street",
            "designation": "Team Heads",
            "team": "Membership",
            "department": "Membership",
            "next_of_kin_name": "Test Kin",
            "next_of_kin_contact": "08087654321",
            "next_of_kin_address": "12 Test Street",
        }))
        .send()
        .await
        .expect("Failed to register worker");

    assert_eq!(resp.status(), StatusCode::CREATED);
    resp.json().await.expect("Failed to parse register response")
}

/// Log in the bootstrapped admin and leave its session cookie in the client.
async fn login_admin(client: &Client) -> Value {
    let email = std::env::var("ROSTER_ADMIN_EMAIL").expect("ROSTER_ADMIN_EMAIL not set");
    let password = std::env::var("ROSTER_ADMIN_PASSWORD").expect("ROSTER_ADMIN_PASSWORD not set");

    let base_url = api_base_url();
    let resp = client
        .post(format!("{base_url}/api/auth/login"))
        .json(&json!({ "email": email, "password": password }))
        .send()
        .await
        .expect("Failed to log in admin");

    assert_eq!(resp.status(), StatusCode::OK);
    resp.json().await.expect("Failed to parse login response")
}

// ============================================================================
// Session Lifecycle
// ============================================================================

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_register_opens_session() {
    let client = cookie_client();
    let base_url = api_base_url();

    let body = register_worker(&client, &unique_email("register")).await;
    assert_eq!(body["role"], Role::Worker.as_str());
    assert!(body["token"].is_string());
    assert!(body.get("password").is_none());
    assert!(body.get("password_hash").is_none());

    // The cookie from registration authenticates follow-up requests.
    let resp = client
        .get(format!("{base_url}/api/members/me"))
        .send()
        .await
        .expect("Failed to fetch profile");
    assert_eq!(resp.status(), StatusCode::OK);

    let status: bool = client
        .get(format!("{base_url}/api/auth/status"))
        .send()
        .await
        .expect("Failed to fetch status")
        .json()
        .await
        .expect("Status is not a boolean");
    assert!(status);
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_logout_revokes_session() {
    let client = cookie_client();
    let base_url = api_base_url();

    register_worker(&client, &unique_email("logout")).await;

    let resp = client
        .post(format!("{base_url}/api/auth/logout"))
        .send()
        .await
        .expect("Failed to log out");
    assert_eq!(resp.status(), StatusCode::OK);

    // The expired cookie replaced the live one; the session is gone.
    let resp = client
        .get(format!("{base_url}/api/members/me"))
        .send()
        .await
        .expect("Failed to fetch profile");
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let status: bool = client
        .get(format!("{base_url}/api/auth/status"))
        .send()
        .await
        .expect("Failed to fetch status")
        .json()
        .await
        .expect("Status is not a boolean");
    assert!(!status);
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_wrong_password_rejected() {
    let client = cookie_client();
    let base_url = api_base_url();

    let email = unique_email("badpass");
    register_worker(&client, &email).await;

    let fresh = cookie_client();
    let resp = fresh
        .post(format!("{base_url}/api/auth/login"))
        .json(&json!({ "email": email, "password": "not-the-password" }))
        .send()
        .await
        .expect("Failed to send login");
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

// ============================================================================
// Auth Gates
// ============================================================================

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_no_cookie_is_unauthorized() {
    let client = cookie_client();
    let base_url = api_base_url();

    let resp = client
        .get(format!("{base_url}/api/members/me"))
        .send()
        .await
        .expect("Failed to fetch profile");
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let body: Value = resp.json().await.expect("Failed to parse body");
    assert_eq!(body["message"], "Not authorized, please login");
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_garbage_cookie_is_unauthorized_and_status_false() {
    let client = cookie_client();
    let base_url = api_base_url();

    let resp = client
        .get(format!("{base_url}/api/members/me"))
        .header("Cookie", "token=not-a-real-token")
        .send()
        .await
        .expect("Failed to fetch profile");
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    // The status probe reports false instead of erroring.
    let status: bool = client
        .get(format!("{base_url}/api/auth/status"))
        .header("Cookie", "token=not-a-real-token")
        .send()
        .await
        .expect("Failed to fetch status")
        .json()
        .await
        .expect("Status is not a boolean");
    assert!(!status);
}

#[tokio::test]
#[ignore = "Requires running API server and MEMBER_TOKEN_SECRET in environment"]
async fn test_expired_token_is_unauthorized_and_status_false() {
    let client = cookie_client();
    let base_url = api_base_url();

    // Sign a worker token that expired an hour ago with the server's own
    // worker key, so only the expiry check can reject it.
    let secret = std::env::var("MEMBER_TOKEN_SECRET").expect("MEMBER_TOKEN_SECRET not set");
    let now = i64::try_from(
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .expect("clock before epoch")
            .as_secs(),
    )
    .expect("timestamp out of range");
    let claims = json!({
        "id": 1,
        "role": Role::Worker.as_str(),
        "iat": now - 90_000,
        "exp": now - 3_600,
    });
    let token = jsonwebtoken::encode(
        &jsonwebtoken::Header::default(),
        &claims,
        &jsonwebtoken::EncodingKey::from_secret(secret.as_bytes()),
    )
    .expect("Failed to sign expired token");

    let cookie = format!("token={token}");
    let resp = client
        .get(format!("{base_url}/api/members/me"))
        .header("Cookie", &cookie)
        .send()
        .await
        .expect("Failed to fetch profile");
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    // The status probe reports false for the expired session, no error.
    let status: bool = client
        .get(format!("{base_url}/api/auth/status"))
        .header("Cookie", &cookie)
        .send()
        .await
        .expect("Failed to fetch status")
        .json()
        .await
        .expect("Status is not a boolean");
    assert!(!status);
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_worker_cannot_reach_admin_routes() {
    let client = cookie_client();
    let base_url = api_base_url();

    register_worker(&client, &unique_email("worker-gate")).await;

    // Authenticated, but not an admin: 403, not 401.
    let resp = client
        .get(format!("{base_url}/api/members"))
        .send()
        .await
        .expect("Failed to list members");
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let body: Value = resp.json().await.expect("Failed to parse body");
    assert_eq!(body["message"], "Not authorized as admin");
}

#[tokio::test]
#[ignore = "Requires running API server, database, and bootstrapped admin"]
async fn test_admin_passes_both_gates() {
    let client = cookie_client();
    let base_url = api_base_url();

    let body = login_admin(&client).await;
    assert_eq!(body["role"], Role::Admin.as_str());

    let resp = client
        .get(format!("{base_url}/api/members"))
        .send()
        .await
        .expect("Failed to list members");
    assert_eq!(resp.status(), StatusCode::OK);

    let members: Vec<Value> = resp.json().await.expect("Failed to parse members");
    assert!(members.iter().all(|m| m.get("password_hash").is_none()));
}

#[tokio::test]
#[ignore = "Requires running API server, database, and bootstrapped admin"]
async fn test_admin_creates_member_without_switching_session() {
    let client = cookie_client();
    let base_url = api_base_url();

    login_admin(&client).await;

    let email = unique_email("created");
    let resp = client
        .post(format!("{base_url}/api/members"))
        .json(&json!({
            "name": "Created Worker",
            "email": email,
            "password": "hunter22",
            "phone": "08012345678",
            "address": "12 Test Street",
            "designation": "Team Heads",
            "team": "Membership",
            "department": "Membership",
            "next_of_kin_name": "Test Kin",
            "next_of_kin_contact": "08087654321",
            "next_of_kin_address": "12 Test Street",
            "role": "worker",
        }))
        .send()
        .await
        .expect("Failed to create member");
    assert_eq!(resp.status(), StatusCode::CREATED);

    // The admin's own session is untouched by the creation.
    let me: Value = client
        .get(format!("{base_url}/api/members/me"))
        .send()
        .await
        .expect("Failed to fetch profile")
        .json()
        .await
        .expect("Failed to parse profile");
    assert_eq!(me["role"], "admin");
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_duplicate_email_conflicts() {
    let client = cookie_client();
    let base_url = api_base_url();

    let email = unique_email("duplicate");
    register_worker(&client, &email).await;

    let fresh = cookie_client();
    let resp = fresh
        .post(format!("{base_url}/api/auth/register"))
        .json(&json!({
            "name": "Second",
            "email": email,
            "password": "hunter22",
            "phone": "08012345678",
            "address": "12 Test Street",
            "designation": "Team Heads",
            "team": "Membership",
            "department": "Membership",
            "next_of_kin_name": "Test Kin",
            "next_of_kin_contact": "08087654321",
            "next_of_kin_address": "12 Test Street",
        }))
        .send()
        .await
        .expect("Failed to send register");
    assert_eq!(resp.status(), StatusCode::CONFLICT);
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_register_with_missing_profile_fields_rejected() {
    let client = cookie_client();
    let base_url = api_base_url();

    let resp = client
        .post(format!("{base_url}/api/auth/register"))
        .json(&json!({
            "name": "Incomplete",
            "email": unique_email("incomplete"),
            "password": "hunter22",
        }))
        .send()
        .await
        .expect("Failed to send register");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = resp.json().await.expect("Failed to parse body");
    assert_eq!(body["message"], "Please fill in all required fields");
}
