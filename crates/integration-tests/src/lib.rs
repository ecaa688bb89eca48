//! Integration tests for Harvest Roster.
//!
//! # Running Tests
//!
//! ```bash
//! # Start the database and run migrations
//! cargo run -p harvest-roster-cli -- migrate
//!
//! # Start the API server
//! cargo run -p harvest-roster-api
//!
//! # Run integration tests
//! cargo test -p harvest-roster-integration-tests -- --ignored
//! ```
//!
//! Tests talk to a running server over HTTP with a cookie-store client, so
//! the session cookie round-trips exactly as a browser would send it.

use reqwest::Client;

/// Base URL for the roster API (configurable via environment).
#[must_use]
pub fn api_base_url() -> String {
    std::env::var("ROSTER_BASE_URL").unwrap_or_else(|_| "http://localhost:4000".to_string())
}

/// Create an HTTP client that persists cookies across requests.
///
/// # Panics
///
/// Panics if the client cannot be constructed; tests cannot proceed
/// without one.
#[must_use]
pub fn cookie_client() -> Client {
    Client::builder()
        .cookie_store(true)
        .build()
        .expect("Failed to create HTTP client")
}

/// A unique email for test isolation.
#[must_use]
pub fn unique_email(prefix: &str) -> String {
    format!("{prefix}-{}@roster-tests.example", uuid::Uuid::new_v4())
}
