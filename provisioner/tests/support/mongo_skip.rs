//! Helpers for gating tests on a live MongoDB server.
//!
//! Live tests read the connection string from `MONGODB_TEST_URL` and return
//! early when it is unset. `SKIP_TEST_MONGO` marks the skip as intended so CI
//! logs can tell a deliberate skip from a forgotten variable.

/// Environment variable holding the live test server's connection string.
pub const MONGODB_TEST_URL_ENV: &str = "MONGODB_TEST_URL";

/// Returns true when the `SKIP_TEST_MONGO` environment variable is set to a
/// truthy value.
///
/// Truthy values: "1", "true", "yes" (case-insensitive).
pub fn should_skip_test_mongo() -> bool {
    std::env::var("SKIP_TEST_MONGO")
        .map(|value| matches!(value.to_lowercase().as_str(), "1" | "true" | "yes"))
        .unwrap_or(false)
}

/// Connection string for the live server, or `None` when the test should
/// return early.
pub fn live_mongo_url() -> Option<String> {
    if should_skip_test_mongo() {
        eprintln!("SKIP-TEST-MONGO: live MongoDB tests disabled");
        return None;
    }
    match std::env::var(MONGODB_TEST_URL_ENV) {
        Ok(url) if !url.trim().is_empty() => Some(url),
        _ => {
            eprintln!(
                "MONGODB-TEST-URL-MISSING: set {MONGODB_TEST_URL_ENV} to a disposable MongoDB server to run this test"
            );
            None
        }
    }
}
