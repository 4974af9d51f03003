use std::sync::LazyLock;

/// Base URL of the hosted identity service
/// Default: "http://127.0.0.1:9999"
pub static GK_IDENTITY_URL: LazyLock<String> = LazyLock::new(|| {
    std::env::var("GK_IDENTITY_URL").unwrap_or_else(|_| "http://127.0.0.1:9999".to_string())
});

/// API key sent with every identity-service request, when the deployment
/// requires one
pub(super) static GK_IDENTITY_API_KEY: LazyLock<Option<String>> =
    LazyLock::new(|| std::env::var("GK_IDENTITY_API_KEY").ok());
