//! Central configuration for the gatekeeper_axum crate

use std::sync::LazyLock;

/// Upper bound on request bodies buffered for the CSRF body-field lookup.
/// Bodies above this size must carry the token in the header instead.
/// Default: 65536 bytes
pub static GK_CSRF_BODY_LIMIT: LazyLock<usize> = LazyLock::new(|| {
    std::env::var("GK_CSRF_BODY_LIMIT")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(65536)
});

#[cfg(test)]
mod tests {

    fn get_body_limit(env_value: Option<&str>) -> usize {
        env_value.and_then(|s| s.parse().ok()).unwrap_or(65536)
    }

    #[test]
    fn test_body_limit_default() {
        assert_eq!(get_body_limit(None), 65536);
    }

    #[test]
    fn test_body_limit_custom() {
        assert_eq!(get_body_limit(Some("1024")), 1024);
    }

    #[test]
    fn test_body_limit_invalid_falls_back() {
        assert_eq!(get_body_limit(Some("not-a-number")), 65536);
    }
}
