pub mod config;

use std::hash::Hasher;
use std::sync::OnceLock;

use regex::Regex;

/// Hash a string using xxHash64 for stable, seedless bucketing
pub fn hash_string(s: &str) -> u64 {
    let mut hasher = twox_hash::XxHash64::default();
    hasher.write(s.to_lowercase().as_bytes());
    hasher.finish()
}

pub fn now_ts() -> i64 {
    chrono::Utc::now().timestamp()
}

pub fn is_valid_email(s: &str) -> bool {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL
        .get_or_init(|| {
            Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap_or_else(|e| panic!("email regex: {e}"))
        })
        .is_match(s)
}

pub fn is_http_url(s: &str) -> bool {
    static URL: OnceLock<Regex> = OnceLock::new();
    URL.get_or_init(|| {
        Regex::new(r"^(?i)https?://[^\s/$.?#][^\s]*$").unwrap_or_else(|e| panic!("url regex: {e}"))
    })
    .is_match(s)
}

/// Trimmed copy, or `None` when nothing is left.
pub fn non_empty(s: &str) -> Option<String> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_shape() {
        assert!(is_valid_email("ada@example.com"));
        assert!(!is_valid_email("ada@example"));
        assert!(!is_valid_email("ada example.com"));
        assert!(!is_valid_email(""));
    }

    #[test]
    fn url_shape() {
        assert!(is_http_url("https://example.com/burnout"));
        assert!(is_http_url("HTTP://intranet.local"));
        assert!(!is_http_url("ftp://example.com"));
        assert!(!is_http_url("example.com"));
    }

    #[test]
    fn hash_is_case_insensitive() {
        assert_eq!(hash_string("2024-06-15"), hash_string("2024-06-15"));
        assert_eq!(hash_string("Motiverse"), hash_string("motiverse"));
    }
}
