//! URL checks for values that are handed to third-party APIs.

use validator::ValidateUrl;

/// Whether `value` is an absolute `http` or `https` URL.
pub fn is_http_url(value: &str) -> bool {
    let lower = value.to_ascii_lowercase();
    (lower.starts_with("https://") || lower.starts_with("http://")) && value.validate_url()
}
