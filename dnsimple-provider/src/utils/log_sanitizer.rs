//! Log sanitization utilities
//!
//! Keeps record contents (DKIM keys, ACME tokens) and API tokens out of
//! debug/error logs in full.

/// Maximum number of bytes of a response body included in log output.
const TRUNCATE_LIMIT: usize = 256;

/// Number of leading characters of a secret kept visible by [`mask_secret`].
const SECRET_VISIBLE_PREFIX: usize = 4;

/// MSRV-compatible replacement for `str::floor_char_boundary` (stable since 1.91.0).
fn floor_char_boundary(s: &str, index: usize) -> usize {
    if index >= s.len() {
        s.len()
    } else {
        let mut i = index;
        while i > 0 && !s.is_char_boundary(i) {
            i -= 1;
        }
        i
    }
}

/// Truncate a response body for logging.
pub fn truncate_for_log(s: &str) -> String {
    if s.len() <= TRUNCATE_LIMIT {
        s.to_string()
    } else {
        format!(
            "{}... [truncated, total {} bytes]",
            &s[..floor_char_boundary(s, TRUNCATE_LIMIT)],
            s.len()
        )
    }
}

/// Mask an access token, keeping only a short prefix.
///
/// Short secrets are fully masked so the prefix never reveals most of the value.
pub fn mask_secret(secret: &str) -> String {
    if secret.is_empty() {
        return String::new();
    }
    let visible = secret.chars().count().saturating_sub(1) / 2;
    let keep = visible.min(SECRET_VISIBLE_PREFIX);
    let prefix: String = secret.chars().take(keep).collect();
    format!("{prefix}***")
}
