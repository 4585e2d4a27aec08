//! Utility modules.

/// `Duration` <-> whole-seconds serde helpers for record TTLs.
pub mod duration_secs;

/// Log sanitization utilities to prevent sensitive data exposure.
pub mod log_sanitizer;
