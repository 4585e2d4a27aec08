use serde::{Deserialize, Serialize};

/// Unified error type for all provider operations.
///
/// Each variant includes a `provider` field identifying which provider produced the error,
/// plus variant-specific context. All variants are serializable so batch failures can be
/// reported to callers in a structured form.
///
/// # Retryable Errors
///
/// The following variants represent transient failures that may succeed on retry:
/// - [`NetworkError`](Self::NetworkError): network connectivity issues
/// - [`Timeout`](Self::Timeout): request timed out
/// - [`RateLimited`](Self::RateLimited): API rate limit exceeded
///
/// The built-in HTTP client retries these with exponential backoff for idempotent requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "code")]
pub enum ProviderError {
    /// The client binding could not be established (bad configuration, failed
    /// account resolution). Once returned, every later operation on the same
    /// provider returns it again.
    InitializationFailed {
        /// Provider that produced the error.
        provider: String,
        /// Error details.
        detail: String,
    },

    /// A network-level error occurred (DNS resolution failure, connection refused, etc.).
    NetworkError {
        /// Provider that produced the error.
        provider: String,
        /// Error details.
        detail: String,
    },

    /// The access token is invalid or expired (HTTP 401).
    InvalidCredentials {
        /// Provider that produced the error.
        provider: String,
        /// Original error message from the provider API, if available.
        raw_message: Option<String>,
    },

    /// The specified DNS record was not found (HTTP 404 on a record path).
    RecordNotFound {
        /// Provider that produced the error.
        provider: String,
        /// ID of the record that was not found.
        record_id: String,
        /// Original error message from the provider API, if available.
        raw_message: Option<String>,
    },

    /// A record identifier is not a valid numeric DNSimple id. Never sent to the API.
    InvalidRecordId {
        /// Provider that produced the error.
        provider: String,
        /// The offending identifier.
        record_id: String,
    },

    /// A record without an id matched no remote record.
    RecordUnresolved {
        /// Provider that produced the error.
        provider: String,
        /// Name of the record that could not be resolved.
        record_name: String,
    },

    /// A record without an id matched more than one remote record and the
    /// ambiguity policy refuses to guess.
    AmbiguousRecord {
        /// Provider that produced the error.
        provider: String,
        /// Name of the ambiguous record.
        record_name: String,
        /// Number of remote records that matched.
        candidates: usize,
    },

    /// An earlier record of the same batch already targets this remote record.
    DuplicateTarget {
        /// Provider that produced the error.
        provider: String,
        /// Name of the record that was skipped.
        record_name: String,
        /// The contested remote record id.
        record_id: String,
    },

    /// A request parameter is invalid (HTTP 400/422, or rejected locally).
    InvalidParameter {
        /// Provider that produced the error.
        provider: String,
        /// Name of the invalid parameter.
        param: String,
        /// Description of what's wrong.
        detail: String,
    },

    /// The account's plan does not allow the operation (HTTP 402).
    ///
    /// Unlike [`RateLimited`](Self::RateLimited), this is not a transient condition.
    QuotaExceeded {
        /// Provider that produced the error.
        provider: String,
        /// Original error message from the provider API, if available.
        raw_message: Option<String>,
    },

    /// The API rate limit has been exceeded (HTTP 429).
    RateLimited {
        /// Provider that produced the error.
        provider: String,
        /// Suggested wait time in seconds before retrying, if provided by the API.
        retry_after: Option<u64>,
        /// Original error message from the provider API, if available.
        raw_message: Option<String>,
    },

    /// The HTTP request timed out.
    Timeout {
        /// Provider that produced the error.
        provider: String,
        /// Error details.
        detail: String,
    },

    /// The zone (or the account in the path) was not found.
    DomainNotFound {
        /// Provider that produced the error.
        provider: String,
        /// Zone name that was not found.
        domain: String,
        /// Original error message from the provider API, if available.
        raw_message: Option<String>,
    },

    /// The token lacks permission for the requested operation (HTTP 403).
    PermissionDenied {
        /// Provider that produced the error.
        provider: String,
        /// Original error message from the provider API, if available.
        raw_message: Option<String>,
    },

    /// Failed to parse the provider's API response.
    ParseError {
        /// Provider that produced the error.
        provider: String,
        /// Details about the parse failure.
        detail: String,
    },

    /// Some records of a batch failed. Only produced by
    /// [`BatchOutcome::into_result`](crate::BatchOutcome::into_result).
    BatchIncomplete {
        /// Provider that produced the error.
        provider: String,
        /// Number of records that failed.
        failed: usize,
        /// Total number of records in the batch.
        total: usize,
        /// Display form of the first failure.
        first_failure: String,
    },

    /// An unrecognized error from the provider API.
    Unknown {
        /// Provider that produced the error.
        provider: String,
        /// Raw error code (HTTP status) from the API, if available.
        raw_code: Option<String>,
        /// Raw error message from the API.
        raw_message: String,
    },
}

impl ProviderError {
    /// 是否为预期行为（用户输入、资源不存在等），用于日志分级。
    ///
    /// 返回 `true` 时应使用 `warn` 级别，`false` 时使用 `error` 级别。
    /// **新增变体时请同步更新此方法。**
    #[must_use]
    pub fn is_expected(&self) -> bool {
        matches!(
            self,
            Self::InvalidCredentials { .. }
                | Self::RecordNotFound { .. }
                | Self::InvalidRecordId { .. }
                | Self::RecordUnresolved { .. }
                | Self::AmbiguousRecord { .. }
                | Self::DuplicateTarget { .. }
                | Self::InvalidParameter { .. }
                | Self::QuotaExceeded { .. }
                | Self::DomainNotFound { .. }
                | Self::PermissionDenied { .. }
                | Self::BatchIncomplete { .. }
        )
    }

    /// Identifier of the provider that produced the error.
    pub fn provider(&self) -> &str {
        match self {
            Self::InitializationFailed { provider, .. }
            | Self::NetworkError { provider, .. }
            | Self::InvalidCredentials { provider, .. }
            | Self::RecordNotFound { provider, .. }
            | Self::InvalidRecordId { provider, .. }
            | Self::RecordUnresolved { provider, .. }
            | Self::AmbiguousRecord { provider, .. }
            | Self::DuplicateTarget { provider, .. }
            | Self::InvalidParameter { provider, .. }
            | Self::QuotaExceeded { provider, .. }
            | Self::RateLimited { provider, .. }
            | Self::Timeout { provider, .. }
            | Self::DomainNotFound { provider, .. }
            | Self::PermissionDenied { provider, .. }
            | Self::ParseError { provider, .. }
            | Self::BatchIncomplete { provider, .. }
            | Self::Unknown { provider, .. } => provider,
        }
    }

    /// Whether retrying the same request may succeed.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::NetworkError { .. } | Self::Timeout { .. } | Self::RateLimited { .. }
        )
    }
}

impl std::fmt::Display for ProviderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InitializationFailed { provider, detail } => {
                write!(f, "[{provider}] Initialization failed: {detail}")
            }
            Self::NetworkError { provider, detail } => {
                write!(f, "[{provider}] Network error: {detail}")
            }
            Self::InvalidCredentials {
                provider,
                raw_message,
            } => {
                if let Some(msg) = raw_message {
                    write!(f, "[{provider}] Invalid credentials: {msg}")
                } else {
                    write!(f, "[{provider}] Invalid credentials")
                }
            }
            Self::RecordNotFound {
                provider,
                record_id,
                ..
            } => {
                write!(f, "[{provider}] Record '{record_id}' not found")
            }
            Self::InvalidRecordId {
                provider,
                record_id,
            } => {
                write!(f, "[{provider}] Invalid record id '{record_id}'")
            }
            Self::RecordUnresolved {
                provider,
                record_name,
            } => {
                write!(f, "[{provider}] No remote record matches '{record_name}'")
            }
            Self::AmbiguousRecord {
                provider,
                record_name,
                candidates,
            } => {
                write!(
                    f,
                    "[{provider}] Record '{record_name}' is ambiguous ({candidates} remote matches)"
                )
            }
            Self::DuplicateTarget {
                provider,
                record_name,
                record_id,
            } => {
                write!(
                    f,
                    "[{provider}] Record '{record_name}' targets remote record {record_id}, already taken by an earlier record in this batch"
                )
            }
            Self::InvalidParameter {
                provider,
                param,
                detail,
            } => {
                write!(f, "[{provider}] Invalid parameter '{param}': {detail}")
            }
            Self::QuotaExceeded { provider, .. } => {
                write!(f, "[{provider}] Quota exceeded")
            }
            Self::RateLimited {
                provider,
                retry_after,
                ..
            } => {
                if let Some(secs) = retry_after {
                    write!(f, "[{provider}] Rate limited (retry after {secs}s)")
                } else {
                    write!(f, "[{provider}] Rate limited")
                }
            }
            Self::Timeout { provider, detail } => {
                write!(f, "[{provider}] Request timeout: {detail}")
            }
            Self::DomainNotFound {
                provider,
                domain,
                raw_message,
            } => {
                if let Some(msg) = raw_message {
                    write!(f, "[{provider}] Domain '{domain}' not found: {msg}")
                } else {
                    write!(f, "[{provider}] Domain '{domain}' not found")
                }
            }
            Self::PermissionDenied {
                provider,
                raw_message,
            } => {
                if let Some(msg) = raw_message {
                    write!(f, "[{provider}] Permission denied: {msg}")
                } else {
                    write!(f, "[{provider}] Permission denied")
                }
            }
            Self::ParseError { provider, detail } => {
                write!(f, "[{provider}] Parse error: {detail}")
            }
            Self::BatchIncomplete {
                provider,
                failed,
                total,
                first_failure,
            } => {
                write!(
                    f,
                    "[{provider}] {failed} of {total} records failed, first: {first_failure}"
                )
            }
            Self::Unknown {
                provider,
                raw_message,
                ..
            } => {
                write!(f, "[{provider}] {raw_message}")
            }
        }
    }
}

impl std::error::Error for ProviderError {}

/// Convenience type alias for `Result<T, ProviderError>`.
pub type Result<T> = std::result::Result<T, ProviderError>;
