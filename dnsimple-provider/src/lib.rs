//! # dnsimple-provider
//!
//! Record-level reconciliation against [DNSimple](https://dnsimple.com/) zones:
//! list, append, set (upsert) and delete DNS records through the DNSimple v2
//! REST API. Built for ACME DNS-01 solvers, dynamic DNS updaters and other
//! tools that own a handful of records inside a zone.
//!
//! ## Capabilities
//!
//! | Trait | Operation | Semantics |
//! |-------|-----------|-----------|
//! | [`RecordGetter`] | `get_records` | All records of the zone, or an error |
//! | [`RecordAppender`] | `append_records` | Create each record, best-effort |
//! | [`RecordSetter`] | `set_records` | Update by id, or upsert by name/type |
//! | [`RecordDeleter`] | `delete_records` | Delete by id, or by resolved name |
//!
//! Append, Set and Delete return a [`BatchOutcome`]: every input record is
//! either in `succeeded` or in `failures` (with a structured
//! [`ProviderError`]). Use [`BatchOutcome::into_result`] for all-or-nothing
//! semantics.
//!
//! ## Feature Flags
//!
//! - **`native-tls`** *(default)*: Use the platform's native TLS implementation.
//! - **`rustls`**: Use rustls. Recommended for cross-compilation and static builds.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::time::Duration;
//!
//! use dnsimple_provider::{
//!     DnsimpleProvider, ProviderConfig, Record, RecordDeleter, RecordGetter, RecordSetter,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // 1. Configure; the account id is resolved via whoami when omitted
//!     let config = ProviderConfig::new("your-token");
//!     let provider = DnsimpleProvider::new(config);
//!
//!     // 2. Upsert a TXT record
//!     let challenge = Record::new("TXT", "_acme-challenge", "token-value")
//!         .with_ttl(Duration::from_secs(60));
//!     let outcome = provider.set_records("example.com", &[challenge]).await?;
//!     for failure in &outcome.failures {
//!         eprintln!("{} failed: {}", failure.record.name, failure.error);
//!     }
//!
//!     // 3. List the zone
//!     for record in provider.get_records("example.com").await? {
//!         println!("{} {} {} -> {}", record.id, record.name, record.record_type, record.value);
//!     }
//!
//!     // 4. Remove the challenge again (resolved by name)
//!     provider
//!         .delete_records("example.com", &outcome.succeeded)
//!         .await?
//!         .into_result()?;
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! All operations return [`Result<T, ProviderError>`](ProviderError). Errors
//! that affect the whole call (failed initialization, a failed listing in
//! `get_records`) are returned as `Err`; per-record errors of a batch are
//! reported in [`BatchOutcome::failures`].
//!
//! Transient errors (`NetworkError`, `Timeout`, `RateLimited`) of idempotent
//! requests are retried with exponential backoff. Record creation is never
//! retried.

mod binding;
mod config;
mod error;
mod http_client;
mod providers;
mod reconciler;
#[cfg(test)]
mod test_utils;
mod traits;
mod types;
mod utils;

// Re-export error types
pub use error::{ProviderError, Result};

pub use binding::{BindingState, BoundClient};
pub use config::{
    ConfigError, ENV_ACCOUNT_ID, ENV_API_ACCESS_TOKEN, ENV_API_URL, ENV_MAX_CONCURRENCY,
    ENV_REQUEST_TIMEOUT, ProviderConfig,
};
pub use reconciler::DnsimpleProvider;

// Re-export capability traits and the remote API seam
pub use traits::{RecordAppender, RecordDeleter, RecordGetter, RecordSetter, ZoneApi};

// Re-export types
pub use types::{AmbiguityPolicy, BatchOutcome, MatchKey, ReconcileOptions, Record, RecordFailure};

// Re-export the DNSimple client and its wire types
pub use providers::{
    DeleteStatus, DnsimpleClient, Identity, SANDBOX_API_URL, WhoamiAccount, WhoamiUser,
    ZoneRecord, ZoneRecordAttributes,
};

pub use utils::log_sanitizer::mask_secret;
