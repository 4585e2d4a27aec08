//! DNS Provider implementations

/// Shared utilities used by provider implementations.
pub mod common;

pub(crate) mod dnsimple;

pub use dnsimple::{
    DeleteStatus, DnsimpleClient, Identity, SANDBOX_API_URL, WhoamiAccount, WhoamiUser,
    ZoneRecord, ZoneRecordAttributes,
};
