//! DNSimple DNS Provider

mod error;
mod http;
mod types;

use std::fmt;

use reqwest::Client;

use crate::config::ProviderConfig;
use crate::error::Result;
use crate::providers::common::create_http_client;
use crate::utils::log_sanitizer::mask_secret;

pub(crate) use error::{DnsimpleErrors, raw_error_from_body};
pub use types::{
    DeleteStatus, Identity, WhoamiAccount, WhoamiUser, ZoneRecord, ZoneRecordAttributes,
};

pub(crate) const PROVIDER_NAME: &str = "dnsimple";
pub(crate) const DEFAULT_API_URL: &str = "https://api.dnsimple.com";
/// DNSimple 沙箱环境
pub const SANDBOX_API_URL: &str = "https://api.sandbox.dnsimple.com";
/// DNSimple records API 单页最大记录数
pub(crate) const MAX_PAGE_SIZE_RECORDS: u32 = 100;

/// HTTP client for the DNSimple v2 API.
pub struct DnsimpleClient {
    pub(crate) client: Client,
    pub(crate) base_url: String,
    pub(crate) api_token: String,
    pub(crate) max_retries: u32,
}

impl DnsimpleClient {
    /// Build a client from `config`. Does not touch the network.
    pub fn new(config: &ProviderConfig) -> Result<Self> {
        config.validate()?;
        let client = create_http_client(
            PROVIDER_NAME,
            config.connect_timeout(),
            config.request_timeout(),
        )?;
        Ok(Self {
            client,
            base_url: config.base_url(),
            api_token: config.api_access_token.trim().to_string(),
            max_retries: config.max_retries,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl fmt::Debug for DnsimpleClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DnsimpleClient")
            .field("base_url", &self.base_url)
            .field("api_token", &mask_secret(&self.api_token))
            .field("max_retries", &self.max_retries)
            .finish_non_exhaustive()
    }
}
