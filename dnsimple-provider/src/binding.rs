//! Lazy, exactly-once client binding.
//!
//! The first operation builds the HTTP client and resolves the account id;
//! concurrent first callers wait for that single initialization. The outcome
//! is kept for the lifetime of the binding, including a failure.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use serde::{Deserialize, Serialize};
use tokio::sync::OnceCell;

use crate::config::ProviderConfig;
use crate::error::{ProviderError, Result};
use crate::providers::dnsimple::PROVIDER_NAME;
use crate::traits::ZoneApi;

/// Builds the API client from the configuration.
pub(crate) type Connector<A> = Box<dyn Fn(&ProviderConfig) -> Result<A> + Send + Sync>;

/// Observable state of a [`ClientBinding`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BindingState {
    /// No operation has run yet.
    Unconfigured,
    /// Initialization is in progress.
    Initializing,
    /// Client and account id are available.
    Ready,
    /// Initialization failed; every operation returns the stored error.
    Failed,
}

/// A ready-to-use client together with the account it acts for.
pub struct BoundClient<A> {
    api: Arc<A>,
    account_id: String,
}

impl<A> BoundClient<A> {
    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn account_id(&self) -> &str {
        &self.account_id
    }
}

impl<A> fmt::Debug for BoundClient<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoundClient")
            .field("account_id", &self.account_id)
            .finish_non_exhaustive()
    }
}

/// Resets the in-progress flag when an initialization attempt ends or is cancelled.
struct InitGuard<'a>(&'a AtomicBool);

impl<'a> InitGuard<'a> {
    fn start(flag: &'a AtomicBool) -> Self {
        flag.store(true, Ordering::SeqCst);
        Self(flag)
    }
}

impl Drop for InitGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

pub(crate) struct ClientBinding<A> {
    config: ProviderConfig,
    connector: Connector<A>,
    cell: OnceCell<Result<BoundClient<A>>>,
    initializing: AtomicBool,
}

impl<A: ZoneApi> ClientBinding<A> {
    pub(crate) fn new(config: ProviderConfig, connector: Connector<A>) -> Self {
        Self {
            config,
            connector,
            cell: OnceCell::new(),
            initializing: AtomicBool::new(false),
        }
    }

    pub(crate) fn config(&self) -> &ProviderConfig {
        &self.config
    }

    pub(crate) fn state(&self) -> BindingState {
        match self.cell.get() {
            Some(Ok(_)) => BindingState::Ready,
            Some(Err(_)) => BindingState::Failed,
            None if self.initializing.load(Ordering::SeqCst) => BindingState::Initializing,
            None => BindingState::Unconfigured,
        }
    }

    /// Initialize on first use and return the bound client.
    ///
    /// Dropping the returned future before it completes leaves the binding
    /// uninitialized; the next caller starts over.
    pub(crate) async fn ensure_ready(&self) -> Result<&BoundClient<A>> {
        let outcome = self
            .cell
            .get_or_init(|| async {
                let _guard = InitGuard::start(&self.initializing);
                self.initialize().await
            })
            .await;
        outcome.as_ref().map_err(Clone::clone)
    }

    async fn initialize(&self) -> Result<BoundClient<A>> {
        let result = self.connect().await;
        match &result {
            Ok(bound) => log::info!(
                "[{PROVIDER_NAME}] Client ready for account {} at {}",
                bound.account_id,
                self.config.base_url()
            ),
            Err(e) => log::error!("[{PROVIDER_NAME}] Initialization failed: {e}"),
        }
        result
    }

    async fn connect(&self) -> Result<BoundClient<A>> {
        self.config.validate()?;
        let api = (self.connector)(&self.config).map_err(into_initialization_error)?;

        let account_id = match self.config.account_id() {
            Some(id) => id.to_string(),
            None => resolve_account_id(&api).await?,
        };

        Ok(BoundClient {
            api: Arc::new(api),
            account_id,
        })
    }
}

/// Ask the API which account the token belongs to.
async fn resolve_account_id<A: ZoneApi>(api: &A) -> Result<String> {
    let identity = api.whoami().await.map_err(|e| ProviderError::InitializationFailed {
        provider: PROVIDER_NAME.to_string(),
        detail: format!("Failed to resolve account: {e}"),
    })?;

    match identity.account {
        Some(account) => {
            log::debug!("[{PROVIDER_NAME}] Resolved account {} via whoami", account.id);
            Ok(account.id.to_string())
        }
        None => Err(ProviderError::InitializationFailed {
            provider: PROVIDER_NAME.to_string(),
            detail: "Token is not bound to an account; set account_id explicitly".to_string(),
        }),
    }
}

fn into_initialization_error(err: ProviderError) -> ProviderError {
    match err {
        ProviderError::InitializationFailed { .. } => err,
        other => ProviderError::InitializationFailed {
            provider: other.provider().to_string(),
            detail: other.to_string(),
        },
    }
}
