//! Record reconciliation against a DNSimple zone.
//!
//! [`DnsimpleProvider`] implements the four record capabilities on top of a
//! [`ZoneApi`]. Per-record calls of a batch run concurrently (bounded by
//! `max_concurrency`) and each record ends up in exactly one of
//! `succeeded`/`failures`.

use std::collections::HashSet;
use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use futures::stream::{self, StreamExt};

use crate::binding::{BindingState, BoundClient, ClientBinding};
use crate::config::ProviderConfig;
use crate::error::{ProviderError, Result};
use crate::providers::common::{
    from_wire_name, normalize_domain_name, normalize_record_type, to_wire_name,
};
use crate::providers::dnsimple::{
    DeleteStatus, DnsimpleClient, DnsimpleErrors, PROVIDER_NAME, ZoneRecord, ZoneRecordAttributes,
};
use crate::traits::{
    ErrorContext, ProviderErrorMapper, RawApiError, RecordAppender, RecordDeleter, RecordGetter,
    RecordSetter, ZoneApi,
};
use crate::types::{AmbiguityPolicy, BatchOutcome, MatchKey, ReconcileOptions, Record};

/// Remote records keyed by numeric id, fetched once per batch for id resolution.
type Listing = Result<Vec<(i64, Record)>>;

/// DNSimple record provider.
///
/// Cheap to construct: nothing happens on the network until the first
/// operation, which builds the client and resolves the account once.
pub struct DnsimpleProvider<A = DnsimpleClient> {
    binding: ClientBinding<A>,
    options: ReconcileOptions,
}

impl DnsimpleProvider {
    pub fn new(config: ProviderConfig) -> Self {
        Self::with_connector(config, DnsimpleClient::new)
    }

    /// Provider configured from `DNSIMPLE_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Ok(Self::new(ProviderConfig::from_env()?))
    }
}

impl<A: ZoneApi> DnsimpleProvider<A> {
    /// Provider whose API client is built by `connector` on first use.
    pub fn with_connector<F>(config: ProviderConfig, connector: F) -> Self
    where
        F: Fn(&ProviderConfig) -> Result<A> + Send + Sync + 'static,
    {
        let options = config.reconcile;
        Self {
            binding: ClientBinding::new(config, Box::new(connector)),
            options,
        }
    }

    /// Provider over an existing API client.
    pub fn with_api(config: ProviderConfig, api: A) -> Self
    where
        A: Clone + 'static,
    {
        Self::with_connector(config, move |_| Ok(api.clone()))
    }

    #[must_use]
    pub fn with_options(mut self, options: ReconcileOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> ReconcileOptions {
        self.options
    }

    pub fn state(&self) -> BindingState {
        self.binding.state()
    }

    /// Initialize the client binding now instead of on first use.
    pub async fn ensure_ready(&self) -> Result<()> {
        self.binding.ensure_ready().await.map(|_| ())
    }

    fn max_concurrency(&self) -> usize {
        self.binding.config().max_concurrency.max(1)
    }

    /// Drive the per-record futures, at most `max_concurrency` at a time, keeping input order.
    async fn run_bounded<Fut>(&self, pending: Vec<Fut>) -> Vec<Result<Record>>
    where
        Fut: Future<Output = Result<Record>>,
    {
        stream::iter(pending)
            .buffered(self.max_concurrency())
            .collect()
            .await
    }
}

#[async_trait]
impl<A: ZoneApi> RecordGetter for DnsimpleProvider<A> {
    async fn get_records(&self, zone: &str) -> Result<Vec<Record>> {
        let bound = self.binding.ensure_ready().await?;
        let zone = zone_name(zone)?;
        let remote = bound.api().list_records(bound.account_id(), &zone).await?;
        Ok(remote.iter().map(to_record).collect())
    }
}

#[async_trait]
impl<A: ZoneApi> RecordAppender for DnsimpleProvider<A> {
    async fn append_records(&self, zone: &str, records: &[Record]) -> Result<BatchOutcome> {
        let bound = self.binding.ensure_ready().await?;
        let zone = zone_name(zone)?;
        let pending: Vec<_> = records
            .iter()
            .map(|record| append_one(bound, &zone, record))
            .collect();
        let results = self.run_bounded(pending).await;
        Ok(finish("append", &zone, records, results))
    }
}

#[async_trait]
impl<A: ZoneApi> RecordSetter for DnsimpleProvider<A> {
    async fn set_records(&self, zone: &str, records: &[Record]) -> Result<BatchOutcome> {
        let bound = self.binding.ensure_ready().await?;
        let zone = zone_name(zone)?;
        let listing = fetch_listing(bound, &zone, records).await;
        let (key, ambiguity) = (self.options.set_match, self.options.ambiguity);

        let plans: Vec<Result<SetPlan>> = records
            .iter()
            .map(|record| plan_set(record, &listing, &zone, key, ambiguity))
            .collect();
        let plans = claim_targets(records, plans, |plan| plan.target);

        let pending: Vec<_> = plans
            .into_iter()
            .map(|plan| set_one(bound, &zone, plan))
            .collect();
        let results = self.run_bounded(pending).await;
        Ok(finish("set", &zone, records, results))
    }
}

#[async_trait]
impl<A: ZoneApi> RecordDeleter for DnsimpleProvider<A> {
    async fn delete_records(&self, zone: &str, records: &[Record]) -> Result<BatchOutcome> {
        let bound = self.binding.ensure_ready().await?;
        let zone = zone_name(zone)?;
        let listing = fetch_listing(bound, &zone, records).await;
        let (key, ambiguity) = (self.options.delete_match, self.options.ambiguity);

        let targets: Vec<Result<i64>> = records
            .iter()
            .map(|record| delete_target(record, &listing, &zone, key, ambiguity))
            .collect();
        let targets = claim_targets(records, targets, |id| Some(*id));

        let pending: Vec<_> = records
            .iter()
            .zip(targets)
            .map(|(record, target)| delete_one(bound, &zone, record, target))
            .collect();
        let results = self.run_bounded(pending).await;
        Ok(finish("delete", &zone, records, results))
    }
}

// ============ 单条记录操作 ============

/// A Set record with its target decided: update `target`, or create when `None`.
struct SetPlan {
    target: Option<i64>,
    attrs: ZoneRecordAttributes,
}

async fn append_one<A: ZoneApi>(
    bound: &BoundClient<A>,
    zone: &str,
    record: &Record,
) -> Result<Record> {
    if record.has_id() {
        return Err(invalid_parameter(
            "id",
            format!(
                "record already has id '{}'; use set_records to update it",
                record.id
            ),
        ));
    }
    let attrs = to_attributes(record, zone)?;
    let created = bound
        .api()
        .create_record(bound.account_id(), zone, &attrs)
        .await?;
    Ok(to_record(&created))
}

fn plan_set(
    record: &Record,
    listing: &Listing,
    zone: &str,
    key: MatchKey,
    ambiguity: AmbiguityPolicy,
) -> Result<SetPlan> {
    let target = if record.has_id() {
        Some(parse_record_id(&record.id)?)
    } else {
        let remote = listing.as_ref().map_err(Clone::clone)?;
        resolve(record, remote, zone, key, ambiguity)?
    };
    let attrs = to_attributes(record, zone)?;
    Ok(SetPlan { target, attrs })
}

async fn set_one<A: ZoneApi>(
    bound: &BoundClient<A>,
    zone: &str,
    plan: Result<SetPlan>,
) -> Result<Record> {
    let SetPlan { target, attrs } = plan?;
    let saved = match target {
        Some(id) => {
            bound
                .api()
                .update_record(bound.account_id(), zone, id, &attrs)
                .await?
        }
        None => {
            bound
                .api()
                .create_record(bound.account_id(), zone, &attrs)
                .await?
        }
    };
    Ok(to_record(&saved))
}

fn delete_target(
    record: &Record,
    listing: &Listing,
    zone: &str,
    key: MatchKey,
    ambiguity: AmbiguityPolicy,
) -> Result<i64> {
    if record.has_id() {
        return parse_record_id(&record.id);
    }
    let remote = listing.as_ref().map_err(Clone::clone)?;
    resolve(record, remote, zone, key, ambiguity)?.ok_or_else(|| ProviderError::RecordUnresolved {
        provider: PROVIDER_NAME.to_string(),
        record_name: record.name.clone(),
    })
}

async fn delete_one<A: ZoneApi>(
    bound: &BoundClient<A>,
    zone: &str,
    record: &Record,
    target: Result<i64>,
) -> Result<Record> {
    let id = target?;
    let status = bound
        .api()
        .delete_record(bound.account_id(), zone, id)
        .await?;
    if status.is_success() {
        Ok(record.clone().with_id(id.to_string()))
    } else {
        Err(delete_status_error(status, zone, id))
    }
}

// ============ 辅助函数 ============

/// 同一批次内每个远端 id 只能被一条记录占用，后到的记录判为冲突。
fn claim_targets<T>(
    records: &[Record],
    targets: Vec<Result<T>>,
    target_id: impl Fn(&T) -> Option<i64>,
) -> Vec<Result<T>> {
    let mut claimed = HashSet::new();
    records
        .iter()
        .zip(targets)
        .map(|(record, target)| match target {
            Ok(t) => match target_id(&t) {
                Some(id) if !claimed.insert(id) => Err(ProviderError::DuplicateTarget {
                    provider: PROVIDER_NAME.to_string(),
                    record_name: record.name.clone(),
                    record_id: id.to_string(),
                }),
                _ => Ok(t),
            },
            Err(e) => Err(e),
        })
        .collect()
}

/// Fetch the remote records once if any input record lacks an id.
async fn fetch_listing<A: ZoneApi>(bound: &BoundClient<A>, zone: &str, records: &[Record]) -> Listing {
    if records.iter().all(Record::has_id) {
        return Ok(Vec::new());
    }
    let remote = bound
        .api()
        .list_records(bound.account_id(), zone)
        .await
        .inspect_err(|e| {
            log::warn!("[{PROVIDER_NAME}] Cannot list {zone} to resolve record ids: {e}");
        })?;
    Ok(remote.iter().map(|r| (r.id, to_record(r))).collect())
}

/// Pick the remote record an id-less record refers to.
///
/// `Ok(None)` means nothing matched.
fn resolve(
    wanted: &Record,
    remote: &[(i64, Record)],
    zone: &str,
    key: MatchKey,
    ambiguity: AmbiguityPolicy,
) -> Result<Option<i64>> {
    let candidates: Vec<i64> = remote
        .iter()
        .filter(|(_, candidate)| key.matches(wanted, candidate, zone))
        .map(|(id, _)| *id)
        .collect();

    match (candidates.len(), ambiguity) {
        (0 | 1, _) | (_, AmbiguityPolicy::FirstMatch) => Ok(candidates.into_iter().min()),
        (n, AmbiguityPolicy::Reject) => Err(ProviderError::AmbiguousRecord {
            provider: PROVIDER_NAME.to_string(),
            record_name: wanted.name.clone(),
            candidates: n,
        }),
    }
}

fn delete_status_error(status: DeleteStatus, zone: &str, record_id: i64) -> ProviderError {
    let message = status
        .message
        .unwrap_or_else(|| format!("HTTP {}", status.status));
    let raw = RawApiError::with_code(status.status.to_string(), message).with_field(status.field);
    DnsimpleErrors.map_error(
        raw,
        ErrorContext {
            record_id: Some(record_id.to_string()),
            domain: Some(zone.to_string()),
        },
    )
}

fn parse_record_id(id: &str) -> Result<i64> {
    id.trim()
        .parse::<i64>()
        .ok()
        .filter(|id| *id > 0)
        .ok_or_else(|| ProviderError::InvalidRecordId {
            provider: PROVIDER_NAME.to_string(),
            record_id: id.to_string(),
        })
}

fn zone_name(zone: &str) -> Result<String> {
    let zone = normalize_domain_name(zone);
    if zone.is_empty() {
        return Err(invalid_parameter("zone", "zone must not be empty"));
    }
    Ok(zone)
}

fn invalid_parameter(param: &str, detail: impl Into<String>) -> ProviderError {
    ProviderError::InvalidParameter {
        provider: PROVIDER_NAME.to_string(),
        param: param.to_string(),
        detail: detail.into(),
    }
}

fn to_record(remote: &ZoneRecord) -> Record {
    Record {
        id: remote.id.to_string(),
        record_type: remote.record_type.clone(),
        name: from_wire_name(&remote.name),
        value: remote.content.clone(),
        ttl: Duration::from_secs(u64::from(remote.ttl)),
        priority: remote.priority.unwrap_or(0),
    }
}

fn to_attributes(record: &Record, zone: &str) -> Result<ZoneRecordAttributes> {
    if record.record_type.trim().is_empty() {
        return Err(invalid_parameter("type", "record type must not be empty"));
    }
    let ttl = u32::try_from(record.ttl.as_secs())
        .map_err(|_| invalid_parameter("ttl", format!("TTL {:?} is too large", record.ttl)))?;

    Ok(ZoneRecordAttributes {
        name: to_wire_name(&record.name, zone),
        record_type: normalize_record_type(&record.record_type),
        content: record.value.clone(),
        ttl: (ttl > 0).then_some(ttl),
        priority: (record.priority > 0).then_some(record.priority),
    })
}

/// Assemble the outcome and log every failure.
fn finish(
    operation: &str,
    zone: &str,
    records: &[Record],
    results: Vec<Result<Record>>,
) -> BatchOutcome {
    let outcome = BatchOutcome::from_results(records, results);
    for failure in &outcome.failures {
        let record = &failure.record;
        if failure.error.is_expected() {
            log::warn!(
                "[{PROVIDER_NAME}] {operation} {} {} in {zone} failed: {}",
                record.record_type,
                record.name,
                failure.error
            );
        } else {
            log::error!(
                "[{PROVIDER_NAME}] {operation} {} {} in {zone} failed: {}",
                record.record_type,
                record.name,
                failure.error
            );
        }
    }
    log::info!(
        "[{PROVIDER_NAME}] {operation} in {zone}: {}/{} record(s) succeeded",
        outcome.succeeded.len(),
        outcome.total()
    );
    outcome
}
