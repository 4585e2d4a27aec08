//! 测试辅助模块
//!
//! 内存中的 [`ZoneApi`] 实现，记录每个方法的调用次数。

use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::{ProviderError, Result};
use crate::providers::dnsimple::{
    DeleteStatus, Identity, PROVIDER_NAME, WhoamiAccount, ZoneRecord, ZoneRecordAttributes,
};
use crate::traits::ZoneApi;

const DEFAULT_TTL: u32 = 3600;

#[derive(Default)]
struct CallCounters {
    whoami: AtomicUsize,
    list: AtomicUsize,
    create: AtomicUsize,
    update: AtomicUsize,
    delete: AtomicUsize,
}

/// 统计同时进行中的写操作
struct InFlight<'a> {
    current: &'a AtomicUsize,
}

impl<'a> InFlight<'a> {
    fn enter(current: &'a AtomicUsize, peak: &AtomicUsize) -> Self {
        let now = current.fetch_add(1, Ordering::SeqCst) + 1;
        peak.fetch_max(now, Ordering::SeqCst);
        Self { current }
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.current.fetch_sub(1, Ordering::SeqCst);
    }
}

// ===== MockZoneApi =====

pub struct MockZoneApi {
    account: Option<i64>,
    whoami_error: Option<ProviderError>,
    whoami_delay: Duration,
    write_delay: Duration,
    zones: RwLock<HashMap<String, Vec<ZoneRecord>>>,
    next_id: AtomicI64,
    /// 如果 Some，list 时返回此错误
    list_error: RwLock<Option<ProviderError>>,
    /// content -> 创建时返回的错误
    create_errors: RwLock<HashMap<String, ProviderError>>,
    /// record id -> 删除时返回的状态码
    delete_statuses: RwLock<HashMap<i64, u16>>,
    calls: CallCounters,
    in_flight: AtomicUsize,
    peak_in_flight: AtomicUsize,
}

impl MockZoneApi {
    pub fn new() -> Self {
        Self {
            account: None,
            whoami_error: None,
            whoami_delay: Duration::ZERO,
            write_delay: Duration::ZERO,
            zones: RwLock::new(HashMap::new()),
            next_id: AtomicI64::new(1000),
            list_error: RwLock::new(None),
            create_errors: RwLock::new(HashMap::new()),
            delete_statuses: RwLock::new(HashMap::new()),
            calls: CallCounters::default(),
            in_flight: AtomicUsize::new(0),
            peak_in_flight: AtomicUsize::new(0),
        }
    }

    pub fn with_account(mut self, account_id: i64) -> Self {
        self.account = Some(account_id);
        self
    }

    pub fn with_whoami_error(mut self, err: ProviderError) -> Self {
        self.whoami_error = Some(err);
        self
    }

    pub fn with_whoami_delay(mut self, delay: Duration) -> Self {
        self.whoami_delay = delay;
        self
    }

    pub fn with_write_delay(mut self, delay: Duration) -> Self {
        self.write_delay = delay;
        self
    }

    pub fn with_zone(mut self, zone: &str) -> Self {
        self.zones.get_mut().entry(zone.to_string()).or_default();
        self
    }

    /// 预置一条记录，返回其 id
    pub async fn insert(&self, zone: &str, record_type: &str, name: &str, content: &str) -> i64 {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        self.zones
            .write()
            .await
            .entry(zone.to_string())
            .or_default()
            .push(ZoneRecord {
                id,
                zone_id: zone.to_string(),
                name: name.to_string(),
                content: content.to_string(),
                ttl: DEFAULT_TTL,
                record_type: record_type.to_string(),
                ..ZoneRecord::default()
            });
        id
    }

    pub async fn records(&self, zone: &str) -> Vec<ZoneRecord> {
        self.zones
            .read()
            .await
            .get(zone)
            .cloned()
            .unwrap_or_default()
    }

    pub async fn set_list_error(&self, err: Option<ProviderError>) {
        *self.list_error.write().await = err;
    }

    pub async fn fail_create(&self, content: &str, err: ProviderError) {
        self.create_errors
            .write()
            .await
            .insert(content.to_string(), err);
    }

    pub async fn set_delete_status(&self, record_id: i64, status: u16) {
        self.delete_statuses.write().await.insert(record_id, status);
    }

    pub fn whoami_calls(&self) -> usize {
        self.calls.whoami.load(Ordering::SeqCst)
    }

    pub fn list_calls(&self) -> usize {
        self.calls.list.load(Ordering::SeqCst)
    }

    pub fn create_calls(&self) -> usize {
        self.calls.create.load(Ordering::SeqCst)
    }

    pub fn update_calls(&self) -> usize {
        self.calls.update.load(Ordering::SeqCst)
    }

    pub fn delete_calls(&self) -> usize {
        self.calls.delete.load(Ordering::SeqCst)
    }

    /// 写操作的最大并发数
    pub fn peak_in_flight(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }

    async fn simulate_write(&self) -> InFlight<'_> {
        let guard = InFlight::enter(&self.in_flight, &self.peak_in_flight);
        if !self.write_delay.is_zero() {
            tokio::time::sleep(self.write_delay).await;
        }
        guard
    }

    fn zone_missing(zone: &str) -> ProviderError {
        ProviderError::DomainNotFound {
            provider: PROVIDER_NAME.to_string(),
            domain: zone.to_string(),
            raw_message: Some(format!("Zone `{zone}` not found")),
        }
    }
}

fn apply(record: &mut ZoneRecord, attrs: &ZoneRecordAttributes) {
    record.name.clone_from(&attrs.name);
    record.record_type.clone_from(&attrs.record_type);
    record.content.clone_from(&attrs.content);
    record.ttl = attrs.ttl.unwrap_or(DEFAULT_TTL);
    record.priority = attrs.priority;
}

#[async_trait]
impl ZoneApi for MockZoneApi {
    async fn whoami(&self) -> Result<Identity> {
        self.calls.whoami.fetch_add(1, Ordering::SeqCst);
        if !self.whoami_delay.is_zero() {
            tokio::time::sleep(self.whoami_delay).await;
        }
        if let Some(err) = &self.whoami_error {
            return Err(err.clone());
        }
        Ok(Identity {
            account: self.account.map(|id| WhoamiAccount {
                id,
                ..WhoamiAccount::default()
            }),
            user: None,
        })
    }

    async fn list_records(&self, _account_id: &str, zone: &str) -> Result<Vec<ZoneRecord>> {
        self.calls.list.fetch_add(1, Ordering::SeqCst);
        if let Some(err) = self.list_error.read().await.clone() {
            return Err(err);
        }
        self.zones
            .read()
            .await
            .get(zone)
            .cloned()
            .ok_or_else(|| Self::zone_missing(zone))
    }

    async fn create_record(
        &self,
        _account_id: &str,
        zone: &str,
        attrs: &ZoneRecordAttributes,
    ) -> Result<ZoneRecord> {
        self.calls.create.fetch_add(1, Ordering::SeqCst);
        let _guard = self.simulate_write().await;
        if let Some(err) = self.create_errors.read().await.get(&attrs.content) {
            return Err(err.clone());
        }

        let mut zones = self.zones.write().await;
        let records = zones.get_mut(zone).ok_or_else(|| Self::zone_missing(zone))?;
        let mut record = ZoneRecord {
            id: self.next_id.fetch_add(1, Ordering::SeqCst),
            zone_id: zone.to_string(),
            ..ZoneRecord::default()
        };
        apply(&mut record, attrs);
        records.push(record.clone());
        Ok(record)
    }

    async fn update_record(
        &self,
        _account_id: &str,
        zone: &str,
        record_id: i64,
        attrs: &ZoneRecordAttributes,
    ) -> Result<ZoneRecord> {
        self.calls.update.fetch_add(1, Ordering::SeqCst);
        let _guard = self.simulate_write().await;

        let mut zones = self.zones.write().await;
        let records = zones.get_mut(zone).ok_or_else(|| Self::zone_missing(zone))?;
        let record = records
            .iter_mut()
            .find(|r| r.id == record_id)
            .ok_or_else(|| ProviderError::RecordNotFound {
                provider: PROVIDER_NAME.to_string(),
                record_id: record_id.to_string(),
                raw_message: Some("Record not found".to_string()),
            })?;
        apply(record, attrs);
        Ok(record.clone())
    }

    async fn delete_record(
        &self,
        _account_id: &str,
        zone: &str,
        record_id: i64,
    ) -> Result<DeleteStatus> {
        self.calls.delete.fetch_add(1, Ordering::SeqCst);
        let _guard = self.simulate_write().await;

        if let Some(status) = self.delete_statuses.read().await.get(&record_id) {
            return Ok(DeleteStatus {
                status: *status,
                message: Some(format!("HTTP {status}")),
                field: None,
            });
        }

        let mut zones = self.zones.write().await;
        let Some(records) = zones.get_mut(zone) else {
            return Ok(DeleteStatus {
                status: 404,
                message: Some(format!("Zone `{zone}` not found")),
                field: None,
            });
        };
        let before = records.len();
        records.retain(|r| r.id != record_id);
        if records.len() < before {
            Ok(DeleteStatus::new(204))
        } else {
            Ok(DeleteStatus {
                status: 404,
                message: Some("Record not found".to_string()),
                field: None,
            })
        }
    }
}
