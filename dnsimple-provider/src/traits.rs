use std::sync::Arc;

use async_trait::async_trait;

use crate::error::{ProviderError, Result};
use crate::providers::dnsimple::{DeleteStatus, Identity, ZoneRecord, ZoneRecordAttributes};
use crate::types::{BatchOutcome, Record};

/// 原始 API 错误（内部使用）
#[derive(Debug, Clone)]
pub(crate) struct RawApiError {
    /// 错误码（HTTP 状态码）
    pub code: Option<String>,
    /// 原始错误消息
    pub message: String,
    /// 出错的字段（来自 `errors` 对象的第一个键）
    pub field: Option<String>,
}

impl RawApiError {
    pub fn with_code(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: Some(code.into()),
            message: message.into(),
            field: None,
        }
    }

    #[must_use]
    pub fn with_field(mut self, field: Option<String>) -> Self {
        self.field = field;
        self
    }
}

/// 错误上下文信息（内部使用）
/// 用于在映射错误时提供额外信息
#[derive(Debug, Clone, Default)]
pub(crate) struct ErrorContext {
    /// 记录 ID（用于 `RecordNotFound`）
    pub record_id: Option<String>,
    /// 域名（用于 `DomainNotFound`）
    pub domain: Option<String>,
}

/// Provider 错误映射 Trait（内部使用）
/// 将原始 API 错误映射到统一错误类型
pub(crate) trait ProviderErrorMapper {
    /// 返回 Provider 标识符
    fn provider_name(&self) -> &'static str;

    /// 将原始 API 错误映射到统一错误类型
    fn map_error(&self, raw: RawApiError, context: ErrorContext) -> ProviderError;

    /// 快捷方法：解析错误
    fn parse_error(&self, detail: impl ToString) -> ProviderError {
        ProviderError::ParseError {
            provider: self.provider_name().to_string(),
            detail: detail.to_string(),
        }
    }

    /// 快捷方法：未知错误（fallback）
    fn unknown_error(&self, raw: RawApiError) -> ProviderError {
        ProviderError::Unknown {
            provider: self.provider_name().to_string(),
            raw_code: raw.code,
            raw_message: raw.message,
        }
    }
}

/// The remote zone API the reconciler drives.
///
/// [`DnsimpleClient`](crate::DnsimpleClient) implements it over HTTP. Listing
/// must return the complete record set of the zone (pagination is the
/// implementation's job). Deleting reports the raw HTTP-style status so the
/// caller classifies it.
#[async_trait]
pub trait ZoneApi: Send + Sync {
    /// Identity of the access token.
    async fn whoami(&self) -> Result<Identity>;

    /// All records of `zone`.
    async fn list_records(&self, account_id: &str, zone: &str) -> Result<Vec<ZoneRecord>>;

    /// Create a record and return it with its assigned id.
    async fn create_record(
        &self,
        account_id: &str,
        zone: &str,
        attrs: &ZoneRecordAttributes,
    ) -> Result<ZoneRecord>;

    /// Overwrite the record `record_id`.
    async fn update_record(
        &self,
        account_id: &str,
        zone: &str,
        record_id: i64,
        attrs: &ZoneRecordAttributes,
    ) -> Result<ZoneRecord>;

    /// Delete the record `record_id`.
    ///
    /// Non-success statuses come back as `Ok`; `Err` is reserved for
    /// transport failures, throttling and server errors.
    async fn delete_record(
        &self,
        account_id: &str,
        zone: &str,
        record_id: i64,
    ) -> Result<DeleteStatus>;
}

#[async_trait]
impl<T: ZoneApi + ?Sized> ZoneApi for Arc<T> {
    async fn whoami(&self) -> Result<Identity> {
        (**self).whoami().await
    }

    async fn list_records(&self, account_id: &str, zone: &str) -> Result<Vec<ZoneRecord>> {
        (**self).list_records(account_id, zone).await
    }

    async fn create_record(
        &self,
        account_id: &str,
        zone: &str,
        attrs: &ZoneRecordAttributes,
    ) -> Result<ZoneRecord> {
        (**self).create_record(account_id, zone, attrs).await
    }

    async fn update_record(
        &self,
        account_id: &str,
        zone: &str,
        record_id: i64,
        attrs: &ZoneRecordAttributes,
    ) -> Result<ZoneRecord> {
        (**self).update_record(account_id, zone, record_id, attrs).await
    }

    async fn delete_record(
        &self,
        account_id: &str,
        zone: &str,
        record_id: i64,
    ) -> Result<DeleteStatus> {
        (**self).delete_record(account_id, zone, record_id).await
    }
}

/// Lists the records of a zone.
#[async_trait]
pub trait RecordGetter: Send + Sync {
    /// Every record of `zone`. Fails as a whole; never returns partial results.
    async fn get_records(&self, zone: &str) -> Result<Vec<Record>>;
}

/// Adds new records to a zone.
#[async_trait]
pub trait RecordAppender: Send + Sync {
    /// Create each record; the succeeded records carry their new ids.
    async fn append_records(&self, zone: &str, records: &[Record]) -> Result<BatchOutcome>;
}

/// Updates records in place, creating those that do not exist.
#[async_trait]
pub trait RecordSetter: Send + Sync {
    /// Upsert each record.
    ///
    /// A zero `ttl` or `priority` is left out of the request, so an update
    /// keeps the remote value instead of resetting it. Two records that
    /// resolve to the same remote record cannot both be applied; the later
    /// one fails with `DuplicateTarget`.
    async fn set_records(&self, zone: &str, records: &[Record]) -> Result<BatchOutcome>;
}

/// Removes records from a zone.
#[async_trait]
pub trait RecordDeleter: Send + Sync {
    /// Delete each record, resolving missing ids by name.
    ///
    /// Each remote record is deleted at most once per call; a later record
    /// resolving to the same id fails with `DuplicateTarget`.
    async fn delete_records(&self, zone: &str, records: &[Record]) -> Result<BatchOutcome>;
}
