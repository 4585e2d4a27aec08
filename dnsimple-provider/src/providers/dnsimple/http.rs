//! DNSimple HTTP 请求方法

use async_trait::async_trait;
use reqwest::RequestBuilder;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::Result;
use crate::http_client::HttpUtils;
use crate::traits::{ErrorContext, ProviderErrorMapper, ZoneApi};

use super::types::{DnsimpleResponse, Pagination};
use super::{
    DeleteStatus, DnsimpleClient, DnsimpleErrors, Identity, MAX_PAGE_SIZE_RECORDS, PROVIDER_NAME,
    ZoneRecord, ZoneRecordAttributes, raw_error_from_body,
};

/// `/v2/{account}/zones/{zone}/records`
fn records_path(account_id: &str, zone: &str) -> String {
    format!(
        "/v2/{}/zones/{}/records",
        urlencoding::encode(account_id),
        urlencoding::encode(zone)
    )
}

fn record_path(account_id: &str, zone: &str, record_id: i64) -> String {
    format!("{}/{record_id}", records_path(account_id, zone))
}

fn zone_context(zone: &str) -> ErrorContext {
    ErrorContext {
        domain: Some(zone.to_string()),
        ..ErrorContext::default()
    }
}

fn record_context(zone: &str, record_id: i64) -> ErrorContext {
    ErrorContext {
        record_id: Some(record_id.to_string()),
        domain: Some(zone.to_string()),
    }
}

impl DnsimpleClient {
    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .bearer_auth(&self.api_token)
            .header("Accept", "application/json")
    }

    /// 非 2xx 状态码映射为统一错误
    fn check_status(status: u16, body: &str, context: ErrorContext) -> Result<()> {
        if (200..300).contains(&status) {
            return Ok(());
        }
        let raw = raw_error_from_body(status, body);
        log::debug!("[{PROVIDER_NAME}] API error HTTP {status}: {}", raw.message);
        Err(DnsimpleErrors.map_error(raw, context))
    }

    fn unwrap_data<T>(response: DnsimpleResponse<T>) -> Result<T> {
        response
            .data
            .ok_or_else(|| DnsimpleErrors.parse_error("响应中缺少 data 字段"))
    }

    /// 执行 GET 请求
    pub(crate) async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        context: ErrorContext,
    ) -> Result<DnsimpleResponse<T>> {
        let url = self.url(path);
        let request = self.authorized(self.client.get(&url));
        let (status, body) = HttpUtils::execute_request_with_retry(
            request,
            PROVIDER_NAME,
            "GET",
            &url,
            self.max_retries,
        )
        .await?;
        Self::check_status(status, &body, context)?;
        HttpUtils::parse_json(&body, PROVIDER_NAME)
    }

    /// 执行 POST 请求（非幂等，不重试）
    pub(crate) async fn post<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
        context: ErrorContext,
    ) -> Result<T> {
        let url = self.url(path);
        let request = self.authorized(self.client.post(&url)).json(body);
        let (status, text) =
            HttpUtils::execute_request_with_retry(request, PROVIDER_NAME, "POST", &url, 0).await?;
        Self::check_status(status, &text, context)?;
        let response: DnsimpleResponse<T> = HttpUtils::parse_json(&text, PROVIDER_NAME)?;
        Self::unwrap_data(response)
    }

    /// 执行 PATCH 请求
    pub(crate) async fn patch<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
        context: ErrorContext,
    ) -> Result<T> {
        let url = self.url(path);
        let request = self.authorized(self.client.patch(&url)).json(body);
        let (status, text) = HttpUtils::execute_request_with_retry(
            request,
            PROVIDER_NAME,
            "PATCH",
            &url,
            self.max_retries,
        )
        .await?;
        Self::check_status(status, &text, context)?;
        let response: DnsimpleResponse<T> = HttpUtils::parse_json(&text, PROVIDER_NAME)?;
        Self::unwrap_data(response)
    }

    /// 执行 DELETE 请求，返回原始状态
    ///
    /// A 404 that only comes back after a retry means an earlier attempt
    /// already removed the record; it is reported as deleted.
    pub(crate) async fn delete(&self, path: &str) -> Result<DeleteStatus> {
        let url = self.url(path);
        let request = self.authorized(self.client.delete(&url));
        let (status, text, attempts) = HttpUtils::execute_request_counting_attempts(
            request,
            PROVIDER_NAME,
            "DELETE",
            &url,
            self.max_retries,
        )
        .await?;
        if (200..300).contains(&status) {
            return Ok(DeleteStatus::new(status));
        }
        if status == 404 && attempts > 1 {
            log::info!(
                "[{PROVIDER_NAME}] DELETE {url} returned 404 on attempt {attempts}, record already gone"
            );
            return Ok(DeleteStatus::new(204));
        }
        let raw = raw_error_from_body(status, &text);
        Ok(DeleteStatus {
            status,
            message: Some(raw.message),
            field: raw.field,
        })
    }
}

#[async_trait]
impl ZoneApi for DnsimpleClient {
    async fn whoami(&self) -> Result<Identity> {
        let response = self.get("/v2/whoami", ErrorContext::default()).await?;
        Self::unwrap_data(response)
    }

    async fn list_records(&self, account_id: &str, zone: &str) -> Result<Vec<ZoneRecord>> {
        let path = records_path(account_id, zone);
        let mut records = Vec::new();
        let mut page = 1_u32;

        loop {
            let response: DnsimpleResponse<Vec<ZoneRecord>> = self
                .get(
                    &format!("{path}?page={page}&per_page={MAX_PAGE_SIZE_RECORDS}"),
                    zone_context(zone),
                )
                .await?;
            let pagination = response.pagination;
            let batch = Self::unwrap_data(response)?;
            let fetched = batch.len();
            records.extend(batch);

            match pagination {
                Some(Pagination {
                    current_page,
                    total_pages,
                    ..
                }) if current_page < total_pages && fetched > 0 => page = current_page + 1,
                _ => break,
            }
        }

        log::debug!(
            "[{PROVIDER_NAME}] Listed {} records of {zone} ({page} page(s))",
            records.len()
        );
        Ok(records)
    }

    async fn create_record(
        &self,
        account_id: &str,
        zone: &str,
        attrs: &ZoneRecordAttributes,
    ) -> Result<ZoneRecord> {
        self.post(&records_path(account_id, zone), attrs, zone_context(zone))
            .await
    }

    async fn update_record(
        &self,
        account_id: &str,
        zone: &str,
        record_id: i64,
        attrs: &ZoneRecordAttributes,
    ) -> Result<ZoneRecord> {
        self.patch(
            &record_path(account_id, zone, record_id),
            attrs,
            record_context(zone, record_id),
        )
        .await
    }

    async fn delete_record(
        &self,
        account_id: &str,
        zone: &str,
        record_id: i64,
    ) -> Result<DeleteStatus> {
        self.delete(&record_path(account_id, zone, record_id)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_are_encoded() {
        assert_eq!(
            records_path("1010", "example.com"),
            "/v2/1010/zones/example.com/records"
        );
        assert_eq!(
            record_path("1010", "b\u{fc}cher.de", 5),
            "/v2/1010/zones/b%C3%BCcher.de/records/5"
        );
    }

    #[test]
    fn record_context_carries_id() {
        let ctx = record_context("example.com", 7);
        assert_eq!(ctx.record_id.as_deref(), Some("7"));
        assert_eq!(ctx.domain.as_deref(), Some("example.com"));
    }
}
