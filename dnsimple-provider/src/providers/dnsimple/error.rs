//! DNSimple error mapping

use crate::error::ProviderError;
use crate::traits::{ErrorContext, ProviderErrorMapper, RawApiError};

use super::PROVIDER_NAME;
use super::types::DnsimpleErrorBody;

/// DNSimple 错误映射
///
/// DNSimple 没有业务错误码，错误由 HTTP 状态码区分。
/// Reference: <https://developer.dnsimple.com/v2/#response-codes>
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct DnsimpleErrors;

impl ProviderErrorMapper for DnsimpleErrors {
    fn provider_name(&self) -> &'static str {
        PROVIDER_NAME
    }

    fn map_error(&self, raw: RawApiError, context: ErrorContext) -> ProviderError {
        match raw.code.as_deref() {
            // 400: Bad Request
            // 422: Unprocessable Entity (validation failed)
            Some("400" | "422") => ProviderError::InvalidParameter {
                provider: self.provider_name().to_string(),
                param: raw
                    .field
                    .as_deref()
                    .map_or_else(|| "general".to_string(), field_to_param),
                detail: raw.message,
            },

            Some("401") => ProviderError::InvalidCredentials {
                provider: self.provider_name().to_string(),
                raw_message: Some(raw.message),
            },

            // 402: Payment Required（套餐不支持 / 超出配额）
            Some("402") => ProviderError::QuotaExceeded {
                provider: self.provider_name().to_string(),
                raw_message: Some(raw.message),
            },

            Some("403") => ProviderError::PermissionDenied {
                provider: self.provider_name().to_string(),
                raw_message: Some(raw.message),
            },

            // 404 on a record path is a missing record, otherwise the zone or account
            Some("404") => match context.record_id {
                Some(record_id) => ProviderError::RecordNotFound {
                    provider: self.provider_name().to_string(),
                    record_id,
                    raw_message: Some(raw.message),
                },
                None => ProviderError::DomainNotFound {
                    provider: self.provider_name().to_string(),
                    domain: context.domain.unwrap_or_else(|| "<unknown>".to_string()),
                    raw_message: Some(raw.message),
                },
            },

            Some("429") => ProviderError::RateLimited {
                provider: self.provider_name().to_string(),
                retry_after: None,
                raw_message: Some(raw.message),
            },

            _ => self.unknown_error(raw),
        }
    }
}

/// 从错误响应体中提取消息与字段
pub(crate) fn raw_error_from_body(status: u16, body: &str) -> RawApiError {
    let parsed: DnsimpleErrorBody = serde_json::from_str(body).unwrap_or_default();
    let field = parsed
        .errors
        .as_ref()
        .and_then(|errors| errors.keys().next().cloned());
    let message = match parsed.message {
        Some(message) if !message.is_empty() => message,
        _ if body.trim().is_empty() => format!("HTTP {status}"),
        _ => body.trim().to_string(),
    };
    RawApiError::with_code(status.to_string(), message).with_field(field)
}

/// DNSimple 字段名 -> 记录字段名
fn field_to_param(field: &str) -> String {
    match field {
        "content" => "value".to_string(),
        other => other.to_string(),
    }
}
