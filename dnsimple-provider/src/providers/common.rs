//! Provider 公共工具函数

use std::time::Duration;

use reqwest::Client;

use crate::error::{ProviderError, Result};

// ============ HTTP Client ============

/// 创建带超时配置的 HTTP Client
pub fn create_http_client(
    provider: &str,
    connect_timeout: Duration,
    request_timeout: Duration,
) -> Result<Client> {
    Client::builder()
        .connect_timeout(connect_timeout)
        .timeout(request_timeout)
        .user_agent(concat!("dnsimple-provider/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| ProviderError::InitializationFailed {
            provider: provider.to_string(),
            detail: format!("Failed to create HTTP client: {e}"),
        })
}

// ============ 记录类型 ============

/// 记录类型比较（不区分大小写）
pub fn record_types_equal(a: &str, b: &str) -> bool {
    a.trim().eq_ignore_ascii_case(b.trim())
}

/// 将记录类型规范为大写
pub fn normalize_record_type(record_type: &str) -> String {
    record_type.trim().to_ascii_uppercase()
}

// ============ 域名名称处理 ============

/// 去掉域名末尾的点
pub fn normalize_domain_name(name: &str) -> String {
    name.trim().trim_end_matches('.').to_string()
}

/// 将调用方给出的记录名转换为 API 使用的相对名称（根域为空字符串）
///
/// 如: "www" + "example.com" -> "www"
/// 如: "www.example.com." + "example.com." -> "www"
/// 如: "@" + "example.com" -> ""
pub fn to_wire_name(name: &str, zone: &str) -> String {
    let name = name.trim();
    if name == "@" || name.is_empty() {
        return String::new();
    }

    let zone = normalize_domain_name(zone);
    let absolute = name.ends_with('.');
    let full = normalize_domain_name(name);

    if full.eq_ignore_ascii_case(&zone) {
        return String::new();
    }

    let suffix_len = zone.len() + 1;
    if absolute
        && full.len() > suffix_len
        && full.is_char_boundary(full.len() - suffix_len)
        && full[full.len() - suffix_len..].eq_ignore_ascii_case(&format!(".{zone}"))
    {
        return full[..full.len() - suffix_len].to_string();
    }

    full
}

/// 将 API 返回的相对名称转换为调用方使用的名称（根域为 "@"）
pub fn from_wire_name(name: &str) -> String {
    if name.is_empty() {
        "@".to_string()
    } else {
        name.to_string()
    }
}

/// 名称比较用的规范形式（小写相对名称，根域为空字符串）
pub fn normalize_record_name(name: &str, zone: &str) -> String {
    to_wire_name(name, zone).to_ascii_lowercase()
}
