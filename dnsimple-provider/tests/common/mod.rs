//! 共享测试工具和辅助函数

#![allow(dead_code)]

use std::env;

use dnsimple_provider::{DnsimpleProvider, ProviderConfig, Record, SANDBOX_API_URL};
use serde_json::{Value, json};

/// 跳过测试的宏（当环境变量缺失时）
#[macro_export]
macro_rules! skip_if_no_credentials {
    ($($var:expr),+) => {
        $(
            if std::env::var($var).is_err() {
                eprintln!("跳过测试: 缺少环境变量 {}", $var);
                return;
            }
        )+
    };
}

/// 断言 `Option` 为 `Some`，并解包返回内部值（失败则直接让测试失败）。
#[macro_export]
macro_rules! require_some {
    ($expr:expr $(,)?) => {{
        let opt = $expr;
        assert!(opt.is_some(), "expected Some(..), got None");
        let Some(val) = opt else {
            return;
        };
        val
    }};
    ($expr:expr, $($msg:tt)+) => {{
        let opt = $expr;
        assert!(opt.is_some(), "{}", format_args!($($msg)+));
        let Some(val) = opt else {
            return;
        };
        val
    }};
}

/// 断言 `Result` 为 `Ok`，并解包返回内部值（失败则直接让测试失败）。
#[macro_export]
macro_rules! require_ok {
    ($expr:expr $(,)?) => {{
        let res = $expr;
        assert!(res.is_ok(), "expected Ok(..), got {res:?}");
        let Ok(val) = res else {
            return;
        };
        val
    }};
    ($expr:expr, $($msg:tt)+) => {{
        let res = $expr;
        assert!(
            res.is_ok(),
            "{}: {res:?}",
            format_args!($($msg)+)
        );
        let Ok(val) = res else {
            return;
        };
        val
    }};
}

pub const TEST_TOKEN: &str = "test-token";
pub const TEST_ACCOUNT: &str = "1010";
pub const TEST_ZONE: &str = "example.com";

/// 生成唯一的测试记录名称
pub fn generate_test_record_name() -> String {
    let uuid = uuid::Uuid::new_v4();
    format!("_test-{}", &uuid.to_string()[..8])
}

/// 指向 mock server 的配置（账户已知，不调用 whoami）
pub fn mock_config(base_url: &str) -> ProviderConfig {
    ProviderConfig::new(TEST_TOKEN)
        .with_api_url(base_url)
        .with_account_id(TEST_ACCOUNT)
}

/// `/v2/1010/zones/example.com/records`
pub fn records_path() -> String {
    format!("/v2/{TEST_ACCOUNT}/zones/{TEST_ZONE}/records")
}

/// API 返回的单条记录 JSON
pub fn record_json(id: i64, record_type: &str, name: &str, content: &str) -> Value {
    json!({
        "id": id,
        "zone_id": TEST_ZONE,
        "parent_id": null,
        "name": name,
        "content": content,
        "ttl": 3600,
        "priority": null,
        "type": record_type,
        "regions": ["global"],
        "system_record": false,
        "created_at": "2024-01-01T00:00:00Z",
        "updated_at": "2024-01-01T00:00:00Z"
    })
}

/// 单页记录列表响应
pub fn records_page(records: Vec<Value>, page: u32, total_pages: u32) -> Value {
    let total_entries = records.len();
    json!({
        "data": records,
        "pagination": {
            "current_page": page,
            "per_page": 100,
            "total_entries": total_entries,
            "total_pages": total_pages
        }
    })
}

/// 测试上下文 - 封装沙箱 Provider 和测试域名
pub struct TestContext {
    pub provider: DnsimpleProvider,
    pub domain: String,
}

impl TestContext {
    /// 创建 DNSimple 沙箱测试上下文
    pub fn sandbox() -> Option<Self> {
        let token = env::var("DNSIMPLE_API_ACCESS_TOKEN").ok()?;
        let domain = env::var("TEST_DOMAIN").ok()?;
        let api_url = env::var("DNSIMPLE_API_URL").unwrap_or_else(|_| SANDBOX_API_URL.to_string());

        let mut config = ProviderConfig::new(token).with_api_url(api_url);
        config.account_id = env::var("DNSIMPLE_ACCOUNT_ID").ok();

        Some(Self {
            provider: DnsimpleProvider::new(config),
            domain,
        })
    }

    /// 生成一条唯一的 TXT 测试记录
    pub fn test_record(&self, value: &str) -> Record {
        Record::new("TXT", generate_test_record_name(), value)
    }
}
