//! DNSimple 沙箱集成测试
//!
//! 运行方式:
//! ```bash
//! DNSIMPLE_API_ACCESS_TOKEN=xxx TEST_DOMAIN=example.com \
//!     cargo test -p dnsimple-provider --test dnsimple_sandbox_test -- --ignored --nocapture --test-threads=1
//! ```
//!
//! 默认连接 `https://api.sandbox.dnsimple.com`，可通过 `DNSIMPLE_API_URL` 覆盖。

mod common;

use std::time::Duration;

use common::TestContext;
use dnsimple_provider::{BindingState, RecordAppender, RecordDeleter, RecordGetter, RecordSetter};

#[tokio::test]
#[ignore = "integration test: requires DNSIMPLE_API_ACCESS_TOKEN and TEST_DOMAIN"]
async fn test_dnsimple_resolves_account() {
    skip_if_no_credentials!("DNSIMPLE_API_ACCESS_TOKEN", "TEST_DOMAIN");

    let ctx = require_some!(TestContext::sandbox(), "创建测试上下文失败");
    require_ok!(ctx.provider.ensure_ready().await, "初始化失败");
    assert_eq!(ctx.provider.state(), BindingState::Ready);

    println!("✓ 账户解析测试通过");
}

#[tokio::test]
#[ignore = "integration test: requires DNSIMPLE_API_ACCESS_TOKEN and TEST_DOMAIN"]
async fn test_dnsimple_get_records() {
    skip_if_no_credentials!("DNSIMPLE_API_ACCESS_TOKEN", "TEST_DOMAIN");

    let ctx = require_some!(TestContext::sandbox(), "创建测试上下文失败");
    let records = require_ok!(
        ctx.provider.get_records(&ctx.domain).await,
        "get_records 调用失败"
    );
    assert!(
        records.iter().all(|r| r.id.parse::<i64>().is_ok()),
        "记录 id 应为数字"
    );

    println!("✓ get_records 测试通过，共 {} 条记录", records.len());
}

#[tokio::test]
#[ignore = "integration test: requires DNSIMPLE_API_ACCESS_TOKEN and TEST_DOMAIN"]
async fn test_dnsimple_record_lifecycle() {
    skip_if_no_credentials!("DNSIMPLE_API_ACCESS_TOKEN", "TEST_DOMAIN");

    let ctx = require_some!(TestContext::sandbox(), "创建测试上下文失败");
    let record = ctx
        .test_record("integration-test")
        .with_ttl(Duration::from_secs(60));

    // 1. 追加
    let appended = require_ok!(
        ctx.provider
            .append_records(&ctx.domain, std::slice::from_ref(&record))
            .await,
        "append_records 调用失败"
    );
    assert!(appended.is_complete(), "追加失败: {:?}", appended.failures);
    let created = appended.succeeded[0].clone();
    assert!(!created.id.is_empty(), "新记录应有 id");
    println!("✓ 追加记录: {} (id={})", created.name, created.id);

    // 2. 按名称 upsert（不带 id）
    let mut changed = record.clone();
    changed.value = "integration-test-updated".to_string();
    let set = require_ok!(
        ctx.provider
            .set_records(&ctx.domain, std::slice::from_ref(&changed))
            .await,
        "set_records 调用失败"
    );
    assert!(set.is_complete(), "更新失败: {:?}", set.failures);
    assert_eq!(set.succeeded[0].id, created.id, "应更新同一条记录");

    // 3. 确认远端状态
    let records = require_ok!(ctx.provider.get_records(&ctx.domain).await);
    let remote = require_some!(
        records.iter().find(|r| r.id == created.id),
        "找不到刚更新的记录"
    );
    assert_eq!(remote.value, "integration-test-updated");

    // 4. 按名称删除
    let deleted = require_ok!(
        ctx.provider
            .delete_records(&ctx.domain, std::slice::from_ref(&changed))
            .await,
        "delete_records 调用失败"
    );
    assert!(deleted.is_complete(), "删除失败: {:?}", deleted.failures);
    assert_eq!(deleted.succeeded[0].id, created.id);

    println!("✓ 记录生命周期测试通过");
}
