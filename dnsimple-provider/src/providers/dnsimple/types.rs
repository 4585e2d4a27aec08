//! DNSimple API v2 类型定义

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// DNSimple API 通用响应（`data` + 可选分页信息）
#[derive(Debug, Deserialize)]
pub(crate) struct DnsimpleResponse<T> {
    pub data: Option<T>,
    pub pagination: Option<Pagination>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub(crate) struct Pagination {
    pub current_page: u32,
    pub total_pages: u32,
}

/// DNSimple 错误响应体
///
/// `{"message": "Validation failed", "errors": {"content": ["can't be blank"]}}`
#[derive(Debug, Default, Deserialize)]
pub(crate) struct DnsimpleErrorBody {
    pub message: Option<String>,
    pub errors: Option<Map<String, Value>>,
}

/// A zone record as returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ZoneRecord {
    pub id: i64,
    #[serde(default)]
    pub zone_id: String,
    #[serde(default)]
    pub parent_id: Option<i64>,
    /// Relative name; empty for the apex.
    pub name: String,
    pub content: String,
    pub ttl: u32,
    #[serde(default)]
    pub priority: Option<u32>,
    #[serde(rename = "type")]
    pub record_type: String,
    #[serde(default)]
    pub regions: Vec<String>,
    /// SOA/NS records managed by DNSimple itself.
    #[serde(default)]
    pub system_record: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

/// Request body for record creation and update.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ZoneRecordAttributes {
    pub name: String,
    #[serde(rename = "type")]
    pub record_type: String,
    pub content: String,
    /// Omitted to keep the API default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ttl: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<u32>,
}

/// `GET /v2/whoami` payload.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Identity {
    /// Present for account tokens.
    #[serde(default)]
    pub account: Option<WhoamiAccount>,
    /// Present for user tokens.
    #[serde(default)]
    pub user: Option<WhoamiUser>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct WhoamiAccount {
    pub id: i64,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub plan_identifier: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct WhoamiUser {
    pub id: i64,
    #[serde(default)]
    pub email: Option<String>,
}

/// Raw outcome of a delete request.
///
/// The API answers 204 on success. Anything else is left to the caller to
/// classify, together with the error message of the body if there was one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteStatus {
    pub status: u16,
    pub message: Option<String>,
    /// First offending field reported by the API.
    pub field: Option<String>,
}

impl DeleteStatus {
    pub fn new(status: u16) -> Self {
        Self {
            status,
            message: None,
            field: None,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self.status, 200 | 204)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zone_record_from_api_payload() {
        let json = r#"{
            "id": 1,
            "zone_id": "example.com",
            "parent_id": null,
            "name": "",
            "content": "mxa.example.com",
            "ttl": 600,
            "priority": 10,
            "type": "MX",
            "regions": ["global"],
            "system_record": false,
            "created_at": "2016-10-05T09:51:35Z",
            "updated_at": "2016-10-05T09:51:35Z"
        }"#;
        let record: ZoneRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.id, 1);
        assert_eq!(record.name, "");
        assert_eq!(record.record_type, "MX");
        assert_eq!(record.priority, Some(10));
        assert_eq!(record.regions, vec!["global".to_string()]);
    }

    #[test]
    fn attributes_omit_unset_fields() {
        let attrs = ZoneRecordAttributes {
            name: "www".into(),
            record_type: "A".into(),
            content: "1.2.3.4".into(),
            ttl: None,
            priority: None,
        };
        let json = serde_json::to_value(&attrs).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"name": "www", "type": "A", "content": "1.2.3.4"})
        );
    }

    #[test]
    fn whoami_without_account() {
        let response: DnsimpleResponse<Identity> = serde_json::from_str(
            r#"{"data":{"user":{"id":12,"email":"me@example.com"},"account":null}}"#,
        )
        .unwrap();
        let identity = response.data.unwrap();
        assert!(identity.account.is_none());
        assert_eq!(identity.user.map(|u| u.id), Some(12));
    }

    #[test]
    fn error_body_with_field_errors() {
        let body: DnsimpleErrorBody = serde_json::from_str(
            r#"{"message":"Validation failed","errors":{"content":["can't be blank"]}}"#,
        )
        .unwrap();
        assert_eq!(body.message.as_deref(), Some("Validation failed"));
        assert!(body.errors.unwrap().contains_key("content"));
    }

    #[test]
    fn delete_status_success_codes() {
        assert!(DeleteStatus::new(204).is_success());
        assert!(DeleteStatus::new(200).is_success());
        assert!(!DeleteStatus::new(404).is_success());
    }
}
