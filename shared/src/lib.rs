use serde::{Deserialize, Serialize};

pub mod date;
pub mod protocol;

// =========================================================
// 常量定义 (Constants)
// =========================================================

pub const HEADER_AUTHORIZATION: &str = "Authorization";
pub const UPLOAD_FIELD_NAME: &str = "file";

// =========================================================
// 领域模型 (Domain Models)
// =========================================================

/// 已认证用户的资料
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub name: String,
}

impl User {
    /// 界面上显示的名称，没有名称时退回到邮箱
    pub fn display_name(&self) -> &str {
        if self.name.trim().is_empty() {
            &self.email
        } else {
            &self.name
        }
    }
}

/// 登录 / 注册成功后返回的凭据
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub user: User,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub name: String,
}

/// 数据集摘要（列表视图）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub id: String,
    pub name: String,
    pub rows: u64,
    #[serde(default)]
    pub columns: Vec<String>,
    pub upload_date: String,
    pub size_mb: f64,
}

/// 数据集详情，`summary` 是后端给出的统计项，值的结构不固定
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetDetail {
    pub id: String,
    pub name: String,
    pub rows: u64,
    #[serde(default)]
    pub columns: Vec<String>,
    pub upload_date: String,
    #[serde(default)]
    pub summary: serde_json::Map<String, serde_json::Value>,
}

impl DatasetDetail {
    /// 按 `key: value` 的形式展开 summary，字符串值不带引号
    pub fn summary_lines(&self) -> Vec<(String, String)> {
        self.summary
            .iter()
            .map(|(k, v)| {
                let rendered = match v {
                    serde_json::Value::String(s) => s.clone(),
                    other => other.to_string(),
                };
                (k.clone(), rendered)
            })
            .collect()
    }
}

/// 上传成功后返回的元数据
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetMetadata {
    pub id: String,
    pub name: String,
    pub rows: u64,
    #[serde(default)]
    pub columns: Vec<String>,
    pub upload_date: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesSummary {
    pub total_sales: f64,
    pub total_orders: u64,
    pub average_order_value: f64,
    pub period: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopProduct {
    pub product_name: String,
    pub sales: f64,
    pub units_sold: u64,
}

/// 后端错误载荷：`{"detail": "..."}` 或校验错误列表
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorPayload {
    pub detail: serde_json::Value,
}

impl ErrorPayload {
    /// 提取可读的错误信息
    pub fn message(&self) -> Option<String> {
        match &self.detail {
            serde_json::Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
            serde_json::Value::Array(items) => items
                .iter()
                .find_map(|item| item.get("msg").and_then(|m| m.as_str()))
                .map(str::to_string),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_display_name_falls_back_to_email() {
        let user = User {
            id: "1".into(),
            email: "a@b.c".into(),
            name: "  ".into(),
        };
        assert_eq!(user.display_name(), "a@b.c");
    }

    #[test]
    fn test_dataset_detail_summary_lines() {
        let detail: DatasetDetail = serde_json::from_value(json!({
            "id": "d1",
            "name": "sales.csv",
            "rows": 3,
            "columns": ["a", "b"],
            "upload_date": "2024-01-01T00:00:00Z",
            "summary": { "region": "EU", "mean": 2.5 }
        }))
        .unwrap();

        let lines = detail.summary_lines();
        assert!(lines.contains(&("region".to_string(), "EU".to_string())));
        assert!(lines.contains(&("mean".to_string(), "2.5".to_string())));
    }

    #[test]
    fn test_error_payload_message() {
        let plain: ErrorPayload = serde_json::from_value(json!({ "detail": "Email taken" })).unwrap();
        assert_eq!(plain.message().as_deref(), Some("Email taken"));

        let list: ErrorPayload = serde_json::from_value(json!({
            "detail": [{ "loc": ["body", "email"], "msg": "field required" }]
        }))
        .unwrap();
        assert_eq!(list.message().as_deref(), Some("field required"));

        let other: ErrorPayload = serde_json::from_value(json!({ "detail": 42 })).unwrap();
        assert!(other.message().is_none());
    }
}
