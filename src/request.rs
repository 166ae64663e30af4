use crate::error::{DashError, DashResult};
use bidash_shared::ErrorPayload;
use serde::de::DeserializeOwned;
use std::collections::HashMap;

pub use bidash_shared::protocol::HttpMethod;

#[cfg(test)]
use std::cell::RefCell;
#[cfg(test)]
use std::collections::HashSet;

// =========================================================
// 核心抽象层 (HTTP Interface Abstraction)
// =========================================================

/// multipart 上传的单个文件字段
#[derive(Debug, Clone, PartialEq)]
pub struct MultipartFile {
    pub field: String,
    pub file_name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

/// 请求体
#[derive(Debug, Clone, PartialEq)]
pub enum HttpBody {
    Json(String),
    Multipart(MultipartFile),
}

impl HttpBody {
    /// 日志和测试记录用的简短描述
    pub fn describe(&self) -> String {
        match self {
            HttpBody::Json(s) => s.clone(),
            HttpBody::Multipart(file) => format!(
                "multipart:{}={} ({}, {} bytes)",
                file.field,
                file.file_name,
                file.mime,
                file.bytes.len()
            ),
        }
    }
}

/// 通用 HTTP 请求结构
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub url: String,
    pub method: HttpMethod,
    pub headers: HashMap<String, String>,
    pub body: Option<HttpBody>,
}

impl HttpRequest {
    pub fn new(url: &str, method: HttpMethod) -> Self {
        Self {
            url: url.to_string(),
            method,
            headers: HashMap::new(),
            body: None,
        }
    }

    pub fn with_header(mut self, key: &str, value: &str) -> Self {
        self.headers.insert(key.to_string(), value.to_string());
        self
    }

    pub fn with_body(mut self, body: serde_json::Value) -> Self {
        self.body = Some(HttpBody::Json(body.to_string()));
        self
    }

    /// multipart 请求不设置 Content-Type，交给浏览器生成 boundary
    pub fn with_multipart(mut self, file: MultipartFile) -> Self {
        self.body = Some(HttpBody::Multipart(file));
        self
    }
}

/// 通用 HTTP 响应结构
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn json<T: DeserializeOwned>(&self) -> DashResult<T> {
        serde_json::from_str(&self.body).map_err(|e| {
            DashError::network("unexpected response").in_op_with("response.json", e.to_string())
        })
    }

    /// 解析后端错误载荷中的 `detail`
    pub fn detail(&self) -> Option<String> {
        serde_json::from_str::<ErrorPayload>(&self.body)
            .ok()
            .and_then(|payload| payload.message())
    }
}

/// HTTP 客户端特性 (Trait)
/// (?Send) 是因为浏览器环境下 fetch 相关类型不是 Send 的
#[async_trait::async_trait(?Send)]
pub trait HttpClient {
    async fn send(&self, req: HttpRequest) -> DashResult<HttpResponse>;
}

// =========================================================
// 测试工具: MockHttpClient
// =========================================================

#[cfg(test)]
pub struct MockHttpClient {
    // (URL, (Status, Response Body))
    responses: RefCell<HashMap<String, (u16, String)>>,
    // 这些 URL 模拟网络层失败
    failures: RefCell<HashSet<String>>,
    // 记录发出的请求 (URL, Method, Headers, Body)
    pub requests: RefCell<Vec<(String, String, HashMap<String, String>, Option<String>)>>,
}

#[cfg(test)]
impl MockHttpClient {
    pub fn new() -> Self {
        Self {
            responses: RefCell::new(HashMap::new()),
            failures: RefCell::new(HashSet::new()),
            requests: RefCell::new(Vec::new()),
        }
    }

    pub fn mock_response(&self, url: &str, status: u16, body: serde_json::Value) {
        self.responses
            .borrow_mut()
            .insert(url.to_string(), (status, body.to_string()));
    }

    pub fn mock_failure(&self, url: &str) {
        self.failures.borrow_mut().insert(url.to_string());
    }

    pub fn request_count(&self) -> usize {
        self.requests.borrow().len()
    }

    pub fn sent_to(&self, url: &str) -> bool {
        self.requests.borrow().iter().any(|r| r.0 == url)
    }
}

#[cfg(test)]
#[async_trait::async_trait(?Send)]
impl HttpClient for MockHttpClient {
    async fn send(&self, req: HttpRequest) -> DashResult<HttpResponse> {
        self.requests.borrow_mut().push((
            req.url.clone(),
            req.method.as_str().to_string(),
            req.headers.clone(),
            req.body.as_ref().map(HttpBody::describe),
        ));

        if self.failures.borrow().contains(&req.url) {
            return Err(DashError::network("connection refused"));
        }

        let responses = self.responses.borrow();
        if let Some((status, body)) = responses.get(&req.url) {
            Ok(HttpResponse {
                status: *status,
                body: body.clone(),
            })
        } else {
            Ok(HttpResponse {
                status: 404,
                body: "Not Found".to_string(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_detail_and_json() {
        let resp = HttpResponse {
            status: 400,
            body: r#"{"detail":"Invalid file"}"#.to_string(),
        };
        assert!(!resp.is_success());
        assert_eq!(resp.detail().as_deref(), Some("Invalid file"));

        let resp = HttpResponse {
            status: 200,
            body: "<html>".to_string(),
        };
        assert!(resp.is_success());
        assert!(resp.detail().is_none());
        let err = resp.json::<serde_json::Value>().unwrap_err();
        assert_eq!(err.message, "unexpected response");
    }

    #[test]
    fn test_multipart_description() {
        let body = HttpBody::Multipart(MultipartFile {
            field: "file".into(),
            file_name: "sales.csv".into(),
            mime: "text/csv".into(),
            bytes: vec![1, 2, 3],
        });
        assert_eq!(body.describe(), "multipart:file=sales.csv (text/csv, 3 bytes)");
    }
}
