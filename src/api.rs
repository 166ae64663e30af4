use crate::config::ClientConfig;
use crate::error::{DashError, DashResult};
use crate::request::{HttpClient, HttpRequest, HttpResponse, MultipartFile};
use crate::session::Session;
use crate::storage::TokenStorage;
use bidash_shared::protocol::{
    ApiRequest, GetDatasetRequest, ListDatasetsRequest, ProfileRequest, SalesSummaryRequest,
    TopProductsRequest, UploadDatasetRequest,
};
use bidash_shared::{
    AuthResponse, Dataset, DatasetDetail, DatasetMetadata, HEADER_AUTHORIZATION, LoginRequest,
    RegisterRequest, SalesSummary, TopProduct, UPLOAD_FIELD_NAME, User,
};
use std::rc::Rc;

// =========================================================
// API 客户端
// =========================================================

/// 后端 API 客户端
///
/// 每个请求都从会话读取当前令牌并附加 `Authorization: Bearer`；
/// 401 响应会拆除会话并以错误返回给调用方。
pub struct ApiClient<C: HttpClient, S: TokenStorage> {
    http: Rc<C>,
    session: Session<S>,
    config: Rc<ClientConfig>,
}

impl<C: HttpClient, S: TokenStorage> Clone for ApiClient<C, S> {
    fn clone(&self) -> Self {
        Self {
            http: Rc::clone(&self.http),
            session: self.session.clone(),
            config: Rc::clone(&self.config),
        }
    }
}

impl<C: HttpClient, S: TokenStorage> ApiClient<C, S> {
    pub fn new(http: C, session: Session<S>, config: ClientConfig) -> Self {
        Self {
            http: Rc::new(http),
            session,
            config: Rc::new(config),
        }
    }

    pub fn session(&self) -> &Session<S> {
        &self.session
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// 发送一个协议请求并解析响应
    pub async fn call<R: ApiRequest>(&self, request: &R) -> DashResult<R::Response> {
        let path = request.path();
        let mut req = HttpRequest::new(&self.config.endpoint(&path), R::METHOD);

        if R::SENDS_BODY {
            let body = serde_json::to_value(request).map_err(|e| {
                DashError::validation("request could not be encoded")
                    .in_op_with("api.encode", e.to_string())
            })?;
            req = req
                .with_header("Content-Type", "application/json")
                .with_body(body);
        }

        let resp = self.dispatch(req, &path).await?;
        resp.json::<R::Response>()
            .map_err(|e| e.in_op_with("api.decode", path))
    }

    /// 注入令牌、发送并检查响应状态
    async fn dispatch(&self, mut req: HttpRequest, path: &str) -> DashResult<HttpResponse> {
        let method = req.method.as_str();
        let token = self.session.token();
        if let Some(token) = &token {
            req = req.with_header(HEADER_AUTHORIZATION, &format!("Bearer {}", token));
        }

        let resp = self.http.send(req).await.map_err(|e| {
            log_error!("[Api] {} {} failed: {}", method, path, e);
            e.in_op_with("api.dispatch", path)
        })?;

        if resp.status == 401 {
            let detail = resp.detail();
            if self.session.expire(token.as_deref()) {
                log_warn!("[Api] 401 on {} {}, session torn down", method, path);
                return Err(DashError::session_expired()
                    .with_detail(detail)
                    .in_op_with("api.dispatch", path));
            }
            return Err(DashError::auth("unauthorized")
                .with_status(401)
                .with_detail(detail)
                .in_op_with("api.dispatch", path));
        }

        if !resp.is_success() {
            log_error!("[Api] {} {} returned status {}", method, path, resp.status);
            return Err(
                DashError::network(format!("request failed with status {}", resp.status))
                    .with_status(resp.status)
                    .with_detail(resp.detail())
                    .in_op_with("api.dispatch", path),
            );
        }

        Ok(resp)
    }

    // --- Auth ---

    pub async fn login(&self, request: &LoginRequest) -> DashResult<AuthResponse> {
        self.call(request).await
    }

    pub async fn register(&self, request: &RegisterRequest) -> DashResult<AuthResponse> {
        self.call(request).await
    }

    pub async fn profile(&self) -> DashResult<User> {
        self.call(&ProfileRequest).await
    }

    // --- Datasets ---

    pub async fn list_datasets(&self) -> DashResult<Vec<Dataset>> {
        self.call(&ListDatasetsRequest).await
    }

    pub async fn dataset(&self, id: &str) -> DashResult<DatasetDetail> {
        self.call(&GetDatasetRequest { id: id.to_string() }).await
    }

    pub async fn upload_dataset(
        &self,
        file_name: &str,
        mime: &str,
        bytes: Vec<u8>,
    ) -> DashResult<DatasetMetadata> {
        let request = UploadDatasetRequest;
        let path = request.path();
        let req = HttpRequest::new(
            &self.config.endpoint(&path),
            <UploadDatasetRequest as ApiRequest>::METHOD,
        )
        .with_multipart(MultipartFile {
            field: UPLOAD_FIELD_NAME.to_string(),
            file_name: file_name.to_string(),
            mime: mime.to_string(),
            bytes,
        });

        let resp = self.dispatch(req, &path).await?;
        resp.json::<DatasetMetadata>()
            .map_err(|e| e.in_op_with("api.decode", path))
    }

    // --- KPIs ---

    pub async fn sales_summary(&self, dataset_id: &str) -> DashResult<SalesSummary> {
        self.call(&SalesSummaryRequest {
            dataset_id: dataset_id.to_string(),
        })
        .await
    }

    pub async fn top_products(&self, dataset_id: &str) -> DashResult<Vec<TopProduct>> {
        self.call(&TopProductsRequest {
            dataset_id: dataset_id.to_string(),
        })
        .await
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::request::MockHttpClient;
    use crate::storage::MemoryTokenStorage;

    pub const BASE: &str = "http://api.test";

    pub fn client_with(
        storage: MemoryTokenStorage,
    ) -> (ApiClient<MockHttpClient, MemoryTokenStorage>, Rc<MockHttpClient>) {
        let session = Session::new(storage);
        let api = ApiClient::new(
            MockHttpClient::new(),
            session,
            ClientConfig::new().with_api_base_url(BASE),
        );
        let http = Rc::clone(&api.http);
        (api, http)
    }

    pub fn url(path: &str) -> String {
        format!("{}{}", BASE, path)
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;
    use crate::error::DashErrorKind;
    use crate::session::{SessionEvent, SessionStatus};
    use crate::storage::MemoryTokenStorage;
    use serde_json::json;
    use std::cell::RefCell;

    fn user_json() -> serde_json::Value {
        json!({ "id": "u1", "email": "ann@example.com", "name": "Ann" })
    }

    #[tokio::test]
    async fn test_bearer_header_uses_current_token() {
        let storage = MemoryTokenStorage::with_token("tok-1");
        let (api, http) = client_with(storage.clone());
        http.mock_response(&url("/datasets"), 200, json!([]));

        api.list_datasets().await.unwrap();
        storage.set("tok-2").unwrap();
        api.list_datasets().await.unwrap();

        let reqs = http.requests.borrow();
        assert_eq!(reqs[0].2.get("Authorization").unwrap(), "Bearer tok-1");
        assert_eq!(reqs[1].2.get("Authorization").unwrap(), "Bearer tok-2");
    }

    #[tokio::test]
    async fn test_no_header_without_token() {
        let (api, http) = client_with(MemoryTokenStorage::new());
        http.mock_response(&url("/datasets"), 200, json!([]));

        api.list_datasets().await.unwrap();
        assert!(!http.requests.borrow()[0].2.contains_key("Authorization"));
    }

    #[tokio::test]
    async fn test_401_tears_down_authenticated_session() {
        let storage = MemoryTokenStorage::new();
        let (api, http) = client_with(storage.clone());
        api.session()
            .establish("tok", serde_json::from_value(user_json()).unwrap())
            .unwrap();
        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&events);
        api.session()
            .subscribe(move |e| sink.borrow_mut().push(e.clone()));

        http.mock_response(
            &url("/kpis/top_products?dataset_id=d1"),
            401,
            json!({ "detail": "Token expired" }),
        );

        let err = api.top_products("d1").await.unwrap_err();
        assert!(err.is_session_expired());
        assert_eq!(err.detail(), Some("Token expired"));
        assert!(storage.get().is_none());
        assert_eq!(api.session().status(), SessionStatus::Anonymous);
        assert_eq!(*events.borrow(), vec![SessionEvent::Expired]);
    }

    #[tokio::test]
    async fn test_401_without_token_is_plain_auth_error() {
        let (api, http) = client_with(MemoryTokenStorage::new());
        http.mock_response(
            &url("/auth/login"),
            401,
            json!({ "detail": "Incorrect email or password" }),
        );

        let err = api
            .login(&LoginRequest {
                email: "a@b.c".into(),
                password: "wrong1".into(),
            })
            .await
            .unwrap_err();
        assert_eq!(err.kind, DashErrorKind::Auth);
        assert!(!err.is_session_expired());
        assert_eq!(err.user_message("fallback"), "Incorrect email or password");
    }

    #[tokio::test]
    async fn test_non_2xx_and_transport_errors() {
        let (api, http) = client_with(MemoryTokenStorage::new());
        http.mock_response(&url("/datasets/d%201"), 500, json!({ "detail": "boom" }));
        http.mock_failure(&url("/datasets"));

        let err = api.dataset("d 1").await.unwrap_err();
        assert_eq!(err.kind, DashErrorKind::Network);
        assert_eq!(err.status(), Some(500));
        assert_eq!(err.detail(), Some("boom"));

        let err = api.list_datasets().await.unwrap_err();
        assert_eq!(err.kind, DashErrorKind::Network);
        assert!(err.status().is_none());
    }

    #[tokio::test]
    async fn test_login_sends_json_body() {
        let (api, http) = client_with(MemoryTokenStorage::new());
        http.mock_response(
            &url("/auth/login"),
            200,
            json!({ "access_token": "t", "user": user_json() }),
        );

        let resp = api
            .login(&LoginRequest {
                email: "ann@example.com".into(),
                password: "secret1".into(),
            })
            .await
            .unwrap();
        assert_eq!(resp.access_token, "t");

        let reqs = http.requests.borrow();
        assert_eq!(reqs[0].1, "POST");
        assert_eq!(reqs[0].2.get("Content-Type").unwrap(), "application/json");
        let body: serde_json::Value = serde_json::from_str(reqs[0].3.as_ref().unwrap()).unwrap();
        assert_eq!(body, json!({ "email": "ann@example.com", "password": "secret1" }));
    }

    #[tokio::test]
    async fn test_upload_is_multipart_file_field() {
        let (api, http) = client_with(MemoryTokenStorage::with_token("tok"));
        http.mock_response(
            &url("/datasets/upload"),
            200,
            json!({
                "id": "d9",
                "name": "sales.csv",
                "rows": 10,
                "columns": ["a"],
                "upload_date": "2024-01-01"
            }),
        );

        let meta = api
            .upload_dataset("sales.csv", "text/csv", b"a\n1\n".to_vec())
            .await
            .unwrap();
        assert_eq!(meta.id, "d9");

        let reqs = http.requests.borrow();
        assert_eq!(
            reqs[0].3.as_deref(),
            Some("multipart:file=sales.csv (text/csv, 4 bytes)")
        );
        assert!(!reqs[0].2.contains_key("Content-Type"));
        assert_eq!(reqs[0].2.get("Authorization").unwrap(), "Bearer tok");
    }
}
