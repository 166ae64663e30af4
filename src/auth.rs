//! 认证流程
//!
//! 登录、注册、启动恢复与注销。表单校验在发出任何请求之前完成。

use crate::api::ApiClient;
use crate::error::{DashError, DashErrorKind, DashResult};
use crate::request::HttpClient;
use crate::session::SessionStatus;
use crate::storage::TokenStorage;
use bidash_shared::{AuthResponse, LoginRequest, RegisterRequest, User};

pub const MIN_PASSWORD_LEN: usize = 6;

// =========================================================
// 表单 (Forms)
// =========================================================

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

impl LoginForm {
    pub fn validate(&self) -> DashResult<LoginRequest> {
        if self.email.trim().is_empty() || self.password.is_empty() {
            return Err(DashError::validation("Please fill in all fields"));
        }
        Ok(LoginRequest {
            email: self.email.trim().to_string(),
            password: self.password.clone(),
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RegisterForm {
    pub name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

/// 注册表单校验失败的原因，对应通知标题
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegisterRejection {
    Incomplete,
    PasswordMismatch,
    WeakPassword,
}

impl RegisterRejection {
    pub fn title(&self) -> &'static str {
        match self {
            RegisterRejection::Incomplete => "Missing information",
            RegisterRejection::PasswordMismatch => "Password mismatch",
            RegisterRejection::WeakPassword => "Weak password",
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            RegisterRejection::Incomplete => "Please fill in all fields",
            RegisterRejection::PasswordMismatch => "Please ensure both password fields match",
            RegisterRejection::WeakPassword => "Password must be at least 6 characters long",
        }
    }
}

impl RegisterForm {
    /// 先检查两次密码是否一致，再检查长度
    pub fn check(&self) -> Result<RegisterRequest, RegisterRejection> {
        if self.name.trim().is_empty() || self.email.trim().is_empty() || self.password.is_empty()
        {
            return Err(RegisterRejection::Incomplete);
        }
        if self.password != self.confirm_password {
            return Err(RegisterRejection::PasswordMismatch);
        }
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(RegisterRejection::WeakPassword);
        }
        Ok(RegisterRequest {
            email: self.email.trim().to_string(),
            password: self.password.clone(),
            name: self.name.trim().to_string(),
        })
    }

    pub fn validate(&self) -> DashResult<RegisterRequest> {
        self.check()
            .map_err(|r| DashError::validation(r.message()).in_op_with("auth.register", r.title()))
    }
}

// =========================================================
// 流程 (Flows)
// =========================================================

/// 后端的 4xx 表示凭据或注册信息被拒绝
fn as_auth_error(err: DashError, op: &str) -> DashError {
    let err = if err.kind == DashErrorKind::Network && err.is_client_error() {
        err.reclassify(DashErrorKind::Auth)
    } else {
        err
    };
    err.in_op(op.to_string())
}

fn establish<C: HttpClient, S: TokenStorage>(
    api: &ApiClient<C, S>,
    resp: AuthResponse,
    op: &str,
) -> DashResult<User> {
    if resp.access_token.is_empty() {
        return Err(DashError::auth("empty access token").in_op(op.to_string()));
    }
    api.session()
        .establish(&resp.access_token, resp.user.clone())?;
    Ok(resp.user)
}

pub async fn login<C: HttpClient, S: TokenStorage>(
    api: &ApiClient<C, S>,
    form: &LoginForm,
) -> DashResult<User> {
    let request = form.validate()?;
    let resp = api
        .login(&request)
        .await
        .map_err(|e| as_auth_error(e, "auth.login"))?;
    establish(api, resp, "auth.login")
}

pub async fn register<C: HttpClient, S: TokenStorage>(
    api: &ApiClient<C, S>,
    form: &RegisterForm,
) -> DashResult<User> {
    let request = form.validate()?;
    let resp = api
        .register(&request)
        .await
        .map_err(|e| as_auth_error(e, "auth.register"))?;
    establish(api, resp, "auth.register")
}

/// 启动时恢复会话；失败时静默清除令牌，不产生错误
pub async fn restore_session<C: HttpClient, S: TokenStorage>(
    api: &ApiClient<C, S>,
) -> Option<User> {
    let session = api.session();
    if session.status() != SessionStatus::Restoring {
        return session.user();
    }

    match api.profile().await {
        Ok(user) => {
            session.restore_succeeded(user.clone());
            Some(user)
        }
        Err(e) => {
            log_warn!("[Auth] Session restore failed: {}", e);
            session.restore_failed();
            None
        }
    }
}

pub fn logout<C: HttpClient, S: TokenStorage>(api: &ApiClient<C, S>) {
    api.session().clear();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::test_support::*;
    use crate::session::SessionEvent;
    use crate::storage::MemoryTokenStorage;
    use serde_json::json;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn user_json() -> serde_json::Value {
        json!({ "id": "u1", "email": "ann@example.com", "name": "Ann" })
    }

    fn register_form(password: &str, confirm: &str) -> RegisterForm {
        RegisterForm {
            name: "Ann".into(),
            email: "ann@example.com".into(),
            password: password.into(),
            confirm_password: confirm.into(),
        }
    }

    #[tokio::test]
    async fn test_login_persists_token_and_user() {
        let storage = MemoryTokenStorage::new();
        let (api, http) = client_with(storage.clone());
        http.mock_response(
            &url("/auth/login"),
            200,
            json!({ "access_token": "jwt-1", "user": user_json() }),
        );

        let user = login(
            &api,
            &LoginForm {
                email: " ann@example.com ".into(),
                password: "secret1".into(),
            },
        )
        .await
        .unwrap();

        assert_eq!(user.name, "Ann");
        assert_eq!(storage.get().as_deref(), Some("jwt-1"));
        assert_eq!(api.session().user(), Some(user));
    }

    #[tokio::test]
    async fn test_login_rejected_is_auth_error() {
        let storage = MemoryTokenStorage::new();
        let (api, http) = client_with(storage.clone());
        http.mock_response(
            &url("/auth/login"),
            400,
            json!({ "detail": "Incorrect email or password" }),
        );

        let err = login(
            &api,
            &LoginForm {
                email: "ann@example.com".into(),
                password: "nope".into(),
            },
        )
        .await
        .unwrap_err();

        assert_eq!(err.kind, DashErrorKind::Auth);
        assert_eq!(
            err.user_message("Please check your credentials and try again"),
            "Incorrect email or password"
        );
        assert!(storage.get().is_none());
        assert_eq!(http.request_count(), 1);
    }

    #[tokio::test]
    async fn test_login_empty_fields_never_hit_network() {
        let (api, http) = client_with(MemoryTokenStorage::new());
        let err = login(&api, &LoginForm::default()).await.unwrap_err();
        assert_eq!(err.kind, DashErrorKind::Validation);
        assert_eq!(http.request_count(), 0);
    }

    #[tokio::test]
    async fn test_register_short_password_never_hits_network() {
        let (api, http) = client_with(MemoryTokenStorage::new());

        let err = register(&api, &register_form("abc", "abc")).await.unwrap_err();
        assert_eq!(err.kind, DashErrorKind::Validation);
        assert_eq!(err.user_message(""), "Password must be at least 6 characters long");
        assert_eq!(http.request_count(), 0);
    }

    #[tokio::test]
    async fn test_register_mismatch_checked_before_length() {
        let (api, http) = client_with(MemoryTokenStorage::new());

        assert_eq!(
            register_form("abc", "abd").check().unwrap_err(),
            RegisterRejection::PasswordMismatch
        );
        let err = register(&api, &register_form("secret1", "secret2"))
            .await
            .unwrap_err();
        assert_eq!(err.user_message(""), "Please ensure both password fields match");
        assert_eq!(http.request_count(), 0);
    }

    #[tokio::test]
    async fn test_register_success_signs_in() {
        let storage = MemoryTokenStorage::new();
        let (api, http) = client_with(storage.clone());
        http.mock_response(
            &url("/auth/register"),
            200,
            json!({ "access_token": "jwt-2", "user": user_json() }),
        );

        register(&api, &register_form("secret1", "secret1"))
            .await
            .unwrap();

        assert_eq!(storage.get().as_deref(), Some("jwt-2"));
        assert!(api.session().is_authenticated());
        let body = http.requests.borrow()[0].3.clone().unwrap();
        let body: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(body["name"], "Ann");
    }

    #[tokio::test]
    async fn test_restore_success() {
        let (api, http) = client_with(MemoryTokenStorage::with_token("jwt"));
        http.mock_response(&url("/auth/profile"), 200, user_json());

        let user = restore_session(&api).await.unwrap();
        assert_eq!(user.email, "ann@example.com");
        assert!(api.session().is_authenticated());
        assert_eq!(
            http.requests.borrow()[0].2.get("Authorization").unwrap(),
            "Bearer jwt"
        );
    }

    #[tokio::test]
    async fn test_restore_failure_clears_token_silently() {
        let storage = MemoryTokenStorage::with_token("stale");
        let (api, http) = client_with(storage.clone());
        http.mock_response(&url("/auth/profile"), 401, json!({ "detail": "expired" }));
        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&events);
        api.session()
            .subscribe(move |e| sink.borrow_mut().push(e.clone()));

        assert!(restore_session(&api).await.is_none());
        assert!(storage.get().is_none());
        assert_eq!(api.session().status(), SessionStatus::Anonymous);
        assert_eq!(*events.borrow(), vec![SessionEvent::RestoreFailed]);
    }

    #[tokio::test]
    async fn test_restore_network_failure_also_clears() {
        let storage = MemoryTokenStorage::with_token("jwt");
        let (api, http) = client_with(storage.clone());
        http.mock_failure(&url("/auth/profile"));

        assert!(restore_session(&api).await.is_none());
        assert!(storage.get().is_none());
    }

    #[tokio::test]
    async fn test_restore_without_token_skips_network() {
        let (api, http) = client_with(MemoryTokenStorage::new());
        assert!(restore_session(&api).await.is_none());
        assert_eq!(http.request_count(), 0);
    }

    #[tokio::test]
    async fn test_logout_is_local() {
        let storage = MemoryTokenStorage::new();
        let (api, http) = client_with(storage.clone());
        api.session()
            .establish("jwt", serde_json::from_value(user_json()).unwrap())
            .unwrap();

        logout(&api);
        assert!(storage.get().is_none());
        assert!(api.session().user().is_none());
        assert_eq!(http.request_count(), 0);
    }
}
