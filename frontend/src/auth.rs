//! 认证模块
//!
//! 把核心库的 `Session` 暴露给组件树，与路由系统解耦：
//! 路由服务只读取注入的会话状态信号。
//!
//! 401 的处理只有一个出口：API 客户端拆除会话后 `Session` 发出 `Expired`，
//! 这里统一提示一次，重定向交给路由服务。

use crate::notify::NotifyContext;
use crate::web::{BrowserTokenStorage, FetchHttpClient};
use bidash::auth::{LoginForm, RegisterForm};
use bidash::{ApiClient, ClientConfig, DashResult, Session, SessionEvent, SessionStatus, Toast};
use bidash_shared::User;
use leptos::prelude::*;
use leptos::task::spawn_local;

/// 浏览器端的 API 客户端类型
pub type BrowserApi = ApiClient<FetchHttpClient, BrowserTokenStorage>;

/// 页面根元素上的 `data-api-url` 可在运行时覆盖后端地址
fn api_url_override() -> Option<String> {
    web_sys::window()?
        .document()?
        .document_element()?
        .get_attribute("data-api-url")
}

fn build_api() -> BrowserApi {
    let mut config = ClientConfig::new();
    if let Some(url) = api_url_override() {
        config = config.with_api_base_url(&url);
    }
    web_sys::console::log_1(&format!("[Auth] API base: {}", config.api_base_url).into());

    let session = Session::new(BrowserTokenStorage::new(&config.token_key));
    ApiClient::new(FetchHttpClient, session, config)
}

/// 认证上下文
///
/// API 客户端持有 `Rc`，只能放在本地存储的 `StoredValue` 中；
/// 会话状态与用户同步到普通信号供组件读取。
#[derive(Clone, Copy)]
pub struct AuthContext {
    api: StoredValue<BrowserApi, LocalStorage>,
    /// 会话状态（只读）
    pub status: ReadSignal<SessionStatus>,
    /// 当前用户（只读）
    pub user: ReadSignal<Option<User>>,
}

impl AuthContext {
    /// 创建认证上下文并订阅会话事件
    pub fn new(notify: NotifyContext) -> Self {
        let api = build_api();
        let (status, set_status) = signal(api.session().status());
        let (user, set_user) = signal(api.session().user());

        api.session().subscribe(move |event| {
            match event {
                SessionEvent::SignedIn(u) | SessionEvent::Restored(u) => {
                    set_user.set(Some(u.clone()));
                    set_status.set(SessionStatus::Authenticated);
                }
                SessionEvent::RestoreFailed | SessionEvent::SignedOut => {
                    set_user.set(None);
                    set_status.set(SessionStatus::Anonymous);
                }
                SessionEvent::Expired => {
                    set_user.set(None);
                    set_status.set(SessionStatus::Anonymous);
                    notify.push(Toast::error(
                        "Session expired",
                        "Please sign in again to continue",
                    ));
                }
            }
            web_sys::console::log_1(&format!("[Auth] {:?}", event).into());
        });

        Self {
            api: StoredValue::new_local(api),
            status,
            user,
        }
    }

    /// 获取 API 客户端（共享同一个会话）
    pub fn api(&self) -> BrowserApi {
        self.api.get_value()
    }

    /// 获取会话状态信号（用于路由服务注入）
    pub fn status_signal(&self) -> Signal<SessionStatus> {
        self.status.into()
    }
}

/// 从 Context 获取认证上下文
pub fn use_auth() -> AuthContext {
    use_context::<AuthContext>().expect("AuthContext should be provided")
}

/// 初始化认证状态
///
/// 有持久化令牌时向后端校验；失败时静默清除，不提示。
pub fn init_auth(ctx: &AuthContext) {
    if ctx.status.get_untracked() != SessionStatus::Restoring {
        return;
    }
    let api = ctx.api();
    spawn_local(async move {
        bidash::auth::restore_session(&api).await;
    });
}

/// 登录，成功后路由服务会自动离开登录页
pub async fn login(ctx: &AuthContext, form: LoginForm) -> DashResult<User> {
    let api = ctx.api();
    bidash::auth::login(&api, &form).await
}

/// 注册并登录
pub async fn register(ctx: &AuthContext, form: RegisterForm) -> DashResult<User> {
    let api = ctx.api();
    bidash::auth::register(&api, &form).await
}

/// 注销并清除状态
///
/// 导航将由路由服务的会话状态监听自动处理。
pub fn logout(ctx: &AuthContext) {
    bidash::auth::logout(&ctx.api());
}
