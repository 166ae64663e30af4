//! BI 仪表盘客户端核心
//!
//! 与平台无关的客户端逻辑，浏览器端 (`bidash-frontend`) 与原生测试共用：
//! - `request`: HTTP 抽象层
//! - `session`: 会话存储（令牌 + 用户）
//! - `api`: 带令牌注入与 401 拦截的 API 客户端
//! - `auth`: 登录 / 注册 / 恢复 / 注销流程
//! - `route`: 路由定义与守卫
//! - `views`: 各页面的视图模型

// =========================================================
// 跨平台日志宏
// =========================================================

#[cfg(target_arch = "wasm32")]
macro_rules! log_info {
    ($($t:tt)*) => (web_sys::console::log_1(&format!($($t)*).into()))
}

#[cfg(not(target_arch = "wasm32"))]
macro_rules! log_info {
    ($($t:tt)*) => (println!($($t)*))
}

#[cfg(target_arch = "wasm32")]
macro_rules! log_warn {
    ($($t:tt)*) => (web_sys::console::warn_1(&format!($($t)*).into()))
}

#[cfg(not(target_arch = "wasm32"))]
macro_rules! log_warn {
    ($($t:tt)*) => (eprintln!($($t)*))
}

#[cfg(target_arch = "wasm32")]
macro_rules! log_error {
    ($($t:tt)*) => (web_sys::console::error_1(&format!($($t)*).into()))
}

#[cfg(not(target_arch = "wasm32"))]
macro_rules! log_error {
    ($($t:tt)*) => (eprintln!($($t)*))
}

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod format;
pub mod lifetime;
pub mod notify;
pub mod request;
pub mod route;
pub mod session;
pub mod storage;
pub mod views;

pub use api::ApiClient;
pub use config::ClientConfig;
pub use error::{DashError, DashErrorKind, DashResult};
pub use lifetime::{Ticket, ViewLifetime};
pub use notify::{Notifier, Toast, ToastKind};
pub use request::{HttpBody, HttpClient, HttpRequest, HttpResponse, MultipartFile};
pub use route::{AppRoute, GuardDecision};
pub use session::{Session, SessionEvent, SessionStatus};
pub use storage::{MemoryTokenStorage, TokenStorage};

pub use bidash_shared as shared;
