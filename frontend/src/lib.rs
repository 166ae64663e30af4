//! AI-BI 前端应用
//!
//! 采用 Context-Driven 架构：
//! - `web::router`: 路由服务，守卫规则来自 `bidash::AppRoute`
//! - `auth`: 会话上下文，负责会话事件到信号的同步
//! - `notify`: 全局通知
//! - `components`: 页面与 UI 组件

mod auth;
mod components {
    pub mod dashboard;
    pub mod datasets;
    mod icons;
    pub mod kpis;
    pub mod landing;
    pub mod login;
    pub mod not_found;
    pub mod profile;
    pub mod register;
    pub mod toast;
    pub mod upload;
}
mod notify;

use crate::auth::{AuthContext, init_auth};
use crate::components::dashboard::DashboardLayout;
use crate::components::datasets::DatasetsPage;
use crate::components::kpis::KpisPage;
use crate::components::landing::LandingPage;
use crate::components::login::LoginPage;
use crate::components::not_found::NotFoundPage;
use crate::components::profile::ProfilePage;
use crate::components::register::RegisterPage;
use crate::components::toast::ToastHost;
use crate::components::upload::UploadPage;
use crate::notify::NotifyContext;

use bidash::AppRoute;
use leptos::prelude::*;

// 浏览器 Web API 封装：HTTP、存储、文件读取与路由
pub(crate) mod web {
    pub mod file;
    mod http;
    pub mod router;
    mod storage;

    pub use http::FetchHttpClient;
    pub use storage::BrowserTokenStorage;
}

use web::router::{Router, RouterOutlet};

/// 路由匹配函数
///
/// 面板内的页面统一套上 `DashboardLayout`。
fn route_matcher(route: AppRoute) -> AnyView {
    match route {
        AppRoute::Landing => view! { <LandingPage /> }.into_any(),
        AppRoute::Login => view! { <LoginPage /> }.into_any(),
        AppRoute::Register => view! { <RegisterPage /> }.into_any(),
        // 守卫会把 /dashboard 重定向到数据集页，这里只是兜底
        AppRoute::Dashboard | AppRoute::Datasets => {
            view! { <DashboardLayout><DatasetsPage /></DashboardLayout> }.into_any()
        }
        AppRoute::Kpis => view! { <DashboardLayout><KpisPage /></DashboardLayout> }.into_any(),
        AppRoute::Upload => view! { <DashboardLayout><UploadPage /></DashboardLayout> }.into_any(),
        AppRoute::Profile => {
            view! { <DashboardLayout><ProfilePage /></DashboardLayout> }.into_any()
        }
        AppRoute::NotFound => view! { <NotFoundPage /> }.into_any(),
    }
}

#[component]
pub fn App() -> impl IntoView {
    // 1. 通知上下文，认证上下文需要用它提示会话过期
    let notify = NotifyContext::new();
    provide_context(notify);

    // 2. 认证上下文
    let auth_ctx = AuthContext::new(notify);
    provide_context(auth_ctx);

    // 3. 本地存有令牌时向后端恢复会话
    init_auth(&auth_ctx);

    view! {
        // 4. 会话状态注入路由服务实现守卫
        <Router status=auth_ctx.status_signal()>
            <RouterOutlet matcher=route_matcher />
        </Router>
        <ToastHost />
    }
}
