//! 路由定义模块 - 领域模型
//!
//! 纯业务逻辑，不依赖 DOM。定义应用的所有路由及守卫规则，
//! 浏览器端的路由服务只负责 History API 与信号。

use crate::session::SessionStatus;
use std::fmt::Display;

/// 应用路由枚举
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AppRoute {
    /// 落地页
    #[default]
    Landing,
    Login,
    Register,
    /// 面板入口，总是转到数据集页
    Dashboard,
    Datasets,
    Kpis,
    Upload,
    Profile,
    /// 页面未找到
    NotFound,
}

/// 守卫结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    /// 渲染目标页面
    Allow,
    /// 会话恢复中，渲染加载占位，不跳转
    Pending,
    /// 重定向到另一个路由
    Redirect(AppRoute),
}

impl AppRoute {
    /// 将 URL path 解析为路由枚举，忽略结尾的 `/`
    pub fn from_path(path: &str) -> Self {
        let trimmed = path.trim_end_matches('/');
        match trimmed {
            "" => Self::Landing,
            "/login" => Self::Login,
            "/register" => Self::Register,
            "/dashboard" => Self::Dashboard,
            "/dashboard/datasets" => Self::Datasets,
            "/dashboard/kpis" => Self::Kpis,
            "/dashboard/upload" => Self::Upload,
            "/dashboard/profile" => Self::Profile,
            _ => Self::NotFound,
        }
    }

    /// 获取路由对应的 URL path
    pub fn to_path(&self) -> &'static str {
        match self {
            Self::Landing => "/",
            Self::Login => "/login",
            Self::Register => "/register",
            Self::Dashboard => "/dashboard",
            Self::Datasets => "/dashboard/datasets",
            Self::Kpis => "/dashboard/kpis",
            Self::Upload => "/dashboard/upload",
            Self::Profile => "/dashboard/profile",
            Self::NotFound => "/404",
        }
    }

    /// 侧边栏显示的名称
    pub fn label(&self) -> &'static str {
        match self {
            Self::Landing => "Home",
            Self::Login => "Sign in",
            Self::Register => "Sign up",
            Self::Dashboard => "Dashboard",
            Self::Datasets => "Datasets",
            Self::Kpis => "KPIs",
            Self::Upload => "Upload",
            Self::Profile => "Profile",
            Self::NotFound => "Not found",
        }
    }

    /// 侧边栏中的面板分区，按显示顺序
    pub fn dashboard_sections() -> [AppRoute; 4] {
        [Self::Datasets, Self::Kpis, Self::Upload, Self::Profile]
    }

    /// 该路由是否需要认证
    pub fn requires_auth(&self) -> bool {
        matches!(
            self,
            Self::Dashboard | Self::Datasets | Self::Kpis | Self::Upload | Self::Profile
        )
    }

    /// 已认证用户是否应该离开此路由（登录 / 注册页）
    pub fn should_redirect_when_authenticated(&self) -> bool {
        matches!(self, Self::Login | Self::Register)
    }

    /// 获取认证失败时的重定向目标
    pub fn auth_failure_redirect() -> Self {
        Self::Login
    }

    /// 获取认证成功时的重定向目标
    pub fn auth_success_redirect() -> Self {
        Self::Datasets
    }

    /// **核心守卫逻辑**
    pub fn guard(&self, status: SessionStatus) -> GuardDecision {
        if *self == Self::Dashboard && status == SessionStatus::Authenticated {
            return GuardDecision::Redirect(Self::Datasets);
        }

        if self.requires_auth() {
            return match status {
                SessionStatus::Authenticated => GuardDecision::Allow,
                SessionStatus::Restoring => GuardDecision::Pending,
                SessionStatus::Anonymous => GuardDecision::Redirect(Self::auth_failure_redirect()),
            };
        }

        if self.should_redirect_when_authenticated() && status == SessionStatus::Authenticated {
            return GuardDecision::Redirect(Self::auth_success_redirect());
        }

        GuardDecision::Allow
    }

    /// 跟随重定向链直到得到最终结果
    pub fn resolve(self, status: SessionStatus) -> (AppRoute, GuardDecision) {
        let mut route = self;
        // 重定向链最多两跳（Dashboard -> Datasets），多留余量
        for _ in 0..4 {
            match route.guard(status) {
                GuardDecision::Redirect(next) if next != route => route = next,
                GuardDecision::Redirect(_) => return (route, GuardDecision::Allow),
                decision => return (route, decision),
            }
        }
        (route, route.guard(status))
    }
}

impl Display for AppRoute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_path())
    }
}
