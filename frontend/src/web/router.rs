//! 路由服务模块 - 核心引擎
//!
//! 封装了 web_sys 的 History API，所有对 window.history 的操作都集中在此模块。
//! 守卫规则来自 `bidash::route`，这里只负责 "监听 -> 验证 -> 处理 -> 加载"。

use bidash::{AppRoute, GuardDecision, SessionStatus};
use leptos::prelude::*;
use wasm_bindgen::prelude::*;

/// 获取当前浏览器路径
fn current_path() -> String {
    web_sys::window()
        .and_then(|w| w.location().pathname().ok())
        .unwrap_or_else(|| "/".to_string())
}

/// 推送 History 状态（内部工具函数）
fn push_history_state(path: &str) {
    if let Some(window) = web_sys::window() {
        if let Ok(history) = window.history() {
            let _ = history.push_state_with_url(&JsValue::NULL, "", Some(path));
        }
    }
}

/// 替换 History 状态（内部工具函数，用于重定向）
fn replace_history_state(path: &str) {
    if let Some(window) = web_sys::window() {
        if let Ok(history) = window.history() {
            let _ = history.replace_state_with_url(&JsValue::NULL, "", Some(path));
        }
    }
}

fn log(msg: &str) {
    web_sys::console::log_1(&format!("[Router] {}", msg).into());
}

/// 路由器服务
///
/// 通过注入的会话状态信号实现与认证系统的解耦。
#[derive(Clone, Copy)]
pub struct RouterService {
    /// 当前路由（只读信号）
    current_route: ReadSignal<AppRoute>,
    /// 设置当前路由（写入信号）
    set_route: WriteSignal<AppRoute>,
    /// 会话状态（注入的信号）
    status: Signal<SessionStatus>,
}

impl RouterService {
    fn new(status: Signal<SessionStatus>) -> Self {
        // 初始路由同样经过守卫，必要时替换地址栏
        let requested = AppRoute::from_path(&current_path());
        let (initial, _) = requested.resolve(status.get_untracked());
        if initial != requested {
            replace_history_state(initial.to_path());
        }
        let (current_route, set_route) = signal(initial);

        Self {
            current_route,
            set_route,
            status,
        }
    }

    /// 获取当前路由信号
    pub fn current_route(&self) -> ReadSignal<AppRoute> {
        self.current_route
    }

    /// 当前路由的守卫结果，会话状态变化时自动更新
    pub fn decision(&self) -> Memo<GuardDecision> {
        let current_route = self.current_route;
        let status = self.status;
        Memo::new(move |_| current_route.get().guard(status.get()))
    }

    /// **核心方法：导航与守卫**
    pub fn navigate(&self, route: AppRoute) {
        self.navigate_to_route(route, true);
    }

    /// 导航到指定路由
    ///
    /// # Arguments
    /// * `target_route` - 目标路由
    /// * `use_push` - true 使用 pushState, false 使用 replaceState
    fn navigate_to_route(&self, target_route: AppRoute, use_push: bool) {
        let (resolved, _) = target_route.resolve(self.status.get_untracked());
        if resolved != target_route {
            log(&format!("{} redirected to {}", target_route, resolved));
        }

        if use_push {
            push_history_state(resolved.to_path());
        } else {
            replace_history_state(resolved.to_path());
        }
        self.set_route.set(resolved);
    }

    /// 初始化浏览器后退/前进按钮监听
    fn init_popstate_listener(&self) {
        let router = *self;

        let closure = Closure::<dyn Fn()>::new(move || {
            let target_route = AppRoute::from_path(&current_path());
            // popstate 时也执行守卫逻辑
            router.navigate_to_route(target_route, false);
        });

        if let Some(window) = web_sys::window() {
            let _ = window
                .add_event_listener_with_callback("popstate", closure.as_ref().unchecked_ref());
        }

        // 泄漏闭包以保持监听器存活
        closure.forget();
    }

    /// 会话状态变化时重新执行守卫
    fn setup_auth_redirect(&self) {
        let current_route = self.current_route;
        let set_route = self.set_route;
        let status = self.status;

        Effect::new(move |_| {
            let status = status.get();
            let route = current_route.get_untracked();
            let (resolved, _) = route.resolve(status);

            if resolved != route {
                push_history_state(resolved.to_path());
                set_route.set(resolved);
                log(&format!(
                    "Session is now {:?}, redirecting to {}",
                    status, resolved
                ));
            }
        });
    }
}

/// 提供路由服务到 Context 并初始化
fn provide_router(status: Signal<SessionStatus>) -> RouterService {
    let router = RouterService::new(status);

    router.init_popstate_listener();
    router.setup_auth_redirect();

    provide_context(router);
    router
}

/// 从 Context 获取路由服务
pub fn use_router() -> RouterService {
    use_context::<RouterService>()
        .expect("RouterService not found in context. Ensure Router is provided.")
}

// ============================================================================
// UI 组件
// ============================================================================

/// 路由器根组件
#[component]
pub fn Router(
    /// 会话状态信号
    status: Signal<SessionStatus>,
    /// 子组件
    children: Children,
) -> impl IntoView {
    provide_router(status);

    children()
}

/// 路由出口组件
///
/// 守卫放行时渲染匹配的组件；会话恢复期间只显示加载占位。
#[component]
pub fn RouterOutlet(
    /// 路由匹配函数：接收当前路由，返回对应视图
    matcher: fn(AppRoute) -> AnyView,
) -> impl IntoView {
    let router = use_router();
    let decision = router.decision();

    move || match decision.get() {
        GuardDecision::Allow => matcher(router.current_route().get()),
        GuardDecision::Pending | GuardDecision::Redirect(_) => view! {
            <div class="flex items-center justify-center min-h-screen">
                <span class="loading loading-spinner loading-lg text-primary"></span>
            </div>
        }
        .into_any(),
    }
}

/// 站内链接，点击时走 History API 而不是整页跳转
#[component]
pub fn Link(
    /// 目标路由
    to: AppRoute,
    /// CSS 类名
    #[prop(into, optional)]
    class: String,
    /// 子内容
    children: Children,
) -> impl IntoView {
    let router = use_router();

    let on_click = move |ev: leptos::ev::MouseEvent| {
        ev.prevent_default();
        router.navigate(to);
    };

    view! {
        <a href=to.to_path() class=class on:click=on_click>
            {children()}
        </a>
    }
}
