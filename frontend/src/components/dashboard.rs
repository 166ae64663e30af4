//! 面板布局：侧边栏 + 顶栏 + 内容区

use crate::auth::{logout, use_auth};
use crate::components::icons::*;
use crate::web::router::use_router;
use bidash::AppRoute;
use leptos::prelude::*;

fn section_icon(route: AppRoute) -> AnyView {
    match route {
        AppRoute::Kpis => view! { <BarChart3 attr:class="h-5 w-5" /> }.into_any(),
        AppRoute::Upload => view! { <UploadIcon attr:class="h-5 w-5" /> }.into_any(),
        AppRoute::Profile => view! { <UserIcon attr:class="h-5 w-5" /> }.into_any(),
        _ => view! { <Database attr:class="h-5 w-5" /> }.into_any(),
    }
}

/// 面板各分区的导航项，侧边栏与窄屏菜单共用
#[component]
fn NavItems() -> impl IntoView {
    let router = use_router();
    let current = router.current_route();

    AppRoute::dashboard_sections()
        .into_iter()
        .map(|route| {
            let on_click = move |ev: leptos::ev::MouseEvent| {
                ev.prevent_default();
                router.navigate(route);
            };
            view! {
                <li>
                    <a
                        href=route.to_path()
                        class=move || if current.get() == route { "active" } else { "" }
                        on:click=on_click
                    >
                        {section_icon(route)}
                        {route.label()}
                    </a>
                </li>
            }
        })
        .collect_view()
}

#[component]
fn Sidebar() -> impl IntoView {
    view! {
        <aside class="w-64 min-h-screen bg-base-100 border-r border-base-300 hidden md:flex flex-col">
            <div class="flex items-center gap-3 p-6">
                <div class="p-2 bg-primary rounded-lg text-primary-content">
                    <BarChart3 attr:class="h-6 w-6" />
                </div>
                <div>
                    <h1 class="text-xl font-bold">"AI-BI"</h1>
                    <p class="text-xs text-base-content/60">"Business Intelligence"</p>
                </div>
            </div>
            <ul class="menu gap-1 px-4">
                <NavItems />
            </ul>
        </aside>
    }
}

#[component]
fn TopBar() -> impl IntoView {
    let auth = use_auth();
    let welcome = move || {
        auth.user
            .get()
            .map(|u| format!("Welcome, {}", u.display_name()))
            .unwrap_or_default()
    };

    view! {
        <div class="navbar bg-base-100 border-b border-base-300 px-6">
            <div class="flex-1 gap-2">
                // 窄屏下侧边栏隐藏，导航收进下拉菜单
                <div class="dropdown md:hidden">
                    <div tabindex="0" role="button" class="btn btn-ghost btn-sm" aria-label="Menu">
                        <BarChart3 attr:class="h-5 w-5" />
                    </div>
                    <ul tabindex="0" class="menu dropdown-content bg-base-100 rounded-box z-10 mt-3 w-52 p-2 shadow">
                        <NavItems />
                    </ul>
                </div>
                <span class="text-lg font-semibold">"AI-BI Dashboard"</span>
            </div>
            <div class="flex-none gap-4">
                <span class="text-sm text-base-content/70 hidden sm:inline">{welcome}</span>
                <button on:click=move |_| logout(&auth) class="btn btn-outline btn-sm gap-2">
                    <LogOut attr:class="h-4 w-4" /> "Logout"
                </button>
            </div>
        </div>
    }
}

/// 面板页面外壳
#[component]
pub fn DashboardLayout(children: Children) -> impl IntoView {
    view! {
        <div class="flex min-h-screen bg-base-200 font-sans">
            <Sidebar />
            <div class="flex-1 flex flex-col">
                <TopBar />
                <main class="flex-1 p-4 md:p-8">
                    <div class="max-w-7xl mx-auto">{children()}</div>
                </main>
            </div>
        </div>
    }
}
