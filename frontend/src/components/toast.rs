use crate::notify::use_notify;
use bidash::ToastKind;
use leptos::prelude::*;

/// 右上角通知栈
#[component]
pub fn ToastHost() -> impl IntoView {
    let notify = use_notify();
    let toasts = notify.toasts();

    view! {
        <div class="toast toast-top toast-end z-50">
            <For
                each=move || toasts.get()
                key=|t| t.id
                children=move |toast| {
                    let id = toast.id;
                    let class = match toast.kind {
                        ToastKind::Success => "alert alert-success shadow-lg",
                        ToastKind::Error => "alert alert-error shadow-lg",
                        ToastKind::Info => "alert alert-info shadow-lg",
                    };
                    view! {
                        <div role="alert" class=class>
                            <div class="flex flex-col">
                                <span class="font-semibold">{toast.title}</span>
                                <span class="text-sm">{toast.message}</span>
                            </div>
                            <button
                                class="btn btn-ghost btn-xs btn-circle"
                                aria-label="Dismiss"
                                on:click=move |_| notify.dismiss(id)
                            >
                                "✕"
                            </button>
                        </div>
                    }
                }
            />
        </div>
    }
}
