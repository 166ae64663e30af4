//! 全局通知
//!
//! 队列本身是 `bidash::Notifier`，这里只负责放进信号并在 3 秒后自动关闭。

use bidash::{Notifier, Toast};
use gloo_timers::callback::Timeout;
use leptos::prelude::*;
use uuid::Uuid;

const AUTO_DISMISS_MS: u32 = 3_000;

#[derive(Clone, Copy)]
pub struct NotifyContext {
    toasts: RwSignal<Notifier>,
}

impl NotifyContext {
    pub fn new() -> Self {
        Self {
            toasts: RwSignal::new(Notifier::new()),
        }
    }

    pub fn push(&self, toast: Toast) {
        let toasts = self.toasts;
        let id = toasts.try_update(|n| n.push(toast));
        if let Some(id) = id {
            Timeout::new(AUTO_DISMISS_MS, move || {
                toasts.try_update(|n| n.dismiss(id));
            })
            .forget();
        }
    }

    pub fn push_opt(&self, toast: Option<Toast>) {
        if let Some(toast) = toast {
            self.push(toast);
        }
    }

    pub fn dismiss(&self, id: Uuid) {
        self.toasts.update(|n| {
            n.dismiss(id);
        });
    }

    pub fn toasts(&self) -> Signal<Vec<Toast>> {
        let toasts = self.toasts;
        Signal::derive(move || toasts.with(|n| n.toasts().to_vec()))
    }
}

/// 从 Context 获取通知上下文
pub fn use_notify() -> NotifyContext {
    use_context::<NotifyContext>().expect("NotifyContext should be provided")
}
