//! 视图生命周期与请求票据
//!
//! 请求无法取消，所以每个请求先领一张票据；响应回来时只有票据仍然有效
//! （视图未卸载，且同一通道没有更新的请求）才写入视图状态。

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

#[derive(Default)]
struct LifetimeInner {
    ended: Cell<bool>,
    generations: RefCell<HashMap<&'static str, u64>>,
}

/// 一个挂载中的视图
#[derive(Clone, Default)]
pub struct ViewLifetime {
    inner: Rc<LifetimeInner>,
}

impl ViewLifetime {
    pub fn new() -> Self {
        Self::default()
    }

    /// 领取指定通道的新票据，同通道旧票据随即失效
    pub fn ticket(&self, channel: &'static str) -> Ticket {
        let mut generations = self.inner.generations.borrow_mut();
        let generation = generations.entry(channel).or_insert(0);
        *generation += 1;

        Ticket {
            lifetime: self.clone(),
            channel,
            generation: *generation,
        }
    }

    /// 视图卸载
    pub fn end(&self) {
        self.inner.ended.set(true);
    }

    pub fn is_alive(&self) -> bool {
        !self.inner.ended.get()
    }
}

/// 单个请求的票据
#[derive(Clone)]
pub struct Ticket {
    lifetime: ViewLifetime,
    channel: &'static str,
    generation: u64,
}

impl Ticket {
    pub fn is_current(&self) -> bool {
        self.lifetime.is_alive()
            && self
                .lifetime
                .inner
                .generations
                .borrow()
                .get(self.channel)
                .is_some_and(|g| *g == self.generation)
    }

    /// 票据有效时放行结果，否则丢弃
    pub fn accept<T>(&self, value: T) -> Option<T> {
        if self.is_current() {
            Some(value)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_newer_ticket_supersedes_same_channel_only() {
        let lifetime = ViewLifetime::new();
        let first = lifetime.ticket("detail");
        let list = lifetime.ticket("list");
        let second = lifetime.ticket("detail");

        assert!(!first.is_current());
        assert!(second.is_current());
        assert!(list.is_current());
        assert_eq!(first.accept(1), None);
        assert_eq!(second.accept(2), Some(2));
    }

    #[test]
    fn test_ended_view_rejects_everything() {
        let lifetime = ViewLifetime::new();
        let ticket = lifetime.ticket("list");
        lifetime.end();

        assert!(!lifetime.is_alive());
        assert!(ticket.accept("late").is_none());
    }
}
