//! 令牌持久化抽象
//!
//! 浏览器端由 LocalStorage 实现，这里只提供内存实现（测试、以及
//! 浏览器禁用存储时的退路）。

use crate::error::{DashError, DashResult};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// 单个令牌槽位的持久化存储
pub trait TokenStorage {
    fn get(&self) -> Option<String>;
    fn set(&self, token: &str) -> DashResult<()>;
    fn remove(&self);
}

/// 内存令牌存储
///
/// Clone 之后共享同一个槽位。
#[derive(Clone, Default)]
pub struct MemoryTokenStorage {
    slot: Rc<RefCell<Option<String>>>,
    read_only: Rc<Cell<bool>>,
}

impl MemoryTokenStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: &str) -> Self {
        let storage = Self::new();
        *storage.slot.borrow_mut() = Some(token.to_string());
        storage
    }

    /// 之后的写入全部失败，模拟配额耗尽或隐私模式
    pub fn set_read_only(&self, read_only: bool) {
        self.read_only.set(read_only);
    }
}

impl TokenStorage for MemoryTokenStorage {
    fn get(&self) -> Option<String> {
        self.slot.borrow().clone()
    }

    fn set(&self, token: &str) -> DashResult<()> {
        if self.read_only.get() {
            return Err(DashError::storage("token storage is read-only").in_op("storage.set"));
        }
        *self.slot.borrow_mut() = Some(token.to_string());
        Ok(())
    }

    fn remove(&self) {
        self.slot.borrow_mut().take();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_slot() {
        let storage = MemoryTokenStorage::new();
        let other = storage.clone();
        storage.set("abc").unwrap();
        assert_eq!(other.get().as_deref(), Some("abc"));
        other.remove();
        assert!(storage.get().is_none());
    }

    #[test]
    fn test_read_only_rejects_writes() {
        let storage = MemoryTokenStorage::with_token("old");
        storage.set_read_only(true);
        assert!(storage.set("new").is_err());
        assert_eq!(storage.get().as_deref(), Some("old"));
    }
}
