//! LocalStorage 令牌存储
//!
//! 使用 `web_sys::Storage` 读写固定键名下的令牌。浏览器禁用存储时
//! （隐私模式等）退回到内存存储，会话只在当前页面有效。

use bidash::{DashError, DashResult, MemoryTokenStorage, TokenStorage};

pub struct BrowserTokenStorage {
    key: String,
    fallback: MemoryTokenStorage,
}

impl BrowserTokenStorage {
    pub fn new(key: &str) -> Self {
        if Self::storage().is_none() {
            web_sys::console::warn_1(&"[Storage] LocalStorage unavailable, using memory".into());
        }
        Self {
            key: key.to_string(),
            fallback: MemoryTokenStorage::new(),
        }
    }

    /// 获取 LocalStorage 实例
    fn storage() -> Option<web_sys::Storage> {
        web_sys::window()?.local_storage().ok()?
    }
}

impl TokenStorage for BrowserTokenStorage {
    fn get(&self) -> Option<String> {
        match Self::storage() {
            Some(s) => s.get_item(&self.key).ok().flatten(),
            None => self.fallback.get(),
        }
    }

    fn set(&self, token: &str) -> DashResult<()> {
        match Self::storage() {
            Some(s) => s.set_item(&self.key, token).map_err(|e| {
                DashError::storage("could not persist token")
                    .in_op_with("storage.set", format!("{:?}", e))
            }),
            None => self.fallback.set(token),
        }
    }

    fn remove(&self) {
        match Self::storage() {
            Some(s) => {
                let _ = s.remove_item(&self.key);
            }
            None => self.fallback.remove(),
        }
    }
}
