//! 会话存储
//!
//! "谁已登录" 的唯一来源。令牌写入持久化存储与内存中用户状态的更新
//! 在同一步完成；写入失败时内存状态保持不变。

use crate::error::DashResult;
use crate::storage::TokenStorage;
use bidash_shared::User;
use std::cell::RefCell;
use std::rc::Rc;
use uuid::Uuid;

/// 会话状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    /// 有持久化令牌，正在向后端校验
    Restoring,
    Authenticated,
    Anonymous,
}

/// 会话变化事件
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    SignedIn(User),
    Restored(User),
    /// 启动时令牌无效，已静默清除
    RestoreFailed,
    SignedOut,
    /// 已登录会话收到 401
    Expired,
}

type Listener = Rc<dyn Fn(&SessionEvent)>;

struct SessionState {
    status: SessionStatus,
    user: Option<User>,
}

struct SessionInner<S> {
    storage: S,
    state: RefCell<SessionState>,
    listeners: RefCell<Vec<(Uuid, Listener)>>,
}

/// 会话服务，Clone 后共享同一份状态
pub struct Session<S: TokenStorage> {
    inner: Rc<SessionInner<S>>,
}

impl<S: TokenStorage> Clone for Session<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<S: TokenStorage> Session<S> {
    pub fn new(storage: S) -> Self {
        let status = if storage.get().is_some() {
            SessionStatus::Restoring
        } else {
            SessionStatus::Anonymous
        };

        Self {
            inner: Rc::new(SessionInner {
                storage,
                state: RefCell::new(SessionState { status, user: None }),
                listeners: RefCell::new(Vec::new()),
            }),
        }
    }

    pub fn status(&self) -> SessionStatus {
        self.inner.state.borrow().status
    }

    pub fn user(&self) -> Option<User> {
        self.inner.state.borrow().user.clone()
    }

    /// 当前持久化的令牌，每次请求都重新读取
    pub fn token(&self) -> Option<String> {
        self.inner.storage.get()
    }

    pub fn is_authenticated(&self) -> bool {
        self.status() == SessionStatus::Authenticated
    }

    // --- 状态变更 ---

    /// 登录 / 注册成功后建立会话
    pub fn establish(&self, token: &str, user: User) -> DashResult<()> {
        self.inner
            .storage
            .set(token)
            .map_err(|e| e.in_op("session.establish"))?;

        self.set_state(SessionStatus::Authenticated, Some(user.clone()));
        log_info!("[Session] Signed in as {}", user.email);
        self.emit(&SessionEvent::SignedIn(user));
        Ok(())
    }

    /// 启动恢复成功
    pub fn restore_succeeded(&self, user: User) {
        if self.status() != SessionStatus::Restoring {
            return;
        }
        self.set_state(SessionStatus::Authenticated, Some(user.clone()));
        log_info!("[Session] Restored session for {}", user.email);
        self.emit(&SessionEvent::Restored(user));
    }

    /// 启动恢复失败：静默清除令牌
    pub fn restore_failed(&self) {
        if self.status() != SessionStatus::Restoring {
            return;
        }
        self.inner.storage.remove();
        self.set_state(SessionStatus::Anonymous, None);
        log_info!("[Session] Stored token rejected, continuing anonymously");
        self.emit(&SessionEvent::RestoreFailed);
    }

    /// 注销，不访问后端
    pub fn clear(&self) {
        self.inner.storage.remove();
        self.set_state(SessionStatus::Anonymous, None);
        log_info!("[Session] Signed out");
        self.emit(&SessionEvent::SignedOut);
    }

    /// 401 拦截入口
    ///
    /// 只有请求携带的令牌仍是当前令牌时才拆除会话，旧令牌的迟到响应
    /// 不会影响之后新建立的会话。返回是否拆除了会话。
    pub fn expire(&self, attached_token: Option<&str>) -> bool {
        let Some(attached) = attached_token else {
            return false;
        };
        if self.token().as_deref() != Some(attached) {
            return false;
        }

        let previous = self.status();
        self.inner.storage.remove();
        self.set_state(SessionStatus::Anonymous, None);

        match previous {
            SessionStatus::Authenticated => {
                log_info!("[Session] Session expired");
                self.emit(&SessionEvent::Expired);
            }
            SessionStatus::Restoring => self.emit(&SessionEvent::RestoreFailed),
            SessionStatus::Anonymous => {}
        }
        true
    }

    fn set_state(&self, status: SessionStatus, user: Option<User>) {
        let mut state = self.inner.state.borrow_mut();
        state.status = status;
        state.user = user;
    }

    // --- 订阅 ---

    pub fn subscribe(&self, listener: impl Fn(&SessionEvent) + 'static) -> Uuid {
        let id = Uuid::new_v4();
        self.inner
            .listeners
            .borrow_mut()
            .push((id, Rc::new(listener)));
        id
    }

    pub fn unsubscribe(&self, id: Uuid) -> bool {
        let mut listeners = self.inner.listeners.borrow_mut();
        let before = listeners.len();
        listeners.retain(|(lid, _)| *lid != id);
        listeners.len() != before
    }

    fn emit(&self, event: &SessionEvent) {
        // 先复制一份，监听器里可以再读写会话
        let listeners: Vec<Listener> = self
            .inner
            .listeners
            .borrow()
            .iter()
            .map(|(_, l)| Rc::clone(l))
            .collect();
        for listener in listeners {
            listener(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryTokenStorage;

    fn user() -> User {
        User {
            id: "u1".into(),
            email: "ann@example.com".into(),
            name: "Ann".into(),
        }
    }

    fn recorded(session: &Session<MemoryTokenStorage>) -> Rc<RefCell<Vec<SessionEvent>>> {
        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&events);
        session.subscribe(move |e| sink.borrow_mut().push(e.clone()));
        events
    }

    #[test]
    fn test_initial_status_follows_storage() {
        let session = Session::new(MemoryTokenStorage::new());
        assert_eq!(session.status(), SessionStatus::Anonymous);

        let session = Session::new(MemoryTokenStorage::with_token("t"));
        assert_eq!(session.status(), SessionStatus::Restoring);
        assert!(session.user().is_none());
    }

    #[test]
    fn test_establish_persists_and_notifies() {
        let storage = MemoryTokenStorage::new();
        let session = Session::new(storage.clone());
        let events = recorded(&session);

        session.establish("tok", user()).unwrap();

        assert_eq!(storage.get().as_deref(), Some("tok"));
        assert_eq!(session.user(), Some(user()));
        assert!(session.is_authenticated());
        assert_eq!(*events.borrow(), vec![SessionEvent::SignedIn(user())]);
    }

    #[test]
    fn test_establish_storage_failure_leaves_state() {
        let storage = MemoryTokenStorage::new();
        storage.set_read_only(true);
        let session = Session::new(storage);
        let events = recorded(&session);

        assert!(session.establish("tok", user()).is_err());
        assert_eq!(session.status(), SessionStatus::Anonymous);
        assert!(session.user().is_none());
        assert!(events.borrow().is_empty());
    }

    #[test]
    fn test_expire_ignores_stale_token() {
        let storage = MemoryTokenStorage::new();
        let session = Session::new(storage.clone());
        session.establish("new", user()).unwrap();
        let events = recorded(&session);

        assert!(!session.expire(Some("old")));
        assert!(!session.expire(None));
        assert!(session.is_authenticated());

        assert!(session.expire(Some("new")));
        assert!(storage.get().is_none());
        assert!(session.user().is_none());
        assert_eq!(*events.borrow(), vec![SessionEvent::Expired]);
    }

    #[test]
    fn test_restore_failure_is_silent_and_idempotent() {
        let storage = MemoryTokenStorage::with_token("t");
        let session = Session::new(storage.clone());
        let events = recorded(&session);

        assert!(session.expire(Some("t")));
        session.restore_failed();

        assert!(storage.get().is_none());
        assert_eq!(session.status(), SessionStatus::Anonymous);
        assert_eq!(*events.borrow(), vec![SessionEvent::RestoreFailed]);
    }

    #[test]
    fn test_unsubscribe_and_reentrant_listener() {
        let session = Session::new(MemoryTokenStorage::new());
        let seen = Rc::new(RefCell::new(None));
        let sink = Rc::clone(&seen);
        let inner = session.clone();
        let id = session.subscribe(move |_| {
            *sink.borrow_mut() = Some(inner.status());
        });

        session.establish("tok", user()).unwrap();
        assert_eq!(*seen.borrow(), Some(SessionStatus::Authenticated));

        assert!(session.unsubscribe(id));
        assert!(!session.unsubscribe(id));
        session.clear();
        assert_eq!(*seen.borrow(), Some(SessionStatus::Authenticated));
    }
}
