//! 视图模型
//!
//! 每个页面的本地状态与状态迁移。状态只属于挂载中的视图，不跨页面共享；
//! 请求失败时状态保持调用前的样子，只产生一条通知。

pub mod datasets;
pub mod kpis;
pub mod profile;
pub mod upload;

use crate::error::DashError;
use crate::notify::Toast;

/// 把请求失败转为通知；会话失效由全局统一提示，这里不重复
pub fn failure_toast(err: &DashError, title: &str, fallback: &str) -> Option<Toast> {
    if err.is_session_expired() {
        return None;
    }
    Some(Toast::error(title, err.user_message(fallback)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_expired_has_no_local_toast() {
        assert!(failure_toast(&DashError::session_expired(), "Error", "x").is_none());

        let toast = failure_toast(&DashError::network("down"), "Error", "Failed").unwrap();
        assert_eq!(toast.message, "Failed");
    }
}
