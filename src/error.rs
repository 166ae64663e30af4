use std::fmt;

// =========================================================
// 错误类型枚举
// =========================================================

/// 错误类型枚举
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DashErrorKind {
    /// 凭据错误或会话失效
    Auth,
    /// 客户端校验失败（文件类型、密码规则），不会发出请求
    Validation,
    /// 请求失败或后端返回错误
    Network,
    /// 持久化存储不可用
    Storage,
}

impl DashErrorKind {
    pub fn error_code(&self) -> &'static str {
        match self {
            DashErrorKind::Auth => "AUTH_ERROR",
            DashErrorKind::Validation => "VALIDATION_ERROR",
            DashErrorKind::Network => "NETWORK_ERROR",
            DashErrorKind::Storage => "STORAGE_ERROR",
        }
    }
}

// =========================================================
// 错误上下文追踪
// =========================================================

/// 记录错误经过的操作，如 "api.dispatch", "auth.login"
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorSpan {
    pub operation: String,
    pub detail: Option<String>,
}

// =========================================================
// 核心错误类型
// =========================================================

/// 客户端领域错误
///
/// - kind: 错误类型
/// - message: 内部描述，用于日志
/// - status: HTTP 状态码（如果来自响应）
/// - detail: 后端返回的可读信息，优先展示给用户
/// - expired: 该错误是否使当前会话失效
#[derive(Debug, Clone)]
pub struct DashError {
    pub kind: DashErrorKind,
    pub message: String,
    status: Option<u16>,
    detail: Option<String>,
    expired: bool,
    spans: Vec<ErrorSpan>,
}

impl DashError {
    pub fn new(kind: DashErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            status: None,
            detail: None,
            expired: false,
            spans: Vec::new(),
        }
    }

    // --- Convenience constructors ---

    pub fn auth(message: impl Into<String>) -> Self {
        Self::new(DashErrorKind::Auth, message)
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(DashErrorKind::Validation, message)
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(DashErrorKind::Network, message)
    }

    pub fn storage(message: impl Into<String>) -> Self {
        Self::new(DashErrorKind::Storage, message)
    }

    /// 401 拦截后产生的错误，会话已经被清理
    pub fn session_expired() -> Self {
        let mut err = Self::auth("session expired").with_status(401);
        err.expired = true;
        err
    }

    // --- Context builders ---

    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_detail(mut self, detail: Option<String>) -> Self {
        self.detail = detail;
        self
    }

    /// 改变错误类型，保留其他上下文
    pub fn reclassify(mut self, kind: DashErrorKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn in_op(mut self, operation: impl Into<String>) -> Self {
        self.spans.push(ErrorSpan {
            operation: operation.into(),
            detail: None,
        });
        self
    }

    pub fn in_op_with(mut self, operation: impl Into<String>, detail: impl Into<String>) -> Self {
        self.spans.push(ErrorSpan {
            operation: operation.into(),
            detail: Some(detail.into()),
        });
        self
    }

    // --- Accessors ---

    pub fn error_code(&self) -> &'static str {
        self.kind.error_code()
    }

    pub fn status(&self) -> Option<u16> {
        self.status
    }

    pub fn detail(&self) -> Option<&str> {
        self.detail.as_deref()
    }

    pub fn spans(&self) -> &[ErrorSpan] {
        &self.spans
    }

    pub fn is_session_expired(&self) -> bool {
        self.expired
    }

    pub fn is_client_error(&self) -> bool {
        matches!(self.status, Some(400..=499))
    }

    /// 通知里展示的文字：校验错误用自身信息，其余优先后端 detail
    pub fn user_message(&self, fallback: &str) -> String {
        if self.kind == DashErrorKind::Validation {
            return self.message.clone();
        }
        self.detail
            .clone()
            .unwrap_or_else(|| fallback.to_string())
    }
}

// =========================================================
// Display & Error trait 实现
// =========================================================

impl fmt::Display for DashError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.error_code(), self.message)?;
        if let Some(status) = self.status {
            write!(f, " (status {})", status)?;
        }

        if !self.spans.is_empty() {
            write!(f, " | trace: ")?;
            for (i, span) in self.spans.iter().enumerate() {
                if i > 0 {
                    write!(f, " -> ")?;
                }
                write!(f, "{}", span.operation)?;
                if let Some(detail) = &span.detail {
                    write!(f, "({})", detail)?;
                }
            }
        }
        Ok(())
    }
}

impl std::error::Error for DashError {}

pub type DashResult<T> = std::result::Result<T, DashError>;
