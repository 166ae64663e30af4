// =========================================================
// 客户端配置 (Client Configuration)
// =========================================================

/// 默认后端地址，构建时未设置 `BIDASH_API_URL` 时使用
pub const DEFAULT_API_URL: &str = "http://localhost:8000";
/// 令牌在持久化存储中的键名
pub const DEFAULT_TOKEN_KEY: &str = "token";

/// 客户端配置
///
/// 浏览器里读不到进程环境变量，所以 `BIDASH_API_URL` 在编译期通过
/// `option_env!` 注入；页面还可以在运行时用 `with_api_base_url` 覆盖。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub api_base_url: String,
    pub token_key: String,
}

impl ClientConfig {
    pub fn new() -> Self {
        Self::from_env_value(option_env!("BIDASH_API_URL"))
    }

    fn from_env_value(value: Option<&str>) -> Self {
        let api_base_url = value
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .unwrap_or(DEFAULT_API_URL);

        Self {
            api_base_url: normalize_base_url(api_base_url),
            token_key: DEFAULT_TOKEN_KEY.to_string(),
        }
    }

    /// 运行时覆盖后端地址，空字符串不生效
    pub fn with_api_base_url(mut self, url: &str) -> Self {
        if !url.trim().is_empty() {
            self.api_base_url = normalize_base_url(url.trim());
        }
        self
    }

    /// 拼接完整的请求地址
    pub fn endpoint(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.api_base_url, path)
        } else {
            format!("{}/{}", self.api_base_url, path)
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new()
    }
}

fn normalize_base_url(url: &str) -> String {
    url.trim_end_matches('/').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_when_env_missing_or_blank() {
        assert_eq!(ClientConfig::from_env_value(None).api_base_url, DEFAULT_API_URL);
        assert_eq!(
            ClientConfig::from_env_value(Some("  ")).api_base_url,
            DEFAULT_API_URL
        );
        assert_eq!(ClientConfig::from_env_value(None).token_key, "token");
    }

    #[test]
    fn test_env_and_runtime_override_trim_slashes() {
        let cfg = ClientConfig::from_env_value(Some("https://api.example.com/"));
        assert_eq!(cfg.api_base_url, "https://api.example.com");

        let cfg = cfg.with_api_base_url("http://127.0.0.1:9000//");
        assert_eq!(cfg.endpoint("/datasets"), "http://127.0.0.1:9000/datasets");
        assert_eq!(cfg.endpoint("datasets"), "http://127.0.0.1:9000/datasets");

        let cfg = cfg.with_api_base_url("");
        assert_eq!(cfg.api_base_url, "http://127.0.0.1:9000");
    }
}
