/// Default open-platform API root.
pub const DEFAULT_BASE_URL: &str = "https://open.feishu.cn/open-apis";

/// Default column holding the like counter.
pub const DEFAULT_COUNT_FIELD: &str = "点赞计数";

/// Connection settings for the upstream record store.
#[derive(Debug, Clone)]
pub struct UpstreamConfig {
    /// API root, e.g. "https://open.feishu.cn/open-apis".
    pub base_url: String,
    pub app_id: String,
    pub app_secret: String,
    /// Identifier of the base document holding the counter table.
    pub app_token: String,
    pub table_id: String,
    /// Column of the counter record that stores the value.
    pub count_field: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
    /// Tokens are treated as expired this many seconds early.
    pub token_margin_secs: u64,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.into(),
            app_id: String::new(),
            app_secret: String::new(),
            app_token: String::new(),
            table_id: String::new(),
            count_field: DEFAULT_COUNT_FIELD.into(),
            timeout_secs: 30,
            token_margin_secs: 300,
        }
    }
}

impl UpstreamConfig {
    /// Creates a config from environment variables.
    ///
    /// Reads:
    /// - `BLANKTABLE_UPSTREAM_URL`: API root (default: open.feishu.cn)
    /// - `BLANKTABLE_APP_ID`, `BLANKTABLE_APP_SECRET`: app credentials
    /// - `BLANKTABLE_APP_TOKEN`, `BLANKTABLE_TABLE_ID`: counter table location
    /// - `BLANKTABLE_COUNT_FIELD`: counter column (default: 点赞计数)
    /// - `BLANKTABLE_UPSTREAM_TIMEOUT_SECS`: request timeout (default: 30)
    /// - `BLANKTABLE_TOKEN_MARGIN_SECS`: early token expiry (default: 300)
    ///
    /// Missing credentials are not an error here; upstream calls fail instead.
    pub fn from_env() -> Self {
        let default = Self::default();
        let var = |name: &str| std::env::var(name).ok().filter(|v| !v.is_empty());

        Self {
            base_url: var("BLANKTABLE_UPSTREAM_URL").unwrap_or(default.base_url),
            app_id: var("BLANKTABLE_APP_ID").unwrap_or_default(),
            app_secret: var("BLANKTABLE_APP_SECRET").unwrap_or_default(),
            app_token: var("BLANKTABLE_APP_TOKEN").unwrap_or_default(),
            table_id: var("BLANKTABLE_TABLE_ID").unwrap_or_default(),
            count_field: var("BLANKTABLE_COUNT_FIELD").unwrap_or(default.count_field),
            timeout_secs: var("BLANKTABLE_UPSTREAM_TIMEOUT_SECS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(default.timeout_secs),
            token_margin_secs: var("BLANKTABLE_TOKEN_MARGIN_SECS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(default.token_margin_secs),
        }
    }

    /// Names of required settings that are empty.
    pub fn missing_settings(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.app_id.is_empty() {
            missing.push("BLANKTABLE_APP_ID");
        }
        if self.app_secret.is_empty() {
            missing.push("BLANKTABLE_APP_SECRET");
        }
        if self.app_token.is_empty() {
            missing.push("BLANKTABLE_APP_TOKEN");
        }
        if self.table_id.is_empty() {
            missing.push("BLANKTABLE_TABLE_ID");
        }
        missing
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = UpstreamConfig::default();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.count_field, "点赞计数");
        assert_eq!(config.timeout_secs, 30);
        assert_eq!(config.token_margin_secs, 300);
    }

    #[test]
    fn test_missing_settings() {
        let config = UpstreamConfig {
            app_id: "cli_a".into(),
            table_id: "tbl".into(),
            ..Default::default()
        };
        assert_eq!(
            config.missing_settings(),
            vec!["BLANKTABLE_APP_SECRET", "BLANKTABLE_APP_TOKEN"]
        );
    }

    #[test]
    fn test_from_env_with_custom_values() {
        std::env::set_var("BLANKTABLE_UPSTREAM_URL", "http://127.0.0.1:9000");
        std::env::set_var("BLANKTABLE_APP_ID", "cli_test");
        std::env::set_var("BLANKTABLE_UPSTREAM_TIMEOUT_SECS", "not_a_number");

        let config = UpstreamConfig::from_env();
        assert_eq!(config.base_url, "http://127.0.0.1:9000");
        assert_eq!(config.app_id, "cli_test");
        assert_eq!(config.timeout_secs, 30);

        // Clean up
        std::env::remove_var("BLANKTABLE_UPSTREAM_URL");
        std::env::remove_var("BLANKTABLE_APP_ID");
        std::env::remove_var("BLANKTABLE_UPSTREAM_TIMEOUT_SECS");
    }
}
