use std::net::SocketAddr;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    /// Bearer tokens accepted by the HTTP API. Empty disables auth (development only).
    pub api_keys: Vec<String>,
    pub render_timeout_secs: u64,
    pub render_user_agent: String,
    pub render_max_retries: u32,
    pub render_backoff_base_ms: u64,
    pub rate_limit_per_minute: usize,
}

impl AppConfig {
    #[must_use]
    pub fn is_development(&self) -> bool {
        self.env == Environment::Development
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field(
                "api_keys",
                &format_args!("[{} redacted]", self.api_keys.len()),
            )
            .field("render_timeout_secs", &self.render_timeout_secs)
            .field("render_user_agent", &self.render_user_agent)
            .field("render_max_retries", &self.render_max_retries)
            .field("render_backoff_base_ms", &self.render_backoff_base_ms)
            .field("rate_limit_per_minute", &self.rate_limit_per_minute)
            .finish()
    }
}
