use std::time::Duration;

/// Default per-request timeout (§5 "Cancellation/timeouts").
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Environment variable names the CLI layer falls back to when a flag is
/// not given explicitly (§6 "CLI/env surface", §9's "static mutable RPC
/// configuration" redesign flag: this value, not a process-global, is
/// what gets threaded through scans and builds).
pub const ENV_NODE_URL: &str = "SV_NODE_URL";
pub const ENV_NODE_USER: &str = "SV_NODE_USER";
pub const ENV_NODE_PASSWORD: &str = "SV_NODE_PASSWORD";

/// Connection parameters for one trusted remote node (§7, §9). Replaces
/// the teacher's static/global RPC configuration with an explicit value
/// constructed once at wallet instantiation and passed by reference into
/// every scan and build.
#[derive(Debug, Clone)]
pub struct RpcConfig {
    pub url: String,
    pub user: Option<String>,
    pub password: Option<String>,
    pub timeout: Duration,
}

impl RpcConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            user: None,
            password: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_auth(mut self, user: impl Into<String>, password: impl Into<String>) -> Self {
        self.user = Some(user.into());
        self.password = Some(password.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}
