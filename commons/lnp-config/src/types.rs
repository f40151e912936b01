use std::time::Duration;

use envconfig::Envconfig;

pub const DEFAULT_API_URL: &str = "https://api.linode.com";
pub const DEFAULT_API_VERSION: &str = "v4";

/// Provider-level settings, read from the same environment variables the
/// Linode CLI and SDKs use.
#[derive(Envconfig, Clone)]
pub struct ProviderConfig {
    /// Personal access token used as a bearer credential.
    /// Env: LINODE_TOKEN
    #[envconfig(from = "LINODE_TOKEN")]
    pub token: Option<String>,

    #[envconfig(from = "LINODE_URL", default = "https://api.linode.com")]
    pub api_url: String,

    #[envconfig(from = "LINODE_API_VERSION", default = "v4")]
    pub api_version: String,

    /// Prepended to the client user agent, e.g. "terraform/1.9".
    /// Env: LINODE_UA_PREFIX
    #[envconfig(from = "LINODE_UA_PREFIX")]
    pub ua_prefix: Option<String>,

    #[envconfig(from = "LINODE_HTTP_TIMEOUT_SECS", default = "30")]
    pub http_timeout_secs: u64,

    #[envconfig(nested)]
    pub lke: LkeConfig,
}

#[derive(Envconfig, Clone, Debug, PartialEq, Eq)]
pub struct LkeConfig {
    /// Period between readiness checks.
    /// Env: LINODE_LKE_NODE_READY_POLL_MS
    #[envconfig(from = "LINODE_LKE_NODE_READY_POLL_MS", default = "3000")]
    pub node_ready_poll_ms: u64,

    /// Upper bound on a full cluster readiness wait.
    /// Env: LINODE_LKE_WAIT_TIMEOUT_SECS
    #[envconfig(from = "LINODE_LKE_WAIT_TIMEOUT_SECS", default = "900")]
    pub wait_timeout_secs: u64,
}

impl Default for LkeConfig {
    fn default() -> Self {
        Self {
            node_ready_poll_ms: 3000,
            wait_timeout_secs: 15 * 60,
        }
    }
}

impl LkeConfig {
    pub fn node_ready_poll(&self) -> Duration {
        Duration::from_millis(self.node_ready_poll_ms)
    }

    /// `None` when the timeout is configured as zero, meaning no deadline.
    pub fn wait_timeout(&self) -> Option<Duration> {
        (self.wait_timeout_secs > 0)
            .then(|| Duration::from_secs(self.wait_timeout_secs))
    }
}

impl ProviderConfig {
    /// Versioned API root, e.g. `https://api.linode.com/v4`.
    pub fn base_url(&self) -> String {
        let url = self.api_url.trim_end_matches('/');
        let version = self.api_version.trim_matches('/');
        if version.is_empty() {
            url.to_string()
        } else {
            format!("{url}/{version}")
        }
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            token: None,
            api_url: DEFAULT_API_URL.to_string(),
            api_version: DEFAULT_API_VERSION.to_string(),
            ua_prefix: None,
            http_timeout_secs: 30,
            lke: LkeConfig::default(),
        }
    }
}

// Keep the token out of logs.
impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("api_url", &self.api_url)
            .field("api_version", &self.api_version)
            .field("ua_prefix", &self.ua_prefix)
            .field("http_timeout_secs", &self.http_timeout_secs)
            .field("lke", &self.lke)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn defaults_from_empty_env() {
        let cfg = ProviderConfig::init_from_hashmap(&HashMap::new()).unwrap();
        assert_eq!(cfg.token, None);
        assert_eq!(cfg.base_url(), "https://api.linode.com/v4");
        assert_eq!(cfg.http_timeout(), Duration::from_secs(30));
        assert_eq!(cfg.lke, LkeConfig::default());
        assert_eq!(cfg.lke.node_ready_poll(), Duration::from_secs(3));
        assert_eq!(cfg.lke.wait_timeout(), Some(Duration::from_secs(900)));
    }

    #[test]
    fn overrides_from_env() {
        let env: HashMap<String, String> = [
            ("LINODE_TOKEN", "secret"),
            ("LINODE_URL", "http://localhost:8080/"),
            ("LINODE_API_VERSION", "v4beta"),
            ("LINODE_LKE_NODE_READY_POLL_MS", "250"),
            ("LINODE_LKE_WAIT_TIMEOUT_SECS", "0"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        let cfg = ProviderConfig::init_from_hashmap(&env).unwrap();
        assert_eq!(cfg.token.as_deref(), Some("secret"));
        assert_eq!(cfg.base_url(), "http://localhost:8080/v4beta");
        assert_eq!(cfg.lke.node_ready_poll(), Duration::from_millis(250));
        assert_eq!(cfg.lke.wait_timeout(), None);
    }

    #[test]
    fn debug_redacts_token() {
        let cfg = ProviderConfig {
            token: Some("secret".into()),
            ..Default::default()
        };
        let out = format!("{cfg:?}");
        assert!(!out.contains("secret"));
        assert!(out.contains("<redacted>"));
    }

    #[test]
    fn empty_version_keeps_bare_url() {
        let cfg = ProviderConfig {
            api_url: "http://127.0.0.1:1".into(),
            api_version: String::new(),
            ..Default::default()
        };
        assert_eq!(cfg.base_url(), "http://127.0.0.1:1");
    }
}
