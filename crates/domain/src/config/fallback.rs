use serde::Deserialize;

/// Upstream (fallback) resolver settings.
#[derive(Debug, Clone, Deserialize)]
pub struct FallbackConfig {
    /// Resolver configuration file listing upstream nameservers.
    #[serde(default = "default_resolv_conf_path")]
    pub resolv_conf_path: String,

    /// Explicit upstreams; when non-empty the resolv.conf file is ignored.
    #[serde(default)]
    pub upstream_servers: Vec<String>,

    /// Per-attempt timeout in seconds.
    #[serde(default = "default_query_timeout")]
    pub query_timeout: u64,

    /// Rounds over the upstream list before giving up.
    #[serde(default = "default_attempts")]
    pub attempts: u32,

    /// Seconds between resolv.conf modification checks (0 = never).
    #[serde(default = "default_reload_interval")]
    pub reload_interval: u64,
}

impl Default for FallbackConfig {
    fn default() -> Self {
        Self {
            resolv_conf_path: default_resolv_conf_path(),
            upstream_servers: vec![],
            query_timeout: default_query_timeout(),
            attempts: default_attempts(),
            reload_interval: default_reload_interval(),
        }
    }
}

fn default_resolv_conf_path() -> String {
    "/etc/resolv.conf".to_string()
}

fn default_query_timeout() -> u64 {
    5
}

fn default_attempts() -> u32 {
    2
}

fn default_reload_interval() -> u64 {
    60
}
