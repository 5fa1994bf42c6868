use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_dns_port")]
    pub dns_port: u16,

    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    /// Idle timeout for inbound TCP connections, in seconds.
    #[serde(default = "default_tcp_timeout")]
    pub tcp_timeout: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            dns_port: default_dns_port(),
            bind_address: default_bind_address(),
            tcp_timeout: default_tcp_timeout(),
        }
    }
}

fn default_dns_port() -> u16 {
    10053
}

fn default_bind_address() -> String {
    "0.0.0.0".to_string()
}

fn default_tcp_timeout() -> u64 {
    10
}
