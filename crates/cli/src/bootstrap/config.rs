use ferrous_dyndns_domain::{CliOverrides, Config};
use tracing::info;

pub fn load_config(
    config_path: Option<&str>,
    cli_overrides: CliOverrides,
) -> anyhow::Result<Config> {
    let config = Config::load(config_path, cli_overrides)?;
    config.validate()?;
    Ok(config)
}

/// Logs the effective configuration. Call once the subscriber is installed.
pub fn log_config_summary(config_path: Option<&str>, config: &Config) {
    info!(
        config_file = config_path.unwrap_or("default"),
        dns_port = config.server.dns_port,
        bind = %config.server.bind_address,
        pattern = %config.dynamic.pattern,
        network_prefix = %config.dynamic.network_prefix,
        "Configuration loaded"
    );
}
