use clap::Parser;
use ferrous_dyndns_domain::CliOverrides;
use ferrous_dyndns_infrastructure::dns::DnsServerHandler;
use std::time::Duration;
use tracing::info;

mod bootstrap;
mod di;
mod server;

#[derive(Parser)]
#[command(name = "ferrous-dyndns")]
#[command(version)]
#[command(about = "Ferrous DynDNS - synthesized A records with upstream fallback")]
struct Cli {
    /// Configuration file path
    #[arg(short = 'c', long, value_name = "FILE")]
    config: Option<String>,

    /// DNS server port
    #[arg(short = 'd', long)]
    dns_port: Option<u16>,

    /// Bind address
    #[arg(short = 'b', long)]
    bind: Option<String>,

    /// First-label prefix that triggers synthesized answers
    #[arg(short = 'p', long)]
    pattern: Option<String>,

    /// First three octets of synthesized addresses (e.g. 172.0.2)
    #[arg(short = 'n', long)]
    network: Option<String>,

    /// resolv.conf file listing upstream nameservers
    #[arg(long, value_name = "FILE")]
    resolv_conf: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let cli_overrides = CliOverrides {
        dns_port: cli.dns_port,
        bind_address: cli.bind,
        pattern: cli.pattern,
        network_prefix: cli.network,
        resolv_conf_path: cli.resolv_conf,
        log_level: cli.log_level,
    };

    let config = bootstrap::load_config(cli.config.as_deref(), cli_overrides)?;

    bootstrap::init_logging(&config);
    bootstrap::log_config_summary(cli.config.as_deref(), &config);

    info!("Starting Ferrous DynDNS v{}", env!("CARGO_PKG_VERSION"));

    let dns_services = di::DnsServices::new(&config).await?;
    dns_services.start_background_jobs().await;

    let dns_addr = config.dns_socket_addr()?;
    let dns_handler = DnsServerHandler::new(dns_services.handler_use_case);

    server::start_dns_server(
        dns_addr,
        dns_handler,
        Duration::from_secs(config.server.tcp_timeout),
        server::shutdown_signal(),
    )
    .await?;

    info!("Server shutdown complete");
    Ok(())
}
