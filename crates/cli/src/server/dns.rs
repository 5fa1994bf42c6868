use ferrous_dyndns_infrastructure::dns::{DnsServer, DnsServerHandler};
use std::future::Future;
use std::net::SocketAddr;
use std::time::Duration;
use tracing::{info, warn};

pub async fn start_dns_server<F>(
    bind_addr: SocketAddr,
    handler: DnsServerHandler,
    tcp_timeout: Duration,
    shutdown: F,
) -> anyhow::Result<()>
where
    F: Future<Output = ()>,
{
    let server = DnsServer::bind(bind_addr, handler, tcp_timeout).await?;

    info!(
        bind_address = %server.local_addr(),
        "DNS server listening on UDP and TCP"
    );

    server.run_until(shutdown).await?;
    Ok(())
}

/// Completes on Ctrl-C, or on SIGTERM where available.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl-C"),
        _ = terminate => info!("Received SIGTERM"),
    }
}
