use ferrous_dyndns_application::ports::DnsResolver;
use ferrous_dyndns_application::services::ResolverChain;
use ferrous_dyndns_application::use_cases::HandleDnsQueryUseCase;
use ferrous_dyndns_domain::Config;
use ferrous_dyndns_infrastructure::dns::{DynamicResolver, FallbackResolver};
use ferrous_dyndns_infrastructure::system::{load_upstream_settings, ResolvConfReloadJob};
use std::sync::Arc;
use tracing::info;

pub struct DnsServices {
    pub handler_use_case: Arc<HandleDnsQueryUseCase>,
    reload_job: Option<Arc<ResolvConfReloadJob>>,
}

impl DnsServices {
    pub async fn new(config: &Config) -> anyhow::Result<Self> {
        info!("Initializing DNS services");

        let dynamic = Arc::new(DynamicResolver::from_config(&config.dynamic)?);

        let upstream = load_upstream_settings(&config.fallback).await?;
        info!(
            servers = ?upstream.servers.iter().map(|s| s.to_string()).collect::<Vec<_>>(),
            timeout_secs = upstream.timeout.as_secs(),
            attempts = upstream.attempts,
            "Upstream nameservers resolved"
        );
        let fallback = Arc::new(FallbackResolver::new(upstream));

        // Explicit upstreams pin the list; only resolv.conf-derived ones reload.
        let reload_job = if config.fallback.upstream_servers.is_empty() {
            Some(Arc::new(ResolvConfReloadJob::new(
                config.fallback.clone(),
                fallback.settings_handle(),
            )))
        } else {
            None
        };

        let chain = ResolverChain::new(vec![
            dynamic as Arc<dyn DnsResolver>,
            fallback as Arc<dyn DnsResolver>,
        ]);
        info!(resolvers = ?chain.resolver_names(), "Resolver chain built");

        let handler_use_case = Arc::new(HandleDnsQueryUseCase::new(Arc::new(chain)));

        Ok(Self {
            handler_use_case,
            reload_job,
        })
    }

    pub async fn start_background_jobs(&self) {
        if let Some(job) = &self.reload_job {
            Arc::clone(job).start().await;
        }
    }
}
