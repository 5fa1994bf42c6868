use super::resolv_conf::ResolvConf;
use crate::dns::resolver::UpstreamSettings;
use arc_swap::ArcSwap;
use ferrous_dyndns_domain::{DomainError, FallbackConfig};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, SystemTime};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// Background job that re-reads resolv.conf when its modification time
/// changes and swaps the fallback resolver's upstream settings in place.
///
/// The first tick is consumed immediately; settings were loaded at startup.
pub struct ResolvConfReloadJob {
    path: PathBuf,
    config: FallbackConfig,
    settings: Arc<ArcSwap<UpstreamSettings>>,
    interval_secs: u64,
    last_modified: Mutex<Option<SystemTime>>,
}

impl ResolvConfReloadJob {
    pub fn new(config: FallbackConfig, settings: Arc<ArcSwap<UpstreamSettings>>) -> Self {
        Self {
            path: PathBuf::from(&config.resolv_conf_path),
            interval_secs: config.reload_interval,
            config,
            settings,
            last_modified: Mutex::new(None),
        }
    }

    pub async fn start(self: Arc<Self>) {
        if self.interval_secs == 0 {
            info!("resolv.conf reload disabled");
            return;
        }

        *self.last_modified.lock().await = self.modified_time().await;

        info!(
            path = %self.path.display(),
            interval_secs = self.interval_secs,
            "Starting resolv.conf reload job"
        );

        tokio::spawn(async move {
            let mut interval = tokio::time::interval(Duration::from_secs(self.interval_secs));
            interval.tick().await;

            loop {
                interval.tick().await;
                match self.reload_if_changed().await {
                    Ok(true) => info!(path = %self.path.display(), "ResolvConfReloadJob: upstreams reloaded"),
                    Ok(false) => debug!("ResolvConfReloadJob: resolv.conf unchanged"),
                    Err(e) => warn!(error = %e, "ResolvConfReloadJob: reload failed"),
                }
            }
        });
    }

    /// Reloads when the file's mtime differs from the last one seen.
    /// Returns whether the upstream settings were replaced.
    pub async fn reload_if_changed(&self) -> Result<bool, DomainError> {
        let modified = self.modified_time().await;
        let mut last = self.last_modified.lock().await;
        if modified.is_none() || modified == *last {
            return Ok(false);
        }
        *last = modified;

        let conf = ResolvConf::load(&self.path).await?;
        let settings = conf.to_settings(&self.config);
        if **self.settings.load() == settings {
            return Ok(false);
        }

        debug!(servers = settings.servers.len(), "New upstream settings");
        self.settings.store(Arc::new(settings));
        Ok(true)
    }

    async fn modified_time(&self) -> Option<SystemTime> {
        tokio::fs::metadata(&self.path)
            .await
            .and_then(|m| m.modified())
            .ok()
    }
}
