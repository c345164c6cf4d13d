use anyhow::{Context, Result, bail};
use livecast_core::IceConfig;
use std::time::Duration;
use tokio::sync::OnceCell;
use tracing::{info, warn};

const FETCH_TIMEOUT: Duration = Duration::from_secs(5);

enum IceSource {
    Remote { http: reqwest::Client, url: String },
    Fixed(IceConfig),
}

/// Resolves the STUN/TURN servers used for every peer connection.
///
/// The remote lookup happens at most once; concurrent callers of
/// [`resolve`](Self::resolve) share it. Any failure resolves to
/// [`IceConfig::fallback`].
pub struct IceConfigProvider {
    source: IceSource,
    resolved: OnceCell<IceConfig>,
}

impl IceConfigProvider {
    /// Fetch from `{api_base}/api/turnservers`.
    pub fn remote(api_base: &str) -> Self {
        let http = reqwest::Client::builder()
            .timeout(FETCH_TIMEOUT)
            .build()
            .unwrap_or_default();
        Self {
            source: IceSource::Remote {
                http,
                url: format!("{}/api/turnservers", api_base.trim_end_matches('/')),
            },
            resolved: OnceCell::new(),
        }
    }

    /// Use `config` verbatim, without any lookup.
    pub fn fixed(config: IceConfig) -> Self {
        Self {
            source: IceSource::Fixed(config),
            resolved: OnceCell::new(),
        }
    }

    /// The resolved config, or the fallback while resolution is pending.
    pub fn current(&self) -> IceConfig {
        self.resolved
            .get()
            .cloned()
            .unwrap_or_else(IceConfig::fallback)
    }

    pub fn is_resolved(&self) -> bool {
        self.resolved.initialized()
    }

    pub async fn resolve(&self) -> IceConfig {
        self.resolved
            .get_or_init(|| async {
                match &self.source {
                    IceSource::Fixed(config) => config.clone(),
                    IceSource::Remote { http, url } => match fetch(http, url).await {
                        Ok(config) => {
                            info!("Loaded {} ICE server(s) from {}", config.ice_servers.len(), url);
                            config
                        }
                        Err(e) => {
                            warn!("Failed to load ICE config, using fallback: {:#}", e);
                            IceConfig::fallback()
                        }
                    },
                }
            })
            .await
            .clone()
    }
}

async fn fetch(http: &reqwest::Client, url: &str) -> Result<IceConfig> {
    let config: IceConfig = http
        .get(url)
        .send()
        .await
        .context("request failed")?
        .error_for_status()?
        .json()
        .await
        .context("malformed ICE config")?;

    if !config.is_usable() {
        bail!("ICE config has no server URLs");
    }
    Ok(config)
}
