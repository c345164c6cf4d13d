use livecast_core::{IceConfig, IceServerConfig};

/// Everything a transport needs to build one peer connection.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    pub ice_servers: Vec<IceServerConfig>,
}

impl Default for TransportConfig {
    fn default() -> Self {
        IceConfig::fallback().into()
    }
}

impl From<IceConfig> for TransportConfig {
    fn from(config: IceConfig) -> Self {
        Self {
            ice_servers: config.ice_servers,
        }
    }
}
