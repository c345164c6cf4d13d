use livecast_core::IceConfig;
use std::net::SocketAddr;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind: SocketAddr,
    /// Served verbatim on `GET /api/turnservers`.
    pub ice: IceConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([0, 0, 0, 0], 3000)),
            ice: IceConfig::fallback(),
        }
    }
}
