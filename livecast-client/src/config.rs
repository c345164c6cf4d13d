use std::time::Duration;

/// Endpoints and entry context of a [`StreamClient`](crate::StreamClient).
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// WebSocket endpoint of the relay, e.g. `ws://host:3000/ws`.
    pub signaling_url: String,
    /// Base URL of the REST collaborators, e.g. `http://host:3000`.
    pub api_base: String,
    /// Room from the entry link. Present means viewer.
    pub room: Option<String>,
    pub welcome_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            signaling_url: "ws://127.0.0.1:3000/ws".to_owned(),
            api_base: "http://127.0.0.1:3000".to_owned(),
            room: None,
            welcome_timeout: Duration::from_secs(10),
        }
    }
}
