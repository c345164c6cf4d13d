use crate::utils::DEFAULT_STUN_ADDR;
use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IceServerConfig {
    /// Accepts both `"stun:..."` and `["stun:...", ...]`, as browsers do.
    #[serde(deserialize_with = "one_or_many")]
    pub urls: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credential: Option<String>,
}

impl IceServerConfig {
    pub fn stun(url: &str) -> Self {
        Self {
            urls: vec![url.to_owned()],
            username: None,
            credential: None,
        }
    }

    pub fn turn(url: &str, username: &str, credential: &str) -> Self {
        Self {
            urls: vec![url.to_owned()],
            username: Some(username.to_owned()),
            credential: Some(credential.to_owned()),
        }
    }
}

/// Body of `GET /api/turnservers`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IceConfig {
    #[serde(rename = "iceServers")]
    pub ice_servers: Vec<IceServerConfig>,
}

impl IceConfig {
    pub fn new(ice_servers: Vec<IceServerConfig>) -> Self {
        Self { ice_servers }
    }

    /// Single public STUN server used whenever nothing better is known.
    pub fn fallback() -> Self {
        Self::new(vec![IceServerConfig::stun(DEFAULT_STUN_ADDR)])
    }

    /// True when at least one server carries at least one URL.
    pub fn is_usable(&self) -> bool {
        self.ice_servers.iter().any(|s| !s.urls.is_empty())
    }
}

impl Default for IceConfig {
    fn default() -> Self {
        Self::fallback()
    }
}

fn one_or_many<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Urls {
        One(String),
        Many(Vec<String>),
    }

    Ok(match Urls::deserialize(deserializer)? {
        Urls::One(url) => vec![url],
        Urls::Many(urls) => urls,
    })
}
