use crate::utils::{ROOM_SUFFIX_LEN, random_base36};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Serialize, Deserialize, Clone, Hash, Eq, PartialEq)]
#[serde(transparent)]
pub struct RoomId(pub String);

impl RoomId {
    /// Room name a broadcaster picks for itself: `<device>-<suffix>`.
    ///
    /// The suffix is random; nothing checks it against rooms already open on
    /// the relay.
    pub fn generate(device_id: &str) -> Self {
        Self(format!("{}-{}", device_id, random_base36(ROOM_SUFFIX_LEN)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for RoomId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

impl From<String> for RoomId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
