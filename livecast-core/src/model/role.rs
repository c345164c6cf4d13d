use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Owns the capture source and offers to every viewer.
    Broadcaster,
    /// Announces itself and answers the broadcaster's offer.
    Viewer,
}

impl Role {
    pub fn is_broadcaster(self) -> bool {
        matches!(self, Role::Broadcaster)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Broadcaster => f.write_str("broadcaster"),
            Role::Viewer => f.write_str("viewer"),
        }
    }
}
