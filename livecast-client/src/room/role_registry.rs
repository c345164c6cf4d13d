use crate::error::ClientError;
use crate::signaling::SignalingOutput;
use livecast_core::{Role, RoomId};
use tracing::info;

/// Role and room derived from the entry link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleAssignment {
    pub role: Role,
    pub room: Option<RoomId>,
}

/// A non-empty `room` parameter makes the client a viewer of that room,
/// anything else a broadcaster without a room yet.
pub fn determine_role(room_param: Option<&str>) -> RoleAssignment {
    match room_param.map(str::trim).filter(|room| !room.is_empty()) {
        Some(room) => RoleAssignment {
            role: Role::Viewer,
            room: Some(RoomId::from(room)),
        },
        None => RoleAssignment {
            role: Role::Broadcaster,
            room: None,
        },
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinState {
    Unjoined,
    Joined,
}

/// Tracks this client's role, room and whether it has announced itself.
#[derive(Debug)]
pub struct RoleRegistry {
    role: Role,
    room: Option<RoomId>,
    state: JoinState,
}

impl RoleRegistry {
    pub fn from_entry(room_param: Option<&str>) -> Self {
        let RoleAssignment { role, room } = determine_role(room_param);
        Self {
            role,
            room,
            state: JoinState::Unjoined,
        }
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn room(&self) -> Option<&RoomId> {
        self.room.as_ref()
    }

    pub fn state(&self) -> JoinState {
        self.state
    }

    /// Generates the broadcaster's room on first use. Viewers keep the room
    /// they were given.
    pub fn ensure_room(&mut self, device_id: &str) -> Result<&RoomId, ClientError> {
        if !self.role.is_broadcaster() {
            return Err(ClientError::WrongRole {
                expected: Role::Broadcaster,
                actual: self.role,
            });
        }
        Ok(&*self
            .room
            .get_or_insert_with(|| RoomId::generate(device_id)))
    }

    /// Announce this client in its room. Viewers follow up with
    /// `viewer_ready` so the broadcaster starts negotiating.
    pub async fn join(&mut self, signaling: &dyn SignalingOutput) -> Result<(), ClientError> {
        let room = self.room.clone().ok_or(ClientError::NoRoom)?;
        let broadcaster = self.role.is_broadcaster();

        info!("Joining room {} as {}", room, self.role);
        signaling.send_join(room.clone(), broadcaster).await;
        if !broadcaster {
            signaling.send_viewer_ready(room).await;
        }

        self.state = JoinState::Joined;
        Ok(())
    }
}
