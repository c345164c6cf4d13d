use dashmap::DashMap;
use livecast_core::{ClientSignal, IceConfig, ParticipantId, RelaySignal, RoomId};
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

struct RelayInner {
    participants: DashMap<ParticipantId, mpsc::UnboundedSender<RelaySignal>>,
    rooms: DashMap<RoomId, HashSet<ParticipantId>>,
    memberships: DashMap<ParticipantId, RoomId>,
    ice: IceConfig,
}

/// Routes signaling events between connected participants.
///
/// The relay never looks inside descriptions or candidates: it only knows
/// who is connected and which room each participant joined.
#[derive(Clone)]
pub struct RelayService {
    inner: Arc<RelayInner>,
}

impl RelayService {
    pub fn new(ice: IceConfig) -> Self {
        Self {
            inner: Arc::new(RelayInner {
                participants: DashMap::new(),
                rooms: DashMap::new(),
                memberships: DashMap::new(),
                ice,
            }),
        }
    }

    pub fn ice_config(&self) -> IceConfig {
        self.inner.ice.clone()
    }

    pub fn add_participant(&self, id: ParticipantId, tx: mpsc::UnboundedSender<RelaySignal>) {
        self.inner.participants.insert(id, tx);
    }

    pub fn remove_participant(&self, id: &ParticipantId) {
        self.inner.participants.remove(id);
        self.leave_room(id);
    }

    pub fn room_members(&self, room: &RoomId) -> Vec<ParticipantId> {
        self.inner
            .rooms
            .get(room)
            .map(|members| members.iter().cloned().collect())
            .unwrap_or_default()
    }

    pub fn room_count(&self) -> usize {
        self.inner.rooms.len()
    }

    pub fn handle_signal(&self, from: &ParticipantId, signal: ClientSignal) {
        match signal {
            ClientSignal::Join { room, broadcaster } => {
                info!(
                    "{} joined room '{}' as {}",
                    from,
                    room,
                    if broadcaster { "broadcaster" } else { "viewer" }
                );
                self.join_room(from, room);
            }

            ClientSignal::ViewerReady { room } => {
                for member in self.room_members(&room) {
                    if &member == from {
                        continue;
                    }
                    self.send_signal(
                        &member,
                        RelaySignal::ViewerReady {
                            viewer_id: from.clone(),
                        },
                    );
                }
            }

            ClientSignal::Offer { to, offer } => {
                self.send_signal(&to, RelaySignal::Offer {
                    from: from.clone(),
                    offer,
                });
            }

            ClientSignal::Answer { to, answer } => {
                self.send_signal(&to, RelaySignal::Answer {
                    from: from.clone(),
                    answer,
                });
            }

            ClientSignal::Candidate { to, candidate } => {
                self.send_signal(&to, RelaySignal::Candidate {
                    from: from.clone(),
                    candidate,
                });
            }
        }
    }

    /// Deliver `signal` to `to`. Returns whether it was queued.
    pub fn send_signal(&self, to: &ParticipantId, signal: RelaySignal) -> bool {
        let Some(peer) = self.inner.participants.get(to) else {
            warn!("Dropping '{}' for disconnected participant {}", signal.name(), to);
            return false;
        };
        debug!("Relaying '{}' to {}", signal.name(), to);
        peer.send(signal).is_ok()
    }

    fn join_room(&self, id: &ParticipantId, room: RoomId) {
        if self.inner.memberships.get(id).is_some_and(|r| *r == room) {
            return;
        }
        self.leave_room(id);

        self.inner
            .rooms
            .entry(room.clone())
            .or_default()
            .insert(id.clone());
        self.inner.memberships.insert(id.clone(), room);
    }

    fn leave_room(&self, id: &ParticipantId) {
        let Some((_, room)) = self.inner.memberships.remove(id) else {
            return;
        };
        if let Some(mut members) = self.inner.rooms.get_mut(&room) {
            members.remove(id);
        }
        if self
            .inner
            .rooms
            .remove_if(&room, |_, members| members.is_empty())
            .is_some()
        {
            info!("Room '{}' is empty, removed", room);
        }
    }
}
