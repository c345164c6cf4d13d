use async_trait::async_trait;
use colored::*;
use livecast_client::transport::RemoteTrack;
use livecast_client::{LoggingObserver, SessionObserver, SessionStatus};
use livecast_core::ParticipantId;
use tracing::debug;

/// Prints session lifecycle to the terminal and forwards every event to
/// the log.
#[derive(Default)]
pub struct ConsoleObserver {
    log: LoggingObserver,
}

#[async_trait]
impl SessionObserver for ConsoleObserver {
    async fn on_status(&self, participant: &ParticipantId, status: SessionStatus) {
        let label = match status {
            SessionStatus::Connected => status.to_string().green().bold(),
            SessionStatus::Failed => status.to_string().red().bold(),
            SessionStatus::Disconnected => status.to_string().yellow(),
            _ => status.to_string().normal(),
        };
        println!("   {} {}", participant.to_string().dimmed(), label);
        self.log.on_status(participant, status).await;
    }

    async fn on_track(&self, participant: &ParticipantId, track: RemoteTrack) {
        println!(
            "{} {:?} track '{}' from {}",
            "🎥".cyan(),
            track.kind,
            track.id,
            participant
        );
        debug!("Track '{}' belongs to stream '{}'", track.id, track.stream_id);
        self.log.on_track(participant, track).await;
    }

    async fn on_closed(&self, participant: &ParticipantId) {
        println!("   {} {}", participant.to_string().dimmed(), "left".dimmed());
        self.log.on_closed(participant).await;
    }

    async fn on_signaling_lost(&self) {
        println!("{}", "⚠️  Lost connection to the signaling server".yellow().bold());
        self.log.on_signaling_lost().await;
    }
}
