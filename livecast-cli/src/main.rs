mod console;

use anyhow::{Context, Result};
use bytes::Bytes;
use clap::{Parser, Subcommand};
use colored::*;
use console::ConsoleObserver;
use livecast_client::library::{MediaLibrary, SnapshotContext, SnapshotUpload};
use livecast_client::{ClientConfig, MediaDevices, StreamClient, VirtualDevices};
use livecast_core::IceConfig;
use livecast_server::ServerConfig;
use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "livecast", version, about = "One-to-many WebRTC live streaming")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Args)]
struct Endpoints {
    /// Signaling WebSocket endpoint.
    #[arg(long, env = "LIVECAST_SIGNALING", default_value = "ws://127.0.0.1:3000/ws")]
    server: String,

    /// Base URL of the REST API.
    #[arg(long, env = "LIVECAST_API", default_value = "http://127.0.0.1:3000")]
    api: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the signaling relay.
    Serve {
        #[arg(long, env = "LIVECAST_BIND", default_value = "0.0.0.0:3000")]
        bind: SocketAddr,

        /// JSON file shaped like `{"iceServers": [...]}`.
        #[arg(long, env = "LIVECAST_ICE_CONFIG")]
        ice_config: Option<PathBuf>,
    },

    /// Join a room as a viewer.
    Watch {
        #[command(flatten)]
        endpoints: Endpoints,

        #[arg(long)]
        room: String,
    },

    /// Broadcast a virtual camera until Ctrl-C.
    Broadcast {
        #[command(flatten)]
        endpoints: Endpoints,

        #[arg(long, default_value = "cam1")]
        device: String,

        /// Origin used in the printed share link.
        #[arg(long, default_value = "http://127.0.0.1:3000")]
        origin: String,
    },

    /// Manage stored recordings.
    Recordings {
        #[arg(long, env = "LIVECAST_API", default_value = "http://127.0.0.1:3000")]
        api: String,

        #[command(subcommand)]
        action: RecordingAction,
    },

    /// Manage stored snapshots.
    Snapshots {
        #[arg(long, env = "LIVECAST_API", default_value = "http://127.0.0.1:3000")]
        api: String,

        #[command(subcommand)]
        action: SnapshotAction,
    },
}

#[derive(Subcommand)]
enum RecordingAction {
    List,
    Delete { name: String },
    Upload { file: PathBuf },
}

#[derive(Subcommand)]
enum SnapshotAction {
    List,
    Delete { id: i64 },
    Save { png: PathBuf },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    match Cli::parse().command {
        Commands::Serve { bind, ice_config } => run_serve(bind, ice_config.as_deref()).await,
        Commands::Watch { endpoints, room } => run_watch(endpoints, room).await,
        Commands::Broadcast {
            endpoints,
            device,
            origin,
        } => run_broadcast(endpoints, device, origin).await,
        Commands::Recordings { api, action } => run_recordings(&api, action).await,
        Commands::Snapshots { api, action } => run_snapshots(&api, action).await,
    }
}

async fn run_serve(bind: SocketAddr, ice_config: Option<&Path>) -> Result<()> {
    let ice = match ice_config {
        Some(path) => load_ice_config(path)?,
        None => IceConfig::fallback(),
    };

    println!("{}", "🚀 Starting livecast relay...".green().bold());
    println!("   📡 Signaling: ws://{}/ws", bind);
    println!("   🧊 ICE servers: {}", ice.ice_servers.len());

    livecast_server::serve(ServerConfig { bind, ice }).await
}

fn load_ice_config(path: &Path) -> Result<IceConfig> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let config: IceConfig = serde_json::from_str(&raw)
        .with_context(|| format!("Invalid ICE config in {}", path.display()))?;
    if !config.is_usable() {
        anyhow::bail!("{} lists no ICE server URLs", path.display());
    }
    Ok(config)
}

async fn run_watch(endpoints: Endpoints, room: String) -> Result<()> {
    let config = ClientConfig {
        signaling_url: endpoints.server,
        api_base: endpoints.api,
        room: Some(room.clone()),
        ..ClientConfig::default()
    };
    let mut client = StreamClient::connect(
        config,
        Arc::new(VirtualDevices::new()),
        Box::new(ConsoleObserver::default()),
    )
    .await?;

    client.start_viewer().await?;
    println!("{} {}", "👀 Watching room".cyan(), room.bold());

    tokio::signal::ctrl_c().await?;
    client.shutdown().await;
    println!("{}", "Bye".dimmed());
    Ok(())
}

async fn run_broadcast(endpoints: Endpoints, device: String, origin: String) -> Result<()> {
    let devices = VirtualDevices::new();
    devices.add(&device, "Virtual camera");
    for info in devices.enumerate().await {
        println!("   📷 {} ({})", info.device_id, info.label);
    }

    let config = ClientConfig {
        signaling_url: endpoints.server,
        api_base: endpoints.api,
        room: None,
        ..ClientConfig::default()
    };
    let mut client = StreamClient::connect(
        config,
        Arc::new(devices),
        Box::new(ConsoleObserver::default()),
    )
    .await?;

    let room = client.start_broadcast(&device).await?;
    println!("{} {}", "🔴 Live in room".red().bold(), room.to_string().bold());
    if let Some(link) = client.share_link(&origin) {
        println!("   🔗 {}", link.underline());
    }

    tokio::signal::ctrl_c().await?;
    client.stop_broadcast().await?;
    client.shutdown().await;
    println!("{}", "⏹  Broadcast stopped".yellow());
    Ok(())
}

async fn run_recordings(api: &str, action: RecordingAction) -> Result<()> {
    let library = MediaLibrary::new(api);

    match action {
        RecordingAction::List => {
            for name in library.list_recordings().await? {
                println!("{}", name);
            }
        }
        RecordingAction::Delete { name } => {
            library.delete_recording(&name).await?;
            println!("{} {}", "🗑️  Deleted".yellow(), name);
        }
        RecordingAction::Upload { file } => {
            let data = fs::read(&file)
                .with_context(|| format!("Failed to read {}", file.display()))?;
            let filename = file
                .file_name()
                .and_then(|n| n.to_str())
                .context("Recording path has no file name")?;
            let res = library.upload_recording(filename, Bytes::from(data)).await?;
            println!("{} {}", "📤 Uploaded".green(), res);
        }
    }
    Ok(())
}

async fn run_snapshots(api: &str, action: SnapshotAction) -> Result<()> {
    let library = MediaLibrary::new(api);

    match action {
        SnapshotAction::List => {
            for snapshot in library.list_snapshots().await?.mediafiles {
                println!("{:>6}  {}", snapshot.id, snapshot.file_src);
            }
        }
        SnapshotAction::Delete { id } => {
            library.delete_snapshot(id).await?;
            println!("{} {}", "🗑️  Deleted snapshot".yellow(), id);
        }
        SnapshotAction::Save { png } => {
            let data = fs::read(&png)
                .with_context(|| format!("Failed to read {}", png.display()))?;
            let upload = SnapshotUpload::from_png(&data, SnapshotContext::default());
            library.save_snapshot(&upload).await?;
            println!("{} {}", "📸 Saved".green(), upload.filename);
        }
    }
    Ok(())
}
