use livecast_core::{IceConfig, IceServerConfig};
use livecast_server::ServerConfig;

use crate::integration::{init_tracing, spawn_relay};

#[tokio::test]
async fn test_turnservers_serves_configured_servers() {
    init_tracing();

    let ice = IceConfig::new(vec![
        IceServerConfig::stun("stun:stun.example.org:3478"),
        IceServerConfig::turn("turn:turn.example.org:3478", "user", "secret"),
    ]);
    let addr = spawn_relay(ServerConfig {
        ice: ice.clone(),
        ..ServerConfig::default()
    })
    .await;

    let body: serde_json::Value = reqwest::get(format!("http://{}/api/turnservers", addr))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(body["iceServers"][1]["username"], "user");
    let parsed: IceConfig = serde_json::from_value(body).unwrap();
    assert_eq!(parsed, ice);
}
