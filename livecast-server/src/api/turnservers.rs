use crate::relay::RelayService;
use axum::Json;
use axum::extract::State;
use livecast_core::IceConfig;

pub async fn turnservers(State(service): State<RelayService>) -> Json<IceConfig> {
    Json(service.ice_config())
}
