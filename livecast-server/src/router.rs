use crate::api::turnservers;
use crate::relay::{RelayService, ws_handler};
use axum::Router;
use axum::routing::get;

pub fn router(service: RelayService) -> Router {
    Router::new()
        .route("/ws", get(ws_handler))
        .route("/api/turnservers", get(turnservers))
        .with_state(service)
}
