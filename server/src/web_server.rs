use axum::{
    extract::{Json, State, WebSocketUpgrade},
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use serde_json::Value;
use tokio::sync::watch;
use tower_http::cors::{Any, CorsLayer};

use common::log;

use crate::game_loop::{LoopHandle, StateSnapshot};
use crate::relay::RelayConnector;
use crate::ws_handler::handle_websocket;

#[derive(Clone)]
pub struct WebServerState {
    pub connector: RelayConnector,
    pub game: LoopHandle,
    pub snapshots: watch::Receiver<StateSnapshot>,
}

pub async fn run_web_server(state: WebServerState, port: u16) {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .route("/ws", get(ws_upgrade_handler))
        .route("/simulate", post(simulate_handler))
        .layer(cors)
        .with_state(state);

    let addr = format!("0.0.0.0:{}", port);
    log!("web server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind web server address");

    axum::serve(listener, app)
        .await
        .expect("Web server error");
}

async fn ws_upgrade_handler(
    ws: WebSocketUpgrade,
    State(state): State<WebServerState>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_websocket(socket, state))
}

/// Local-testing entry point: injects a raw event payload as if the live
/// upstream had produced it. The payload goes through the same connector
/// and parser as real traffic.
async fn simulate_handler(
    State(state): State<WebServerState>,
    Json(payload): Json<Value>,
) -> impl IntoResponse {
    log!("simulate event: {}", payload);
    state.connector.deliver(&payload).await;
    Json(serde_json::json!({ "ok": true }))
}
