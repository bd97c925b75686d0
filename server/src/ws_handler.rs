use std::time::Duration;

use axum::extract::ws::{Message, WebSocket};
use futures_util::{SinkExt, StreamExt};
use serde_json::Value;
use tokio_stream::wrappers::WatchStream;

use common::log;

use crate::game_loop::LoopCommand;
use crate::web_server::WebServerState;

/// One render client: every published snapshot goes out as a JSON text
/// frame. Inbound frames are either control commands or raw relay events;
/// anything else is logged and dropped.
pub async fn handle_websocket(socket: WebSocket, state: WebServerState) {
    let (mut ws_sender, mut ws_receiver) = socket.split();

    let mut snapshots = WatchStream::new(state.snapshots.clone());
    let send_task = tokio::spawn(async move {
        while let Some(snapshot) = snapshots.next().await {
            let Ok(text) = serde_json::to_string(&snapshot) else {
                continue;
            };
            if ws_sender.send(Message::Text(text.into())).await.is_err() {
                break;
            }
        }
    });

    while let Some(result) = ws_receiver.next().await {
        match result {
            Ok(Message::Text(text)) => {
                let Ok(value) = serde_json::from_str::<Value>(&text) else {
                    log!("undecodable websocket frame ignored");
                    continue;
                };
                route_client_message(&state, value).await;
            }
            Ok(Message::Close(_)) => break,
            Ok(_) => continue,
            Err(e) => {
                log!("websocket error: {}", e);
                break;
            }
        }
    }

    send_task.abort();
}

async fn route_client_message(state: &WebServerState, value: Value) {
    match value.get("type").and_then(Value::as_str) {
        Some("command") => handle_control_command(state, &value).await,
        // Everything else is treated as a relay payload; the parser
        // boundary decides whether it means anything.
        Some(_) => state.connector.deliver(&value).await,
        None => log!("websocket frame without type ignored"),
    }
}

async fn handle_control_command(state: &WebServerState, value: &Value) {
    match value.get("action").and_then(Value::as_str) {
        Some("pause") => state.game.send(LoopCommand::Pause).await,
        Some("resume") => state.game.send(LoopCommand::Resume).await,
        Some("reset") => state.game.send(LoopCommand::Reset).await,
        Some("set_tick_interval") => {
            let Some(interval_ms) = value.get("tick_interval_ms").and_then(Value::as_u64) else {
                log!("set_tick_interval without tick_interval_ms ignored");
                return;
            };
            if !(10..=5000).contains(&interval_ms) {
                log!("tick interval {}ms out of range, ignored", interval_ms);
                return;
            }
            state
                .game
                .send(LoopCommand::SetTickInterval(Duration::from_millis(interval_ms)))
                .await;
        }
        Some(action) => log!("unknown control action '{}' ignored", action),
        None => log!("control command without action ignored"),
    }
}
