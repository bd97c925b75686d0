mod parser;
mod policy;

pub use parser::parse_event;
pub use policy::{EventPolicy, RelayEffect};

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde_json::Value;
use tokio::sync::mpsc;

use common::log;

/// Canonical event kinds every external payload shape collapses into.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RelayEvent {
    /// Running total reported by the source, not a delta.
    Like { total_like_count: u64 },
    /// Explicit diamond value when the source reports one, else a coarse
    /// 1-5 tier.
    Gift { diamonds: Option<u64>, tier: Option<u32> },
}

/// Handle to the live-event stream with an explicit lifecycle. The receiver
/// returned by `new` is the subscription; payloads delivered while
/// disconnected are dropped, so a dead upstream simply stops producing
/// events and the game runs on unaffected.
#[derive(Clone)]
pub struct RelayConnector {
    connected: Arc<AtomicBool>,
    events: mpsc::Sender<RelayEvent>,
}

impl RelayConnector {
    pub fn new() -> (Self, mpsc::Receiver<RelayEvent>) {
        let (events, subscription) = mpsc::channel(128);
        let connector = Self {
            connected: Arc::new(AtomicBool::new(false)),
            events,
        };
        (connector, subscription)
    }

    pub fn connect(&self) {
        self.connected.store(true, Ordering::SeqCst);
        log!("relay connected");
    }

    pub fn disconnect(&self) {
        self.connected.store(false, Ordering::SeqCst);
        log!("relay disconnected");
    }

    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    /// Feeds one raw external payload through the parser boundary.
    /// Unrecognized shapes are dropped here and never reach the game.
    pub async fn deliver(&self, payload: &Value) {
        if !self.is_connected() {
            return;
        }
        let Some(event) = parse_event(payload) else {
            log!("unrecognized relay payload ignored");
            return;
        };
        if self.events.send(event).await.is_err() {
            log!("relay subscription gone, event dropped");
        }
    }
}
