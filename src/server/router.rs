//! Connection Router (spec.md §4.3): maps connections to outbound channels
//! and tracks room membership (`game-<pin>`, `host-<pin>`) so broadcasts can
//! fan out without the session itself knowing about transport.

use dashmap::{DashMap, DashSet};
use tokio::sync::mpsc;
use tracing::warn;

use crate::protocol::messages::OutboundFrame;
use crate::protocol::types::ConnectionId;

const OUTBOUND_CHANNEL_CAPACITY: usize = 64;

pub fn game_room(pin: &str) -> String {
    format!("game-{pin}")
}

pub fn host_room(pin: &str) -> String {
    format!("host-{pin}")
}

pub struct Router {
    connections: DashMap<ConnectionId, mpsc::Sender<OutboundFrame>>,
    rooms: DashMap<String, DashSet<ConnectionId>>,
    /// Reverse index so a disconnecting connection can find its rooms
    /// without scanning every room in the map.
    membership: DashMap<ConnectionId, DashSet<String>>,
}

impl Router {
    pub fn new() -> Self {
        Self {
            connections: DashMap::new(),
            rooms: DashMap::new(),
            membership: DashMap::new(),
        }
    }

    /// Registers a freshly accepted connection and returns the receiving
    /// half of its outbound channel, to be drained by the connection's send
    /// task.
    pub fn register(&self, connection_id: ConnectionId) -> mpsc::Receiver<OutboundFrame> {
        let (tx, rx) = mpsc::channel(OUTBOUND_CHANNEL_CAPACITY);
        self.connections.insert(connection_id, tx);
        self.membership.insert(connection_id, DashSet::new());
        rx
    }

    /// Drops the connection's channel and removes it from every room it had
    /// joined. Returns the set of room names it was a member of, so the
    /// caller can translate those back into session PINs.
    pub fn unregister(&self, connection_id: ConnectionId) -> Vec<String> {
        self.connections.remove(&connection_id);
        let Some((_, rooms)) = self.membership.remove(&connection_id) else {
            return Vec::new();
        };
        let room_names: Vec<String> = rooms.iter().map(|r| r.clone()).collect();
        for room in &room_names {
            if let Some(members) = self.rooms.get(room) {
                members.remove(&connection_id);
            }
        }
        room_names
    }

    pub fn join(&self, connection_id: ConnectionId, room: &str) {
        self.rooms
            .entry(room.to_string())
            .or_insert_with(DashSet::new)
            .insert(connection_id);
        if let Some(rooms) = self.membership.get(&connection_id) {
            rooms.insert(room.to_string());
        }
    }

    pub fn emit_to(&self, connection_id: ConnectionId, frame: OutboundFrame) {
        let Some(sender) = self.connections.get(&connection_id) else {
            return;
        };
        if sender.try_send(frame).is_err() {
            warn!(%connection_id, "dropping outbound frame: channel full or closed");
        }
    }

    pub fn broadcast(&self, room: &str, frame: OutboundFrame) {
        let Some(members) = self.rooms.get(room) else {
            return;
        };
        for connection_id in members.iter() {
            if let Some(sender) = self.connections.get(&connection_id) {
                if sender.try_send(frame.clone()).is_err() {
                    warn!(%connection_id, room, "dropping broadcast frame: channel full or closed");
                }
            }
        }
    }
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[tokio::test]
    async fn broadcast_reaches_every_room_member() {
        let router = Router::new();
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let mut rx_a = router.register(a);
        let mut rx_b = router.register(b);
        router.join(a, "game-1234");
        router.join(b, "game-1234");

        router.broadcast("game-1234", OutboundFrame::broadcast("ping", serde_json::json!({})));

        assert!(rx_a.try_recv().is_ok());
        assert!(rx_b.try_recv().is_ok());
    }

    #[tokio::test]
    async fn unregister_removes_room_membership() {
        let router = Router::new();
        let a = Uuid::new_v4();
        let _rx = router.register(a);
        router.join(a, "game-1234");

        let rooms = router.unregister(a);
        assert_eq!(rooms, vec!["game-1234".to_string()]);

        // Broadcasting after unregister must not panic and must not reach `a`.
        router.broadcast("game-1234", OutboundFrame::broadcast("ping", serde_json::json!({})));
    }
}
