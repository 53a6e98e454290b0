//! Orchestration: owns the Session Registry and the Connection Router, and
//! exposes the operations the WebSocket and REST transports drive.

pub mod dispatcher;
pub mod janitor;
pub mod router;

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::mpsc;
use tracing::info;

use crate::config::AppConfig;
use crate::protocol::messages::OutboundFrame;
use crate::protocol::types::ConnectionId;
use crate::session::registry::SessionRegistry;

use router::Router;

pub struct GameServer {
    pub(crate) registry: SessionRegistry,
    pub(crate) router: Router,
    pub(crate) config: Arc<AppConfig>,
}

impl GameServer {
    pub fn new(config: Arc<AppConfig>) -> Arc<Self> {
        Arc::new(Self {
            registry: SessionRegistry::new(config.pin_retry_budget),
            router: Router::new(),
            config,
        })
    }

    pub fn register_connection(&self, connection_id: ConnectionId) -> mpsc::Receiver<OutboundFrame> {
        self.router.register(connection_id)
    }

    /// Disconnect path from spec.md §5: drop the transport-level channel and
    /// membership first, then remove any team that connection owned. A team
    /// removed while its session is still in `lobby` triggers a `team:left`
    /// broadcast, and an emptied lobby session is evicted immediately rather
    /// than waiting for the janitor's next sweep.
    pub async fn handle_disconnect(&self, connection_id: ConnectionId) {
        let rooms = self.router.unregister(connection_id);
        for room in rooms {
            let Some(pin) = room.strip_prefix("game-") else {
                continue;
            };
            let Some(session) = self.registry.get(pin) else {
                continue;
            };
            let Some(removed) = session.remove_team_by_connection(connection_id).await else {
                continue;
            };
            info!(pin, team = %removed.team_id, "team left on disconnect");
            // spec.md §5: only a session still in `lobby` gets a `team:left`
            // broadcast. Past lobby there's no rejoin protocol, so the team's
            // score is retained and the disconnect is silent.
            if removed.was_lobby {
                self.router.broadcast(
                    &router::host_room(pin),
                    OutboundFrame::broadcast(
                        "team:left",
                        crate::protocol::messages::TeamLeftBroadcastData {
                            team_id: removed.team_id,
                            team_name: removed.team_name,
                            total_teams: removed.remaining_teams,
                        },
                    ),
                );
            }
            if removed.session_now_empty_lobby {
                info!(pin, "evicting now-empty lobby session");
                self.registry.remove(pin);
            }
        }
    }

    pub fn client_url(&self) -> &str {
        &self.config.client_url
    }

    pub fn janitor_interval_secs(&self) -> u64 {
        self.config.janitor_interval_secs
    }

    pub fn health(&self) -> HealthView {
        HealthView {
            status: "ok",
            games: self.registry.len(),
        }
    }

    pub async fn introspect(&self, pin: &str) -> Option<GameIntrospectionView> {
        let session = self.registry.get(pin)?;
        Some(GameIntrospectionView {
            pin: pin.to_string(),
            state: session.state().await.as_str(),
            teams: session.teams_count().await,
            questions: session.questions_count().await,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct HealthView {
    pub status: &'static str,
    pub games: usize,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameIntrospectionView {
    pub pin: String,
    pub state: &'static str,
    pub teams: usize,
    pub questions: usize,
}
