//! Janitor (spec.md §4.5): periodically sweeps sessions sitting in `ended`
//! state. Disconnect-triggered eviction of empty `lobby` sessions happens
//! inline in `GameServer::handle_disconnect`, not here.

use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use super::GameServer;

pub async fn run(server: Arc<GameServer>) {
    let interval_secs = server.janitor_interval_secs().max(1);
    let mut ticker = tokio::time::interval(Duration::from_secs(interval_secs));
    // The first tick fires immediately; skip it so we don't sweep a
    // just-started, necessarily-empty registry.
    ticker.tick().await;
    loop {
        ticker.tick().await;
        let removed = server.registry.sweep_ended().await;
        if removed > 0 {
            info!(removed, "janitor swept ended sessions");
        }
    }
}
