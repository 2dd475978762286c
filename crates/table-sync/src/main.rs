//! Demo walk-through: one table from creation to deletion, with a dashboard listening.
//!
//! ```bash
//! RUST_LOG=info cargo run -p table-sync
//! TABLE_SYNC_DEVICE__ENABLED=true TABLE_SYNC_DEVICE__ADDRESS=192.168.4.1 cargo run -p table-sync
//! ```

use std::path::PathBuf;
use table_sync::config::Settings;
use table_sync::engine::Caller;
use table_sync::lifecycle::{setup_tracing, TableSystem};
use tracing::{info, warn, Instrument};

#[tokio::main]
async fn main() -> Result<(), String> {
    setup_tracing();

    let config_path = std::env::var_os("TABLE_SYNC_CONFIG").map(PathBuf::from);
    let settings = Settings::load(config_path.as_deref()).map_err(|e| e.to_string())?;
    info!("Starting table sync demo");

    let system = TableSystem::new(&settings).map_err(|e| e.to_string())?;
    let caller = Caller::new("demo");

    if settings.device.enabled && !system.engine.device_online().await {
        warn!(address = %settings.device.address, "Device is not answering, continuing without it");
    }

    // A dashboard listening from the start
    let mut dashboard = system.hub.connect().await.map_err(|e| e.to_string())?;

    let span = tracing::info_span!("table_walkthrough");
    async {
        let table = system
            .engine
            .create_table(&caller, "Table 1")
            .await
            .map_err(|e| e.to_string())?;
        info!(table_id = %table.id, "Table created");

        for status in ["placed", "processing", "delivered", "idle"] {
            let change = system
                .engine
                .update_status(&caller, table.id.as_str(), status)
                .await
                .map_err(|e| e.to_string())?;
            info!(
                table_id = %change.table.id,
                status = %change.table.status,
                device_notified = change.device_notified,
                "Status changed"
            );
        }

        let renamed = system
            .engine
            .rename_table(&caller, table.id.as_str(), "Window 1")
            .await
            .map_err(|e| e.to_string())?;
        info!(table_id = %renamed.id, table_name = %renamed.name, "Table renamed");

        let tables = system
            .engine
            .list_tables(&caller)
            .await
            .map_err(|e| e.to_string())?;
        info!(count = tables.len(), "Active tables");

        system
            .engine
            .delete_table(&caller, table.id.as_str())
            .await
            .map_err(|e| e.to_string())
    }
    .instrument(span)
    .await?;

    // Everything the dashboard saw, in order
    while let Some(event) = dashboard.try_recv() {
        match event.to_json() {
            Ok(json) => info!(event = event.name(), %json, "Dashboard received"),
            Err(e) => warn!(event = event.name(), error = %e, "Event not serializable"),
        }
    }
    system.hub.disconnect(dashboard).await;

    system.shutdown().await?;
    Ok(())
}
