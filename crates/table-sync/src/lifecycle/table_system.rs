use crate::config::{ConfigError, Settings};
use crate::device::{DeviceNotifier, HttpDeviceNotifier, NoDevice};
use crate::engine::TableSyncEngine;
use crate::hub::{HubActor, HubClient};
use crate::id_generator::IdGenerator;
use crate::table_actor;
use std::sync::Arc;
use tracing::{error, info};

/// The running table synchronization system.
///
/// `TableSystem` is responsible for:
/// - **Lifecycle Management**: starting the store and hub actors and stopping them again
/// - **Dependency Wiring**: handing the store, hub and device to the engine
///
/// # Example
///
/// ```ignore
/// let system = TableSystem::new(&Settings::default())?;
/// let mut dashboard = system.hub.connect().await?;
///
/// let table = system.engine.create_table(&caller, "Patio").await?;
/// system.engine.update_status(&caller, table.id.as_str(), "placed").await?;
///
/// system.shutdown().await?;
/// ```
pub struct TableSystem {
    pub engine: Arc<TableSyncEngine>,

    /// For opening dashboard channels.
    pub hub: HubClient,

    handles: Vec<tokio::task::JoinHandle<()>>,
}

impl TableSystem {
    /// Starts the system with the device configured in `settings`.
    pub fn new(settings: &Settings) -> Result<Self, ConfigError> {
        let device: Arc<dyn DeviceNotifier> = if settings.device.enabled {
            let notifier = HttpDeviceNotifier::from_settings(&settings.device)?;
            info!(url = notifier.base_url(), "Device notifier configured");
            Arc::new(notifier)
        } else {
            Arc::new(NoDevice)
        };
        Ok(Self::with_device(settings, device))
    }

    /// Starts the system with a caller-supplied device notifier.
    pub fn with_device(settings: &Settings, device: Arc<dyn DeviceNotifier>) -> Self {
        // 1. Create actors
        let (store_actor, store) = table_actor::new(
            settings.store.buffer_size,
            settings.store.delete_mode.into(),
        );
        let (hub_actor, hub) = HubActor::new(settings.hub.buffer_size, settings.hub.client_buffer);

        // 2. Start them
        let store_handle = tokio::spawn(store_actor.run());
        let hub_handle = tokio::spawn(hub_actor.run());

        // 3. Wire the engine
        let ids = IdGenerator::new(settings.ids.max_attempts);
        let id_attempts = ids.max_attempts();
        let engine = TableSyncEngine::new(Arc::new(store), ids, hub.clone(), device);
        info!(
            delete_mode = ?settings.store.delete_mode,
            id_attempts,
            device = settings.device.enabled,
            "Table system started"
        );

        Self {
            engine: Arc::new(engine),
            hub,
            handles: vec![store_handle, hub_handle],
        }
    }

    /// Stops both actors and waits for them.
    ///
    /// Every clone of `engine` and `hub` must be dropped first; the actors only stop once
    /// their last client is gone.
    pub async fn shutdown(self) -> Result<(), String> {
        info!("Shutting down table system...");

        drop(self.engine);
        drop(self.hub);

        for handle in self.handles {
            if let Err(e) = handle.await {
                error!("Actor task failed: {:?}", e);
                return Err(format!("Actor task failed: {:?}", e));
            }
        }

        info!("Table system shutdown complete.");
        Ok(())
    }
}
