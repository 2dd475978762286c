//! # Table Sync
//!
//! Live order status for restaurant tables. Each change to a table is written to the table
//! store and then pushed to two consumers: every connected dashboard, and the signalling
//! device at the table.
//!
//! ## Core Components
//!
//! - **[model]**: [`Table`](model::Table), [`TableStatus`](model::TableStatus) and the update types
//! - **[table_actor]**: the store actor that owns the records and enforces unique ids and names
//! - **[clients]**: the [`TableStore`](clients::TableStore) seam and its actor-backed implementation
//! - **[id_generator]**: short, never-reused public table ids
//! - **[engine]**: [`TableSyncEngine`](engine::TableSyncEngine), the only entry point for table operations
//! - **[hub]**: best-effort broadcast to dashboards
//! - **[device]**: best-effort signalling to the indicator device
//! - **[config]** and **[lifecycle]**: settings and the running [`TableSystem`](lifecycle::TableSystem)
//!
//! ## Quick Start
//!
//! ```rust
//! use table_sync::config::Settings;
//! use table_sync::engine::Caller;
//! use table_sync::lifecycle::TableSystem;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let system = TableSystem::new(&Settings::default())?;
//!     let caller = Caller::new("host-stand");
//!     let mut dashboard = system.hub.connect().await?;
//!
//!     let table = system.engine.create_table(&caller, "Patio 1").await?;
//!     let change = system.engine.update_status(&caller, table.id.as_str(), "placed").await?;
//!     assert!(!change.device_notified); // no device configured
//!
//!     assert_eq!(dashboard.recv().await.unwrap().name(), "table_added");
//!     assert_eq!(dashboard.recv().await.unwrap().name(), "status_update");
//!
//!     system.shutdown().await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Testing
//!
//! See [`actor_store::mock`] for driving the engine against scripted store replies.

pub mod clients;
pub mod config;
pub mod device;
pub mod engine;
pub mod hub;
pub mod id_generator;
pub mod lifecycle;
pub mod model;
pub mod table_actor;
