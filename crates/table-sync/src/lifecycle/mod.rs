//! # System Lifecycle
//!
//! Starting, wiring and stopping the actors behind the engine.
//!
//! [`TableSystem`] creates two actors, the table store and the broadcast hub, spawns each in
//! its own Tokio task and builds a [`TableSyncEngine`](crate::engine::TableSyncEngine) on top
//! of their clients. Neither actor depends on the other, so there is no start order to get
//! right and shutdown is just closing channels:
//!
//! 1. **Drop all clients** - the engine holds the store adapter and a hub client
//! 2. **Actors detect closure** - `receiver.recv()` returns `None`
//! 3. **Await completion** - both task handles are joined
//!
//! Open dashboard channels only hold receivers; they never keep the hub alive. After
//! shutdown their `recv()` returns `None`.
//!
//! Logging is set up separately with [`setup_tracing`], once per process.

pub mod table_system;
pub mod tracing;

pub use self::tracing::setup_tracing;
pub use table_system::TableSystem;
