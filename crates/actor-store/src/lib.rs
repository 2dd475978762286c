//! # Actor Store
//!
//! A generic, in-memory record store that runs as a Tokio actor. It follows the
//! **Resource-Oriented** actor pattern: one actor owns one collection of records, and every
//! caller talks to it through a cloneable, type-safe client.
//!
//! ## Why an actor?
//!
//! A store that many requests hit concurrently needs some of its operations to be atomic:
//! "insert unless the id or the name is taken", "update this record only if it is still live".
//! Instead of a lock around a map, the map lives inside a single task that processes one
//! message at a time. Each message is therefore a transaction of its own, and callers never
//! see a half-applied change.
//!
//! ## Architecture Overview
//!
//! 1. **Entity Layer** ([`ActorEntity`]) - the record type, its keys and its hooks
//! 2. **Runtime Layer** ([`ResourceActor`]) - message processing, uniqueness, retirement
//! 3. **Interface Layer** ([`ResourceClient`]) - async request/response over channels
//!
//! ```rust
//! use actor_store::{ActorEntity, ResourceActor, RetirePolicy, FrameworkError};
//!
//! #[derive(Clone, Debug)]
//! struct Room { id: String, name: String, open: bool }
//!
//! #[derive(Debug)] struct RoomUpdate { name: String }
//! #[derive(Debug, thiserror::Error)] #[error("room error")] struct RoomError;
//!
//! impl ActorEntity for Room {
//!     type Id = String;
//!     type Update = RoomUpdate;
//!     type SortKey = String;
//!     type Error = RoomError;
//!
//!     fn id(&self) -> &String { &self.id }
//!     fn sort_key(&self) -> String { self.name.clone() }
//!     fn unique_key(&self) -> Option<&str> { Some(&self.name) }
//!     fn is_live(&self) -> bool { self.open }
//!     fn on_retire(&mut self) { self.open = false; }
//!     fn on_update(&mut self, update: RoomUpdate) -> Result<(), RoomError> {
//!         self.name = update.name;
//!         Ok(())
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     let (actor, client) = ResourceActor::<Room>::new(10, RetirePolicy::Soft);
//!     tokio::spawn(actor.run());
//!
//!     let hall = Room { id: "r1".into(), name: "Hall".into(), open: true };
//!     client.insert(hall).await.unwrap();
//!
//!     // Same name, different id: rejected by the actor.
//!     let clash = Room { id: "r2".into(), name: "Hall".into(), open: true };
//!     assert!(matches!(client.insert(clash).await, Err(FrameworkError::DuplicateKey(_))));
//!
//!     // Soft delete hides the record but keeps its id reserved.
//!     client.delete("r1".to_string()).await.unwrap();
//!     assert!(client.get("r1".to_string()).await.unwrap().is_none());
//!     assert!(client.contains("r1".to_string()).await.unwrap());
//! }
//! ```
//!
//! ## Concurrency Model
//!
//! - Each actor runs in its own Tokio task and owns its map outright
//! - Messages are processed **sequentially**, so each one is atomic
//! - Dropping every client closes the channel and ends the task
//!
//! ## Testing
//!
//! [`mock::MockClient`] returns scripted replies through a real `ResourceClient`, which makes
//! store outages and racing inserts easy to reproduce. See the [`mock`] module.

pub mod actor;
pub mod client;
pub mod entity;
pub mod error;
pub mod message;
pub mod mock;

// Re-export core types for convenience
pub use actor::{ResourceActor, RetirePolicy};
pub use client::ResourceClient;
pub use entity::ActorEntity;
pub use error::FrameworkError;
pub use message::{ResourceRequest, Response};
