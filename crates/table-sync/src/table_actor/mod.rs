//! # Table Actor
//!
//! The table store actor: a [`ResourceActor<Table>`](actor_store::ResourceActor) holding every
//! table record. Uniqueness of ids and of active names is enforced inside the actor loop, so
//! two racing creates can never both succeed.
//!
//! ## Structure
//!
//! - [`entity`] - [`ActorEntity`](actor_store::ActorEntity) implementation for [`Table`]
//! - [`error`] - [`TableError`], the error taxonomy of the engine
//! - [`new()`] - Factory function that creates the actor and its store adapter
//!
//! ## Usage
//!
//! ```rust
//! use table_sync::clients::TableStore;
//! use table_sync::model::{Table, TableId};
//! use table_sync::table_actor;
//! use actor_store::RetirePolicy;
//!
//! #[tokio::main]
//! async fn main() {
//!     let (actor, store) = table_actor::new(32, RetirePolicy::Soft);
//!     tokio::spawn(actor.run());
//!
//!     let table = Table::new(TableId::from("ABC123"), "Window", chrono::Utc::now());
//!     store.insert(table).await.unwrap();
//!     assert!(store.find_by_name("Window").await.unwrap().is_some());
//! }
//! ```

pub mod entity;
pub mod error;

pub use error::*;

use crate::clients::ActorTableStore;
use crate::model::Table;
use actor_store::{ResourceActor, RetirePolicy};

/// Creates the table store actor and the adapter that talks to it.
pub fn new(buffer_size: usize, policy: RetirePolicy) -> (ResourceActor<Table>, ActorTableStore) {
    let (actor, client) = ResourceActor::new(buffer_size, policy);
    (actor, ActorTableStore::new(client, policy))
}
